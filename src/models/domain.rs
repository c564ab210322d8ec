use serde::{Deserialize, Serialize};

/// Gender requirement on a scheme. `All` means the scheme has no gender
/// restriction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum GenderRule {
    #[default]
    All,
    Only(String),
}

impl From<String> for GenderRule {
    fn from(value: String) -> Self {
        if value.eq_ignore_ascii_case("all") {
            GenderRule::All
        } else {
            GenderRule::Only(value)
        }
    }
}

impl From<GenderRule> for String {
    fn from(rule: GenderRule) -> Self {
        match rule {
            GenderRule::All => "all".to_string(),
            GenderRule::Only(gender) => gender,
        }
    }
}

/// Serialized shape of the `states` field: the keyword `"all"` or a list of
/// state names.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum StatesRepr {
    Keyword(String),
    List(Vec<String>),
}

/// State restriction on a scheme. A scalar value other than `"all"` is
/// treated as a one-element state set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StatesRepr", into = "StatesRepr")]
pub enum StateRule {
    #[default]
    All,
    AnyOf(Vec<String>),
}

impl From<StatesRepr> for StateRule {
    fn from(repr: StatesRepr) -> Self {
        match repr {
            StatesRepr::Keyword(s) if s.eq_ignore_ascii_case("all") => StateRule::All,
            StatesRepr::Keyword(s) => StateRule::AnyOf(vec![s]),
            StatesRepr::List(states) => StateRule::AnyOf(states),
        }
    }
}

impl From<StateRule> for StatesRepr {
    fn from(rule: StateRule) -> Self {
        match rule {
            StateRule::All => StatesRepr::Keyword("all".to_string()),
            StateRule::AnyOf(states) => StatesRepr::List(states),
        }
    }
}

/// Accepted-code set for the category and occupation rules. An absent or
/// empty list means the scheme does not constrain the field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<Vec<String>>", into = "Option<Vec<String>>")]
pub enum CodeRule {
    #[default]
    Unconstrained,
    AnyOf(Vec<String>),
}

impl From<Option<Vec<String>>> for CodeRule {
    fn from(value: Option<Vec<String>>) -> Self {
        match value {
            Some(codes) if !codes.is_empty() => CodeRule::AnyOf(codes),
            _ => CodeRule::Unconstrained,
        }
    }
}

impl From<CodeRule> for Option<Vec<String>> {
    fn from(rule: CodeRule) -> Self {
        match rule {
            CodeRule::Unconstrained => None,
            CodeRule::AnyOf(codes) => Some(codes),
        }
    }
}

impl CodeRule {
    pub fn is_unconstrained(&self) -> bool {
        matches!(self, CodeRule::Unconstrained)
    }

    /// Case-insensitive membership test.
    pub fn accepts(&self, code: &str) -> bool {
        match self {
            CodeRule::Unconstrained => true,
            CodeRule::AnyOf(codes) => codes.iter().any(|c| c.eq_ignore_ascii_case(code)),
        }
    }
}

/// Eligibility rules embedded in a scheme. Absence of a field means the
/// scheme does not constrain that dimension, never "fails by default".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EligibilityRules {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_age: Option<u32>,
    #[serde(default)]
    pub gender: GenderRule,
    #[serde(default)]
    pub states: StateRule,
    #[serde(default, skip_serializing_if = "CodeRule::is_unconstrained")]
    pub category: CodeRule,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_income: Option<u64>,
    #[serde(default, skip_serializing_if = "CodeRule::is_unconstrained")]
    pub occupation: CodeRule,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_bpl: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_farmer: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_student: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disability: Option<bool>,
}

/// A welfare scheme record. Immutable after catalog load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scheme {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(rename = "type", default = "default_scheme_type")]
    pub scheme_type: String,
    #[serde(default)]
    pub benefits: String,
    #[serde(default)]
    pub how_to_apply: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub eligibility: EligibilityRules,
}

fn default_scheme_type() -> String {
    "central".to_string()
}

/// Citizen profile, assembled from a form request or accumulated over a chat
/// session. Every field is optional; absence means "not provided", not a
/// failed constraint. Unknown keys in incoming JSON are ignored.
///
/// Numeric and boolean fields deserialize leniently: numeric strings are
/// parsed, `"true"`/`"false"` strings become booleans, and garbage values
/// coerce to a safe default instead of failing the request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default, deserialize_with = "lenient_u32", skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient_u64", skip_serializing_if = "Option::is_none")]
    pub annual_income: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
    #[serde(default, deserialize_with = "loose_bool", skip_serializing_if = "Option::is_none")]
    pub is_bpl: Option<bool>,
    #[serde(default, deserialize_with = "loose_bool", skip_serializing_if = "Option::is_none")]
    pub is_farmer: Option<bool>,
    #[serde(default, deserialize_with = "loose_bool", skip_serializing_if = "Option::is_none")]
    pub is_student: Option<bool>,
    #[serde(default, deserialize_with = "loose_bool", skip_serializing_if = "Option::is_none")]
    pub disability: Option<bool>,
}

impl UserProfile {
    /// Age with the missing-field default of 0.
    pub fn age_or_default(&self) -> u32 {
        self.age.unwrap_or(0)
    }

    /// Annual income with the missing-field default of 0.
    pub fn income_or_default(&self) -> u64 {
        self.annual_income.unwrap_or(0)
    }

    pub fn bpl(&self) -> bool {
        self.is_bpl.unwrap_or(false)
    }

    pub fn farmer(&self) -> bool {
        self.is_farmer.unwrap_or(false)
    }

    pub fn student(&self) -> bool {
        self.is_student.unwrap_or(false)
    }

    pub fn disabled(&self) -> bool {
        self.disability.unwrap_or(false)
    }

    /// Field-wise merge: any field present on `newer` overwrites the stored
    /// value for that field.
    pub fn merge_from(&mut self, newer: &UserProfile) {
        if newer.age.is_some() {
            self.age = newer.age;
        }
        if newer.gender.is_some() {
            self.gender = newer.gender.clone();
        }
        if newer.state.is_some() {
            self.state = newer.state.clone();
        }
        if newer.category.is_some() {
            self.category = newer.category.clone();
        }
        if newer.annual_income.is_some() {
            self.annual_income = newer.annual_income;
        }
        if newer.occupation.is_some() {
            self.occupation = newer.occupation.clone();
        }
        if newer.is_bpl.is_some() {
            self.is_bpl = newer.is_bpl;
        }
        if newer.is_farmer.is_some() {
            self.is_farmer = newer.is_farmer;
        }
        if newer.is_student.is_some() {
            self.is_student = newer.is_student;
        }
        if newer.disability.is_some() {
            self.disability = newer.disability;
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &UserProfile::default()
    }
}

fn lenient_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value
        .and_then(coerce_u64)
        .map(|n| n.min(u64::from(u32::MAX)) as u32))
}

fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(coerce_u64))
}

/// Best-effort numeric coercion: numbers pass through, numeric strings are
/// parsed, null stays absent, anything else becomes 0.
fn coerce_u64(value: serde_json::Value) -> Option<u64> {
    use serde_json::Value;

    match value {
        Value::Null => None,
        Value::Number(n) => Some(n.as_u64().unwrap_or_else(|| {
            n.as_f64().filter(|f| *f > 0.0).map(|f| f as u64).unwrap_or(0)
        })),
        Value::String(s) => Some(s.trim().parse().unwrap_or(0)),
        _ => Some(0),
    }
}

fn loose_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde_json::Value;

    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::Bool(b)) => Some(b),
        Some(Value::String(s)) => Some(s.trim().eq_ignore_ascii_case("true")),
        Some(_) => Some(false),
    })
}

/// A scheme paired with its computed relevance, as returned by the matcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredScheme {
    #[serde(flatten)]
    pub scheme: Scheme,
    pub match_score: u8,
}

/// A scheme paired with its free-text relevance, as returned by the search
/// index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(flatten)]
    pub scheme: Scheme,
    pub search_score: f64,
}

/// Per-dimension scoring weights
#[derive(Debug, Clone, Copy)]
pub struct ScoringWeights {
    pub age: u32,
    pub gender: u32,
    pub state: u32,
    pub category: u32,
    pub income: u32,
    pub occupation: u32,
    /// Sub-weight applied once per boolean flag declared on a scheme.
    pub special: u32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            age: 15,
            gender: 15,
            state: 20,
            category: 15,
            income: 15,
            occupation: 10,
            special: 10,
        }
    }
}

/// Recognized Indian states and union territories, used to validate the
/// `state` field on recommendation requests.
pub const INDIAN_STATES: &[&str] = &[
    "Andhra Pradesh",
    "Arunachal Pradesh",
    "Assam",
    "Bihar",
    "Chhattisgarh",
    "Goa",
    "Gujarat",
    "Haryana",
    "Himachal Pradesh",
    "Jharkhand",
    "Karnataka",
    "Kerala",
    "Madhya Pradesh",
    "Maharashtra",
    "Manipur",
    "Meghalaya",
    "Mizoram",
    "Nagaland",
    "Odisha",
    "Punjab",
    "Rajasthan",
    "Sikkim",
    "Tamil Nadu",
    "Telangana",
    "Tripura",
    "Uttar Pradesh",
    "Uttarakhand",
    "West Bengal",
    "Delhi",
    "Jammu and Kashmir",
    "Ladakh",
    "Puducherry",
    "Chandigarh",
    "Andaman and Nicobar Islands",
    "Dadra and Nagar Haveli and Daman and Diu",
    "Lakshadweep",
];
