use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::UserProfile;

/// Age phrasings, most specific first. The first matching pattern with a
/// plausible value (0 < age < 120) wins.
static AGE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"i am (\d{1,3}) years? old",
        r"my age is (\d{1,3})",
        r"age[:\s]+(\d{1,3})",
        r"(\d{1,3}) years? old",
        r"i'm (\d{1,3})",
        r"(\d{2}) year",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

/// Lowercase state names and abbreviations mapped to canonical names, in
/// priority order. Full names are matched as substrings; the short
/// abbreviations only as whole words.
const STATES: &[(&str, &str)] = &[
    ("andhra pradesh", "Andhra Pradesh"),
    ("arunachal pradesh", "Arunachal Pradesh"),
    ("assam", "Assam"),
    ("bihar", "Bihar"),
    ("chhattisgarh", "Chhattisgarh"),
    ("goa", "Goa"),
    ("gujarat", "Gujarat"),
    ("haryana", "Haryana"),
    ("himachal pradesh", "Himachal Pradesh"),
    ("jharkhand", "Jharkhand"),
    ("karnataka", "Karnataka"),
    ("kerala", "Kerala"),
    ("madhya pradesh", "Madhya Pradesh"),
    ("maharashtra", "Maharashtra"),
    ("manipur", "Manipur"),
    ("meghalaya", "Meghalaya"),
    ("mizoram", "Mizoram"),
    ("nagaland", "Nagaland"),
    ("odisha", "Odisha"),
    ("punjab", "Punjab"),
    ("rajasthan", "Rajasthan"),
    ("sikkim", "Sikkim"),
    ("tamil nadu", "Tamil Nadu"),
    ("telangana", "Telangana"),
    ("tripura", "Tripura"),
    ("uttar pradesh", "Uttar Pradesh"),
    ("uttarakhand", "Uttarakhand"),
    ("west bengal", "West Bengal"),
    ("delhi", "Delhi"),
    ("jammu and kashmir", "Jammu and Kashmir"),
    ("ladakh", "Ladakh"),
    ("puducherry", "Puducherry"),
    ("chandigarh", "Chandigarh"),
];

const STATE_ABBREVIATIONS: &[(&str, &str)] = &[
    ("up", "Uttar Pradesh"),
    ("mp", "Madhya Pradesh"),
    ("hp", "Himachal Pradesh"),
    ("ap", "Andhra Pradesh"),
    ("jk", "Jammu and Kashmir"),
    ("wb", "West Bengal"),
    ("tn", "Tamil Nadu"),
    ("uk", "Uttarakhand"),
];

static STATE_ABBREVIATION_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    STATE_ABBREVIATIONS
        .iter()
        .map(|(abbr, canonical)| {
            (
                Regex::new(&format!(r"\b{}\b", abbr)).expect("valid regex"),
                *canonical,
            )
        })
        .collect()
});

/// Gender keyword patterns scanned male-then-female; the first match wins.
static GENDER_PATTERNS: Lazy<Vec<(&'static str, Vec<Regex>)>> = Lazy::new(|| {
    vec![
        (
            "male",
            [r"\bmale\b", r"\bman\b", r"\bboy\b", r"\bpurush\b"]
                .iter()
                .map(|p| Regex::new(p).expect("valid regex"))
                .collect(),
        ),
        (
            "female",
            [
                r"\bfemale\b",
                r"\bwoman\b",
                r"\bgirl\b",
                r"\bmahila\b",
                r"\blady\b",
                r"\bstri\b",
            ]
            .iter()
            .map(|p| Regex::new(p).expect("valid regex"))
            .collect(),
        ),
    ]
});

/// Occupation keyword lists in priority order; substring match, first
/// occupation with any hit wins.
const OCCUPATION_KEYWORDS: &[(&str, &[&str])] = &[
    ("farmer", &["farmer", "farming", "kisan", "agriculture", "crop", "kheti"]),
    ("student", &["student", "studying", "college", "school", "university", "padhai"]),
    ("business", &["business", "entrepreneur", "shop", "startup", "self-employed", "vyapar"]),
    ("labour", &["labour", "labor", "worker", "daily wage", "mazdoor", "construction"]),
    ("unemployed", &["unemployed", "jobless", "no job", "berozgar", "looking for work"]),
    ("housewife", &["housewife", "homemaker", "grihini"]),
];

/// Social-category keyword lists in priority order, matched as whole words
/// so that e.g. "sc" does not fire inside "school".
static CATEGORY_PATTERNS: Lazy<Vec<(&'static str, Vec<Regex>)>> = Lazy::new(|| {
    let table: &[(&str, &[&str])] = &[
        ("sc", &["sc", "scheduled caste", "dalit"]),
        ("st", &["st", "scheduled tribe", "tribal", "adivasi"]),
        ("obc", &["obc", "other backward class", "backward"]),
        ("general", &["general", "unreserved"]),
        ("minority", &["minority", "muslim", "christian", "sikh", "buddhist", "jain", "parsi"]),
    ];
    table
        .iter()
        .map(|(code, keywords)| {
            (
                *code,
                keywords
                    .iter()
                    .map(|kw| Regex::new(&format!(r"\b{}\b", kw)).expect("valid regex"))
                    .collect(),
            )
        })
        .collect()
});

#[derive(Debug, Clone, Copy)]
enum IncomePeriod {
    Exact,
    Monthly,
    Yearly,
}

/// Income phrasings in priority order. Monthly figures are annualized.
static INCOME_PATTERNS: Lazy<Vec<(Regex, IncomePeriod)>> = Lazy::new(|| {
    [
        (r"income[:\s]+(?:rs\.?|₹)?\s*(\d[\d,]*)", IncomePeriod::Exact),
        (r"(?:rs\.?|₹)\s*(\d[\d,]*)\s*(?:per month|monthly|pm)", IncomePeriod::Monthly),
        (r"(?:rs\.?|₹)\s*(\d[\d,]*)\s*(?:per year|yearly|annual|pa)", IncomePeriod::Yearly),
        (r"(\d[\d,]*)\s*(?:per month|monthly|pm)", IncomePeriod::Monthly),
        (r"(\d[\d,]*)\s*(?:per year|yearly|annual|pa)", IncomePeriod::Yearly),
    ]
    .iter()
    .map(|(p, period)| (Regex::new(p).expect("valid regex"), *period))
    .collect()
});

const BPL_KEYWORDS: &[&str] = &["bpl", "below poverty", "garib", "poor", "poverty line"];

const DISABILITY_KEYWORDS: &[&str] =
    &["disabled", "disability", "handicap", "divyang", "physically challenged"];

/// Stateless pattern matcher turning a chat message into profile fragments.
///
/// Every field is extracted independently; an absent field means "not
/// mentioned", never "false". Conflicting signals are resolved by the fixed
/// priority order of each pattern list, not by any notion of confidence.
pub struct EntityExtractor;

impl EntityExtractor {
    pub fn extract(message: &str) -> UserProfile {
        let msg = message.to_lowercase();
        let mut fragment = UserProfile::default();

        // Age: first pattern with a plausible value wins.
        for pattern in AGE_PATTERNS.iter() {
            if let Some(caps) = pattern.captures(&msg) {
                if let Ok(age) = caps[1].parse::<u32>() {
                    if age > 0 && age < 120 {
                        fragment.age = Some(age);
                        break;
                    }
                }
            }
        }

        // State: full names first, then whole-word abbreviations.
        for (key, canonical) in STATES {
            if msg.contains(key) {
                fragment.state = Some((*canonical).to_string());
                break;
            }
        }
        if fragment.state.is_none() {
            for (pattern, canonical) in STATE_ABBREVIATION_PATTERNS.iter() {
                if pattern.is_match(&msg) {
                    fragment.state = Some((*canonical).to_string());
                    break;
                }
            }
        }

        // Gender: male patterns scan before female, first match wins.
        'gender: for (gender, patterns) in GENDER_PATTERNS.iter() {
            for pattern in patterns {
                if pattern.is_match(&msg) {
                    fragment.gender = Some((*gender).to_string());
                    break 'gender;
                }
            }
        }

        // Occupation: first keyword list that intersects the message.
        for (occupation, keywords) in OCCUPATION_KEYWORDS {
            if keywords.iter().any(|kw| msg.contains(kw)) {
                fragment.occupation = Some((*occupation).to_string());
                break;
            }
        }

        // Social category: whole-word match, fixed order.
        for (code, patterns) in CATEGORY_PATTERNS.iter() {
            if patterns.iter().any(|p| p.is_match(&msg)) {
                fragment.category = Some((*code).to_string());
                break;
            }
        }

        // Income: first shape wins; monthly figures annualized.
        for (pattern, period) in INCOME_PATTERNS.iter() {
            if let Some(caps) = pattern.captures(&msg) {
                let digits = caps[1].replace(',', "");
                if let Ok(amount) = digits.parse::<u64>() {
                    fragment.annual_income = Some(match period {
                        IncomePeriod::Monthly => amount * 12,
                        IncomePeriod::Exact | IncomePeriod::Yearly => amount,
                    });
                    break;
                }
            }
        }

        // Boolean flags are independent; both can be set by one message.
        if BPL_KEYWORDS.iter().any(|kw| msg.contains(kw)) {
            fragment.is_bpl = Some(true);
        }
        if DISABILITY_KEYWORDS.iter().any(|kw| msg.contains(kw)) {
            fragment.disability = Some(true);
        }

        fragment
    }
}
