use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::chat::extractor::EntityExtractor;
use crate::chat::memory::ConversationMemory;
use crate::models::{CodeRule, GenderRule, Scheme, StateRule, UserProfile};
use crate::search::SearchIndex;
use crate::services::Catalog;

/// Phrases marking a message as a scheme lookup or search.
const SCHEME_QUERY_INDICATORS: &[&str] = &[
    "tell me about",
    "what is",
    "explain",
    "details of",
    "information about",
    "info about",
    "describe",
    "schemes for",
    "scheme for",
    "yojana for",
    "yojana",
    "pm-",
    "pm ",
    "pradhan mantri",
    "mukhyamantri",
    "find scheme",
    "search scheme",
    "show scheme",
    "list scheme",
    "which scheme",
    "best scheme",
    "eligible for which",
    "which schemes can i",
    "recommend",
    "suggest",
];

/// Phrases that ask for recommendations against the accumulated profile
/// rather than a plain search.
const RECOMMENDATION_INDICATORS: &[&str] = &[
    "for me",
    "eligible",
    "i can get",
    "recommend",
    "suggest",
    "which scheme",
    "my scheme",
];

const CATEGORY_NAMES: &[&str] = &[
    "agriculture",
    "health",
    "education",
    "housing",
    "finance",
    "women",
    "pension",
    "insurance",
    "employment",
    "sanitation",
];

static SELECTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:number|#|option|no\.?)\s*(\d+)").expect("valid regex"));

static GREETING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(hi|hello|hey|namaste|namaskar)\b").expect("valid regex"));

static FAREWELL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(bye|goodbye|thanks|thank you|dhanyavad)\b").expect("valid regex"));

static COMPARE_SPLIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\band\b|\bvs\b|\bwith\b|,").expect("valid regex"));

const ORDINALS: &[(&str, usize)] = &[
    ("first", 0),
    ("second", 1),
    ("third", 2),
    ("fourth", 3),
    ("fifth", 4),
];

/// Rule-based conversational orchestrator.
///
/// Reduces free text to profile fragments via the extractor, accumulates them
/// in per-session memory and answers from the catalog through the search
/// index. Every reply path records the turn and a coarse intent label in the
/// session.
pub struct SchemeBot {
    catalog: Arc<Catalog>,
    index: Arc<SearchIndex>,
    memory: ConversationMemory,
}

impl SchemeBot {
    pub fn new(catalog: Arc<Catalog>, index: Arc<SearchIndex>, memory: ConversationMemory) -> Self {
        Self {
            catalog,
            index,
            memory,
        }
    }

    pub fn memory(&self) -> &ConversationMemory {
        &self.memory
    }

    /// Produce a reply for one chat message.
    pub fn respond(&self, message: &str, session_id: &str) -> String {
        let message = message.trim();
        if message.is_empty() {
            return "Please type your question about welfare schemes.".to_string();
        }

        let extracted = EntityExtractor::extract(message);
        if !extracted.is_empty() {
            tracing::debug!("Extracted entities: {:?}", extracted);
            self.memory.update_user_info(session_id, &extracted);
        }

        let (response, intent) = if let Some(reply) = self.handle_special_command(message, session_id)
        {
            (reply, "command")
        } else if Self::is_scheme_query(message) {
            match self.handle_scheme_query(message, session_id) {
                Some(result) => result,
                None => (self.fallback(message, session_id), "fallback"),
            }
        } else if let Some(reply) = self.handle_selection(message, session_id) {
            (reply, "selection")
        } else {
            (self.fallback(message, session_id), "fallback")
        };

        self.memory.add_turn(session_id, message, &response, Some(intent));
        response
    }

    fn handle_special_command(&self, message: &str, session_id: &str) -> Option<String> {
        let msg = message.to_lowercase();
        let msg = msg.trim();

        match msg {
            "reset" | "start over" | "clear" | "new chat" => {
                self.memory.clear_session(session_id);
                Some(
                    "Conversation reset. I can help you find welfare schemes, explain \
                     their benefits, guide you through applications and check your \
                     eligibility. What would you like to know?"
                        .to_string(),
                )
            }
            "my info" | "my profile" | "what do you know about me" => {
                let info = self.memory.get_user_info(session_id);
                Some(if info.is_empty() {
                    "I don't have any information about you yet. Tell me your age, \
                     state or occupation and I'll find relevant schemes."
                        .to_string()
                } else {
                    format_user_info(&info)
                })
            }
            "help" | "what can you do" | "commands" | "menu" => Some(help_text()),
            "categories" | "show categories" | "all categories" | "types of schemes" => {
                Some(self.list_categories())
            }
            _ if msg.starts_with("compare ") => Some(self.compare_schemes(msg, session_id)),
            _ => None,
        }
    }

    fn is_scheme_query(message: &str) -> bool {
        let msg = message.to_lowercase();
        SCHEME_QUERY_INDICATORS.iter().any(|ind| msg.contains(ind))
    }

    fn handle_scheme_query(
        &self,
        message: &str,
        session_id: &str,
    ) -> Option<(String, &'static str)> {
        let msg = message.to_lowercase();

        if RECOMMENDATION_INDICATORS.iter().any(|w| msg.contains(w)) {
            return Some((self.personal_recommendations(session_id), "recommend"));
        }

        let results = self.index.search(message, 5);
        if !results.is_empty() {
            // One strong hit gets the full detail view straight away.
            if results.len() == 1 || results[0].search_score > 80.0 {
                return Some((format_scheme_detail(&results[0].scheme), "search"));
            }

            let schemes: Vec<Scheme> = results.into_iter().map(|hit| hit.scheme).collect();
            let reply = format_scheme_list(&schemes, "Here are the matching schemes");
            self.memory.set_last_schemes(session_id, schemes);
            return Some((reply, "search"));
        }

        // Category browse, tolerating truncated words ("agri", "educ").
        for category in CATEGORY_NAMES {
            if msg.contains(category) || msg.contains(&category[..4]) {
                let schemes: Vec<Scheme> = self
                    .index
                    .by_category(category)
                    .into_iter()
                    .take(5)
                    .cloned()
                    .collect();
                if !schemes.is_empty() {
                    let header = format!("{} schemes", capitalize(category));
                    let reply = format_scheme_list(&schemes, &header);
                    self.memory.set_last_schemes(session_id, schemes);
                    return Some((reply, "category"));
                }
            }
        }

        None
    }

    fn personal_recommendations(&self, session_id: &str) -> String {
        let info = self.memory.get_user_info(session_id);

        if info.age.is_none() && info.state.is_none() && info.occupation.is_none() {
            return "I'd love to recommend schemes for you, but first tell me about \
                    yourself: your age, your state, your occupation. You can say it \
                    all at once, like \"I am a 25 year old farmer from Bihar\"."
                .to_string();
        }

        let eligible = self.eligible_for_profile(&info);
        if eligible.is_empty() {
            return "Based on what I know I couldn't find specific matches. Please \
                    fill the recommendation form for accurate results."
                .to_string();
        }

        let shown: Vec<Scheme> = eligible.into_iter().take(8).cloned().collect();
        let mut reply =
            format_scheme_list(&shown, "Based on your profile, here are matching schemes");

        reply.push_str("\n\nProfile I used:\n");
        if let Some(age) = info.age {
            reply.push_str(&format!("- Age: {}\n", age));
        }
        if let Some(state) = &info.state {
            reply.push_str(&format!("- State: {}\n", state));
        }
        if let Some(occupation) = &info.occupation {
            reply.push_str(&format!("- Occupation: {}\n", occupation));
        }
        if let Some(gender) = &info.gender {
            reply.push_str(&format!("- Gender: {}\n", gender));
        }
        if let Some(category) = &info.category {
            reply.push_str(&format!("- Category: {}\n", category.to_uppercase()));
        }
        reply.push_str("\nTell me more about yourself for better results, or fill the form above.");

        self.memory.set_last_schemes(session_id, shown);
        reply
    }

    /// Eligibility pre-filter over the catalog that only applies the checks
    /// the user has actually answered, capped at 10 schemes.
    fn eligible_for_profile(&self, info: &UserProfile) -> Vec<&Scheme> {
        self.catalog
            .all_schemes()
            .iter()
            .filter(|scheme| {
                let rules = &scheme.eligibility;

                if let Some(state) = info.state.as_deref() {
                    if let StateRule::AnyOf(states) = &rules.states {
                        if !states.iter().any(|s| s == state) {
                            return false;
                        }
                    }
                }

                if let Some(gender) = info.gender.as_deref() {
                    if let GenderRule::Only(required) = &rules.gender {
                        if !gender.eq_ignore_ascii_case(required) {
                            return false;
                        }
                    }
                }

                if let Some(age) = info.age.filter(|a| *a > 0) {
                    if let Some(min_age) = rules.min_age {
                        if age < min_age {
                            return false;
                        }
                    }
                    if let Some(max_age) = rules.max_age {
                        if age > max_age {
                            return false;
                        }
                    }
                }

                true
            })
            .take(10)
            .collect()
    }

    /// Positional pick from the last shown list: a bare number, "number N",
    /// "#N", "option N" or an ordinal word.
    fn handle_selection(&self, message: &str, session_id: &str) -> Option<String> {
        let last = self.memory.get_last_schemes(session_id);
        if last.is_empty() {
            return None;
        }

        let msg = message.trim().to_lowercase();
        let mut index: Option<usize> = None;

        if let Ok(n) = msg.parse::<usize>() {
            index = n.checked_sub(1);
        }
        if index.is_none() {
            if let Some(caps) = SELECTION_RE.captures(&msg) {
                index = caps[1].parse::<usize>().ok().and_then(|n| n.checked_sub(1));
            }
        }
        if index.is_none() {
            for (word, idx) in ORDINALS {
                if msg.contains(word) {
                    index = Some(*idx);
                    break;
                }
            }
        }

        match index {
            Some(i) if i < last.len() => Some(format_scheme_detail(&last[i])),
            _ => None,
        }
    }

    fn compare_schemes(&self, msg_lower: &str, session_id: &str) -> String {
        let rest = msg_lower.strip_prefix("compare ").unwrap_or(msg_lower);
        let parts: Vec<&str> = COMPARE_SPLIT_RE
            .split(rest)
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();

        if parts.len() < 2 {
            return "To compare schemes, say: compare <scheme one> and <scheme two>."
                .to_string();
        }

        let first = self.index.search(parts[0], 1);
        let second = self.index.search(parts[1], 1);
        let (Some(a), Some(b)) = (first.first(), second.first()) else {
            return "I couldn't find one or both schemes. Please check the names.".to_string();
        };

        let mut reply = String::from("Scheme comparison:\n\n");
        let fields: [(&str, fn(&Scheme) -> &str); 5] = [
            ("Name", |s| &s.name),
            ("Category", |s| &s.category),
            ("Type", |s| &s.scheme_type),
            ("Benefits", |s| &s.benefits),
            ("How to apply", |s| &s.how_to_apply),
        ];
        for (label, get) in fields {
            reply.push_str(&format!("{}:\n", label));
            reply.push_str(&format!("  1. {}\n", truncate(get(&a.scheme), 60)));
            reply.push_str(&format!("  2. {}\n\n", truncate(get(&b.scheme), 60)));
        }
        reply.push_str("Reply 1 or 2 for full details of either scheme.");

        self.memory
            .set_last_schemes(session_id, vec![a.scheme.clone(), b.scheme.clone()]);
        reply
    }

    fn list_categories(&self) -> String {
        let categories = self.catalog.categories();
        if categories.is_empty() {
            return "Categories are not available right now.".to_string();
        }

        let mut reply = String::from("Available scheme categories:\n\n");
        for category in &categories {
            let count = self.catalog.by_category(category).len();
            reply.push_str(&format!("- {} ({} schemes)\n", capitalize(category), count));
        }
        reply.push_str("\nType a category name to see its schemes.");
        reply
    }

    fn fallback(&self, message: &str, session_id: &str) -> String {
        let msg = message.to_lowercase();

        if GREETING_RE.is_match(&msg) {
            return "Namaste! I'm Saarthi, your welfare scheme assistant. Ask about \
                    any scheme, browse by category, or tell me about yourself for \
                    personalized recommendations - for example \"I am a 25 year old \
                    farmer from Bihar\"."
                .to_string();
        }

        if FAREWELL_RE.is_match(&msg) {
            return "Glad I could help. Remember to confirm eligibility on the \
                    official portals before applying. Come back anytime!"
                .to_string();
        }

        let results = self.index.search(message, 3);
        if !results.is_empty() {
            let schemes: Vec<Scheme> = results.into_iter().map(|hit| hit.scheme).collect();
            let reply =
                format_scheme_list(&schemes, "I found these schemes that might be relevant");
            self.memory.set_last_schemes(session_id, schemes);
            return reply;
        }

        "I can help with welfare schemes. Try \"schemes for farmers\", \"tell me \
         about PM-KISAN\", or tell me about yourself like \"I am a 30 year old \
         farmer from UP\". Type 'help' for all options."
            .to_string()
    }
}

fn help_text() -> String {
    "Here's what I can do:\n\n\
     Search schemes:\n\
     - \"Tell me about PM-KISAN\"\n\
     - \"Schemes for farmers\"\n\n\
     Get recommendations:\n\
     - \"I am a 25 year old farmer from Bihar\"\n\
     - \"Recommend schemes for me\"\n\n\
     Compare schemes:\n\
     - \"Compare PM-KISAN and Ayushman Bharat\"\n\n\
     Other commands:\n\
     - categories - list all scheme categories\n\
     - my info - show the profile I've collected\n\
     - reset - start a fresh conversation"
        .to_string()
}

fn format_user_info(info: &UserProfile) -> String {
    let mut out = String::from("Here's what I know about you:\n\n");

    if let Some(age) = info.age {
        out.push_str(&format!("- Age: {}\n", age));
    }
    if let Some(state) = &info.state {
        out.push_str(&format!("- State: {}\n", state));
    }
    if let Some(gender) = &info.gender {
        out.push_str(&format!("- Gender: {}\n", gender));
    }
    if let Some(occupation) = &info.occupation {
        out.push_str(&format!("- Occupation: {}\n", occupation));
    }
    if let Some(category) = &info.category {
        out.push_str(&format!("- Category: {}\n", category.to_uppercase()));
    }
    if let Some(income) = info.annual_income {
        out.push_str(&format!("- Annual income: Rs {}\n", income));
    }
    if let Some(bpl) = info.is_bpl {
        out.push_str(&format!("- BPL status: {}\n", if bpl { "Yes" } else { "No" }));
    }
    if let Some(disability) = info.disability {
        out.push_str(&format!("- Disability: {}\n", if disability { "Yes" } else { "No" }));
    }

    out.push_str("\nTell me more to get better recommendations, or say 'recommend schemes for me'.");
    out
}

fn format_scheme_detail(scheme: &Scheme) -> String {
    let mut out = format!("{}\n{}\n", scheme.name, "=".repeat(40));

    if !scheme.description.is_empty() {
        out.push_str(&format!("\n{}\n", scheme.description));
    }
    out.push_str(&format!(
        "\nCategory: {} | Type: {}\n",
        capitalize(&scheme.category),
        capitalize(&scheme.scheme_type)
    ));
    if !scheme.benefits.is_empty() {
        out.push_str(&format!("\nBenefits: {}\n", scheme.benefits));
    }

    out.push_str("\nEligibility:\n");
    let rules = &scheme.eligibility;
    if rules.min_age.is_some() || rules.max_age.is_some() {
        let mut age_line = String::new();
        if let Some(min_age) = rules.min_age {
            age_line.push_str(&format!("min {}", min_age));
        }
        if let Some(max_age) = rules.max_age {
            if !age_line.is_empty() {
                age_line.push_str(", ");
            }
            age_line.push_str(&format!("max {}", max_age));
        }
        out.push_str(&format!("- Age: {}\n", age_line));
    }
    if let GenderRule::Only(gender) = &rules.gender {
        out.push_str(&format!("- Gender: {}\n", gender));
    }
    if let StateRule::AnyOf(states) = &rules.states {
        let mut shown = states.iter().take(5).cloned().collect::<Vec<_>>().join(", ");
        if states.len() > 5 {
            shown.push_str(&format!(" +{} more", states.len() - 5));
        }
        out.push_str(&format!("- States: {}\n", shown));
    }
    if let Some(max_income) = rules.max_income {
        out.push_str(&format!("- Max income: Rs {}/year\n", max_income));
    }
    if let CodeRule::AnyOf(categories) = &rules.category {
        out.push_str(&format!("- Category: {}\n", categories.join(", ").to_uppercase()));
    }
    if let CodeRule::AnyOf(occupations) = &rules.occupation {
        out.push_str(&format!("- Occupation: {}\n", occupations.join(", ")));
    }

    if !scheme.how_to_apply.is_empty() {
        out.push_str(&format!("\nHow to apply: {}\n", scheme.how_to_apply));
    }
    if !scheme.url.is_empty() {
        out.push_str(&format!("\nOfficial link: {}\n", scheme.url));
    }

    out.push_str("\nAsk me anything else about this scheme, or type 'help' for options.");
    out
}

fn format_scheme_list(schemes: &[Scheme], header: &str) -> String {
    let mut out = format!("{}:\n\n", header);

    for (i, scheme) in schemes.iter().enumerate() {
        out.push_str(&format!("{}. {}\n", i + 1, scheme.name));
        if !scheme.description.is_empty() {
            out.push_str(&format!("   {}\n", truncate(&scheme.description, 80)));
        }
        if !scheme.category.is_empty() {
            out.push_str(&format!("   Category: {}\n", capitalize(&scheme.category)));
        }
        out.push('\n');
    }

    out.push_str(&format!(
        "Reply with a number (1-{}) to see full details.",
        schemes.len()
    ));
    out
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{}...", cut)
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EligibilityRules;

    fn scheme(id: &str, name: &str, description: &str, category: &str) -> Scheme {
        Scheme {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            category: category.to_string(),
            scheme_type: "central".to_string(),
            benefits: String::new(),
            how_to_apply: String::new(),
            url: String::new(),
            eligibility: EligibilityRules::default(),
        }
    }

    fn bot() -> SchemeBot {
        let catalog = Arc::new(Catalog::from_schemes(vec![
            scheme(
                "pm-kisan",
                "PM-KISAN Samman Nidhi",
                "Income support for farmers",
                "agriculture",
            ),
            scheme(
                "pmjay",
                "Ayushman Bharat",
                "Health insurance cover",
                "health",
            ),
            scheme(
                "post-matric",
                "Post Matric Scholarship",
                "Scholarship for students",
                "education",
            ),
        ]));
        let index = Arc::new(SearchIndex::build(Arc::clone(&catalog)));
        SchemeBot::new(catalog, index, ConversationMemory::default())
    }

    #[test]
    fn test_empty_message_is_prompted() {
        let bot = bot();
        let reply = bot.respond("   ", "s1");
        assert!(reply.contains("type your question"));
        // An empty message does not count as a turn.
        assert_eq!(bot.memory().get_turn_count("s1"), 0);
    }

    #[test]
    fn test_message_updates_session_profile() {
        let bot = bot();
        bot.respond("I am a 25 year old farmer from Bihar", "s1");

        let info = bot.memory().get_user_info("s1");
        assert_eq!(info.age, Some(25));
        assert_eq!(info.state.as_deref(), Some("Bihar"));
        assert_eq!(info.occupation.as_deref(), Some("farmer"));
    }

    #[test]
    fn test_recommendation_uses_accumulated_profile() {
        let bot = bot();
        bot.respond("I am a 25 year old farmer from Bihar", "s1");
        let reply = bot.respond("recommend schemes for me", "s1");

        assert!(reply.contains("Based on your profile"));
        assert!(reply.contains("- Age: 25"));
        assert!(reply.contains("- State: Bihar"));
        assert!(!bot.memory().get_last_schemes("s1").is_empty());
    }

    #[test]
    fn test_recommendation_without_profile_asks_for_info() {
        let bot = bot();
        let reply = bot.respond("recommend schemes for me", "s1");
        assert!(reply.contains("tell me about yourself"));
    }

    #[test]
    fn test_selection_after_list() {
        let bot = bot();
        bot.respond("schemes for health", "s1");
        assert!(!bot.memory().get_last_schemes("s1").is_empty());

        let reply = bot.respond("1", "s1");
        assert!(reply.contains("Ayushman Bharat"));
    }

    #[test]
    fn test_reset_clears_session() {
        let bot = bot();
        bot.respond("I am a 25 year old farmer from Bihar", "s1");
        bot.respond("reset", "s1");

        // The reset reply itself is recorded on the fresh session.
        assert_eq!(bot.memory().get_turn_count("s1"), 1);
        assert!(bot.memory().get_user_info("s1").is_empty());
    }

    #[test]
    fn test_my_info_reports_collected_fields() {
        let bot = bot();
        bot.respond("I am a 25 year old farmer from Bihar", "s1");
        let reply = bot.respond("my info", "s1");

        assert!(reply.contains("- Age: 25"));
        assert!(reply.contains("- State: Bihar"));
        assert!(reply.contains("- Occupation: farmer"));
    }

    #[test]
    fn test_greeting_fallback() {
        let bot = bot();
        let reply = bot.respond("hello", "s1");
        assert!(reply.contains("Namaste"));
    }

    #[test]
    fn test_categories_command_lists_counts() {
        let bot = bot();
        let reply = bot.respond("categories", "s1");
        assert!(reply.contains("Agriculture (1 schemes)"));
        assert!(reply.contains("Health (1 schemes)"));
    }

    #[test]
    fn test_compare_two_schemes() {
        let bot = bot();
        let reply = bot.respond("compare pm-kisan and ayushman", "s1");
        assert!(reply.contains("Scheme comparison"));
        assert_eq!(bot.memory().get_last_schemes("s1").len(), 2);
    }

    #[test]
    fn test_intent_recorded_per_turn() {
        let bot = bot();
        bot.respond("help", "s1");
        assert_eq!(bot.memory().get_last_intent("s1").as_deref(), Some("command"));

        bot.respond("tell me about pm-kisan", "s1");
        assert_eq!(bot.memory().get_last_intent("s1").as_deref(), Some("search"));
    }
}
