/// Trigger words per scheme category. A query containing any trigger adds
/// relevance to every scheme of that category.
pub(crate) const CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "agriculture",
        &["farm", "kisan", "crop", "agriculture", "farming", "farmer"],
    ),
    (
        "health",
        &["health", "hospital", "medical", "doctor", "ayushman", "treatment"],
    ),
    (
        "education",
        &["education", "school", "college", "student", "scholarship", "study"],
    ),
    (
        "housing",
        &["house", "housing", "home", "awas", "shelter", "building"],
    ),
    (
        "finance",
        &["loan", "money", "bank", "credit", "mudra", "finance", "business"],
    ),
    (
        "women",
        &["women", "woman", "girl", "female", "mahila", "beti"],
    ),
    (
        "pension",
        &["pension", "retirement", "old age", "senior", "elderly"],
    ),
    ("insurance", &["insurance", "bima", "cover", "protection"]),
    (
        "employment",
        &["job", "employment", "work", "skill", "training", "rozgar"],
    ),
    (
        "sanitation",
        &["toilet", "sanitation", "swachh", "clean", "water"],
    ),
];
