use std::collections::HashSet;

fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || ('가'..='힣').contains(&c)
}

/// Lowercase `text`, blank out everything except ASCII word characters and
/// Hangul syllables, and return the distinct whitespace-separated tokens.
#[must_use]
pub fn tokenize(text: &str) -> HashSet<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| if is_token_char(c) || c.is_whitespace() { c } else { ' ' })
        .collect();

    cleaned.split_whitespace().map(str::to_string).collect()
}

/// |A ∩ B| / |A ∪ B|, or 0 when both sets are empty.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn jaccard_similarity(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    if union == 0 {
        return 0.0;
    }
    intersection as f64 / union as f64
}
