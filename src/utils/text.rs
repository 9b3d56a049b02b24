//! Display-string normalization.

/// Collapse every whitespace run to a single space and trim both ends.
pub fn clean(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Lowercase, filesystem-friendly form of a label (`"REGGIO EMILIA"` -> `"reggio_emilia"`).
pub fn slug(s: &str) -> String {
    s.split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| part.to_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}
