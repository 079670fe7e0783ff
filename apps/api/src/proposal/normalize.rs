//! Input normalization for free-text name, technology and tone tokens.
//!
//! Every function is total: absent or blank input yields `None`, never an error.

/// Lowercases, then uppercases the first character only. `"mARIA"` → `"Maria"`.
pub fn normalize_name(raw: Option<&str>) -> Option<String> {
    non_blank(raw).map(capitalize_lowercased)
}

/// Canonical casing for a technology token. Does not check that the result is a
/// known category; see `TechnologyCategory::parse` for that.
pub fn normalize_technology(raw: Option<&str>) -> Option<String> {
    let lower = non_blank(raw)?.to_ascii_lowercase();
    Some(match lower.as_str() {
        "ai" => "AI".to_string(),
        "devops" => "Devops".to_string(),
        _ => capitalize_lowercased(&lower),
    })
}

/// Tone is free text; only the case is folded.
pub fn normalize_tone(raw: Option<&str>) -> Option<String> {
    non_blank(raw).map(str::to_ascii_lowercase)
}

fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

fn capitalize_lowercased(raw: &str) -> String {
    let lower = raw.to_ascii_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}
