//! Encoding of the user's self-reported skills in the `profile.skills` column.

use std::collections::HashSet;

/// Decodes the stored skills column.
///
/// The column holds a JSON array of strings. `None`, an empty string, invalid
/// JSON, or JSON of any other shape all decode to an empty list; malformed
/// rows never fail a request.
pub fn parse_skills(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return Vec::new();
    };
    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(skills) => skills,
        Err(e) => {
            tracing::warn!("Ignoring malformed stored skills: {e}");
            Vec::new()
        }
    }
}

/// Trims names, drops blanks and repeats (first occurrence wins).
pub fn normalize_skills(skills: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    skills
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .filter(|s| seen.insert(s.to_string()))
        .map(str::to_string)
        .collect()
}

/// Encodes skills for storage; the inverse of `parse_skills`.
pub fn encode_skills(skills: &[String]) -> String {
    serde_json::Value::from(skills.to_vec()).to_string()
}
