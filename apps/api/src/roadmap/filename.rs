/// Suggested download name for a role's roadmap.
///
/// Spaces become `_`; ASCII letters, digits, `_` and `-` are kept; everything
/// else is dropped so the name is safe both in a `Content-Disposition` header
/// and on any filesystem.
pub fn derive_filename(role: &str) -> String {
    let stem: String = role
        .chars()
        .filter_map(|c| match c {
            ' ' => Some('_'),
            c if c.is_ascii_alphanumeric() || c == '_' || c == '-' => Some(c),
            _ => None,
        })
        .collect();

    if stem.is_empty() {
        "roadmap.pdf".to_string()
    } else {
        format!("{stem}_roadmap.pdf")
    }
}

/// `Content-Disposition` value that makes browsers save the roadmap.
pub fn attachment_disposition(role: &str) -> String {
    format!("attachment; filename=\"{}\"", derive_filename(role))
}
