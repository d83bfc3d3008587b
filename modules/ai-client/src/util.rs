/// Truncate a string to at most `max_bytes` bytes at a character boundary.
pub fn truncate_to_char_boundary(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) && end > 0 {
        end -= 1;
    }
    &s[..end]
}

/// Shorten a body for log output, marking when something was cut.
pub(crate) fn preview(body: &str, max_bytes: usize) -> String {
    let cut = truncate_to_char_boundary(body, max_bytes);
    if cut.len() < body.len() {
        format!("{cut}... (truncated)")
    } else {
        cut.to_string()
    }
}
