//! Input validation for question and template content

/// Validates free-form question or template content.
///
/// Content must be non-empty, at most `max_len` bytes, and free of control
/// characters. Non-ASCII text is accepted: templates delimit their fields
/// with U+241F (SYMBOL FOR UNIT SEPARATOR).
///
/// # Examples
/// ```
/// use bonded_oracle::utils::validation::validate_content;
///
/// assert!(validate_content("Will it rain?\u{241f}weather\u{241f}en", 64));
/// assert!(!validate_content("", 64));
/// assert!(!validate_content("line\nbreak", 64));
/// ```
pub fn validate_content(s: &str, max_len: usize) -> bool {
    !s.is_empty() && s.len() <= max_len && !s.chars().any(char::is_control)
}
