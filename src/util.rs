//! Small helpers shared by the writers and the solver sessions

/// Characters allowed in .lp names besides ASCII letters and digits
const LP_NAME_SYMBOLS: &str = "!\"#$%&()/,.;?@_`'{}|~";

/// Longest name the .lp format accepts
const MAX_LP_NAME_LEN: usize = 255;

/// Whether a row or column name can be written to, and read back from, an .lp file
///
/// ```
/// use gpx::util::is_valid_lp_name;
///
/// assert!(is_valid_lp_name("x1"));
/// assert!(is_valid_lp_name("COST_ROW.2"));
/// assert!(!is_valid_lp_name("1x")); // names cannot start with a digit
/// assert!(!is_valid_lp_name(".x")); // nor with a period
/// assert!(!is_valid_lp_name("a+b"));
/// assert!(!is_valid_lp_name(""));
/// ```
pub fn is_valid_lp_name(name: &str) -> bool {
    match name.chars().next() {
        None => return false,
        Some(c) if c.is_ascii_digit() || c == '.' => return false,
        _ => {}
    }
    name.len() <= MAX_LP_NAME_LEN
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || LP_NAME_SYMBOLS.contains(c))
}

/// Whether `needle` appears anywhere in `haystack`
pub fn buf_contains(haystack: &[u8], needle: &str) -> bool {
    let needle = needle.as_bytes();
    if needle.is_empty() {
        return true;
    }
    haystack
        .windows(needle.len())
        .any(|window| window == needle)
}
