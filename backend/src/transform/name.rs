//! Artist name transformation.
//!
//! Every `o`, upper or lower case, becomes `^`. The rule is fixed.

/// Character written in place of each `o`/`O`.
pub const REPLACEMENT: char = '^';

/// Transform a display name.
///
/// Single pass, one character in, one character out, so the character count
/// never changes.
///
/// # Example
/// ```
/// use areasearch::transform_name;
///
/// assert_eq!(transform_name("Toronto"), "T^r^nt^");
/// assert_eq!(transform_name("OSLO"), "^SL^");
/// ```
pub fn transform_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            'o' | 'O' => REPLACEMENT,
            other => other,
        })
        .collect()
}
