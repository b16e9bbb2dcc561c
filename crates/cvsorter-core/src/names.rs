//! Candidate name normalization.
//!
//! Names typed into a spreadsheet and names used as PDF filenames rarely
//! agree on case, spacing or punctuation. Both sides are reduced to the
//! same key before matching.

/// Canonicalize a candidate name into a matching key.
///
/// Lower-cases the input, keeps Unicode letters, digits, underscores and
/// whitespace, drops every other character, collapses whitespace runs into
/// one space and trims both ends. Lower-casing comes first so that combining
/// marks produced by case mapping are stripped too.
///
/// Filtering before lower-casing would keep such marks: `İ` lower-cases to
/// `i` plus U+0307, so keys written that way (`"i\u{307}"`) differ from the
/// ones produced here (`"i"`).
///
/// ```
/// use cvsorter_core::normalize;
///
/// assert_eq!(normalize("  John   O'Brien!! "), "john obrien");
/// ```
#[must_use]
pub fn normalize(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();

    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}
