//! Key helpers

/// Separator between key segments
pub const KEY_SEPARATOR: &str = ":";

/// Join key segments with `:`
///
/// ```rust
/// assert_eq!(swap_cache::make_key(&["results", "sum_1M"]), "results:sum_1M");
/// ```
#[must_use]
pub fn make_key<S: AsRef<str>>(parts: &[S]) -> String {
    parts
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(KEY_SEPARATOR)
}
