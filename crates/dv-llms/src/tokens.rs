/// Rough token count for a text: one token per four characters, rounded up.
///
/// Only meant for size reporting; the same text always yields the same count.
#[must_use]
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(4)
}
