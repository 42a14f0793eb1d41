//! Name normalization shared by the builder and the lookup service.
//!
//! Keys written into the catalog and keys computed from user queries must go
//! through the same function, otherwise lookups silently miss.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::card::Card;

/// Map a display name to its canonical search key.
///
/// Lowercases, decomposes to NFD and drops combining marks, then trims.
/// Letters without a decomposition (such as `Æ`) are only lowercased.
///
/// Lowercasing comes first because it can itself emit combining marks
/// (`İ` becomes `i` plus U+0307). Trimming comes last because dropping a
/// mark can expose whitespace.
pub fn normalize(name: &str) -> String {
    name.to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .trim()
        .to_string()
}

/// The normalized name stored on a converted card.
pub fn normalized_name(card: &Card) -> &str {
    &card.name_lower
}
