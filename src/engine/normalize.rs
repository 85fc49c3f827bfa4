use icu_normalizer::DecomposingNormalizerBorrowed;
use icu_properties::CodePointMapData;
use icu_properties::props::GeneralCategory;

/// Canonical comparison form: trimmed, lower-cased, diacritics removed.
///
/// Decomposes to NFD and drops the combining marks, so `"Vazný "` becomes
/// `"vazny"`. Applying it twice is a no-op.
pub fn normalize(text: &str) -> String {
    let lowered = text.trim().to_lowercase();
    let nfd = DecomposingNormalizerBorrowed::new_nfd();
    nfd.normalize(&lowered)
        .chars()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

/// Split a comma-separated term into normalized, non-empty parts.
pub fn split_terms(text: &str) -> Vec<String> {
    text.split(',')
        .map(normalize)
        .filter(|part| !part.is_empty())
        .collect()
}

fn is_combining_mark(c: char) -> bool {
    CodePointMapData::<GeneralCategory>::new().get(c) == GeneralCategory::NonspacingMark
}
