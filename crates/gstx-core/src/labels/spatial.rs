//! Spatial proximity matching between label words and value words.

use regex::Regex;

use crate::ocr::Word;

/// Euclidean distance between two box centers.
pub fn euclidean(a: (f64, f64), b: (f64, f64)) -> f64 {
    (a.0 - b.0).hypot(a.1 - b.1)
}

/// The value word closest to `origin`, with the distance to it.
pub fn nearest<'a>(origin: (f64, f64), candidates: &[&'a Word]) -> Option<(&'a Word, f64)> {
    candidates
        .iter()
        .map(|w| (*w, euclidean(origin, w.center())))
        .min_by(|a, b| a.1.total_cmp(&b.1))
}

/// Pair each label word with its nearest value word on the page.
///
/// Both regexes must be anchored: a word counts as a label or a value only
/// when its whole text matches. Pairs further apart than `max_dist` are
/// dropped. Pairs come back in label document order.
pub fn match_label_to_value<'a>(
    words: &'a [Word],
    label_re: &Regex,
    value_re: &Regex,
    max_dist: f64,
) -> Vec<(&'a Word, &'a Word)> {
    let values: Vec<&Word> = words.iter().filter(|w| value_re.is_match(&w.text)).collect();
    if values.is_empty() {
        return Vec::new();
    }

    words
        .iter()
        .filter(|w| label_re.is_match(&w.text))
        .filter_map(|label| {
            let (value, dist) = nearest(label.center(), &values)?;
            (dist < max_dist).then_some((label, value))
        })
        .collect()
}
