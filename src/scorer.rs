use crate::words::TargetSequence;
use itertools::{EitherOrBoth, Itertools};
use std::ops::Range;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Classification {
    Correct,
    Incorrect,
    Pending,
}

/// Classify every char of the flattened target against what has been typed.
///
/// Position `i` is Correct or Incorrect when the user has typed at least
/// `i + 1` chars and Pending otherwise. The separating spaces are ordinary
/// positions. Typed chars past the end of the target are ignored, so the
/// result always has `target.flattened_len()` entries.
pub fn classify(target: &TargetSequence, typed: &str) -> Vec<Classification> {
    target
        .flatten()
        .chars()
        .zip_longest(typed.chars())
        .filter_map(|pair| match pair {
            EitherOrBoth::Both(expected, actual) if expected == actual => {
                Some(Classification::Correct)
            }
            EitherOrBoth::Both(_, _) => Some(Classification::Incorrect),
            EitherOrBoth::Left(_) => Some(Classification::Pending),
            EitherOrBoth::Right(_) => None,
        })
        .collect()
}

/// Collapse a classification sequence into runs of equal classes, each with
/// the char range it covers. Renderers paint one range at a time.
pub fn runs(classifications: &[Classification]) -> Vec<(Classification, Range<usize>)> {
    let mut start = 0;
    classifications
        .iter()
        .copied()
        .dedup_with_count()
        .map(|(len, class)| {
            let range = start..start + len;
            start += len;
            (class, range)
        })
        .collect()
}
