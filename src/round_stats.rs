use crate::words::TargetSequence;

/// Chars per "word" in the words-per-minute approximation
pub const CHARS_PER_WORD: f64 = 5.0;

/// Score of one finished round
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundStats {
    pub total_characters: usize,
    pub correct_characters: usize,
    /// Percentage in 0..=100
    pub accuracy: f64,
    pub wpm: f64,
}

impl RoundStats {
    /// Score `typed` against `target` for a round lasting `duration_secs`.
    ///
    /// Typed text is split on single spaces and paired word-by-word with the
    /// target. Each pair is compared up to the shorter of the two; a typed
    /// word shorter than its target also counts the separator position.
    /// Unpaired words on either side are not counted.
    pub fn compute(target: &TargetSequence, typed: &str, duration_secs: f64) -> Self {
        let mut typed_words: Vec<&str> = typed.split(' ').collect();
        // a trailing separator does not start a new word
        while typed_words.last().is_some_and(|w| w.is_empty()) {
            typed_words.pop();
        }

        let mut total_characters = 0;
        let mut correct_characters = 0;

        for (typed_word, target_word) in typed_words.iter().zip(target.words()) {
            for (actual, expected) in typed_word.chars().zip(target_word.chars()) {
                total_characters += 1;
                if actual == expected {
                    correct_characters += 1;
                }
            }

            if typed_word.chars().count() < target_word.chars().count() {
                total_characters += 1;
            }
        }

        let accuracy = if total_characters == 0 {
            0.0
        } else {
            100.0 * correct_characters as f64 / total_characters as f64
        };

        let wpm = if duration_secs > 0.0 {
            (total_characters as f64 / CHARS_PER_WORD) / (duration_secs / 60.0)
        } else {
            0.0
        };

        Self {
            total_characters,
            correct_characters,
            accuracy,
            wpm,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(words: &[&str]) -> TargetSequence {
        TargetSequence::new(words.iter().map(|w| w.to_string()).collect())
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn nothing_typed_scores_zero() {
        let stats = RoundStats::compute(&target(&["cat", "dog"]), "", 10.0);

        assert_eq!(stats.total_characters, 0);
        assert_eq!(stats.correct_characters, 0);
        assert_eq!(stats.accuracy, 0.0);
        assert_eq!(stats.wpm, 0.0);
        assert!(!stats.accuracy.is_nan());
    }

    #[test]
    fn first_word_only() {
        let stats = RoundStats::compute(&target(&["cat", "dog"]), "cat", 10.0);

        assert_eq!(stats.total_characters, 3);
        assert_eq!(stats.correct_characters, 3);
        assert!(approx(stats.accuracy, 100.0));
        assert!(approx(stats.wpm, 3.6));
    }

    #[test]
    fn perfect_round() {
        let stats = RoundStats::compute(&target(&["cat", "dog"]), "cat dog", 10.0);

        assert_eq!(stats.total_characters, 6);
        assert_eq!(stats.correct_characters, 6);
        assert!(approx(stats.accuracy, 100.0));
        assert!(approx(stats.wpm, 7.2));
    }

    #[test]
    fn mistakes_lower_accuracy() {
        let stats = RoundStats::compute(&target(&["cat", "dog"]), "cxt dgg", 10.0);

        assert_eq!(stats.total_characters, 6);
        assert_eq!(stats.correct_characters, 4);
        assert!(approx(stats.accuracy, 400.0 / 6.0));
    }

    #[test]
    fn short_word_counts_the_separator() {
        let stats = RoundStats::compute(&target(&["horse", "dog"]), "hor dog", 10.0);

        // 3 compared + 1 separator for "hor", 3 compared for "dog"
        assert_eq!(stats.total_characters, 7);
        assert_eq!(stats.correct_characters, 6);
    }

    #[test]
    fn long_word_extra_chars_are_ignored() {
        let stats = RoundStats::compute(&target(&["cat"]), "catalog", 10.0);

        assert_eq!(stats.total_characters, 3);
        assert_eq!(stats.correct_characters, 3);
    }

    #[test]
    fn words_beyond_target_are_ignored() {
        let stats = RoundStats::compute(&target(&["cat"]), "cat dog bird", 10.0);
        assert_eq!(stats.total_characters, 3);
    }

    #[test]
    fn trailing_space_is_not_a_word() {
        let with_space = RoundStats::compute(&target(&["cat", "dog"]), "cat ", 10.0);
        let without = RoundStats::compute(&target(&["cat", "dog"]), "cat", 10.0);
        assert_eq!(with_space, without);
    }

    #[test]
    fn double_space_pairs_an_empty_word() {
        // "cat" + "" + "dog": the empty word is short of "dog" by its separator
        let stats = RoundStats::compute(&target(&["cat", "dog", "owl"]), "cat  dog", 10.0);

        assert_eq!(stats.total_characters, 3 + 1 + 3);
        assert_eq!(stats.correct_characters, 3);
    }

    #[test]
    fn wpm_scales_with_duration() {
        let t = target(&["cat", "dog"]);
        let ten = RoundStats::compute(&t, "cat dog", 10.0);
        let sixty = RoundStats::compute(&t, "cat dog", 60.0);

        assert!(approx(ten.wpm, sixty.wpm * 6.0));
        assert!(approx(sixty.wpm, 6.0 / CHARS_PER_WORD));
    }

    #[test]
    fn non_positive_duration_has_zero_wpm() {
        let stats = RoundStats::compute(&target(&["cat"]), "cat", 0.0);
        assert_eq!(stats.wpm, 0.0);
    }
}
