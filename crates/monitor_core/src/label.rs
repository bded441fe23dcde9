//! Middle-ellipsis fitting of labels into a bounded width.

pub const ELLIPSIS: &str = "...";

/// Characters kept after the ellipsis, enough for a short file extension.
const KEPT_TAIL: usize = 4;
/// The first cut is made this many characters before the end of the text.
const INITIAL_CUT_FROM_END: usize = 7;

/// Measures the rendered width of a text in the sink's units.
pub trait TextMeasure {
    fn width(&self, text: &str) -> usize;
}

/// One terminal cell per character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellWidth;

impl TextMeasure for CellWidth {
    fn width(&self, text: &str) -> usize {
        text.chars().count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LabelFormatter<M = CellWidth> {
    measure: M,
}

impl LabelFormatter<CellWidth> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<M: TextMeasure> LabelFormatter<M> {
    pub fn with_measure(measure: M) -> Self {
        Self { measure }
    }

    /// Fits `text` into `available`, inserting an ellipsis before the tail.
    ///
    /// Text that already fits is returned unchanged, which makes the
    /// operation idempotent for a fixed width.
    pub fn fit(&self, text: &str, available: usize) -> String {
        if self.measure.width(text) <= available {
            return text.to_string();
        }

        let chars: Vec<char> = text.chars().collect();
        if chars.len() <= INITIAL_CUT_FROM_END {
            return text.to_string();
        }

        let tail: String = chars[chars.len() - KEPT_TAIL..].iter().collect();
        let mut cut = chars.len() - INITIAL_CUT_FROM_END;
        loop {
            let mut candidate: String = chars[..cut].iter().collect();
            candidate.push_str(ELLIPSIS);
            candidate.push_str(&tail);
            if cut == 0 || self.measure.width(&candidate) <= available {
                return candidate;
            }
            cut -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shrinks_one_char_past_the_initial_cut() {
        // Cut starts seven from the end: prefix + "..." + 4 tail chars,
        // so the first candidate is as wide as the input.
        let formatter = LabelFormatter::new();
        let fitted = formatter.fit("abcdefghij.mkv", 13);
        assert_eq!(fitted, "abcdef....mkv");
        assert_eq!(fitted.chars().count(), 13);
    }

    /// Eight units per character, like pixels of a monospace font.
    struct Monospace;

    impl TextMeasure for Monospace {
        fn width(&self, text: &str) -> usize {
            text.chars().count() * 8
        }
    }

    #[test]
    fn custom_measure_scales_width() {
        let formatter = LabelFormatter::with_measure(Monospace);
        assert_eq!(formatter.fit("movie.mkv", 72), "movie.mkv");
        let fitted = formatter.fit("a_rather_long_movie_name.mkv", 80);
        assert!(fitted.chars().count() * 8 <= 80);
        assert!(fitted.ends_with(".mkv"));
    }
}
