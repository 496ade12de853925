use regex::Regex;

/// Cleans segment text pulled out of pretty-printed markup.
pub struct TextNormalizer {
    whitespace: Regex,
    collapse: bool,
}

impl TextNormalizer {
    pub fn new(collapse: bool) -> Self {
        Self {
            whitespace: Regex::new(r"\s+").expect("whitespace pattern is valid"),
            collapse,
        }
    }

    /// Trim the text and, when enabled, collapse inner whitespace runs
    pub fn normalize(&self, text: &str) -> String {
        let trimmed = text.trim();
        if !self.collapse {
            return trimmed.to_string();
        }

        // `\s` is Unicode-aware, so non-breaking spaces collapse too
        self.whitespace.replace_all(trimmed, " ").into_owned()
    }

    pub fn collapses(&self) -> bool {
        self.collapse
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_mode_only_trims() {
        let normalizer = TextNormalizer::default();

        assert_eq!(
            normalizer.normalize("  Il ricorso\n   è infondato  "),
            "Il ricorso\n   è infondato"
        );
    }

    #[test]
    fn test_collapse_mode() {
        let normalizer = TextNormalizer::new(true);

        assert_eq!(
            normalizer.normalize("\n\tIl  ricorso\n\n è\u{a0}infondato "),
            "Il ricorso è infondato"
        );
        assert_eq!(normalizer.normalize("   "), "");
    }
}
