pub const ELLIPSIS: &str = "...";

/// Shorten `word` to its first `max_len` characters plus an ellipsis when it is longer.
pub fn truncate_word(word: &str, max_len: usize) -> String {
    if word.chars().count() <= max_len {
        return word.to_string();
    }
    let mut out: String = word.chars().take(max_len).collect();
    out.push_str(ELLIPSIS);
    out
}

/// Ordered words for one widget, with the original kept aside while a
/// truncated variant is active.
#[derive(Debug, Clone, PartialEq)]
pub struct WordList {
    active: Vec<String>,
    original: Option<Vec<String>>,
}

impl WordList {
    pub fn new(words: Vec<String>) -> Self {
        Self {
            active: words,
            original: None,
        }
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&str> {
        self.active.get(idx).map(String::as_str)
    }

    pub fn active(&self) -> &[String] {
        &self.active
    }

    /// The full, untruncated words regardless of which variant is active.
    pub fn original(&self) -> &[String] {
        self.original.as_deref().unwrap_or(&self.active)
    }

    pub fn is_truncated(&self) -> bool {
        self.original.is_some()
    }

    /// Activate the truncated variant, caching the original on first use.
    /// Truncation is always derived from the cached original.
    pub fn use_truncated(&mut self, max_len: usize) {
        let original = self.original.get_or_insert_with(|| self.active.clone());
        self.active = original.iter().map(|w| truncate_word(w, max_len)).collect();
    }

    /// Swap the cached original back in, if one was cached.
    pub fn use_original(&mut self) {
        if let Some(original) = self.original.take() {
            self.active = original;
        }
    }

    /// Widest active word in terminal cells
    pub fn max_width(&self) -> usize {
        use unicode_width::UnicodeWidthStr;
        self.active.iter().map(|w| w.width()).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(words: &[&str]) -> WordList {
        WordList::new(words.iter().map(|w| w.to_string()).collect())
    }

    #[test]
    fn truncate_long_word() {
        let w = "abcdefghijklmnopqrstuvwxy";
        assert_eq!(w.len(), 25);
        assert_eq!(truncate_word(w, 20), "abcdefghijklmnopqrst...");
    }

    #[test]
    fn truncate_keeps_short_and_exact_words() {
        assert_eq!(truncate_word("short", 20), "short");
        assert_eq!(truncate_word("abcde", 5), "abcde");
    }

    #[test]
    fn truncate_counts_chars_not_bytes() {
        assert_eq!(truncate_word("héllo wörld", 4), "héll...");
    }

    #[test]
    fn truncated_variant_restores_original_exactly() {
        let long = "abcdefghijklmnopqrstuvwxy";
        let mut words = list(&["Rust", long]);
        words.use_truncated(20);
        assert!(words.is_truncated());
        assert_eq!(words.get(1), Some("abcdefghijklmnopqrst..."));
        assert_eq!(words.original()[1], long);

        words.use_original();
        assert!(!words.is_truncated());
        assert_eq!(words.active(), &["Rust".to_string(), long.to_string()]);
    }

    #[test]
    fn repeated_truncation_does_not_compound() {
        let mut words = list(&["abcdefghij"]);
        words.use_truncated(4);
        words.use_truncated(4);
        assert_eq!(words.get(0), Some("abcd..."));
        words.use_truncated(6);
        assert_eq!(words.get(0), Some("abcdef..."));
    }

    #[test]
    fn restore_without_cache_is_noop() {
        let mut words = list(&["a", "b"]);
        words.use_original();
        assert_eq!(words.len(), 2);
        assert!(!words.is_truncated());
    }

    #[test]
    fn max_width_of_empty_list() {
        assert_eq!(WordList::new(vec![]).max_width(), 0);
        assert_eq!(list(&["ab", "abcd"]).max_width(), 4);
    }
}
