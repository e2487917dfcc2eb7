// SPDX-License-Identifier: MPL-2.0
//! Cell text normalization and tokenization for mixed Latin/Han input.
//!
//! Every character other than a Han ideograph (U+4E00..=U+9FA5), an ASCII
//! letter or an ASCII digit becomes a separator. Contiguous Han runs are
//! segmented into dictionary words with jieba; everything else splits on
//! whitespace. Tokens are lowercased.
//!
//! No stopword list is applied unless the caller provides one.

use crate::domain::CellValue;
use jieba_rs::Jieba;
use std::collections::HashSet;
use std::fmt;

/// Returns `true` for characters kept by normalization.
fn is_kept(c: char) -> bool {
    ('\u{4e00}'..='\u{9fa5}').contains(&c) || c.is_ascii_alphanumeric()
}

/// Returns `true` for characters that trigger dictionary segmentation.
fn is_han(c: char) -> bool {
    ('\u{4e00}'..='\u{9fff}').contains(&c)
}

/// Replaces every character that is not Han, an ASCII letter or an ASCII
/// digit with a space.
#[must_use]
pub fn normalize(text: &str) -> String {
    text.chars().map(|c| if is_kept(c) { c } else { ' ' }).collect()
}

/// Splits normalized text into runs of Han and non-Han characters.
fn script_runs(text: &str) -> Vec<(bool, &str)> {
    let mut runs = Vec::new();
    let mut start = 0;
    let mut current: Option<bool> = None;
    for (pos, c) in text.char_indices() {
        let han = is_han(c);
        match current {
            Some(kind) if kind != han => {
                runs.push((kind, &text[start..pos]));
                start = pos;
                current = Some(han);
            }
            None => current = Some(han),
            _ => {}
        }
    }
    if let Some(kind) = current {
        runs.push((kind, &text[start..]));
    }
    runs
}

/// Turns cell values into normalized tokens.
pub struct Tokenizer {
    jieba: Jieba,
    stopwords: HashSet<String>,
}

impl Tokenizer {
    /// Creates a tokenizer with the default segmentation dictionary and no
    /// stopwords.
    #[must_use]
    pub fn new() -> Self {
        Self {
            jieba: Jieba::new(),
            stopwords: HashSet::new(),
        }
    }

    /// Removes these tokens from every result. Matching is case-insensitive.
    #[must_use]
    pub fn with_stopwords<I, S>(mut self, stopwords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.stopwords
            .extend(stopwords.into_iter().map(|s| s.as_ref().to_lowercase()));
        self
    }

    /// Adds words to the segmentation dictionary so they are kept whole.
    #[must_use]
    pub fn with_user_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for word in words {
            let word = word.as_ref().trim();
            if !word.is_empty() {
                self.jieba.add_word(word, None, None);
            }
        }
        self
    }

    /// Tokenizes one cell. Empty cells yield no tokens.
    #[must_use]
    pub fn tokenize(&self, value: &CellValue) -> Vec<String> {
        match value {
            CellValue::Empty => Vec::new(),
            CellValue::Text(text) => self.tokenize_text(text),
            CellValue::Number(_) => value
                .as_text()
                .map(|text| self.tokenize_text(&text))
                .unwrap_or_default(),
        }
    }

    /// Tokenizes raw text.
    #[must_use]
    pub fn tokenize_text(&self, text: &str) -> Vec<String> {
        let normalized = normalize(text);
        let pieces: Vec<&str> = if normalized.chars().any(is_han) {
            script_runs(&normalized)
                .into_iter()
                .flat_map(|(han, run)| {
                    if han {
                        self.jieba.cut(run, true)
                    } else {
                        run.split_whitespace().collect()
                    }
                })
                .collect()
        } else {
            normalized.split_whitespace().collect()
        };

        pieces
            .into_iter()
            .flat_map(str::split_whitespace)
            .map(str::to_lowercase)
            .filter(|token| !token.is_empty() && !self.stopwords.contains(token))
            .collect()
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Tokenizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tokenizer")
            .field("stopwords", &self.stopwords.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mixed_script_keeps_latin_token_and_segments_han() {
        let tokenizer = Tokenizer::new();
        let tokens = tokenizer.tokenize(&CellValue::from("你好世界 hello123"));

        assert!(tokens.contains(&"hello123".to_string()));
        let han: Vec<&String> = tokens.iter().filter(|t| t.chars().all(is_han)).collect();
        assert!(!han.is_empty());
        // Dictionary segmentation yields multi-character words
        assert!(han.iter().any(|t| t.chars().count() > 1));
        let rejoined: String = han.iter().map(|t| t.as_str()).collect();
        assert_eq!(rejoined, "你好世界");
    }

    #[test]
    fn punctuation_becomes_separator() {
        let tokenizer = Tokenizer::new();
        assert_eq!(
            tokenizer.tokenize_text("Hello, World! It's-fine."),
            vec!["hello", "world", "it", "s", "fine"]
        );
    }

    #[test]
    fn full_width_punctuation_is_stripped() {
        let tokenizer = Tokenizer::new();
        let tokens = tokenizer.tokenize_text("好，好。");
        assert!(tokens.iter().all(|t| t.chars().all(is_han)));
        assert_eq!(tokens.concat(), "好好");
    }

    #[test]
    fn empty_cell_yields_nothing() {
        let tokenizer = Tokenizer::new();
        assert!(tokenizer.tokenize(&CellValue::Empty).is_empty());
        assert!(tokenizer.tokenize_text("  ,,, ").is_empty());
    }

    #[test]
    fn numbers_are_kept_as_tokens() {
        let tokenizer = Tokenizer::new();
        assert_eq!(tokenizer.tokenize(&CellValue::Number(2024.0)), vec!["2024"]);
        assert_eq!(tokenizer.tokenize_text("room 101"), vec!["room", "101"]);
    }

    #[test]
    fn fractional_number_splits_on_decimal_point() {
        let tokenizer = Tokenizer::new();
        assert_eq!(tokenizer.tokenize(&CellValue::Number(3.5)), vec!["3", "5"]);
    }

    #[test]
    fn function_words_are_not_filtered_by_default() {
        let tokenizer = Tokenizer::new();
        let tokens = tokenizer.tokenize_text("The cat and the hat");
        assert_eq!(tokens, vec!["the", "cat", "and", "the", "hat"]);
    }

    #[test]
    fn explicit_stopwords_are_removed() {
        let tokenizer = Tokenizer::new().with_stopwords(["The", "and"]);
        let tokens = tokenizer.tokenize_text("The cat and the hat");
        assert_eq!(tokens, vec!["cat", "hat"]);
    }

    #[test]
    fn accented_letters_are_separators() {
        let tokenizer = Tokenizer::new();
        assert_eq!(tokenizer.tokenize_text("café"), vec!["caf"]);
    }

    #[test]
    fn latin_attached_to_han_is_split() {
        let tokenizer = Tokenizer::new();
        let tokens = tokenizer.tokenize_text("abc你好");
        assert_eq!(tokens.first().map(String::as_str), Some("abc"));
        assert_eq!(tokens[1..].concat(), "你好");
    }

    #[test]
    fn user_words_stay_whole() {
        let tokenizer = Tokenizer::new().with_user_words(["词云生成器"]);
        let tokens = tokenizer.tokenize_text("词云生成器");
        assert_eq!(tokens, vec!["词云生成器"]);
    }

    #[test]
    fn script_runs_alternate() {
        let runs = script_runs("ab你好 cd");
        assert_eq!(runs, vec![(false, "ab"), (true, "你好"), (false, " cd")]);
    }
}
