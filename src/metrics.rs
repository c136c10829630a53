//! Prompt quality metrics
//!
//! Token counts come from the cl100k_base BPE encoding; readability is
//! the Flesch-Kincaid grade level. Metrics are informational only, so
//! they never fail a request: if the tokenizer cannot be constructed,
//! zeroed metrics stand in.

use std::sync::OnceLock;

use serde::Deserialize;
use serde::Serialize;
use tiktoken_rs::cl100k_base;
use tiktoken_rs::CoreBPE;
use tracing::warn;

/// Size and readability measurements for one prompt text
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PromptMetrics {
    pub token_count: usize,
    pub readability_score: f64,
}

impl PromptMetrics {
    /// The fallback metrics used when measurement is impossible
    #[must_use]
    pub const fn zeroed() -> Self {
        Self {
            token_count: 0,
            readability_score: 0.0,
        }
    }
}

static TOKENIZER: OnceLock<Option<CoreBPE>> = OnceLock::new();

fn tokenizer() -> Option<&'static CoreBPE> {
    TOKENIZER
        .get_or_init(|| match cl100k_base() {
            Ok(bpe) => Some(bpe),
            Err(e) => {
                warn!("cl100k_base tokenizer unavailable: {}", e);
                None
            }
        })
        .as_ref()
}

/// Measure a prompt text
///
/// The tokenizer is built once and reused. A text that cannot be
/// measured yields [`PromptMetrics::zeroed`] rather than an error.
pub fn calculate_metrics(text: &str) -> PromptMetrics {
    match tokenizer() {
        Some(bpe) => PromptMetrics {
            token_count: bpe.encode_with_special_tokens(text).len(),
            readability_score: flesch_kincaid_grade(text),
        },
        None => PromptMetrics::zeroed(),
    }
}

/// Flesch-Kincaid grade level of a text
///
/// Sentences are runs of `.`, `!` or `?`; words are whitespace-separated;
/// syllables use a vowel-group heuristic with a silent-e adjustment.
/// Empty text scores 0.
pub fn flesch_kincaid_grade(text: &str) -> f64 {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return 0.0;
    }

    let mut sentences = 0usize;
    let mut in_terminator = false;
    for c in text.chars() {
        let is_terminator = matches!(c, '.' | '!' | '?');
        if is_terminator && !in_terminator {
            sentences += 1;
        }
        in_terminator = is_terminator;
    }
    let sentences = sentences.max(1);

    let syllables: usize = words.iter().map(|w| count_syllables(w)).sum();
    let word_count = words.len() as f64;

    0.39 * (word_count / sentences as f64) + 11.8 * (syllables as f64 / word_count) - 15.59
}

fn count_syllables(word: &str) -> usize {
    let cleaned: String = word
        .chars()
        .filter(char::is_ascii_alphabetic)
        .collect::<String>()
        .to_lowercase();

    let mut count = 0usize;
    let mut prev_vowel = false;
    for c in cleaned.chars() {
        let is_vowel = matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y');
        if is_vowel && !prev_vowel {
            count += 1;
        }
        prev_vowel = is_vowel;
    }

    // Trailing silent e, except in -le endings
    if cleaned.ends_with('e') && !cleaned.ends_with("le") && count > 1 {
        count -= 1;
    }

    count.max(1)
}
