use serde::{Deserialize, Serialize};

/// Fixed gap between finishing a delete and typing the next word, independent of speeds
pub const WORD_ADVANCE_PAUSE_MS: u64 = 300;

const EDGE_CHAR_FACTOR: f64 = 1.2;
const AFTER_PUNCTUATION_FACTOR: f64 = 1.5;
const PUNCTUATION: [char; 6] = ['.', ',', '!', '?', ';', ':'];

/// Per-character delays plus the end-of-word pause, all in milliseconds
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimingProfile {
    pub typing_speed: u64,
    pub deleting_speed: u64,
    pub pause_duration: u64,
}

impl TimingProfile {
    pub const fn desktop() -> Self {
        Self {
            typing_speed: 100,
            deleting_speed: 50,
            pause_duration: 2000,
        }
    }

    pub const fn mobile() -> Self {
        Self {
            typing_speed: 80,
            deleting_speed: 40,
            pause_duration: 1500,
        }
    }
}

impl Default for TimingProfile {
    fn default() -> Self {
        Self::desktop()
    }
}

/// Delay after the character at `index` of `word` has been typed, before the
/// next one appears.
///
/// The first and last characters are slowed by 1.2x; a character that follows
/// punctuation is slowed by 1.5x. Only one factor applies and the edge rule wins.
pub fn calculate_typing_speed(word: &[char], index: usize, base: u64) -> u64 {
    let is_edge = index == 0 || index + 1 == word.len();
    let factor = if is_edge {
        EDGE_CHAR_FACTOR
    } else if index > 0 && word.get(index - 1).is_some_and(|c| PUNCTUATION.contains(c)) {
        AFTER_PUNCTUATION_FACTOR
    } else {
        1.0
    };

    (base as f64 * factor).round() as u64
}
