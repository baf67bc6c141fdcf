use serde::{Deserialize, Serialize};
use tracing::debug;
use wordlens_core::constants::{DEFAULT_MIN_FREQ, TOP_N};
use wordlens_core::{RankedWord, RankedWords, TokenFrequencyMap};

/// Keep entries with `count >= min_freq`, sort by count descending (ties by
/// token), and truncate to [`TOP_N`].
///
/// An empty result is a normal outcome when the threshold exceeds every count.
pub fn rank(freqs: &TokenFrequencyMap, min_freq: u64) -> RankedWords {
    let mut kept: Vec<RankedWord> = freqs
        .iter()
        .filter(|(_, count)| *count >= min_freq)
        .map(|(word, count)| RankedWord {
            word: word.to_string(),
            count,
        })
        .collect();

    kept.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.word.cmp(&b.word)));
    kept.truncate(TOP_N);

    debug!(min_freq, ranked = kept.len(), "ranked words");
    RankedWords(kept)
}

/// Slider bounds for the frequency threshold of one map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdBounds {
    /// Always 1.
    pub min: u64,
    /// Largest count in the map.
    pub max: u64,
    /// Initial threshold: [`DEFAULT_MIN_FREQ`] clamped into `min..=max`.
    pub initial: u64,
}

impl ThresholdBounds {
    /// Bounds for `freqs`, `None` when the map is empty.
    pub fn for_map(freqs: &TokenFrequencyMap) -> Option<Self> {
        let max = freqs.max_count()?;
        Some(Self {
            min: 1,
            max,
            initial: DEFAULT_MIN_FREQ.clamp(1, max),
        })
    }
}
