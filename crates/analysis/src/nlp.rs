use jieba_rs::Jieba;
use once_cell::sync::Lazy;
use std::sync::Arc;
use tracing::debug;
use wordlens_core::TokenFrequencyMap;

/// Dictionary load is expensive; every segmenter shares one instance.
static SHARED_JIEBA: Lazy<Arc<Jieba>> = Lazy::new(|| Arc::new(Jieba::new()));

/// Splits unspaced text into word tokens.
pub trait Segmenter: Send + Sync {
    /// Segment `text` into tokens borrowed from it, in order.
    fn segment<'a>(&self, text: &'a str) -> Vec<&'a str>;
}

/// Chinese text segmenter using jieba-rs.
#[derive(Clone)]
pub struct JiebaSegmenter {
    jieba: Arc<Jieba>,
}

impl JiebaSegmenter {
    /// Create a segmenter backed by the shared default dictionary.
    pub fn new() -> Self {
        Self {
            jieba: Arc::clone(&SHARED_JIEBA),
        }
    }
}

impl Default for JiebaSegmenter {
    fn default() -> Self {
        Self::new()
    }
}

impl Segmenter for JiebaSegmenter {
    /// Dictionary cut with HMM enabled for unknown words.
    fn segment<'a>(&self, text: &'a str) -> Vec<&'a str> {
        self.jieba.cut(text, true)
    }
}

/// Turns raw text into a [`TokenFrequencyMap`].
#[derive(Clone)]
pub struct WordCounter {
    segmenter: Arc<dyn Segmenter>,
}

impl WordCounter {
    /// Counter using the jieba segmenter.
    pub fn new() -> Self {
        Self::with_segmenter(JiebaSegmenter::new())
    }

    /// Counter using a custom segmenter.
    pub fn with_segmenter(segmenter: impl Segmenter + 'static) -> Self {
        Self {
            segmenter: Arc::new(segmenter),
        }
    }

    /// Segment `text` and count every token longer than one character
    /// after trimming. Empty text yields an empty map.
    pub fn count(&self, text: &str) -> TokenFrequencyMap {
        let mut counts = TokenFrequencyMap::new();
        if text.trim().is_empty() {
            return counts;
        }

        let tokens = self.segmenter.segment(text);
        let segmented = tokens.len();
        for token in tokens {
            counts.record(token);
        }

        debug!(
            segmented,
            distinct = counts.len(),
            kept = counts.total_tokens(),
            "counted tokens"
        );
        counts
    }
}

impl Default for WordCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for WordCounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WordCounter").finish_non_exhaustive()
    }
}
