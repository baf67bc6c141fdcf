use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::constants::MAX_DISCARDED_TOKEN_CHARS;
use crate::Error;

/// Chart kinds offered by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChartKind {
    /// Word cloud sized by frequency.
    WordCloud,

    /// Bar chart over the ranked words.
    Bar,

    /// Line chart over the ranked words.
    Line,

    /// Pie chart, one slice per word.
    Pie,

    /// Scatter plot against the rank position.
    Scatter,
}

impl ChartKind {
    /// Every kind, in the order the UI lists them.
    pub const ALL: [ChartKind; 5] = [
        ChartKind::WordCloud,
        ChartKind::Bar,
        ChartKind::Line,
        ChartKind::Pie,
        ChartKind::Scatter,
    ];

    /// Stable identifier used on the wire and on the command line.
    pub fn slug(self) -> &'static str {
        match self {
            ChartKind::WordCloud => "word-cloud",
            ChartKind::Bar => "bar",
            ChartKind::Line => "line",
            ChartKind::Pie => "pie",
            ChartKind::Scatter => "scatter",
        }
    }

    /// Display label, also used as the chart title.
    pub fn label(self) -> &'static str {
        match self {
            ChartKind::WordCloud => "词云图",
            ChartKind::Bar => "柱状图",
            ChartKind::Line => "折线图",
            ChartKind::Pie => "饼图",
            ChartKind::Scatter => "散点图",
        }
    }
}

impl Default for ChartKind {
    fn default() -> Self {
        ChartKind::WordCloud
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for ChartKind {
    type Err = Error;

    /// Accepts either the slug or the display label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        ChartKind::ALL
            .into_iter()
            .find(|kind| kind.slug().eq_ignore_ascii_case(needle) || kind.label() == needle)
            .ok_or_else(|| Error::InvalidChartKind(s.to_string()))
    }
}

/// Occurrence counts for every qualifying token of one fetched page.
///
/// Keys are trimmed and longer than one character; counts are positive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenFrequencyMap {
    counts: HashMap<String, u64>,
}

impl TokenFrequencyMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one occurrence of `token`.
    ///
    /// Returns `false` (and records nothing) when the trimmed token is too short.
    pub fn record(&mut self, token: &str) -> bool {
        let token = token.trim();
        if !is_countable_token(token) {
            return false;
        }
        *self.counts.entry(token.to_string()).or_insert(0) += 1;
        true
    }

    /// Count for `token`, if present.
    pub fn get(&self, token: &str) -> Option<u64> {
        self.counts.get(token).copied()
    }

    /// Number of distinct tokens.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Largest count in the map, `None` when empty.
    pub fn max_count(&self) -> Option<u64> {
        self.counts.values().copied().max()
    }

    /// Sum of all counts.
    pub fn total_tokens(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Iterate `(token, count)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(token, count)| (token.as_str(), *count))
    }
}

impl FromIterator<(String, u64)> for TokenFrequencyMap {
    /// Build a map from pre-counted pairs. Pairs with a zero count or an
    /// uncountable token are skipped; duplicate tokens are summed.
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        let mut counts = HashMap::new();
        for (token, count) in iter {
            let token = token.trim();
            if count == 0 || !is_countable_token(token) {
                continue;
            }
            *counts.entry(token.to_string()).or_insert(0) += count;
        }
        Self { counts }
    }
}

/// Whether an already-trimmed token is long enough to be counted.
pub fn is_countable_token(token: &str) -> bool {
    token.chars().count() > MAX_DISCARDED_TOKEN_CHARS
}

/// One entry of the ranked top-N list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedWord {
    /// Token text.
    pub word: String,

    /// Occurrence count.
    pub count: u64,
}

/// Top-N words meeting a threshold, ordered by count descending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RankedWords(pub Vec<RankedWord>);

impl RankedWords {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RankedWord> {
        self.0.iter()
    }

    /// Token strings in rank order.
    pub fn words(&self) -> Vec<&str> {
        self.0.iter().map(|w| w.word.as_str()).collect()
    }

    /// Counts in rank order.
    pub fn counts(&self) -> Vec<u64> {
        self.0.iter().map(|w| w.count).collect()
    }
}

impl<'a> IntoIterator for &'a RankedWords {
    type Item = &'a RankedWord;
    type IntoIter = std::slice::Iter<'a, RankedWord>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Observable states of one analysis session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionState {
    /// No URL submitted yet.
    Idle,

    /// A URL was submitted but produced no usable tokens.
    FetchedEmpty,

    /// Tokens are available; chart controls are shown.
    Ready,
}

impl Default for SessionState {
    fn default() -> Self {
        SessionState::Idle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chart_kind_parses_slug_and_label() {
        assert_eq!("bar".parse::<ChartKind>().unwrap(), ChartKind::Bar);
        assert_eq!("Word-Cloud".parse::<ChartKind>().unwrap(), ChartKind::WordCloud);
        assert_eq!("饼图".parse::<ChartKind>().unwrap(), ChartKind::Pie);
        for kind in ChartKind::ALL {
            assert_eq!(kind.slug().parse::<ChartKind>().unwrap(), kind);
        }
    }

    #[test]
    fn chart_kind_rejects_unknown_value() {
        let err = "radar".parse::<ChartKind>().expect_err("radar is not offered");
        assert!(matches!(err, Error::InvalidChartKind(ref v) if v == "radar"));
    }

    #[test]
    fn chart_kind_serializes_as_slug() {
        let json = serde_json::to_string(&ChartKind::WordCloud).unwrap();
        assert_eq!(json, "\"word-cloud\"");
        let kind: ChartKind = serde_json::from_str("\"scatter\"").unwrap();
        assert_eq!(kind, ChartKind::Scatter);
    }

    #[test]
    fn frequency_map_skips_short_tokens() {
        let mut map = TokenFrequencyMap::new();
        assert!(map.record(" 分析 "));
        assert!(map.record("分析"));
        assert!(!map.record("的"));
        assert!(!map.record("  "));
        assert!(!map.record(" a\n"));

        assert_eq!(map.len(), 1);
        assert_eq!(map.get("分析"), Some(2));
        assert_eq!(map.max_count(), Some(2));
        assert_eq!(map.total_tokens(), 2);
    }

    #[test]
    fn frequency_map_from_pairs_sums_duplicates() {
        let map: TokenFrequencyMap = vec![
            ("文本".to_string(), 3),
            ("文本 ".to_string(), 2),
            ("x".to_string(), 9),
            ("测试".to_string(), 0),
        ]
        .into_iter()
        .collect();

        assert_eq!(map.len(), 1);
        assert_eq!(map.get("文本"), Some(5));
        assert_eq!(map.get("测试"), None);
    }

    #[test]
    fn empty_map_has_no_max() {
        let map = TokenFrequencyMap::new();
        assert!(map.is_empty());
        assert_eq!(map.max_count(), None);
    }
}
