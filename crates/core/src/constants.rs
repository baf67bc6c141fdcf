//! Pipeline constants and defaults.

/// Browser identification sent with every page fetch.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36 Edg/131.0.0.0";

/// Maximum number of ranked words handed to the chart renderer.
pub const TOP_N: usize = 20;

/// Tokens must be longer than this many characters after trimming.
pub const MAX_DISCARDED_TOKEN_CHARS: usize = 1;

/// Initial frequency threshold offered by the UI, clamped to the observed maximum.
pub const DEFAULT_MIN_FREQ: u64 = 5;

/// Font size range (px) for word-cloud entries.
pub const WORD_SIZE_RANGE: (u32, u32) = (20, 100);

/// Series name used by the bar, line, and scatter charts.
pub const FREQUENCY_SERIES_NAME: &str = "词频";

/// Default HTTP server port.
pub const DEFAULT_HTTP_PORT: u16 = 5040;

/// Idle time after which a web session is dropped.
pub const DEFAULT_SESSION_TTL_SECS: u64 = 60 * 60;

/// Live web sessions kept before the least recently used is evicted.
pub const DEFAULT_MAX_SESSIONS: usize = 1024;

/// Default rendered chart height in pixels.
pub const DEFAULT_CHART_HEIGHT: u32 = 600;

/// ECharts runtime loaded by pages that embed charts.
pub const DEFAULT_ECHARTS_JS: &str = "https://cdn.jsdelivr.net/npm/echarts@5.5.1/dist/echarts.min.js";

/// Word-cloud extension for ECharts.
pub const DEFAULT_ECHARTS_WORDCLOUD_JS: &str =
    "https://cdn.jsdelivr.net/npm/echarts-wordcloud@2.1.0/dist/echarts-wordcloud.min.js";
