//! Chart markup rendering.
//!
//! Every chart is an ECharts option object embedded next to a `<div>` and
//! initialised by an inline script. The page hosting the fragment must load
//! the ECharts runtime (and the word-cloud extension for [`ChartKind::WordCloud`]);
//! [`ChartMarkup::into_page`] produces a standalone document that does so.

use serde_json::{json, Value};
use wordlens_core::config::ChartConfig;
use wordlens_core::constants::{FREQUENCY_SERIES_NAME, WORD_SIZE_RANGE};
use wordlens_core::{ChartKind, RankedWords};

/// Rendered chart ready for embedding.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartMarkup {
    /// Kind that produced this markup.
    pub kind: ChartKind,
    /// DOM id of the chart container.
    pub element_id: String,
    /// ECharts option object.
    pub option: Value,
    /// Container `<div>` plus initialisation script.
    pub fragment: String,
}

impl ChartMarkup {
    /// Wrap the fragment into a complete HTML document that loads the chart runtime.
    pub fn into_page(self, config: &ChartConfig) -> String {
        let mut scripts = format!(
            r#"<script src="{}"></script>"#,
            escape_html(&config.echarts_js)
        );
        if self.kind == ChartKind::WordCloud {
            scripts.push_str(&format!(
                r#"<script src="{}"></script>"#,
                escape_html(&config.echarts_wordcloud_js)
            ));
        }

        format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n{scripts}\n</head>\n<body style=\"margin:0\">\n{fragment}\n</body>\n</html>\n",
            title = self.kind.label(),
            scripts = scripts,
            fragment = self.fragment,
        )
    }
}

/// Renders ranked words as chart markup.
#[derive(Debug, Clone, Default)]
pub struct ChartRenderer {
    config: ChartConfig,
}

impl ChartRenderer {
    pub fn new(config: ChartConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    /// Render `words` as a chart of the given kind.
    pub fn render(&self, kind: ChartKind, words: &RankedWords) -> ChartMarkup {
        let option = chart_option(kind, words);
        let element_id = format!("wordlens-chart-{:016x}", fastrand::u64(..));
        let fragment = format!(
            r#"<div id="{id}" class="wordlens-chart" style="width:100%;height:{height}px;"></div>
<script>
(function () {{
  var chart = echarts.init(document.getElementById("{id}"));
  chart.setOption({option});
  window.addEventListener("resize", function () {{ chart.resize(); }});
}})();
</script>"#,
            id = element_id,
            height = self.config.height_px,
            option = script_safe_json(&option),
        );

        ChartMarkup {
            kind,
            element_id,
            option,
            fragment,
        }
    }

    /// Render straight to a standalone HTML document.
    pub fn render_page(&self, kind: ChartKind, words: &RankedWords) -> String {
        self.render(kind, words).into_page(&self.config)
    }
}

/// Build the ECharts option object for `kind`.
pub fn chart_option(kind: ChartKind, words: &RankedWords) -> Value {
    let title = json!({ "text": kind.label() });
    match kind {
        ChartKind::WordCloud => json!({
            "title": title,
            "tooltip": { "show": true },
            "series": [{
                "type": "wordCloud",
                "shape": "circle",
                "sizeRange": [WORD_SIZE_RANGE.0, WORD_SIZE_RANGE.1],
                "rotationRange": [-90, 90],
                "gridSize": 8,
                "data": name_value_pairs(words),
            }],
        }),
        ChartKind::Bar | ChartKind::Line => {
            let series_type = if kind == ChartKind::Bar { "bar" } else { "line" };
            json!({
                "title": title,
                "tooltip": { "trigger": "axis" },
                "legend": { "data": [FREQUENCY_SERIES_NAME] },
                "xAxis": { "type": "category", "data": words.words() },
                "yAxis": { "type": "value" },
                "series": [{
                    "name": FREQUENCY_SERIES_NAME,
                    "type": series_type,
                    "data": words.counts(),
                }],
            })
        }
        ChartKind::Pie => json!({
            "title": title,
            "tooltip": { "trigger": "item" },
            "legend": { "type": "scroll", "orient": "vertical", "right": 10, "top": 40 },
            "series": [{
                "type": "pie",
                "radius": "60%",
                "data": name_value_pairs(words),
            }],
        }),
        // Tokens are not numeric, so x is the rank position.
        ChartKind::Scatter => {
            let points: Vec<[u64; 2]> = words
                .iter()
                .enumerate()
                .map(|(i, w)| [i as u64, w.count])
                .collect();
            json!({
                "title": title,
                "tooltip": { "trigger": "item" },
                "legend": { "data": [FREQUENCY_SERIES_NAME] },
                "xAxis": { "type": "value" },
                "yAxis": { "type": "value" },
                "series": [{
                    "name": FREQUENCY_SERIES_NAME,
                    "type": "scatter",
                    "data": points,
                }],
            })
        }
    }
}

fn name_value_pairs(words: &RankedWords) -> Vec<Value> {
    words
        .iter()
        .map(|w| json!({ "name": w.word, "value": w.count }))
        .collect()
}

/// Serialize for an inline `<script>`: a literal `</` would close the element.
fn script_safe_json(value: &Value) -> String {
    value.to_string().replace("</", "<\\/")
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
