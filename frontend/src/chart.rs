use crate::capture::describe_js_error;
use serde_json::{Value, json};
use shared::Prediction;
use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

const TOP_COLOR: (u8, u8, u8) = (40, 167, 69);
const RUNNER_UP_COLOR: (u8, u8, u8) = (255, 193, 7);
const OTHER_COLOR: (u8, u8, u8) = (108, 117, 125);

#[wasm_bindgen]
extern "C" {
    /// Chart.js, loaded globally from `index.html`.
    #[wasm_bindgen(js_name = Chart)]
    type ChartJs;

    #[wasm_bindgen(constructor, js_class = "Chart", catch)]
    fn new(canvas: &HtmlCanvasElement, config: &JsValue) -> Result<ChartJs, JsValue>;

    #[wasm_bindgen(method)]
    fn destroy(this: &ChartJs);
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChartBar {
    pub label: String,
    pub value: f32,
    pub color: String,
    pub border_color: String,
}

/// Horizontal bar chart of ranked predictions. Colour depends only on rank.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartSpec {
    pub bars: Vec<ChartBar>,
}

impl ChartSpec {
    pub fn from_predictions(predictions: &[Prediction]) -> Self {
        let bars = predictions
            .iter()
            .enumerate()
            .map(|(rank, prediction)| {
                let (r, g, b) = match rank {
                    0 => TOP_COLOR,
                    1 => RUNNER_UP_COLOR,
                    _ => OTHER_COLOR,
                };
                ChartBar {
                    label: prediction.label.clone(),
                    value: prediction.confidence.percent(),
                    color: format!("rgba({}, {}, {}, 0.8)", r, g, b),
                    border_color: format!("rgba({}, {}, {}, 1)", r, g, b),
                }
            })
            .collect();

        Self { bars }
    }

    pub fn to_config(&self) -> Value {
        let labels: Vec<&str> = self.bars.iter().map(|bar| bar.label.as_str()).collect();
        let values: Vec<f32> = self.bars.iter().map(|bar| bar.value).collect();
        let colors: Vec<&str> = self.bars.iter().map(|bar| bar.color.as_str()).collect();
        let borders: Vec<&str> = self.bars.iter().map(|bar| bar.border_color.as_str()).collect();

        json!({
            "type": "bar",
            "data": {
                "labels": labels,
                "datasets": [{
                    "label": "Confidence (%)",
                    "data": values,
                    "backgroundColor": colors,
                    "borderColor": borders,
                    "borderWidth": 2
                }]
            },
            "options": {
                "responsive": true,
                "maintainAspectRatio": true,
                "indexAxis": "y",
                "plugins": {
                    "legend": { "display": false },
                    "title": { "display": false }
                },
                "scales": {
                    "x": {
                        "beginAtZero": true,
                        "min": 0,
                        "max": 100,
                        "grid": { "color": "rgba(0, 0, 0, 0.05)" }
                    },
                    "y": {
                        "grid": { "display": false },
                        "ticks": { "font": { "size": 12 } }
                    }
                },
                "animation": { "duration": 1000, "easing": "easeInOutQuart" }
            }
        })
    }
}

/// Holds the single live chart; every render destroys the previous one.
#[derive(Default)]
pub struct ChartAdapter {
    instance: Option<ChartJs>,
}

impl ChartAdapter {
    pub fn render(&mut self, canvas: &HtmlCanvasElement, spec: &ChartSpec) {
        self.clear();

        let config = match js_sys::JSON::parse(&spec.to_config().to_string()) {
            Ok(config) => config,
            Err(e) => {
                log::error!("❌ Chart config rejected: {}", describe_js_error(&e));
                return;
            }
        };

        match ChartJs::new(canvas, &config) {
            Ok(chart) => self.instance = Some(chart),
            Err(e) => log::error!("❌ Chart.js failed to render: {}", describe_js_error(&e)),
        }
    }

    pub fn clear(&mut self) {
        if let Some(chart) = self.instance.take() {
            chart.destroy();
        }
    }
}
