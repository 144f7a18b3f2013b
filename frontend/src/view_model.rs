//! Pure mapping from server payloads to what the result and history panels
//! display. Components only copy these values into markup.

use crate::chart::ChartSpec;
use shared::{Confidence, HistoryEntry, PredictionResponse, Severity};

pub const EMPTY_HISTORY_MESSAGE: &str = "No predictions yet";

#[derive(Clone, Debug, PartialEq)]
pub struct GaugeView {
    /// SVG `stroke-dasharray` for a circle with path length 100.
    pub dash_array: String,
    pub text: String,
}

impl GaugeView {
    pub fn new(confidence: Confidence) -> Self {
        Self {
            dash_array: format!("{}, 100", confidence.percent()),
            text: confidence.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SeverityBadge {
    pub text: &'static str,
    pub class: String,
}

impl SeverityBadge {
    pub fn new(severity: Severity) -> Self {
        let text = match severity {
            Severity::None => "✅ Healthy leaf",
            Severity::Low => "🟢 Mild",
            Severity::Medium => "🟡 Moderate",
            Severity::High => "🔴 Severe",
            Severity::Unknown => "⚪ Undetermined",
        };
        Self {
            text,
            class: format!("severity-badge {}", severity.as_ref()),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RankedRow {
    pub rank: String,
    pub label: String,
    pub fill_style: String,
    pub confidence: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TreatmentView {
    pub diagnosis: String,
    pub treatment: String,
    pub prevention: Vec<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResultView {
    pub image_url: String,
    pub headline: String,
    pub gauge: GaugeView,
    pub severity: SeverityBadge,
    pub ranked: Vec<RankedRow>,
    pub chart: ChartSpec,
    pub treatment: TreatmentView,
}

impl From<&PredictionResponse> for ResultView {
    fn from(response: &PredictionResponse) -> Self {
        let ranked = response
            .all_predictions
            .iter()
            .enumerate()
            .map(|(index, prediction)| RankedRow {
                rank: format!("#{}", index + 1),
                label: prediction.label.clone(),
                fill_style: format!("width: {}%", prediction.confidence.percent()),
                confidence: prediction.confidence.to_string(),
            })
            .collect();

        Self {
            image_url: response.image_url.clone(),
            headline: response.top_prediction.label.clone(),
            gauge: GaugeView::new(response.top_prediction.confidence),
            severity: SeverityBadge::new(response.treatment.severity),
            ranked,
            chart: ChartSpec::from_predictions(&response.all_predictions),
            treatment: TreatmentView {
                diagnosis: response.treatment.diagnosis.clone(),
                treatment: response.treatment.treatment.clone(),
                prevention: response.treatment.prevention.clone(),
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct HistoryRow {
    pub image_url: String,
    pub label: String,
    pub confidence: String,
    pub timestamp: String,
}

#[derive(Clone, Debug, PartialEq)]
pub enum HistoryView {
    Empty,
    Rows(Vec<HistoryRow>),
}

impl From<&[HistoryEntry]> for HistoryView {
    fn from(entries: &[HistoryEntry]) -> Self {
        if entries.is_empty() {
            return HistoryView::Empty;
        }
        HistoryView::Rows(
            entries
                .iter()
                .map(|entry| HistoryRow {
                    image_url: entry.image_url.clone(),
                    label: entry.disease.clone(),
                    confidence: entry.confidence.to_string(),
                    timestamp: entry.timestamp.clone(),
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::tests::response;

    #[test]
    fn result_view_maps_headline_and_gauge() {
        let view = ResultView::from(&response());

        assert_eq!(view.headline, "Leaf blight");
        assert_eq!(view.image_url, "/static/uploads/leaf.jpg");
        assert_eq!(view.gauge.text, "91.2%");
        assert!(view.gauge.dash_array.ends_with(", 100"));
    }

    #[test]
    fn three_predictions_give_three_rows_and_bars_in_order() {
        let view = ResultView::from(&response());

        let rows: Vec<(&str, &str)> = view
            .ranked
            .iter()
            .map(|row| (row.rank.as_str(), row.label.as_str()))
            .collect();
        assert_eq!(rows, [("#1", "Leaf blight"), ("#2", "Rust"), ("#3", "Healthy")]);
        assert_eq!(view.chart.bars.len(), 3);
        assert_eq!(view.chart.bars[2].label, "Healthy");
        assert_eq!(view.ranked[1].confidence, "6.3%");
    }

    #[test]
    fn row_fill_width_matches_confidence() {
        let mut payload = response();
        payload.all_predictions[0].confidence = Confidence(75.0);

        let view = ResultView::from(&payload);
        assert_eq!(view.ranked[0].fill_style, "width: 75%");
    }

    #[test]
    fn severity_high_and_fallback() {
        let high = SeverityBadge::new(Severity::High);
        assert_eq!(high.text, "🔴 Severe");
        assert_eq!(high.class, "severity-badge high");

        let unknown = SeverityBadge::new(Severity::from(None::<String>));
        assert_eq!(unknown.text, "⚪ Undetermined");
        assert_eq!(unknown.class, "severity-badge unknown");
    }

    #[test]
    fn treatment_keeps_prevention_order() {
        let view = ResultView::from(&response());
        assert_eq!(view.treatment.prevention, ["Prune", "Rotate crops"]);
        assert_eq!(view.treatment.diagnosis, "Fungal infection");
    }

    #[test]
    fn empty_history_shows_empty_state() {
        let none: &[HistoryEntry] = &[];
        assert_eq!(HistoryView::from(none), HistoryView::Empty);
    }

    #[test]
    fn history_rows_keep_input_order() {
        let entries: Vec<HistoryEntry> = ["Rust", "Healthy", "Leaf blight"]
            .iter()
            .enumerate()
            .map(|(i, disease)| HistoryEntry {
                image_url: format!("/static/uploads/{}.jpg", i),
                disease: disease.to_string(),
                confidence: Confidence(55.0 + i as f32),
                timestamp: format!("2024-05-0{} 10:00:00", i + 1),
            })
            .collect();

        match HistoryView::from(entries.as_slice()) {
            HistoryView::Rows(rows) => {
                let labels: Vec<&str> = rows.iter().map(|row| row.label.as_str()).collect();
                assert_eq!(labels, ["Rust", "Healthy", "Leaf blight"]);
                assert_eq!(rows[2].timestamp, "2024-05-03 10:00:00");
                assert_eq!(rows[1].confidence, "56.0%");
            }
            HistoryView::Empty => panic!("expected rows"),
        }
    }
}
