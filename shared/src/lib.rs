use derive_more::Display;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};
use strum_macros::{AsRefStr, EnumString};

/// MIME types the prediction endpoints accept.
pub const ALLOWED_IMAGE_TYPES: [&str; 3] = ["image/png", "image/jpeg", "image/jpg"];

/// Largest accepted upload, 16 MiB.
pub const MAX_UPLOAD_BYTES: u64 = 16 * 1024 * 1024;

pub mod paths {
    pub const PREDICT_UPLOAD: &str = "/api/predict/upload";
    pub const PREDICT_WEBCAM: &str = "/api/predict/webcam";
    pub const HISTORY: &str = "/api/history";
    pub const CLEAR_HISTORY: &str = "/api/clear-history";
    pub const HEALTH: &str = "/health";
}

/// Model confidence as a percentage in `[0, 100]`.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, PartialOrd, Display)]
#[serde(transparent)]
#[display(fmt = "{:.1}%", _0)]
pub struct Confidence(pub f32);

impl Confidence {
    /// Clamped percentage, safe to use as a CSS width or gauge length.
    pub fn percent(self) -> f32 {
        if self.0.is_nan() {
            return 0.0;
        }
        self.0.clamp(0.0, 100.0)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Prediction {
    #[serde(rename = "class")]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_index: Option<String>,
    pub confidence: Confidence,
}

#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash, AsRefStr, EnumString,
)]
#[serde(rename_all = "lowercase", from = "SeverityField")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Severity {
    None,
    Low,
    Medium,
    High,
    #[default]
    Unknown,
}

impl From<Option<String>> for Severity {
    fn from(raw: Option<String>) -> Self {
        raw.and_then(|value| value.trim().parse().ok())
            .unwrap_or_default()
    }
}

/// Whatever the server put under `severity`; anything but a string is unknown.
#[derive(Deserialize)]
#[serde(untagged)]
enum SeverityField {
    Text(String),
    Other(IgnoredAny),
}

impl From<SeverityField> for Severity {
    fn from(raw: SeverityField) -> Self {
        match raw {
            SeverityField::Text(text) => Severity::from(Some(text)),
            SeverityField::Other(_) => Severity::Unknown,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TreatmentInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disease: Option<String>,
    #[serde(default)]
    pub diagnosis: String,
    #[serde(default)]
    pub treatment: String,
    #[serde(default, deserialize_with = "one_or_many")]
    pub prevention: Vec<String>,
    #[serde(default)]
    pub severity: Severity,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PredictionResponse {
    #[serde(default = "default_true")]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    pub top_prediction: Prediction,
    #[serde(default)]
    pub all_predictions: Vec<Prediction>,
    pub treatment: TreatmentInfo,
    pub image_url: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct WebcamPredictRequest {
    pub image: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct HistoryEntry {
    pub image_url: String,
    pub disease: String,
    pub confidence: Confidence,
    pub timestamp: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct HistoryResponse {
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ClearHistoryResponse {
    #[serde(default = "default_true")]
    pub success: bool,
}

/// Error body. Flask-style backends send `error`, FastAPI sends `detail`.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ErrorResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, deserialize_with = "text_only", skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorResponse {
    pub fn message(&self) -> Option<&str> {
        self.error
            .as_deref()
            .or(self.detail.as_deref())
            .filter(|msg| !msg.trim().is_empty())
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

fn default_true() -> bool {
    true
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        Many(Vec<String>),
        One(String),
        Nothing(Option<IgnoredAny>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::Many(items) => items,
        OneOrMany::One(item) if item.trim().is_empty() => Vec::new(),
        OneOrMany::One(item) => vec![item],
        OneOrMany::Nothing(_) => Vec::new(),
    })
}

fn text_only<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Detail {
        Text(String),
        Other(IgnoredAny),
    }

    Ok(match Detail::deserialize(deserializer)? {
        Detail::Text(text) => Some(text),
        Detail::Other(_) => None,
    })
}
