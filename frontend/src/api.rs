use crate::capture::describe_js_error;
use crate::config::AppConfig;
use crate::error::ClientError;
use crate::state::PendingImage;
use gloo_file::File as GlooFile;
use gloo_net::http::{Request, Response};
use shared::{
    ClearHistoryResponse, ErrorResponse, HealthResponse, HistoryEntry, HistoryResponse,
    PredictionResponse, WebcamPredictRequest, paths,
};
use web_sys::FormData;

const FALLBACK_ERROR: &str = "Prediction failed";

/// Which prediction route a staged image goes to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endpoint {
    Upload,
    Webcam,
}

impl Endpoint {
    pub fn for_pending<F>(pending: &PendingImage<F>) -> Self {
        match pending {
            PendingImage::File(_) => Endpoint::Upload,
            PendingImage::DataUri(_) => Endpoint::Webcam,
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Upload => paths::PREDICT_UPLOAD,
            Endpoint::Webcam => paths::PREDICT_WEBCAM,
        }
    }
}

/// Sends exactly one prediction request for the staged image.
pub async fn submit(
    config: &AppConfig,
    pending: PendingImage<GlooFile>,
) -> Result<PredictionResponse, ClientError> {
    let url = config.url(Endpoint::for_pending(&pending).path());
    log::info!("📤 Submitting image to {}", url);

    let request = match pending {
        PendingImage::File(file) => {
            let form = FormData::new().map_err(|e| ClientError::Network(describe_js_error(&e)))?;
            let blob: &gloo_file::Blob = &file;
            let raw: &web_sys::Blob = blob.as_ref();
            form.append_with_blob_and_filename("file", raw, &file.name())
                .map_err(|e| ClientError::Network(describe_js_error(&e)))?;
            Request::post(&url).body(form)?
        }
        PendingImage::DataUri(image) => {
            Request::post(&url).json(&WebcamPredictRequest { image })?
        }
    };

    let response = request.send().await?;
    read_prediction(response).await
}

async fn read_prediction(response: Response) -> Result<PredictionResponse, ClientError> {
    if response.ok() {
        return Ok(response.json::<PredictionResponse>().await?);
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    log::error!("❌ Prediction failed with status {}: {}", status, body);
    Err(server_error(status, &body))
}

/// Builds the user-facing error for a non-2xx prediction response.
pub fn server_error(status: u16, body: &str) -> ClientError {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(|parsed| parsed.message().map(str::to_string))
        .unwrap_or_else(|| FALLBACK_ERROR.to_string());
    ClientError::Server { status, message }
}

pub async fn fetch_history(config: &AppConfig) -> Result<Vec<HistoryEntry>, ClientError> {
    let response = Request::get(&config.url(paths::HISTORY)).send().await?;
    if !response.ok() {
        return Err(ClientError::Server {
            status: response.status(),
            message: response.status_text(),
        });
    }
    Ok(response.json::<HistoryResponse>().await?.history)
}

pub async fn clear_history(config: &AppConfig) -> Result<(), ClientError> {
    let response = Request::post(&config.url(paths::CLEAR_HISTORY)).send().await?;
    if !response.ok() {
        return Err(ClientError::Server {
            status: response.status(),
            message: response.status_text(),
        });
    }
    // Body is optional; an unparsable one still counts as cleared.
    match response.json::<ClearHistoryResponse>().await {
        Ok(ClearHistoryResponse { success: false }) => {
            log::warn!("Server reported history was not cleared");
        }
        Ok(_) | Err(_) => {}
    }
    Ok(())
}

pub async fn check_health(config: &AppConfig) -> Result<HealthResponse, ClientError> {
    let response = Request::get(&config.url(paths::HEALTH)).send().await?;
    if !response.ok() {
        return Err(ClientError::Server {
            status: response.status(),
            message: response.status_text(),
        });
    }
    Ok(response.json::<HealthResponse>().await?)
}
