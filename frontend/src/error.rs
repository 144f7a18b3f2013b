use thiserror::Error;

/// Every failure the client can report. `Display` is the user-facing text.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClientError {
    #[error("Unsupported file type \"{0}\". Please choose a PNG or JPEG image.")]
    UnsupportedType(String),
    #[error("File is too large ({size_mib:.1} MiB). The maximum size is 16 MiB.")]
    TooLarge { size_mib: f64 },
    #[error("Please select or capture an image first.")]
    NoImage,
    #[error("Cannot access the camera. Please check the camera permission. ({0})")]
    CameraUnavailable(String),
    #[error("The camera is not running.")]
    CameraInactive,
    #[error("Could not capture a frame: {0}")]
    Capture(String),
    #[error("Error analysing image: {0}")]
    Network(String),
    #[error("Error analysing image: {message}")]
    Server { status: u16, message: String },
    #[error("Error analysing image: unexpected response ({0})")]
    Decode(String),
}

impl ClientError {
    pub fn too_large(bytes: u64) -> Self {
        ClientError::TooLarge {
            size_mib: bytes as f64 / (1024.0 * 1024.0),
        }
    }
}

impl From<gloo_net::Error> for ClientError {
    fn from(err: gloo_net::Error) -> Self {
        match err {
            gloo_net::Error::SerdeError(e) => ClientError::Decode(e.to_string()),
            other => ClientError::Network(other.to_string()),
        }
    }
}
