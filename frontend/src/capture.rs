use crate::error::ClientError;
use crate::state::StagedFile;
use gloo_file::File as GlooFile;
use js_sys::{Array, Object, Reflect};
use shared::{ALLOWED_IMAGE_TYPES, MAX_UPLOAD_BYTES};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    CanvasRenderingContext2d, HtmlCanvasElement, HtmlVideoElement, MediaStream,
    MediaStreamConstraints, MediaStreamTrack,
};

/// Checks type first, then size.
pub fn validate_upload(mime_type: &str, size: u64) -> Result<(), ClientError> {
    if !ALLOWED_IMAGE_TYPES.contains(&mime_type) {
        return Err(ClientError::UnsupportedType(mime_type.to_string()));
    }
    if size > MAX_UPLOAD_BYTES {
        return Err(ClientError::too_large(size));
    }
    Ok(())
}

impl StagedFile for GlooFile {
    fn mime_type(&self) -> String {
        self.raw_mime_type()
    }

    fn size(&self) -> u64 {
        let blob: &gloo_file::Blob = self;
        blob.size()
    }
}

/// Decodes a staged file into a data URI for the preview image.
pub async fn read_preview(file: &GlooFile) -> Result<String, ClientError> {
    gloo_file::futures::read_as_data_url(file)
        .await
        .map_err(|e| ClientError::Capture(e.to_string()))
}

/// A live camera that can hand out one still frame.
pub trait FrameSource {
    fn grab_jpeg(&self) -> Result<String, ClientError>;
    /// Stops the hardware. Must be safe to call more than once.
    fn release(&mut self);
}

/// Owns at most one live camera session and guarantees it is released on
/// capture, stop, replacement and drop.
pub struct CameraController<S: FrameSource> {
    live: Option<S>,
}

impl<S: FrameSource> Default for CameraController<S> {
    fn default() -> Self {
        Self { live: None }
    }
}

impl<S: FrameSource> CameraController<S> {
    pub fn is_live(&self) -> bool {
        self.live.is_some()
    }

    pub fn attach(&mut self, session: S) {
        if let Some(mut previous) = self.live.replace(session) {
            previous.release();
        }
    }

    /// Grabs a frame and releases the camera whether or not the grab worked.
    pub fn capture(&mut self) -> Result<String, ClientError> {
        let mut session = self.live.take().ok_or(ClientError::CameraInactive)?;
        let frame = session.grab_jpeg();
        session.release();
        frame
    }

    pub fn stop(&mut self) -> bool {
        match self.live.take() {
            Some(mut session) => {
                session.release();
                true
            }
            None => false,
        }
    }
}

impl<S: FrameSource> Drop for CameraController<S> {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Asks for the rear camera; `ideal` lets devices without one fall back.
pub async fn open_camera() -> Result<MediaStream, ClientError> {
    let unavailable = |e: JsValue| ClientError::CameraUnavailable(describe_js_error(&e));

    let window = web_sys::window()
        .ok_or_else(|| ClientError::CameraUnavailable("no window".into()))?;
    let devices = window.navigator().media_devices().map_err(unavailable)?;

    let facing = Object::new();
    Reflect::set(&facing, &"ideal".into(), &"environment".into()).map_err(unavailable)?;
    let video = Object::new();
    Reflect::set(&video, &"facingMode".into(), &facing).map_err(unavailable)?;

    let constraints = MediaStreamConstraints::new();
    constraints.set_video(&video);
    constraints.set_audio(&JsValue::FALSE);

    let promise = devices
        .get_user_media_with_constraints(&constraints)
        .map_err(unavailable)?;
    let stream = JsFuture::from(promise).await.map_err(unavailable)?;
    stream.dyn_into::<MediaStream>().map_err(unavailable)
}

pub fn stop_tracks(stream: &MediaStream) {
    let tracks: Array = stream.get_tracks();
    for track in tracks.iter() {
        if let Ok(track) = track.dyn_into::<MediaStreamTrack>() {
            track.stop();
        }
    }
}

/// Browser camera session bound to the page's `<video>` and `<canvas>`.
pub struct WebcamSession {
    stream: MediaStream,
    video: HtmlVideoElement,
    canvas: HtmlCanvasElement,
    released: bool,
}

impl WebcamSession {
    pub fn new(stream: MediaStream, video: HtmlVideoElement, canvas: HtmlCanvasElement) -> Self {
        video.set_src_object(Some(&stream));
        if let Err(e) = video.play() {
            log::warn!("Video playback did not start: {}", describe_js_error(&e));
        }
        Self {
            stream,
            video,
            canvas,
            released: false,
        }
    }
}

impl FrameSource for WebcamSession {
    fn grab_jpeg(&self) -> Result<String, ClientError> {
        let capture_err = |e: JsValue| ClientError::Capture(describe_js_error(&e));

        let (width, height) = (self.video.video_width(), self.video.video_height());
        if width == 0 || height == 0 {
            return Err(ClientError::Capture("camera has not produced a frame yet".into()));
        }
        self.canvas.set_width(width);
        self.canvas.set_height(height);

        let context = self
            .canvas
            .get_context("2d")
            .map_err(capture_err)?
            .ok_or_else(|| ClientError::Capture("2d context unavailable".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|e| capture_err(e.into()))?;

        context
            .draw_image_with_html_video_element(&self.video, 0.0, 0.0)
            .map_err(capture_err)?;
        self.canvas
            .to_data_url_with_type("image/jpeg")
            .map_err(capture_err)
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        stop_tracks(&self.stream);
        self.video.set_src_object(None);
        self.released = true;
        log::info!("📷 Camera released");
    }
}

pub fn describe_js_error(value: &JsValue) -> String {
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    value
        .as_string()
        .unwrap_or_else(|| format!("{:?}", value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct FakeCamera {
        frame: Result<String, ClientError>,
        stopped: Rc<Cell<u32>>,
    }

    impl FakeCamera {
        fn new(frame: Result<String, ClientError>) -> (Self, Rc<Cell<u32>>) {
            let stopped = Rc::new(Cell::new(0));
            (
                Self {
                    frame,
                    stopped: Rc::clone(&stopped),
                },
                stopped,
            )
        }
    }

    impl FrameSource for FakeCamera {
        fn grab_jpeg(&self) -> Result<String, ClientError> {
            self.frame.clone()
        }

        fn release(&mut self) {
            self.stopped.set(self.stopped.get() + 1);
        }
    }

    #[test]
    fn validation_allows_only_png_and_jpeg() {
        assert!(validate_upload("image/png", 1).is_ok());
        assert!(validate_upload("image/jpeg", 1).is_ok());
        assert!(validate_upload("image/jpg", 1).is_ok());
        assert!(validate_upload("image/gif", 1).is_err());
        assert!(validate_upload("IMAGE/PNG", 1).is_err());
    }

    #[test]
    fn validation_reports_type_before_size() {
        let err = validate_upload("image/bmp", MAX_UPLOAD_BYTES * 2).unwrap_err();
        assert!(matches!(err, ClientError::UnsupportedType(_)));
    }

    #[test]
    fn capture_always_releases_the_camera() {
        let (camera, stopped) = FakeCamera::new(Ok("data:image/jpeg;base64,AAAA".into()));
        let mut controller = CameraController::default();
        controller.attach(camera);

        assert_eq!(controller.capture().unwrap(), "data:image/jpeg;base64,AAAA");
        assert_eq!(stopped.get(), 1);
        assert!(!controller.is_live());
    }

    #[test]
    fn failed_capture_still_releases_the_camera() {
        let (camera, stopped) = FakeCamera::new(Err(ClientError::Capture("no frame".into())));
        let mut controller = CameraController::default();
        controller.attach(camera);

        assert!(controller.capture().is_err());
        assert_eq!(stopped.get(), 1);
        assert!(!controller.is_live());
    }

    #[test]
    fn capture_without_camera_fails() {
        let mut controller: CameraController<FakeCamera> = CameraController::default();
        assert_eq!(controller.capture().unwrap_err(), ClientError::CameraInactive);
    }

    #[test]
    fn stop_releases_once_and_reports_it() {
        let (camera, stopped) = FakeCamera::new(Ok(String::new()));
        let mut controller = CameraController::default();
        controller.attach(camera);

        assert!(controller.stop());
        assert!(!controller.stop());
        assert_eq!(stopped.get(), 1);
    }

    #[test]
    fn attaching_replaces_and_releases_previous_session() {
        let (first, first_stopped) = FakeCamera::new(Ok(String::new()));
        let (second, second_stopped) = FakeCamera::new(Ok(String::new()));
        let mut controller = CameraController::default();

        controller.attach(first);
        controller.attach(second);
        assert_eq!(first_stopped.get(), 1);
        assert_eq!(second_stopped.get(), 0);

        drop(controller);
        assert_eq!(second_stopped.get(), 1);
    }
}
