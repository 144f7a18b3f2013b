//! Application state for the capture and analysis flow.
//!
//! Kept free of DOM handles so transitions can be exercised on the host. The
//! root component owns one `AppState` and re-renders from it.

use crate::capture::validate_upload;
use crate::error::ClientError;
use shared::{HistoryEntry, PredictionResponse};

/// A file-like handle that can be staged for upload.
pub trait StagedFile: Clone {
    fn mime_type(&self) -> String;
    fn size(&self) -> u64;
}

/// The single image waiting to be analysed.
#[derive(Clone, Debug, PartialEq)]
pub enum PendingImage<F> {
    File(F),
    DataUri(String),
}

/// Identifies one staged image so a late preview decode can be matched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StageId(u64);

/// Identifies one in-flight request. Only the newest ticket may touch the view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug, Default)]
struct Generation(u64);

impl Generation {
    fn next(&mut self) -> Ticket {
        self.0 += 1;
        Ticket(self.0)
    }

    fn invalidate(&mut self) {
        self.0 += 1;
    }

    fn is_current(&self, ticket: Ticket) -> bool {
        self.0 == ticket.0
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Phase {
    Idle,
    Loading,
    Showing(Box<PredictionResponse>),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnalysisOutcome {
    /// A newer request or a reset superseded this one; nothing changed.
    Stale,
    Shown,
    Failed,
}

#[derive(Debug)]
pub struct AppState<F> {
    pending: Option<PendingImage<F>>,
    stage_seq: u64,
    preview: Option<String>,
    phase: Phase,
    analysis: Generation,
    history_fetch: Generation,
    history: Option<Vec<HistoryEntry>>,
    error: Option<String>,
}

impl<F> Default for AppState<F> {
    fn default() -> Self {
        Self {
            pending: None,
            stage_seq: 0,
            preview: None,
            phase: Phase::Idle,
            analysis: Generation::default(),
            history_fetch: Generation::default(),
            history: None,
            error: None,
        }
    }
}

impl<F: StagedFile> AppState<F> {
    pub fn pending(&self) -> Option<&PendingImage<F>> {
        self.pending.as_ref()
    }

    pub fn preview(&self) -> Option<&str> {
        self.preview.as_deref()
    }

    /// The preview region is shown only while idle with an image staged.
    pub fn preview_visible(&self) -> bool {
        self.pending.is_some() && self.phase == Phase::Idle
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    pub fn result(&self) -> Option<&PredictionResponse> {
        match &self.phase {
            Phase::Showing(result) => Some(result),
            _ => None,
        }
    }

    pub fn history(&self) -> Option<&[HistoryEntry]> {
        self.history.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_error(&mut self, err: &ClientError) {
        self.error = Some(err.to_string());
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Validates and stages a picked, dropped or pasted file. A rejected file
    /// leaves everything but the error banner untouched.
    pub fn stage_file(&mut self, file: F) -> Result<StageId, ClientError> {
        if let Err(err) = validate_upload(&file.mime_type(), file.size()) {
            self.set_error(&err);
            return Err(err);
        }

        self.stage_seq += 1;
        self.pending = Some(PendingImage::File(file));
        self.preview = None;
        self.error = None;
        self.supersede_analysis();
        Ok(StageId(self.stage_seq))
    }

    /// Applies a decoded preview if `id` still names the staged file.
    pub fn preview_ready(&mut self, id: StageId, data_uri: String) -> bool {
        if id.0 != self.stage_seq || !matches!(self.pending, Some(PendingImage::File(_))) {
            return false;
        }
        self.preview = Some(data_uri);
        true
    }

    /// Surfaces a preview decode error unless a newer image replaced the file.
    pub fn preview_failed(&mut self, id: StageId, err: &ClientError) -> bool {
        if id.0 != self.stage_seq || !matches!(self.pending, Some(PendingImage::File(_))) {
            return false;
        }
        self.set_error(err);
        true
    }

    pub fn stage_capture(&mut self, data_uri: String) {
        self.stage_seq += 1;
        self.preview = Some(data_uri.clone());
        self.pending = Some(PendingImage::DataUri(data_uri));
        self.error = None;
        self.supersede_analysis();
    }

    /// Enters the loading state and hands back what to submit.
    pub fn begin_analysis(&mut self) -> Result<(Ticket, PendingImage<F>), ClientError> {
        let pending = match &self.pending {
            Some(pending) => pending.clone(),
            None => {
                let err = ClientError::NoImage;
                self.set_error(&err);
                return Err(err);
            }
        };

        self.error = None;
        self.phase = Phase::Loading;
        Ok((self.analysis.next(), pending))
    }

    pub fn finish_analysis(
        &mut self,
        ticket: Ticket,
        result: Result<PredictionResponse, ClientError>,
    ) -> AnalysisOutcome {
        if !self.analysis.is_current(ticket) || self.phase != Phase::Loading {
            return AnalysisOutcome::Stale;
        }

        match result {
            Ok(response) => {
                self.phase = Phase::Showing(Box::new(response));
                AnalysisOutcome::Shown
            }
            Err(err) => {
                self.phase = Phase::Idle;
                self.set_error(&err);
                AnalysisOutcome::Failed
            }
        }
    }

    /// "New analysis": back to an empty idle screen. In-flight requests are
    /// invalidated so their responses are dropped.
    pub fn reset(&mut self) {
        self.pending = None;
        self.preview = None;
        self.error = None;
        self.phase = Phase::Idle;
        self.analysis.invalidate();
    }

    pub fn begin_history_fetch(&mut self) -> Ticket {
        self.history_fetch.next()
    }

    pub fn history_loaded(&mut self, ticket: Ticket, entries: Vec<HistoryEntry>) -> bool {
        if !self.history_fetch.is_current(ticket) {
            return false;
        }
        self.history = Some(entries);
        true
    }

    /// A newly staged image hides the shown result and orphans any request
    /// still in flight for the previous one.
    fn supersede_analysis(&mut self) {
        match self.phase {
            Phase::Loading => {
                self.analysis.invalidate();
                self.phase = Phase::Idle;
            }
            Phase::Showing(_) => self.phase = Phase::Idle,
            Phase::Idle => {}
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use shared::{Confidence, Prediction, Severity, TreatmentInfo};

    #[derive(Clone, Debug, PartialEq)]
    pub(crate) struct FakeFile {
        pub mime: &'static str,
        pub size: u64,
    }

    impl StagedFile for FakeFile {
        fn mime_type(&self) -> String {
            self.mime.to_string()
        }

        fn size(&self) -> u64 {
            self.size
        }
    }

    pub(crate) fn prediction(label: &str, confidence: f32) -> Prediction {
        Prediction {
            label: label.to_string(),
            class_index: None,
            confidence: Confidence(confidence),
        }
    }

    pub(crate) fn response() -> PredictionResponse {
        PredictionResponse {
            success: true,
            timestamp: None,
            top_prediction: prediction("Leaf blight", 91.2),
            all_predictions: vec![
                prediction("Leaf blight", 91.2),
                prediction("Rust", 6.3),
                prediction("Healthy", 2.5),
            ],
            treatment: TreatmentInfo {
                disease: None,
                diagnosis: "Fungal infection".into(),
                treatment: "Apply fungicide".into(),
                prevention: vec!["Prune".into(), "Rotate crops".into()],
                severity: Severity::High,
            },
            image_url: "/static/uploads/leaf.jpg".into(),
        }
    }

    fn jpeg(size: u64) -> FakeFile {
        FakeFile { mime: "image/jpeg", size }
    }

    #[test]
    fn rejects_unsupported_types_without_touching_pending() {
        let mut state = AppState::default();
        state.stage_capture("data:image/jpeg;base64,AAAA".into());

        for mime in ["image/gif", "image/webp", "application/pdf", ""] {
            let err = state.stage_file(FakeFile { mime, size: 10 }).unwrap_err();
            assert!(matches!(err, ClientError::UnsupportedType(_)));
            assert_eq!(
                state.pending(),
                Some(&PendingImage::DataUri("data:image/jpeg;base64,AAAA".into()))
            );
        }
        assert!(state.error().is_some());
    }

    #[test]
    fn rejects_oversized_files_of_any_valid_type() {
        let mut state: AppState<FakeFile> = AppState::default();
        for mime in ["image/png", "image/jpeg", "image/jpg"] {
            let err = state
                .stage_file(FakeFile { mime, size: shared::MAX_UPLOAD_BYTES + 1 })
                .unwrap_err();
            assert!(matches!(err, ClientError::TooLarge { .. }));
        }
        assert!(state.pending().is_none());
    }

    #[test]
    fn accepts_file_at_the_size_limit() {
        let mut state = AppState::default();
        assert!(state.stage_file(jpeg(shared::MAX_UPLOAD_BYTES)).is_ok());
        assert!(state.preview_visible());
        assert!(state.preview().is_none());
    }

    #[test]
    fn superseded_preview_decode_is_dropped() {
        let mut state = AppState::default();
        let first = state.stage_file(jpeg(10)).unwrap();
        let second = state.stage_file(jpeg(20)).unwrap();

        assert!(!state.preview_ready(first, "data:first".into()));
        assert!(state.preview_ready(second, "data:second".into()));
        assert_eq!(state.preview(), Some("data:second"));
    }

    #[test]
    fn analyse_without_image_reports_error() {
        let mut state: AppState<FakeFile> = AppState::default();
        assert_eq!(state.begin_analysis().unwrap_err(), ClientError::NoImage);
        assert!(!state.is_loading());
        assert!(state.error().is_some());
    }

    #[test]
    fn successful_analysis_shows_result() {
        let mut state = AppState::default();
        state.stage_file(jpeg(10)).unwrap();

        let (ticket, pending) = state.begin_analysis().unwrap();
        assert!(matches!(pending, PendingImage::File(_)));
        assert!(state.is_loading());
        assert!(!state.preview_visible());

        assert_eq!(state.finish_analysis(ticket, Ok(response())), AnalysisOutcome::Shown);
        assert!(!state.is_loading());
        assert_eq!(state.result().map(|r| r.image_url.as_str()), Some("/static/uploads/leaf.jpg"));
    }

    #[test]
    fn failures_clear_busy_state_and_show_no_result() {
        let failures = [
            ClientError::Server { status: 500, message: "Prediction failed".into() },
            ClientError::Network("connection refused".into()),
        ];

        for failure in failures {
            let mut state: AppState<FakeFile> = AppState::default();
            state.stage_capture("data:image/jpeg;base64,AAAA".into());
            let (ticket, _) = state.begin_analysis().unwrap();

            assert_eq!(state.finish_analysis(ticket, Err(failure)), AnalysisOutcome::Failed);
            assert!(!state.is_loading());
            assert!(state.result().is_none());
            assert!(state.error().is_some());
            assert!(state.preview_visible());
        }
    }

    #[test]
    fn late_response_from_superseded_request_is_discarded() {
        let mut state = AppState::default();
        state.stage_file(jpeg(10)).unwrap();

        let (first, _) = state.begin_analysis().unwrap();
        let (second, _) = state.begin_analysis().unwrap();

        assert_eq!(state.finish_analysis(second, Ok(response())), AnalysisOutcome::Shown);

        let mut late = response();
        late.image_url = "/static/uploads/old.jpg".into();
        assert_eq!(state.finish_analysis(first, Ok(late)), AnalysisOutcome::Stale);
        assert_eq!(state.result().map(|r| r.image_url.as_str()), Some("/static/uploads/leaf.jpg"));
    }

    #[test]
    fn reset_after_result_clears_everything() {
        let mut state = AppState::default();
        state.stage_file(jpeg(10)).unwrap();
        let (ticket, _) = state.begin_analysis().unwrap();
        state.finish_analysis(ticket, Ok(response()));

        state.reset();

        assert!(state.pending().is_none());
        assert!(state.preview().is_none());
        assert!(!state.preview_visible());
        assert!(state.result().is_none());
    }

    #[test]
    fn reset_during_loading_discards_the_response() {
        let mut state = AppState::default();
        state.stage_file(jpeg(10)).unwrap();
        let (ticket, _) = state.begin_analysis().unwrap();

        state.reset();

        assert!(!state.is_loading());
        assert_eq!(state.finish_analysis(ticket, Ok(response())), AnalysisOutcome::Stale);
        assert!(state.result().is_none());
    }

    #[test]
    fn staging_during_loading_orphans_the_request() {
        let mut state = AppState::default();
        state.stage_file(jpeg(10)).unwrap();
        let (ticket, _) = state.begin_analysis().unwrap();

        state.stage_file(FakeFile { mime: "image/png", size: 99 }).unwrap();
        assert!(!state.is_loading());
        assert!(state.preview_visible());

        assert_eq!(state.finish_analysis(ticket, Ok(response())), AnalysisOutcome::Stale);
        assert!(state.result().is_none());
        assert_eq!(
            state.pending(),
            Some(&PendingImage::File(FakeFile { mime: "image/png", size: 99 }))
        );
    }

    #[test]
    fn capture_during_loading_orphans_the_request() {
        let mut state = AppState::default();
        state.stage_file(jpeg(10)).unwrap();
        let (ticket, _) = state.begin_analysis().unwrap();

        state.stage_capture("data:image/jpeg;base64,CCCC".into());

        assert_eq!(
            state.finish_analysis(ticket, Err(ClientError::Network("timeout".into()))),
            AnalysisOutcome::Stale
        );
        assert!(state.error().is_none());
        assert!(state.preview_visible());
    }

    #[test]
    fn stale_preview_failure_stays_out_of_the_banner() {
        let mut state = AppState::default();
        let first = state.stage_file(jpeg(10)).unwrap();
        let second = state.stage_file(jpeg(20)).unwrap();
        let err = ClientError::Capture("unreadable".into());

        assert!(!state.preview_failed(first, &err));
        assert!(state.error().is_none());

        assert!(state.preview_failed(second, &err));
        assert_eq!(state.error(), Some(err.to_string().as_str()));
    }

    #[test]
    fn new_capture_hides_previous_result() {
        let mut state = AppState::default();
        state.stage_file(jpeg(10)).unwrap();
        let (ticket, _) = state.begin_analysis().unwrap();
        state.finish_analysis(ticket, Ok(response()));

        state.stage_capture("data:image/jpeg;base64,BBBB".into());

        assert!(state.result().is_none());
        assert_eq!(state.preview(), Some("data:image/jpeg;base64,BBBB"));
        assert!(state.preview_visible());
    }

    #[test]
    fn stale_history_response_is_ignored() {
        let mut state: AppState<FakeFile> = AppState::default();
        let old = state.begin_history_fetch();
        let new = state.begin_history_fetch();

        assert!(state.history_loaded(new, Vec::new()));
        assert!(!state.history_loaded(
            old,
            vec![HistoryEntry {
                image_url: "/a.jpg".into(),
                disease: "Rust".into(),
                confidence: Confidence(50.0),
                timestamp: "t".into(),
            }]
        ));
        assert_eq!(state.history().map(<[_]>::len), Some(0));
    }
}
