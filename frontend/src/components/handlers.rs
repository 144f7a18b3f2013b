use crate::api;
use crate::capture::{self, WebcamSession, stop_tracks};
use crate::config::AppConfig;
use crate::error::ClientError;
use crate::state::{AnalysisOutcome, Ticket};
use crate::view_model::ResultView;
use crate::{Model, Msg};
use gloo_file::File as GlooFile;
use shared::PredictionResponse;
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use web_sys::{
    ClipboardEvent, DragEvent, FileList, HtmlCanvasElement, HtmlInputElement, HtmlVideoElement,
    MediaStream, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition,
};
use yew::prelude::*;

pub fn handle_file_chosen(model: &mut Model, ctx: &Context<Model>, file: GlooFile) -> bool {
    let name = file.name();
    match model.state.stage_file(file.clone()) {
        Ok(stage_id) => {
            log::info!("🖼️ Staged file {} ({} bytes)", name, file.size());
            model.chart.clear();

            let link = ctx.link().clone();
            spawn_local(async move {
                match capture::read_preview(&file).await {
                    Ok(data_uri) => link.send_message(Msg::PreviewReady(stage_id, data_uri)),
                    Err(e) => {
                        log::warn!("Preview for {} could not be decoded: {}", name, e);
                        link.send_message(Msg::PreviewFailed(stage_id, e));
                    }
                }
            });
        }
        Err(e) => log::warn!("Rejected file {}: {}", name, e),
    }
    true
}

pub fn handle_drop(model: &mut Model, ctx: &Context<Model>, event: DragEvent) -> bool {
    event.prevent_default();
    model.is_dragging = false;

    let first = event
        .data_transfer()
        .and_then(|data_transfer| data_transfer.files())
        .and_then(|files| first_file(&files, false));

    match first {
        Some(file) => handle_file_chosen(model, ctx, file),
        None => true,
    }
}

pub fn handle_paste(ctx: &Context<Model>, event: ClipboardEvent) -> bool {
    let pasted = event
        .clipboard_data()
        .and_then(|data_transfer| data_transfer.files())
        .and_then(|files| first_file(&files, true));

    if let Some(file) = pasted {
        event.prevent_default();
        ctx.link().send_message(Msg::FileChosen(file));
    }
    false
}

/// First file of a list; `images_only` skips non-image clipboard items.
pub fn first_file(files: &FileList, images_only: bool) -> Option<GlooFile> {
    (0..files.length())
        .filter_map(|i| files.item(i))
        .find(|file| !images_only || file.type_().starts_with("image/"))
        .map(GlooFile::from)
}

pub fn handle_start_camera(model: &mut Model, ctx: &Context<Model>) -> bool {
    if model.camera.is_live() || model.camera_starting {
        return false;
    }
    model.camera_starting = true;

    let link = ctx.link().clone();
    spawn_local(async move {
        match capture::open_camera().await {
            Ok(stream) => link.send_message(Msg::CameraReady(stream)),
            Err(e) => link.send_message(Msg::CameraFailed(e)),
        }
    });
    true
}

pub fn handle_camera_ready(model: &mut Model, stream: MediaStream) -> bool {
    model.camera_starting = false;

    let video = model.video_ref.cast::<HtmlVideoElement>();
    let canvas = model.canvas_ref.cast::<HtmlCanvasElement>();
    match (video, canvas) {
        (Some(video), Some(canvas)) => {
            model.camera.attach(WebcamSession::new(stream, video, canvas));
            model.state.clear_error();
            log::info!("📷 Camera started");
        }
        _ => {
            stop_tracks(&stream);
            let err = ClientError::CameraUnavailable("camera view is not mounted".into());
            log::error!("❌ {}", err);
            model.state.set_error(&err);
        }
    }
    true
}

pub fn handle_capture(model: &mut Model) -> bool {
    match model.camera.capture() {
        Ok(data_uri) => {
            log::info!("📸 Captured frame ({} chars)", data_uri.len());
            model.state.stage_capture(data_uri);
            model.chart.clear();
        }
        Err(e) => {
            log::error!("❌ Capture failed: {}", e);
            model.state.set_error(&e);
        }
    }
    true
}

pub fn handle_analyze(model: &mut Model, ctx: &Context<Model>) -> bool {
    let (ticket, pending) = match model.state.begin_analysis() {
        Ok(started) => started,
        Err(e) => {
            log::warn!("Analysis not started: {}", e);
            return true;
        }
    };
    model.chart.clear();

    let config = Rc::clone(&model.config);
    spawn_local({
        let link = ctx.link().clone();

        async move {
            let result = api::submit(&config, pending).await;
            link.send_message(Msg::AnalysisFinished(ticket, result));
        }
    });
    true
}

pub fn handle_analysis_finished(
    model: &mut Model,
    ctx: &Context<Model>,
    ticket: Ticket,
    result: Result<PredictionResponse, ClientError>,
) -> bool {
    match model.state.finish_analysis(ticket, result) {
        AnalysisOutcome::Stale => {
            log::info!("Discarding response for superseded request {:?}", ticket);
            false
        }
        AnalysisOutcome::Shown => {
            log::info!("✅ Prediction received");
            model.chart_dirty = true;
            ctx.link().send_message(Msg::RefreshHistory);
            true
        }
        AnalysisOutcome::Failed => {
            log::error!("❌ Prediction failed: {}", model.state.error().unwrap_or_default());
            true
        }
    }
}

pub fn handle_new_analysis(model: &mut Model) -> bool {
    model.state.reset();
    model.chart.clear();
    model.chart_dirty = false;
    if let Some(input) = model.file_input_ref.cast::<HtmlInputElement>() {
        input.set_value("");
    }
    true
}

/// Scrolls the result panel into view and draws the chart once the panel is
/// in the DOM.
pub fn present_result(model: &mut Model) {
    let Some(result) = model.state.result() else {
        return;
    };

    if let Some(panel) = model.results_ref.cast::<web_sys::Element>() {
        let options = ScrollIntoViewOptions::new();
        options.set_behavior(ScrollBehavior::Smooth);
        options.set_block(ScrollLogicalPosition::Start);
        panel.scroll_into_view_with_scroll_into_view_options(&options);
    }

    match model.chart_ref.cast::<HtmlCanvasElement>() {
        Some(canvas) => model
            .chart
            .render(&canvas, &ResultView::from(result).chart),
        None => log::warn!("Chart canvas is not mounted"),
    }
}

pub fn refresh_history(model: &mut Model, ctx: &Context<Model>) {
    let ticket = model.state.begin_history_fetch();
    let config = Rc::clone(&model.config);
    let link = ctx.link().clone();

    spawn_local(async move {
        match api::fetch_history(&config).await {
            Ok(entries) => link.send_message(Msg::HistoryLoaded(ticket, entries)),
            Err(e) => log::error!("❌ Error loading history: {}", e),
        }
    });
}

pub fn handle_clear_history(model: &mut Model, ctx: &Context<Model>) {
    let confirmed = web_sys::window()
        .and_then(|window| {
            window
                .confirm_with_message("Are you sure you want to clear the whole history?")
                .ok()
        })
        .unwrap_or(false);
    if !confirmed {
        return;
    }

    let config = Rc::clone(&model.config);
    let link = ctx.link().clone();
    spawn_local(async move {
        if let Err(e) = api::clear_history(&config).await {
            log::error!("❌ Error clearing history: {}", e);
        }
        link.send_message(Msg::RefreshHistory);
    });
}

pub fn check_health(ctx: &Context<Model>, config: &Rc<AppConfig>) {
    let config = Rc::clone(config);
    let link = ctx.link().clone();

    spawn_local(async move {
        match api::check_health(&config).await {
            Ok(health) => {
                log::info!("✅ Backend status: {}", health.status);
                link.send_message(Msg::HealthChecked(Some(health)));
            }
            Err(e) => {
                log::warn!("Backend health check failed: {}", e);
                link.send_message(Msg::HealthChecked(None));
            }
        }
    });
}
