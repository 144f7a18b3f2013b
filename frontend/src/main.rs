mod api;
mod capture;
mod chart;
mod components;
mod config;
mod error;
mod state;
mod view_model;

use capture::{CameraController, WebcamSession};
use chart::ChartAdapter;
use components::handlers;
use components::theme_toggle::Theme;
use config::AppConfig;
use error::ClientError;
use gloo_events::EventListener;
use gloo_file::File as GlooFile;
use shared::{HealthResponse, HistoryEntry, PredictionResponse};
use state::{AppState, StageId, Ticket};
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys::{ClipboardEvent, DragEvent, MediaStream};
use yew::prelude::*;

// Yew msg components
pub enum Msg {
    // Capture
    FileChosen(GlooFile),
    PreviewReady(StageId, String),
    PreviewFailed(StageId, ClientError),
    SetDragging(bool),
    HandleDrop(DragEvent),
    HandlePaste(ClipboardEvent),
    StartCamera,
    CameraReady(MediaStream),
    CameraFailed(ClientError),
    CaptureFrame,
    StopCamera,

    // Analysis
    Analyze,
    AnalysisFinished(Ticket, Result<PredictionResponse, ClientError>),
    NewAnalysis,

    // History
    RefreshHistory,
    HistoryLoaded(Ticket, Vec<HistoryEntry>),
    ClearHistory,

    // UI states
    DismissError,
    HealthChecked(Option<HealthResponse>),
    ToggleTheme,
}

#[derive(Clone, Debug, PartialEq)]
pub enum HealthStatus {
    Checking,
    Online(Option<String>),
    Unreachable,
}

// Main component
pub struct Model {
    pub config: Rc<AppConfig>,
    pub state: AppState<GlooFile>,
    pub camera: CameraController<WebcamSession>,
    pub camera_starting: bool,
    pub chart: ChartAdapter,
    pub chart_dirty: bool,
    pub is_dragging: bool,
    pub theme: Theme,
    pub health: HealthStatus,
    pub paste_listener: Option<EventListener>,
    pub file_input_ref: NodeRef,
    pub video_ref: NodeRef,
    pub canvas_ref: NodeRef,
    pub results_ref: NodeRef,
    pub chart_ref: NodeRef,
}

impl Component for Model {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let mut model = Self {
            config: Rc::new(AppConfig::load()),
            state: AppState::default(),
            camera: CameraController::default(),
            camera_starting: false,
            chart: ChartAdapter::default(),
            chart_dirty: false,
            is_dragging: false,
            theme: Theme::load(),
            health: HealthStatus::Checking,
            paste_listener: None,
            file_input_ref: NodeRef::default(),
            video_ref: NodeRef::default(),
            canvas_ref: NodeRef::default(),
            results_ref: NodeRef::default(),
            chart_ref: NodeRef::default(),
        };
        model.theme.apply();

        if let Some(window) = web_sys::window() {
            let link = ctx.link().clone();
            let listener = EventListener::new(&window, "paste", move |event| {
                if let Some(clipboard_event) = event.dyn_ref::<ClipboardEvent>() {
                    link.send_message(Msg::HandlePaste(clipboard_event.clone()));
                }
            });
            model.paste_listener = Some(listener);
        }

        handlers::check_health(ctx, &model.config);
        ctx.link().send_message(Msg::RefreshHistory);

        model
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            // Capture
            Msg::FileChosen(file) => handlers::handle_file_chosen(self, ctx, file),
            Msg::PreviewReady(id, data_uri) => self.state.preview_ready(id, data_uri),
            Msg::PreviewFailed(id, err) => self.state.preview_failed(id, &err),
            Msg::SetDragging(is_dragging) => {
                self.is_dragging = is_dragging;
                true
            }
            Msg::HandleDrop(event) => handlers::handle_drop(self, ctx, event),
            Msg::HandlePaste(event) => handlers::handle_paste(ctx, event),
            Msg::StartCamera => handlers::handle_start_camera(self, ctx),
            Msg::CameraReady(stream) => handlers::handle_camera_ready(self, stream),
            Msg::CameraFailed(err) => {
                self.camera_starting = false;
                log::error!("❌ Camera unavailable: {}", err);
                self.state.set_error(&err);
                true
            }
            Msg::CaptureFrame => handlers::handle_capture(self),
            Msg::StopCamera => self.camera.stop(),

            // Analysis
            Msg::Analyze => handlers::handle_analyze(self, ctx),
            Msg::AnalysisFinished(ticket, result) => {
                handlers::handle_analysis_finished(self, ctx, ticket, result)
            }
            Msg::NewAnalysis => handlers::handle_new_analysis(self),

            // History
            Msg::RefreshHistory => {
                handlers::refresh_history(self, ctx);
                false
            }
            Msg::HistoryLoaded(ticket, entries) => self.state.history_loaded(ticket, entries),
            Msg::ClearHistory => {
                handlers::handle_clear_history(self, ctx);
                false
            }

            // UI states
            Msg::DismissError => {
                self.state.clear_error();
                true
            }
            Msg::HealthChecked(health) => {
                self.health = match health {
                    Some(health) => HealthStatus::Online(health.version),
                    None => HealthStatus::Unreachable,
                };
                true
            }
            Msg::ToggleTheme => {
                self.theme = self.theme.toggled();
                self.theme.apply();
                self.theme.store();
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        html! {
            <div class="container">
                { components::header::render_header(&self.health) }
                { components::theme_toggle::render_theme_toggle(self.theme, ctx.link()) }

                <main class="main-content">
                    <div class="capture-grid">
                        { components::upload_section::render_upload_section(self, ctx) }
                        { components::webcam::render_webcam_section(self, ctx) }
                    </div>
                    { components::utils::render_error_message(self, ctx) }
                    { components::preview_area::render_preview_area(self, ctx) }
                    { components::results::render_results(self, ctx) }
                    { components::history::render_history(self, ctx) }
                </main>

                <footer class="app-footer">
                    <p>{"Plant Disease Detection | Fullstack Rust WASM"}</p>
                </footer>
            </div>
        }
    }

    fn rendered(&mut self, _ctx: &Context<Self>, _first_render: bool) {
        if self.chart_dirty {
            self.chart_dirty = false;
            handlers::present_result(self);
        }
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        self.camera.stop();
        self.chart.clear();
    }
}

fn main() {
    let config = AppConfig::load();
    wasm_logger::init(wasm_logger::Config::new(config.log_level));
    log::info!("App starting...");
    yew::Renderer::<Model>::new().render();
}
