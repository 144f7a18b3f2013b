use super::utils::debounce;
use crate::state::PendingImage;
use crate::{Model, Msg};
use yew::prelude::*;

pub fn render_preview_area(model: &Model, ctx: &Context<Model>) -> Html {
    if model.state.is_loading() {
        return render_loading_indicator();
    }
    if !model.state.preview_visible() {
        return html! {};
    }

    let link = ctx.link().clone();

    html! {
        <div id="preview-container" class="card">
            <h2>{"Preview"}</h2>
            { render_selected_image_preview(model) }
            <div class="button-container">
                <button
                    id="clear-btn"
                    class="analyze-btn secondary"
                    onclick={link.callback(|_| Msg::NewAnalysis)}
                >
                    <i class="fa-solid fa-rotate-left"></i>{" Clear"}
                </button>
                <button
                    id="analyze-btn"
                    class="analyze-btn"
                    onclick={debounce(300, {
                        let link = link.clone();
                        move || link.send_message(Msg::Analyze)
                    })}
                >
                    <i class="fa-solid fa-magnifying-glass"></i>{ render_analyze_label(model) }
                </button>
            </div>
        </div>
    }
}

fn render_selected_image_preview(model: &Model) -> Html {
    match model.state.preview() {
        Some(src) => html! {
            <img id="actual-image-preview" src={src.to_string()} alt="Image Preview" />
        },
        None => html! {
            <div class="loading-preview">
                <i class="fa-solid fa-spinner fa-spin fa-2x"></i>
                <p style="margin-left: 10px;">{"Loading preview..."}</p>
            </div>
        },
    }
}

fn render_analyze_label(model: &Model) -> String {
    let name = match model.state.pending() {
        Some(PendingImage::File(file)) => file.name(),
        Some(PendingImage::DataUri(_)) => "camera capture".to_string(),
        None => "Selected Image".to_string(),
    };

    let display_name = if name.chars().count() > 20 {
        format!("{}...", name.chars().take(17).collect::<String>())
    } else {
        name
    };

    format!(" Analyze \"{}\"", display_name)
}

fn render_loading_indicator() -> Html {
    html! {
        <div id="loading-indicator" class="loading-indicator card">
            <i class="fa-solid fa-spinner fa-spin fa-2x"></i>
            <p>{"Analyzing image..."}</p>
        </div>
    }
}
