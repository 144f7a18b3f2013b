use super::handlers::first_file;
use super::utils::debounce;
use crate::{Model, Msg};
use web_sys::{DragEvent, HtmlInputElement};
use yew::prelude::*;

pub fn render_upload_section(model: &Model, ctx: &Context<Model>) -> Html {
    let link = ctx.link();

    let handle_change = link.batch_callback(|e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        let chosen = input.files().and_then(|files| first_file(&files, false));
        input.set_value("");
        chosen.map(Msg::FileChosen)
    });

    let handle_drag_over = link.callback(|e: DragEvent| {
        e.prevent_default();
        Msg::SetDragging(true)
    });

    let handle_drag_leave = link.callback(|e: DragEvent| {
        e.prevent_default();
        Msg::SetDragging(false)
    });

    let handle_drop = link.callback(Msg::HandleDrop);
    let trigger_file_input = {
        let input_ref = model.file_input_ref.clone();
        move || {
            if let Some(input) = input_ref.cast::<HtmlInputElement>() {
                input.click();
            }
        }
    };

    html! {
        <div class="upload-section card">
            <h2><i class="fa-solid fa-upload"></i>{" Upload image"}</h2>
            <input
                type="file"
                id="file-input"
                ref={model.file_input_ref.clone()}
                accept="image/png,image/jpeg,image/jpg"
                style="display: none;"
                onchange={handle_change}
            />

            <div
                id="drop-zone"
                class={classes!("upload-area", model.is_dragging.then_some("drag-over"))}
                ondragover={handle_drag_over}
                ondragleave={handle_drag_leave}
                ondrop={handle_drop}
                onclick={debounce(300, trigger_file_input.clone())}
            >
                <div class="upload-placeholder">
                    <i class="fa-solid fa-cloud-arrow-up"></i>
                    <p>{"Drag & drop a leaf photo here, paste, or click"}</p>
                    <p class="file-types">{"Supported formats: PNG, JPG, JPEG (max 16 MB)"}</p>
                </div>
            </div>

            <button
                id="upload-button"
                class="analyze-btn"
                onclick={debounce(300, trigger_file_input)}
            >
                <i class="fa-solid fa-folder-open"></i> {" Select Image"}
            </button>
        </div>
    }
}
