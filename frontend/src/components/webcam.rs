use crate::{Model, Msg};
use yew::prelude::*;

pub fn render_webcam_section(model: &Model, ctx: &Context<Model>) -> Html {
    let link = ctx.link();
    let live = model.camera.is_live();

    html! {
        <div class="webcam-section card">
            <h2><i class="fa-solid fa-camera"></i>{" Camera"}</h2>
            <video
                id="webcam"
                ref={model.video_ref.clone()}
                autoplay=true
                playsinline=true
                muted=true
                hidden={!live}
            />
            <canvas id="canvas" ref={model.canvas_ref.clone()} hidden=true />
            if !live {
                <div class="webcam-placeholder">
                    if model.camera_starting {
                        <i class="fa-solid fa-spinner fa-spin"></i>
                        <p>{"Waiting for camera permission..."}</p>
                    } else {
                        <i class="fa-solid fa-video-slash"></i>
                        <p>{"Camera is off"}</p>
                    }
                </div>
            }
            <div class="button-container">
                <button
                    id="start-webcam-btn"
                    class="analyze-btn"
                    disabled={live || model.camera_starting}
                    onclick={link.callback(|_| Msg::StartCamera)}
                >
                    <i class="fa-solid fa-video"></i>{" Start camera"}
                </button>
                <button
                    id="capture-btn"
                    class="analyze-btn"
                    disabled={!live}
                    onclick={link.callback(|_| Msg::CaptureFrame)}
                >
                    <i class="fa-solid fa-camera-retro"></i>{" Capture"}
                </button>
                <button
                    id="stop-webcam-btn"
                    class="analyze-btn secondary"
                    disabled={!live}
                    onclick={link.callback(|_| Msg::StopCamera)}
                >
                    <i class="fa-solid fa-stop"></i>{" Stop"}
                </button>
            </div>
        </div>
    }
}
