use crate::HealthStatus;
use yew::prelude::*;

/// Renders the application header with the backend status badge
pub fn render_header(health: &HealthStatus) -> Html {
    let (class, text) = match health {
        HealthStatus::Checking => ("api-status checking", "Checking API...".to_string()),
        HealthStatus::Online(Some(version)) => ("api-status online", format!("API online v{}", version)),
        HealthStatus::Online(None) => ("api-status online", "API online".to_string()),
        HealthStatus::Unreachable => ("api-status offline", "API unreachable".to_string()),
    };

    html! {
        <header class="app-header">
            <h1><i class="fa-solid fa-leaf"></i> {" Plant Disease Detection"}</h1>
            <p class="subtitle">{"Upload a leaf photo or capture one with your camera"}</p>
            <span class={class}>{ text }</span>
        </header>
    }
}
