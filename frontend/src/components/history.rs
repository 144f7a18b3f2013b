use super::utils::debounce;
use crate::view_model::{EMPTY_HISTORY_MESSAGE, HistoryRow, HistoryView};
use crate::{Model, Msg};
use yew::prelude::*;

pub fn render_history(model: &Model, ctx: &Context<Model>) -> Html {
    let link = ctx.link().clone();

    let body = match model.state.history() {
        None => html! { <p class="empty-message">{"Loading history..."}</p> },
        Some(entries) => match HistoryView::from(entries) {
            HistoryView::Empty => html! { <p class="empty-message">{ EMPTY_HISTORY_MESSAGE }</p> },
            HistoryView::Rows(rows) => html! {
                <>{ for rows.iter().map(render_history_row) }</>
            },
        },
    };

    html! {
        <section class="history-section card">
            <div class="history-header">
                <h2><i class="fa-solid fa-clock-rotate-left"></i>{" History"}</h2>
                <button
                    id="clear-history-btn"
                    class="analyze-btn danger"
                    onclick={debounce(300, move || link.send_message(Msg::ClearHistory))}
                >
                    <i class="fa-solid fa-trash"></i>{" Clear history"}
                </button>
            </div>
            <div id="history-list">
                { body }
            </div>
        </section>
    }
}

fn render_history_row(row: &HistoryRow) -> Html {
    html! {
        <div class="history-item">
            <img src={row.image_url.clone()} alt={row.label.clone()} />
            <div class="history-info">
                <div class="history-disease">{ row.label.clone() }</div>
                <div class="history-confidence">{ row.confidence.clone() }</div>
                <div class="history-time">{ row.timestamp.clone() }</div>
            </div>
        </div>
    }
}
