use crate::view_model::{RankedRow, ResultView, TreatmentView};
use crate::{Model, Msg};
use yew::prelude::*;

pub fn render_results(model: &Model, ctx: &Context<Model>) -> Html {
    let Some(result) = model.state.result() else {
        return html! {};
    };
    let view = ResultView::from(result);

    html! {
        <section id="results-section" class="results-container card" ref={model.results_ref.clone()}>
            <div class="result-header">
                <img id="result-image" src={view.image_url.clone()} alt={view.headline.clone()} />
                <div class="result-summary">
                    <h2 id="disease-name">{ view.headline.clone() }</h2>
                    { render_gauge(&view) }
                    <span id="severity-indicator" class={view.severity.class.clone()}>
                        { view.severity.text.clone() }
                    </span>
                </div>
            </div>

            <div class="detailed-results">
                <h3>{"Top 3 predictions"}</h3>
                <div id="top3-predictions" class="result-bars">
                    { for view.ranked.iter().map(render_ranked_row) }
                </div>
                <div class="chart-container">
                    <canvas id="confidence-chart" ref={model.chart_ref.clone()}></canvas>
                </div>
            </div>

            { render_treatment(&view.treatment) }

            <div class="button-container">
                <button
                    id="new-analysis-btn"
                    class="analyze-btn"
                    onclick={ctx.link().callback(|_| Msg::NewAnalysis)}
                >
                    <i class="fa-solid fa-plus"></i>{" New analysis"}
                </button>
            </div>
        </section>
    }
}

fn render_gauge(view: &ResultView) -> Html {
    html! {
        <div class="confidence-meter">
            <svg viewBox="0 0 36 36" class="circular-chart">
                <path
                    class="circle-bg"
                    d="M18 2.0845 a 15.9155 15.9155 0 0 1 0 31.831 a 15.9155 15.9155 0 0 1 0 -31.831"
                />
                <path
                    id="confidence-circle"
                    class="circle"
                    style={format!("stroke-dasharray: {}", view.gauge.dash_array)}
                    d="M18 2.0845 a 15.9155 15.9155 0 0 1 0 31.831 a 15.9155 15.9155 0 0 1 0 -31.831"
                />
                <text id="confidence-text" x="18" y="20.35" class="percentage">
                    { view.gauge.text.clone() }
                </text>
            </svg>
            <div class="meter-label">{"Confidence"}</div>
        </div>
    }
}

fn render_ranked_row(row: &RankedRow) -> Html {
    html! {
        <div class="prediction-item" key={row.rank.clone()}>
            <div class="prediction-rank">{ row.rank.clone() }</div>
            <div class="prediction-details">
                <div class="prediction-name">{ row.label.clone() }</div>
                <div class="prediction-bar">
                    <div class="prediction-fill" style={row.fill_style.clone()}></div>
                </div>
                <div class="prediction-confidence">{ row.confidence.clone() }</div>
            </div>
        </div>
    }
}

fn render_treatment(treatment: &TreatmentView) -> Html {
    html! {
        <div class="treatment-info">
            <h3><i class="fa-solid fa-stethoscope"></i>{" Diagnosis"}</h3>
            <p id="diagnosis">{ treatment.diagnosis.clone() }</p>
            <h3><i class="fa-solid fa-prescription-bottle-medical"></i>{" Treatment"}</h3>
            <p id="treatment">{ treatment.treatment.clone() }</p>
            <h3><i class="fa-solid fa-shield-halved"></i>{" Prevention"}</h3>
            <ul id="prevention-list">
                { for treatment.prevention.iter().map(|item| html! { <li>{ item.clone() }</li> }) }
            </ul>
        </div>
    }
}
