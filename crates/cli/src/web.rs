use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use empathy_engine_core::engine::{EmpathyEngine, EngineError, SpeechOutcome};
use serde::Deserialize;
use std::fmt::Write as _;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

const LOG_TARGET: &str = "web";
pub const AUDIO_ROUTE: &str = "/static/output";

#[derive(Debug, Deserialize)]
pub struct SpeakForm {
    #[serde(default)]
    text: String,
}

#[derive(Default)]
struct Page<'a> {
    input_text: &'a str,
    outcome: Option<&'a SpeechOutcome>,
    error: Option<String>,
}

pub fn router(engine: Arc<EmpathyEngine>) -> Router {
    let audio = ServeDir::new(engine.output_dir());
    Router::new()
        .route("/", get(index).post(speak))
        .nest_service(AUDIO_ROUTE, audio)
        .layer(TraceLayer::new_for_http())
        .with_state(engine)
}

async fn index() -> Html<String> {
    Html(render(&Page::default()))
}

async fn speak(
    State(engine): State<Arc<EmpathyEngine>>,
    Form(form): Form<SpeakForm>,
) -> (StatusCode, Html<String>) {
    let text = form.text.trim();
    match engine.speak(text).await {
        Ok(outcome) => (
            StatusCode::OK,
            Html(render(&Page {
                input_text: text,
                outcome: Some(&outcome),
                error: None,
            })),
        ),
        Err(EngineError::EmptyInput) => (
            StatusCode::BAD_REQUEST,
            Html(render(&Page {
                error: Some("Please enter some text.".to_owned()),
                ..Page::default()
            })),
        ),
        Err(e) => {
            tracing::error!(target: LOG_TARGET, error = %e, "speech generation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(render(&Page {
                    input_text: text,
                    outcome: None,
                    error: Some(format!("Could not generate speech: {e}")),
                })),
            )
        }
    }
}

fn render(page: &Page<'_>) -> String {
    let mut html = String::from(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>The Empathy Engine</title>\n</head>\n<body>\n<h1>The Empathy Engine</h1>\n\
         <form method=\"post\" action=\"/\">\n",
    );
    let _ = writeln!(
        html,
        "<textarea name=\"text\" rows=\"5\" cols=\"60\">{}</textarea>",
        escape_html(page.input_text)
    );
    html.push_str("<button type=\"submit\">Speak</button>\n</form>\n");

    if let Some(error) = &page.error {
        let _ = writeln!(html, "<p class=\"error\">{}</p>", escape_html(error));
    }
    if let Some(outcome) = page.outcome {
        let _ = writeln!(
            html,
            "<p>Detected emotion: <strong>{}</strong> ({} intensity)</p>",
            outcome.emotion, outcome.intensity
        );
        let _ = writeln!(
            html,
            "<audio controls src=\"{AUDIO_ROUTE}/{}\"></audio>",
            escape_html(&outcome.file_name)
        );
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
