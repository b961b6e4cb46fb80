use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use pl_match_predictor::models::{PredictionRow, TeamWins};
use pl_match_predictor::{run_full_analysis, AnalysisConfig};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::services::ServeDir;

// Custom filters for formatting
mod filters {
    pub fn format_percent(value: &f64) -> ::askama::Result<String> {
        Ok(format!("{:.2}%", value))
    }
}

#[derive(Template)]
#[template(path = "home.html")]
struct HomeTemplate {
    active_page: String,
    initial_precision: f64,
    rolling_precision: f64,
    train_rows: usize,
    test_rows: usize,
    paired_pairs: usize,
    paired_precision: f64,
}

#[derive(Template)]
#[template(path = "model.html")]
struct ModelTemplate {
    active_page: String,
    title: String,
    description: String,
    precision: f64,
    sample: Vec<PredictionRow>,
}

#[derive(Template)]
#[template(path = "wins.html")]
struct WinsTemplate {
    active_page: String,
    predicted: Vec<TeamWins>,
    actual: Vec<TeamWins>,
}

struct HtmlTemplate<T>(T);

impl<T> IntoResponse for HtmlTemplate<T>
where
    T: Template,
{
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(html) => Html(html).into_response(),
            Err(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to render template: {}", err),
            )
                .into_response(),
        }
    }
}

// Shared state to cache the analysis
type SharedData = Arc<RwLock<Option<pl_match_predictor::AnalysisData>>>;

async fn home(data: axum::extract::State<SharedData>) -> impl IntoResponse {
    let analysis = data.read().await;

    let data = match analysis.as_ref() {
        Some(d) => d.clone(),
        None => {
            return (StatusCode::INTERNAL_SERVER_ERROR, "Data not loaded yet").into_response();
        }
    };

    let template = HomeTemplate {
        active_page: "home".to_string(),
        initial_precision: data.initial_report.precision_pct,
        rolling_precision: data.rolling_report.precision_pct,
        train_rows: data.rolling_report.train_rows,
        test_rows: data.rolling_report.test_rows,
        paired_pairs: data.paired.pairs,
        paired_precision: data.paired.precision_pct,
    };

    HtmlTemplate(template).into_response()
}

async fn initial_model(data: axum::extract::State<SharedData>) -> impl IntoResponse {
    let analysis = data.read().await;

    let data = match analysis.as_ref() {
        Some(d) => d.clone(),
        None => {
            return (StatusCode::INTERNAL_SERVER_ERROR, "Data not loaded yet").into_response();
        }
    };

    let template = ModelTemplate {
        active_page: "initial".to_string(),
        title: "Random Forest model".to_string(),
        description: "Matches before the cutoff date train the model; it then predicts \
                      the outcomes of later matches from the venue, opponent, kickoff hour \
                      and weekday, and the predictions are scored against the actual results."
            .to_string(),
        precision: data.initial_report.precision_pct,
        sample: data.initial_report.predictions.into_iter().take(20).collect(),
    };

    HtmlTemplate(template).into_response()
}

async fn rolling_model(data: axum::extract::State<SharedData>) -> impl IntoResponse {
    let analysis = data.read().await;

    let data = match analysis.as_ref() {
        Some(d) => d.clone(),
        None => {
            return (StatusCode::INTERNAL_SERVER_ERROR, "Data not loaded yet").into_response();
        }
    };

    let template = ModelTemplate {
        active_page: "rolling".to_string(),
        title: "Random Forest model with rolling averages".to_string(),
        description: "The same model boosted with each team's rolling average statistics \
                      from its last few matches, capturing current form. Accuracy is usually \
                      higher, though a hot or cold streak can still make individual \
                      predictions unrealistic."
            .to_string(),
        precision: data.rolling_report.precision_pct,
        sample: data.rolling_report.predictions.into_iter().take(20).collect(),
    };

    HtmlTemplate(template).into_response()
}

async fn wins(data: axum::extract::State<SharedData>) -> impl IntoResponse {
    let analysis = data.read().await;

    let data = match analysis.as_ref() {
        Some(d) => d.clone(),
        None => {
            return (StatusCode::INTERNAL_SERVER_ERROR, "Data not loaded yet").into_response();
        }
    };

    let template = WinsTemplate {
        active_page: "wins".to_string(),
        predicted: data.predicted_wins,
        actual: data.actual_wins,
    };

    HtmlTemplate(template).into_response()
}

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt::init();

    println!("Running match analysis...");

    let use_cache = std::env::var("USE_CACHE").unwrap_or_default() == "1";
    let config = AnalysisConfig::from_env();

    let data = match run_full_analysis(&config, use_cache) {
        Ok(data) => {
            println!("Analysis complete");
            println!(
                "  - Initial model precision: {:.2}%",
                data.initial_report.precision_pct
            );
            println!(
                "  - Rolling model precision: {:.2}%",
                data.rolling_report.precision_pct
            );
            println!("  - {} paired fixtures", data.paired.pairs);
            println!("  - {} teams with predicted wins", data.predicted_wins.len());
            Arc::new(RwLock::new(Some(data)))
        }
        Err(e) => {
            eprintln!("Error running analysis: {}", e);
            eprintln!("Server will start but pages may show errors");
            Arc::new(RwLock::new(None))
        }
    };

    println!("\nStarting web server at http://127.0.0.1:3000");
    println!("Press Ctrl+C to stop\n");

    // Build router with routes
    let app = Router::new()
        // This will serve files from the "static" directory at the "/static" URL path
        .nest_service("/static", ServeDir::new("static"))
        .route("/", get(home))
        .route("/model/initial", get(initial_model))
        .route("/model/rolling", get(rolling_model))
        .route("/wins", get(wins))
        .with_state(data);

    // Run server
    let listener = tokio::net::TcpListener::bind("127.0.0.1:3000")
        .await
        .unwrap();

    axum::serve(listener, app).await.unwrap();
}
