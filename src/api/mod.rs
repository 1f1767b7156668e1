use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use clap::{Parser, ValueEnum};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::core::{
    ChartPoint, CurrencyFormat, DEFAULT_REINVEST_THRESHOLD, MonthlyRecord, ProjectionParameters,
    ProjectionSummary, project,
};

const INDEX_HTML: &str = include_str!("../../web/index.html");
const STYLES_CSS: &str = include_str!("../../web/styles.css");
const APP_JS: &str = include_str!("../../web/app.js");

const MAX_MONTHS: u32 = 1_200;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ProjectPayload {
    initial_capital: Option<f64>,
    months: Option<u32>,
    annual_rate: Option<f64>,
    monthly_contribution: Option<f64>,
    reinvest_threshold: Option<f64>,
    currency_prefix: Option<String>,
    group_separator: Option<String>,
}

#[derive(Parser, Debug)]
#[command(
    name = "reinvest",
    about = "Monthly profit projection with whole-unit reinvestment of accumulated interest"
)]
pub struct Cli {
    #[arg(
        long,
        default_value_t = 1_000_000.0,
        help = "Initial capital; at least one reinvestment unit"
    )]
    initial_capital: f64,
    #[arg(long, default_value_t = 12, help = "Number of months to project")]
    months: u32,
    #[arg(
        long,
        default_value_t = 6.5,
        help = "Annual interest rate in percent, e.g. 6.5"
    )]
    annual_rate: f64,
    #[arg(
        long,
        default_value_t = 0.0,
        help = "Fixed contribution added at the start of every month"
    )]
    monthly_contribution: f64,
    #[arg(
        long,
        default_value_t = DEFAULT_REINVEST_THRESHOLD,
        help = "Accumulated interest is moved into capital in whole multiples of this amount"
    )]
    reinvest_threshold: f64,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    #[arg(long, default_value = "Rp", help = "Currency prefix for text output")]
    currency_prefix: String,
    #[arg(
        long,
        default_value_t = '.',
        help = "Thousands separator for text output"
    )]
    group_separator: char,
}

#[derive(Debug)]
struct ApiRequest {
    params: ProjectionParameters,
    currency: CurrencyFormat,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectResponse {
    parameters: ProjectionParameters,
    summary: ProjectionSummary,
    records: Vec<MonthlyRecord>,
    lines: Vec<String>,
    chart: Vec<ChartPoint>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn build_params(cli: &Cli) -> Result<ProjectionParameters, String> {
    for (name, value) in [
        ("--initial-capital", cli.initial_capital),
        ("--annual-rate", cli.annual_rate),
        ("--monthly-contribution", cli.monthly_contribution),
        ("--reinvest-threshold", cli.reinvest_threshold),
    ] {
        if !value.is_finite() {
            return Err(format!("{name} must be a finite number"));
        }
    }

    if cli.months == 0 {
        return Err("--months must be >= 1".to_string());
    }

    if cli.months > MAX_MONTHS {
        return Err(format!("--months must be <= {MAX_MONTHS}"));
    }

    if cli.reinvest_threshold <= 0.0 {
        return Err("--reinvest-threshold must be > 0".to_string());
    }

    if cli.initial_capital < cli.reinvest_threshold {
        return Err("--initial-capital must be >= --reinvest-threshold".to_string());
    }

    if cli.annual_rate < 0.0 {
        return Err("--annual-rate must be >= 0".to_string());
    }

    if cli.monthly_contribution < 0.0 {
        return Err("--monthly-contribution must be >= 0".to_string());
    }

    Ok(
        ProjectionParameters::new(cli.initial_capital, cli.annual_rate, cli.months)
            .with_monthly_contribution(cli.monthly_contribution)
            .with_reinvest_threshold(cli.reinvest_threshold),
    )
}

fn currency_format(cli: &Cli) -> CurrencyFormat {
    CurrencyFormat {
        prefix: cli.currency_prefix.clone(),
        group_separator: cli.group_separator,
    }
}

fn build_response(
    params: &ProjectionParameters,
    currency: &CurrencyFormat,
) -> Result<ProjectResponse, String> {
    let result = project(params).map_err(|e| e.to_string())?;
    let lines = result
        .records()
        .iter()
        .map(|record| currency.display_line(record))
        .collect();

    Ok(ProjectResponse {
        parameters: *params,
        summary: result.summary(),
        chart: result.capital_series(),
        lines,
        records: result.into_records(),
    })
}

/// Parses the process arguments, runs one projection and prints it to stdout.
pub fn run_cli() -> Result<(), String> {
    let cli = Cli::parse();
    let params = build_params(&cli)?;
    let currency = currency_format(&cli);
    let response = build_response(&params, &currency)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    render(cli.format, &response, &currency, &mut out)
}

fn render<W: Write>(
    format: OutputFormat,
    response: &ProjectResponse,
    currency: &CurrencyFormat,
    out: &mut W,
) -> Result<(), String> {
    match format {
        OutputFormat::Text => render_text(response, currency, out)
            .map_err(|e| format!("failed to write output: {e}")),
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, response)
                .map_err(|e| format!("failed to serialize response: {e}"))?;
            writeln!(out).map_err(|e| format!("failed to write output: {e}"))
        }
        OutputFormat::Csv => render_csv(&response.records, out),
    }
}

fn render_text<W: Write>(
    response: &ProjectResponse,
    currency: &CurrencyFormat,
    out: &mut W,
) -> std::io::Result<()> {
    let summary = &response.summary;
    writeln!(out, "Monthly Profit Breakdown")?;
    for line in &response.lines {
        writeln!(out, "{line}")?;
    }
    writeln!(out)?;
    writeln!(out, "Final capital: {}", currency.format(summary.final_capital))?;
    writeln!(
        out,
        "Accumulated interest: {}",
        currency.format(summary.remaining_accumulated_interest)
    )?;
    writeln!(
        out,
        "Total interest earned: {}",
        currency.format(summary.total_interest_earned)
    )?;
    writeln!(
        out,
        "Total reinvested: {}",
        currency.format(summary.total_reinvested)
    )?;
    if summary.total_contributions > 0.0 {
        writeln!(
            out,
            "Total contributions: {}",
            currency.format(summary.total_contributions)
        )?;
    }
    Ok(())
}

fn render_csv<W: Write>(records: &[MonthlyRecord], out: &mut W) -> Result<(), String> {
    let mut wtr = csv::Writer::from_writer(out);
    for record in records {
        wtr.serialize(record)
            .map_err(|e| format!("failed to write CSV row: {e}"))?;
    }
    wtr.flush()
        .map_err(|e| format!("failed to write output: {e}"))
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route("/styles.css", get(styles_handler))
        .route("/app.js", get(app_js_handler))
        .route(
            "/api/project",
            get(project_get_handler).post(project_post_handler),
        )
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    info!("projection HTTP API listening on http://{addr}");
    info!("local access: http://127.0.0.1:{port}/");

    axum::serve(listener, app).await
}

async fn index_handler() -> impl IntoResponse {
    with_cache_control(Html(INDEX_HTML))
}

async fn styles_handler() -> impl IntoResponse {
    with_cache_control((
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        STYLES_CSS,
    ))
}

async fn app_js_handler() -> impl IntoResponse {
    with_cache_control((
        [(
            header::CONTENT_TYPE,
            "application/javascript; charset=utf-8",
        )],
        APP_JS,
    ))
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn project_get_handler(Query(payload): Query<ProjectPayload>) -> Response {
    project_handler_impl(payload)
}

async fn project_post_handler(Json(payload): Json<ProjectPayload>) -> Response {
    project_handler_impl(payload)
}

fn project_handler_impl(payload: ProjectPayload) -> Response {
    let request = match api_request_from_payload(payload) {
        Ok(request) => request,
        Err(msg) => {
            warn!("rejected projection request: {msg}");
            return error_response(StatusCode::BAD_REQUEST, &msg);
        }
    };

    debug!("projection request: {:?}", request.params);
    match build_response(&request.params, &request.currency) {
        Ok(response) => json_response(StatusCode::OK, response),
        Err(msg) => error_response(StatusCode::BAD_REQUEST, &msg),
    }
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    with_cache_control((status, Json(body)))
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
fn api_request_from_json(json: &str) -> Result<ApiRequest, String> {
    let payload = serde_json::from_str::<ProjectPayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    api_request_from_payload(payload)
}

fn api_request_from_payload(payload: ProjectPayload) -> Result<ApiRequest, String> {
    let mut cli = default_cli_for_api();

    if let Some(v) = payload.initial_capital {
        cli.initial_capital = v;
    }
    if let Some(v) = payload.months {
        cli.months = v;
    }
    if let Some(v) = payload.annual_rate {
        cli.annual_rate = v;
    }
    if let Some(v) = payload.monthly_contribution {
        cli.monthly_contribution = v;
    }
    if let Some(v) = payload.reinvest_threshold {
        cli.reinvest_threshold = v;
    }
    if let Some(v) = payload.currency_prefix {
        cli.currency_prefix = v;
    }
    if let Some(v) = payload.group_separator {
        let mut chars = v.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => cli.group_separator = c,
            _ => return Err("groupSeparator must be a single character".to_string()),
        }
    }

    let params = build_params(&cli)?;
    Ok(ApiRequest {
        params,
        currency: currency_format(&cli),
    })
}

fn default_cli_for_api() -> Cli {
    Cli {
        initial_capital: 1_000_000.0,
        months: 12,
        annual_rate: 6.5,
        monthly_contribution: 0.0,
        reinvest_threshold: DEFAULT_REINVEST_THRESHOLD,
        format: OutputFormat::Json,
        currency_prefix: "Rp".to_string(),
        group_separator: '.',
    }
}
