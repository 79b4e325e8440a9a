mod error;
pub mod report;

use axum::{
    Router,
    extract::{Json, Query},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use crate::core::{PlanInputs, PlanResult, Readiness, compute_plan};
pub use error::ApiError;
use report::{OverviewRow, overview_csv, overview_rows};

const MIN_CURRENT_AGE: u32 = 16;
const MAX_CURRENT_AGE: u32 = 80;
const MAX_TARGET_AGE: u32 = 90;
const MAX_LIFE_EXPECTANCY: u32 = 110;

const OVERVIEW_CONTENT_TYPE: &str = "text/csv; charset=utf-8";
const OVERVIEW_DISPOSITION: &str = "attachment; filename=\"fi_overview.csv\"";

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct PlanPayload {
    current_age: Option<u32>,
    target_age: Option<u32>,
    life_expectancy: Option<u32>,

    inflation_rate: Option<f64>,
    pre_target_return: Option<f64>,
    post_target_return: Option<f64>,
    existing_return: Option<f64>,

    monthly_expense: Option<f64>,
    annual_expense: Option<f64>,
    current_investments: Option<f64>,
    inheritance_goal: Option<f64>,
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "fi-planner",
    about = "Financial independence planner (corpus, SIP and lumpsum with spreadsheet-parity FV/PV/PMT)"
)]
struct Cli {
    #[arg(long, default_value_t = 25)]
    current_age: u32,
    #[arg(
        long,
        default_value_t = 60,
        help = "Age at which financial independence is targeted"
    )]
    target_age: u32,
    #[arg(long, default_value_t = 90, help = "Age to fund expenses through")]
    life_expectancy: u32,
    #[arg(
        long,
        default_value_t = 5.0,
        help = "Expected annual expense inflation in percent"
    )]
    inflation_rate: f64,
    #[arg(
        long,
        default_value_t = 10.0,
        help = "Expected annual return before the target age in percent"
    )]
    pre_target_return: f64,
    #[arg(
        long,
        default_value_t = 7.0,
        help = "Expected annual return after the target age in percent"
    )]
    post_target_return: f64,
    #[arg(
        long,
        default_value_t = 8.0,
        help = "Expected annual return on existing investments in percent"
    )]
    existing_return: f64,
    #[arg(long, default_value_t = 50_000.0)]
    monthly_expense: f64,
    #[arg(long, help = "Current yearly expenses; defaults to 12 x --monthly-expense")]
    annual_expense: Option<f64>,
    #[arg(long, default_value_t = 1_000_000.0)]
    current_investments: f64,
    #[arg(
        long,
        default_value_t = 0.0,
        help = "Amount to leave as inheritance at life expectancy"
    )]
    inheritance_goal: f64,
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PlanResponse {
    years_to_target: u32,
    years_post_target: u32,
    readiness: Readiness,
    surplus: bool,
    gap_to_fund: f64,
    result: PlanResult,
    overview: Vec<OverviewRow>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn build_inputs(cli: &Cli) -> Result<PlanInputs, ApiError> {
    if !(MIN_CURRENT_AGE..=MAX_CURRENT_AGE).contains(&cli.current_age) {
        return Err(ApiError::validation(format!(
            "--current-age must be between {MIN_CURRENT_AGE} and {MAX_CURRENT_AGE}"
        )));
    }

    if cli.target_age <= cli.current_age {
        return Err(ApiError::validation("--target-age must be > --current-age"));
    }

    if cli.target_age > MAX_TARGET_AGE {
        return Err(ApiError::validation(format!(
            "--target-age must be <= {MAX_TARGET_AGE}"
        )));
    }

    if cli.life_expectancy <= cli.target_age {
        return Err(ApiError::validation(
            "--life-expectancy must be > --target-age",
        ));
    }

    if cli.life_expectancy > MAX_LIFE_EXPECTANCY {
        return Err(ApiError::validation(format!(
            "--life-expectancy must be <= {MAX_LIFE_EXPECTANCY}"
        )));
    }

    for (name, rate, max) in [
        ("--inflation-rate", cli.inflation_rate, 20.0),
        ("--pre-target-return", cli.pre_target_return, 30.0),
        ("--post-target-return", cli.post_target_return, 20.0),
        ("--existing-return", cli.existing_return, 20.0),
    ] {
        if !(0.0..=max).contains(&rate) {
            return Err(ApiError::validation(format!(
                "{name} must be between 0 and {max}"
            )));
        }
    }

    let annual_expense = cli.annual_expense.unwrap_or(cli.monthly_expense * 12.0);

    for (name, amount) in [
        ("--monthly-expense", cli.monthly_expense),
        ("--annual-expense", annual_expense),
        ("--current-investments", cli.current_investments),
        ("--inheritance-goal", cli.inheritance_goal),
    ] {
        if !amount.is_finite() || amount < 0.0 {
            return Err(ApiError::validation(format!("{name} must be >= 0")));
        }
    }

    Ok(PlanInputs {
        current_age: cli.current_age,
        target_age: cli.target_age,
        life_expectancy_age: cli.life_expectancy,
        inflation_rate: cli.inflation_rate / 100.0,
        pre_target_return_rate: cli.pre_target_return / 100.0,
        post_target_return_rate: cli.post_target_return / 100.0,
        existing_asset_return_rate: cli.existing_return / 100.0,
        current_monthly_expense: cli.monthly_expense,
        current_annual_expense: annual_expense,
        current_investments: cli.current_investments,
        inheritance_goal: cli.inheritance_goal,
    })
}

/// Runs the `plan` command line and returns the rendered output.
///
/// `args` excludes the program and subcommand names.
pub fn run_cli<I, T>(args: I) -> Result<String, ApiError>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString>,
{
    let cli = Cli::try_parse_from(
        std::iter::once(std::ffi::OsString::from("fi-planner plan"))
            .chain(args.into_iter().map(Into::into)),
    )?;
    let inputs = build_inputs(&cli)?;
    let result = compute_plan(&inputs)?;
    debug!(
        current_age = inputs.current_age,
        target_age = inputs.target_age,
        corpus = result.displayed_required_corpus,
        "plan computed"
    );

    match cli.format {
        OutputFormat::Json => {
            let response = build_plan_response(&inputs, result);
            Ok(format!("{}\n", serde_json::to_string_pretty(&response)?))
        }
        OutputFormat::Csv => overview_csv(&overview_rows(&result)),
    }
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route("/api/plan", get(plan_get_handler).post(plan_post_handler))
        .route(
            "/api/plan/overview.csv",
            get(overview_get_handler).post(overview_post_handler),
        )
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "FI planner HTTP API listening");
    info!("Local access: http://127.0.0.1:{port}/api/plan");

    axum::serve(listener, app).await
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn plan_get_handler(Query(payload): Query<PlanPayload>) -> Response {
    plan_handler_impl(payload)
}

async fn plan_post_handler(Json(payload): Json<PlanPayload>) -> Response {
    plan_handler_impl(payload)
}

async fn overview_get_handler(Query(payload): Query<PlanPayload>) -> Response {
    overview_handler_impl(payload)
}

async fn overview_post_handler(Json(payload): Json<PlanPayload>) -> Response {
    overview_handler_impl(payload)
}

fn plan_handler_impl(payload: PlanPayload) -> Response {
    match evaluate_payload(payload) {
        Ok((inputs, result)) => json_response(StatusCode::OK, build_plan_response(&inputs, result)),
        Err(err) => api_error_response(&err),
    }
}

fn overview_handler_impl(payload: PlanPayload) -> Response {
    let csv = evaluate_payload(payload)
        .and_then(|(_, result)| overview_csv(&overview_rows(&result)));
    match csv {
        Ok(body) => with_cache_control((
            [
                (header::CONTENT_TYPE, HeaderValue::from_static(OVERVIEW_CONTENT_TYPE)),
                (
                    header::CONTENT_DISPOSITION,
                    HeaderValue::from_static(OVERVIEW_DISPOSITION),
                ),
            ],
            body,
        )),
        Err(err) => api_error_response(&err),
    }
}

fn evaluate_payload(payload: PlanPayload) -> Result<(PlanInputs, PlanResult), ApiError> {
    let inputs = plan_inputs_from_payload(payload)?;
    let result = compute_plan(&inputs)?;
    debug!(
        current_age = inputs.current_age,
        target_age = inputs.target_age,
        corpus = result.displayed_required_corpus,
        "plan computed"
    );
    Ok((inputs, result))
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
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

fn api_error_response(err: &ApiError) -> Response {
    let status = err.status();
    warn!(%status, error = %err, "rejected plan request");
    error_response(status, &err.to_string())
}

#[cfg(test)]
fn plan_inputs_from_json(json: &str) -> Result<PlanInputs, ApiError> {
    let payload = serde_json::from_str::<PlanPayload>(json)?;
    plan_inputs_from_payload(payload)
}

fn plan_inputs_from_payload(payload: PlanPayload) -> Result<PlanInputs, ApiError> {
    let mut cli = default_cli_for_api();

    if let Some(v) = payload.current_age {
        cli.current_age = v;
    }
    if let Some(v) = payload.target_age {
        cli.target_age = v;
    }
    if let Some(v) = payload.life_expectancy {
        cli.life_expectancy = v;
    }

    if let Some(v) = payload.inflation_rate {
        cli.inflation_rate = v;
    }
    if let Some(v) = payload.pre_target_return {
        cli.pre_target_return = v;
    }
    if let Some(v) = payload.post_target_return {
        cli.post_target_return = v;
    }
    if let Some(v) = payload.existing_return {
        cli.existing_return = v;
    }

    if let Some(v) = payload.monthly_expense {
        cli.monthly_expense = v;
    }
    if let Some(v) = payload.annual_expense {
        cli.annual_expense = Some(v);
    }
    if let Some(v) = payload.current_investments {
        cli.current_investments = v;
    }
    if let Some(v) = payload.inheritance_goal {
        cli.inheritance_goal = v;
    }

    build_inputs(&cli)
}

fn default_cli_for_api() -> Cli {
    Cli {
        current_age: 25,
        target_age: 60,
        life_expectancy: 90,
        inflation_rate: 5.0,
        pre_target_return: 10.0,
        post_target_return: 7.0,
        existing_return: 8.0,
        monthly_expense: 50_000.0,
        annual_expense: None,
        current_investments: 1_000_000.0,
        inheritance_goal: 0.0,
        format: OutputFormat::Json,
    }
}

fn build_plan_response(inputs: &PlanInputs, result: PlanResult) -> PlanResponse {
    PlanResponse {
        years_to_target: inputs.years_to_target(),
        years_post_target: inputs.years_post_target(),
        readiness: result.readiness(),
        surplus: result.has_surplus(),
        gap_to_fund: result.gap_to_fund(),
        result,
        overview: overview_rows(&result),
    }
}
