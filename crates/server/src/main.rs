//! Signal Board - moving-average band signals for daily stock closes
//!
//! Usage:
//!   signal-board serve --port 3002             - Launch the JSON API (and static UI)
//!   signal-board signals --date 2024-01-05     - Print the Buy/Sell/Hold board
//!   signal-board chart --symbol NTPC --period 14d - Print one stock's chart series

mod config;

use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use datastore::SeriesCache;
use engine::{
    BoardEntry, Dashboard, EngineError, Signal, SignalBoard, SignalParams, SignalRecord,
    TimePeriod,
};
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::{info, warn};

use crate::config::AppConfig;

const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "signal-board")]
#[command(about = "Moving-average band trading signals for daily stock closes", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Directory holding one CSV per stock (default: $SIGNAL_BOARD_DATA_DIR or ./data)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Stocks to load, as SYMBOL or SYMBOL=path (comma-separated). Default: every CSV in the data directory
    #[arg(long = "stock", global = true, value_delimiter = ',')]
    stocks: Vec<String>,

    /// Moving-average window in trading days
    #[arg(long, global = true, default_value_t = 10)]
    window: usize,

    /// Band width in standard deviations
    #[arg(long, global = true, default_value_t = 1.0)]
    k: f64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch the dashboard API server
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "0.0.0.0")]
        host: String,
        /// Port to listen on
        #[arg(short, long, default_value_t = 3002)]
        port: u16,
    },
    /// Print the Buy/Sell/Hold board for one date
    Signals {
        /// Date to evaluate (YYYY-MM-DD). Default: latest available date
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Optional JSON export path
        #[arg(long)]
        export: Option<String>,
    },
    /// Print one stock's chart series (close, moving average, bands, signal)
    Chart {
        /// Stock symbol
        #[arg(long)]
        symbol: String,
        /// Time period: all, 7d, 14d
        #[arg(long, default_value = "all")]
        period: TimePeriod,
    },
}

#[derive(Clone)]
struct AppState {
    config: Arc<AppConfig>,
    cache: Arc<Mutex<SeriesCache>>,
    dashboard: Arc<RwLock<Arc<Dashboard>>>,
}

impl AppState {
    fn new(config: AppConfig, cache: SeriesCache, dashboard: Dashboard) -> Self {
        Self {
            config: Arc::new(config),
            cache: Arc::new(Mutex::new(cache)),
            dashboard: Arc::new(RwLock::new(Arc::new(dashboard))),
        }
    }

    fn dashboard(&self) -> Arc<Dashboard> {
        self.dashboard
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("debug,engine=debug,datastore=debug,signal_board=debug")
    } else {
        EnvFilter::new("info,engine=info,datastore=info,signal_board=info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).compact())
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    dotenvy::dotenv().ok();

    let config = AppConfig::new(cli.data_dir, cli.stocks, cli.window, cli.k)?;

    match cli.command {
        Commands::Serve { host, port } => {
            cmd_serve(&config, &host, port).await?;
        }
        Commands::Signals { date, export } => {
            cmd_signals(&config, date, export)?;
        }
        Commands::Chart { symbol, period } => {
            cmd_chart(&config, &symbol, period)?;
        }
    }

    Ok(())
}

// ============================================================================
// Loading
// ============================================================================

fn build_dashboard(cache: &SeriesCache, params: SignalParams) -> anyhow::Result<Dashboard> {
    let series = cache.series();
    let dashboard = Dashboard::build(
        series.iter().map(|s| s.as_ref()),
        cache.failures(),
        params,
    )?;
    Ok(dashboard)
}

/// Read every configured CSV once and compute all signals
fn load_dashboard(config: &AppConfig) -> anyhow::Result<(SeriesCache, Dashboard)> {
    let sources = config.sources()?;
    info!(
        data_dir = %config.data_dir.display(),
        stocks = sources.len(),
        "Loading price files"
    );

    let cache = SeriesCache::load(sources);
    let dashboard = build_dashboard(&cache, config.params)?;

    if dashboard.is_empty() {
        anyhow::bail!(
            "No data available. Please check the CSV files in {}",
            config.data_dir.display()
        );
    }
    Ok((cache, dashboard))
}

/// Re-list sources, re-read what changed and swap in a rebuilt dashboard.
/// Blocking: reads files under the cache lock.
fn reload_dashboard(state: &AppState) -> anyhow::Result<Vec<String>> {
    let sources = state.config.sources()?;
    let mut cache = state.cache.lock().unwrap_or_else(PoisonError::into_inner);
    let reloaded = cache.sync(sources);
    if reloaded.is_empty() {
        return Ok(reloaded);
    }

    let rebuilt = build_dashboard(&cache, state.config.params)?;
    if rebuilt.is_empty() {
        warn!("Reload left no loadable stocks");
    }
    *state
        .dashboard
        .write()
        .unwrap_or_else(PoisonError::into_inner) = Arc::new(rebuilt);
    info!(symbols = ?reloaded, "Dashboard rebuilt after reload");
    Ok(reloaded)
}

// ============================================================================
// Serve command - Axum web server
// ============================================================================

async fn cmd_serve(config: &AppConfig, host: &str, port: u16) -> anyhow::Result<()> {
    info!("Signal Board v{} starting...", APP_VERSION);

    let (cache, dashboard) = load_dashboard(config)?;
    let state = AppState::new(config.clone(), cache, dashboard);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Determine static files directory
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|d| d.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));
    let dist_dir = exe_dir.join("dist");
    let static_dir = if dist_dir.exists() {
        dist_dir
    } else {
        PathBuf::from("dist")
    };

    let app = Router::new()
        .nest("/api", api_router(state))
        .fallback_service(ServeDir::new(&static_dir))
        .layer(cors);

    let addr: std::net::SocketAddr = format!("{}:{}", host, port).parse()?;
    println!("\n=== Signal Board v{} ===", APP_VERSION);
    println!("Listening on http://{}", addr);
    println!("\nEndpoints:");
    println!("  GET  /api/health                      - Health check");
    println!("  GET  /api/stocks                      - Loaded stocks and load failures");
    println!("  GET  /api/dates                       - Available dates");
    println!("  GET  /api/signals?date=               - Signal board for a date");
    println!("  GET  /api/stocks/:symbol/summary?date= - One stock's signal for a date");
    println!("  GET  /api/stocks/:symbol/chart?period= - Chart series (all, 7d, 14d)");
    println!("  POST /api/reload                      - Reload changed CSV files");
    println!("\n  Data: {}", config.data_dir.display());
    println!("\nPress Ctrl+C to stop\n");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(api_health))
        .route("/stocks", get(api_stocks))
        .route("/dates", get(api_dates))
        .route("/signals", get(api_signals))
        .route("/stocks/:symbol/summary", get(api_stock_summary))
        .route("/stocks/:symbol/chart", get(api_stock_chart))
        .route("/reload", post(api_reload))
        .with_state(state)
}

// ============================================================================
// Signals command - print the board
// ============================================================================

fn cmd_signals(
    config: &AppConfig,
    date: Option<NaiveDate>,
    export: Option<String>,
) -> anyhow::Result<()> {
    println!("\n=== Signal Board v{} ===", APP_VERSION);

    let (_, dashboard) = load_dashboard(config)?;
    print_failures(&dashboard);

    let date = match date.or_else(|| dashboard.latest_date()) {
        Some(d) => d,
        None => anyhow::bail!("No dates available"),
    };
    let board = dashboard.board(date);
    let params = dashboard.params();

    println!(
        "\nTrading Signals for {} ({}-day MA ± {}σ)",
        date, params.window, params.k
    );
    if board.is_empty() {
        println!("\nNo data available for {}", date);
        return Ok(());
    }

    print_group("BUY Signals", &board.buy);
    print_group("SELL Signals", &board.sell);
    print_group("HOLD Signals", &board.hold);
    if !board.unknown.is_empty() {
        print_group("Insufficient history", &board.unknown);
    }
    if !board.missing.is_empty() {
        println!("\nNo row on {}: {}", date, board.missing.join(", "));
    }

    println!(
        "\nSummary: Buy {} | Sell {} | Hold {} | Unknown {}",
        board.counts.buy, board.counts.sell, board.counts.hold, board.counts.unknown
    );

    if let Some(export_path) = export {
        let export_data = build_export_json(&board, params);
        let json = serde_json::to_string_pretty(&export_data)?;
        std::fs::write(&export_path, &json)?;
        println!("\nBoard exported to {}", export_path);
    }

    Ok(())
}

fn print_failures(dashboard: &Dashboard) {
    for failure in dashboard.failures() {
        println!("  ! {} not loaded: {}", failure.symbol, failure.message);
    }
}

fn print_group(title: &str, entries: &[BoardEntry]) {
    println!("\n{}", title);
    if entries.is_empty() {
        println!("  (none)");
        return;
    }
    for e in entries {
        println!(
            "  {:<14} {:>10.2}   MA: {:>10}  | {}",
            e.symbol,
            e.record.close,
            fmt_price(e.record.moving_average),
            fmt_sigma(e.record.deviation),
        );
    }
}

fn fmt_price(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.2}", v))
}

fn fmt_sigma(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:+.2}σ", v))
}

/// Board export with generation time and the parameters that produced it
fn build_export_json(board: &SignalBoard, params: &SignalParams) -> serde_json::Value {
    serde_json::json!({
        "generated_at": Utc::now().to_rfc3339(),
        "params": params,
        "board": board,
    })
}

// ============================================================================
// Chart command - print one stock's series
// ============================================================================

fn cmd_chart(config: &AppConfig, symbol: &str, period: TimePeriod) -> anyhow::Result<()> {
    let (_, dashboard) = load_dashboard(config)?;
    let view = dashboard.stock(symbol)?;
    let records = view.chart_series(period);

    println!("\n{} - {} ({} days)", view.symbol(), period, records.len());
    println!(
        "  {:<10} {:>10} {:>10} {:>10} {:>10} {:>8}  {}",
        "Date", "Close", "MA", "Upper", "Lower", "σ", "Signal"
    );
    println!("  {}", "-".repeat(72));
    for r in records {
        println!(
            "  {:<10} {:>10.2} {:>10} {:>10} {:>10} {:>8}  {}",
            r.date,
            r.close,
            fmt_price(r.moving_average),
            fmt_price(r.upper_band),
            fmt_price(r.lower_band),
            fmt_sigma(r.deviation),
            r.signal,
        );
    }

    Ok(())
}

// ============================================================================
// API errors
// ============================================================================

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn internal(e: impl std::fmt::Display) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: e.to_string(),
        }
    }
}

impl From<EngineError> for ApiError {
    fn from(e: EngineError) -> Self {
        let status = match e {
            EngineError::NotFound { .. } | EngineError::UnknownSymbol(_) => StatusCode::NOT_FOUND,
            EngineError::InvalidParameters(_) | EngineError::InvalidPeriod(_) => {
                StatusCode::BAD_REQUEST
            }
        };
        Self {
            status,
            message: e.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({
            "success": false,
            "error": self.message,
        }));
        (self.status, body).into_response()
    }
}

type ApiResult = Result<Json<serde_json::Value>, ApiError>;

// ============================================================================
// API Handlers
// ============================================================================

#[derive(Deserialize)]
struct DateQuery {
    date: Option<String>,
}

impl DateQuery {
    /// `None` when absent or blank; a malformed date is a JSON 400, not an extractor rejection
    fn date(&self) -> Result<Option<NaiveDate>, ApiError> {
        match self.date.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map(Some)
                .map_err(|_| {
                    ApiError::bad_request(format!("invalid date {:?} (expected YYYY-MM-DD)", raw))
                }),
        }
    }
}

#[derive(Deserialize)]
struct PeriodQuery {
    period: Option<String>,
}

/// GET /api/health
async fn api_health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "signal-board",
        "version": APP_VERSION,
    }))
}

/// GET /api/stocks - loaded symbols, load failures, strategy parameters
async fn api_stocks(State(state): State<AppState>) -> Json<serde_json::Value> {
    let dashboard = state.dashboard();
    Json(serde_json::json!({
        "success": true,
        "symbols": dashboard.symbols(),
        "failures": dashboard.failures(),
        "params": dashboard.params(),
    }))
}

/// GET /api/dates - every traded date and the default selection
async fn api_dates(State(state): State<AppState>) -> Json<serde_json::Value> {
    let dashboard = state.dashboard();
    Json(serde_json::json!({
        "success": true,
        "dates": dashboard.available_dates(),
        "default_date": dashboard.latest_date(),
    }))
}

/// GET /api/signals?date= - Buy/Sell/Hold board for a date (default: latest)
async fn api_signals(State(state): State<AppState>, Query(query): Query<DateQuery>) -> ApiResult {
    let requested = query.date()?;
    let dashboard = state.dashboard();
    let date = requested
        .or_else(|| dashboard.latest_date())
        .ok_or_else(|| ApiError::not_found("No data loaded"))?;

    let board = dashboard.board(date);
    if board.is_empty() {
        return Err(ApiError::not_found(format!("No data available for {}", date)));
    }

    Ok(Json(serde_json::json!({
        "success": true,
        "date": date,
        "board": board,
    })))
}

/// GET /api/stocks/:symbol/summary?date= - one stock's record (default: latest)
async fn api_stock_summary(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(query): Query<DateQuery>,
) -> ApiResult {
    let requested = query.date()?;
    let dashboard = state.dashboard();
    let view = dashboard.stock(&symbol)?;
    let record: &SignalRecord = match requested {
        Some(date) => view.summary(date)?,
        None => view
            .latest()
            .ok_or_else(|| ApiError::not_found(format!("No data for {}", symbol)))?,
    };

    Ok(Json(serde_json::json!({
        "success": true,
        "symbol": view.symbol(),
        "record": record,
    })))
}

/// GET /api/stocks/:symbol/chart?period= - price, MA, bands and signal markers
async fn api_stock_chart(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(query): Query<PeriodQuery>,
) -> ApiResult {
    let period: TimePeriod = query.period.as_deref().unwrap_or("all").parse()?;
    let dashboard = state.dashboard();
    let view = dashboard.stock(&symbol)?;
    let records = view.chart_series(period);

    let markers = |signal: Signal| -> Vec<&SignalRecord> {
        records.iter().filter(|r| r.signal == signal).collect()
    };

    Ok(Json(serde_json::json!({
        "success": true,
        "symbol": view.symbol(),
        "period": period,
        "period_label": period.label(),
        "count": records.len(),
        "records": records,
        "buy_markers": markers(Signal::Buy),
        "sell_markers": markers(Signal::Sell),
    })))
}

/// POST /api/reload - re-read changed CSV files and rebuild the dashboard
async fn api_reload(State(state): State<AppState>) -> ApiResult {
    let reloaded = tokio::task::spawn_blocking(move || reload_dashboard(&state))
        .await
        .map_err(ApiError::internal)?
        .map_err(ApiError::internal)?;

    Ok(Json(serde_json::json!({
        "success": true,
        "reloaded": reloaded,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::time::{Duration, SystemTime};
    use tempfile::{tempdir, TempDir};

    /// One row per calendar day from 2024-01-01
    fn write_closes(dir: &std::path::Path, symbol: &str, closes: &[f64]) {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let mut csv = String::from("Date,Close\n");
        for (i, close) in closes.iter().enumerate() {
            let date = start + chrono::Days::new(i as u64);
            csv.push_str(&format!("{},{}\n", date, close));
        }
        let path = dir.join(format!("{}.csv", symbol));
        fs::write(&path, csv).unwrap();
        let later = SystemTime::now() + Duration::from_secs(120);
        File::options()
            .write(true)
            .open(&path)
            .unwrap()
            .set_modified(later)
            .unwrap();
    }

    fn test_state() -> (TempDir, AppState) {
        let dir = tempdir().unwrap();
        write_closes(dir.path(), "NTPC", &[100.0, 102.0, 101.0, 99.0, 130.0]);
        write_closes(dir.path(), "DLF", &[50.0, 51.0, 52.0]);
        let config = AppConfig::new(Some(dir.path().to_path_buf()), vec![], 3, 1.0).unwrap();
        let (cache, dashboard) = load_dashboard(&config).unwrap();
        (dir, AppState::new(config, cache, dashboard))
    }

    fn date_query(date: &str) -> Query<DateQuery> {
        Query(DateQuery {
            date: Some(date.to_string()),
        })
    }

    async fn error_body(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_signals_board_for_date() {
        let (_dir, state) = test_state();
        let Json(body) = api_signals(State(state), date_query("2024-01-03"))
            .await
            .unwrap();
        assert_eq!(body["date"], "2024-01-03");
        let counts = &body["board"]["counts"];
        let total: u64 = ["buy", "sell", "hold", "unknown"]
            .iter()
            .map(|k| counts[k].as_u64().unwrap())
            .sum();
        assert_eq!(total, 2);
    }

    #[tokio::test]
    async fn test_signals_defaults_to_latest_date() {
        let (_dir, state) = test_state();
        let Json(body) = api_signals(State(state), Query(DateQuery { date: None }))
            .await
            .unwrap();
        assert_eq!(body["date"], "2024-01-05");
        assert_eq!(body["board"]["missing"], serde_json::json!(["DLF"]));
        assert_eq!(body["board"]["counts"]["sell"], 1);
    }

    #[tokio::test]
    async fn test_signals_404_when_no_stock_has_the_date() {
        let (_dir, state) = test_state();
        let err = api_signals(State(state), date_query("2023-06-01"))
            .await
            .unwrap_err();
        let (status, body) = error_body(err).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_malformed_date_is_json_400() {
        let (_dir, state) = test_state();
        let err = api_signals(State(state.clone()), date_query("05/13/2024"))
            .await
            .unwrap_err();
        let (status, body) = error_body(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("05/13/2024"));

        let err = api_stock_summary(
            State(state),
            Path("NTPC".to_string()),
            date_query("yesterday"),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_summary_404_for_absent_date_leaves_other_stocks_usable() {
        let (_dir, state) = test_state();
        let err = api_stock_summary(
            State(state.clone()),
            Path("DLF".to_string()),
            date_query("2024-01-05"),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert!(err.message.contains("DLF"));

        let Json(body) = api_stock_summary(
            State(state),
            Path("NTPC".to_string()),
            date_query("2024-01-05"),
        )
        .await
        .unwrap();
        assert_eq!(body["record"]["signal"], "sell");
    }

    #[tokio::test]
    async fn test_summary_unknown_symbol_is_404() {
        let (_dir, state) = test_state();
        let err = api_stock_summary(
            State(state),
            Path("XYZ".to_string()),
            Query(DateQuery { date: None }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_chart_bad_period_is_json_400() {
        let (_dir, state) = test_state();
        let err = api_stock_chart(
            State(state),
            Path("NTPC".to_string()),
            Query(PeriodQuery {
                period: Some("30d".to_string()),
            }),
        )
        .await
        .unwrap_err();
        let (status, body) = error_body(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("30d"));
    }

    #[tokio::test]
    async fn test_chart_series_and_markers() {
        let (_dir, state) = test_state();
        let Json(body) = api_stock_chart(
            State(state),
            Path("NTPC".to_string()),
            Query(PeriodQuery { period: None }),
        )
        .await
        .unwrap();
        assert_eq!(body["period_label"], "All Data");
        assert_eq!(body["count"], 5);
        assert_eq!(body["sell_markers"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_reload_rebuilds_after_csv_changes() {
        let (dir, state) = test_state();
        let Json(body) = api_reload(State(state.clone())).await.unwrap();
        assert_eq!(body["reloaded"], serde_json::json!([]));

        write_closes(dir.path(), "DLF", &[50.0, 51.0, 52.0, 53.0, 54.0]);
        write_closes(dir.path(), "PAYTM", &[400.0, 410.0, 405.0, 420.0, 415.0]);

        let Json(body) = api_reload(State(state.clone())).await.unwrap();
        assert_eq!(body["reloaded"], serde_json::json!(["DLF", "PAYTM"]));

        let Json(stocks) = api_stocks(State(state.clone())).await;
        assert_eq!(stocks["symbols"], serde_json::json!(["DLF", "NTPC", "PAYTM"]));

        let Json(board) = api_signals(State(state), date_query("2024-01-05"))
            .await
            .unwrap();
        assert_eq!(board["board"]["missing"], serde_json::json!([]));
    }

    #[test]
    fn test_engine_errors_map_to_status() {
        let not_found = ApiError::from(EngineError::NotFound {
            symbol: "DLF".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 6).unwrap(),
        });
        assert_eq!(not_found.status, StatusCode::NOT_FOUND);
        assert!(not_found.message.contains("DLF"));

        let unknown = ApiError::from(EngineError::UnknownSymbol("XYZ".to_string()));
        assert_eq!(unknown.status, StatusCode::NOT_FOUND);

        let bad_period = ApiError::from(EngineError::InvalidPeriod("30d".to_string()));
        assert_eq!(bad_period.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_sigma_and_price_formatting() {
        assert_eq!(fmt_price(Some(123.456)), "123.46");
        assert_eq!(fmt_price(None), "-");
        assert_eq!(fmt_sigma(Some(-1.234)), "-1.23σ");
        assert_eq!(fmt_sigma(Some(0.5)), "+0.50σ");
        assert_eq!(fmt_sigma(None), "-");
    }

    #[test]
    fn test_cli_parses_global_options() {
        let cli = Cli::try_parse_from([
            "signal-board",
            "chart",
            "--symbol",
            "NTPC",
            "--period",
            "14d",
            "--window",
            "20",
            "--stock",
            "NTPC,DLF=dlf.csv",
        ])
        .unwrap();
        assert_eq!(cli.window, 20);
        assert_eq!(cli.stocks, vec!["NTPC".to_string(), "DLF=dlf.csv".to_string()]);
        match cli.command {
            Commands::Chart { symbol, period } => {
                assert_eq!(symbol, "NTPC");
                assert_eq!(period, TimePeriod::Last14Days);
            }
            _ => panic!("expected chart command"),
        }
    }
}
