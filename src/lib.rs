pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;

pub use application::{CaseGenerationUseCase, SessionSnapshot, SessionStore};
pub use domain::dashboard::{DashboardSummary, PlatformSummary};
pub use domain::error::{AppError, Result};
pub use domain::generation::{Difficulty, GenerationOutcome};
pub use domain::platform_session::{compute_progress, PlatformSession, PlatformType, SessionSeed};
pub use domain::test_case::{CasePayload, TestCase, TestCategory, TestStatus};
pub use infrastructure::case_sources::{
    CaseSource, GenerativeCaseSource, SampleCaseSource, FALLBACK_CASES,
};
pub use infrastructure::config::{AppConfig, ConfigService};

use crate::infrastructure::bootstrap::build_state;
use crate::interfaces::http::start_server;
use tracing::{error, info};

/// Loads configuration, seeds the store and serves the dashboard API until
/// the server stops.
pub fn run() -> Result<()> {
    let config = ConfigService::load()?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(config.logging.filter.as_str())
        .try_init();

    let state = build_state(&config)?;
    info!(
        host = %config.http.host,
        port = config.http.port,
        case_source = ?config.case_source.kind,
        "Starting QA tracker API"
    );

    actix_web::rt::System::new().block_on(async move {
        let server = start_server(state, &config.http).map_err(|err| {
            error!(error = %err, "Failed to bind HTTP server");
            err
        })?;
        server.await
    })?;

    Ok(())
}
