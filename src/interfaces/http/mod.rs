use crate::domain::dashboard::DashboardSummary;
use crate::domain::error::AppError;
use crate::domain::generation::{Difficulty, GenerationOutcome};
use crate::domain::platform_session::PlatformType;
use crate::domain::test_case::{CasePayload, TestStatus};
use crate::infrastructure::config::HttpConfig;
use crate::interfaces::AppState;
use actix_cors::Cors;
use actix_web::{dev::Server, get, post, web, App, HttpResponse, HttpServer, Responder, Scope};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, PoisonError};

const MAX_LOG_ENTRIES: usize = 100;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LogEntry {
    pub time: String,
    pub level: String,
    pub source: String,
    pub message: String,
}

pub struct HttpState {
    pub app_state: Arc<AppState>,
}

#[derive(Deserialize)]
pub struct SelectPlatformRequest {
    #[serde(default)]
    pub platform: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: TestStatus,
}

#[derive(Deserialize)]
pub struct AddCaseRequest {
    pub text: String,
    #[serde(default)]
    pub generated: bool,
}

#[derive(Deserialize, Default)]
pub struct GenerateRequest {
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
}

fn error_response(err: &AppError) -> HttpResponse {
    match err {
        AppError::ValidationError(_) => HttpResponse::BadRequest().body(err.to_string()),
        AppError::NotFound(_) => HttpResponse::NotFound().body(err.to_string()),
        _ => HttpResponse::InternalServerError().body(err.to_string()),
    }
}

#[get("/sessions")]
async fn list_sessions(data: web::Data<HttpState>) -> impl Responder {
    HttpResponse::Ok().json(data.app_state.store.snapshot())
}

#[get("/sessions/{platform}")]
async fn get_session(data: web::Data<HttpState>, path: web::Path<String>) -> impl Responder {
    let platform = match path.parse::<PlatformType>() {
        Ok(platform) => platform,
        Err(e) => return error_response(&e),
    };

    match data.app_state.store.select_session(platform) {
        Some(session) => HttpResponse::Ok().json(session),
        None => error_response(&AppError::NotFound(format!(
            "No session for platform {}",
            platform
        ))),
    }
}

#[get("/dashboard")]
async fn dashboard(data: web::Data<HttpState>) -> impl Responder {
    let snapshot = data.app_state.store.snapshot();
    HttpResponse::Ok().json(DashboardSummary::from_sessions(&snapshot.sessions))
}

#[post("/active")]
async fn select_platform(
    data: web::Data<HttpState>,
    req: web::Json<SelectPlatformRequest>,
) -> impl Responder {
    let platform = match req.platform.as_deref().map(str::parse::<PlatformType>).transpose() {
        Ok(platform) => platform,
        Err(e) => return error_response(&e),
    };

    match data.app_state.store.select_platform(platform) {
        Ok(snapshot) => {
            add_log(
                &data.app_state.logs,
                "INFO",
                "HttpApi",
                &format!(
                    "Active platform: {}",
                    platform.map(|p| p.label()).unwrap_or("none")
                ),
            );
            HttpResponse::Ok().json(snapshot)
        }
        Err(e) => {
            add_log(
                &data.app_state.logs,
                "ERROR",
                "HttpApi",
                &format!("Failed to select platform: {}", e),
            );
            error_response(&e)
        }
    }
}

#[post("/active/cases/{test_id}/status")]
async fn update_status(
    data: web::Data<HttpState>,
    path: web::Path<String>,
    req: web::Json<UpdateStatusRequest>,
) -> impl Responder {
    let test_id = path.into_inner();
    let snapshot = data
        .app_state
        .store
        .update_active_status(&test_id, req.status);

    add_log(
        &data.app_state.logs,
        "INFO",
        "HttpApi",
        &format!("Status update: {} -> {:?}", test_id, req.status),
    );
    HttpResponse::Ok().json(snapshot)
}

#[post("/active/cases")]
async fn add_case(data: web::Data<HttpState>, req: web::Json<AddCaseRequest>) -> impl Responder {
    let AddCaseRequest { text, generated } = req.into_inner();
    if text.trim().is_empty() {
        return error_response(&AppError::ValidationError(
            "Test case text is required.".to_string(),
        ));
    }

    let payload = if generated {
        CasePayload::Generated(text)
    } else {
        CasePayload::Manual(text)
    };
    let snapshot = data.app_state.store.add_active_test_case(payload);

    add_log(
        &data.app_state.logs,
        "INFO",
        "HttpApi",
        &format!("Test case added (generated={})", generated),
    );
    HttpResponse::Ok().json(snapshot)
}

#[post("/active/generate")]
async fn generate_cases(
    data: web::Data<HttpState>,
    req: Option<web::Json<GenerateRequest>>,
) -> impl Responder {
    let difficulty = req
        .and_then(|req| req.into_inner().difficulty)
        .unwrap_or(data.app_state.default_difficulty);

    let outcome = data.app_state.case_generation.generate(difficulty).await;
    match &outcome {
        GenerationOutcome::Added { platform, added } => add_log(
            &data.app_state.logs,
            "INFO",
            "CaseSource",
            &format!("Generated {} test cases for {} ({})", added, platform, difficulty),
        ),
        GenerationOutcome::Busy => {
            add_log(&data.app_state.logs, "WARN", "CaseSource", "Generation already running");
            return HttpResponse::Conflict().json(&outcome);
        }
        GenerationOutcome::NoActiveSession => add_log(
            &data.app_state.logs,
            "WARN",
            "CaseSource",
            "Generation requested without an active platform",
        ),
    }
    HttpResponse::Ok().json(&outcome)
}

#[get("/logs")]
async fn get_logs(data: web::Data<HttpState>) -> impl Responder {
    let logs = data
        .app_state
        .logs
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clone();
    HttpResponse::Ok().json(logs)
}

pub fn add_log(logs: &Mutex<Vec<LogEntry>>, level: &str, source: &str, message: &str) {
    match level {
        "ERROR" => tracing::error!(source, "{}", message),
        "WARN" => tracing::warn!(source, "{}", message),
        _ => tracing::info!(source, "{}", message),
    }

    let entry = LogEntry {
        time: Local::now().format("%H:%M:%S").to_string(),
        level: level.to_string(),
        source: source.to_string(),
        message: message.to_string(),
    };
    let mut logs = logs.lock().unwrap_or_else(PoisonError::into_inner);
    logs.push(entry);
    if logs.len() > MAX_LOG_ENTRIES {
        logs.remove(0);
    }
}

pub fn api_scope() -> Scope {
    web::scope("/api")
        .service(list_sessions)
        .service(get_session)
        .service(dashboard)
        .service(select_platform)
        .service(update_status)
        .service(add_case)
        .service(generate_cases)
        .service(get_logs)
}

pub fn start_server(app_state: Arc<AppState>, config: &HttpConfig) -> std::io::Result<Server> {
    let state = web::Data::new(HttpState { app_state });

    let server = HttpServer::new(move || {
        let cors = Cors::permissive(); // Allow all origins for the local dashboard

        App::new()
            .wrap(cors)
            .app_data(state.clone())
            .service(api_scope())
    })
    .bind((config.host.as_str(), config.port))?
    .run();

    Ok(server)
}
