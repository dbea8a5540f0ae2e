use actix_web::{middleware, web, App, HttpResponse, HttpServer, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use tracing::{error, info};

use crate::config::ScoringWeights;
use crate::history::{write_records, DayRecord, HistoryStore};
use crate::roster::{build_people, RosterEntry, StaffProfile};
use crate::schedule::{generate_day, DayOptions, DaySchedule, Position};

/// Shared server state. History is only read through a cloned snapshot per request.
pub struct AppState {
    pub history: Mutex<HistoryStore>,
    pub staff: Mutex<Vec<StaffProfile>>,
    pub weights: ScoringWeights,
    /// Held across merge and write so files land in merge order
    save_lock: tokio::sync::Mutex<()>,
}

impl AppState {
    pub fn new(history: HistoryStore, staff: Vec<StaffProfile>, weights: ScoringWeights) -> Self {
        Self {
            history: Mutex::new(history),
            staff: Mutex::new(staff),
            weights,
            save_lock: tokio::sync::Mutex::new(()),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub date: NaiveDate,
    pub roster: Vec<RosterEntry>,
    /// Replaces the loaded staff profiles when present
    #[serde(default)]
    pub staff: Option<Vec<StaffProfile>>,
    #[serde(default)]
    pub grill_opener: Option<String>,
    #[serde(default)]
    pub one_griller_only: bool,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResponse {
    pub date: NaiveDate,
    pub active_positions: Vec<Position>,
    pub schedule: DaySchedule,
}

fn error_body(message: impl std::fmt::Display) -> serde_json::Value {
    serde_json::json!({"success": false, "error": message.to_string()})
}

fn poisoned() -> actix_web::Error {
    actix_web::error::ErrorInternalServerError("state lock poisoned")
}

// Generate and store a day's schedule
async fn generate_schedule(
    req: web::Json<GenerateRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let req = req.into_inner();

    if let Some(staff) = req.staff.clone() {
        *state.staff.lock().map_err(|_| poisoned())? = staff;
    }
    let profiles = state.staff.lock().map_err(|_| poisoned())?.clone();
    let view = state.history.lock().map_err(|_| poisoned())?.view_for(req.date);

    let people = build_people(&req.roster, &profiles);
    let options = DayOptions {
        hazard_exempt: req.grill_opener.clone().filter(|id| !id.is_empty()),
        reduced_risk: req.one_griller_only,
    };

    let schedule = match generate_day(&people, &options, &view, &state.weights) {
        Ok(schedule) => schedule,
        Err(e) => return Ok(HttpResponse::BadRequest().json(error_body(e))),
    };

    let _saving = state.save_lock.lock().await;
    let (path, records) = {
        let mut history = state.history.lock().map_err(|_| poisoned())?;
        let kept = history.merge(DayRecord {
            date: req.date,
            staff: req.roster,
            grill_opener: options.hazard_exempt,
            one_griller_only: req.one_griller_only,
            schedule: Some(schedule.clone()),
        });
        if !kept {
            return Ok(HttpResponse::UnprocessableEntity().json(error_body(format!(
                "{} is older than the stored history window",
                req.date
            ))));
        }
        (history.path().to_path_buf(), history.records().to_vec())
    };

    // file I/O runs off the async workers, outside the state lock
    let saved = web::block(move || write_records(&path, &records)).await;
    match saved {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            error!(error = %e, "failed to save history");
            return Ok(HttpResponse::InternalServerError().json(error_body(e)));
        }
        Err(e) => {
            error!(error = %e, "history writer did not finish");
            return Ok(HttpResponse::InternalServerError().json(error_body(e)));
        }
    }

    Ok(HttpResponse::Ok().json(ScheduleResponse {
        date: req.date,
        active_positions: schedule.active_positions(),
        schedule,
    }))
}

// History endpoint
async fn get_history(state: web::Data<AppState>) -> Result<HttpResponse> {
    let history = state.history.lock().map_err(|_| poisoned())?;
    Ok(HttpResponse::Ok().json(history.records()))
}

// Stored schedule for one date
async fn get_schedule(
    date: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let Ok(date) = NaiveDate::parse_from_str(date.as_str(), "%Y-%m-%d") else {
        return Ok(HttpResponse::BadRequest().json(error_body(format!("Invalid date: {}", date.as_str()))));
    };

    let history = state.history.lock().map_err(|_| poisoned())?;
    match history.get(date).and_then(|r| r.schedule.clone()) {
        Some(schedule) => Ok(HttpResponse::Ok().json(ScheduleResponse {
            date,
            active_positions: schedule.active_positions(),
            schedule,
        })),
        None => Ok(HttpResponse::NotFound().json(error_body("Schedule not available"))),
    }
}

/// Registers the API routes; shared by the server and the tests
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/schedule", web::post().to(generate_schedule))
        .route("/api/history", web::get().to(get_history))
        .service(web::resource("/api/schedule/{date}").route(web::get().to(get_schedule)));
}

pub async fn start_server(port: u16, state: AppState) -> std::io::Result<()> {
    let app_state = web::Data::new(state);
    info!(port, "starting web server");

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(middleware::Logger::default())
            .configure(configure)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
