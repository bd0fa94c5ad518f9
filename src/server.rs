use axum::extract::State;
use axum::http::StatusCode;
use axum::{Json, Router, routing::post};
use log::{error, info, warn};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use crate::config::AppConfig;
use crate::data::TimetableInput;
use crate::error::ScheduleError;
use crate::pipeline::{TimetableOutcome, schedule};
use crate::solver::HighsSolver;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolveRequest {
    #[serde(flatten)]
    pub input: TimetableInput,
    /// Overrides the configured time limit for this request.
    pub time_limit_secs: Option<f64>,
}

async fn solve_handler(
    State(solver): State<Arc<HighsSolver>>,
    Json(request): Json<SolveRequest>,
) -> Result<Json<TimetableOutcome>, (StatusCode, String)> {
    let time_limit = request
        .time_limit_secs
        .map(|secs| {
            Duration::try_from_secs_f64(secs).map_err(|_| {
                warn!("Rejecting request with timeLimitSecs={secs}");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    format!("timeLimitSecs must be a non-negative number of seconds, got {secs}"),
                )
            })
        })
        .transpose()?;

    let outcome = tokio::task::spawn_blocking(move || {
        schedule(&request.input, solver.as_ref(), time_limit)
    })
    .await
    .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    match outcome {
        Ok(outcome) => {
            info!("\n{}", outcome);
            Ok(Json(outcome))
        }
        Err(e @ ScheduleError::Validation(_)) => Err((StatusCode::UNPROCESSABLE_ENTITY, e.to_string())),
        Err(e) => {
            error!("Scheduling failed: {}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

pub fn router(config: &AppConfig) -> Router {
    Router::new()
        .route("/v1/timetable/solve", post(solve_handler))
        .with_state(Arc::new(HighsSolver::new(config.solver.clone())))
}

pub async fn run_server(config: AppConfig) -> std::io::Result<()> {
    let app = router(&config);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

    info!("Server running at http://{}", listener.local_addr()?);

    axum::serve(listener, app).await
}
