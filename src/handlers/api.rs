use axum::{extract::State, http::StatusCode, Json};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::time::Instant;

use crate::models::TicketForm;
use crate::utils::logging::*;
use crate::utils::AppResult;
use crate::AppState;

/// GET /api/areas
pub async fn list_areas(State(state): State<Arc<AppState>>) -> AppResult<Json<Value>> {
    log_request_received("/api/areas", "GET");

    let areas = state.tickets.list_active_areas().await?;
    let bairros = state.tickets.list_neighborhoods().await?;

    Ok(Json(json!({
        "areas": areas,
        "bairros": bairros,
    })))
}

/// POST /api/senhas
pub async fn create_ticket(
    State(state): State<Arc<AppState>>,
    Json(form): Json<TicketForm>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let start_time = Instant::now();
    log_request_received("/api/senhas", "POST");

    let ticket = state.tickets.submit(&form).await?;

    log_request_processed("/api/senhas", 201, start_time.elapsed().as_millis() as u64);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "senha": ticket.number,
            "area": ticket.area,
            "aba": ticket.sheet,
            "registro": ticket.registered_at,
            "arquivo": ticket.file_name,
            "impressao": ticket.print,
            "pdf_base64": STANDARD.encode(&ticket.pdf),
        })),
    ))
}
