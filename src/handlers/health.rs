use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::utils::logging::*;
use crate::AppState;

pub async fn health_check() -> Json<Value> {
    log_health_check();

    Json(json!({
        "status": "healthy",
        "service": "distribuidor-senhas",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Pronto quando a aba de áreas pode ser lida
pub async fn ready_check(State(state): State<Arc<AppState>>) -> Result<Json<Value>, StatusCode> {
    log_health_check();

    let (sheets_status, active_areas) = match state.tickets.list_active_areas().await {
        Ok(areas) => ("connected", areas.len()),
        Err(e) => {
            log_warning(&format!("⚠️ Planilha indisponível no ready check: {}", e));
            ("disconnected", 0)
        }
    };

    if sheets_status != "connected" {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }

    Ok(Json(json!({
        "ready": true,
        "service": "distribuidor-senhas",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "dependencies": {
            "sheets": {
                "status": sheets_status,
                "spreadsheet_id": state.settings.sheets.spreadsheet_id,
                "active_areas": active_areas
            },
            "printer": {
                "status": if state.tickets.print_enabled() { "configured" } else { "not_configured" }
            }
        }
    })))
}
