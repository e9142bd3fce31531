use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Form,
};
use std::sync::Arc;
use tokio::time::Instant;

use crate::models::{Area, TicketForm};
use crate::utils::logging::*;
use crate::utils::AppError;
use crate::AppState;

use super::pages::{render_error_page, render_form_page, render_result_page, FormPage};

struct FormData {
    areas: Vec<Area>,
    neighborhoods: Vec<String>,
    sheet_error: Option<String>,
    neighborhoods_error: Option<String>,
}

async fn load_form_data(state: &AppState) -> FormData {
    let (areas, sheet_error) = match state.tickets.list_active_areas().await {
        Ok(areas) => (areas, None),
        Err(e) => {
            log_error(&format!("❌ Falha ao ler áreas: {}", e));
            (Vec::new(), Some(e.to_string()))
        }
    };

    let (neighborhoods, neighborhoods_error) = match state.tickets.list_neighborhoods().await {
        Ok(list) => (list, None),
        Err(e) => {
            log_warning(&format!("⚠️ Falha ao ler bairros: {}", e));
            (Vec::new(), Some(e.to_string()))
        }
    };

    FormData { areas, neighborhoods, sheet_error, neighborhoods_error }
}

fn form_page(
    state: &AppState,
    data: &FormData,
    form_error: Option<String>,
    previous: Option<&TicketForm>,
) -> Html<String> {
    render_form_page(&FormPage {
        spreadsheet_id: &state.settings.sheets.spreadsheet_id,
        areas: &data.areas,
        neighborhoods: &data.neighborhoods,
        sheet_error: data.sheet_error.clone(),
        neighborhoods_error: data.neighborhoods_error.clone(),
        form_error,
        previous,
    })
}

/// GET /
pub async fn show_form(State(state): State<Arc<AppState>>) -> Html<String> {
    log_request_received("/", "GET");
    let data = load_form_data(&state).await;
    form_page(&state, &data, None, None)
}

/// POST /senhas
pub async fn submit_form(
    State(state): State<Arc<AppState>>,
    Form(form): Form<TicketForm>,
) -> Response {
    let start_time = Instant::now();
    log_request_received("/senhas", "POST");

    let response = match state.tickets.submit(&form).await {
        Ok(ticket) => render_result_page(&ticket).into_response(),
        Err(AppError::ValidationError(message)) => {
            let data = load_form_data(&state).await;
            (
                StatusCode::BAD_REQUEST,
                form_page(&state, &data, Some(message), Some(&form)),
            )
                .into_response()
        }
        Err(e) => {
            log_error(&format!("❌ Falha ao gerar senha: {}", e));
            (e.status_code(), render_error_page(&e.to_string())).into_response()
        }
    };

    log_request_processed(
        "/senhas",
        response.status().as_u16(),
        start_time.elapsed().as_millis() as u64,
    );
    response
}
