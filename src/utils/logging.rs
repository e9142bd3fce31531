use tracing::{info, warn, error, debug};

pub fn log_request_received(endpoint: &str, method: &str) {
    info!("Request received: {} {}", method, endpoint);
}

pub fn log_request_processed(endpoint: &str, status: u16, duration_ms: u64) {
    info!("Request processed: {} - Status: {} - Duration: {}ms",
          endpoint, status, duration_ms);
}

pub fn log_sheets_api_error(operation: &str, status: Option<u16>, error: &str) {
    error!("Google Sheets API error: {} - Status: {:?} - Error: {}", operation, status, error);
}

pub fn log_areas_loaded(total: usize, active: usize) {
    info!("Áreas lidas da aba Nomes: {} ativas de {}", active, total);
}

pub fn log_ticket_appended(sheet: &str, row: u32, senha: u32) {
    info!("🎟️ Senha {} gravada na aba '{}' (linha {})", senha, sheet, row);
}

pub fn log_print_forwarded(url: &str, file_name: &str) {
    info!("🖨️ PDF {} enviado para impressão em {}", file_name, url);
}

pub fn log_print_failed(url: &str, error: &str) {
    warn!("⚠️ Falha ao enviar PDF para {}: {} (download oferecido)", url, error);
}

pub fn log_config_loaded(env: &str) {
    info!("Configuration loaded successfully for environment: {}", env);
}

pub fn log_server_startup(address: &str) {
    info!("🚀 Distribuidor de Senhas starting on {}", address);
}

pub fn log_server_ready(address: &str) {
    info!("✅ Server ready and listening on http://{}", address);
}

pub fn log_health_check() {
    debug!("Health check requested");
}

pub fn log_validation_error(field: &str, message: &str) {
    warn!("Validation error: {} - {}", field, message);
}

pub fn log_info(message: &str) {
    info!("{}", message);
}

pub fn log_error(message: &str) {
    error!("{}", message);
}

pub fn log_warning(message: &str) {
    warn!("{}", message);
}
