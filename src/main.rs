/// Distribuidor de Senhas
///
/// Fluxo de uma senha:
/// - Formulário (ou API) recebe área, nome, telefone e bairro
/// - A área é validada contra a aba "Nomes" da planilha
/// - A linha é gravada na aba da área e a senha sai da linha inserida
/// - O PDF do ticket é gerado e enviado ao servidor de impressão (se houver)

use anyhow::Context;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use distribuidor_senhas::auth::{prefetch_token, CredentialSource, TokenManager};
use distribuidor_senhas::config::Settings;
use distribuidor_senhas::handlers::build_router;
use distribuidor_senhas::services::{GoogleSheetsClient, TicketService};
use distribuidor_senhas::utils::logging::*;
use distribuidor_senhas::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 🔧 Carregar variáveis de ambiente do arquivo .env (se existir)
    let dotenv_loaded = dotenvy::dotenv().is_ok();

    // Inicializar tracing (RUST_LOG, padrão "info")
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if dotenv_loaded {
        log_info("✅ Arquivo .env carregado com sucesso");
    } else {
        tracing::debug!("Arquivo .env não encontrado - usando variáveis de ambiente do sistema");
    }

    // Carregar configurações
    let settings = Settings::new().context("Falha ao carregar configurações")?;
    log_config_loaded(&std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string()));

    // Credenciais Google: service account tem prioridade sobre OAuth de usuário
    let credentials = CredentialSource::from_settings(&settings.google)?;
    let token_manager = TokenManager::new(credentials)
        .await
        .context("Falha ao inicializar autenticação Google")?;

    // Primeiro token antes de abrir a porta: o fluxo interativo pede autorização
    // no console aqui, e não dentro de uma requisição
    prefetch_token(&token_manager)
        .await
        .context("Falha ao obter o primeiro token Google")?;

    let sheets = GoogleSheetsClient::new(&settings.sheets, Arc::new(token_manager));
    log_info(&format!("📊 Planilha conectada: {}", sheets.spreadsheet_id()));

    let tickets = TicketService::new(Arc::new(sheets), &settings);
    if !tickets.print_enabled() {
        log_info("ℹ️ PRINT_SERVER_URL não definido: PDFs serão oferecidos para download");
    }

    let address = format!("{}:{}", settings.server.host, settings.server.port);

    let app_state = Arc::new(AppState { settings, tickets });
    let app = build_router(app_state);

    log_server_startup(&address);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Falha ao abrir {}", address))?;
    let bound = listener.local_addr().context("Endereço local indisponível")?;
    log_server_ready(&bound.to_string());

    // Graceful shutdown com signal handling
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log_info("🛑 Server shut down gracefully");
    Ok(())
}

/// Signal handler para graceful shutdown
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log_error(&format!("Falha ao instalar handler de Ctrl+C: {}", e));
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                log_error(&format!("Falha ao instalar handler de SIGTERM: {}", e));
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            log_info("🛑 Received Ctrl+C, shutting down gracefully...");
        },
        _ = terminate => {
            log_info("🛑 Received SIGTERM, shutting down gracefully...");
        }
    }
}
