use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;

use crate::config::PrinterSettings;
use crate::models::PrintOutcome;
use crate::utils::logging::*;
use crate::utils::truncate_safe;

pub const FILENAME_HEADER: &str = "X-Ticket-Filename";

/// Encaminha o PDF da senha para o servidor de impressão
#[derive(Clone)]
pub struct PrintForwarder {
    client: Client,
    url: String,
    token: Option<String>,
}

impl PrintForwarder {
    /// `None` quando PRINT_SERVER_URL não foi configurada
    pub fn new(settings: &PrinterSettings) -> Option<Self> {
        let url = settings.url.as_deref().map(str::trim).filter(|u| !u.is_empty())?;

        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .connect_timeout(Duration::from_secs(3))
            .build()
            .unwrap_or_else(|_| Client::new());

        log_info(&format!(
            "🖨️ Servidor de impressão configurado: {} (timeout {}s)",
            url, settings.timeout_seconds
        ));

        Some(Self {
            client,
            url: url.to_string(),
            token: settings
                .token
                .clone()
                .filter(|t| !t.trim().is_empty()),
        })
    }

    /// Envia o PDF. Qualquer erro vira `PrintOutcome::Failed`
    pub async fn forward(&self, pdf: &[u8], file_name: &str) -> PrintOutcome {
        let mut request = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "application/pdf")
            .header(FILENAME_HEADER, file_name)
            .body(pdf.to_vec());

        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        match request.send().await {
            Ok(response) if response.status().is_success() => {
                log_print_forwarded(&self.url, file_name);
                PrintOutcome::Printed
            }
            Ok(response) => {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                let reason = format!("HTTP {}: {}", status.as_u16(), truncate_safe(body.trim(), 200));
                log_print_failed(&self.url, &reason);
                PrintOutcome::Failed(reason)
            }
            Err(e) => {
                let reason = e.to_string();
                log_print_failed(&self.url, &reason);
                PrintOutcome::Failed(reason)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn settings(url: Option<String>, token: Option<&str>) -> PrinterSettings {
        PrinterSettings {
            url,
            token: token.map(str::to_string),
            timeout_seconds: 2,
        }
    }

    #[test]
    fn test_not_configured() {
        assert!(PrintForwarder::new(&settings(None, None)).is_none());
        assert!(PrintForwarder::new(&settings(Some("  ".into()), None)).is_none());
    }

    #[tokio::test]
    async fn test_forward_sends_pdf_with_token() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/print")
                    .header("content-type", "application/pdf")
                    .header("authorization", "Bearer segredo")
                    .header("x-ticket-filename", "senha_Odonto_3.pdf")
                    .body("%PDF-1.3 teste");
                then.status(200).body("ok");
            })
            .await;

        let forwarder =
            PrintForwarder::new(&settings(Some(server.url("/print")), Some("segredo"))).unwrap();
        let outcome = forwarder.forward(b"%PDF-1.3 teste", "senha_Odonto_3.pdf").await;

        mock.assert_async().await;
        assert_eq!(outcome, PrintOutcome::Printed);
    }

    #[tokio::test]
    async fn test_forward_without_token_omits_authorization() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/print").header_missing("authorization");
                then.status(202);
            })
            .await;

        let forwarder = PrintForwarder::new(&settings(Some(server.url("/print")), None)).unwrap();
        assert_eq!(forwarder.forward(b"%PDF", "a.pdf").await, PrintOutcome::Printed);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_forward_non_2xx_is_failure() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/print");
                then.status(503).body("impressora offline");
            })
            .await;

        let forwarder = PrintForwarder::new(&settings(Some(server.url("/print")), None)).unwrap();
        match forwarder.forward(b"%PDF", "a.pdf").await {
            PrintOutcome::Failed(reason) => {
                assert!(reason.contains("503"));
                assert!(reason.contains("impressora offline"));
            }
            other => panic!("esperava falha, veio {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_forward_unreachable_is_failure() {
        // Porta 9 (discard) sem listener local
        let forwarder =
            PrintForwarder::new(&settings(Some("http://127.0.0.1:9/print".into()), None)).unwrap();
        assert!(matches!(
            forwarder.forward(b"%PDF", "a.pdf").await,
            PrintOutcome::Failed(_)
        ));
    }
}
