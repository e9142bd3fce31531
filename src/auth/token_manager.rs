//! Token Manager
//!
//! Fornece access tokens com escopo de planilhas para o cliente do Sheets.
//! O cache fica a cargo do yup-oauth2: em memória para a service account e
//! também em disco (`token.json`) para o fluxo OAuth de usuário.

use async_trait::async_trait;
use yup_oauth2::authenticator::DefaultAuthenticator;
use yup_oauth2::{InstalledFlowAuthenticator, InstalledFlowReturnMethod, ServiceAccountAuthenticator};

use crate::utils::logging::*;
use super::{AuthError, ClientSecretSource, CredentialSource};

pub const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

/// Qualquer fonte de bearer tokens para a API do Google
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn access_token(&self) -> Result<String, AuthError>;
}

/// Gerenciador de tokens baseado no yup-oauth2
pub struct TokenManager {
    authenticator: DefaultAuthenticator,
}

impl TokenManager {
    /// Criar o autenticador adequado à fonte de credenciais
    pub async fn new(source: CredentialSource) -> Result<Self, AuthError> {
        let flow = source.flow_name();

        let authenticator = match source {
            CredentialSource::ServiceAccountJson(json) => {
                let key = yup_oauth2::parse_service_account_key(json.as_bytes())
                    .map_err(|e| AuthError::InvalidServiceAccount(e.to_string()))?;
                ServiceAccountAuthenticator::builder(key)
                    .build()
                    .await
                    .map_err(|e| AuthError::Authenticator(e.to_string()))?
            }
            CredentialSource::ServiceAccountFile(path) => {
                let key = yup_oauth2::read_service_account_key(&path)
                    .await
                    .map_err(|e| AuthError::InvalidServiceAccount(format!("{}: {}", path, e)))?;
                ServiceAccountAuthenticator::builder(key)
                    .build()
                    .await
                    .map_err(|e| AuthError::Authenticator(e.to_string()))?
            }
            CredentialSource::InstalledApp { secret, token_path } => {
                let app_secret = match secret {
                    ClientSecretSource::Json(json) => yup_oauth2::parse_application_secret(json.as_bytes())
                        .map_err(|e| AuthError::InvalidClientSecret(e.to_string()))?,
                    ClientSecretSource::File(path) => yup_oauth2::read_application_secret(&path)
                        .await
                        .map_err(|e| AuthError::InvalidClientSecret(format!("{}: {}", path, e)))?,
                };

                log_info(&format!("🔐 [TokenManager] OAuth de usuário com cache em '{}'", token_path));

                // Sem navegador no servidor: o link de autorização é impresso no console
                InstalledFlowAuthenticator::builder(app_secret, InstalledFlowReturnMethod::Interactive)
                    .persist_tokens_to_disk(token_path)
                    .build()
                    .await
                    .map_err(|e| AuthError::Authenticator(e.to_string()))?
            }
        };

        log_info(&format!("✅ [TokenManager] Autenticador Google pronto ({})", flow));

        Ok(Self { authenticator })
    }
}

#[async_trait]
impl TokenProvider for TokenManager {
    async fn access_token(&self) -> Result<String, AuthError> {
        let token = self
            .authenticator
            .token(&[SHEETS_SCOPE])
            .await
            .map_err(|e| AuthError::Token(e.to_string()))?;

        token
            .token()
            .map(str::to_string)
            .ok_or_else(|| AuthError::Token("resposta sem access_token".to_string()))
    }
}

/// Token fixo, útil para apontar o cliente para um emulador ou mock
pub struct StaticToken(pub String);

#[async_trait]
impl TokenProvider for StaticToken {
    async fn access_token(&self) -> Result<String, AuthError> {
        Ok(self.0.clone())
    }
}

/// Obtém um token logo na inicialização. Com o fluxo interativo o pedido de
/// autorização aparece no console antes de o servidor aceitar requisições.
pub async fn prefetch_token(provider: &dyn TokenProvider) -> Result<(), AuthError> {
    provider.access_token().await?;
    log_info("🔑 [TokenManager] Token Google obtido");
    Ok(())
}
