//! Seleção da fonte de credenciais Google
//!
//! Ordem de preferência:
//! 1. Service account (JSON inline, depois arquivo) - indicado para nuvem
//! 2. OAuth de usuário (client secret inline, depois arquivo), com token em disco

use crate::config::GoogleSettings;
use super::AuthError;

/// Origem do client secret do fluxo OAuth de usuário
#[derive(Debug, Clone, PartialEq)]
pub enum ClientSecretSource {
    Json(String),
    File(String),
}

/// Credenciais escolhidas a partir das configurações
#[derive(Debug, Clone, PartialEq)]
pub enum CredentialSource {
    ServiceAccountJson(String),
    ServiceAccountFile(String),
    InstalledApp {
        secret: ClientSecretSource,
        token_path: String,
    },
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl CredentialSource {
    pub fn from_settings(google: &GoogleSettings) -> Result<Self, AuthError> {
        if let Some(json) = non_blank(&google.service_account_json) {
            return Ok(Self::ServiceAccountJson(json));
        }
        if let Some(path) = non_blank(&google.service_account_file) {
            return Ok(Self::ServiceAccountFile(path));
        }

        let secret = non_blank(&google.client_secret_json)
            .map(ClientSecretSource::Json)
            .or_else(|| non_blank(&google.client_secret_file).map(ClientSecretSource::File))
            .ok_or(AuthError::MissingCredentials)?;

        Ok(Self::InstalledApp {
            secret,
            token_path: google.token_path.clone(),
        })
    }

    /// Nome curto do fluxo, para logs
    pub fn flow_name(&self) -> &'static str {
        match self {
            Self::ServiceAccountJson(_) | Self::ServiceAccountFile(_) => "service-account",
            Self::InstalledApp { .. } => "oauth-usuario",
        }
    }
}
