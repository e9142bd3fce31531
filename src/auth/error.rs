use thiserror::Error;

/// Tipos de erro específicos da autenticação com o Google
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Credenciais Google ausentes. Defina GOOGLE_SERVICE_ACCOUNT_JSON (preferível) ou GOOGLE_CLIENT_SECRET.")]
    MissingCredentials,

    #[error("GOOGLE_SERVICE_ACCOUNT_JSON inválido: {0}")]
    InvalidServiceAccount(String),

    #[error("GOOGLE_CLIENT_SECRET inválido: {0}")]
    InvalidClientSecret(String),

    #[error("Falha ao criar autenticador: {0}")]
    Authenticator(String),

    #[error("Falha ao obter token de acesso: {0}")]
    Token(String),
}
