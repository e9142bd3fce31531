//! # Google Authentication Module
//!
//! Autenticação com a API do Google Sheets.
//!
//! ## Estrutura:
//! - `config.rs`: escolha da fonte de credenciais (service account ou OAuth de usuário)
//! - `token_manager.rs`: autenticador yup-oauth2 e o trait `TokenProvider`
//! - `error.rs`: erros de autenticação

pub mod config;
pub mod error;
pub mod token_manager;

pub use config::{ClientSecretSource, CredentialSource};
pub use error::AuthError;
pub use token_manager::{prefetch_token, StaticToken, TokenManager, TokenProvider, SHEETS_SCOPE};
