use serde::{Deserialize, Serialize};

use crate::utils::formatting::{format_name_upper, format_phone_number};
use crate::utils::logging::log_validation_error;
use crate::utils::{limit_chars, AppError, AppResult};

/// Cabeçalho fixo de cada aba de área
pub const TICKET_HEADERS: [&str; 6] = [
    "Senha",
    "Nome",
    "Telefone",
    "Bairro",
    "Data e Hora de Registro",
    "Data e Hora de Atendimento",
];

pub const MAX_NAME_CHARS: usize = 80;
pub const MAX_PHONE_CHARS: usize = 30;
pub const MAX_NEIGHBORHOOD_CHARS: usize = 80;

/// Uma linha da aba "Nomes"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Area {
    /// Nome exibido no formulário
    pub area: String,
    /// Aba de destino na planilha
    pub sheet: String,
    pub active: bool,
}

/// Campos do formulário, como chegam do navegador ou da API
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TicketForm {
    #[serde(default)]
    pub area: String,
    #[serde(default)]
    pub nome: String,
    #[serde(default)]
    pub telefone: String,
    #[serde(default)]
    pub bairro: String,
}

/// Cadastro já validado e normalizado
#[derive(Debug, Clone, PartialEq)]
pub struct TicketRequest {
    pub area: String,
    pub name: String,
    pub phone: String,
    pub neighborhood: String,
}

impl TicketForm {
    pub fn validate(&self) -> AppResult<TicketRequest> {
        let area = self.area.trim();
        if area.is_empty() {
            log_validation_error("area", "vazia");
            return Err(AppError::ValidationError("Selecione a área.".to_string()));
        }

        let name = self.nome.trim();
        if name.is_empty() {
            log_validation_error("nome", "vazio");
            return Err(AppError::ValidationError("Informe o nome.".to_string()));
        }

        Ok(TicketRequest {
            area: area.to_string(),
            name: format_name_upper(&limit_chars(name, MAX_NAME_CHARS)),
            phone: format_phone_number(&limit_chars(&self.telefone, MAX_PHONE_CHARS)),
            neighborhood: limit_chars(self.bairro.trim(), MAX_NEIGHBORHOOD_CHARS),
        })
    }
}

/// Linha gravada na aba da área (Senha e Atendimento ficam vazios)
#[derive(Debug, Clone, PartialEq)]
pub struct TicketRow {
    pub name: String,
    pub phone: String,
    pub neighborhood: String,
    pub registered_at: String,
}

impl TicketRow {
    pub fn to_values(&self) -> Vec<String> {
        vec![
            String::new(),
            self.name.clone(),
            self.phone.clone(),
            self.neighborhood.clone(),
            self.registered_at.clone(),
            String::new(),
        ]
    }
}

/// Resultado do envio ao servidor de impressão
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "detalhe", rename_all = "snake_case")]
pub enum PrintOutcome {
    Printed,
    NotConfigured,
    Failed(String),
}

impl PrintOutcome {
    /// Quando não houve impressão o usuário precisa do link de download
    pub fn needs_download(&self) -> bool {
        !matches!(self, PrintOutcome::Printed)
    }
}

/// Senha emitida, com o PDF pronto
#[derive(Debug, Clone)]
pub struct IssuedTicket {
    pub number: u32,
    pub area: String,
    pub sheet: String,
    pub name: String,
    pub phone: String,
    pub neighborhood: String,
    pub registered_at: String,
    pub file_name: String,
    pub pdf: Vec<u8>,
    pub print: PrintOutcome,
}

/// Nome do arquivo oferecido para download
pub fn ticket_file_name(area: &str, number: u32) -> String {
    let safe_area: String = area
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    format!("senha_{}_{}.pdf", safe_area, number)
}
