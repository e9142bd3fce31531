use serde::{Deserialize, Serialize};
use config::{builder::DefaultState, Config, ConfigBuilder, ConfigError, Environment, File};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub sheets: SheetsSettings,
    pub google: GoogleSettings,
    pub printer: PrinterSettings,
    pub ticket: TicketSettings,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SheetsSettings {
    pub spreadsheet_id: String,
    pub nomes_sheet: String,   // Aba com as áreas/setores
    pub bairros_sheet: String, // Aba com a lista de bairros
    pub api_base_url: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GoogleSettings {
    pub service_account_json: Option<String>,
    pub service_account_file: Option<String>,
    pub client_secret_json: Option<String>,
    pub client_secret_file: Option<String>,
    pub token_path: String, // Cache do token OAuth de usuário
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PrinterSettings {
    pub url: Option<String>,
    pub token: Option<String>,
    pub timeout_seconds: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TicketSettings {
    pub timezone: String,
    pub logo_path: Option<String>,
    pub title: String,
}

/// Variáveis de ambiente aceitas e a chave de configuração que cada uma sobrescreve
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("SPREADSHEET_ID", "sheets.spreadsheet_id"),
    ("NOMES_SHEET", "sheets.nomes_sheet"),
    ("BAIRROS_SHEET", "sheets.bairros_sheet"),
    ("GOOGLE_SERVICE_ACCOUNT_JSON", "google.service_account_json"),
    ("GOOGLE_SERVICE_ACCOUNT_FILE", "google.service_account_file"),
    ("GOOGLE_CLIENT_SECRET", "google.client_secret_json"),
    ("GOOGLE_CLIENT_SECRET_FILE", "google.client_secret_file"),
    ("GOOGLE_TOKEN_PATH", "google.token_path"),
    ("PRINT_SERVER_URL", "printer.url"),
    ("PRINT_SERVER_TOKEN", "printer.token"),
    ("PDF_LOGO_PATH", "ticket.logo_path"),
    ("APP_TZ", "ticket.timezone"),
    ("PORT", "server.port"),
];

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Self::defaults()?
            // Arquivo de configuração base
            .add_source(File::with_name("config/default").required(false))
            // Arquivo específico do ambiente
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Prefixo próprio para qualquer chave (ex.: SENHAS__SERVER__HOST)
            .add_source(Environment::with_prefix("SENHAS").separator("__"));

        let builder = Self::apply_overrides(builder, |name| std::env::var(name).ok())?;

        Self::finish(builder)
    }

    /// Carrega apenas defaults + sobrescritas, sem arquivos nem ambiente real
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let builder = Self::apply_overrides(Self::defaults()?, lookup)?;
        Self::finish(builder)
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("sheets.spreadsheet_id", "")?
            .set_default("sheets.nomes_sheet", "Nomes")?
            .set_default("sheets.bairros_sheet", "Bairro")?
            .set_default("sheets.api_base_url", "https://sheets.googleapis.com/v4")?
            .set_default("google.token_path", "token.json")?
            .set_default("printer.timeout_seconds", 10)?
            .set_default("ticket.timezone", "America/Manaus")?
            .set_default("ticket.title", "Distribuidor de Senhas")
    }

    fn apply_overrides<F>(
        mut builder: ConfigBuilder<DefaultState>,
        lookup: F,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        for (var, key) in ENV_OVERRIDES {
            if let Some(value) = lookup(var).filter(|v| !v.trim().is_empty()) {
                builder = builder.set_override(*key, value)?;
            }
        }
        Ok(builder)
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let settings: Settings = builder.build()?.try_deserialize()?;

        if settings.sheets.spreadsheet_id.trim().is_empty() {
            return Err(ConfigError::Message(
                "SPREADSHEET_ID não configurado (defina em config/default.toml ou na variável de ambiente)".to_string(),
            ));
        }

        Ok(settings)
    }

    /// Servidor de impressão só é usado quando a URL está definida
    pub fn print_enabled(&self) -> bool {
        self.printer
            .url
            .as_deref()
            .map_or(false, |url| !url.trim().is_empty())
    }
}
