/// Google Sheets client: leitura, append e atualização de abas
///
/// O trait `SheetsApi` é a fronteira com a planilha. Em produção ele é
/// implementado por `GoogleSheetsClient` (REST v4 via reqwest); nos testes
/// por um backend em memória.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::auth::TokenProvider;
use crate::config::SheetsSettings;
use crate::utils::logging::*;
use crate::utils::{truncate_safe, AppError, AppResult};

#[async_trait]
pub trait SheetsApi: Send + Sync {
    /// Lê um range A1 como linhas de texto (linhas curtas não são completadas)
    async fn read_values(&self, range: &str) -> AppResult<Vec<Vec<String>>>;

    /// Faz append de uma linha e devolve o `updatedRange` ecoado pela API
    async fn append_row(&self, range: &str, row: Vec<String>) -> AppResult<String>;

    /// Sobrescreve um range A1
    async fn update_values(&self, range: &str, values: Vec<Vec<String>>) -> AppResult<()>;

    /// Títulos das abas existentes
    async fn sheet_titles(&self) -> AppResult<Vec<String>>;

    /// Cria uma aba nova
    async fn add_sheet(&self, title: &str) -> AppResult<()>;
}

/// Monta um range A1 com o título da aba entre aspas
pub fn a1_range(sheet: &str, cells: &str) -> String {
    format!("'{}'!{}", sheet.replace('\'', "''"), cells)
}

#[derive(Debug, Deserialize)]
struct ValueRangeResponse {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct AppendValuesResponse {
    updates: Option<UpdateValuesResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateValuesResponse {
    updated_range: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetResponse {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: Option<SheetProperties>,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    title: Option<String>,
}

fn cell_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Cliente REST da API Google Sheets v4
#[derive(Clone)]
pub struct GoogleSheetsClient {
    http_client: Client,
    base_url: String,
    spreadsheet_id: String,
    tokens: Arc<dyn TokenProvider>,
}

impl GoogleSheetsClient {
    pub fn new(settings: &SheetsSettings, tokens: Arc<dyn TokenProvider>) -> Self {
        Self {
            http_client: Client::new(),
            base_url: settings.api_base_url.trim_end_matches('/').to_string(),
            spreadsheet_id: settings.spreadsheet_id.clone(),
            tokens,
        }
    }

    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    fn values_url(&self, range: &str) -> String {
        format!(
            "{}/spreadsheets/{}/values/{}",
            self.base_url,
            self.spreadsheet_id,
            urlencoding::encode(range)
        )
    }

    async fn bearer(&self) -> AppResult<String> {
        Ok(self.tokens.access_token().await?)
    }

    /// Converte respostas não-2xx em `AppError::SheetsApi`
    async fn check(response: Response, operation: &str) -> AppResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
        let error_text = truncate_safe(error_text.trim(), 500);
        log_sheets_api_error(operation, Some(status.as_u16()), error_text);
        Err(AppError::SheetsApi(format!("{} [{}]: {}", operation, status, error_text)))
    }
}

#[async_trait]
impl SheetsApi for GoogleSheetsClient {
    async fn read_values(&self, range: &str) -> AppResult<Vec<Vec<String>>> {
        let response = self
            .http_client
            .get(self.values_url(range))
            .bearer_auth(self.bearer().await?)
            .send()
            .await
            .map_err(|e| AppError::SheetsApi(format!("Falha ao ler '{}': {}", range, e)))?;

        let body: ValueRangeResponse = Self::check(response, "values.get")
            .await?
            .json()
            .await
            .map_err(|e| AppError::SheetsApi(format!("Resposta inválida de values.get: {}", e)))?;

        Ok(body
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_to_string).collect())
            .collect())
    }

    async fn append_row(&self, range: &str, row: Vec<String>) -> AppResult<String> {
        let response = self
            .http_client
            .post(format!("{}:append", self.values_url(range)))
            .query(&[("valueInputOption", "RAW"), ("insertDataOption", "INSERT_ROWS")])
            .bearer_auth(self.bearer().await?)
            .json(&json!({ "values": [row] }))
            .send()
            .await
            .map_err(|e| AppError::SheetsApi(format!("Falha ao gravar em '{}': {}", range, e)))?;

        let body: AppendValuesResponse = Self::check(response, "values.append")
            .await?
            .json()
            .await
            .map_err(|e| AppError::SheetsApi(format!("Resposta inválida de values.append: {}", e)))?;

        Ok(body
            .updates
            .and_then(|u| u.updated_range)
            .unwrap_or_default())
    }

    async fn update_values(&self, range: &str, values: Vec<Vec<String>>) -> AppResult<()> {
        let response = self
            .http_client
            .put(self.values_url(range))
            .query(&[("valueInputOption", "RAW")])
            .bearer_auth(self.bearer().await?)
            .json(&json!({ "values": values }))
            .send()
            .await
            .map_err(|e| AppError::SheetsApi(format!("Falha ao atualizar '{}': {}", range, e)))?;

        Self::check(response, "values.update").await?;
        Ok(())
    }

    async fn sheet_titles(&self) -> AppResult<Vec<String>> {
        let response = self
            .http_client
            .get(format!("{}/spreadsheets/{}", self.base_url, self.spreadsheet_id))
            .query(&[("fields", "sheets.properties.title")])
            .bearer_auth(self.bearer().await?)
            .send()
            .await
            .map_err(|e| AppError::SheetsApi(format!("Falha ao ler metadados: {}", e)))?;

        let body: SpreadsheetResponse = Self::check(response, "spreadsheets.get")
            .await?
            .json()
            .await
            .map_err(|e| AppError::SheetsApi(format!("Resposta inválida de spreadsheets.get: {}", e)))?;

        Ok(body
            .sheets
            .into_iter()
            .filter_map(|s| s.properties.and_then(|p| p.title))
            .collect())
    }

    async fn add_sheet(&self, title: &str) -> AppResult<()> {
        let response = self
            .http_client
            .post(format!(
                "{}/spreadsheets/{}:batchUpdate",
                self.base_url, self.spreadsheet_id
            ))
            .bearer_auth(self.bearer().await?)
            .json(&json!({
                "requests": [{ "addSheet": { "properties": { "title": title } } }]
            }))
            .send()
            .await
            .map_err(|e| AppError::SheetsApi(format!("Falha ao criar aba '{}': {}", title, e)))?;

        Self::check(response, "spreadsheets.batchUpdate").await?;
        log_info(&format!("📄 Aba '{}' criada na planilha", title));
        Ok(())
    }
}
