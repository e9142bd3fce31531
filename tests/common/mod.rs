#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex};

use distribuidor_senhas::config::Settings;
use distribuidor_senhas::services::{SheetsApi, TicketService};
use distribuidor_senhas::utils::{AppError, AppResult};
use distribuidor_senhas::AppState;

/// Planilha em memória com a mesma semântica de A1 usada pelo serviço
#[derive(Default)]
pub struct InMemorySheets {
    tabs: Mutex<BTreeMap<String, Vec<Vec<String>>>>,
    failing: Mutex<HashSet<String>>,
}

/// Divide `'Aba'!A1:F1` em ("Aba", "A1:F1")
fn split_range(range: &str) -> (String, String) {
    if let Some(rest) = range.strip_prefix('\'') {
        if let Some(end) = rest.find("'!") {
            return (rest[..end].replace("''", "'"), rest[end + 2..].to_string());
        }
    }
    match range.split_once('!') {
        Some((tab, cells)) => (tab.to_string(), cells.to_string()),
        None => (range.to_string(), String::new()),
    }
}

/// "B7" -> (1, Some(7)); "A" -> (0, None)
fn parse_cell(cell: &str) -> (usize, Option<usize>) {
    let letters: String = cell.chars().take_while(|c| c.is_ascii_alphabetic()).collect();
    let digits: String = cell.chars().skip(letters.len()).collect();
    let col = letters
        .to_ascii_uppercase()
        .chars()
        .fold(0usize, |acc, c| acc * 26 + (c as usize - 'A' as usize + 1))
        .saturating_sub(1);
    (col, digits.parse().ok())
}

impl InMemorySheets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tab(self, title: &str, rows: &[&[&str]]) -> Self {
        let rows = rows
            .iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect();
        self.tabs
            .lock()
            .unwrap()
            .insert(title.to_string(), rows);
        self
    }

    /// Qualquer leitura dessa aba passa a falhar
    pub fn fail_reads_of(&self, title: &str) {
        self.failing.lock().unwrap().insert(title.to_string());
    }

    pub fn tab(&self, title: &str) -> Option<Vec<Vec<String>>> {
        self.tabs.lock().unwrap().get(title).cloned()
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}

#[async_trait]
impl SheetsApi for InMemorySheets {
    async fn read_values(&self, range: &str) -> AppResult<Vec<Vec<String>>> {
        let (title, cells) = split_range(range);
        if self.failing.lock().unwrap().contains(&title) {
            return Err(AppError::SheetsApi(format!("values.get [403]: {}", title)));
        }

        let tabs = self.tabs.lock().unwrap();
        let rows = tabs
            .get(&title)
            .ok_or_else(|| AppError::SheetsApi(format!("Unable to parse range: {}", range)))?;

        let (start, end) = cells.split_once(':').unwrap_or((cells.as_str(), cells.as_str()));
        let (first_col, first_row) = parse_cell(start);
        let (last_col, last_row) = parse_cell(end);
        let first_row = first_row.unwrap_or(1);
        let last_row = last_row.unwrap_or(rows.len());

        let mut out: Vec<Vec<String>> = rows
            .iter()
            .enumerate()
            .filter(|(i, _)| *i + 1 >= first_row && *i + 1 <= last_row)
            .map(|(_, row)| {
                let mut cells: Vec<String> = row
                    .iter()
                    .skip(first_col)
                    .take(last_col + 1 - first_col)
                    .cloned()
                    .collect();
                while cells.last().map_or(false, |c| c.is_empty()) {
                    cells.pop();
                }
                cells
            })
            .collect();

        while out.last().map_or(false, |r| r.is_empty()) {
            out.pop();
        }
        Ok(out)
    }

    async fn append_row(&self, range: &str, row: Vec<String>) -> AppResult<String> {
        let (title, _) = split_range(range);
        let mut tabs = self.tabs.lock().unwrap();
        let rows = tabs
            .get_mut(&title)
            .ok_or_else(|| AppError::SheetsApi(format!("Unable to parse range: {}", range)))?;

        while rows.last().map_or(false, |r| r.iter().all(|c| c.is_empty())) {
            rows.pop();
        }
        rows.push(row);
        let index = rows.len();
        Ok(format!("'{}'!A{}:F{}", title, index, index))
    }

    async fn update_values(&self, range: &str, values: Vec<Vec<String>>) -> AppResult<()> {
        let (title, cells) = split_range(range);
        let mut tabs = self.tabs.lock().unwrap();
        let rows = tabs
            .get_mut(&title)
            .ok_or_else(|| AppError::SheetsApi(format!("Unable to parse range: {}", range)))?;

        let start = cells.split(':').next().unwrap_or("A1");
        let (col, row) = parse_cell(start);
        let first_row = row.unwrap_or(1);

        for (offset, new_values) in values.into_iter().enumerate() {
            let index = first_row - 1 + offset;
            while rows.len() <= index {
                rows.push(Vec::new());
            }
            let target = &mut rows[index];
            for (c, value) in new_values.into_iter().enumerate() {
                while target.len() <= col + c {
                    target.push(String::new());
                }
                target[col + c] = value;
            }
        }
        Ok(())
    }

    async fn sheet_titles(&self) -> AppResult<Vec<String>> {
        Ok(self.tabs.lock().unwrap().keys().cloned().collect())
    }

    async fn add_sheet(&self, title: &str) -> AppResult<()> {
        self.tabs
            .lock()
            .unwrap()
            .entry(title.to_string())
            .or_default();
        Ok(())
    }
}

pub const TICKET_HEADER: &[&str] = &[
    "Senha",
    "Nome",
    "Telefone",
    "Bairro",
    "Data e Hora de Registro",
    "Data e Hora de Atendimento",
];

/// Planilha típica de evento: três áreas, uma inativa, e a lista de bairros
pub fn event_spreadsheet() -> InMemorySheets {
    InMemorySheets::new()
        .with_tab(
            "Nomes",
            &[
                &["Área", "Aba", "Ativa"],
                &["Odontologia", "Odonto", "Sim"],
                &["Vacinação", "", "Não"],
                &["Clínico Geral", "Clinico", "TRUE"],
            ],
        )
        .with_tab("Bairro", &[&["Nome do Bairro"], &["Centro"], &["Compensa"]])
        .with_tab("Odonto", &[TICKET_HEADER])
}

pub fn settings_with(extra: &[(&str, &str)]) -> Settings {
    let mut vars: Vec<(String, String)> = vec![("SPREADSHEET_ID".into(), "planilha-teste".into())];
    vars.extend(extra.iter().map(|(k, v)| (k.to_string(), v.to_string())));
    Settings::from_lookup(move |name| {
        vars.iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.clone())
    })
    .expect("configuração de teste inválida")
}

pub fn service_for(sheets: Arc<InMemorySheets>, settings: &Settings) -> TicketService {
    TicketService::new(sheets, settings)
}

pub fn app_state(sheets: Arc<InMemorySheets>) -> Arc<AppState> {
    let settings = settings_with(&[]);
    let tickets = service_for(sheets, &settings);
    Arc::new(AppState { settings, tickets })
}

/// Textos desenhados (operadores `Tj`/`TJ`) em cada página do PDF, na ordem do content stream
pub fn pdf_text_runs(pdf: &[u8]) -> Vec<String> {
    use lopdf::content::Content;
    use lopdf::{Document, Object};

    fn string_of(object: &Object) -> Option<String> {
        match object {
            Object::String(bytes, _) => Some(bytes.iter().map(|b| *b as char).collect()),
            _ => None,
        }
    }

    let document = Document::load_mem(pdf).expect("PDF inválido");
    let mut runs = Vec::new();
    for (_, page_id) in document.get_pages() {
        let content = document.get_page_content(page_id).expect("conteúdo da página");
        let operations = Content::decode(&content).expect("content stream").operations;
        for op in operations {
            match op.operator.as_str() {
                "Tj" => runs.extend(op.operands.iter().filter_map(string_of)),
                "TJ" => {
                    let joined: String = op
                        .operands
                        .iter()
                        .filter_map(|o| o.as_array().ok())
                        .flatten()
                        .filter_map(string_of)
                        .collect();
                    runs.push(joined);
                }
                _ => {}
            }
        }
    }
    runs
}
