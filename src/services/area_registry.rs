use crate::models::Area;
use crate::services::sheets::{a1_range, SheetsApi};
use crate::utils::logging::*;
use crate::utils::normalization::{find_column_index, is_truthy, normalize_key};
use crate::utils::{AppError, AppResult};

const AREA_COLUMNS: &[&str] = &["Área", "Area", "Setor", "Mesa", "Área/Setor"];
const SHEET_COLUMNS: &[&str] = &["Aba", "Sheet", "AbaDestino", "Aba Destino", "Destino", "Guia", "Tab"];
const ACTIVE_COLUMNS: &[&str] = &["Ativa", "Ativo", "Status", "Habilitada", "Disponível"];

const NEIGHBORHOOD_HEADERS: &[&str] = &["Nome do Bairro", "Bairro"];

fn cell(row: &[String], index: Option<usize>) -> Option<&str> {
    index.and_then(|i| row.get(i)).map(|s| s.trim())
}

/// Interpreta as linhas da aba "Nomes" e devolve só as áreas ativas
///
/// A primeira linha é o cabeçalho. Uma aba vazia resulta em lista vazia.
pub fn parse_active_areas(rows: &[Vec<String>]) -> AppResult<Vec<Area>> {
    let Some((header, body)) = rows.split_first() else {
        return Ok(Vec::new());
    };

    let area_idx = find_column_index(header, AREA_COLUMNS).ok_or_else(|| {
        AppError::ConfigError("Coluna 'Área' (ou equivalente) não encontrada".to_string())
    })?;
    let sheet_idx = find_column_index(header, SHEET_COLUMNS);
    let active_idx = find_column_index(header, ACTIVE_COLUMNS);

    let mut total = 0;
    let areas: Vec<Area> = body
        .iter()
        .filter_map(|row| {
            let area = cell(row, Some(area_idx)).filter(|a| !a.is_empty())?;
            total += 1;

            let sheet = cell(row, sheet_idx)
                .filter(|s| !s.is_empty())
                .unwrap_or(area);
            // Coluna ausente ou linha curta conta como "Sim"
            let active = match active_idx {
                None => true,
                Some(i) => row.get(i).map_or(true, |v| is_truthy(v)),
            };

            Some(Area {
                area: area.to_string(),
                sheet: sheet.to_string(),
                active,
            })
        })
        .filter(|a| a.active)
        .collect();

    log_areas_loaded(total, areas.len());
    Ok(areas)
}

pub async fn read_active_areas(sheets: &dyn SheetsApi, nomes_tab: &str) -> AppResult<Vec<Area>> {
    let rows = sheets.read_values(&a1_range(nomes_tab, "A:Z")).await?;
    parse_active_areas(&rows)
}

/// Lista de bairros da coluna A, sem o cabeçalho e sem células vazias
pub fn parse_neighborhoods(rows: &[Vec<String>]) -> Vec<String> {
    let header_keys: Vec<String> = NEIGHBORHOOD_HEADERS.iter().map(|h| normalize_key(h)).collect();

    rows.iter()
        .enumerate()
        .filter_map(|(i, row)| {
            let value = row.first()?.trim();
            if value.is_empty() {
                return None;
            }
            if i == 0 && header_keys.contains(&normalize_key(value)) {
                return None;
            }
            Some(value.to_string())
        })
        .collect()
}

pub async fn read_neighborhoods(sheets: &dyn SheetsApi, bairros_tab: &str) -> AppResult<Vec<String>> {
    let rows = sheets.read_values(&a1_range(bairros_tab, "A:A")).await?;
    Ok(parse_neighborhoods(&rows))
}

/// Encontra a área ativa escolhida no formulário
pub fn resolve_area<'a>(areas: &'a [Area], name: &str) -> AppResult<&'a Area> {
    let wanted = name.trim();
    areas
        .iter()
        .find(|a| a.active && a.area == wanted)
        .ok_or_else(|| {
            log_validation_error("area", wanted);
            AppError::ValidationError(format!("Área '{}' não está disponível.", wanted))
        })
}
