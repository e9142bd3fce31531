//! Gravação das senhas nas abas de cada área
//!
//! Não existe contador próprio: o número da senha sai da linha em que a API
//! do Sheets gravou o append (linha 1 é o cabeçalho). Dois envios simultâneos
//! para a mesma área ficam ordenados pelo próprio append da planilha.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{TicketRow, TICKET_HEADERS};
use crate::services::sheets::{a1_range, SheetsApi};
use crate::utils::logging::*;
use crate::utils::{AppError, AppResult};

// Parte da célula depois do último '!': A5, A5:F5, $A$5
static CELL_ROW_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\$?[A-Za-z]+\$?(\d+)").expect("regex de linha inválida")
});

/// Linha gravada e senha atribuída
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppendedTicket {
    pub row: u32,
    pub number: u32,
}

fn header_row() -> Vec<Vec<String>> {
    vec![TICKET_HEADERS.iter().map(|h| h.to_string()).collect()]
}

/// Garante que a aba da área existe e tem o cabeçalho na linha 1
pub async fn ensure_area_sheet(sheets: &dyn SheetsApi, tab: &str) -> AppResult<()> {
    let titles = sheets.sheet_titles().await?;

    if !titles.iter().any(|t| t == tab) {
        sheets.add_sheet(tab).await?;
        sheets.update_values(&a1_range(tab, "A1:F1"), header_row()).await?;
        return Ok(());
    }

    let first_rows = sheets.read_values(&a1_range(tab, "A1:F1")).await?;
    let has_header = first_rows
        .first()
        .map_or(false, |row| row.iter().any(|c| !c.trim().is_empty()));

    if !has_header {
        log_info(&format!("📝 Aba '{}' sem cabeçalho, gravando", tab));
        sheets.update_values(&a1_range(tab, "A1:F1"), header_row()).await?;
    }

    Ok(())
}

/// Extrai a linha (1-based) do `updatedRange` devolvido pelo append
pub fn parse_row_from_updated_range(updated_range: &str) -> AppResult<u32> {
    let cells = updated_range
        .rsplit_once('!')
        .map_or(updated_range, |(_, cells)| cells);

    CELL_ROW_RE
        .captures(cells.trim())
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .ok_or_else(|| {
            AppError::SheetsApi(format!(
                "Não foi possível detectar a linha inserida: {:?}",
                updated_range
            ))
        })
}

/// Senha = linha - 1 (cabeçalho), nunca menor que 1
pub fn ticket_number_for_row(row: u32) -> u32 {
    row.saturating_sub(1).max(1)
}

/// Faz o append da linha, deriva a senha e grava o número na coluna A
pub async fn append_ticket(
    sheets: &dyn SheetsApi,
    tab: &str,
    row: &TicketRow,
) -> AppResult<AppendedTicket> {
    let updated_range = sheets.append_row(&a1_range(tab, "A1"), row.to_values()).await?;

    let row_index = parse_row_from_updated_range(&updated_range)?;
    let number = ticket_number_for_row(row_index);

    sheets
        .update_values(
            &a1_range(tab, &format!("A{}", row_index)),
            vec![vec![number.to_string()]],
        )
        .await?;

    log_ticket_appended(tab, row_index, number);

    Ok(AppendedTicket { row: row_index, number })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_updated_range_variants() {
        assert_eq!(parse_row_from_updated_range("'Odonto'!A5:F5").unwrap(), 5);
        assert_eq!(parse_row_from_updated_range("Odonto!A12").unwrap(), 12);
        assert_eq!(parse_row_from_updated_range("'Mesa 2'!A103:F103").unwrap(), 103);
        assert_eq!(parse_row_from_updated_range("'Sala!3'!A7:F7").unwrap(), 7);
        assert_eq!(parse_row_from_updated_range("Odonto!$A$9:$F$9").unwrap(), 9);
    }

    #[test]
    fn test_parse_updated_range_invalid() {
        for bad in ["", "Odonto", "'Odonto'!A:F"] {
            let err = parse_row_from_updated_range(bad).unwrap_err();
            assert!(err.to_string().contains("Não foi possível detectar a linha inserida"));
        }
    }

    #[test]
    fn test_ticket_number_for_row() {
        assert_eq!(ticket_number_for_row(2), 1);
        assert_eq!(ticket_number_for_row(5), 4);
        assert_eq!(ticket_number_for_row(1), 1);
        assert_eq!(ticket_number_for_row(0), 1);
    }
}
