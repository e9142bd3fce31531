//! Fluxo completo de uma senha: valida, resolve a área, grava na planilha,
//! gera o PDF e tenta imprimir. Usado tanto pelo formulário HTML quanto pela
//! API JSON.

use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::Settings;
use crate::models::{ticket_file_name, Area, IssuedTicket, PrintOutcome, TicketForm, TicketRow};
use crate::services::area_registry::{read_active_areas, read_neighborhoods, resolve_area};
use crate::services::pdf::{TicketDocument, TicketPdfRenderer};
use crate::services::printer::PrintForwarder;
use crate::services::sheets::SheetsApi;
use crate::services::ticket_writer::{append_ticket, ensure_area_sheet};
use crate::utils::formatting::now_str;
use crate::utils::AppResult;

#[derive(Clone)]
pub struct TicketService {
    sheets: Arc<dyn SheetsApi>,
    nomes_sheet: String,
    bairros_sheet: String,
    timezone: String,
    renderer: Arc<TicketPdfRenderer>,
    printer: Option<PrintForwarder>,
}

impl TicketService {
    pub fn new(sheets: Arc<dyn SheetsApi>, settings: &Settings) -> Self {
        let renderer = TicketPdfRenderer::new(settings.ticket.title.clone())
            .with_logo_path(settings.ticket.logo_path.as_deref());

        Self {
            sheets,
            nomes_sheet: settings.sheets.nomes_sheet.clone(),
            bairros_sheet: settings.sheets.bairros_sheet.clone(),
            timezone: settings.ticket.timezone.clone(),
            renderer: Arc::new(renderer),
            printer: PrintForwarder::new(&settings.printer),
        }
    }

    pub fn print_enabled(&self) -> bool {
        self.printer.is_some()
    }

    pub async fn list_active_areas(&self) -> AppResult<Vec<Area>> {
        read_active_areas(self.sheets.as_ref(), &self.nomes_sheet).await
    }

    pub async fn list_neighborhoods(&self) -> AppResult<Vec<String>> {
        read_neighborhoods(self.sheets.as_ref(), &self.bairros_sheet).await
    }

    pub async fn submit(&self, form: &TicketForm) -> AppResult<IssuedTicket> {
        let submission_id = Uuid::new_v4();
        let request = form.validate()?;

        info!(%submission_id, area = %request.area, "🎫 Nova senha solicitada");

        let areas = self.list_active_areas().await?;
        let area = resolve_area(&areas, &request.area)?.clone();

        ensure_area_sheet(self.sheets.as_ref(), &area.sheet).await?;

        let row = TicketRow {
            name: request.name,
            phone: request.phone,
            neighborhood: request.neighborhood,
            registered_at: now_str(&self.timezone),
        };
        let appended = append_ticket(self.sheets.as_ref(), &area.sheet, &row).await?;

        let document = TicketDocument {
            area: area.area.clone(),
            number: appended.number,
            name: row.name.clone(),
            phone: row.phone.clone(),
            neighborhood: row.neighborhood.clone(),
            registered_at: row.registered_at.clone(),
        };
        let pdf = self.renderer.render(&document)?;
        let file_name = ticket_file_name(&area.area, appended.number);

        let print = match &self.printer {
            Some(printer) => printer.forward(&pdf, &file_name).await,
            None => PrintOutcome::NotConfigured,
        };

        if let PrintOutcome::Failed(reason) = &print {
            warn!(%submission_id, %reason, "Impressão falhou, PDF oferecido para download");
        }

        info!(
            %submission_id,
            senha = appended.number,
            aba = %area.sheet,
            "✅ Senha emitida"
        );

        Ok(IssuedTicket {
            number: appended.number,
            area: area.area,
            sheet: area.sheet,
            name: row.name,
            phone: row.phone,
            neighborhood: row.neighborhood,
            registered_at: row.registered_at,
            file_name,
            pdf,
            print,
        })
    }
}
