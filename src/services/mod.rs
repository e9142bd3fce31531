pub mod area_registry;
pub mod pdf;
pub mod printer;
pub mod sheets;
pub mod ticket_service;
pub mod ticket_writer;

pub use pdf::{TicketDocument, TicketLayout, TicketPdfRenderer};
pub use printer::PrintForwarder;
pub use sheets::{a1_range, GoogleSheetsClient, SheetsApi};
pub use ticket_service::TicketService;
