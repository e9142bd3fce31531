pub mod settings;

pub use settings::{GoogleSettings, PrinterSettings, Settings, SheetsSettings, TicketSettings};
