pub mod error;
pub mod formatting;
pub mod logging;
pub mod normalization;
pub mod string_utils;

pub use error::*;
pub use string_utils::{escape_html, limit_chars, truncate_safe};
