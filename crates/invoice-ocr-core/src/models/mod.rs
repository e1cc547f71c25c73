//! Data models and configuration.

pub mod config;
pub mod invoice;

pub use config::AppConfig;
pub use invoice::{ExtractionResponse, InvoiceRecord, LineItem};
