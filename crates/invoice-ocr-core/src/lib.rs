//! Core library for invoice OCR processing.
//!
//! This crate provides:
//! - Invoice field extraction from OCR transcripts (ordered regex tables)
//! - OCR via the Tesseract command-line tool
//! - PDF text-layer extraction (`pdf` feature)
//! - Upload and access gatekeeping
//! - A processing pipeline tying these together

pub mod auth;
pub mod error;
pub mod invoice;
pub mod models;
pub mod ocr;
#[cfg(feature = "pdf")]
pub mod pdf;
pub mod pipeline;
pub mod upload;

pub use auth::{AccessGate, AuthCookie, Credentials};
pub use error::{AuthError, InvoiceOcrError, OcrError, PdfError, Result, ServiceError};
pub use invoice::{extract_invoice_data, ExtractionResult, InvoiceParser, RegexInvoiceParser};
pub use models::{AppConfig, ExtractionResponse, InvoiceRecord, LineItem};
pub use ocr::{OcrEngine, OcrResult, TesseractEngine};
pub use pipeline::InvoiceProcessor;
pub use upload::{AllowedExtensions, StagedUpload, UploadGate, UploadKind};
