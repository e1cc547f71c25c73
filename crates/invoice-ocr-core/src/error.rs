//! Error types for the invoice-ocr-core library.

use thiserror::Error;

/// Main error type for the invoice-ocr library.
#[derive(Error, Debug)]
pub enum InvoiceOcrError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// OCR processing error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Scanned PDF: there is no embedded text and pages are not rasterized.
    #[error("PDF has no text layer; scanned PDFs are not supported")]
    NoTextLayer,

    /// Built without the `pdf` feature.
    #[error("PDF support is not enabled in this build")]
    Unsupported,
}

/// Errors related to OCR processing.
#[derive(Error, Debug)]
pub enum OcrError {
    /// The OCR engine binary could not be found or started.
    #[error("OCR engine not available: {0}")]
    EngineNotAvailable(String),

    /// The engine ran but reported a failure.
    #[error("text recognition failed: {0}")]
    Recognition(String),

    /// Invalid image format or dimensions.
    #[error("invalid image: {0}")]
    InvalidImage(String),

    /// I/O error while talking to the engine.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Credential check failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Username or password did not match.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// No credentials were supplied.
    #[error("Not authenticated")]
    Missing,

    /// The Authorization header or cookie could not be decoded.
    #[error("malformed credentials: {0}")]
    Malformed(String),
}

/// Errors surfaced at the request boundary.
///
/// Each variant is one of the three error kinds a caller can observe:
/// a client input problem, an authentication failure, or a processing
/// failure whose message is passed through unchanged.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The file extension is not in the allow-list.
    #[error("Invalid file type. Supported types: {supported}")]
    UnsupportedFileType { extension: String, supported: String },

    /// The upload exceeds the configured size limit.
    #[error("File too large: {size} bytes exceeds the {limit} byte limit")]
    FileTooLarge { size: u64, limit: u64 },

    /// Credentials were missing or wrong.
    #[error("{0}")]
    Authentication(#[from] AuthError),

    /// OCR, decoding, or extraction failed.
    #[error("Error processing invoice: {0}")]
    Processing(String),
}

impl ServiceError {
    /// HTTP status code a front end should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::UnsupportedFileType { .. } => 400,
            ServiceError::FileTooLarge { .. } => 413,
            ServiceError::Authentication(_) => 401,
            ServiceError::Processing(_) => 500,
        }
    }

    /// Value for a `WWW-Authenticate` header, if one is required.
    pub fn challenge(&self) -> Option<&'static str> {
        match self {
            ServiceError::Authentication(_) => Some("Basic"),
            _ => None,
        }
    }
}

impl From<InvoiceOcrError> for ServiceError {
    fn from(err: InvoiceOcrError) -> Self {
        ServiceError::Processing(err.to_string())
    }
}

/// Result type for the invoice-ocr library.
pub type Result<T> = std::result::Result<T, InvoiceOcrError>;
