//! Rendering of extraction results for the terminal and files.

use invoice_ocr_core::models::{ExtractionResponse, InvoiceRecord};

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub const CSV_HEADER: [&str; 6] = [
    "filename",
    "invoice_number",
    "date",
    "due_date",
    "vendor",
    "total_amount",
];

pub fn render(source: &str, record: &InvoiceRecord, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => {
            let response = ExtractionResponse {
                filename: source.to_string(),
                extracted_data: record.clone(),
            };
            Ok(serde_json::to_string_pretty(&response)?)
        }
        OutputFormat::Csv => format_csv(source, record),
        OutputFormat::Text => Ok(format_text(source, record)),
    }
}

/// CSV fields in [`CSV_HEADER`] order. Missing values are empty.
pub fn csv_fields(source: &str, record: &InvoiceRecord) -> [String; 6] {
    [
        source.to_string(),
        record.invoice_number.clone().unwrap_or_default(),
        record.date.clone().unwrap_or_default(),
        record.due_date.clone().unwrap_or_default(),
        record.vendor.clone().unwrap_or_default(),
        record
            .total_amount
            .map(|a| a.to_string())
            .unwrap_or_default(),
    ]
}

fn format_csv(source: &str, record: &InvoiceRecord) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(CSV_HEADER)?;
    wtr.write_record(csv_fields(source, record))?;
    Ok(String::from_utf8(wtr.into_inner()?)?)
}

fn format_text(source: &str, record: &InvoiceRecord) -> String {
    fn or_dash(value: &Option<String>) -> &str {
        value.as_deref().unwrap_or("-")
    }

    let mut output = String::new();
    output.push_str(&format!("File:           {}\n", source));
    output.push_str(&format!("Invoice number: {}\n", or_dash(&record.invoice_number)));
    output.push_str(&format!("Date:           {}\n", or_dash(&record.date)));
    output.push_str(&format!("Due date:       {}\n", or_dash(&record.due_date)));
    output.push_str(&format!("Vendor:         {}\n", or_dash(&record.vendor)));
    output.push_str(&format!(
        "Total amount:   {}\n",
        record
            .total_amount
            .map(|a| a.to_string())
            .unwrap_or_else(|| "-".to_string())
    ));
    output
}
