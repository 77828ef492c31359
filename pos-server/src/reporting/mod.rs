//! Reporting adapters
//!
//! Pure transforms from orders to downloadable documents:
//!
//! - [`PdfReceiptRenderer`] - single order → PDF receipt
//! - [`XlsxReportRenderer`] - order list → Excel workbook
//!
//! Renderers only read their input. Missing optional fields are printed as
//! a placeholder ("N/A" on receipts, "-" in reports).

pub mod pdf;
pub mod xlsx;

pub use pdf::PdfReceiptRenderer;
pub use xlsx::XlsxReportRenderer;

use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use http::header;
use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};
use shared::models::Order;
use thiserror::Error;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Rendered file ready to be sent as an attachment
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub filename: String,
}

impl RenderedDocument {
    /// `Content-Disposition` header value
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.filename)
    }
}

impl IntoResponse for RenderedDocument {
    fn into_response(self) -> Response {
        let disposition = self.content_disposition();
        (
            [
                (header::CONTENT_TYPE, self.content_type.to_string()),
                (header::CONTENT_DISPOSITION, disposition),
            ],
            self.bytes,
        )
            .into_response()
    }
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Receipt rendering failed: {0}")]
    Receipt(String),

    #[error("Report rendering failed: {0}")]
    Report(String),
}

impl From<zip::result::ZipError> for ReportError {
    fn from(e: zip::result::ZipError) -> Self {
        Self::Report(e.to_string())
    }
}

impl From<std::io::Error> for ReportError {
    fn from(e: std::io::Error) -> Self {
        Self::Report(e.to_string())
    }
}

impl From<ReportError> for AppError {
    fn from(err: ReportError) -> Self {
        let code = match err {
            ReportError::Receipt(_) => ErrorCode::ReceiptRenderFailed,
            ReportError::Report(_) => ErrorCode::ExportFailed,
        };
        AppError::with_message(code, err.to_string())
    }
}

pub trait ReceiptRenderer: Send + Sync {
    fn render_receipt(&self, order: &Order) -> Result<RenderedDocument, ReportError>;
}

pub trait ReportRenderer: Send + Sync {
    /// `file_stem` names the download, without extension
    fn render_report(
        &self,
        title: &str,
        file_stem: &str,
        orders: &[Order],
    ) -> Result<RenderedDocument, ReportError>;
}

/// `dd.mm.YYYY HH:MM` in UTC
pub(crate) fn format_timestamp(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|t| t.format("%d.%m.%Y %H:%M").to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

/// Two decimal places, halves rounded away from zero
pub(crate) fn format_money(amount: Decimal) -> String {
    format!(
        "{:.2}",
        amount.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
    )
}
