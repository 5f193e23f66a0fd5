//! Order document generation
//!
//! [`OrderDocumentGenerator::render`] turns a customer, normalized lines, an
//! order number and the order total into a paginated PDF "order form". The
//! visible content is described by a [`DocumentLayout`] kept alongside the
//! bytes, so callers and tests can check what a reader would see.

pub mod format;
pub mod layout;
pub mod pdf;

pub use format::{CurrencyFormat, SymbolPosition, format_discount};
pub use layout::{DocumentLayout, PageLayout, PageSize, Rule, TextRun};

use crate::config::DocumentConfig;
use crate::core::error::RenderError;
use crate::pricing::{self, NormalizedOrderLine, round_money};
use chrono::{Local, NaiveDate};
use layout::LayoutInput;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Who the order is for, as printed in the document header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerIdentity {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl CustomerIdentity {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: None,
            phone: None,
            address: None,
        }
    }
}

/// A rendered order document
#[derive(Debug, Clone)]
pub struct OrderDocument {
    pub order_number: String,
    pub bytes: Vec<u8>,
    pub layout: DocumentLayout,
}

impl OrderDocument {
    /// File name used when the document is stored or downloaded
    pub fn file_name(&self) -> String {
        format!("{}.pdf", self.order_number)
    }

    pub fn content_type(&self) -> &'static str {
        "application/pdf"
    }

    pub fn page_count(&self) -> usize {
        self.layout.page_count()
    }
}

/// Renders order documents with a fixed currency format and page setup
#[derive(Debug, Clone, Default)]
pub struct OrderDocumentGenerator {
    currency: CurrencyFormat,
    settings: DocumentConfig,
}

impl OrderDocumentGenerator {
    pub fn new(currency: CurrencyFormat, settings: DocumentConfig) -> Self {
        Self { currency, settings }
    }

    pub fn currency(&self) -> &CurrencyFormat {
        &self.currency
    }

    /// Render a document dated today (local time)
    pub fn render(
        &self,
        customer: &CustomerIdentity,
        lines: &[NormalizedOrderLine],
        order_number: &str,
        total: Decimal,
    ) -> Result<OrderDocument, RenderError> {
        self.render_on(Local::now().date_naive(), customer, lines, order_number, total)
    }

    /// Render a document with an explicit issue date
    pub fn render_on(
        &self,
        issued_on: NaiveDate,
        customer: &CustomerIdentity,
        lines: &[NormalizedOrderLine],
        order_number: &str,
        total: Decimal,
    ) -> Result<OrderDocument, RenderError> {
        let layout = self.layout(issued_on, customer, lines, order_number, total)?;
        let bytes = pdf::write_pdf(&layout, &self.document_title(order_number), &self.settings.creator)?;

        tracing::debug!(
            order_number,
            lines = lines.len(),
            pages = layout.page_count(),
            bytes = bytes.len(),
            "rendered order document"
        );

        Ok(OrderDocument {
            order_number: order_number.to_string(),
            bytes,
            layout,
        })
    }

    /// Validate the inputs and lay out the pages without producing PDF bytes
    ///
    /// # Errors
    ///
    /// - [`RenderError::EmptyOrder`] when `lines` is empty
    /// - [`RenderError::InvalidCustomer`] when the customer name is blank
    /// - [`RenderError::TotalMismatch`] when `total` differs from the rounded
    ///   sum of the lines' net amounts
    pub fn layout(
        &self,
        issued_on: NaiveDate,
        customer: &CustomerIdentity,
        lines: &[NormalizedOrderLine],
        order_number: &str,
        total: Decimal,
    ) -> Result<DocumentLayout, RenderError> {
        if lines.is_empty() {
            return Err(RenderError::EmptyOrder);
        }
        if !self.settings.date_format_is_valid() {
            return Err(RenderError::InvalidSettings {
                message: format!("unsupported date format '{}'", self.settings.date_format),
            });
        }
        if customer.name.trim().is_empty() {
            return Err(RenderError::InvalidCustomer {
                message: "customer name must not be empty".to_string(),
            });
        }
        let expected = pricing::total(lines);
        let actual = round_money(total);
        if expected != actual {
            return Err(RenderError::TotalMismatch { expected, actual });
        }

        let input = LayoutInput {
            customer,
            lines,
            order_number,
            issued_on,
            total: expected,
        };
        Ok(layout::layout_order(&self.currency, &self.settings, &input))
    }

    fn document_title(&self, order_number: &str) -> String {
        format!("{} {}", self.settings.title, order_number)
    }
}
