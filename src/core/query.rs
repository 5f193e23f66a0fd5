//! Record queries: equality/range filters, ordering and pagination
//!
//! A [`RecordQuery`] is the data-access contract the workflow uses against
//! any [`DataService`](crate::core::service::DataService) backend.
//!
//! # Example
//! ```rust,ignore
//! let query = RecordQuery::new()
//!     .filter("customer_id", Comparison::Eq, customer_id)
//!     .filter("total_amount", Comparison::Gte, Decimal::from(100))
//!     .order_by("order_date", SortDirection::Desc)
//!     .paginate(1, 20);
//! let page = orders.query(&query).await?;
//! ```

use crate::core::entity::Data;
use crate::core::field::FieldValue;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Comparison operator of a single filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl Comparison {
    /// Apply the operator to an ordering of `field value` against `filter value`
    fn accepts(self, ordering: Option<Ordering>) -> bool {
        let Some(ordering) = ordering else {
            return false;
        };
        match self {
            Comparison::Eq => ordering == Ordering::Equal,
            Comparison::Gt => ordering == Ordering::Greater,
            Comparison::Gte => ordering != Ordering::Less,
            Comparison::Lt => ordering == Ordering::Less,
            Comparison::Lte => ordering != Ordering::Greater,
        }
    }
}

/// A single field filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldFilter {
    pub field: String,
    pub op: Comparison,
    pub value: FieldValue,
}

impl FieldFilter {
    /// Check whether a record passes this filter
    ///
    /// Records without the field never match.
    pub fn matches<T: Data>(&self, record: &T) -> bool {
        record
            .field_value(&self.field)
            .is_some_and(|value| self.op.accepts(value.compare(&self.value)))
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Ordering on a single field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortOrder {
    pub field: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortOrder {
    /// Parse `field`, `field:asc` or `field:desc`
    pub fn parse(expression: &str) -> Option<Self> {
        let (field, direction) = match expression.split_once(':') {
            Some((field, "desc")) => (field, SortDirection::Desc),
            Some((field, "asc")) => (field, SortDirection::Asc),
            Some(_) => return None,
            None => (expression, SortDirection::Asc),
        };
        if field.is_empty() {
            return None;
        }
        Some(Self {
            field: field.to_string(),
            direction,
        })
    }
}

/// Query over a record collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordQuery {
    /// All filters must match
    pub filters: Vec<FieldFilter>,

    /// Optional ordering
    pub sort: Option<SortOrder>,

    /// Page number (starts at 1)
    pub page: usize,

    /// Number of items per page
    pub limit: usize,
}

impl Default for RecordQuery {
    fn default() -> Self {
        Self {
            filters: Vec::new(),
            sort: None,
            page: 1,
            limit: 20,
        }
    }
}

impl RecordQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter
    pub fn filter(mut self, field: &str, op: Comparison, value: impl Into<FieldValue>) -> Self {
        self.filters.push(FieldFilter {
            field: field.to_string(),
            op,
            value: value.into(),
        });
        self
    }

    /// Shorthand for an equality filter
    pub fn eq(self, field: &str, value: impl Into<FieldValue>) -> Self {
        self.filter(field, Comparison::Eq, value)
    }

    /// Order results by a field
    pub fn order_by(mut self, field: &str, direction: SortDirection) -> Self {
        self.sort = Some(SortOrder {
            field: field.to_string(),
            direction,
        });
        self
    }

    /// Select a page
    pub fn paginate(mut self, page: usize, limit: usize) -> Self {
        self.page = page;
        self.limit = limit;
        self
    }

    /// Get page number, ensuring minimum of 1
    pub fn page(&self) -> usize {
        self.page.max(1)
    }

    /// Get limit, ensuring it doesn't exceed the maximum
    pub fn limit(&self) -> usize {
        self.limit.clamp(1, 100) // Maximum 100 per page, minimum 1
    }

    /// Whether a record passes every filter
    pub fn matches<T: Data>(&self, record: &T) -> bool {
        self.filters.iter().all(|filter| filter.matches(record))
    }

    /// Filter, order and paginate an in-memory collection
    ///
    /// Backends that cannot push the query down to their engine use this.
    /// Records lacking the sort field, or holding null there, sort last in
    /// either direction.
    pub fn apply<T: Data>(&self, records: Vec<T>) -> Page<T> {
        let mut matching: Vec<T> = records.into_iter().filter(|r| self.matches(r)).collect();

        if let Some(sort) = &self.sort {
            let key = |record: &T| record.field_value(&sort.field).filter(|v| !v.is_null());
            matching.sort_by(|a, b| match (key(a), key(b)) {
                (Some(a), Some(b)) => {
                    let ordering = a
                        .compare(&b)
                        .unwrap_or_else(|| kind_rank(&a).cmp(&kind_rank(&b)));
                    match sort.direction {
                        SortDirection::Asc => ordering,
                        SortDirection::Desc => ordering.reverse(),
                    }
                }
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            });
        }

        let page = self.page();
        let limit = self.limit();
        let total = matching.len();
        let data = matching
            .into_iter()
            .skip((page - 1) * limit)
            .take(limit)
            .collect();

        Page {
            data,
            pagination: PaginationMeta::new(page, limit, total),
        }
    }
}

/// Paginated result
#[derive(Debug, Serialize)]
pub struct Page<T> {
    /// The paginated data
    pub data: Vec<T>,

    /// Pagination metadata
    pub pagination: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationMeta {
    /// Current page number (starts at 1)
    pub page: usize,

    /// Number of items per page
    pub limit: usize,

    /// Total number of items (after filters)
    pub total: usize,

    /// Total number of pages
    pub total_pages: usize,

    /// Whether there is a next page
    pub has_next: bool,

    /// Whether there is a previous page
    pub has_prev: bool,
}

impl PaginationMeta {
    /// Create pagination metadata from calculation
    pub fn new(page: usize, limit: usize, total: usize) -> Self {
        let page = page.max(1);
        let limit = limit.max(1);
        let total_pages = if total == 0 { 0 } else { total.div_ceil(limit) };
        let start = (page - 1) * limit;

        Self {
            page,
            limit,
            total,
            total_pages,
            has_next: start + limit < total,
            has_prev: page > 1,
        }
    }
}

/// Fallback order between values of unrelated kinds
fn kind_rank(value: &FieldValue) -> u8 {
    match value {
        FieldValue::String(_) => 0,
        FieldValue::Integer(_) | FieldValue::Decimal(_) => 1,
        FieldValue::Boolean(_) => 2,
        FieldValue::Uuid(_) => 3,
        FieldValue::Date(_) | FieldValue::DateTime(_) => 4,
        FieldValue::Null => 5,
    }
}
