//! Entity traits shared by every record the desk persists

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Identity, timestamps and status carried by every stored record
///
/// Records are soft-deleted: `deleted_at` is set and the record stays
/// retrievable by id, but collections leave it out of listings.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Collection the record lives in, e.g. "order_items"
    fn resource_name() -> &'static str;

    /// Record name used in logs and errors, e.g. "order_item"
    fn resource_name_singular() -> &'static str;

    fn id(&self) -> Uuid;

    fn entity_type(&self) -> &str;

    fn created_at(&self) -> DateTime<Utc>;

    /// Bumped by every write through the record's lifecycle helpers
    fn updated_at(&self) -> DateTime<Utc>;

    fn deleted_at(&self) -> Option<DateTime<Utc>>;

    /// Lifecycle status; orders keep their `OrderStatus` here
    fn status(&self) -> &str;

    fn is_deleted(&self) -> bool {
        self.deleted_at().is_some()
    }
}

/// A named record whose fields can be searched, filtered and ordered
pub trait Data: Entity {
    /// Customer or product name, or the order number
    fn name(&self) -> &str;

    /// Value of `field` for [`RecordQuery`](crate::core::query::RecordQuery)
    /// filters and ordering; `None` when the record has no such field
    fn field_value(&self, field: &str) -> Option<crate::core::field::FieldValue>;
}
