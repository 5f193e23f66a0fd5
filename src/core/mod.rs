//! Core traits and types shared by the pricing engine, the document
//! generator and the order workflow

pub mod entity;
pub mod error;
pub mod events;
pub mod field;
pub mod query;
pub mod service;

pub use entity::{Data, Entity};
pub use error::{
    ConfigError, DeskError, DeskResult, EntityError, ErrorResponse, PricingError, RenderError,
    StorageError, ValidationError, WorkflowError,
};
pub use events::{EventBus, EventEnvelope, OrderEvent};
pub use field::{FieldFormat, FieldValue};
pub use query::{Comparison, Page, PaginationMeta, RecordQuery, SortDirection, SortOrder};
pub use service::{DataService, ObjectStorage};
