//! Typed error handling for order-desk
//!
//! Callers match on specific failures instead of inspecting strings.
//!
//! # Error Categories
//!
//! - [`PricingError`]: bad order line input rejected by the pricing engine
//! - [`RenderError`]: order document construction failures
//! - [`EntityError`]: record lookups and writes through the data-access collaborator
//! - [`StorageError`]: object storage failures
//! - [`ConfigError`]: configuration parsing and validation
//! - [`ValidationError`]: field-level input validation
//! - [`WorkflowError`]: order workflow failures that are not one of the above
//!
//! # Example
//!
//! ```rust,ignore
//! match pricing::normalize(&lines) {
//!     Ok(normalized) => render(normalized),
//!     Err(PricingError::InvalidLine { line, field, .. }) => {
//!         println!("line {} has a bad {}", line, field);
//!     }
//!     Err(e) => eprintln!("Other error: {}", e),
//! }
//! ```

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// The main error type for order-desk
#[derive(Debug, Error)]
pub enum DeskError {
    /// Order line pricing errors
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Document rendering errors
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Record errors
    #[error(transparent)]
    Entity(#[from] EntityError),

    /// Object storage errors
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Workflow errors
    #[error(transparent)]
    Workflow(#[from] WorkflowError),
}

/// Error payload handed to the UI layer
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl DeskError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            DeskError::Pricing(e) => e.error_code(),
            DeskError::Render(e) => e.error_code(),
            DeskError::Entity(e) => e.error_code(),
            DeskError::Storage(_) => "STORAGE_ERROR",
            DeskError::Config(_) => "CONFIG_ERROR",
            DeskError::Validation(_) => "VALIDATION_ERROR",
            DeskError::Workflow(e) => e.error_code(),
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            DeskError::Pricing(PricingError::InvalidLine { line, field, .. })
            | DeskError::Pricing(PricingError::NegativeValue { line, field, .. }) => {
                Some(serde_json::json!({ "line": line, "field": field }))
            }
            DeskError::Render(RenderError::TotalMismatch { expected, actual }) => {
                Some(serde_json::json!({
                    "expected": expected.to_string(),
                    "actual": actual.to_string()
                }))
            }
            DeskError::Entity(EntityError::NotFound { entity_type, id }) => {
                Some(serde_json::json!({
                    "entity_type": entity_type,
                    "id": id.to_string()
                }))
            }
            DeskError::Validation(ValidationError::FieldErrors(errors)) => {
                Some(serde_json::json!({ "fields": errors }))
            }
            _ => None,
        }
    }
}

// =============================================================================
// Pricing Errors
// =============================================================================

/// Order line input rejected by the pricing engine
///
/// `line` is the zero-based position of the offending line in the input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PricingError {
    /// A per-line numeric input is unusable (zero or negative divisor)
    #[error("Invalid order line {line}: {field} {message}")]
    InvalidLine {
        line: usize,
        field: &'static str,
        message: String,
    },

    /// A sign or range violation on price, quantity or discount
    #[error("Order line {line}: {field} is out of range (value: {value})")]
    NegativeValue {
        line: usize,
        field: &'static str,
        value: String,
    },
}

impl PricingError {
    pub fn error_code(&self) -> &'static str {
        match self {
            PricingError::InvalidLine { .. } => "INVALID_LINE",
            PricingError::NegativeValue { .. } => "NEGATIVE_VALUE",
        }
    }

    /// Index of the offending line
    pub fn line(&self) -> usize {
        match self {
            PricingError::InvalidLine { line, .. } | PricingError::NegativeValue { line, .. } => {
                *line
            }
        }
    }
}

// =============================================================================
// Render Errors
// =============================================================================

/// Errors raised while building an order document
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    /// Zero-line orders are not rendered
    #[error("Cannot render an order document without lines")]
    EmptyOrder,

    /// The supplied total does not match the sum of the line net amounts
    #[error("Order total {actual} does not match the line total {expected}")]
    TotalMismatch { expected: Decimal, actual: Decimal },

    /// Customer identity is unusable
    #[error("Invalid customer identity: {message}")]
    InvalidCustomer { message: String },

    /// Document settings cannot be applied
    #[error("Invalid document settings: {message}")]
    InvalidSettings { message: String },

    /// The PDF backend failed
    #[error("Failed to build PDF: {message}")]
    Pdf { message: String },
}

impl RenderError {
    pub fn error_code(&self) -> &'static str {
        match self {
            RenderError::EmptyOrder => "RENDER_EMPTY_ORDER",
            RenderError::TotalMismatch { .. } => "RENDER_TOTAL_MISMATCH",
            RenderError::InvalidCustomer { .. } => "RENDER_INVALID_CUSTOMER",
            RenderError::InvalidSettings { .. } => "RENDER_INVALID_SETTINGS",
            RenderError::Pdf { .. } => "RENDER_PDF_FAILED",
        }
    }
}

// =============================================================================
// Entity Errors
// =============================================================================

/// Errors related to record operations
#[derive(Debug, Error)]
pub enum EntityError {
    /// Record was not found
    #[error("{entity_type} with id '{id}' not found")]
    NotFound { entity_type: String, id: Uuid },

    /// Record operation failed
    #[error("Failed to {operation} {entity_type}: {message}")]
    OperationFailed {
        entity_type: String,
        operation: String,
        message: String,
    },
}

impl EntityError {
    pub fn error_code(&self) -> &'static str {
        match self {
            EntityError::NotFound { .. } => "ENTITY_NOT_FOUND",
            EntityError::OperationFailed { .. } => "ENTITY_OPERATION_FAILED",
        }
    }

    /// Wrap a collaborator failure for the given record type and operation
    pub fn operation(entity_type: &str, operation: &str, err: anyhow::Error) -> Self {
        EntityError::OperationFailed {
            entity_type: entity_type.to_string(),
            operation: operation.to_string(),
            message: err.to_string(),
        }
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors related to object storage
#[derive(Debug, Error)]
pub enum StorageError {
    /// Upload failed
    #[error("Failed to upload '{key}': {message}")]
    UploadFailed { key: String, message: String },

    /// No object stored under this key
    #[error("Object '{key}' not found")]
    NotFound { key: String },

    /// Any other backend failure
    #[error("Object storage error: {message}")]
    Backend { message: String },
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse configuration
    #[error("Failed to parse config{}: {message}", .file.as_ref().map(|f| format!(" file '{}'", f)).unwrap_or_default())]
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// Invalid value in configuration
    #[error("Invalid value '{value}' for field '{field}': {message}")]
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },

    /// IO error while reading configuration
    #[error("IO error: {message}")]
    IoError { message: String },
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to input validation
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Single field validation error
    #[error("Validation error for field '{field}': {message}")]
    FieldError { field: String, message: String },

    /// Multiple field validation errors
    #[error("Validation errors: {}", join_field_errors(.0))]
    FieldErrors(Vec<FieldValidationError>),
}

/// A single field validation error
#[derive(Debug, Clone, Serialize)]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
}

fn join_field_errors(errors: &[FieldValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join(", ")
}

// =============================================================================
// Workflow Errors
// =============================================================================

/// Order workflow failures
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// The request carries no product lines
    #[error("An order needs at least one product line")]
    EmptyOrder,

    /// Could not find a free order number
    #[error("No unused order number found after {attempts} attempts")]
    OrderNumberExhausted { attempts: u32 },

    /// The order can no longer change
    #[error("Order '{order_number}' is {status} and cannot be revised")]
    OrderLocked {
        order_number: String,
        status: String,
    },
}

impl WorkflowError {
    pub fn error_code(&self) -> &'static str {
        match self {
            WorkflowError::EmptyOrder => "EMPTY_ORDER",
            WorkflowError::OrderNumberExhausted { .. } => "ORDER_NUMBER_EXHAUSTED",
            WorkflowError::OrderLocked { .. } => "ORDER_LOCKED",
        }
    }
}

// =============================================================================
// Conversions from external errors
// =============================================================================

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError {
            file: None,
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::IoError {
            message: err.to_string(),
        }
    }
}

/// Result alias for order-desk operations
pub type DeskResult<T> = Result<T, DeskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pricing_error_codes() {
        let err = PricingError::InvalidLine {
            line: 2,
            field: "units_per_container",
            message: "must be greater than zero".to_string(),
        };
        assert_eq!(err.error_code(), "INVALID_LINE");
        assert_eq!(err.line(), 2);
        assert_eq!(
            err.to_string(),
            "Invalid order line 2: units_per_container must be greater than zero"
        );
    }

    #[test]
    fn test_response_details_for_pricing() {
        let err: DeskError = PricingError::NegativeValue {
            line: 0,
            field: "unit_price",
            value: "-1".to_string(),
        }
        .into();

        let response = err.to_response();
        assert_eq!(response.code, "NEGATIVE_VALUE");
        let details = response.details.unwrap();
        assert_eq!(details["line"], 0);
        assert_eq!(details["field"], "unit_price");
    }

    #[test]
    fn test_render_error_passes_through() {
        let err = DeskError::from(RenderError::EmptyOrder);
        assert_eq!(err.error_code(), "RENDER_EMPTY_ORDER");
        assert!(err.to_response().details.is_none());
    }

    #[test]
    fn test_config_parse_error_message() {
        let err = ConfigError::ParseError {
            file: Some("desk.yaml".to_string()),
            message: "bad indent".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to parse config file 'desk.yaml': bad indent"
        );

        let err = ConfigError::ParseError {
            file: None,
            message: "bad indent".to_string(),
        };
        assert_eq!(err.to_string(), "Failed to parse config: bad indent");
    }

    #[test]
    fn test_field_errors_join() {
        let err = ValidationError::FieldErrors(vec![
            FieldValidationError {
                field: "email".to_string(),
                message: "invalid format".to_string(),
            },
            FieldValidationError {
                field: "name".to_string(),
                message: "required".to_string(),
            },
        ]);
        assert_eq!(
            err.to_string(),
            "Validation errors: email: invalid format, name: required"
        );
    }
}
