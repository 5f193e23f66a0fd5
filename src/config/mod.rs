//! Configuration loading and management

use crate::core::error::ConfigError;
use crate::document::{CurrencyFormat, PageSize};
use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Page setup and fixed texts of order documents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    /// Centered heading of the first page
    pub title: String,

    /// Line printed at the bottom of the last page
    pub closing_caption: String,

    /// PDF creator/producer metadata
    pub creator: String,

    /// Shown instead of missing customer details
    pub placeholder: String,

    pub page_size: PageSize,

    /// chrono format string for the issue date
    pub date_format: String,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            title: "ORDER FORM".to_string(),
            closing_caption: "ENJOY OUR PRODUCTS...".to_string(),
            creator: "Order Desk".to_string(),
            placeholder: "N/A".to_string(),
            page_size: PageSize::A4,
            date_format: "%d/%m/%Y".to_string(),
        }
    }
}

impl DocumentConfig {
    /// Whether chrono understands every specifier of `date_format`
    pub fn date_format_is_valid(&self) -> bool {
        !StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error))
    }
}

/// Where rendered documents go in object storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Key prefix, e.g. "orders/"
    pub prefix: String,
    pub content_type: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            prefix: "orders/".to_string(),
            content_type: "application/pdf".to_string(),
        }
    }
}

impl StorageConfig {
    /// Object key of the document for `order_number`
    pub fn document_key(&self, order_number: &str) -> String {
        format!("{}{}.pdf", self.prefix, order_number)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderNumberConfig {
    /// Draws before giving up on finding an unused order number
    pub max_attempts: u32,
}

impl Default for OrderNumberConfig {
    fn default() -> Self {
        Self { max_attempts: 5 }
    }
}

/// Complete configuration of the order desk
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeskConfig {
    pub currency: CurrencyFormat,
    pub document: DocumentConfig,
    pub storage: StorageConfig,
    pub order_numbers: OrderNumberConfig,
}

impl DeskConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        serde_yaml::from_str::<Self>(&content)
            .map_err(|e| ConfigError::ParseError {
                file: Some(path.display().to_string()),
                message: e.to_string(),
            })
            .and_then(Self::validated)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validated()
    }

    fn validated(self) -> Result<Self, ConfigError> {
        self.validate()?;
        Ok(self)
    }

    /// Check values serde cannot rule out on its own
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field: &str, value: String, message: &str| ConfigError::InvalidValue {
            field: field.to_string(),
            value,
            message: message.to_string(),
        };

        if self.currency.code.trim().is_empty() {
            return Err(invalid("currency.code", self.currency.code.clone(), "must not be empty"));
        }
        if self.currency.symbol.trim().is_empty() {
            return Err(invalid(
                "currency.symbol",
                self.currency.symbol.clone(),
                "must not be empty",
            ));
        }
        if self.currency.thousands_separator == Some(self.currency.decimal_separator) {
            return Err(invalid(
                "currency.thousands_separator",
                self.currency.decimal_separator.to_string(),
                "must differ from the decimal separator",
            ));
        }
        if self.order_numbers.max_attempts == 0 {
            return Err(invalid(
                "order_numbers.max_attempts",
                "0".to_string(),
                "must be at least 1",
            ));
        }
        if !self.document.date_format_is_valid() {
            return Err(invalid(
                "document.date_format",
                self.document.date_format.clone(),
                "is not a valid date format",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::SymbolPosition;

    #[test]
    fn test_default_config() {
        let config = DeskConfig::default();

        assert_eq!(config.currency.symbol, "$");
        assert_eq!(config.document.title, "ORDER FORM");
        assert_eq!(config.document.page_size, PageSize::A4);
        assert_eq!(config.order_numbers.max_attempts, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_yaml_serialization() {
        let config = DeskConfig::default();
        let yaml = serde_yaml::to_string(&config).unwrap();

        // Should be able to parse it back
        let parsed = DeskConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
currency:
  code: EUR
  symbol: "€"
  symbol_position: suffix
  decimal_separator: ","
  thousands_separator: " "
document:
  page_size: letter
"#;
        let config = DeskConfig::from_yaml_str(yaml).unwrap();

        assert_eq!(config.currency.symbol_position, SymbolPosition::Suffix);
        assert_eq!(config.document.page_size, PageSize::Letter);
        assert_eq!(config.document.placeholder, "N/A");
        assert_eq!(config.storage.prefix, "orders/");
    }

    #[test]
    fn test_document_key() {
        let storage = StorageConfig::default();
        assert_eq!(storage.document_key("ORD-2403-0042"), "orders/ORD-2403-0042.pdf");
    }

    #[test]
    fn test_validate_rejects_same_separators() {
        let yaml = "currency:\n  decimal_separator: \",\"\n";
        let err = DeskConfig::from_yaml_str(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "currency.thousands_separator"));
    }

    #[test]
    fn test_validate_rejects_zero_attempts() {
        let err = DeskConfig::from_yaml_str("order_numbers:\n  max_attempts: 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[rstest::rstest]
    #[case("%Q")]
    #[case("%d/%m/%")]
    fn test_validate_rejects_bad_date_format(#[case] format: &str) {
        let mut config = DeskConfig::default();
        config.document.date_format = format.to_string();

        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "document.date_format"));
    }

    #[test]
    fn test_malformed_yaml() {
        let err = DeskConfig::from_yaml_str("currency: [").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }
}
