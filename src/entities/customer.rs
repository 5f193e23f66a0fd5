//! Customer record

use crate::core::error::{FieldValidationError, ValidationError};
use crate::core::field::{FieldFormat, FieldValue};
use crate::document::CustomerIdentity;
use crate::impl_record;

impl_record!(
    Customer,
    "customer",
    "customers",
    {
        email: Option<String>,
        phone: Option<String>,
        address: Option<String>,
    }
);

/// Contact details as typed into the order form
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CustomerDetails {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

impl CustomerDetails {
    /// Trim every field and drop blank optional ones
    pub fn normalized(&self) -> Self {
        fn clean(value: &Option<String>) -> Option<String> {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        }

        Self {
            name: self.name.trim().to_string(),
            email: clean(&self.email),
            phone: clean(&self.phone),
            address: clean(&self.address),
        }
    }

    /// Check the name is present and contact fields are well formed
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push(FieldValidationError {
                field: "name".to_string(),
                message: "Customer name is required".to_string(),
            });
        }
        if let Some(email) = &self.email
            && !FieldFormat::Email.validate(&FieldValue::String(email.clone()))
        {
            errors.push(FieldValidationError {
                field: "email".to_string(),
                message: format!("'{}' is not a valid email address", email),
            });
        }
        if let Some(phone) = &self.phone
            && !FieldFormat::Phone.validate(&FieldValue::String(phone.clone()))
        {
            errors.push(FieldValidationError {
                field: "phone".to_string(),
                message: format!("'{}' is not a valid phone number", phone),
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::FieldErrors(errors))
        }
    }
}

impl Customer {
    /// Build a new active customer from form details
    pub fn from_details(details: &CustomerDetails) -> Self {
        Customer::new(
            details.name.clone(),
            "active".to_string(),
            details.email.clone(),
            details.phone.clone(),
            details.address.clone(),
        )
    }

    /// Overwrite contact details, keeping identity and timestamps
    pub fn apply_details(&mut self, details: &CustomerDetails) {
        self.name = details.name.clone();
        self.email = details.email.clone();
        self.phone = details.phone.clone();
        self.address = details.address.clone();
        self.touch();
    }

    /// Identity block printed on order documents
    pub fn identity(&self) -> CustomerIdentity {
        CustomerIdentity {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            address: self.address.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entity::{Data, Entity};

    fn details() -> CustomerDetails {
        CustomerDetails {
            name: "  Maison Dupont ".to_string(),
            email: Some("contact@dupont.fr".to_string()),
            phone: Some("   ".to_string()),
            address: None,
        }
    }

    #[test]
    fn test_normalized_drops_blank_fields() {
        let normalized = details().normalized();
        assert_eq!(normalized.name, "Maison Dupont");
        assert_eq!(normalized.phone, None);
        assert!(normalized.validate().is_ok());
    }

    #[test]
    fn test_validate_reports_every_field() {
        let bad = CustomerDetails {
            name: " ".to_string(),
            email: Some("nope".to_string()),
            phone: Some("12".to_string()),
            address: None,
        };
        let Err(ValidationError::FieldErrors(errors)) = bad.validate() else {
            panic!("expected field errors");
        };
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "email", "phone"]);
    }

    #[test]
    fn test_customer_record_fields() {
        let customer = Customer::from_details(&details().normalized());
        assert_eq!(Customer::resource_name(), "customers");
        assert_eq!(customer.entity_type(), "customer");
        assert_eq!(customer.status(), "active");
        assert!(!customer.is_deleted());
        assert_eq!(
            customer.field_value("email"),
            Some(FieldValue::String("contact@dupont.fr".to_string()))
        );
        assert_eq!(customer.field_value("phone"), Some(FieldValue::Null));
        assert_eq!(customer.field_value("unknown"), None);
    }

    #[test]
    fn test_identity_passes_fields_through() {
        let customer = Customer::from_details(&details().normalized());
        let identity = customer.identity();
        assert_eq!(identity.name, "Maison Dupont");
        assert_eq!(identity.email.as_deref(), Some("contact@dupont.fr"));
        assert_eq!(identity.address, None);
    }
}
