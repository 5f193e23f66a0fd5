//! Macro for reducing boilerplate when defining records
//!
//! Generates the struct, the `Entity`/`Data` implementations and the
//! lifecycle helpers shared by every persisted record.

/// Define a record type with the base entity fields plus its own fields
///
/// Every specific field becomes queryable through `Data::field_value`, so
/// field types must convert into [`FieldValue`](crate::core::field::FieldValue).
///
/// # Example
///
/// ```rust,ignore
/// impl_record!(
///     Customer,
///     "customer",
///     "customers",
///     {
///         email: Option<String>,
///         phone: Option<String>,
///     }
/// );
///
/// let customer = Customer::new(
///     "Jane Doe".to_string(),
///     "active".to_string(),
///     Some("jane@example.com".to_string()),
///     None,
/// );
/// ```
#[macro_export]
macro_rules! impl_record {
    (
        $type:ident,
        $type_name:expr,
        $collection:expr,
        {
            $( $(#[$field_meta:meta])* $specific_field:ident : $specific_type:ty ),* $(,)?
        }
    ) => {
        #[derive(Debug, Clone, PartialEq, ::serde::Serialize, ::serde::Deserialize)]
        pub struct $type {
            /// Unique identifier for this record
            pub id: ::uuid::Uuid,

            /// Type of the record
            #[serde(rename = "type")]
            pub entity_type: String,

            /// When this record was created
            pub created_at: ::chrono::DateTime<::chrono::Utc>,

            /// When this record was last updated
            pub updated_at: ::chrono::DateTime<::chrono::Utc>,

            /// When this record was soft-deleted (if applicable)
            pub deleted_at: Option<::chrono::DateTime<::chrono::Utc>>,

            /// Current status of the record
            pub status: String,

            /// Display name of this record
            pub name: String,
            $( $(#[$field_meta])* pub $specific_field : $specific_type ),*
        }

        impl $crate::core::entity::Entity for $type {
            fn resource_name() -> &'static str {
                $collection
            }

            fn resource_name_singular() -> &'static str {
                $type_name
            }

            fn id(&self) -> ::uuid::Uuid {
                self.id
            }

            fn entity_type(&self) -> &str {
                &self.entity_type
            }

            fn created_at(&self) -> ::chrono::DateTime<::chrono::Utc> {
                self.created_at
            }

            fn updated_at(&self) -> ::chrono::DateTime<::chrono::Utc> {
                self.updated_at
            }

            fn deleted_at(&self) -> Option<::chrono::DateTime<::chrono::Utc>> {
                self.deleted_at
            }

            fn status(&self) -> &str {
                &self.status
            }
        }

        impl $crate::core::entity::Data for $type {
            fn name(&self) -> &str {
                &self.name
            }

            fn field_value(&self, field: &str) -> Option<$crate::core::field::FieldValue> {
                use $crate::core::field::FieldValue;

                match field {
                    "id" => return Some(FieldValue::Uuid(self.id)),
                    "name" => return Some(FieldValue::String(self.name.clone())),
                    "status" => return Some(FieldValue::String(self.status.clone())),
                    "created_at" => return Some(FieldValue::DateTime(self.created_at)),
                    "updated_at" => return Some(FieldValue::DateTime(self.updated_at)),
                    _ => {}
                }
                $(
                    if field == stringify!($specific_field) {
                        return Some(FieldValue::from(self.$specific_field.clone()));
                    }
                )*
                None
            }
        }

        impl $type {
            /// Create a new record
            #[allow(clippy::too_many_arguments)]
            pub fn new(
                name: String,
                status: String,
                $( $specific_field: $specific_type ),*
            ) -> Self {
                let now = ::chrono::Utc::now();
                Self {
                    id: ::uuid::Uuid::new_v4(),
                    entity_type: $type_name.to_string(),
                    created_at: now,
                    updated_at: now,
                    deleted_at: None,
                    status,
                    name,
                    $( $specific_field ),*
                }
            }

            /// Soft delete this record (sets deleted_at timestamp)
            pub fn soft_delete(&mut self) {
                self.deleted_at = Some(::chrono::Utc::now());
                self.touch();
            }

            /// Restore a soft-deleted record (clears deleted_at timestamp)
            pub fn restore(&mut self) {
                self.deleted_at = None;
                self.touch();
            }

            /// Update the updated_at timestamp to now
            pub fn touch(&mut self) {
                self.updated_at = ::chrono::Utc::now();
            }

            /// Change the record status
            pub fn set_status(&mut self, status: String) {
                self.status = status;
                self.touch();
            }
        }
    };
}
