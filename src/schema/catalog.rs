//! Built-in record types
//!
//! - `User` -> collection "user"
//! - `Product` -> collection "product"
//! - `PartnerLead` -> collection "partnerlead"
//!
//! Every collection name here is declared explicitly rather than inferred
//! from the type name.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::errors::SchemaResult;
use super::registry::SchemaRegistry;
use super::types::{FieldDef, RecordTypeDef, ValueType};

/// A Rust struct mirroring a registered record type.
pub trait RecordType: DeserializeOwned + Serialize {
    /// Registered type name
    const TYPE_NAME: &'static str;

    /// Data definition interpreted by the validator
    fn definition() -> RecordTypeDef;
}

/// Validates `raw` against `T`'s registered definition and deserializes it.
pub fn parse<T: RecordType>(registry: &SchemaRegistry, raw: &Value) -> SchemaResult<T> {
    registry.validate(T::TYPE_NAME, raw)?.into_typed()
}

/// All built-in definitions in registration order.
pub fn builtin_definitions() -> Vec<RecordTypeDef> {
    vec![User::definition(), Product::definition(), PartnerLead::definition()]
}

/// Generic user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub email: String,
    pub address: String,
    pub age: Option<i64>,
    pub is_active: bool,
}

impl RecordType for User {
    const TYPE_NAME: &'static str = "User";

    fn definition() -> RecordTypeDef {
        RecordTypeDef::new(
            Self::TYPE_NAME,
            vec![
                FieldDef::required("name", ValueType::String).describe("Full name"),
                FieldDef::required("email", ValueType::Email).describe("Email address"),
                FieldDef::required("address", ValueType::String).describe("Address"),
                FieldDef::nullable("age", ValueType::Int)
                    .min(0.0)
                    .max(120.0)
                    .describe("Age in years"),
                FieldDef::with_default("is_active", ValueType::Bool, json!(true))
                    .describe("Whether user is active"),
            ],
        )
        .with_collection("user")
        .with_description("Users collection schema")
    }
}

/// Generic product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    pub category: String,
    pub in_stock: bool,
}

impl RecordType for Product {
    const TYPE_NAME: &'static str = "Product";

    fn definition() -> RecordTypeDef {
        RecordTypeDef::new(
            Self::TYPE_NAME,
            vec![
                FieldDef::required("title", ValueType::String).describe("Product title"),
                FieldDef::nullable("description", ValueType::String).describe("Product description"),
                FieldDef::required("price", ValueType::Float)
                    .min(0.0)
                    .describe("Price in dollars"),
                FieldDef::required("category", ValueType::String).describe("Product category"),
                FieldDef::with_default("in_stock", ValueType::Bool, json!(true))
                    .describe("Whether product is in stock"),
            ],
        )
        .with_collection("product")
        .with_description("Products collection schema")
    }
}

/// B2B lead from a study centre interested in delivering programmes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartnerLead {
    pub centre_name: String,
    pub contact_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub website: Option<String>,
    pub interest_level: Option<String>,
    pub notes: Option<String>,
    pub marketing_consent: bool,
    pub source: Option<String>,
    pub utm_source: Option<String>,
    pub utm_medium: Option<String>,
    pub utm_campaign: Option<String>,
}

impl RecordType for PartnerLead {
    const TYPE_NAME: &'static str = "PartnerLead";

    fn definition() -> RecordTypeDef {
        let text = |name: &str, description: &str| {
            FieldDef::nullable(name, ValueType::String).describe(description)
        };

        RecordTypeDef::new(
            Self::TYPE_NAME,
            vec![
                FieldDef::required("centre_name", ValueType::String)
                    .describe("Institution or study centre name"),
                FieldDef::required("contact_name", ValueType::String)
                    .describe("Primary contact person"),
                FieldDef::required("email", ValueType::Email).describe("Contact email"),
                text("phone", "Contact phone number"),
                text("country", "Country of the institution"),
                text("city", "City of the institution"),
                text("website", "Institution website"),
                text(
                    "interest_level",
                    "Stage of interest e.g., exploring, ready_to_apply, meeting_requested",
                ),
                text("notes", "Additional context or requirements"),
                FieldDef::with_default("marketing_consent", ValueType::Bool, json!(false))
                    .describe("Consent to receive marketing communications"),
                text("source", "Lead source e.g., website, referral, event"),
                FieldDef::nullable("utm_source", ValueType::String),
                FieldDef::nullable("utm_medium", ValueType::String),
                FieldDef::nullable("utm_campaign", ValueType::String),
            ],
        )
        .with_collection("partnerlead")
        .with_description(
            "Partner leads from potential study centres interested in delivering programmes",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::errors::{FieldErrorKind, SchemaErrorCode};

    fn registry() -> SchemaRegistry {
        SchemaRegistry::with_builtin().unwrap()
    }

    #[test]
    fn test_builtin_definitions_are_well_formed() {
        for def in builtin_definitions() {
            assert!(def.validate_structure().is_ok(), "{}", def.type_name);
        }
    }

    #[test]
    fn test_collections_are_explicit() {
        for def in builtin_definitions() {
            assert!(def.collection.is_some(), "{}", def.type_name);
        }
        let registry = registry();
        assert_eq!(registry.collection_name_for("User").unwrap(), "user");
        assert_eq!(registry.collection_name_for("Product").unwrap(), "product");
        assert_eq!(registry.collection_name_for("PartnerLead").unwrap(), "partnerlead");
    }

    #[test]
    fn test_parse_user_fills_defaults() {
        let user: User = parse(
            &registry(),
            &json!({"name": "Ada", "email": "ada@example.com", "address": "1 Loop Rd"}),
        )
        .unwrap();
        assert_eq!(
            user,
            User {
                name: "Ada".into(),
                email: "ada@example.com".into(),
                address: "1 Loop Rd".into(),
                age: None,
                is_active: true,
            }
        );
    }

    #[test]
    fn test_parse_product() {
        let product: Product = parse(
            &registry(),
            &json!({"title": "Pen", "price": "2.50", "category": "office", "in_stock": 0}),
        )
        .unwrap();
        assert_eq!(product.price, 2.5);
        assert!(!product.in_stock);
        assert_eq!(product.description, None);
    }

    #[test]
    fn test_product_negative_price() {
        let err = parse::<Product>(
            &registry(),
            &json!({"title": "Pen", "price": -0.01, "category": "office"}),
        )
        .unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::ValidationFailed);
        assert!(err.report().unwrap().has("price", FieldErrorKind::ConstraintViolation));
    }

    #[test]
    fn test_parse_partner_lead() {
        let lead: PartnerLead = parse(
            &registry(),
            &json!({
                "centre_name": "Northgate College",
                "contact_name": "Sam Okafor",
                "email": "sam@northgate.example.org",
                "country": "Ghana",
                "utm_campaign": "spring"
            }),
        )
        .unwrap();
        assert_eq!(lead.country.as_deref(), Some("Ghana"));
        assert_eq!(lead.utm_campaign.as_deref(), Some("spring"));
        assert!(!lead.marketing_consent);
        assert_eq!(lead.phone, None);
    }

    #[test]
    fn test_partner_lead_reports_every_missing_field() {
        let err = parse::<PartnerLead>(&registry(), &json!({"email": "bad"})).unwrap_err();
        let report = err.report().unwrap();
        assert_eq!(report.len(), 3);
        assert!(report.has("centre_name", FieldErrorKind::MissingField));
        assert!(report.has("contact_name", FieldErrorKind::MissingField));
        assert!(report.has("email", FieldErrorKind::ConstraintViolation));
    }

    #[test]
    fn test_typed_struct_round_trips_through_validation() {
        let registry = registry();
        let user = User {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            address: "1 Loop Rd".into(),
            age: Some(36),
            is_active: false,
        };
        let raw = serde_json::to_value(&user).unwrap();
        let back: User = parse(&registry, &raw).unwrap();
        assert_eq!(back, user);
    }
}
