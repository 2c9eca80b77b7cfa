use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use uuid::Uuid;

/// A stored catalog record. Wire format is camelCase; column names are
/// snake_case and line up with the struct fields for `FromRow`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub quantity: i64,
    pub unit_price: f64,
    pub image_url: Option<String>,
    pub sku: Option<String>,
    pub expiry: Option<DateTime<Utc>>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Caller-supplied product fields for create and update. Every field is
/// optional at the wire level; `into_draft` decides what is required and what
/// defaults apply.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub quantity: Option<i64>,
    pub unit_price: Option<f64>,
    pub image_url: Option<String>,
    pub sku: Option<String>,
    pub expiry: Option<DateTime<Utc>>,
    pub active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Field {0} must not be negative")]
    NegativeValue(&'static str),
}

/// A fully validated and defaulted set of product fields, ready to be written.
/// Used verbatim by both create and the replace-style update: an update built
/// from a payload that omits an optional field resets that field to its
/// creation default.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub category: String,
    pub quantity: i64,
    pub unit_price: f64,
    pub image_url: String,
    pub sku: Option<String>,
    pub expiry: Option<DateTime<Utc>>,
    pub active: bool,
}

impl ProductInput {
    pub fn into_draft(self) -> Result<ProductDraft, InputError> {
        let name = self
            .name
            .filter(|n| !n.trim().is_empty())
            .ok_or(InputError::MissingField("name"))?;
        let unit_price = self
            .unit_price
            .ok_or(InputError::MissingField("unitPrice"))?;

        let quantity = self.quantity.unwrap_or(0);
        if quantity < 0 {
            return Err(InputError::NegativeValue("quantity"));
        }

        Ok(ProductDraft {
            name,
            description: self.description.unwrap_or_default(),
            category: self
                .category
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| "Uncategorized".to_string()),
            quantity,
            unit_price,
            image_url: self.image_url.unwrap_or_default(),
            sku: self.sku,
            expiry: self.expiry,
            active: self.active.unwrap_or(true),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal() -> ProductInput {
        ProductInput {
            name: Some("Blue Widget".to_string()),
            unit_price: Some(9.99),
            ..Default::default()
        }
    }

    #[test]
    fn minimal_input_gets_defaults() {
        let draft = minimal().into_draft().unwrap();
        assert_eq!(draft.category, "Uncategorized");
        assert_eq!(draft.quantity, 0);
        assert_eq!(draft.description, "");
        assert_eq!(draft.image_url, "");
        assert!(draft.active);
        assert!(draft.sku.is_none());
        assert!(draft.expiry.is_none());
    }

    #[test]
    fn missing_name_is_rejected() {
        let mut input = minimal();
        input.name = None;
        assert_eq!(
            input.into_draft(),
            Err(InputError::MissingField("name"))
        );
    }

    #[test]
    fn blank_name_is_rejected() {
        let mut input = minimal();
        input.name = Some("   ".to_string());
        assert_eq!(
            input.into_draft(),
            Err(InputError::MissingField("name"))
        );
    }

    #[test]
    fn missing_unit_price_is_rejected_not_defaulted() {
        let mut input = minimal();
        input.unit_price = None;
        assert_eq!(
            input.into_draft(),
            Err(InputError::MissingField("unitPrice"))
        );
    }

    #[test]
    fn negative_quantity_is_rejected() {
        let mut input = minimal();
        input.quantity = Some(-1);
        assert_eq!(
            input.into_draft(),
            Err(InputError::NegativeValue("quantity"))
        );
    }

    #[test]
    fn empty_category_falls_back_to_sentinel() {
        let mut input = minimal();
        input.category = Some(String::new());
        assert_eq!(input.into_draft().unwrap().category, "Uncategorized");
    }

    #[test]
    fn wire_format_is_camel_case() {
        let input: ProductInput = serde_json::from_value(serde_json::json!({
            "name": "Widget",
            "unitPrice": 5.0,
            "imageUrl": "http://example.com/w.png"
        }))
        .unwrap();
        let draft = input.into_draft().unwrap();
        assert_eq!(draft.unit_price, 5.0);
        assert_eq!(draft.image_url, "http://example.com/w.png");
    }
}
