use mongodb::bson::{doc, Document};
use serde::{de, Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::query::{parse_float_prefix, parse_int_prefix};

/// Product entity as stored in the `products` collection.
///
/// The store's own `_id` is ignored on read and never written, so it can not
/// leak into responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    /// Client-supplied identifier used by update and delete
    #[schema(example = 1)]
    pub id: i64,
    /// Unique product name
    #[schema(example = "Widget")]
    pub name: String,
    #[schema(example = 4.99)]
    pub price: f64,
    #[schema(example = "A small widget")]
    pub description: String,
    #[schema(example = 10)]
    pub quantity: i64,
    /// Unit of measure
    #[schema(example = "pcs")]
    pub unit: String,
}

/// DTO for creating a new product. Every field is required.
#[derive(Debug, Clone, PartialEq, Deserialize, Validate, ToSchema)]
pub struct CreateProduct {
    pub id: i64,
    #[validate(length(min = 1))]
    pub name: String,
    pub price: f64,
    pub description: String,
    pub quantity: i64,
    pub unit: String,
}

impl From<CreateProduct> for Product {
    fn from(input: CreateProduct) -> Self {
        Self {
            id: input.id,
            name: input.name,
            price: input.price,
            description: input.description,
            quantity: input.quantity,
            unit: input.unit,
        }
    }
}

/// DTO for a partial update.
///
/// A field that is absent or `null` keeps its stored value; any other
/// supplied value, including `0` and an empty `description`, replaces it.
/// `price` and `quantity` also accept numeric strings such as `"4.50"`.
/// An empty `name` and a numeric field with no numeric reading are treated
/// as absent, so they keep the stored value instead of failing the request.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Validate, ToSchema)]
pub struct UpdateProduct {
    #[serde(default, deserialize_with = "deserialize_name")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_price")]
    #[schema(value_type = Option<f64>)]
    pub price: Option<f64>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "deserialize_quantity")]
    #[schema(value_type = Option<i64>)]
    pub quantity: Option<i64>,
    pub unit: Option<String>,
}

impl UpdateProduct {
    /// True when the body carries no field at all
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.price.is_none()
            && self.description.is_none()
            && self.quantity.is_none()
            && self.unit.is_none()
    }

    /// `$set` document holding only the supplied fields
    pub fn to_set_document(&self) -> Document {
        let mut set = doc! {};
        if let Some(ref name) = self.name {
            set.insert("name", name);
        }
        if let Some(price) = self.price {
            set.insert("price", price);
        }
        if let Some(ref description) = self.description {
            set.insert("description", description);
        }
        if let Some(quantity) = self.quantity {
            set.insert("quantity", quantity);
        }
        if let Some(ref unit) = self.unit {
            set.insert("unit", unit);
        }
        set
    }
}

impl Product {
    /// Copy of `self` with the supplied fields of `update` applied
    pub fn merged(&self, update: &UpdateProduct) -> Product {
        let mut merged = self.clone();
        if let Some(ref name) = update.name {
            merged.name.clone_from(name);
        }
        if let Some(price) = update.price {
            merged.price = price;
        }
        if let Some(ref description) = update.description {
            merged.description.clone_from(description);
        }
        if let Some(quantity) = update.quantity {
            merged.quantity = quantity;
        }
        if let Some(ref unit) = update.unit {
            merged.unit.clone_from(unit);
        }
        merged
    }
}

/// Result of an update that found its product
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// At least one stored field changed
    Modified,
    /// Every supplied value equalled the stored one
    Unchanged,
}

/// Collection-wide stock totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InventoryReport {
    /// Sum of `quantity`
    #[schema(example = 5)]
    pub total_quantity: i64,
    /// Sum of `quantity * price`
    #[schema(example = 40.0)]
    pub total_value: f64,
}

/// Body of every successful mutation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Product added successfully.")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Counts reported by a reseed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub removed: u64,
    pub inserted: u64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Int(i64),
    Float(f64),
    Text(String),
    Other(de::IgnoredAny),
}

fn deserialize_name<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.filter(|name| !name.is_empty()))
}

fn deserialize_price<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<NumberOrString>::deserialize(deserializer)? {
        Some(NumberOrString::Int(n)) => Some(n as f64),
        Some(NumberOrString::Float(n)) => Some(n),
        Some(NumberOrString::Text(s)) => parse_float_prefix(&s),
        Some(NumberOrString::Other(_)) | None => None,
    })
}

fn deserialize_quantity<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<NumberOrString>::deserialize(deserializer)? {
        Some(NumberOrString::Int(n)) => Some(n),
        Some(NumberOrString::Float(n)) if n.is_finite() => Some(n.trunc() as i64),
        Some(NumberOrString::Text(s)) => parse_int_prefix(&s),
        Some(NumberOrString::Float(_)) | Some(NumberOrString::Other(_)) | None => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::Bson;

    fn widget() -> Product {
        Product {
            id: 1,
            name: "Widget".to_string(),
            price: 5.0,
            description: "A small widget".to_string(),
            quantity: 2,
            unit: "pcs".to_string(),
        }
    }

    #[test]
    fn test_product_serializes_exactly_six_fields() {
        let json = serde_json::to_value(widget()).unwrap();
        let keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys.len(), 6, "unexpected keys: {keys:?}");
        assert!(json.get("_id").is_none());
    }

    #[test]
    fn test_product_ignores_store_id() {
        let product: Product = serde_json::from_value(serde_json::json!({
            "_id": {"$oid": "65f1c0ffee0000000000abcd"},
            "id": 1, "name": "Widget", "price": 5, "description": "A small widget",
            "quantity": 2, "unit": "pcs"
        }))
        .unwrap();
        assert_eq!(product, widget());
    }

    #[test]
    fn test_create_product_requires_every_field() {
        let result: Result<CreateProduct, _> = serde_json::from_value(serde_json::json!({
            "id": 1, "name": "Widget", "price": 5.0, "quantity": 2, "unit": "pcs"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_create_product_rejects_empty_name() {
        let input = CreateProduct {
            id: 1,
            name: String::new(),
            price: 1.0,
            description: String::new(),
            quantity: 0,
            unit: "pcs".to_string(),
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_update_absent_and_null_mean_keep() {
        let update: UpdateProduct =
            serde_json::from_value(serde_json::json!({"price": null})).unwrap();
        assert!(update.is_empty());
    }

    #[test]
    fn test_update_keeps_explicit_zero_and_empty() {
        let update: UpdateProduct =
            serde_json::from_value(serde_json::json!({"quantity": 0, "description": ""}))
                .unwrap();
        assert_eq!(update.quantity, Some(0));
        assert_eq!(update.description.as_deref(), Some(""));

        let merged = widget().merged(&update);
        assert_eq!(merged.quantity, 0);
        assert_eq!(merged.description, "");
        assert_eq!(merged.name, "Widget");
    }

    #[test]
    fn test_update_accepts_numeric_strings() {
        let update: UpdateProduct =
            serde_json::from_value(serde_json::json!({"price": "4.50", "quantity": "7 boxes"}))
                .unwrap();
        assert_eq!(update.price, Some(4.5));
        assert_eq!(update.quantity, Some(7));
    }

    #[test]
    fn test_update_truncates_fractional_quantity() {
        let update: UpdateProduct =
            serde_json::from_value(serde_json::json!({"quantity": 2.9})).unwrap();
        assert_eq!(update.quantity, Some(2));
    }

    #[test]
    fn test_update_non_numeric_values_keep_stored_numbers() {
        let update: UpdateProduct = serde_json::from_value(
            serde_json::json!({"price": "cheap", "quantity": true}),
        )
        .unwrap();
        assert!(update.is_empty());
        assert_eq!(widget().merged(&update), widget());
    }

    #[test]
    fn test_update_empty_name_keeps_stored_name() {
        let update: UpdateProduct =
            serde_json::from_value(serde_json::json!({"name": "", "unit": "kg"})).unwrap();
        assert_eq!(update.name, None);
        assert_eq!(widget().merged(&update).name, "Widget");
        assert!(!update.to_set_document().contains_key("name"));
    }

    #[test]
    fn test_set_document_only_has_supplied_fields() {
        let update = UpdateProduct {
            price: Some(9.5),
            unit: Some("kg".to_string()),
            ..Default::default()
        };
        let set = update.to_set_document();
        assert_eq!(set.len(), 2);
        assert_eq!(set.get("price"), Some(&Bson::Double(9.5)));
        assert_eq!(set.get_str("unit").unwrap(), "kg");
    }

    #[test]
    fn test_merged_with_same_values_is_equal() {
        let update = UpdateProduct {
            name: Some("Widget".to_string()),
            price: Some(5.0),
            ..Default::default()
        };
        assert_eq!(widget().merged(&update), widget());
    }

    #[test]
    fn test_inventory_report_uses_camel_case() {
        let json = serde_json::to_value(InventoryReport {
            total_quantity: 5,
            total_value: 40.0,
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"totalQuantity": 5, "totalValue": 40.0}));
    }
}
