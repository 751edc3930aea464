//! Record fixtures shared by tests.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::MemoryCollection;

/// A product record as stored in the `products` collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Product {
    /// Store identifier.
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Display name.
    pub name: String,
    /// Units in stock.
    pub quantity: f64,
    /// Unit price.
    pub price: f64,
}

impl Product {
    /// Creates a product without an identifier.
    pub fn new(name: impl Into<String>, quantity: f64, price: f64) -> Self {
        Self {
            id: None,
            name: name.into(),
            quantity,
            price,
        }
    }
}

/// Generates `count` product documents named `product-{i}`, with quantity `i`
/// and price `i * 10 + 5`.
pub fn product_documents(count: usize) -> Vec<Value> {
    (0..count)
        .map(|i| {
            let n = i as f64;
            json!({
                "name": format!("product-{i}"),
                "quantity": n,
                "price": n * 10.0 + 5.0,
            })
        })
        .collect()
}

/// A product document whose price cannot decode into [`Product`].
pub fn malformed_product(name: &str) -> Value {
    json!({ "name": name, "quantity": 1, "price": "not a number" })
}

/// Creates a collection seeded with [`product_documents`].
pub async fn seed_products(count: usize) -> docpage::Result<MemoryCollection> {
    let collection = MemoryCollection::new();
    collection.insert_many(product_documents(count)).await?;
    Ok(collection)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_follow_the_pattern() {
        let documents = product_documents(3);
        assert_eq!(documents[2], json!({ "name": "product-2", "quantity": 2.0, "price": 25.0 }));
    }

    #[test]
    fn product_decodes_with_defaults() {
        let product: Product = serde_json::from_value(json!({ "name": "lamp" })).unwrap();
        assert_eq!(product, Product::new("lamp", 0.0, 0.0));

        assert!(serde_json::from_value::<Product>(malformed_product("x")).is_err());
    }

    #[test]
    fn product_decodes_integral_and_float_quantities() {
        let whole: Product = serde_json::from_value(json!({ "quantity": 3 })).unwrap();
        let float: Product = serde_json::from_value(json!({ "quantity": 3.0 })).unwrap();
        assert_eq!(whole.quantity, 3.0);
        assert_eq!(whole, float);
    }
}
