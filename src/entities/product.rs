//! Product entity: catalog record keyed by a unique sku

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use chrono::{DateTime, Utc};
use uuid::Uuid;
use validator::Validate;

use crate::core::record::{Record, Searchable};

static SKU_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9][A-Z0-9-]{2,31}$").expect("sku pattern is valid"));

/// A catalog product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub sku: String,
    pub product_name: String,
    pub brand: String,
    pub price: f64,
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn new(sku: String, product_name: String, brand: String, price: f64, category: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            sku,
            product_name,
            brand,
            price,
            category,
            created_at: now,
            updated_at: now,
        }
    }

    /// Refresh the update timestamp
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Record for Product {
    fn collection_name() -> &'static str {
        "products"
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // price is numeric and has no textual representation: it neither
    // matches a search term nor carries a sort key (sorts as "").
    fn field_text(&self, field: &str) -> Option<String> {
        match field {
            "sku" => Some(self.sku.clone()),
            "product_name" => Some(self.product_name.clone()),
            "brand" => Some(self.brand.clone()),
            "category" => Some(self.category.clone()),
            _ => None,
        }
    }
}

impl Searchable for Product {
    fn searchable_fields() -> &'static [&'static str] {
        &["product_name", "brand", "category"]
    }

    fn default_sort_field() -> &'static str {
        "product_name"
    }
}

/// Public projection of a product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductSummary {
    pub id: Uuid,
    pub product_name: String,
    pub brand: String,
    pub price: f64,
    pub category: String,
}

impl ProductSummary {
    pub fn of(product: &Product) -> Self {
        Self {
            id: product.id,
            product_name: product.product_name.clone(),
            brand: product.brand.clone(),
            price: product.price,
            category: product.category.clone(),
        }
    }
}

/// Payload for `POST /products`
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProductRequest {
    #[validate(regex(path = *SKU_RE))]
    pub sku: String,

    #[validate(length(min = 1, max = 200))]
    pub product_name: String,

    #[validate(length(min = 1, max = 100))]
    pub brand: String,

    #[validate(range(min = 0.0))]
    pub price: f64,

    #[validate(length(min = 1, max = 100))]
    pub category: String,
}

/// Payload for `PUT /products/{id}`
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, max = 200))]
    pub product_name: String,

    #[validate(length(min = 1, max = 100))]
    pub brand: String,

    #[validate(range(min = 0.0))]
    pub price: f64,

    #[validate(length(min = 1, max = 100))]
    pub category: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product() -> Product {
        Product::new(
            "SKU-001".to_string(),
            "Widget".to_string(),
            "Acme".to_string(),
            9.99,
            "Tools".to_string(),
        )
    }

    #[test]
    fn test_price_has_no_text_representation() {
        let p = product();
        assert!(p.field_text("price").is_none());
        assert_eq!(p.field_text("brand").as_deref(), Some("Acme"));
    }

    #[test]
    fn test_searchable_fields() {
        assert_eq!(
            Product::searchable_fields(),
            &["product_name", "brand", "category"]
        );
    }

    #[test]
    fn test_sku_validation() {
        let ok = CreateProductRequest {
            sku: "SKU-001".to_string(),
            product_name: "Widget".to_string(),
            brand: "Acme".to_string(),
            price: 9.99,
            category: "Tools".to_string(),
        };
        assert!(ok.validate().is_ok());

        let bad_sku = CreateProductRequest {
            sku: "sku 001".to_string(),
            product_name: "Widget".to_string(),
            brand: "Acme".to_string(),
            price: 9.99,
            category: "Tools".to_string(),
        };
        assert!(bad_sku.validate().is_err());

        let negative_price = CreateProductRequest {
            sku: "SKU-001".to_string(),
            product_name: "Widget".to_string(),
            brand: "Acme".to_string(),
            price: -1.0,
            category: "Tools".to_string(),
        };
        assert!(negative_price.validate().is_err());
    }
}
