//! Purchase entity: a buyer's entry holding product references
//!
//! A purchase owns an ordered list of product ids. The detail view
//! joins those references against the product collection at read time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::core::record::{Record, Searchable};
use crate::entities::product::{Product, ProductSummary};

/// A purchase entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Purchase {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub address: String,

    /// Ordered product references, in the order they were added
    #[serde(default)]
    pub items: Vec<Uuid>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Purchase {
    /// Create a purchase entry with an empty item list.
    pub fn new(name: String, email: String, address: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            address,
            items: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Append a product reference
    pub fn add_item(&mut self, product_id: Uuid) {
        self.items.push(product_id);
        self.touch();
    }

    /// Remove every occurrence of a product reference
    pub fn remove_item(&mut self, product_id: &Uuid) {
        self.items.retain(|id| id != product_id);
        self.touch();
    }

    /// Refresh the update timestamp
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Record for Purchase {
    fn collection_name() -> &'static str {
        "purchases"
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

    fn field_text(&self, field: &str) -> Option<String> {
        match field {
            "name" => Some(self.name.clone()),
            "email" => Some(self.email.clone()),
            "address" => Some(self.address.clone()),
            _ => None,
        }
    }
}

impl Searchable for Purchase {
    fn searchable_fields() -> &'static [&'static str] {
        &["name", "email", "address"]
    }

    fn default_sort_field() -> &'static str {
        "email"
    }
}

/// List projection of a purchase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub address: String,
    pub item_count: usize,
}

impl PurchaseSummary {
    pub fn of(purchase: &Purchase) -> Self {
        Self {
            id: purchase.id,
            name: purchase.name.clone(),
            email: purchase.email.clone(),
            address: purchase.address.clone(),
            item_count: purchase.items.len(),
        }
    }
}

/// Detail projection with the product join applied.
///
/// Dangling references (a product deleted after being added) are
/// silently omitted, matching document-store populate semantics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseDetail {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub address: String,
    pub items: Vec<ProductSummary>,
}

impl PurchaseDetail {
    pub fn of(purchase: &Purchase, products: &[Product]) -> Self {
        let items = purchase
            .items
            .iter()
            .filter_map(|id| products.iter().find(|p| p.id == *id))
            .map(ProductSummary::of)
            .collect();

        Self {
            id: purchase.id,
            name: purchase.name.clone(),
            email: purchase.email.clone(),
            address: purchase.address.clone(),
            items,
        }
    }
}

/// Payload for `POST /purchases`
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePurchaseRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1, max = 300))]
    pub address: String,
}

/// Payload for `PUT /purchases/{id}/items`
#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub product_id: Uuid,
}
