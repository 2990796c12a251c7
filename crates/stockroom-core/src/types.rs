//! # Domain Types
//!
//! Entities managed by the Stockroom admin client.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────────┐   │
//! │  │    Supplier     │   │    Category     │   │      Product        │   │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────────  │   │
//! │  │  id (server)    │   │  id (server)    │   │  id (server)        │   │
//! │  │  name           │   │  name           │   │  name, price        │   │
//! │  │  contact_person │   │  description    │   │  stock, safe_stock  │   │
//! │  │  phone, email   │   └────────▲────────┘   │  category_id ───────┼─┐ │
//! │  └────────▲────────┘            └────────────┼─ (nullable FK)      │ │ │
//! │           └──────────────────────────────────┼─ supplier_id        │ │ │
//! │                                              └─────────────────────┘ │ │
//! │                                                                      │ │
//! │  Reads carry server-joined names (category_name, supplier_name).     │ │
//! │  Writes use the *Draft types, which never carry joined fields. ◄─────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Every entity has a server-assigned integer `id`. It is immutable and the
//! only key used for updates and deletes. `name` is unique per collection on
//! the server side.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::money::Money;

/// Server-assigned entity identifier.
pub type EntityId = i64;

/// Reorder threshold applied when the form leaves safe stock blank.
pub const DEFAULT_SAFE_STOCK: i64 = 100;

/// Currency used when a product has none.
pub const DEFAULT_CURRENCY: &str = "USD";

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

fn default_safe_stock() -> i64 {
    DEFAULT_SAFE_STOCK
}

// =============================================================================
// Entity Kind
// =============================================================================

/// The three managed collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Supplier,
    Category,
    Product,
}

impl EntityKind {
    /// All kinds, in the order the sections appear.
    pub const ALL: [EntityKind; 3] = [
        EntityKind::Supplier,
        EntityKind::Category,
        EntityKind::Product,
    ];

    /// Human-readable label ("Supplier").
    pub const fn label(&self) -> &'static str {
        match self {
            EntityKind::Supplier => "Supplier",
            EntityKind::Category => "Category",
            EntityKind::Product => "Product",
        }
    }

    /// Collection name used in API paths ("suppliers").
    pub const fn collection(&self) -> &'static str {
        match self {
            EntityKind::Supplier => "suppliers",
            EntityKind::Category => "categories",
            EntityKind::Product => "products",
        }
    }

    /// Collection endpoint, e.g. `/api/suppliers`.
    pub fn collection_path(&self) -> String {
        format!("/api/{}", self.collection())
    }

    /// Item endpoint, e.g. `/api/suppliers/7`.
    pub fn item_path(&self, id: EntityId) -> String {
        format!("/api/{}/{}", self.collection(), id)
    }

    /// Submit button label in create mode.
    pub fn add_label(&self) -> String {
        format!("Add {}", self.label())
    }

    /// Submit button label in edit mode.
    pub fn update_label(&self) -> String {
        format!("Update {}", self.label())
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    /// Accepts singular or plural, any case ("product", "Suppliers").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "supplier" | "suppliers" => Ok(EntityKind::Supplier),
            "category" | "categories" => Ok(EntityKind::Category),
            "product" | "products" => Ok(EntityKind::Product),
            other => Err(format!("unknown entity kind '{other}'")),
        }
    }
}

// =============================================================================
// Entity Trait
// =============================================================================

/// Behaviour shared by every managed entity.
///
/// The client crate is generic over this trait: one store and one form
/// controller implementation serve all three collections.
pub trait Entity: Clone + fmt::Debug + Send + Sync + DeserializeOwned + 'static {
    /// Write shape sent on POST/PUT.
    type Draft: Serialize + Clone + fmt::Debug + Send + Sync;

    /// Which collection this entity belongs to.
    const KIND: EntityKind;

    fn id(&self) -> EntityId;

    fn name(&self) -> &str;

    /// The name a draft will be stored under.
    fn draft_name(draft: &Self::Draft) -> &str;

    /// Returns a copy of this entity with the draft's fields applied.
    ///
    /// Used to report the result of an update without another round trip.
    fn with_draft(&self, draft: &Self::Draft) -> Self;
}

// =============================================================================
// Supplier
// =============================================================================

/// A supplier of products.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Supplier {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub contact_person: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Write shape for a supplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SupplierDraft {
    pub name: String,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl Entity for Supplier {
    type Draft = SupplierDraft;
    const KIND: EntityKind = EntityKind::Supplier;

    fn id(&self) -> EntityId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn draft_name(draft: &SupplierDraft) -> &str {
        &draft.name
    }

    fn with_draft(&self, draft: &SupplierDraft) -> Self {
        Supplier {
            id: self.id,
            name: draft.name.clone(),
            contact_person: draft.contact_person.clone(),
            phone: draft.phone.clone(),
            email: draft.email.clone(),
        }
    }
}

// =============================================================================
// Category
// =============================================================================

/// A product category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Category {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Write shape for a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CategoryDraft {
    pub name: String,
    pub description: Option<String>,
}

impl Entity for Category {
    type Draft = CategoryDraft;
    const KIND: EntityKind = EntityKind::Category;

    fn id(&self) -> EntityId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn draft_name(draft: &CategoryDraft) -> &str {
        &draft.name
    }

    fn with_draft(&self, draft: &CategoryDraft) -> Self {
        Category {
            id: self.id,
            name: draft.name.clone(),
            description: draft.description.clone(),
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A tracked product.
///
/// The product list endpoint joins in `category_name`/`supplier_name` and may
/// omit the raw foreign keys; see [`Product::resolve_references`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,

    /// Unit price in `currency_code`.
    #[ts(type = "number")]
    pub price: Money,

    /// ISO-style currency code. Unknown codes are kept as-is.
    #[serde(default = "default_currency")]
    pub currency_code: String,

    pub stock: i64,

    /// Reorder threshold; 0 disables the low-stock alert.
    #[serde(default = "default_safe_stock")]
    pub safe_stock: i64,

    #[serde(default)]
    pub category_id: Option<EntityId>,
    #[serde(default)]
    pub supplier_id: Option<EntityId>,

    /// Server-joined, read-only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    /// Server-joined, read-only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier_name: Option<String>,
}

impl Product {
    /// Fills missing foreign keys by matching the joined names against the
    /// given category and supplier snapshots.
    ///
    /// Keys the server already sent are left alone. A joined name with no
    /// match stays unresolved (the reference was deleted).
    pub fn resolve_references(&self, categories: &[Category], suppliers: &[Supplier]) -> Product {
        let mut resolved = self.clone();
        if resolved.category_id.is_none() {
            resolved.category_id = resolved
                .category_name
                .as_deref()
                .and_then(|name| categories.iter().find(|c| c.name == name))
                .map(|c| c.id);
        }
        if resolved.supplier_id.is_none() {
            resolved.supplier_id = resolved
                .supplier_name
                .as_deref()
                .and_then(|name| suppliers.iter().find(|s| s.name == name))
                .map(|s| s.id);
        }
        resolved
    }
}

/// Write shape for a product. Joined names are never sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductDraft {
    pub name: String,
    pub description: Option<String>,
    #[ts(type = "number")]
    pub price: Money,
    pub currency_code: String,
    pub stock: i64,
    pub safe_stock: i64,
    pub category_id: Option<EntityId>,
    pub supplier_id: Option<EntityId>,
}

impl Entity for Product {
    type Draft = ProductDraft;
    const KIND: EntityKind = EntityKind::Product;

    fn id(&self) -> EntityId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn draft_name(draft: &ProductDraft) -> &str {
        &draft.name
    }

    fn with_draft(&self, draft: &ProductDraft) -> Self {
        // A changed reference invalidates the joined name until the next reload
        let category_name = if draft.category_id == self.category_id {
            self.category_name.clone()
        } else {
            None
        };
        let supplier_name = if draft.supplier_id == self.supplier_id {
            self.supplier_name.clone()
        } else {
            None
        };

        Product {
            id: self.id,
            name: draft.name.clone(),
            description: draft.description.clone(),
            price: draft.price,
            currency_code: draft.currency_code.clone(),
            stock: draft.stock,
            safe_stock: draft.safe_stock,
            category_id: draft.category_id,
            supplier_id: draft.supplier_id,
            category_name,
            supplier_name,
        }
    }
}

// =============================================================================
// API Acknowledgement
// =============================================================================

/// The `{message}` body returned by every mutation endpoint.
///
/// Some deployments also return the new row's `id` on create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Ack {
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
}

// =============================================================================
// Unit Tests
// =============================================================================
