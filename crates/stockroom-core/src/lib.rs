//! # stockroom-core: Pure Logic for the Stockroom Admin Client
//!
//! This crate holds every rule of the inventory admin client that can be
//! expressed without I/O: entity types, input coercion, the form and
//! navigation state machines, and the derived dashboard values.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Stockroom Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Front end (apps/console)                        │   │
//! │  │   show ──► edit ──► set ──► submit ──► tables re-rendered      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              stockroom-client (Application)                     │   │
//! │  │   ApiGateway, EntityStore<T>, notices, session                 │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ stockroom-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │  ┌────────┐ ┌────────┐ ┌──────────┐ ┌──────────┐ ┌──────────┐  │   │
//! │  │  │ types  │ │ money  │ │   form   │ │navigation│ │aggregate │  │   │
//! │  │  │Product │ │ Money  │ │FormMode  │ │Navigator │ │low stock │  │   │
//! │  │  │Supplier│ │currency│ │Controller│ │ Section  │ │ summary  │  │   │
//! │  │  └────────┘ └────────┘ └──────────┘ └──────────┘ └──────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO CLOCKS                               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Supplier, Category, Product and their write drafts
//! - [`money`] - Integer price amounts
//! - [`currency`] - Currency table, price formatting, currency selector
//! - [`validation`] - Form text coercion
//! - [`form`] - Create/update form controller
//! - [`navigation`] - Section state machine and load commands
//! - [`aggregate`] - Dashboard summary and the low-stock rule
//! - [`view`] - Table rows and reference selectors
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use stockroom_core::{CurrencyTable, FormModeController, ProductForm, SubmitMethod};
//!
//! let mut form = FormModeController::<ProductForm>::new();
//! form.fields_mut().name = "Widget".to_string();
//! form.fields_mut().price = "19.5".to_string();
//! form.fields_mut().stock = "4".to_string();
//!
//! let submission = form.submit().unwrap();
//! assert_eq!(submission.method, SubmitMethod::Create);
//!
//! let table = CurrencyTable::new();
//! assert_eq!(table.format_price(submission.payload.price, "USD"), "$19.50");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod aggregate;
pub mod currency;
pub mod error;
pub mod form;
pub mod money;
pub mod navigation;
pub mod types;
pub mod validation;
pub mod view;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use aggregate::{is_low_stock, DashboardSummary};
pub use currency::{Currency, CurrencySelector, CurrencyTable};
pub use error::{CoreError, CoreResult, ValidationError};
pub use form::{
    CategoryForm, EntityForm, FormMode, FormModeController, ProductForm, Submission,
    SubmitMethod, SupplierForm,
};
pub use money::Money;
pub use navigation::{Header, LoadCommand, Navigator, Section};
pub use types::*;
pub use view::{CategoryRow, ProductRow, ReferenceOptions, SupplierRow};
