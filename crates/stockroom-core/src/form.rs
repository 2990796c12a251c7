//! # Form Module
//!
//! The create/update form shared by every entity section.
//!
//! ## Mode State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │            begin_edit(entity)                                           │
//! │   ┌────────┐ ───────────────────────► ┌──────────────┐                  │
//! │   │ Create │                          │  Edit(id)    │                  │
//! │   │        │ ◄─────────────────────── │              │                  │
//! │   └────────┘   complete() / clear()   └──────────────┘                  │
//! │       │        reconcile(): id gone          │                          │
//! │       │                                      │                          │
//! │       ▼ submit()                             ▼ submit()                 │
//! │   POST /api/<kind>                      PUT /api/<kind>/<id>            │
//! │                                                                         │
//! │   Label:  "Add <Kind>"                  "Update <Kind>"                 │
//! │   Identifier field: ""                  "<id>"                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The mode is explicit state. The submit label and identifier field are
//! derived from it, never the other way round.
//!
//! ## Submission Lifecycle
//! `submit()` validates the fields and marks the form in flight. The caller
//! then reports the outcome: `complete()` after success (full reset) or
//! `abort()` after failure (fields stay exactly as typed).

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::types::{
    Category, CategoryDraft, Entity, EntityId, EntityKind, Product, ProductDraft, Supplier,
    SupplierDraft, DEFAULT_CURRENCY,
};
use crate::validation::{
    currency_or_default, optional_text, parse_price, parse_reference, parse_safe_stock,
    parse_stock, ValidationResult,
};

// =============================================================================
// Form Mode
// =============================================================================

/// Whether a form creates a new entity or edits an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum FormMode {
    #[default]
    Create,
    Edit(EntityId),
}

impl FormMode {
    /// The id being edited, if any.
    pub fn editing(&self) -> Option<EntityId> {
        match self {
            FormMode::Create => None,
            FormMode::Edit(id) => Some(*id),
        }
    }
}

/// HTTP shape of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitMethod {
    /// POST to the collection.
    Create,
    /// PUT to the item.
    Update(EntityId),
}

/// A validated submission ready to be sent.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission<D> {
    pub method: SubmitMethod,
    pub payload: D,
}

// =============================================================================
// Entity Form Trait
// =============================================================================

/// Editable text fields for one entity kind.
pub trait EntityForm: Default + Clone + fmt::Debug + Send + Sync + 'static {
    type Entity: Entity;

    /// Field names in display order.
    const FIELDS: &'static [&'static str];

    /// Populates every field from a typed entity. Missing optionals become "".
    fn from_entity(entity: &Self::Entity) -> Self;

    /// Coerces the text fields into the write shape.
    fn to_draft(&self) -> ValidationResult<<Self::Entity as Entity>::Draft>;

    /// Current text of a field.
    fn field(&self, name: &str) -> Option<&str>;

    /// Mutable access to a field's text.
    fn field_mut(&mut self, name: &str) -> Option<&mut String>;

    /// Sets a field by name.
    fn set_field(&mut self, name: &str, value: &str) -> CoreResult<()> {
        match self.field_mut(name) {
            Some(slot) => {
                *slot = value.to_string();
                Ok(())
            }
            None => Err(CoreError::UnknownField {
                kind: <Self::Entity as Entity>::KIND,
                field: name.to_string(),
            }),
        }
    }

    /// `(name, value)` pairs in display order.
    fn values(&self) -> Vec<(&'static str, &str)> {
        Self::FIELDS
            .iter()
            .map(|name| (*name, self.field(name).unwrap_or("")))
            .collect()
    }
}

fn text_or_empty(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn reference_text(value: Option<EntityId>) -> String {
    value.map(|id| id.to_string()).unwrap_or_default()
}

/// Supplier form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SupplierForm {
    pub name: String,
    pub contact_person: String,
    pub phone: String,
    pub email: String,
}

impl EntityForm for SupplierForm {
    type Entity = Supplier;
    const FIELDS: &'static [&'static str] = &["name", "contact_person", "phone", "email"];

    fn from_entity(entity: &Supplier) -> Self {
        SupplierForm {
            name: entity.name.clone(),
            contact_person: text_or_empty(&entity.contact_person),
            phone: text_or_empty(&entity.phone),
            email: text_or_empty(&entity.email),
        }
    }

    fn to_draft(&self) -> ValidationResult<SupplierDraft> {
        Ok(SupplierDraft {
            name: self.name.trim().to_string(),
            contact_person: optional_text(&self.contact_person),
            phone: optional_text(&self.phone),
            email: optional_text(&self.email),
        })
    }

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "name" => Some(&self.name),
            "contact_person" => Some(&self.contact_person),
            "phone" => Some(&self.phone),
            "email" => Some(&self.email),
            _ => None,
        }
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut String> {
        match name {
            "name" => Some(&mut self.name),
            "contact_person" => Some(&mut self.contact_person),
            "phone" => Some(&mut self.phone),
            "email" => Some(&mut self.email),
            _ => None,
        }
    }
}

/// Category form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryForm {
    pub name: String,
    pub description: String,
}

impl EntityForm for CategoryForm {
    type Entity = Category;
    const FIELDS: &'static [&'static str] = &["name", "description"];

    fn from_entity(entity: &Category) -> Self {
        CategoryForm {
            name: entity.name.clone(),
            description: text_or_empty(&entity.description),
        }
    }

    fn to_draft(&self) -> ValidationResult<CategoryDraft> {
        Ok(CategoryDraft {
            name: self.name.trim().to_string(),
            description: optional_text(&self.description),
        })
    }

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "name" => Some(&self.name),
            "description" => Some(&self.description),
            _ => None,
        }
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut String> {
        match name {
            "name" => Some(&mut self.name),
            "description" => Some(&mut self.description),
            _ => None,
        }
    }
}

/// Product form fields.
///
/// `category_id` and `supplier_id` hold the selected option value; empty
/// means nothing selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductForm {
    pub name: String,
    pub description: String,
    pub price: String,
    pub currency_code: String,
    pub stock: String,
    pub safe_stock: String,
    pub category_id: String,
    pub supplier_id: String,
}

impl Default for ProductForm {
    fn default() -> Self {
        ProductForm {
            name: String::new(),
            description: String::new(),
            price: String::new(),
            currency_code: DEFAULT_CURRENCY.to_string(),
            stock: String::new(),
            safe_stock: String::new(),
            category_id: String::new(),
            supplier_id: String::new(),
        }
    }
}

impl EntityForm for ProductForm {
    type Entity = Product;
    const FIELDS: &'static [&'static str] = &[
        "name",
        "description",
        "price",
        "currency_code",
        "stock",
        "safe_stock",
        "category_id",
        "supplier_id",
    ];

    fn from_entity(entity: &Product) -> Self {
        ProductForm {
            name: entity.name.clone(),
            description: text_or_empty(&entity.description),
            price: entity.price.to_decimal_string(),
            currency_code: entity.currency_code.clone(),
            stock: entity.stock.to_string(),
            safe_stock: entity.safe_stock.to_string(),
            category_id: reference_text(entity.category_id),
            supplier_id: reference_text(entity.supplier_id),
        }
    }

    fn to_draft(&self) -> ValidationResult<ProductDraft> {
        Ok(ProductDraft {
            name: self.name.trim().to_string(),
            description: optional_text(&self.description),
            price: parse_price("price", &self.price)?,
            currency_code: currency_or_default(&self.currency_code),
            stock: parse_stock("stock", &self.stock)?,
            safe_stock: parse_safe_stock("safe_stock", &self.safe_stock)?,
            category_id: parse_reference("category_id", &self.category_id)?,
            supplier_id: parse_reference("supplier_id", &self.supplier_id)?,
        })
    }

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "name" => Some(&self.name),
            "description" => Some(&self.description),
            "price" => Some(&self.price),
            "currency_code" => Some(&self.currency_code),
            "stock" => Some(&self.stock),
            "safe_stock" => Some(&self.safe_stock),
            "category_id" => Some(&self.category_id),
            "supplier_id" => Some(&self.supplier_id),
            _ => None,
        }
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut String> {
        match name {
            "name" => Some(&mut self.name),
            "description" => Some(&mut self.description),
            "price" => Some(&mut self.price),
            "currency_code" => Some(&mut self.currency_code),
            "stock" => Some(&mut self.stock),
            "safe_stock" => Some(&mut self.safe_stock),
            "category_id" => Some(&mut self.category_id),
            "supplier_id" => Some(&mut self.supplier_id),
            _ => None,
        }
    }
}

// =============================================================================
// Form Mode Controller
// =============================================================================

/// Owns one form's fields and its create/update mode.
#[derive(Debug, Clone, Default)]
pub struct FormModeController<F: EntityForm> {
    mode: FormMode,
    fields: F,
    in_flight: bool,
}

impl<F: EntityForm> FormModeController<F> {
    /// A fresh form in create mode.
    pub fn new() -> Self {
        FormModeController {
            mode: FormMode::Create,
            fields: F::default(),
            in_flight: false,
        }
    }

    /// Which entity kind this form edits.
    pub fn kind(&self) -> EntityKind {
        <F::Entity as Entity>::KIND
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn fields(&self) -> &F {
        &self.fields
    }

    /// Field access for typing. The mode is unaffected.
    pub fn fields_mut(&mut self) -> &mut F {
        &mut self.fields
    }

    /// True while a submission awaits its outcome.
    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Text of the hidden identifier field: the id in edit mode, else "".
    pub fn identifier_field(&self) -> String {
        reference_text(self.mode.editing())
    }

    /// "Add <Kind>" or "Update <Kind>".
    pub fn submit_label(&self) -> String {
        match self.mode {
            FormMode::Create => self.kind().add_label(),
            FormMode::Edit(_) => self.kind().update_label(),
        }
    }

    /// Switches to edit mode and populates every field from `entity`.
    ///
    /// Refused while a submission is in flight.
    pub fn begin_edit(&mut self, entity: &F::Entity) -> CoreResult<()> {
        if self.in_flight {
            return Err(CoreError::SubmissionInFlight { kind: self.kind() });
        }
        self.mode = FormMode::Edit(entity.id());
        self.fields = F::from_entity(entity);
        Ok(())
    }

    /// Validates the fields and marks the form in flight.
    ///
    /// ## Errors
    /// - [`CoreError::SubmissionInFlight`] if a submission is pending
    /// - [`CoreError::Validation`] if a field cannot be coerced; the form
    ///   is left untouched and not in flight
    pub fn submit(&mut self) -> CoreResult<Submission<<F::Entity as Entity>::Draft>> {
        if self.in_flight {
            return Err(CoreError::SubmissionInFlight { kind: self.kind() });
        }
        let payload = self.fields.to_draft()?;
        let method = match self.mode {
            FormMode::Create => SubmitMethod::Create,
            FormMode::Edit(id) => SubmitMethod::Update(id),
        };
        self.in_flight = true;
        Ok(Submission { method, payload })
    }

    /// Successful round trip: back to an empty create form.
    pub fn complete(&mut self) {
        self.reset();
        self.in_flight = false;
    }

    /// Failed round trip: fields and mode stay as they were.
    pub fn abort(&mut self) {
        self.in_flight = false;
    }

    /// User escape hatch: same reset as `complete()`, without submitting.
    pub fn clear(&mut self) {
        self.reset();
    }

    /// Drops an edit whose entity is no longer in the snapshot.
    ///
    /// Returns true if the form was reset. A form with a pending submission
    /// is left for the submission outcome to settle.
    pub fn reconcile<P>(&mut self, is_known: P) -> bool
    where
        P: Fn(EntityId) -> bool,
    {
        match self.mode {
            FormMode::Edit(id) if !self.in_flight && !is_known(id) => {
                self.reset();
                true
            }
            _ => false,
        }
    }

    fn reset(&mut self) {
        self.mode = FormMode::Create;
        self.fields = F::default();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::ValidationError;

    fn supplier() -> Supplier {
        Supplier {
            id: 7,
            name: "Acme".to_string(),
            contact_person: Some("Wile".to_string()),
            phone: None,
            email: Some("orders@acme.test".to_string()),
        }
    }

    #[test]
    fn test_initial_state() {
        let form = FormModeController::<SupplierForm>::new();
        assert_eq!(form.mode(), FormMode::Create);
        assert_eq!(form.submit_label(), "Add Supplier");
        assert_eq!(form.identifier_field(), "");
    }

    #[test]
    fn test_begin_edit_populates_fields() {
        let mut form = FormModeController::<SupplierForm>::new();
        form.begin_edit(&supplier()).unwrap();

        assert_eq!(form.mode(), FormMode::Edit(7));
        assert_eq!(form.identifier_field(), "7");
        assert_eq!(form.submit_label(), "Update Supplier");
        assert_eq!(form.fields().contact_person, "Wile");
        assert_eq!(form.fields().phone, "");
    }

    #[test]
    fn test_submit_in_edit_mode_targets_update() {
        let mut form = FormModeController::<SupplierForm>::new();
        form.begin_edit(&supplier()).unwrap();
        form.fields_mut().phone = "555-0100".to_string();

        let submission = form.submit().unwrap();
        assert_eq!(submission.method, SubmitMethod::Update(7));
        assert_eq!(submission.payload.phone.as_deref(), Some("555-0100"));
        assert!(form.is_in_flight());

        form.complete();
        assert_eq!(form.mode(), FormMode::Create);
        assert_eq!(form.identifier_field(), "");
        assert_eq!(form.fields(), &SupplierForm::default());
    }

    #[test]
    fn test_double_submit_rejected() {
        let mut form = FormModeController::<CategoryForm>::new();
        form.fields_mut().name = "Tools".to_string();
        form.submit().unwrap();

        let err = form.submit().unwrap_err();
        assert!(matches!(err, CoreError::SubmissionInFlight { .. }));
    }

    #[test]
    fn test_abort_keeps_values() {
        let mut form = FormModeController::<SupplierForm>::new();
        form.begin_edit(&supplier()).unwrap();
        form.submit().unwrap();
        form.abort();

        assert_eq!(form.mode(), FormMode::Edit(7));
        assert_eq!(form.fields().name, "Acme");
        assert!(!form.is_in_flight());
    }

    #[test]
    fn test_validation_failure_leaves_form_idle() {
        let mut form = FormModeController::<ProductForm>::new();
        form.fields_mut().name = "Widget".to_string();
        form.fields_mut().price = "abc".to_string();
        form.fields_mut().stock = "1".to_string();

        let err = form.submit().unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::NotANumber { .. })
        ));
        assert!(!form.is_in_flight());
        assert_eq!(form.fields().price, "abc");
    }

    #[test]
    fn test_product_draft_coercion() {
        let mut form = FormModeController::<ProductForm>::new();
        let fields = form.fields_mut();
        fields.name = " Widget ".to_string();
        fields.price = "19.5".to_string();
        fields.currency_code = String::new();
        fields.stock = "3".to_string();
        fields.category_id = "2".to_string();

        let draft = form.submit().unwrap().payload;
        assert_eq!(draft.name, "Widget");
        assert_eq!(draft.price, Money::from_cents(1950));
        assert_eq!(draft.currency_code, "USD");
        assert_eq!(draft.safe_stock, 100);
        assert_eq!(draft.category_id, Some(2));
        assert_eq!(draft.supplier_id, None);
        assert_eq!(draft.description, None);
    }

    #[test]
    fn test_product_reset_restores_usd() {
        let mut form = FormModeController::<ProductForm>::new();
        form.fields_mut().currency_code = "EUR".to_string();
        form.clear();
        assert_eq!(form.fields().currency_code, "USD");
    }

    #[test]
    fn test_reconcile_resets_orphaned_edit() {
        let mut form = FormModeController::<SupplierForm>::new();
        form.begin_edit(&supplier()).unwrap();

        assert!(!form.reconcile(|id| id == 7));
        assert_eq!(form.mode(), FormMode::Edit(7));

        assert!(form.reconcile(|_| false));
        assert_eq!(form.mode(), FormMode::Create);
        assert_eq!(form.fields().name, "");
    }

    #[test]
    fn test_round_trip_reproduces_fields() {
        let mut form = FormModeController::<SupplierForm>::new();
        form.fields_mut().name = "Acme".to_string();
        form.fields_mut().email = "orders@acme.test".to_string();
        let typed = form.fields().clone();
        let draft = form.submit().unwrap().payload;
        form.complete();

        // what the server would return for that draft
        let created = Supplier {
            id: 11,
            name: draft.name,
            contact_person: draft.contact_person,
            phone: draft.phone,
            email: draft.email,
        };
        form.begin_edit(&created).unwrap();
        assert_eq!(form.fields(), &typed);
    }

    #[test]
    fn test_set_field_by_name() {
        let mut form = FormModeController::<CategoryForm>::new();
        form.fields_mut().set_field("description", "Hand tools").unwrap();
        assert_eq!(form.fields().field("description"), Some("Hand tools"));

        let err = form.fields_mut().set_field("colour", "red").unwrap_err();
        assert_eq!(err.to_string(), "Category form has no field 'colour'");
    }
}
