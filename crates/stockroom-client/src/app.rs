//! # Application
//!
//! The top-level controller: owns the gateway, the three entity panes, the
//! navigator, and the derived display state, and runs every user action.
//!
//! ## Control Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   select_section(s) ──► Navigator::select ──► LoadCommands             │
//! │                                                   │                     │
//! │                     ┌─────────────────────────────┼──────────────┐      │
//! │                     ▼                             ▼              ▼      │
//! │              RefreshSummary               Reload(kind)    Reference/    │
//! │              GET dashboard_summary        store.list()    currency      │
//! │                                           form.reconcile  selectors     │
//! │                                                                         │
//! │   submit_form(kind) ──► form.submit ──► store.create / store.update    │
//! │                                            │                            │
//! │                              ok ◄──────────┴──────────► err             │
//! │                              │                          │               │
//! │                  form.complete, notice,        form.abort (values kept) │
//! │                  reload store + summary        snapshot untouched       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Locking
//! All shared state sits behind std locks that are taken, used and released
//! between awaits. No guard is ever held across a network call.
//!
//! ## Notices
//! The gateway announces remote failures. This controller announces
//! successes and the failures it raised itself, so nothing is said twice.

use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use stockroom_core::{
    Ack, Category, CategoryForm, CategoryRow, CurrencySelector, CurrencyTable, DashboardSummary,
    Entity, EntityForm, EntityId, EntityKind, FormMode, FormModeController, Header, LoadCommand,
    Navigator, Product, ProductForm, ProductRow, ReferenceOptions, Section, SubmitMethod,
    Supplier, SupplierForm, SupplierRow,
};
use tracing::{debug, info, warn};

use crate::auth::{AuthAck, AuthClient, Credentials, Signup};
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::gateway::ApiGateway;
use crate::notify::{Notice, Notifier};
use crate::store::EntityStore;
use crate::transport::{HttpTransport, ReqwestTransport};

const SUMMARY_PATH: &str = "/api/dashboard_summary";

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn read<T: Clone>(lock: &RwLock<T>) -> T {
    lock.read().unwrap_or_else(PoisonError::into_inner).clone()
}

fn replace<T>(lock: &RwLock<T>, value: T) {
    *lock.write().unwrap_or_else(PoisonError::into_inner) = value;
}

// =============================================================================
// Session State
// =============================================================================

/// Whether the server session is usable.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub enum SessionState {
    /// Not logged in yet, or logged out.
    #[default]
    Anonymous,
    Active,
    /// A request was redirected or refused with 401; log in again with
    /// `reauthenticate`.
    Expired { location: Option<String> },
}

// =============================================================================
// Views
// =============================================================================

/// A form as the front end shows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormView {
    pub kind: EntityKind,
    pub mode: FormMode,
    pub submit_label: String,
    /// Hidden identifier field: the edited id, or "".
    pub identifier: String,
    pub fields: Vec<(String, String)>,
    pub in_flight: bool,
}

/// Outcome of a successful form submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Submitted {
    pub kind: EntityKind,
    /// The saved entity's id. `None` when a create was stored but could not
    /// be found in the reloaded collection.
    pub id: Option<EntityId>,
    pub message: String,
}

// =============================================================================
// Entity Pane
// =============================================================================

/// One collection's store together with its form.
struct EntityPane<F: EntityForm> {
    store: EntityStore<F::Entity>,
    form: Mutex<FormModeController<F>>,
}

impl<F: EntityForm> EntityPane<F> {
    fn new(gateway: ApiGateway) -> Self {
        EntityPane {
            store: EntityStore::new(gateway),
            form: Mutex::new(FormModeController::new()),
        }
    }

    fn form(&self) -> MutexGuard<'_, FormModeController<F>> {
        lock(&self.form)
    }

    /// Reloads the snapshot, then drops an edit whose entity vanished.
    async fn reload(&self) -> ClientResult<Vec<F::Entity>> {
        let items = self.store.list().await?;
        let kind = <F::Entity as Entity>::KIND;
        if self.form().reconcile(|id| self.store.contains(id)) {
            info!(%kind, "Edited entity no longer listed, form reset");
        }
        Ok(items)
    }

    fn view(&self) -> FormView {
        let form = self.form();
        FormView {
            kind: form.kind(),
            mode: form.mode(),
            submit_label: form.submit_label(),
            identifier: form.identifier_field(),
            fields: form
                .fields()
                .values()
                .into_iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
            in_flight: form.is_in_flight(),
        }
    }
}

/// Runs `$body` with `$pane` bound to the pane of `$kind`.
macro_rules! with_pane {
    ($app:expr, $kind:expr, |$pane:ident| $body:expr) => {
        match $kind {
            EntityKind::Supplier => {
                let $pane = &$app.suppliers;
                $body
            }
            EntityKind::Category => {
                let $pane = &$app.categories;
                $body
            }
            EntityKind::Product => {
                let $pane = &$app.products;
                $body
            }
        }
    };
}

// =============================================================================
// Application
// =============================================================================

/// The admin client.
pub struct Application {
    gateway: ApiGateway,
    auth: AuthClient,
    suppliers: EntityPane<SupplierForm>,
    categories: EntityPane<CategoryForm>,
    products: EntityPane<ProductForm>,
    navigator: Mutex<Navigator>,
    currencies: CurrencyTable,
    summary: RwLock<Option<DashboardSummary>>,
    reference_options: RwLock<ReferenceOptions>,
    currency_selector: RwLock<CurrencySelector>,
    session: RwLock<SessionState>,
    notifier: Arc<dyn Notifier>,
}

impl Application {
    /// Wires everything around the given transport and notifier.
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        notifier: Arc<dyn Notifier>,
        currencies: CurrencyTable,
    ) -> Self {
        let gateway = ApiGateway::new(transport, notifier.clone());
        Application {
            auth: AuthClient::new(gateway.clone()),
            suppliers: EntityPane::new(gateway.clone()),
            categories: EntityPane::new(gateway.clone()),
            products: EntityPane::new(gateway.clone()),
            gateway,
            navigator: Mutex::new(Navigator::new()),
            currency_selector: RwLock::new(currencies.selector()),
            currencies,
            summary: RwLock::new(None),
            reference_options: RwLock::new(ReferenceOptions::build(&[], &[])),
            session: RwLock::new(SessionState::Anonymous),
            notifier,
        }
    }

    /// Builds the production client over `reqwest`.
    pub fn from_config(config: &ClientConfig, notifier: Arc<dyn Notifier>) -> ClientResult<Self> {
        let transport = ReqwestTransport::new(config)?;
        Ok(Self::new(
            Arc::new(transport),
            notifier,
            CurrencyTable::new(),
        ))
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Enters the dashboard and loads it.
    pub async fn start(&self) -> ClientResult<()> {
        self.select_section(Section::Dashboard).await
    }

    /// Shows `section` and runs its loads.
    ///
    /// Every load is attempted; the first failure is returned after the
    /// rest have run.
    pub async fn select_section(&self, section: Section) -> ClientResult<()> {
        let loads = lock(&self.navigator).select(section);
        debug!(%section, ?loads, "Section selected");
        self.run_loads(loads).await
    }

    /// Re-runs the current section's loads.
    pub async fn refresh(&self) -> ClientResult<()> {
        let loads = lock(&self.navigator).reload();
        self.run_loads(loads).await
    }

    async fn run_loads(&self, loads: Vec<LoadCommand>) -> ClientResult<()> {
        let mut first_error = None;
        for load in loads {
            if let Err(err) = self.run_load(load).await {
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    async fn run_load(&self, load: LoadCommand) -> ClientResult<()> {
        let result = match load {
            LoadCommand::RefreshSummary => self.refresh_summary().await.map(|_| ()),
            LoadCommand::Reload(kind) => self.reload(kind).await,
            LoadCommand::PopulateReferenceOptions => self.populate_reference_options().await,
            LoadCommand::RebuildCurrencySelector => {
                replace(&self.currency_selector, self.currencies.selector());
                Ok(())
            }
        };
        result.map_err(|err| self.observe(err))
    }

    async fn reload(&self, kind: EntityKind) -> ClientResult<()> {
        with_pane!(self, kind, |pane| pane.reload().await.map(|_| ()))
    }

    async fn refresh_summary(&self) -> ClientResult<DashboardSummary> {
        let summary: DashboardSummary = self.gateway.get(SUMMARY_PATH).await?;
        replace(&self.summary, Some(summary));
        Ok(summary)
    }

    /// Reloads categories and suppliers and rebuilds both selectors from
    /// whatever snapshots are then available.
    async fn populate_reference_options(&self) -> ClientResult<()> {
        let categories = self.categories.reload().await;
        let suppliers = self.suppliers.reload().await;
        replace(
            &self.reference_options,
            ReferenceOptions::build(
                &self.categories.store.snapshot(),
                &self.suppliers.store.snapshot(),
            ),
        );
        categories.and(suppliers).map(|_| ())
    }

    // =========================================================================
    // Forms
    // =========================================================================

    /// Puts the form of `kind` in edit mode for the entity with `id`.
    ///
    /// The entity comes from the current snapshot; an id that is not there
    /// is an `InvalidReference`.
    pub fn begin_edit(&self, kind: EntityKind, id: EntityId) -> ClientResult<()> {
        let result = match kind {
            EntityKind::Product => self.products.store.get(id).map(|product| {
                // The product list only joins names; recover the ids
                let product = product.resolve_references(
                    &self.categories.store.snapshot(),
                    &self.suppliers.store.snapshot(),
                );
                self.products.form().begin_edit(&product)
            }),
            _ => with_pane!(self, kind, |pane| pane
                .store
                .get(id)
                .map(|entity| pane.form().begin_edit(&entity))),
        };

        match result {
            Some(Ok(())) => {
                debug!(%kind, id, "Editing");
                Ok(())
            }
            Some(Err(err)) => Err(self.observe(err.into())),
            None => Err(self.observe(ClientError::InvalidReference { kind, id })),
        }
    }

    /// Sets one field of a form.
    pub fn set_field(&self, kind: EntityKind, field: &str, value: &str) -> ClientResult<()> {
        with_pane!(self, kind, |pane| pane.form().fields_mut().set_field(field, value))
            .map_err(|err| self.observe(err.into()))
    }

    /// Resets a form to create mode without submitting.
    pub fn clear_form(&self, kind: EntityKind) {
        with_pane!(self, kind, |pane| pane.form().clear())
    }

    /// Submits a form: POST in create mode, PUT in edit mode.
    ///
    /// On success the form is reset, the collection and dashboard are
    /// reloaded, and the server's message is announced. On failure the form
    /// keeps every value and nothing is reloaded.
    pub async fn submit_form(&self, kind: EntityKind) -> ClientResult<Submitted> {
        let submitted = match kind {
            EntityKind::Supplier => self.submit(&self.suppliers).await,
            EntityKind::Category => self.submit(&self.categories).await,
            EntityKind::Product => self.submit(&self.products).await,
        }?;

        if kind == EntityKind::Product {
            replace(&self.currency_selector, self.currencies.selector());
        }
        Ok(submitted)
    }

    async fn submit<F: EntityForm>(&self, pane: &EntityPane<F>) -> ClientResult<Submitted> {
        let kind = <F::Entity as Entity>::KIND;
        let submission = pane
            .form()
            .submit()
            .map_err(|err| self.observe(err.into()))?;

        let (message, id) = match submission.method {
            SubmitMethod::Create => {
                let ack = pane
                    .store
                    .create(&submission.payload)
                    .await
                    .map_err(|err| self.reject(pane, err))?;
                self.accept(pane, &ack.message).await;

                let id = pane
                    .store
                    .find_created(&ack, &submission.payload)
                    .map(|entity| entity.id());
                if id.is_none() {
                    warn!(%kind, "Created entity missing from the reloaded list");
                }
                (ack.message, id)
            }
            SubmitMethod::Update(id) => {
                let saved = pane
                    .store
                    .update(id, &submission.payload)
                    .await
                    .map_err(|err| self.reject(pane, err))?;
                self.accept(pane, &saved.message).await;
                (saved.message, Some(id))
            }
        };

        info!(%kind, ?id, "Submission accepted");
        Ok(Submitted { kind, id, message })
    }

    /// The server took the submission: reset the form, announce, reload.
    async fn accept<F: EntityForm>(&self, pane: &EntityPane<F>, message: &str) {
        let kind = <F::Entity as Entity>::KIND;
        pane.form().complete();
        self.notify_success(message, kind);
        self.after_mutation(kind).await;
    }

    /// The server refused or never answered: keep every form value.
    fn reject<F: EntityForm>(&self, pane: &EntityPane<F>, err: ClientError) -> ClientError {
        pane.form().abort();
        self.observe(err)
    }

    /// Deletes an entity, then reloads its collection and the dashboard.
    pub async fn delete(&self, kind: EntityKind, id: EntityId) -> ClientResult<Ack> {
        let result = with_pane!(self, kind, |pane| pane.store.delete(id).await);
        match result {
            Ok(ack) => {
                self.notify_success(&ack.message, kind);
                self.after_mutation(kind).await;
                Ok(ack)
            }
            Err(err) => Err(self.observe(err)),
        }
    }

    /// Reload of the mutated collection and the dashboard. Failures were
    /// already announced by the gateway and do not undo the mutation.
    async fn after_mutation(&self, kind: EntityKind) {
        if let Err(err) = self.run_loads(vec![LoadCommand::Reload(kind), LoadCommand::RefreshSummary]).await {
            warn!(%kind, error = %err, "Reload after mutation failed");
        }
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Logs in and loads the current section.
    pub async fn login(&self, credentials: &Credentials) -> ClientResult<AuthAck> {
        let ack = self
            .auth
            .login(credentials)
            .await
            .map_err(|err| self.observe(err))?;
        replace(&self.session, SessionState::Active);
        self.notifier.notify(Notice::success(
            ack.message.clone().unwrap_or_else(|| "Login successful".to_string()),
        ));
        if let Err(err) = self.refresh().await {
            warn!(error = %err, "Initial load after login failed");
        }
        Ok(ack)
    }

    /// Logs in again after `SessionExpired` and re-runs the current
    /// section's loads, returning their first failure.
    pub async fn reauthenticate(&self, credentials: &Credentials) -> ClientResult<AuthAck> {
        let ack = self
            .auth
            .login(credentials)
            .await
            .map_err(|err| self.observe(err))?;
        replace(&self.session, SessionState::Active);
        info!(section = %self.current_section(), "Session restored");
        self.refresh().await?;
        Ok(ack)
    }

    pub async fn register(&self, signup: &Signup) -> ClientResult<Ack> {
        let ack = self
            .auth
            .register(signup)
            .await
            .map_err(|err| self.observe(err))?;
        self.notifier.notify(Notice::success(ack.message.clone()));
        Ok(ack)
    }

    pub async fn logout(&self) -> ClientResult<AuthAck> {
        let ack = self.auth.logout().await.map_err(|err| self.observe(err))?;
        replace(&self.session, SessionState::Anonymous);
        self.notifier.notify(Notice::success(
            ack.message
                .clone()
                .unwrap_or_else(|| "Logged out successfully".to_string()),
        ));
        Ok(ack)
    }

    // =========================================================================
    // Reporting
    // =========================================================================

    /// Records what an error means for the session and announces it if
    /// nobody else has.
    fn observe(&self, err: ClientError) -> ClientError {
        if let ClientError::SessionExpired { location } = &err {
            replace(
                &self.session,
                SessionState::Expired {
                    location: location.clone(),
                },
            );
        }
        if err.is_local() {
            warn!(error = %err, "Rejected locally");
            self.notifier.notify(Notice::error(err.user_message()));
        }
        err
    }

    fn notify_success(&self, message: &str, kind: EntityKind) {
        let message = if message.trim().is_empty() {
            format!("{kind} saved")
        } else {
            message.to_string()
        };
        self.notifier.notify(Notice::success(message));
    }

    // =========================================================================
    // Read Accessors
    // =========================================================================

    pub fn current_section(&self) -> Section {
        lock(&self.navigator).current()
    }

    pub fn is_visible(&self, section: Section) -> bool {
        lock(&self.navigator).is_visible(section)
    }

    pub fn header(&self) -> Header {
        lock(&self.navigator).header()
    }

    pub fn session(&self) -> SessionState {
        read(&self.session)
    }

    pub fn currencies(&self) -> &CurrencyTable {
        &self.currencies
    }

    /// The last summary from the server, if one was loaded.
    pub fn summary(&self) -> Option<DashboardSummary> {
        read(&self.summary)
    }

    /// Summary computed from the local snapshots. The employee count is
    /// taken from the last server summary.
    pub fn local_summary(&self) -> DashboardSummary {
        let employees = self.summary().map_or(0, |s| s.employee_count);
        DashboardSummary::from_snapshots(
            employees,
            &self.categories.store.snapshot(),
            &self.suppliers.store.snapshot(),
            &self.products.store.snapshot(),
        )
    }

    pub fn suppliers(&self) -> Vec<Supplier> {
        self.suppliers.store.snapshot()
    }

    pub fn categories(&self) -> Vec<Category> {
        self.categories.store.snapshot()
    }

    pub fn products(&self) -> Vec<Product> {
        self.products.store.snapshot()
    }

    pub fn supplier_rows(&self) -> Vec<SupplierRow> {
        self.suppliers().iter().map(SupplierRow::from_supplier).collect()
    }

    pub fn category_rows(&self) -> Vec<CategoryRow> {
        self.categories().iter().map(CategoryRow::from_category).collect()
    }

    pub fn product_rows(&self) -> Vec<ProductRow> {
        let categories = self.categories();
        let suppliers = self.suppliers();
        self.products()
            .iter()
            .map(|p| ProductRow::from_product(p, &self.currencies, &categories, &suppliers))
            .collect()
    }

    pub fn reference_options(&self) -> ReferenceOptions {
        read(&self.reference_options)
    }

    pub fn currency_selector(&self) -> CurrencySelector {
        read(&self.currency_selector)
    }

    pub fn form_view(&self, kind: EntityKind) -> FormView {
        with_pane!(self, kind, |pane| pane.view())
    }

    pub fn form_mode(&self, kind: EntityKind) -> FormMode {
        with_pane!(self, kind, |pane| pane.form().mode())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{RecordingNotifier, ScriptedTransport};
    use crate::transport::HttpMethod;
    use serde_json::{json, Value};

    fn app() -> (Application, Arc<ScriptedTransport>, Arc<RecordingNotifier>) {
        let transport = ScriptedTransport::new();
        let notifier = RecordingNotifier::new();
        let app = Application::new(transport.clone(), notifier.clone(), CurrencyTable::new());
        (app, transport, notifier)
    }

    fn summary() -> Value {
        json!({
            "total_employees": 2, "total_categories": 1, "total_suppliers": 1,
            "total_products": 1, "products_needing_restock": 1
        })
    }

    fn acme() -> Value {
        json!({"id": 7, "name": "Acme", "contact_person": "Wile", "phone": null, "email": null})
    }

    fn field(view: &FormView, name: &str) -> String {
        view.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
            .unwrap_or_default()
    }

    #[tokio::test]
    async fn test_start_loads_dashboard() {
        let (app, transport, _) = app();
        transport.respond(HttpMethod::Get, SUMMARY_PATH, 200, summary());

        app.start().await.unwrap();

        assert_eq!(app.current_section(), Section::Dashboard);
        assert_eq!(app.summary().unwrap().restock_count, 1);
        assert_eq!(transport.calls(), vec!["GET /api/dashboard_summary"]);
    }

    #[tokio::test]
    async fn test_products_section_runs_all_loads() {
        let (app, transport, _) = app();
        transport.respond(
            HttpMethod::Get,
            "/api/products",
            200,
            json!([{"id": 1, "name": "Widget", "price": 19.5, "currency_code": "USD",
                    "stock": 2, "safe_stock": 10, "category_name": null, "supplier_name": "Acme"}]),
        );
        transport.respond(
            HttpMethod::Get,
            "/api/categories",
            200,
            json!([{"id": 4, "name": "Tools"}]),
        );
        transport.respond(HttpMethod::Get, "/api/suppliers", 200, json!([acme()]));

        app.select_section(Section::Products).await.unwrap();

        assert_eq!(
            transport.calls(),
            vec!["GET /api/products", "GET /api/categories", "GET /api/suppliers"]
        );
        assert_eq!(app.header().title, "Product Management");
        let rows = app.product_rows();
        assert_eq!(rows[0].price, "$19.50");
        assert!(rows[0].low_stock);
        assert_eq!(rows[0].category, "N/A");
        assert_eq!(app.reference_options().categories.len(), 2);
        assert_eq!(app.currency_selector().selected(), Some("USD"));
    }

    #[tokio::test]
    async fn test_failed_load_still_runs_the_rest() {
        let (app, transport, notifier) = app();
        transport.fail(HttpMethod::Get, "/api/products");
        transport.respond(HttpMethod::Get, "/api/categories", 200, json!([]));
        transport.respond(HttpMethod::Get, "/api/suppliers", 200, json!([acme()]));

        let err = app.select_section(Section::Products).await.unwrap_err();

        assert!(matches!(err, ClientError::Transport(_)));
        assert_eq!(app.reference_options().suppliers.len(), 2);
        assert_eq!(notifier.messages(), vec!["Network error, please try again."]);
    }

    #[tokio::test]
    async fn test_create_supplier_then_edit_reproduces_fields() {
        let (app, transport, notifier) = app();
        transport.respond(
            HttpMethod::Post,
            "/api/suppliers",
            201,
            json!({"message": "Supplier added successfully"}),
        );
        transport.respond(HttpMethod::Get, "/api/suppliers", 200, json!([acme()]));
        transport.respond(HttpMethod::Get, SUMMARY_PATH, 200, summary());

        app.set_field(EntityKind::Supplier, "name", "Acme").unwrap();
        app.set_field(EntityKind::Supplier, "contact_person", "Wile").unwrap();
        let typed = app.form_view(EntityKind::Supplier).fields;

        let submitted = app.submit_form(EntityKind::Supplier).await.unwrap();
        assert_eq!(submitted.id, Some(7));
        assert_eq!(
            transport.calls(),
            vec!["POST /api/suppliers", "GET /api/suppliers", "GET /api/dashboard_summary"]
        );
        assert_eq!(app.form_mode(EntityKind::Supplier), FormMode::Create);
        assert_eq!(
            notifier.messages(),
            vec!["Supplier added successfully"]
        );

        app.begin_edit(EntityKind::Supplier, 7).unwrap();
        let view = app.form_view(EntityKind::Supplier);
        assert_eq!(view.fields, typed);
        assert_eq!(view.submit_label, "Update Supplier");
        assert_eq!(view.identifier, "7");
    }

    #[tokio::test]
    async fn test_stored_create_completes_when_reload_fails() {
        let (app, transport, notifier) = app();
        transport.respond(
            HttpMethod::Post,
            "/api/suppliers",
            201,
            json!({"message": "Supplier added successfully"}),
        );
        transport.fail(HttpMethod::Get, "/api/suppliers");
        transport.respond(HttpMethod::Get, SUMMARY_PATH, 200, summary());

        app.set_field(EntityKind::Supplier, "name", "Acme").unwrap();
        let submitted = app.submit_form(EntityKind::Supplier).await.unwrap();

        assert_eq!(submitted.id, None);
        assert_eq!(submitted.message, "Supplier added successfully");
        let view = app.form_view(EntityKind::Supplier);
        assert_eq!(view.mode, FormMode::Create);
        assert_eq!(field(&view, "name"), "");
        assert!(!view.in_flight);
        assert_eq!(
            notifier.messages(),
            vec!["Supplier added successfully", "Network error, please try again."]
        );
        assert_eq!(app.summary().unwrap().supplier_count, 1);
        assert_eq!(
            transport.calls(),
            vec!["POST /api/suppliers", "GET /api/suppliers", "GET /api/dashboard_summary"]
        );
    }

    #[tokio::test]
    async fn test_create_missing_from_reload_still_succeeds() {
        let (app, transport, notifier) = app();
        transport.respond(
            HttpMethod::Post,
            "/api/categories",
            201,
            json!({"message": "Category added successfully"}),
        );
        transport.respond(HttpMethod::Get, "/api/categories", 200, json!([]));
        transport.respond(HttpMethod::Get, SUMMARY_PATH, 200, summary());

        app.set_field(EntityKind::Category, "name", "Ghost").unwrap();
        let submitted = app.submit_form(EntityKind::Category).await.unwrap();

        assert_eq!(submitted.id, None);
        assert_eq!(app.form_mode(EntityKind::Category), FormMode::Create);
        assert_eq!(notifier.messages(), vec!["Category added successfully"]);
    }

    #[tokio::test]
    async fn test_edit_submit_issues_put_and_resets() {
        let (app, transport, _) = app();
        transport.respond(HttpMethod::Get, "/api/suppliers", 200, json!([acme()]));
        transport.respond(
            HttpMethod::Put,
            "/api/suppliers/7",
            200,
            json!({"message": "Supplier updated successfully"}),
        );
        transport.respond(HttpMethod::Get, "/api/suppliers", 200, json!([acme()]));
        transport.respond(HttpMethod::Get, SUMMARY_PATH, 200, summary());

        app.select_section(Section::Suppliers).await.unwrap();
        app.begin_edit(EntityKind::Supplier, 7).unwrap();
        app.set_field(EntityKind::Supplier, "phone", "555-0100").unwrap();
        app.submit_form(EntityKind::Supplier).await.unwrap();

        let calls = transport.calls();
        assert!(calls.contains(&"PUT /api/suppliers/7".to_string()));
        assert_eq!(
            transport.requests()[1].body.as_ref().unwrap()["phone"],
            json!("555-0100")
        );
        let view = app.form_view(EntityKind::Supplier);
        assert_eq!(view.mode, FormMode::Create);
        assert_eq!(view.identifier, "");
        assert_eq!(view.submit_label, "Add Supplier");
    }

    #[tokio::test]
    async fn test_failed_update_keeps_form_and_snapshot() {
        let (app, transport, notifier) = app();
        transport.respond(HttpMethod::Get, "/api/suppliers", 200, json!([acme()]));
        transport.respond(
            HttpMethod::Put,
            "/api/suppliers/7",
            409,
            json!({"message": "Supplier with this name already exists"}),
        );

        app.select_section(Section::Suppliers).await.unwrap();
        app.begin_edit(EntityKind::Supplier, 7).unwrap();
        app.set_field(EntityKind::Supplier, "name", "Globex").unwrap();
        let err = app.submit_form(EntityKind::Supplier).await.unwrap_err();

        assert!(matches!(err, ClientError::Api { status: 409, .. }));
        let view = app.form_view(EntityKind::Supplier);
        assert_eq!(view.mode, FormMode::Edit(7));
        assert_eq!(field(&view, "name"), "Globex");
        assert!(!view.in_flight);
        assert_eq!(app.suppliers()[0].name, "Acme");
        // announced once, by the gateway
        assert_eq!(
            notifier.messages(),
            vec!["Supplier with this name already exists"]
        );
        // no reload after the failure
        assert_eq!(transport.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_validation_error_is_announced_locally() {
        let (app, transport, notifier) = app();
        app.set_field(EntityKind::Product, "name", "Widget").unwrap();
        app.set_field(EntityKind::Product, "price", "cheap").unwrap();
        app.set_field(EntityKind::Product, "stock", "3").unwrap();

        let err = app.submit_form(EntityKind::Product).await.unwrap_err();

        assert!(matches!(err, ClientError::Validation(_)));
        assert!(transport.requests().is_empty());
        assert_eq!(
            notifier.messages(),
            vec!["price must be a number, got 'cheap'"]
        );
    }

    #[tokio::test]
    async fn test_begin_edit_unknown_id() {
        let (app, _, notifier) = app();
        let err = app.begin_edit(EntityKind::Category, 42).unwrap_err();

        assert!(matches!(err, ClientError::InvalidReference { id: 42, .. }));
        assert_eq!(
            notifier.messages(),
            vec!["Category 42 is not in the current list"]
        );
    }

    #[tokio::test]
    async fn test_product_edit_resolves_reference_ids() {
        let (app, transport, _) = app();
        transport.respond(
            HttpMethod::Get,
            "/api/products",
            200,
            json!([{"id": 1, "name": "Widget", "price": 2, "currency_code": "EUR",
                    "stock": 20, "safe_stock": 10, "category_name": "Tools", "supplier_name": null}]),
        );
        transport.respond(
            HttpMethod::Get,
            "/api/categories",
            200,
            json!([{"id": 4, "name": "Tools"}]),
        );
        transport.respond(HttpMethod::Get, "/api/suppliers", 200, json!([]));

        app.select_section(Section::Products).await.unwrap();
        app.begin_edit(EntityKind::Product, 1).unwrap();

        let view = app.form_view(EntityKind::Product);
        assert_eq!(field(&view, "category_id"), "4");
        assert_eq!(field(&view, "supplier_id"), "");
        assert_eq!(field(&view, "currency_code"), "EUR");
        assert_eq!(field(&view, "price"), "2.00");
    }

    #[tokio::test]
    async fn test_reload_resets_orphaned_edit() {
        let (app, transport, _) = app();
        transport.respond(HttpMethod::Get, "/api/suppliers", 200, json!([acme()]));
        transport.respond(HttpMethod::Get, "/api/suppliers", 200, json!([]));

        app.select_section(Section::Suppliers).await.unwrap();
        app.begin_edit(EntityKind::Supplier, 7).unwrap();
        app.select_section(Section::Suppliers).await.unwrap();

        assert_eq!(app.form_mode(EntityKind::Supplier), FormMode::Create);
    }

    #[tokio::test]
    async fn test_delete_reloads_collection_and_summary() {
        let (app, transport, notifier) = app();
        transport.respond(
            HttpMethod::Delete,
            "/api/categories/4",
            200,
            json!({"message": "Category deleted successfully"}),
        );
        transport.respond(HttpMethod::Get, "/api/categories", 200, json!([]));
        transport.respond(HttpMethod::Get, SUMMARY_PATH, 200, summary());

        app.delete(EntityKind::Category, 4).await.unwrap();

        assert_eq!(
            transport.calls(),
            vec![
                "DELETE /api/categories/4",
                "GET /api/categories",
                "GET /api/dashboard_summary"
            ]
        );
        assert_eq!(notifier.messages(), vec!["Category deleted successfully"]);
    }

    #[tokio::test]
    async fn test_failed_delete_changes_nothing() {
        let (app, transport, notifier) = app();
        transport.respond(HttpMethod::Get, "/api/suppliers", 200, json!([acme()]));
        transport.respond(
            HttpMethod::Delete,
            "/api/suppliers/7",
            404,
            json!({"message": "Supplier not found"}),
        );

        app.select_section(Section::Suppliers).await.unwrap();
        app.begin_edit(EntityKind::Supplier, 7).unwrap();
        app.set_field(EntityKind::Supplier, "phone", "555-0100").unwrap();

        let err = app.delete(EntityKind::Supplier, 7).await.unwrap_err();

        assert!(matches!(err, ClientError::Api { status: 404, .. }));
        assert_eq!(
            transport.calls(),
            vec!["GET /api/suppliers", "DELETE /api/suppliers/7"]
        );
        assert_eq!(app.suppliers().len(), 1);
        assert_eq!(app.suppliers()[0].name, "Acme");
        assert!(app.summary().is_none());
        assert_eq!(notifier.messages(), vec!["Supplier not found"]);

        let view = app.form_view(EntityKind::Supplier);
        assert_eq!(view.mode, FormMode::Edit(7));
        assert_eq!(field(&view, "phone"), "555-0100");
    }

    #[tokio::test]
    async fn test_session_expiry_and_reauthentication() {
        let (app, transport, notifier) = app();
        transport.redirect(HttpMethod::Get, "/api/suppliers", "/login.html");
        transport.respond(
            HttpMethod::Post,
            "/api/login",
            200,
            json!({"message": "Login successful"}),
        );
        transport.respond(HttpMethod::Get, "/api/suppliers", 200, json!([acme()]));

        let err = app.select_section(Section::Suppliers).await.unwrap_err();
        assert!(err.is_session_expired());
        assert_eq!(
            app.session(),
            SessionState::Expired {
                location: Some("/login.html".to_string())
            }
        );
        assert_eq!(
            notifier.messages(),
            vec!["Session expired, please log in again."]
        );

        app.reauthenticate(&Credentials::new("E100", "secret"))
            .await
            .unwrap();

        assert_eq!(app.session(), SessionState::Active);
        assert_eq!(app.suppliers().len(), 1);
        assert_eq!(app.current_section(), Section::Suppliers);
    }

    #[tokio::test]
    async fn test_unauthorized_list_expires_session() {
        let (app, transport, _) = app();
        transport.respond(
            HttpMethod::Get,
            SUMMARY_PATH,
            401,
            json!({"message": "Unauthorized, please log in."}),
        );

        let err = app.start().await.unwrap_err();

        assert!(err.is_session_expired());
        assert_eq!(app.session(), SessionState::Expired { location: None });
    }

    #[tokio::test]
    async fn test_login_and_logout() {
        let (app, transport, notifier) = app();
        transport.redirect(HttpMethod::Post, "/api/login", "/dashboard.html");
        transport.respond(HttpMethod::Get, SUMMARY_PATH, 200, summary());
        transport.respond(
            HttpMethod::Post,
            "/api/logout",
            200,
            json!({"message": "Logged out successfully"}),
        );

        app.login(&Credentials::new("E100", "secret")).await.unwrap();
        assert_eq!(app.session(), SessionState::Active);
        assert!(app.summary().is_some());

        app.logout().await.unwrap();
        assert_eq!(app.session(), SessionState::Anonymous);
        assert_eq!(
            notifier.messages(),
            vec!["Login successful", "Logged out successfully"]
        );
    }

    #[tokio::test]
    async fn test_local_summary_from_snapshots() {
        let (app, transport, _) = app();
        transport.respond(
            HttpMethod::Get,
            "/api/products",
            200,
            json!([
                {"id": 1, "name": "A", "price": 1, "stock": 1, "safe_stock": 10},
                {"id": 2, "name": "B", "price": 1, "stock": 9, "safe_stock": 10}
            ]),
        );
        transport.respond(HttpMethod::Get, "/api/categories", 200, json!([]));
        transport.respond(HttpMethod::Get, "/api/suppliers", 200, json!([acme()]));

        app.select_section(Section::Products).await.unwrap();
        let local = app.local_summary();

        assert_eq!(local.product_count, 2);
        assert_eq!(local.restock_count, 1);
        assert_eq!(local.supplier_count, 1);
    }
}
