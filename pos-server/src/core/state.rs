use std::sync::Arc;

use crate::auth::JwtService;
use crate::core::{Config, Result};
use crate::orders::OrderEngine;
use crate::reporting::{PdfReceiptRenderer, ReceiptRenderer, ReportRenderer, XlsxReportRenderer};
use crate::repository::{
    CategoryRepository, CourierRepository, CustomerRepository, DiningTableRepository,
    OrderRepository, ProductRepository, UserRepository,
};
use crate::store::{DocumentStore, RedbStore};

/// Server state shared by every handler
///
/// Cheap to clone: every field is an `Arc` or a handle over one.
///
/// | Field | Purpose |
/// |-------|---------|
/// | config | immutable settings |
/// | store | document store (redb) |
/// | jwt_service | token issue and validation |
/// | engine | order lifecycle and resource allocation |
/// | receipts / reports | document renderers |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub store: Arc<dyn DocumentStore>,
    pub jwt_service: Arc<JwtService>,
    pub engine: OrderEngine,
    pub receipts: Arc<dyn ReceiptRenderer>,
    pub reports: Arc<dyn ReportRenderer>,
}

impl std::fmt::Debug for ServerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerState")
            .field("config", &self.config)
            .field("engine", &self.engine)
            .finish_non_exhaustive()
    }
}

impl ServerState {
    /// Assemble state over an already opened store
    pub fn new(config: Config, store: Arc<dyn DocumentStore>) -> Self {
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let engine = OrderEngine::new(store.clone());
        let receipts: Arc<dyn ReceiptRenderer> =
            Arc::new(PdfReceiptRenderer::new(config.restaurant_name.clone()));
        let reports: Arc<dyn ReportRenderer> = Arc::new(XlsxReportRenderer);

        Self {
            config,
            store,
            jwt_service,
            engine,
            receipts,
            reports,
        }
    }

    /// Open the store under `work_dir` and build the state
    ///
    /// Creates the work directory when missing.
    pub fn initialize(config: &Config) -> Result<Self> {
        std::fs::create_dir_all(&config.work_dir)?;
        let store = RedbStore::open(config.db_path(), config.store_timeout())?;
        tracing::info!(path = %config.db_path().display(), "Store opened");
        Ok(Self::new(config.clone(), Arc::new(store)))
    }

    /// Replace the document renderers
    pub fn with_renderers(
        mut self,
        receipts: Arc<dyn ReceiptRenderer>,
        reports: Arc<dyn ReportRenderer>,
    ) -> Self {
        self.receipts = receipts;
        self.reports = reports;
        self
    }

    pub fn jwt_service(&self) -> &JwtService {
        &self.jwt_service
    }

    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.store.clone())
    }

    pub fn categories(&self) -> CategoryRepository {
        CategoryRepository::new(self.store.clone())
    }

    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.store.clone())
    }

    pub fn tables(&self) -> DiningTableRepository {
        DiningTableRepository::new(self.store.clone())
    }

    pub fn customers(&self) -> CustomerRepository {
        CustomerRepository::new(self.store.clone())
    }

    pub fn couriers(&self) -> CourierRepository {
        CourierRepository::new(self.store.clone())
    }

    pub fn orders(&self) -> &OrderRepository {
        self.engine.orders()
    }
}
