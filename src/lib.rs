pub mod api;
pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

use crate::application::enrichment::EnrichmentPolicy;
use crate::application::filter::{self, DashboardSummary, Facets, FilterCriteria};
use crate::application::ingest::{lock_store, IngestUseCase, LoadReport, SharedStore, UploadReport};
use crate::application::persist::{MigrationReport, PersistUseCase};
use crate::application::stats::{DashboardStats, StatsUseCase};
use crate::application::store::ConfirmationStore;
use crate::config::AppConfig;
use crate::domain::entities::document_status::{DocumentInfo, DocumentStatus, DocumentType, DocumentUpdate};
use crate::domain::entities::failure_analysis::FailureAnalysis;
use crate::domain::entities::trade::{EquityTrade, FxTrade, Trade};
use crate::domain::entities::workflow::{TradeWorkflow, WorkflowAction};
use crate::domain::error::DomainError;
use crate::domain::ports::random_source::RandomSource;
use crate::domain::ports::trade_repository::TradeRepository;
use crate::domain::ports::trade_source::TradeSource;
use crate::domain::ports::workflow_repository::{StoredStep, StoredWorkflow, WorkflowRepository};
use crate::infrastructure::random::SeededRandom;
use crate::infrastructure::sources;
use crate::infrastructure::sqlite::trade_repo::SqliteTradeRepo;
use crate::infrastructure::sqlite::workflow_repo::SqliteWorkflowRepo;
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex};

/// Everything the desk does, behind one handle shared by the CLI and the HTTP API.
pub struct ConfirmDesk {
    store: SharedStore,
    ingest_uc: IngestUseCase,
    persist_uc: PersistUseCase,
    stats_uc: StatsUseCase,
    trade_repo: Arc<dyn TradeRepository>,
    workflow_repo: Arc<dyn WorkflowRepository>,
    equity_source: Arc<dyn TradeSource>,
    fx_source: Arc<dyn TradeSource>,
}

impl ConfirmDesk {
    pub fn new(config: &AppConfig) -> Result<Self, DomainError> {
        Self::with_parts(
            &config.db_path,
            EnrichmentPolicy::with_break_weight(config.economic_break_weight),
            Box::new(SeededRandom::new(config.seed)),
            sources::from_location(&config.equity_source),
            sources::from_location(&config.fx_source),
        )
    }

    /// Desk with the default policy and dataset locations.
    pub fn open(db_path: &str, seed: Option<u64>) -> Result<Self, DomainError> {
        let config = AppConfig {
            db_path: db_path.to_string(),
            seed,
            ..AppConfig::default()
        };
        Self::new(&config)
    }

    pub fn with_parts(
        db_path: &str,
        policy: EnrichmentPolicy,
        rng: Box<dyn RandomSource>,
        equity_source: Arc<dyn TradeSource>,
        fx_source: Arc<dyn TradeSource>,
    ) -> Result<Self, DomainError> {
        let conn = infrastructure::sqlite::open(db_path)?;
        let trade_repo: Arc<dyn TradeRepository> = Arc::new(SqliteTradeRepo::new(conn.clone()));
        let workflow_repo: Arc<dyn WorkflowRepository> = Arc::new(SqliteWorkflowRepo::new(conn));

        let store: SharedStore = Arc::new(Mutex::new(ConfirmationStore::new(policy, rng)));
        let persist_uc = PersistUseCase::new(trade_repo.clone(), workflow_repo.clone());

        Ok(Self {
            ingest_uc: IngestUseCase::new(store.clone(), persist_uc.clone()),
            stats_uc: StatsUseCase::new(trade_repo.clone(), workflow_repo.clone()),
            store,
            persist_uc,
            trade_repo,
            workflow_repo,
            equity_source,
            fx_source,
        })
    }

    // Ingestion

    pub async fn load(&self, persist: bool) -> LoadReport {
        self.ingest_uc
            .load(self.equity_source.as_ref(), self.fx_source.as_ref(), persist)
            .await
    }

    pub fn upload(&self, csv_text: &str, persist: bool) -> Result<UploadReport, DomainError> {
        self.ingest_uc.upload(csv_text, persist)
    }

    pub fn add_trade(&self, trade: Trade) -> Result<Trade, DomainError> {
        self.ingest_uc.add_trade(trade)
    }

    /// Copies every trade currently in memory to the database.
    pub fn migrate(&self) -> MigrationReport {
        let trades = lock_store(&self.store).trades().to_vec();
        self.persist_uc.migrate(&trades)
    }

    // Persisted copy

    pub fn persisted_equity(&self) -> Result<Vec<EquityTrade>, DomainError> {
        self.trade_repo.list_equity()
    }

    pub fn persisted_fx(&self) -> Result<Vec<FxTrade>, DomainError> {
        self.trade_repo.list_fx()
    }

    pub fn persisted_trade(&self, trade_id: &str) -> Result<Option<Trade>, DomainError> {
        self.trade_repo.get_trade(trade_id)
    }

    pub fn persisted_workflows(&self) -> Result<Vec<StoredWorkflow>, DomainError> {
        self.workflow_repo.list_workflows()
    }

    pub fn persisted_steps(&self) -> Result<Vec<StoredStep>, DomainError> {
        self.workflow_repo.list_steps()
    }

    pub fn add_workflow(&self, workflow: &TradeWorkflow) -> Result<i64, DomainError> {
        self.persist_uc.add_workflow(workflow)
    }

    pub fn stats(&self) -> Result<DashboardStats, DomainError> {
        self.stats_uc.stats()
    }

    // Dashboard views

    pub fn trades(&self, criteria: &FilterCriteria) -> Vec<Trade> {
        let store = lock_store(&self.store);
        criteria.apply(&store).into_iter().cloned().collect()
    }

    pub fn summary(&self, criteria: &FilterCriteria) -> DashboardSummary {
        filter::summarize(&lock_store(&self.store), criteria)
    }

    pub fn facets(&self) -> Facets {
        filter::facets(lock_store(&self.store).trades())
    }

    pub fn workflows(&self) -> Vec<TradeWorkflow> {
        lock_store(&self.store).workflows()
    }

    pub fn actions(&self, now: DateTime<Utc>) -> Vec<WorkflowAction> {
        lock_store(&self.store).workflow_actions(now)
    }

    pub fn failures(&self) -> Vec<FailureAnalysis> {
        lock_store(&self.store).failures().to_vec()
    }

    pub fn document(&self, trade_id: &str) -> Result<DocumentStatus, DomainError> {
        lock_store(&self.store).document(trade_id)
    }

    // Dashboard actions

    pub fn resolve_failure(&self, trade_id: &str) -> Result<FailureAnalysis, DomainError> {
        lock_store(&self.store).resolve_failure(trade_id)
    }

    pub fn escalate_failure(&self, trade_id: &str) -> Result<FailureAnalysis, DomainError> {
        lock_store(&self.store).escalate_failure(trade_id)
    }

    pub fn mark_sent_to_settlements(&self, trade_id: &str) -> Result<Trade, DomainError> {
        lock_store(&self.store).mark_sent_to_settlements(trade_id)
    }

    pub fn update_document(
        &self,
        trade_id: &str,
        doc: DocumentType,
        update: &DocumentUpdate,
    ) -> Result<DocumentInfo, DomainError> {
        lock_store(&self.store).update_document(trade_id, doc, update)
    }
}
