use crate::application::persist::{MigrationReport, PersistUseCase};
use crate::application::store::{ConfirmationStore, ImportSummary};
use crate::domain::entities::trade::Trade;
use crate::domain::error::DomainError;
use crate::domain::ports::trade_source::TradeSource;
use crate::domain::values::trade_kind::TradeKind;
use crate::infrastructure::parsers::{fixed, generic};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{error, info};

pub type SharedStore = Arc<Mutex<ConfirmationStore>>;

/// Locks the store. A poisoned lock still holds consistent data, since every
/// mutation validates before it writes.
pub fn lock_store(store: &SharedStore) -> MutexGuard<'_, ConfirmationStore> {
    store.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadReport {
    pub equity: Option<ImportSummary>,
    pub fx: Option<ImportSummary>,
    pub errors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub migration: Option<MigrationReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadReport {
    pub trade_type: TradeKind,
    pub import: ImportSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub migration: Option<MigrationReport>,
}

/// The one path by which trades enter the system. Every batch goes into the
/// in-memory store first; persistence, when asked for, copies what the store accepted.
pub struct IngestUseCase {
    store: SharedStore,
    persist: PersistUseCase,
}

impl IngestUseCase {
    pub fn new(store: SharedStore, persist: PersistUseCase) -> Self {
        Self { store, persist }
    }

    /// Loads both fixed-position datasets. A source that cannot be fetched or parsed
    /// leaves its collection as it was.
    pub async fn load(
        &self,
        equity: &dyn TradeSource,
        fx: &dyn TradeSource,
        persist: bool,
    ) -> LoadReport {
        let mut report = LoadReport::default();

        match fetch_and_parse(equity, fixed::parse_equity).await {
            Ok(trades) => report.equity = Some(lock_store(&self.store).replace_equity(trades)),
            Err(e) => {
                error!(source = %equity.describe(), error = %e, "equity load failed");
                report.errors.push(format!("equity: {e}"));
            }
        }
        match fetch_and_parse(fx, fixed::parse_fx).await {
            Ok(trades) => report.fx = Some(lock_store(&self.store).replace_fx(trades)),
            Err(e) => {
                error!(source = %fx.describe(), error = %e, "FX load failed");
                report.errors.push(format!("fx: {e}"));
            }
        }

        if persist {
            let trades = lock_store(&self.store).trades().to_vec();
            report.migration = Some(self.persist.migrate(&trades));
        }
        report
    }

    /// Imports an uploaded sheet through the header-matched parser.
    pub fn upload(&self, text: &str, persist: bool) -> Result<UploadReport, DomainError> {
        let batch = generic::parse_upload(text)?;
        let trade_type = batch.first().map(Trade::kind).unwrap_or(TradeKind::Equity);

        let (import, accepted) = {
            let mut store = lock_store(&self.store);
            let import = store.import(batch);
            let accepted: Vec<Trade> = import
                .admitted
                .iter()
                .filter_map(|id| store.trade(id).cloned())
                .collect();
            (import, accepted)
        };

        let migration = persist.then(|| self.persist.migrate(&accepted));
        info!(%trade_type, imported = import.imported, "upload ingested");
        Ok(UploadReport {
            trade_type,
            import,
            migration,
        })
    }

    /// Adds a single trade: into the store (enriched) and into the database together
    /// with its workflow projection. The store's checks run before anything is written,
    /// and the store only takes the trade once the database has. Nothing is kept if
    /// either side rejects it.
    pub fn add_trade(&self, trade: Trade) -> Result<Trade, DomainError> {
        let mut store = lock_store(&self.store);
        let admission = store.prepare(trade)?;
        self.persist.persist(admission.trade())?;
        let added = store.commit(admission)?.clone();
        info!(trade_id = added.trade_id(), kind = %added.kind(), "trade added");
        Ok(added)
    }
}

async fn fetch_and_parse<T>(
    source: &dyn TradeSource,
    parse: fn(&str) -> Result<Vec<T>, DomainError>,
) -> Result<Vec<T>, DomainError> {
    let text = source.fetch().await?;
    let trades = parse(&text)?;
    info!(source = %source.describe(), trades = trades.len(), "dataset fetched");
    Ok(trades)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::enrichment::tests::ScriptedRandom;
    use crate::application::enrichment::EnrichmentPolicy;
    use crate::domain::ports::trade_repository::TradeRepository;
    use crate::infrastructure::sources::inline::InlineSource;
    use crate::infrastructure::sqlite::{open, trade_repo::SqliteTradeRepo, workflow_repo::SqliteWorkflowRepo};

    const EQUITY_HEADER: &str = "TradeID,OrderID,ClientID,ISIN,Symbol,Side,Quantity,Price,TradeValue,Currency,TradeDate,SettlementDate,SettlementStatus,Counterparty,TradingVenue,TraderName,KYCStatus,ReferenceDataValidated,Commission,Taxes,TotalCost,ConfirmationStatus,CountryOfTrade,OpsTeamNotes";

    fn equity_row(id: &str, status: &str) -> String {
        format!("{id},O1,C1,US0378331005,AAPL,Buy,100,10,1000,USD,2024-03-01,2024-03-05,Pending,JPM,NYSE,Alice,Verified,Yes,1,0,1001,{status},US,")
    }

    fn use_case() -> (IngestUseCase, SharedStore, Arc<SqliteTradeRepo>) {
        let conn = open(":memory:").unwrap();
        let repo = Arc::new(SqliteTradeRepo::new(conn.clone()));
        let persist = PersistUseCase::new(repo.clone(), Arc::new(SqliteWorkflowRepo::new(conn)));
        let store = Arc::new(Mutex::new(ConfirmationStore::new(
            EnrichmentPolicy::default(),
            Box::new(ScriptedRandom::new(&[0.5])),
        )));
        (IngestUseCase::new(store.clone(), persist), store, repo)
    }

    #[tokio::test]
    async fn failed_source_keeps_previous_collection() {
        let (ingest, store, _) = use_case();
        let csv = format!("{EQUITY_HEADER}\n{}\n{}\n", equity_row("E1", "Pending"), equity_row("E2", "Failed"));
        let equity = InlineSource::new("equity", csv);
        let empty_fx = InlineSource::new("fx", "");

        let report = ingest.load(&equity, &empty_fx, false).await;
        assert_eq!(report.equity.as_ref().map(|s| s.imported), Some(2));
        assert!(report.fx.is_none());
        assert_eq!(report.errors.len(), 1);

        let broken = InlineSource::new("equity", "   ");
        let report = ingest.load(&broken, &empty_fx, false).await;
        assert_eq!(report.errors.len(), 2);
        assert_eq!(lock_store(&store).trades().len(), 2);
    }

    #[tokio::test]
    async fn load_with_persist_migrates_everything() {
        let (ingest, _, _) = use_case();
        let csv = format!("{EQUITY_HEADER}\n{}\n", equity_row("E1", "Settled"));
        let report = ingest
            .load(&InlineSource::new("equity", csv), &InlineSource::new("fx", ""), true)
            .await;
        let migration = report.migration.unwrap();
        assert_eq!(migration.trades_inserted, 1);
        assert_eq!(migration.workflows_inserted, 1);
        assert!(migration.errors.is_empty());
    }

    #[test]
    fn upload_uses_header_matching() {
        let (ingest, store, _) = use_case();
        let report = ingest
            .upload("Trade Ref,Qty,Price,Counterparty\nU1,5,2,Citi\n,7,3,UBS\n", true)
            .unwrap();
        assert_eq!(report.trade_type, TradeKind::Equity);
        assert_eq!(report.import.imported, 2);
        assert_eq!(report.migration.unwrap().trades_inserted, 2);
        assert!(lock_store(&store).trade("TRADE_2").is_some());
    }

    #[test]
    fn add_trade_rejects_duplicates_everywhere() {
        let (ingest, store, _) = use_case();
        let trade = Trade::Equity(crate::application::enrichment::tests::equity(
            "M1",
            crate::domain::values::confirmation_status::ConfirmationStatus::Pending,
            50.0,
        ));
        let added = ingest.add_trade(trade.clone()).unwrap();
        assert!(added.enrichment().is_some());
        assert!(matches!(ingest.add_trade(trade), Err(DomainError::Duplicate(_))));
        assert_eq!(lock_store(&store).trades().len(), 1);
    }

    #[test]
    fn rejected_trade_never_reaches_the_database() {
        let (ingest, store, repo) = use_case();
        let trade = Trade::Equity(crate::application::enrichment::tests::equity(
            "M1",
            crate::domain::values::confirmation_status::ConfirmationStatus::Disputed,
            50.0,
        ));
        assert!(matches!(ingest.add_trade(trade), Err(DomainError::InvalidInput(_))));
        assert!(lock_store(&store).trades().is_empty());
        assert!(repo.list_equity().unwrap().is_empty());
        assert!(repo.status_counts().unwrap().is_empty());
    }

    #[test]
    fn upload_persists_first_of_repeated_ids() {
        let (ingest, store, repo) = use_case();
        let report = ingest
            .upload("Trade ID,Qty,Price\nD1,1,1\nD1,2,2\n", true)
            .unwrap();
        assert_eq!(report.import.imported, 1);
        assert_eq!(report.import.skipped_duplicates, vec!["D1".to_string()]);
        assert_eq!(report.migration.unwrap().trades_inserted, 1);

        let persisted = repo.list_equity().unwrap();
        assert_eq!(persisted.len(), 1);
        assert_eq!(persisted[0].quantity, 1.0);
        assert!(lock_store(&store).trade("D1").is_some());
    }
}
