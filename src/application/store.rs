use crate::application::enrichment::EnrichmentPolicy;
use crate::application::{documents, failure_analysis, workflow};
use crate::domain::entities::document_status::{DocumentInfo, DocumentStatus, DocumentType, DocumentUpdate};
use crate::domain::entities::failure_analysis::FailureAnalysis;
use crate::domain::entities::trade::{EquityTrade, FxTrade, Trade};
use crate::domain::entities::workflow::{TradeWorkflow, WorkflowAction};
use crate::domain::error::DomainError;
use crate::domain::ports::random_source::RandomSource;
use crate::domain::values::confirmation_status::ConfirmationStatus;
use crate::domain::values::document_bucket::DocumentBucket;
use crate::domain::values::trade_kind::TradeKind;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub imported: usize,
    pub failures_generated: usize,
    pub skipped_duplicates: Vec<String>,
    /// Ids admitted by this batch, in order.
    #[serde(skip)]
    pub admitted: Vec<String>,
}

/// In-memory state of the desk: trades with their derived records.
///
/// All changes go through the `&mut self` methods below. Workflows and actions are
/// never stored; they are derived from the current trades on every read.
pub struct ConfirmationStore {
    trades: Vec<Trade>,
    failures: Vec<FailureAnalysis>,
    documents: HashMap<String, DocumentStatus>,
    policy: EnrichmentPolicy,
    rng: Box<dyn RandomSource>,
}

impl ConfirmationStore {
    pub fn new(policy: EnrichmentPolicy, rng: Box<dyn RandomSource>) -> Self {
        Self {
            trades: Vec::new(),
            failures: Vec::new(),
            documents: HashMap::new(),
            policy,
            rng,
        }
    }

    pub fn policy(&self) -> &EnrichmentPolicy {
        &self.policy
    }

    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    pub fn trade(&self, trade_id: &str) -> Option<&Trade> {
        self.trades.iter().find(|t| t.trade_id() == trade_id)
    }

    pub fn failures(&self) -> &[FailureAnalysis] {
        &self.failures
    }

    pub fn failure(&self, trade_id: &str) -> Option<&FailureAnalysis> {
        self.failures.iter().find(|f| f.trade_id == trade_id)
    }

    /// Document pack for a known trade. Trades without a record get a blank pack.
    pub fn document(&self, trade_id: &str) -> Result<DocumentStatus, DomainError> {
        if self.trade(trade_id).is_none() {
            return Err(DomainError::NotFound(format!("trade {trade_id}")));
        }
        Ok(self
            .documents
            .get(trade_id)
            .cloned()
            .unwrap_or_else(|| documents::blank(trade_id)))
    }

    pub fn document_bucket(&self, trade_id: &str) -> DocumentBucket {
        self.documents
            .get(trade_id)
            .map(|d| d.completeness())
            .unwrap_or(DocumentBucket::Missing)
    }

    pub fn workflows(&self) -> Vec<TradeWorkflow> {
        self.trades.iter().map(workflow::derive_workflow).collect()
    }

    pub fn workflow_actions(&self, now: DateTime<Utc>) -> Vec<WorkflowAction> {
        workflow::generate_actions(&self.workflows(), now)
    }

    /// Replaces every equity trade (and its derived records) with `trades`.
    pub fn replace_equity(&mut self, trades: Vec<EquityTrade>) -> ImportSummary {
        self.drop_kind(TradeKind::Equity);
        self.import(trades.into_iter().map(Trade::Equity).collect())
    }

    /// Replaces every FX trade (and its derived records) with `trades`.
    pub fn replace_fx(&mut self, trades: Vec<FxTrade>) -> ImportSummary {
        self.drop_kind(TradeKind::Fx);
        self.import(trades.into_iter().map(Trade::Fx).collect())
    }

    /// Appends a batch, skipping ids that are already present.
    pub fn import(&mut self, trades: Vec<Trade>) -> ImportSummary {
        let mut summary = ImportSummary::default();
        for trade in trades {
            let trade_id = trade.trade_id().to_string();
            match self.admit(trade) {
                Ok(has_failure) => {
                    summary.imported += 1;
                    summary.admitted.push(trade_id);
                    if has_failure {
                        summary.failures_generated += 1;
                    }
                }
                Err(DomainError::Duplicate(_)) => {
                    warn!(trade_id = %trade_id, "skipping duplicate trade id");
                    summary.skipped_duplicates.push(trade_id);
                }
                Err(e) => warn!(trade_id = %trade_id, error = %e, "skipping trade"),
            }
        }
        info!(
            imported = summary.imported,
            failures = summary.failures_generated,
            duplicates = summary.skipped_duplicates.len(),
            "import complete"
        );
        summary
    }

    /// Adds one trade, enriched like any ingested row.
    pub fn add_trade(&mut self, trade: Trade) -> Result<&Trade, DomainError> {
        let admission = self.prepare(trade)?;
        self.commit(admission)
    }

    pub fn resolve_failure(&mut self, trade_id: &str) -> Result<FailureAnalysis, DomainError> {
        let failure = self.failure_mut(trade_id)?;
        failure.resolve()?;
        info!(trade_id, "failure resolved");
        Ok(failure.clone())
    }

    pub fn escalate_failure(&mut self, trade_id: &str) -> Result<FailureAnalysis, DomainError> {
        let failure = self.failure_mut(trade_id)?;
        failure.escalate()?;
        info!(trade_id, "failure escalated");
        Ok(failure.clone())
    }

    pub fn update_document(
        &mut self,
        trade_id: &str,
        doc: DocumentType,
        update: &DocumentUpdate,
    ) -> Result<DocumentInfo, DomainError> {
        if self.trade(trade_id).is_none() {
            return Err(DomainError::NotFound(format!("trade {trade_id}")));
        }
        let pack = self
            .documents
            .entry(trade_id.to_string())
            .or_insert_with(|| documents::blank(trade_id));
        let info = pack.apply(doc, update)?.clone();
        debug!(trade_id, document = %doc, version = info.version, "document updated");
        Ok(info)
    }

    /// Flags a Confirmed or Settled trade as handed over to settlements.
    pub fn mark_sent_to_settlements(&mut self, trade_id: &str) -> Result<Trade, DomainError> {
        let trade = self
            .trades
            .iter_mut()
            .find(|t| t.trade_id() == trade_id)
            .ok_or_else(|| DomainError::NotFound(format!("trade {trade_id}")))?;

        let status = trade.confirmation_status();
        if !matches!(status, ConfirmationStatus::Confirmed | ConfirmationStatus::Settled) {
            return Err(DomainError::InvalidTransition(format!(
                "trade {trade_id} is {status} and cannot be sent to settlements"
            )));
        }
        let enrichment = trade
            .enrichment_mut()
            .ok_or_else(|| DomainError::InvalidInput(format!("trade {trade_id} is not enriched")))?;
        if enrichment.sent_to_settlements {
            return Err(DomainError::InvalidTransition(format!(
                "trade {trade_id} was already sent to settlements"
            )));
        }
        enrichment.sent_to_settlements = true;
        enrichment.settlements_sent_at = Some(Utc::now());
        info!(trade_id, "sent to settlements");
        Ok(trade.clone())
    }

    fn failure_mut(&mut self, trade_id: &str) -> Result<&mut FailureAnalysis, DomainError> {
        self.failures
            .iter_mut()
            .find(|f| f.trade_id == trade_id)
            .ok_or_else(|| DomainError::NotFound(format!("failure analysis for trade {trade_id}")))
    }

    fn drop_kind(&mut self, kind: TradeKind) {
        let removed: Vec<String> = self
            .trades
            .iter()
            .filter(|t| t.kind() == kind)
            .map(|t| t.trade_id().to_string())
            .collect();
        self.trades.retain(|t| t.kind() != kind);
        self.failures.retain(|f| f.trade_kind != kind);
        for id in &removed {
            self.documents.remove(id);
        }
        debug!(%kind, removed = removed.len(), "cleared trades");
    }

    /// Runs every check on `trade` and derives its enrichment, failure analysis and
    /// documents without changing the store. Nothing is kept until [`Self::commit`].
    pub fn prepare(&mut self, mut trade: Trade) -> Result<Admission, DomainError> {
        let trade_id = trade.trade_id().to_string();
        if self.trade(&trade_id).is_some() {
            return Err(DomainError::Duplicate(trade_id));
        }
        let status = trade.confirmation_status();
        if !status.allowed_for(trade.kind()) {
            return Err(DomainError::InvalidInput(format!(
                "status {status} is not valid for {} trade {trade_id}",
                trade.kind()
            )));
        }

        let enrichment = self.policy.enrich(&trade, self.rng.as_mut());
        trade.set_enrichment(enrichment);

        let failure = failure_analysis::generate(&trade, &self.policy, self.rng.as_mut());
        if let (Some(f), Some(e)) = (&failure, trade.enrichment_mut()) {
            e.failure_reason = Some(f.reason.clone());
        }
        if !trade.enrichment().is_some_and(|e| e.is_consistent_with(status)) {
            return Err(DomainError::InvalidInput(format!(
                "enrichment for {trade_id} does not match status {status}"
            )));
        }

        Ok(Admission {
            documents: documents::generate(&trade_id, status),
            trade,
            failure,
        })
    }

    /// Adds a prepared trade with its derived records.
    pub fn commit(&mut self, admission: Admission) -> Result<&Trade, DomainError> {
        let Admission {
            trade,
            failure,
            documents,
        } = admission;
        let trade_id = trade.trade_id().to_string();
        if self.trade(&trade_id).is_some() {
            return Err(DomainError::Duplicate(trade_id));
        }
        self.documents.insert(trade_id, documents);
        if let Some(f) = failure {
            self.failures.push(f);
        }
        self.trades.push(trade);
        self.trades
            .last()
            .ok_or_else(|| DomainError::NotFound("trade just added".into()))
    }

    /// Prepares and commits in one step. Returns whether a failure analysis was created.
    fn admit(&mut self, trade: Trade) -> Result<bool, DomainError> {
        let admission = self.prepare(trade)?;
        let has_failure = admission.failure.is_some();
        self.commit(admission)?;
        Ok(has_failure)
    }
}

/// A validated, enriched trade waiting to be committed to the store.
#[derive(Debug, Clone)]
pub struct Admission {
    trade: Trade,
    failure: Option<FailureAnalysis>,
    documents: DocumentStatus,
}

impl Admission {
    pub fn trade(&self) -> &Trade {
        &self.trade
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::enrichment::tests::{equity, fx, ScriptedRandom};
    use crate::domain::entities::failure_analysis::FailureStatus;
    use crate::domain::entities::workflow::StepKind;
    use crate::domain::values::step_status::StepStatus;

    fn store() -> ConfirmationStore {
        ConfirmationStore::new(EnrichmentPolicy::default(), Box::new(ScriptedRandom::new(&[0.3])))
    }

    #[test]
    fn import_skips_duplicates() {
        let mut s = store();
        let summary = s.import(vec![
            Trade::Equity(equity("T1", ConfirmationStatus::Failed, 10.0)),
            Trade::Equity(equity("T2", ConfirmationStatus::Pending, 10.0)),
            Trade::Fx(fx("T1", ConfirmationStatus::Pending, "EUR/USD", "SWIFT")),
        ]);
        assert_eq!(summary.imported, 2);
        assert_eq!(summary.failures_generated, 1);
        assert_eq!(summary.skipped_duplicates, vec!["T1".to_string()]);
        assert_eq!(s.trades().len(), 2);
        assert_eq!(s.failures().len(), 1);
    }

    #[test]
    fn failure_reason_copied_onto_enrichment() {
        let mut s = store();
        s.add_trade(Trade::Equity(equity("T1", ConfirmationStatus::Failed, 10.0)))
            .unwrap();
        let reason = s.trade("T1").unwrap().enrichment().unwrap().failure_reason.clone();
        assert_eq!(reason, Some(s.failure("T1").unwrap().reason.clone()));
    }

    #[test]
    fn add_trade_rejects_reused_id() {
        let mut s = store();
        s.add_trade(Trade::Equity(equity("T1", ConfirmationStatus::Pending, 10.0)))
            .unwrap();
        let err = s
            .add_trade(Trade::Equity(equity("T1", ConfirmationStatus::Settled, 10.0)))
            .unwrap_err();
        assert!(matches!(err, DomainError::Duplicate(_)));
    }

    #[test]
    fn add_trade_rejects_status_outside_variant() {
        let mut s = store();
        let err = s
            .add_trade(Trade::Equity(equity("T1", ConfirmationStatus::Disputed, 10.0)))
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
    }

    #[test]
    fn replace_only_touches_one_variant() {
        let mut s = store();
        s.replace_equity(vec![equity("E1", ConfirmationStatus::Failed, 10.0)]);
        s.replace_fx(vec![fx("F1", ConfirmationStatus::Disputed, "EUR/USD", "SWIFT")]);
        assert_eq!(s.failures().len(), 2);

        s.replace_equity(vec![equity("E2", ConfirmationStatus::Settled, 10.0)]);
        let ids: Vec<&str> = s.trades().iter().map(|t| t.trade_id()).collect();
        assert_eq!(ids, vec!["F1", "E2"]);
        assert_eq!(s.failures().len(), 1);
        assert!(s.document("E1").is_err());
    }

    #[test]
    fn failure_transitions_only_from_open() {
        let mut s = store();
        s.add_trade(Trade::Equity(equity("T1", ConfirmationStatus::Failed, 10.0)))
            .unwrap();
        let resolved = s.resolve_failure("T1").unwrap();
        assert_eq!(resolved.status, FailureStatus::Resolved);
        assert!(resolved.resolved_at.is_some());

        assert!(matches!(s.escalate_failure("T1"), Err(DomainError::InvalidTransition(_))));
        assert!(matches!(s.resolve_failure("T1"), Err(DomainError::InvalidTransition(_))));
        assert!(matches!(s.resolve_failure("nope"), Err(DomainError::NotFound(_))));
    }

    #[test]
    fn document_update_enforces_invariants() {
        let mut s = store();
        s.add_trade(Trade::Equity(equity("T1", ConfirmationStatus::Pending, 10.0)))
            .unwrap();
        let before = s.document("T1").unwrap().trade_confirmation.version;

        let premature = DocumentUpdate {
            sent_to_client: Some(true),
            ..Default::default()
        };
        assert!(s
            .update_document("T1", DocumentType::TradeConfirmation, &premature)
            .is_err());
        assert_eq!(s.document("T1").unwrap().trade_confirmation.version, before);

        let approve = DocumentUpdate {
            qa_status: Some(crate::domain::values::approval::QaStatus::Approved),
            sent_to_client: Some(true),
            ..Default::default()
        };
        let info = s
            .update_document("T1", DocumentType::TradeConfirmation, &approve)
            .unwrap();
        assert!(info.sent_to_client);
        assert_eq!(info.version, before + 1);
    }

    #[test]
    fn settlements_rederive_workflow() {
        let mut s = store();
        s.add_trade(Trade::Equity(equity("T1", ConfirmationStatus::Confirmed, 10.0)))
            .unwrap();
        let step = |s: &ConfirmationStore| {
            s.workflows()[0]
                .step(StepKind::SettlementInstruction)
                .map(|st| st.status)
        };
        assert_eq!(step(&s), Some(StepStatus::InProgress));

        let trade = s.mark_sent_to_settlements("T1").unwrap();
        assert!(trade.sent_to_settlements());
        assert_eq!(step(&s), Some(StepStatus::Completed));
        assert!(matches!(
            s.mark_sent_to_settlements("T1"),
            Err(DomainError::InvalidTransition(_))
        ));
    }

    #[test]
    fn pending_trades_cannot_go_to_settlements() {
        let mut s = store();
        s.add_trade(Trade::Equity(equity("T1", ConfirmationStatus::Pending, 10.0)))
            .unwrap();
        assert!(matches!(
            s.mark_sent_to_settlements("T1"),
            Err(DomainError::InvalidTransition(_))
        ));
    }
}
