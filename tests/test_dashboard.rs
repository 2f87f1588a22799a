mod common;

use chrono::NaiveDate;
use common::*;
use confirmdesk::application::filter::{FilterCriteria, TradeTypeFilter};
use confirmdesk::domain::entities::document_status::{DocumentType, DocumentUpdate};
use confirmdesk::domain::entities::workflow::StepKind;
use confirmdesk::domain::values::approval::QaStatus;
use confirmdesk::domain::values::confirmation_status::ConfirmationStatus;
use confirmdesk::domain::values::document_bucket::DocumentBucket;
use confirmdesk::domain::values::step_status::StepStatus;
use confirmdesk::ConfirmDesk;

async fn mixed_desk() -> ConfirmDesk {
    let equity = vec![
        equity_row("E1", "Confirmed", 50_000.0, "Goldman Sachs", "2024-03-01"),
        equity_row("E2", "Pending", 2_000_000.0, "Goldman Sachs", "2024-03-10"),
        equity_row("E3", "Confirmed", 80_000.0, "Morgan Stanley", "2024-03-20"),
        equity_row("E4", "Settled", 10_000.0, "Goldman Sachs", "2024-04-02"),
    ];
    let fx = vec![
        fx_row("F1", "Disputed", "EUR/USD", "SWIFT"),
        fx_row("F2", "Pending", "USD/TRY", "Email"),
    ];
    let desk = setup_with(equity_csv(&equity), fx_csv(&fx), &[0.5]);
    let report = desk.load(false).await;
    assert!(report.errors.is_empty());
    desk
}

fn ids(desk: &ConfirmDesk, criteria: &FilterCriteria) -> Vec<String> {
    desk.trades(criteria)
        .iter()
        .map(|t| t.trade_id().to_string())
        .collect()
}

#[tokio::test]
async fn test_filters_are_a_conjunction() {
    let desk = mixed_desk().await;

    let criteria = FilterCriteria {
        trade_type: TradeTypeFilter::Equity,
        status: Some(ConfirmationStatus::Confirmed),
        counterparty: Some("Goldman Sachs".into()),
        ..Default::default()
    };
    assert_eq!(ids(&desk, &criteria), vec!["E1"]);

    let march = FilterCriteria {
        date_from: NaiveDate::from_ymd_opt(2024, 3, 5),
        date_to: NaiveDate::from_ymd_opt(2024, 3, 20),
        trade_type: TradeTypeFilter::Equity,
        ..Default::default()
    };
    assert_eq!(ids(&desk, &march), vec!["E2", "E3"]);

    let try_trades = FilterCriteria {
        currency: Some("TRY".into()),
        ..Default::default()
    };
    assert_eq!(ids(&desk, &try_trades), vec!["F2"]);

    assert_eq!(ids(&desk, &FilterCriteria::default()).len(), 6);
}

#[tokio::test]
async fn test_document_bucket_filter() {
    let desk = mixed_desk().await;
    let complete = FilterCriteria {
        document_status: Some(DocumentBucket::Complete),
        ..Default::default()
    };
    assert_eq!(ids(&desk, &complete), vec!["E1", "E3", "E4"]);

    let pending = FilterCriteria {
        document_status: Some(DocumentBucket::Pending),
        ..Default::default()
    };
    assert_eq!(ids(&desk, &pending), vec!["E2", "F1", "F2"]);
}

#[tokio::test]
async fn test_summary_and_facets() {
    let desk = mixed_desk().await;
    let summary = desk.summary(&FilterCriteria::default());
    assert_eq!(summary.total, 6);
    assert_eq!(summary.equity, 4);
    assert_eq!(summary.fx, 2);
    assert_eq!(summary.by_status.get("Confirmed"), Some(&2));
    assert_eq!(summary.by_status.get("Disputed"), Some(&1));
    assert_eq!(summary.open_failures, 1);

    let facets = desk.facets();
    assert_eq!(facets.counterparties, vec!["Citi", "Goldman Sachs", "Morgan Stanley"]);
    assert_eq!(facets.currencies, vec!["EUR", "TRY", "USD"]);
}

#[tokio::test]
async fn test_settlements_update_the_workflow() {
    let desk = mixed_desk().await;
    let before = desk.workflows();
    let e1 = before.iter().find(|w| w.trade_id == "E1").unwrap();
    assert_eq!(e1.step(StepKind::SettlementInstruction).unwrap().status, StepStatus::InProgress);

    let trade = desk.mark_sent_to_settlements("E1").unwrap();
    assert!(trade.sent_to_settlements());

    let after = desk.workflows();
    let e1 = after.iter().find(|w| w.trade_id == "E1").unwrap();
    assert!(e1.is_complete());

    assert!(desk.mark_sent_to_settlements("E1").is_err());
    assert!(desk.mark_sent_to_settlements("E2").is_err());
    assert!(desk.mark_sent_to_settlements("missing").is_err());
}

#[tokio::test]
async fn test_document_updates_bump_version() {
    let desk = mixed_desk().await;
    let update = DocumentUpdate {
        bank_signed: Some(true),
        client_signed: Some(true),
        qa_status: Some(QaStatus::Approved),
        ..Default::default()
    };
    let info = desk
        .update_document("E2", DocumentType::TradeConfirmation, &update)
        .unwrap();
    assert!(info.is_complete());
    assert_eq!(info.version, 2);

    let pack = desk.document("E2").unwrap();
    assert_eq!(pack.trade_confirmation, info);

    let premature = DocumentUpdate {
        sent_to_client: Some(true),
        ..Default::default()
    };
    assert!(desk
        .update_document("E2", DocumentType::TradingSalesApproval, &premature)
        .is_err());
    assert_eq!(desk.document("E2").unwrap().trading_sales_approval.version, 1);
}
