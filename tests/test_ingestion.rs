mod common;

use common::*;
use confirmdesk::application::filter::FilterCriteria;
use confirmdesk::domain::entities::trade::Trade;
use confirmdesk::domain::values::confirmation_status::ConfirmationStatus;
use confirmdesk::domain::values::trade_kind::TradeKind;
use confirmdesk::infrastructure::sources::file::FileSource;
use confirmdesk::ConfirmDesk;
use std::io::Write;
use std::sync::Arc;

#[tokio::test]
async fn test_equity_rows_round_trip() {
    let rows: Vec<String> = (1..=5)
        .map(|i| equity_row(&format!("EQ{i}"), "Confirmed", 1000.0 * i as f64, "Goldman Sachs", "2024-03-15"))
        .collect();
    let desk = setup_with(equity_csv(&rows), String::new(), &[0.5]);

    let report = desk.load(false).await;
    assert_eq!(report.equity.unwrap().imported, 5);

    let trades = desk.trades(&FilterCriteria::default());
    assert_eq!(trades.len(), 5);
    for (i, trade) in trades.iter().enumerate() {
        let Trade::Equity(t) = trade else {
            panic!("expected equity trade");
        };
        assert_eq!(t.trade_id, format!("EQ{}", i + 1));
        assert_eq!(t.trade_value, 1000.0 * (i + 1) as f64);
        assert_eq!(t.confirmation_status, ConfirmationStatus::Confirmed);
        assert!(t.enrichment.is_some());
    }
}

#[tokio::test]
async fn test_fx_status_subset_enforced() {
    let rows = vec![
        fx_row("FX1", "Disputed", "EUR/USD", "SWIFT"),
        fx_row("FX2", "Failed", "EUR/USD", "SWIFT"),
        fx_row("FX3", "Pending", "USD/TRY", "Email"),
    ];
    let desk = setup_with(String::new(), fx_csv(&rows), &[0.5]);
    let report = desk.load(false).await;
    assert_eq!(report.fx.unwrap().imported, 2);

    let ids: Vec<String> = desk
        .trades(&FilterCriteria::default())
        .iter()
        .map(|t| t.trade_id().to_string())
        .collect();
    assert_eq!(ids, vec!["FX1", "FX3"]);
    assert!(desk.trades(&FilterCriteria::default()).iter().all(|t| t.kind() == TradeKind::Fx));
}

#[tokio::test]
async fn test_missing_dataset_is_reported_not_fatal() {
    let rows = vec![equity_row("EQ1", "Pending", 10.0, "Citi", "2024-03-15")];
    let desk = setup_with(equity_csv(&rows), "trade_id\n".into(), &[0.5]);
    let report = desk.load(false).await;
    assert!(report.equity.is_some());
    assert!(report.fx.is_none());
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].contains("No data rows"));
}

#[tokio::test]
async fn test_load_from_file_source() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{}", equity_csv(&[equity_row("EQ1", "Settled", 10.0, "Citi", "15/03/2024")])).unwrap();

    let desk = ConfirmDesk::with_parts(
        ":memory:",
        Default::default(),
        Box::new(ScriptedRandom::new(&[0.5])),
        Arc::new(FileSource::new(file.path())),
        Arc::new(FileSource::new("/no/such/fx.csv")),
    )
    .unwrap();
    let report = desk.load(false).await;
    assert_eq!(report.equity.unwrap().imported, 1);
    assert_eq!(report.errors.len(), 1);

    let trade = &desk.trades(&FilterCriteria::default())[0];
    assert_eq!(trade.trade_date(), chrono::NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
}

#[test]
fn test_upload_resolves_qty_header() {
    let desk = setup();
    let report = desk
        .upload("Trade Ref,Symbol,Qty,Price,Counterparty\nU1,MSFT,250,4,Citi\n", false)
        .unwrap();
    assert_eq!(report.import.imported, 1);

    let trades = desk.trades(&FilterCriteria::default());
    let Trade::Equity(t) = &trades[0] else {
        panic!("expected equity trade");
    };
    assert_eq!(t.quantity, 250.0);
    assert_eq!(t.trade_value, 1000.0);
    assert_eq!(t.confirmation_status, ConfirmationStatus::Pending);
}

#[test]
fn test_upload_detects_fx_sheet() {
    let desk = setup();
    let report = desk
        .upload("Deal ID,Currency Pair,Notional,Confirmation Status\nD1,GBP/USD,\"3,000,000\",Disputed\n", false)
        .unwrap();
    assert_eq!(report.trade_type, TradeKind::Fx);

    let trades = desk.trades(&FilterCriteria::default());
    let Trade::Fx(t) = &trades[0] else {
        panic!("expected FX trade");
    };
    assert_eq!(t.base_currency, "GBP");
    assert_eq!(t.term_currency, "USD");
    assert_eq!(t.notional_amount, 3_000_000.0);
    assert_eq!(desk.failures().len(), 1);
}

#[test]
fn test_upload_rejects_empty_sheet() {
    let desk = setup();
    assert!(desk.upload("", false).is_err());
    assert!(desk.upload("a,b\n", false).is_err());
}
