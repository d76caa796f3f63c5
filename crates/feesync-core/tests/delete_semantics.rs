//! Delete is never optimistic: rows disappear only after the gateway
//! confirms, and a failed delete leaves everything visible.

mod common;

use common::FakeGateway;
use feesync_core::{FeeSession, ScopePatch, SessionConfig, SyncError};
use std::sync::Arc;

async fn loaded_session(gw: &Arc<FakeGateway>) -> FeeSession {
    let session = FeeSession::new(gw.clone(), SessionConfig::default());
    session
        .set_filter(ScopePatch::new().school("sch-1").class("Class 1"))
        .await;
    session.reload_now().await;
    session
}

#[tokio::test]
async fn test_failed_delete_leaves_record_and_selection_intact() {
    let gw = Arc::new(FakeGateway::new());
    gw.seed_fee("f1", "s1", "Asha Verma", "Class 1", 1000, 0, "Dec-2024");
    gw.fail_next_delete();

    let session = loaded_session(&gw).await;
    session.select("f1").await;

    let err = session.delete_many(&["f1".to_string()]).await.unwrap_err();
    assert!(matches!(err, SyncError::Gateway(_)));

    let view = session.view().await;
    assert_eq!(view.rows.len(), 1);
    assert_eq!(view.rows[0].id, "f1");
    assert_eq!(session.selection().await, vec!["f1".to_string()]);
}

#[tokio::test]
async fn test_successful_delete_removes_exactly_the_given_ids() {
    let gw = Arc::new(FakeGateway::new());
    gw.seed_fee("f1", "s1", "Asha Verma", "Class 1", 1000, 0, "Dec-2024");
    gw.seed_fee("f2", "s2", "Rahul Shah", "Class 1", 1000, 0, "Dec-2024");

    let session = loaded_session(&gw).await;
    session.select("f1").await;
    session.select("f2").await;

    session.delete_many(&["f1".to_string()]).await.unwrap();

    let view = session.view().await;
    assert_eq!(view.rows.len(), 1);
    assert_eq!(view.rows[0].id, "f2");
    assert_eq!(session.selection().await, vec!["f2".to_string()]);
    assert_eq!(gw.server_fee_count(), 1);
}

#[tokio::test]
async fn test_update_echo_merges_only_payment_fields() {
    let gw = Arc::new(FakeGateway::new());
    gw.seed_fee("f1", "s1", "Asha Verma", "Class 1", 1000, 0, "Dec-2024");

    let session = loaded_session(&gw).await;
    let date = chrono::NaiveDate::from_ymd_opt(2024, 12, 5).unwrap();
    session
        .update_fee("f1", Some(rust_decimal::Decimal::from(1000)), Some(date))
        .await
        .unwrap();

    let view = session.view().await;
    let rec = &view.rows[0];
    assert_eq!(rec.paid_amount, rust_decimal::Decimal::from(1000));
    assert_eq!(rec.balance_due, rust_decimal::Decimal::ZERO);
    assert_eq!(rec.status, feesync_http::FeeStatus::Paid);
    assert_eq!(rec.date_received, Some(date));
    assert_eq!(rec.student_name, "Asha Verma");
}
