//! Integration tests for the ROI repository.

mod common;

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use yaracheck_core::roi::{DistributionInput, RoiError};
use yaracheck_db::repositories::RoiRepoError;
use yaracheck_db::RoiRepository;
use yaracheck_shared::types::ProfileId;

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_distribution_withdrawal_lifecycle() {
    let db = common::setup().await;
    let admin = common::create_user(&db).await;
    let shareholder = common::create_user(&db).await;
    let repo = RoiRepository::new(db.clone());

    let distribution = repo
        .create_distribution(
            &DistributionInput {
                shareholder_id: ProfileId::from_uuid(shareholder.id),
                pool_amount: dec!(10000),
                percentage: dec!(2.5),
                period_start: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
                period_end: NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
                notes: Some("Q1".to_string()),
            },
            admin.id,
        )
        .await
        .expect("create distribution");
    assert_eq!(distribution.amount, dec!(250.00));
    assert!(!distribution.enabled);

    let err = repo
        .create_withdrawal(distribution.id, shareholder.id, dec!(10))
        .await
        .unwrap_err();
    assert!(matches!(err, RoiRepoError::Rule(RoiError::DistributionDisabled)));

    repo.set_enabled(distribution.id, true).await.expect("enable");
    let request = repo
        .create_withdrawal(distribution.id, shareholder.id, dec!(200))
        .await
        .expect("withdraw");
    assert_eq!(request.status, "pending");

    let err = repo
        .create_withdrawal(distribution.id, shareholder.id, dec!(50.01))
        .await
        .unwrap_err();
    assert!(matches!(err, RoiRepoError::Rule(RoiError::ExceedsAvailable { .. })));

    let approved = repo.advance_withdrawal(request.id).await.expect("advance");
    assert_eq!(approved.status, "approved");

    repo.delete_distribution(distribution.id)
        .await
        .expect("delete");
    assert!(repo
        .find_distribution(distribution.id)
        .await
        .expect("find")
        .is_none());
    assert!(repo
        .list_withdrawals(Some(shareholder.id))
        .await
        .expect("list")
        .is_empty());
}
