//! Sugar mill repository against an in-memory store
//!
//! Sugar mills are hard-deleted: `delete` removes the row.

#[path = "../helpers/mod.rs"]
mod helpers;

use cane_registry::core::traits::Entity;
use cane_registry::core::{AppError, FaultKind, RecordStatus, Row, StoreFault};
use cane_registry::repository::{EntityRepository, EntitySchema, ListFilter, Payload};
use cane_registry::sugar_mills::{OperatingStatus, SugarMillRepository, SUGAR_MILL_SCHEMA};
use helpers::*;
use rust_decimal_macros::dec;
use serde::Serialize;

/// Sugar mill whose stored rows never decode
#[derive(Debug, Serialize)]
struct UnreadableMill {
    id: i64,
}

impl Entity for UnreadableMill {
    const SCHEMA: &'static EntitySchema = &SUGAR_MILL_SCHEMA;

    fn from_row(_row: &Row) -> Result<Self, StoreFault> {
        Err(StoreFault::decode("capacity", "decimal"))
    }

    fn id(&self) -> i64 {
        self.id
    }
}

#[tokio::test]
async fn test_negative_capacity_is_rejected_and_nothing_stored() {
    let executor = create_test_executor().await;
    let repository = SugarMillRepository::new(executor.clone());

    let result = repository
        .create(&TestDataFactory::sugar_mill("Ursumco", "URS", -5))
        .await;
    let message = assert_validation_field(result, "capacity");
    assert_eq!(message, "Capacity cannot be negative");
    assert_eq!(count_rows(&executor, "sugar_mills").await, 0);
}

#[tokio::test]
async fn test_capacity_is_required() {
    let executor = create_test_executor().await;
    let repository = SugarMillRepository::new(executor);

    let result = repository
        .create(&Payload::new().with("name", "Ursumco").with("plant_code", "URS"))
        .await;
    let message = assert_validation_field(result, "capacity");
    assert_eq!(message, "Capacity is required");
}

#[tokio::test]
async fn test_plant_code_is_uppercased_and_found_by_natural_key() {
    let executor = create_test_executor().await;
    let repository = SugarMillRepository::new(executor);

    let mill = repository
        .create(
            &TestDataFactory::sugar_mill("Ursumco", "urs-01", 8000)
                .with("operating_status", "Operational"),
        )
        .await
        .unwrap();
    assert_eq!(mill.plant_code, "URS-01");
    assert_eq!(mill.capacity, dec!(8000));
    assert_eq!(mill.operating_status, Some(OperatingStatus::Operational));
    assert_eq!(mill.status, RecordStatus::Active);

    let found = repository.get_by_natural_key("urs-01").await.unwrap().unwrap();
    assert_eq!(found, mill);
    assert_eq!(found.id(), mill.id);
}

#[tokio::test]
async fn test_duplicate_plant_code_is_rejected() {
    let executor = create_test_executor().await;
    let repository = SugarMillRepository::new(executor.clone());

    repository
        .create(&TestDataFactory::sugar_mill("Ursumco", "URS", 8000))
        .await
        .unwrap();

    let result = repository
        .create(&TestDataFactory::sugar_mill("Ursumco Annex", "urs", 2000))
        .await;
    let message = assert_validation_field(result, "plant_code");
    assert_eq!(message, "Sugar mill with plant code 'URS' already exists");
    assert_eq!(count_rows(&executor, "sugar_mills").await, 1);
}

#[tokio::test]
async fn test_delete_removes_row() {
    let executor = create_test_executor().await;
    let repository = SugarMillRepository::new(executor.clone());

    let mill = repository
        .create(&TestDataFactory::sugar_mill("Bogo-Medellin Milling", "BMMC", 6000))
        .await
        .unwrap();

    repository.delete(mill.id).await.unwrap();
    assert!(repository.get_by_id(mill.id).await.unwrap().is_none());
    assert_eq!(count_rows(&executor, "sugar_mills").await, 0);

    // second delete: the row is gone
    assert_validation_field(repository.delete(mill.id).await, "id");
}

#[tokio::test]
async fn test_hard_delete_removes_row() {
    let executor = create_test_executor().await;
    let repository = SugarMillRepository::new(executor);

    let mill = repository
        .create(&TestDataFactory::sugar_mill("Ursumco", "URS", 8000))
        .await
        .unwrap();

    repository.hard_delete(mill.id).await.unwrap();
    assert!(repository.get_by_id(mill.id).await.unwrap().is_none());

    // the plant code is free again
    repository
        .create(&TestDataFactory::sugar_mill("Ursumco", "URS", 8000))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_invalid_update_leaves_row_unchanged() {
    let executor = create_test_executor().await;
    let repository = SugarMillRepository::new(executor);

    let mill = repository
        .create(&TestDataFactory::sugar_mill("Ursumco", "URS", 8000))
        .await
        .unwrap();

    let result = repository
        .update(mill.id, &Payload::new().with("name", "Renamed").with("capacity", -1))
        .await;
    assert_validation_field(result, "capacity");

    let fetched = repository.get_by_id(mill.id).await.unwrap().unwrap();
    assert_eq!(fetched, mill);

    let updated = repository
        .update(mill.id, &Payload::new().with("capacity", "9500.5"))
        .await
        .unwrap();
    assert_eq!(updated.capacity, dec!(9500.5));
    assert_eq!(updated.name, "Ursumco");
}

#[tokio::test]
async fn test_filter_by_operating_status() {
    let executor = create_test_executor().await;
    let repository = SugarMillRepository::new(executor);

    repository
        .create(
            &TestDataFactory::sugar_mill("Ursumco", "URS", 8000)
                .with("operating_status", "operational"),
        )
        .await
        .unwrap();
    let idle = repository
        .create(
            &TestDataFactory::sugar_mill("Victorias", "VMC", 15000)
                .with("operating_status", "maintenance"),
        )
        .await
        .unwrap();

    let hits = repository
        .list(&ListFilter::new().equals("operating_status", "MAINTENANCE"))
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, idle.id);

    let result = repository
        .list(&ListFilter::new().equals("operating_status", "closed"))
        .await;
    // not a declared spelling, so nothing can match
    assert!(result.unwrap().is_empty());
}

#[tokio::test]
async fn test_statistics_total_capacity() {
    let executor = create_test_executor().await;
    let repository = SugarMillRepository::new(executor);

    repository
        .create(
            &TestDataFactory::sugar_mill("Ursumco", "URS", 8000)
                .with("operating_status", "operational"),
        )
        .await
        .unwrap();
    repository
        .create(
            &TestDataFactory::sugar_mill("Victorias", "VMC", 15000)
                .with("operating_status", "operational"),
        )
        .await
        .unwrap();
    repository
        .create(&TestDataFactory::sugar_mill("Hawaiian-Philippine", "HPCO", 0).with("status", "inactive"))
        .await
        .unwrap();

    let report = repository.statistics().await.unwrap();
    assert_eq!(report.total, 3);
    assert_eq!(report.active, 2);
    assert_eq!(report.inactive, 1);
    assert!(report.is_consistent());

    let by_status = report.group("byOperatingStatus").unwrap();
    assert_eq!(by_status.get("operational"), Some(&2));
    assert_eq!(by_status.get("unspecified"), Some(&1));

    assert_eq!(report.sum("totalCapacity"), Some(dec!(23000)));
}

#[tokio::test]
async fn test_capacity_beyond_column_precision_is_rejected() {
    let executor = create_test_executor().await;
    let repository = SugarMillRepository::new(executor.clone());

    repository
        .create(&TestDataFactory::sugar_mill("Ursumco", "URS", 8000))
        .await
        .unwrap();

    let result = repository
        .create(
            &TestDataFactory::sugar_mill("Busco", "BUS", 0)
                .with("capacity", "79228162514264337593543950335"),
        )
        .await;
    let message = assert_validation_field(result, "capacity");
    assert_eq!(message, "Capacity must be at most 9999999999.99");
    assert_eq!(count_rows(&executor, "sugar_mills").await, 1);

    assert_eq!(repository.list(&ListFilter::new()).await.unwrap().len(), 1);
    assert!(repository.statistics().await.is_ok());
}

#[tokio::test]
async fn test_capacity_at_column_limit_is_stored() {
    let executor = create_test_executor().await;
    let repository = SugarMillRepository::new(executor);

    let mill = repository
        .create(&TestDataFactory::sugar_mill("Ursumco", "URS", 9_999_999_999))
        .await
        .unwrap();
    assert_eq!(mill.capacity, dec!(9999999999));
}

#[tokio::test]
async fn test_unreadable_row_rolls_back_create() {
    let executor = create_test_executor().await;
    let repository: EntityRepository<UnreadableMill> = EntityRepository::new(executor.clone());

    let result = repository
        .create(&TestDataFactory::sugar_mill("Ursumco", "URS", 8000))
        .await;
    match result {
        Err(AppError::Database(fault)) => assert_eq!(fault.kind, FaultKind::Decode),
        other => panic!("expected decode fault, got {:?}", other),
    }
    assert_eq!(count_rows(&executor, "sugar_mills").await, 0);
}
