//! Planter repository against an in-memory store

#[path = "../helpers/mod.rs"]
mod helpers;

use cane_registry::associations::AssociationRepository;
use cane_registry::core::RecordStatus;
use cane_registry::planters::{Gender, Planter, PlanterRepository};
use cane_registry::repository::{ListFilter, Payload};
use helpers::*;
use rust_decimal_macros::dec;
use serde_json::Value;

async fn setup() -> (PlanterRepository, AssociationRepository) {
    let executor = create_test_executor().await;
    (
        PlanterRepository::new(executor.clone()),
        AssociationRepository::new(executor),
    )
}

#[tokio::test]
async fn test_sparse_update_changes_only_given_field() {
    let (repository, _) = setup().await;

    let original = repository
        .create(&TestDataFactory::full_planter("Juan", "Dela Cruz", "juan@example.com"))
        .await
        .unwrap();
    assert_eq!(original.farm_size, Some(dec!(4.25)));

    let updated = repository
        .update(original.id, &Payload::new().with("farm_size", 12.5))
        .await
        .unwrap();

    let expected = Planter {
        farm_size: Some(dec!(12.5)),
        updated_at: updated.updated_at,
        ..original.clone()
    };
    assert_eq!(updated, expected);
    assert!(updated.updated_at >= original.updated_at);
    assert_eq!(updated.created_at, original.created_at);
}

#[tokio::test]
async fn test_create_normalizes_values() {
    let (repository, _) = setup().await;

    let planter = repository
        .create(
            &TestDataFactory::full_planter("  Juan ", "Dela Cruz", "Juan.DelaCruz@Example.COM")
                .with("gender", "M"),
        )
        .await
        .unwrap();

    assert_eq!(planter.first_name, "Juan");
    assert_eq!(planter.email.as_deref(), Some("juan.delacruz@example.com"));
    assert_eq!(planter.gender, Some(Gender::Male));
    assert_eq!(planter.latitude, Some(dec!(11.125)));
    assert_eq!(planter.longitude, Some(dec!(123.96875)));
    assert_eq!(planter.status, RecordStatus::Active);
    assert_eq!(planter.full_name(), "Juan Reyes Dela Cruz");
}

#[tokio::test]
async fn test_email_unique_when_present() {
    let (repository, _) = setup().await;

    repository
        .create(&TestDataFactory::planter("Juan", "Dela Cruz").with("email", "juan@example.com"))
        .await
        .unwrap();

    // differs only in case; stored lowercased, so it collides
    let result = repository
        .create(&TestDataFactory::planter("Juan", "Cruz").with("email", "JUAN@example.com"))
        .await;
    let message = assert_validation_field(result, "email");
    assert_eq!(
        message,
        "Planter with email 'juan@example.com' already exists"
    );

    // any number of planters without an email
    repository
        .create(&TestDataFactory::planter("Pedro", "Santos"))
        .await
        .unwrap();
    repository
        .create(&TestDataFactory::planter("Jose", "Rizal").with("email", ""))
        .await
        .unwrap();
    assert_eq!(repository.list(&ListFilter::new()).await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_latitude_without_longitude_is_rejected() {
    let (repository, _) = setup().await;

    let result = repository
        .create(&TestDataFactory::planter("Juan", "Dela Cruz").with("latitude", 10.5))
        .await;
    let message = assert_validation_field(result, "longitude");
    assert!(message.contains("together"));

    assert!(repository.list(&ListFilter::new()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_clearing_one_coordinate_is_rejected() {
    let (repository, _) = setup().await;

    let planter = repository
        .create(&TestDataFactory::full_planter("Juan", "Dela Cruz", "juan@example.com"))
        .await
        .unwrap();

    let result = repository
        .update(planter.id, &Payload::new().with("longitude", Value::Null))
        .await;
    assert_validation_field(result, "longitude");

    // both at once is fine
    let cleared = repository
        .update(
            planter.id,
            &Payload::new()
                .with("latitude", Value::Null)
                .with("longitude", Value::Null),
        )
        .await
        .unwrap();
    assert_eq!(cleared.latitude, None);
    assert_eq!(cleared.longitude, None);
}

#[tokio::test]
async fn test_empty_update_is_request_error() {
    let (repository, _) = setup().await;

    let planter = repository
        .create(&TestDataFactory::planter("Juan", "Dela Cruz"))
        .await
        .unwrap();

    let message = assert_request_error(repository.update(planter.id, &Payload::new()).await);
    assert_eq!(message, "No planter fields to update");
}

#[tokio::test]
async fn test_update_rejects_required_field_cleared() {
    let (repository, _) = setup().await;

    let planter = repository
        .create(&TestDataFactory::planter("Juan", "Dela Cruz"))
        .await
        .unwrap();

    let result = repository
        .update(planter.id, &Payload::new().with("last_name", "  "))
        .await;
    assert_validation_field(result, "last_name");

    let fetched = repository.get_by_id(planter.id).await.unwrap().unwrap();
    assert_eq!(fetched.last_name, "Dela Cruz");
}

#[tokio::test]
async fn test_filters_by_association_and_gender() {
    let (repository, associations) = setup().await;

    let nospa = associations
        .create(&TestDataFactory::association("NOSPA"))
        .await
        .unwrap();

    let member = repository
        .create(
            &TestDataFactory::planter("Juan", "Dela Cruz")
                .with("association_id", nospa.id)
                .with("gender", "male"),
        )
        .await
        .unwrap();
    let independent = repository
        .create(&TestDataFactory::planter("Maria", "Santos").with("gender", "female"))
        .await
        .unwrap();

    let by_association = repository
        .list(&ListFilter::new().equals("association_id", nospa.id))
        .await
        .unwrap();
    assert_eq!(by_association.len(), 1);
    assert_eq!(by_association[0].id, member.id);

    let unassigned = repository
        .list(&ListFilter::new().equals("association_id", Value::Null))
        .await
        .unwrap();
    assert_eq!(unassigned.len(), 1);
    assert_eq!(unassigned[0].id, independent.id);

    // aliases apply to filter values too
    let women = repository
        .list(&ListFilter::new().equals("gender", "F"))
        .await
        .unwrap();
    assert_eq!(women.len(), 1);
    assert_eq!(women[0].id, independent.id);

    let result = repository
        .list(&ListFilter::new().equals("farm_size", 1))
        .await;
    assert_validation_field(result, "farm_size");

    let result = repository.list(&ListFilter::new().status("archived")).await;
    assert_validation_field(result, "status");
}

#[tokio::test]
async fn test_list_newest_first_with_paging() {
    let (repository, _) = setup().await;

    let mut ids = Vec::new();
    for name in ["Ana", "Ben", "Carlo", "Dina"] {
        let planter = repository
            .create(&TestDataFactory::planter(name, "Reyes"))
            .await
            .unwrap();
        ids.push(planter.id);
    }
    ids.reverse();

    let all: Vec<i64> = repository
        .list(&ListFilter::new())
        .await
        .unwrap()
        .iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(all, ids);

    let page: Vec<i64> = repository
        .list(&ListFilter::new().limit(2).offset(1))
        .await
        .unwrap()
        .iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(page, ids[1..3].to_vec());

    let tail = repository
        .list(&ListFilter::new().offset(3))
        .await
        .unwrap();
    assert_eq!(tail.len(), 1);
    assert_eq!(tail[0].id, ids[3]);
}

#[tokio::test]
async fn test_search_matches_any_search_column() {
    let (repository, _) = setup().await;

    repository
        .create(&TestDataFactory::full_planter("Juan", "Dela Cruz", "juan@example.com"))
        .await
        .unwrap();
    repository
        .create(&TestDataFactory::planter("Maria", "Santos").with("farm_location", "Bogo City"))
        .await
        .unwrap();

    let by_name = repository.list(&ListFilter::new().search("DELA")).await.unwrap();
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0].first_name, "Juan");

    let by_location = repository.list(&ListFilter::new().search("bogo")).await.unwrap();
    assert_eq!(by_location.len(), 1);
    assert_eq!(by_location[0].first_name, "Maria");

    let none = repository.list(&ListFilter::new().search("Iloilo")).await.unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn test_natural_key_is_email() {
    let (repository, _) = setup().await;

    let planter = repository
        .create(&TestDataFactory::planter("Juan", "Dela Cruz").with("email", "juan@example.com"))
        .await
        .unwrap();

    let found = repository
        .get_by_natural_key("Juan@Example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, planter.id);
    assert!(repository.get_by_natural_key("").await.unwrap().is_none());
}

#[tokio::test]
async fn test_statistics_on_empty_table() {
    let (repository, _) = setup().await;

    let report = repository.statistics().await.unwrap();
    assert_eq!(report.total, 0);
    assert_eq!(report.active, 0);
    assert_eq!(report.inactive, 0);
    assert!(report.group("byGender").unwrap().is_empty());
    assert!(report.group("byAssociation").unwrap().is_empty());
    assert_eq!(report.sum("totalFarmSize"), Some(dec!(0)));
    assert!(report.is_consistent());
}

#[tokio::test]
async fn test_statistics_groups_and_sums() {
    let (repository, associations) = setup().await;

    let nospa = associations
        .create(&TestDataFactory::association("NOSPA"))
        .await
        .unwrap();

    repository
        .create(&TestDataFactory::full_planter("Juan", "Dela Cruz", "juan@example.com"))
        .await
        .unwrap();
    repository
        .create(
            &TestDataFactory::planter("Maria", "Santos")
                .with("gender", "female")
                .with("association_id", nospa.id)
                .with("farm_size", 12.5),
        )
        .await
        .unwrap();
    let inactive = repository
        .create(&TestDataFactory::planter("Pedro", "Reyes").with("association_id", nospa.id))
        .await
        .unwrap();
    repository.delete(inactive.id).await.unwrap();

    let report = repository.statistics().await.unwrap();
    assert_eq!(report.total, 3);
    assert_eq!(report.active, 2);
    assert_eq!(report.inactive, 1);
    assert!(report.is_consistent());

    let by_gender = report.group("byGender").unwrap();
    assert_eq!(by_gender.get("male"), Some(&1));
    assert_eq!(by_gender.get("female"), Some(&1));
    assert_eq!(by_gender.get("unspecified"), Some(&1));

    let by_association = report.group("byAssociation").unwrap();
    assert_eq!(by_association.get("NOSPA"), Some(&2));
    assert_eq!(by_association.get("unassigned"), Some(&1));

    assert_eq!(report.sum("totalFarmSize"), Some(dec!(16.75)));
}

#[tokio::test]
async fn test_soft_delete_is_idempotent_on_existing_rows() {
    let (repository, _) = setup().await;

    let planter = repository
        .create(&TestDataFactory::planter("Juan", "Dela Cruz"))
        .await
        .unwrap();

    repository.delete(planter.id).await.unwrap();
    repository.delete(planter.id).await.unwrap();

    let fetched = repository.get_by_id(planter.id).await.unwrap().unwrap();
    assert_eq!(fetched.status, RecordStatus::Inactive);

    // reactivation goes through update
    let reactivated = repository
        .update(planter.id, &Payload::new().with("status", "active"))
        .await
        .unwrap();
    assert_eq!(reactivated.status, RecordStatus::Active);
}
