//! User profile repository against an in-memory store
//!
//! The lifecycle status lives in the `account_status` column.

#[path = "../helpers/mod.rs"]
mod helpers;

use cane_registry::core::{RecordStatus, SqlValue};
use cane_registry::repository::{ListFilter, Payload};
use cane_registry::user_profiles::{Role, UserProfileRepository};
use helpers::*;

#[tokio::test]
async fn test_create_and_soft_delete_uses_account_status() {
    let executor = create_test_executor().await;
    let repository = UserProfileRepository::new(executor.clone());

    let profile = repository
        .create(&TestDataFactory::user_profile("Ana.Cruz@Registry.ph", "Manager"))
        .await
        .unwrap();
    assert_eq!(profile.email, "ana.cruz@registry.ph");
    assert_eq!(profile.role, Role::Manager);
    assert_eq!(profile.status, RecordStatus::Active);

    repository.delete(profile.id).await.unwrap();

    let rows = executor
        .query(
            "SELECT account_status FROM user_profiles WHERE id = ?",
            &[SqlValue::Int(profile.id)],
        )
        .await
        .unwrap();
    assert_eq!(rows[0].string("account_status").unwrap(), "inactive");

    let fetched = repository.get_by_id(profile.id).await.unwrap().unwrap();
    assert_eq!(fetched.status, RecordStatus::Inactive);

    let active = repository
        .list(&ListFilter::new().status("active"))
        .await
        .unwrap();
    assert!(active.is_empty());

    let inactive = repository
        .list(&ListFilter::new().status("INACTIVE"))
        .await
        .unwrap();
    assert_eq!(inactive.len(), 1);
}

#[tokio::test]
async fn test_invalid_role_is_rejected() {
    let executor = create_test_executor().await;
    let repository = UserProfileRepository::new(executor);

    let result = repository
        .create(&TestDataFactory::user_profile("ana@registry.ph", "superuser"))
        .await;
    let message = assert_validation_field(result, "role");
    assert_eq!(message, "Role must be one of: admin, manager, staff, viewer");
}

#[tokio::test]
async fn test_email_is_required_and_unique() {
    let executor = create_test_executor().await;
    let repository = UserProfileRepository::new(executor);

    let result = repository
        .create(
            &Payload::new()
                .with("first_name", "Ana")
                .with("last_name", "Cruz")
                .with("role", "staff"),
        )
        .await;
    assert_validation_field(result, "email");

    repository
        .create(&TestDataFactory::user_profile("ana@registry.ph", "staff"))
        .await
        .unwrap();
    let result = repository
        .create(&TestDataFactory::user_profile("ANA@registry.ph", "viewer"))
        .await;
    let message = assert_validation_field(result, "email");
    assert_eq!(
        message,
        "User profile with email 'ana@registry.ph' already exists"
    );
}

#[tokio::test]
async fn test_invalid_status_filter_is_rejected() {
    let executor = create_test_executor().await;
    let repository = UserProfileRepository::new(executor);

    let result = repository.list(&ListFilter::new().status("archived")).await;
    assert_validation_field(result, "status");
}

#[tokio::test]
async fn test_filter_by_role_and_department() {
    let executor = create_test_executor().await;
    let repository = UserProfileRepository::new(executor);

    let field_officer = repository
        .create(
            &TestDataFactory::user_profile("ana@registry.ph", "staff")
                .with("department", "Field Operations"),
        )
        .await
        .unwrap();
    repository
        .create(
            &TestDataFactory::user_profile("ben@registry.ph", "staff").with("department", "Finance"),
        )
        .await
        .unwrap();
    repository
        .create(&TestDataFactory::user_profile("carla@registry.ph", "admin"))
        .await
        .unwrap();

    let staff = repository
        .list(&ListFilter::new().equals("role", "staff"))
        .await
        .unwrap();
    assert_eq!(staff.len(), 2);

    let field_staff = repository
        .list(
            &ListFilter::new()
                .equals("role", "staff")
                .equals("department", "Field Operations"),
        )
        .await
        .unwrap();
    assert_eq!(field_staff.len(), 1);
    assert_eq!(field_staff[0].id, field_officer.id);
}

#[tokio::test]
async fn test_statistics_by_role_and_department() {
    let executor = create_test_executor().await;
    let repository = UserProfileRepository::new(executor);

    repository
        .create(
            &TestDataFactory::user_profile("ana@registry.ph", "staff")
                .with("department", "Finance"),
        )
        .await
        .unwrap();
    repository
        .create(
            &TestDataFactory::user_profile("ben@registry.ph", "staff")
                .with("department", "Finance"),
        )
        .await
        .unwrap();
    let admin = repository
        .create(&TestDataFactory::user_profile("carla@registry.ph", "admin"))
        .await
        .unwrap();
    repository.delete(admin.id).await.unwrap();

    let report = repository.statistics().await.unwrap();
    assert_eq!(report.total, 3);
    assert_eq!(report.active, 2);
    assert_eq!(report.inactive, 1);
    assert!(report.is_consistent());
    assert!(report.sums.is_empty());

    let by_role = report.group("byRole").unwrap();
    assert_eq!(by_role.get("staff"), Some(&2));
    assert_eq!(by_role.get("admin"), Some(&1));
    assert_eq!(by_role.get("viewer"), None);

    let by_department = report.group("byDepartment").unwrap();
    assert_eq!(by_department.get("Finance"), Some(&2));
    assert_eq!(by_department.get("unspecified"), Some(&1));
}
