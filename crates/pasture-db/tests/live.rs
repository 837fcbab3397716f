//! Live integration tests for pasture-db using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated Postgres database. The `migrations`
//! path is relative to `crates/pasture-db/`.

use pasture_core::{
    approve_submission, reject_submission, NewSubmission, NewVendor, RepositoryError,
    SubmissionStatus, VendorFilter, VendorRepository, VendorStatus,
};
use pasture_db::PgVendorRepository;
use uuid::Uuid;

fn new_vendor(name: &str, services: &[&str], status: VendorStatus) -> NewVendor {
    NewVendor {
        name: name.to_string(),
        phone: "555-0100".to_string(),
        email: "ops@example.com".to_string(),
        website: None,
        address: "1 Ranch Rd".to_string(),
        city: "Austin".to_string(),
        state: "Texas".to_string(),
        state_code: "TX".to_string(),
        latitude: Some(30.27),
        longitude: Some(-97.74),
        service_types: services.iter().map(|s| (*s).to_string()).collect(),
        species: vec!["Horse".to_string()],
        service_radius_miles: 25,
        description: String::new(),
        status,
        emergency_service: false,
        insurance_certified: false,
        business_hours: String::new(),
        featured_image: None,
    }
}

fn new_submission(name: &str) -> NewSubmission {
    NewSubmission {
        business_name: name.to_string(),
        contact_name: "Jo".to_string(),
        phone: "555-0199".to_string(),
        email: "jo@example.com".to_string(),
        address: "2 Mill St, Waco, TX".to_string(),
        city: Some("Waco".to_string()),
        state: Some("Texas".to_string()),
        state_code: Some("TX".to_string()),
        latitude: 31.55,
        longitude: -97.15,
        services: vec!["Dead Cattle Removal".to_string()],
        species: vec!["Cattle".to_string()],
        service_radius_miles: 40,
        description: "Cattle pickup".to_string(),
        website: Some("https://example.com".to_string()),
        emergency_service: true,
        business_hours: "Mon-Sat".to_string(),
        submitter_ip: "198.51.100.4".to_string(),
    }
}

#[sqlx::test(migrations = "../../migrations")]
async fn fetch_filters_status_and_orders_by_name(pool: sqlx::PgPool) {
    let repo = PgVendorRepository::new(pool);
    for (name, status) in [
        ("Zephyr Hauling", VendorStatus::Active),
        ("Acme Removal", VendorStatus::Active),
        ("Mothballed Co", VendorStatus::Inactive),
    ] {
        repo.create_vendor(&new_vendor(name, &["Dead Horse Removal"], status))
            .await
            .expect("create vendor");
    }

    let active = repo.fetch(&VendorFilter::active()).await.expect("fetch");
    let names: Vec<&str> = active.iter().map(|v| v.name.as_str()).collect();
    assert_eq!(names, vec!["Acme Removal", "Zephyr Hauling"]);

    let all = repo.fetch(&VendorFilter::default()).await.expect("fetch");
    assert_eq!(all.len(), 3);
}

#[sqlx::test(migrations = "../../migrations")]
async fn fetch_applies_service_type_filter(pool: sqlx::PgPool) {
    let repo = PgVendorRepository::new(pool);
    repo.create_vendor(&new_vendor("Horse Co", &["Dead Horse Removal"], VendorStatus::Active))
        .await
        .expect("create");
    repo.create_vendor(&new_vendor("Farm Co", &["Farm Cleanup Services"], VendorStatus::Active))
        .await
        .expect("create");
    repo.create_vendor(&new_vendor("Odd Co", &["100% clean_up"], VendorStatus::Active))
        .await
        .expect("create");

    let filter = VendorFilter::active().with_service_types(vec!["HORSE".to_string()]);
    let found = repo.fetch(&filter).await.expect("fetch");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Horse Co");

    let filter = VendorFilter::active().with_service_types(vec!["0% c".to_string()]);
    let found = repo.fetch(&filter).await.expect("fetch");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Odd Co");
}

#[sqlx::test(migrations = "../../migrations")]
async fn fetch_by_id_round_trips_fields(pool: sqlx::PgPool) {
    let repo = PgVendorRepository::new(pool);
    let id = repo
        .create_vendor(&new_vendor("Acme", &["Dead Horse Removal"], VendorStatus::Active))
        .await
        .expect("create");

    let vendor = repo.fetch_by_id(&id).await.expect("fetch").expect("exists");
    assert_eq!(vendor.id, id);
    assert_eq!(vendor.state_code, "TX");
    assert_eq!(vendor.service_types, vec!["Dead Horse Removal".to_string()]);

    assert!(repo.fetch_by_id("not-a-uuid").await.expect("fetch").is_none());
    assert!(repo
        .fetch_by_id("00000000-0000-0000-0000-000000000000")
        .await
        .expect("fetch")
        .is_none());
}

#[sqlx::test(migrations = "../../migrations")]
async fn set_vendor_status_reports_unknown_ids(pool: sqlx::PgPool) {
    let repo = PgVendorRepository::new(pool);
    let id = repo
        .create_vendor(&new_vendor("Acme", &[], VendorStatus::Pending))
        .await
        .expect("create");

    repo.set_vendor_status(&id, VendorStatus::Active)
        .await
        .expect("update");
    let vendor = repo.fetch_by_id(&id).await.expect("fetch").expect("exists");
    assert_eq!(vendor.status, VendorStatus::Active);

    let err = repo
        .set_vendor_status("00000000-0000-0000-0000-000000000000", VendorStatus::Inactive)
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound { .. }));
}

#[sqlx::test(migrations = "../../migrations")]
async fn submissions_list_pending_oldest_first(pool: sqlx::PgPool) {
    let repo = PgVendorRepository::new(pool);
    let first = repo
        .create_submission(&new_submission("First"))
        .await
        .expect("create");
    let second = repo
        .create_submission(&new_submission("Second"))
        .await
        .expect("create");

    let pending = repo.list_pending().await.expect("list");
    let ids: Vec<&str> = pending.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec![first.as_str(), second.as_str()]);
    assert!(pending
        .iter()
        .all(|s| s.submission_status == SubmissionStatus::Pending));
}

#[sqlx::test(migrations = "../../migrations")]
async fn approval_promotes_submission_to_active_vendor(pool: sqlx::PgPool) {
    let repo = PgVendorRepository::new(pool);
    let submission_id = repo
        .create_submission(&new_submission("Brazos Livestock"))
        .await
        .expect("create");

    let vendor_id = approve_submission(&repo, &submission_id)
        .await
        .expect("approve");

    let vendor = repo
        .fetch_by_id(&vendor_id)
        .await
        .expect("fetch")
        .expect("vendor exists");
    assert_eq!(vendor.name, "Brazos Livestock");
    assert_eq!(vendor.status, VendorStatus::Active);
    assert_eq!(vendor.city, "Waco");
    assert_eq!(vendor.service_radius_miles, 40);
    assert!(vendor.emergency_service);

    let submission = repo
        .fetch_submission(&submission_id)
        .await
        .expect("fetch")
        .expect("submission exists");
    assert_eq!(submission.submission_status, SubmissionStatus::Approved);
    assert!(repo.list_pending().await.expect("list").is_empty());
}

#[sqlx::test(migrations = "../../migrations")]
async fn rejected_submission_cannot_be_approved(pool: sqlx::PgPool) {
    let repo = PgVendorRepository::new(pool);
    let submission_id = repo
        .create_submission(&new_submission("Late Entry"))
        .await
        .expect("create");

    reject_submission(&repo, &submission_id)
        .await
        .expect("reject");
    assert!(approve_submission(&repo, &submission_id).await.is_err());
    assert!(repo
        .fetch(&VendorFilter::default())
        .await
        .expect("fetch")
        .is_empty());
}

#[sqlx::test(migrations = "../../migrations")]
async fn second_approval_is_refused_by_the_database(pool: sqlx::PgPool) {
    let repo = PgVendorRepository::new(pool.clone());
    let submission_id = repo
        .create_submission(&new_submission("Double Click Ranch"))
        .await
        .expect("create");
    let snapshot = repo
        .fetch_submission(&submission_id)
        .await
        .expect("fetch")
        .expect("submission exists");
    let vendor = NewVendor::from_submission(&snapshot);

    let first = repo
        .approve_pending(&submission_id, &vendor)
        .await
        .expect("first approval");
    assert!(first.is_some());

    // Same stale snapshot, as a second admin would hold it.
    let second = repo
        .approve_pending(&submission_id, &vendor)
        .await
        .expect("second approval");
    assert!(second.is_none());
    assert!(!repo
        .set_submission_status(&submission_id, SubmissionStatus::Rejected)
        .await
        .expect("reject"));

    let uuid = Uuid::parse_str(&submission_id).expect("uuid id");
    let updated = pasture_db::update_submission_status(&pool, uuid, SubmissionStatus::Rejected)
        .await
        .expect("update");
    assert_eq!(updated, 0);

    assert_eq!(
        repo.fetch(&VendorFilter::default())
            .await
            .expect("fetch")
            .len(),
        1
    );
}

#[sqlx::test(migrations = "../../migrations")]
async fn concurrent_approvals_publish_one_vendor(pool: sqlx::PgPool) {
    let repo = PgVendorRepository::new(pool);
    let submission_id = repo
        .create_submission(&new_submission("Two Admins Hauling"))
        .await
        .expect("create");

    let (a, b) = tokio::join!(
        approve_submission(&repo, &submission_id),
        approve_submission(&repo, &submission_id)
    );
    assert_eq!(
        usize::from(a.is_ok()) + usize::from(b.is_ok()),
        1,
        "a: {a:?}, b: {b:?}"
    );
    assert_eq!(
        repo.fetch(&VendorFilter::default())
            .await
            .expect("fetch")
            .len(),
        1
    );
}

#[sqlx::test(migrations = "../../migrations")]
async fn deciding_an_unknown_submission_is_not_found(pool: sqlx::PgPool) {
    let repo = PgVendorRepository::new(pool);
    let missing = Uuid::new_v4().to_string();

    let err = repo
        .set_submission_status(&missing, SubmissionStatus::Rejected)
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound { .. }));

    let vendor = new_vendor("Ghost", &["Horse"], VendorStatus::Active);
    let err = repo.approve_pending(&missing, &vendor).await.unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound { .. }));
}

#[sqlx::test(migrations = "../../migrations")]
async fn health_check_passes_on_live_pool(pool: sqlx::PgPool) {
    let repo = PgVendorRepository::new(pool);
    repo.health_check().await.expect("healthy");
}
