use serde_json::json;

use super::*;
use crate::memory::MemoryVendorRepository;
use crate::test_support::StubGeocoder;
use crate::vendor::SubmissionStatus;

fn complete_form() -> SubmissionForm {
    SubmissionForm {
        business_name: Some("Lone Star Livestock".to_string()),
        contact_name: Some("Sam Rivera".to_string()),
        phone: Some("555-0101".to_string()),
        email: Some("sam@example.com".to_string()),
        address: Some("1 Ranch Rd, Austin, TX".to_string()),
        description: Some("Same-day pickup".to_string()),
        services: vec!["Dead Horse Removal".to_string()],
        species: vec!["Horse".to_string(), "Cattle".to_string()],
        service_radius: Some(json!("40")),
        ..SubmissionForm::default()
    }
}

#[tokio::test]
async fn geocodes_when_coordinates_are_missing() {
    let repo = MemoryVendorRepository::new();
    let geocoder = StubGeocoder::found(30.27, -97.74);
    let intake = SubmissionIntake::new(&repo, &geocoder);

    let id = intake.submit(complete_form(), "203.0.113.7").await.unwrap();

    assert_eq!(geocoder.calls(), 1);
    let stored = repo.fetch_submission(&id).await.unwrap().expect("stored");
    assert_eq!(stored.submission_status, SubmissionStatus::Pending);
    assert!((stored.latitude - 30.27).abs() < f64::EPSILON);
    assert_eq!(stored.state_code.as_deref(), Some("TX"));
    assert_eq!(stored.city.as_deref(), Some("Austin"));
    assert_eq!(stored.service_radius_miles, 40);
    assert_eq!(stored.submitter_ip, "203.0.113.7");
}

#[tokio::test]
async fn supplied_coordinates_skip_the_geocoder() {
    let repo = MemoryVendorRepository::new();
    let geocoder = StubGeocoder::not_found();
    let intake = SubmissionIntake::new(&repo, &geocoder);

    let form = SubmissionForm {
        latitude: Some(35.2),
        longitude: Some(-101.8),
        state_code: Some("TX".to_string()),
        ..complete_form()
    };
    let id = intake.submit(form, "unknown").await.unwrap();

    assert_eq!(geocoder.calls(), 0);
    let stored = repo.fetch_submission(&id).await.unwrap().expect("stored");
    assert!((stored.longitude + 101.8).abs() < f64::EPSILON);
    assert_eq!(stored.state_code.as_deref(), Some("TX"));
}

#[tokio::test]
async fn zero_coordinates_count_as_missing() {
    let repo = MemoryVendorRepository::new();
    let geocoder = StubGeocoder::found(30.27, -97.74);
    let intake = SubmissionIntake::new(&repo, &geocoder);

    let form = SubmissionForm {
        latitude: Some(0.0),
        longitude: Some(0.0),
        ..complete_form()
    };
    intake.submit(form, "unknown").await.unwrap();
    assert_eq!(geocoder.calls(), 1);
}

#[tokio::test]
async fn empty_services_are_rejected_before_storage() {
    let repo = MemoryVendorRepository::new();
    let geocoder = StubGeocoder::found(30.27, -97.74);
    let intake = SubmissionIntake::new(&repo, &geocoder);

    let form = SubmissionForm {
        services: vec!["  ".to_string()],
        ..complete_form()
    };
    let err = intake.submit(form, "unknown").await.unwrap_err();

    assert!(matches!(err, IntakeError::MissingField("services")));
    assert_eq!(err.field(), Some("services"));
    assert!(repo.submissions().is_empty());
    assert_eq!(geocoder.calls(), 0);
}

#[tokio::test]
async fn each_required_field_is_named_in_the_error() {
    let repo = MemoryVendorRepository::new();
    let geocoder = StubGeocoder::found(30.27, -97.74);
    let intake = SubmissionIntake::new(&repo, &geocoder);

    let cases: [(&str, fn(&mut SubmissionForm)); 6] = [
        ("business_name", |f| f.business_name = None),
        ("contact_name", |f| f.contact_name = Some("   ".to_string())),
        ("phone", |f| f.phone = None),
        ("email", |f| f.email = Some(String::new())),
        ("address", |f| f.address = None),
        ("description", |f| f.description = None),
    ];

    for (field, blank) in cases {
        let mut form = complete_form();
        blank(&mut form);
        let err = intake.submit(form, "unknown").await.unwrap_err();
        assert_eq!(err.field(), Some(field), "{err}");
        assert!(err.is_validation());
    }
    assert!(repo.submissions().is_empty());
}

#[tokio::test]
async fn ungeocodable_address_is_a_validation_error() {
    let repo = MemoryVendorRepository::new();
    let geocoder = StubGeocoder::not_found();
    let intake = SubmissionIntake::new(&repo, &geocoder);

    let err = intake.submit(complete_form(), "unknown").await.unwrap_err();
    assert!(matches!(err, IntakeError::GeocodeNotFound { .. }));
    assert_eq!(err.field(), Some("address"));
    assert!(repo.submissions().is_empty());
}

#[tokio::test]
async fn geocoder_outage_is_not_a_validation_error() {
    let repo = MemoryVendorRepository::new();
    let geocoder = StubGeocoder::failing("OVER_QUERY_LIMIT");
    let intake = SubmissionIntake::new(&repo, &geocoder);

    let err = intake.submit(complete_form(), "unknown").await.unwrap_err();
    assert!(matches!(err, IntakeError::Geocoder(_)));
    assert!(!err.is_validation());
}

#[test]
fn service_radius_normalization() {
    assert_eq!(normalize_service_radius(None), DEFAULT_SERVICE_RADIUS_MILES);
    assert_eq!(normalize_service_radius(Some(&json!(null))), 25);
    assert_eq!(normalize_service_radius(Some(&json!(30))), 30);
    assert_eq!(normalize_service_radius(Some(&json!(30.9))), 30);
    assert_eq!(normalize_service_radius(Some(&json!("45"))), 45);
    assert_eq!(normalize_service_radius(Some(&json!(" 30 miles"))), 30);
    assert_eq!(normalize_service_radius(Some(&json!("about 30"))), 25);
    assert_eq!(normalize_service_radius(Some(&json!(""))), 25);
    assert_eq!(normalize_service_radius(Some(&json!(0))), 25);
    assert_eq!(normalize_service_radius(Some(&json!("-10"))), 25);
    assert_eq!(normalize_service_radius(Some(&json!(true))), 25);
}

#[test]
fn form_deserializes_with_missing_fields() {
    let form: SubmissionForm = serde_json::from_value(json!({
        "business_name": "Acme",
        "services": ["Farm Cleanup Services"],
        "service_radius": 15
    }))
    .unwrap();
    assert_eq!(form.business_name.as_deref(), Some("Acme"));
    assert!(form.contact_name.is_none());
    assert!(!form.emergency_service);
    assert_eq!(normalize_service_radius(form.service_radius.as_ref()), 15);
}
