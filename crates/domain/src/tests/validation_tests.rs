// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    AssignmentRequest, AssignmentTarget, CatalogEntry, DomainError, LicenseCatalog, LicenseType,
    TargetKind, validate_request,
};

fn create_test_request(target_id: &str, quantity: u32) -> AssignmentRequest {
    AssignmentRequest::new(
        AssignmentTarget::new(target_id.to_string(), TargetKind::User),
        LicenseType::M365E3,
        quantity,
    )
}

#[test]
fn test_validate_request_accepts_well_formed_request() {
    let catalog: LicenseCatalog = LicenseCatalog::standard();
    let request: AssignmentRequest = create_test_request("u1", 1);

    assert!(validate_request(&request, &catalog).is_ok());
}

#[test]
fn test_validate_request_rejects_zero_quantity() {
    let catalog: LicenseCatalog = LicenseCatalog::standard();
    let request: AssignmentRequest = create_test_request("u1", 0);

    let errors: Vec<DomainError> =
        validate_request(&request, &catalog).expect_err("zero quantity should fail");
    assert_eq!(errors, vec![DomainError::InvalidQuantity(0)]);
}

#[test]
fn test_validate_request_rejects_empty_target_id() {
    let catalog: LicenseCatalog = LicenseCatalog::standard();
    let request: AssignmentRequest = create_test_request("", 1);

    let errors: Vec<DomainError> =
        validate_request(&request, &catalog).expect_err("empty target should fail");
    assert_eq!(errors, vec![DomainError::EmptyTargetId]);
}

#[test]
fn test_validate_request_rejects_whitespace_target_id() {
    let catalog: LicenseCatalog = LicenseCatalog::standard();
    let request: AssignmentRequest = create_test_request("   ", 1);

    let errors: Vec<DomainError> =
        validate_request(&request, &catalog).expect_err("blank target should fail");
    assert_eq!(errors, vec![DomainError::EmptyTargetId]);
}

#[test]
fn test_validate_request_rejects_type_outside_catalog() {
    let catalog: LicenseCatalog =
        LicenseCatalog::new([CatalogEntry::new(LicenseType::M365E5, [], [])])
            .expect("catalog should build");
    let request: AssignmentRequest = create_test_request("u1", 1);

    let errors: Vec<DomainError> =
        validate_request(&request, &catalog).expect_err("uncataloged type should fail");
    assert_eq!(
        errors,
        vec![DomainError::UnknownLicenseType(String::from("M365_E3"))]
    );
}

#[test]
fn test_validate_request_collects_every_shape_violation() {
    let catalog: LicenseCatalog =
        LicenseCatalog::new([CatalogEntry::new(LicenseType::M365E5, [], [])])
            .expect("catalog should build");
    let request: AssignmentRequest = create_test_request("", 0);

    let errors: Vec<DomainError> =
        validate_request(&request, &catalog).expect_err("malformed request should fail");
    assert_eq!(errors.len(), 3);
    assert!(errors.contains(&DomainError::InvalidQuantity(0)));
    assert!(errors.contains(&DomainError::EmptyTargetId));
    assert!(errors.contains(&DomainError::UnknownLicenseType(String::from("M365_E3"))));
}
