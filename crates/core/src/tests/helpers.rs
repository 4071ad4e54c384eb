// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::provider::{AssignmentProvider, AssignmentRecord, InMemoryDirectory, ProviderError};
use crate::service::LicenseService;
use seatwise_audit::MemoryAuditSink;
use seatwise_domain::{
    AssignmentRequest, AssignmentTarget, HeldLicenses, LicenseCatalog, LicenseType, TargetKind,
};
use seatwise_inventory::{
    InMemoryInventoryStore, InventoryError, InventoryLedger, InventoryStore, SeatTotals,
};
use std::sync::Arc;
use std::time::Duration;

pub type TestService<S, P> = LicenseService<S, P, MemoryAuditSink>;

pub fn create_test_target() -> AssignmentTarget {
    AssignmentTarget::new(String::from("user-001"), TargetKind::User)
}

pub fn create_test_request(license_type: LicenseType) -> AssignmentRequest {
    AssignmentRequest::single(create_test_target(), license_type)
}

pub fn create_seeded_store(seats: u32) -> InMemoryInventoryStore {
    let store: InMemoryInventoryStore = InMemoryInventoryStore::new();
    for license_type in LicenseType::ALL {
        store
            .register(license_type, seats)
            .expect("register license type");
    }
    store
}

pub fn create_test_service(seats: u32) -> TestService<InMemoryInventoryStore, InMemoryDirectory> {
    create_service_with_provider(seats, InMemoryDirectory::new())
}

pub fn create_service_with_provider<P: AssignmentProvider>(
    seats: u32,
    provider: P,
) -> TestService<InMemoryInventoryStore, P> {
    LicenseService::new(
        Arc::new(LicenseCatalog::standard()),
        InventoryLedger::new(create_seeded_store(seats)),
        provider,
        MemoryAuditSink::new(),
    )
}

pub fn available<S: InventoryStore, P: AssignmentProvider>(
    service: &TestService<S, P>,
    license_type: LicenseType,
) -> u32 {
    service
        .ledger()
        .available_seats(license_type)
        .expect("read available seats")
}

/// Refuses every grant; everything else behaves normally.
pub struct RejectingProvider;

impl AssignmentProvider for RejectingProvider {
    async fn held_licenses(
        &self,
        _target: &AssignmentTarget,
    ) -> Result<HeldLicenses, ProviderError> {
        Ok(HeldLicenses::new())
    }

    async fn grant(
        &self,
        _target: &AssignmentTarget,
        _license_type: LicenseType,
        _quantity: u32,
    ) -> Result<String, ProviderError> {
        Err(ProviderError::Rejected(String::from(
            "target account is disabled",
        )))
    }

    async fn lookup(&self, _assignment_id: &str) -> Result<Option<AssignmentRecord>, ProviderError> {
        Ok(None)
    }

    async fn revoke(&self, _assignment_id: &str) -> Result<(), ProviderError> {
        Ok(())
    }
}

/// Answers held-set reads but cannot perform any side effect.
pub struct UnavailableProvider;

impl AssignmentProvider for UnavailableProvider {
    async fn held_licenses(
        &self,
        _target: &AssignmentTarget,
    ) -> Result<HeldLicenses, ProviderError> {
        Ok(HeldLicenses::new())
    }

    async fn grant(
        &self,
        _target: &AssignmentTarget,
        _license_type: LicenseType,
        _quantity: u32,
    ) -> Result<String, ProviderError> {
        Err(ProviderError::Unavailable(String::from(
            "directory connection refused",
        )))
    }

    async fn lookup(&self, _assignment_id: &str) -> Result<Option<AssignmentRecord>, ProviderError> {
        Err(ProviderError::Unavailable(String::from(
            "directory connection refused",
        )))
    }

    async fn revoke(&self, _assignment_id: &str) -> Result<(), ProviderError> {
        Err(ProviderError::Unavailable(String::from(
            "directory connection refused",
        )))
    }
}

/// Validates fast, then never answers the grant.
pub struct StalledGrantProvider;

impl AssignmentProvider for StalledGrantProvider {
    async fn held_licenses(
        &self,
        _target: &AssignmentTarget,
    ) -> Result<HeldLicenses, ProviderError> {
        Ok(HeldLicenses::new())
    }

    async fn grant(
        &self,
        _target: &AssignmentTarget,
        _license_type: LicenseType,
        _quantity: u32,
    ) -> Result<String, ProviderError> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Err(ProviderError::Unavailable(String::from("unreachable")))
    }

    async fn lookup(&self, _assignment_id: &str) -> Result<Option<AssignmentRecord>, ProviderError> {
        Ok(None)
    }

    async fn revoke(&self, _assignment_id: &str) -> Result<(), ProviderError> {
        Ok(())
    }
}

/// Never answers the held-set read.
pub struct StalledProvider;

impl AssignmentProvider for StalledProvider {
    async fn held_licenses(
        &self,
        _target: &AssignmentTarget,
    ) -> Result<HeldLicenses, ProviderError> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(HeldLicenses::new())
    }

    async fn grant(
        &self,
        _target: &AssignmentTarget,
        _license_type: LicenseType,
        _quantity: u32,
    ) -> Result<String, ProviderError> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Err(ProviderError::Unavailable(String::from("unreachable")))
    }

    async fn lookup(&self, _assignment_id: &str) -> Result<Option<AssignmentRecord>, ProviderError> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(None)
    }

    async fn revoke(&self, _assignment_id: &str) -> Result<(), ProviderError> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(())
    }
}

/// An inventory store that is always unreachable.
pub struct FailingStore;

impl InventoryStore for FailingStore {
    fn register(&self, _license_type: LicenseType, _total: u32) -> Result<(), InventoryError> {
        Err(InventoryError::StoreUnavailable(String::from(
            "connection refused",
        )))
    }

    fn get_totals(&self, _license_type: LicenseType) -> Result<SeatTotals, InventoryError> {
        Err(InventoryError::StoreUnavailable(String::from(
            "connection refused",
        )))
    }

    fn try_set_consumed(
        &self,
        _license_type: LicenseType,
        _expected: u32,
        _desired: u32,
    ) -> Result<bool, InventoryError> {
        Err(InventoryError::StoreUnavailable(String::from(
            "connection refused",
        )))
    }
}
