// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Over-allocation safety under concurrent reservation.

use crate::{InMemoryInventoryStore, InventoryLedger, InventoryStore};
use seatwise_domain::LicenseType;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::thread;

#[test]
fn test_concurrent_reservations_never_overallocate() {
    let store: InMemoryInventoryStore = InMemoryInventoryStore::new();
    store
        .register(LicenseType::M365E5, 5)
        .expect("register should succeed");
    let ledger: Arc<InventoryLedger<InMemoryInventoryStore>> =
        Arc::new(InventoryLedger::new(store));

    let successes: Arc<AtomicU32> = Arc::new(AtomicU32::new(0));
    let mut handles: Vec<thread::JoinHandle<()>> = Vec::new();

    // 20 threads race for 5 seats.
    for _ in 0..20 {
        let ledger: Arc<InventoryLedger<InMemoryInventoryStore>> = Arc::clone(&ledger);
        let successes: Arc<AtomicU32> = Arc::clone(&successes);
        handles.push(thread::spawn(move || {
            if ledger.reserve(LicenseType::M365E5, 1).is_ok() {
                successes.fetch_add(1, Ordering::SeqCst);
            }
        }));
    }

    for handle in handles {
        handle.join().expect("thread should not panic");
    }

    assert_eq!(successes.load(Ordering::SeqCst), 5);
    assert_eq!(ledger.available_seats(LicenseType::M365E5).unwrap(), 0);
}

#[test]
fn test_concurrent_multi_seat_reservations_respect_total() {
    let store: InMemoryInventoryStore = InMemoryInventoryStore::new();
    store
        .register(LicenseType::M365E3, 10)
        .expect("register should succeed");
    let ledger: Arc<InventoryLedger<InMemoryInventoryStore>> =
        Arc::new(InventoryLedger::new(store));

    let reserved: Arc<AtomicU32> = Arc::new(AtomicU32::new(0));
    let mut handles: Vec<thread::JoinHandle<()>> = Vec::new();

    // Mixed quantities racing for 10 seats.
    for quantity in [1_u32, 2, 3, 4, 1, 2, 3, 4] {
        let ledger: Arc<InventoryLedger<InMemoryInventoryStore>> = Arc::clone(&ledger);
        let reserved: Arc<AtomicU32> = Arc::clone(&reserved);
        handles.push(thread::spawn(move || {
            if ledger.reserve(LicenseType::M365E3, quantity).is_ok() {
                reserved.fetch_add(quantity, Ordering::SeqCst);
            }
        }));
    }

    for handle in handles {
        handle.join().expect("thread should not panic");
    }

    let total_reserved: u32 = reserved.load(Ordering::SeqCst);
    assert!(total_reserved <= 10, "over-allocated: {total_reserved}");
    assert_eq!(
        ledger.available_seats(LicenseType::M365E3).unwrap(),
        10 - total_reserved
    );
}

#[test]
fn test_concurrent_reserve_and_release_stay_consistent() {
    let store: InMemoryInventoryStore = InMemoryInventoryStore::new();
    store
        .register(LicenseType::AadPremiumP1, 4)
        .expect("register should succeed");
    let ledger: Arc<InventoryLedger<InMemoryInventoryStore>> =
        Arc::new(InventoryLedger::new(store));

    let mut handles: Vec<thread::JoinHandle<()>> = Vec::new();
    for _ in 0..8 {
        let ledger: Arc<InventoryLedger<InMemoryInventoryStore>> = Arc::clone(&ledger);
        handles.push(thread::spawn(move || {
            // Every successful reserve is paired with a release, so the
            // ledger must end where it started.
            for _ in 0..50 {
                if ledger.reserve(LicenseType::AadPremiumP1, 1).is_ok() {
                    ledger
                        .release(LicenseType::AadPremiumP1, 1)
                        .expect("release should succeed");
                }
            }
        }));
    }

    for handle in handles {
        handle.join().expect("thread should not panic");
    }

    assert_eq!(ledger.available_seats(LicenseType::AadPremiumP1).unwrap(), 4);
}
