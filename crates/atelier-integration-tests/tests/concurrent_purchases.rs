//! Integration test: total ordering under concurrency.
//!
//! The store serializes every mutating operation, so racing callers
//! must observe all-or-nothing outcomes:
//! 1. Two buyers racing the same (content, buyer) pair: exactly one
//!    purchase commits, the rest see AlreadyPurchased
//! 2. Distinct buyers racing the same content all succeed exactly once
//! 3. Concurrent content creation allocates gap-free, strictly
//!    increasing ids
//!
//! The core is synchronous, so the races are driven with OS threads.

use std::sync::Arc;
use std::thread;

use atelier_db::Db;
use atelier_hub::{HubError, MarketplaceHub};
use atelier_ledger::LedgerError;
use atelier_payments::MemoryEscrow;
use atelier_types::{AccountId, ContentId};

fn test_hub() -> (MarketplaceHub, Arc<MemoryEscrow>) {
    let escrow = Arc::new(MemoryEscrow::new());
    let hub = MarketplaceHub::new(Db::open_memory().expect("open db"), escrow.clone());
    (hub, escrow)
}

#[test]
fn same_buyer_race_has_exactly_one_winner() {
    let (hub, escrow) = test_hub();
    let alice = AccountId::from("alice");
    let bob = AccountId::from("bob");

    hub.register_creator(&alice, "Alice", "").expect("register");
    let content_id = hub.create_content(&alice, "T", "r", 100).expect("create");
    escrow.deposit(&bob, 100);

    const RACERS: usize = 8;
    let results: Vec<_> = (0..RACERS)
        .map(|_| {
            let hub = hub.clone();
            let bob = bob.clone();
            thread::spawn(move || hub.purchase_content(&bob, content_id, 100))
        })
        .collect::<Vec<_>>()
        .into_iter()
        .map(|handle| handle.join().expect("thread panicked"))
        .collect();

    let successes = results.iter().filter(|r| r.is_ok()).count();
    let already = results
        .iter()
        .filter(|r| {
            matches!(
                r,
                Err(HubError::Ledger(LedgerError::AlreadyPurchased(_)))
            )
        })
        .count();

    assert_eq!(successes, 1, "exactly one racer may win");
    assert_eq!(already, RACERS - 1, "every loser observes AlreadyPurchased");

    let stats = hub.get_platform_stats().expect("stats");
    assert_eq!(stats.total_revenue, 100, "revenue increases exactly once");
    assert_eq!(escrow.balance(&alice), 100, "the creator is paid exactly once");
    assert!(hub.has_access_to_content(&bob, content_id).expect("access"));
}

#[test]
fn distinct_buyers_race_all_succeed_once() {
    let (hub, escrow) = test_hub();
    let alice = AccountId::from("alice");

    hub.register_creator(&alice, "Alice", "").expect("register");
    let content_id = hub.create_content(&alice, "T", "r", 100).expect("create");

    const BUYERS: usize = 10;
    let handles: Vec<_> = (0..BUYERS)
        .map(|i| {
            let hub = hub.clone();
            let buyer = AccountId::from(format!("buyer-{i}"));
            escrow.deposit(&buyer, 100);
            thread::spawn(move || hub.purchase_content(&buyer, content_id, 100))
        })
        .collect();
    for handle in handles {
        handle.join().expect("thread panicked").expect("purchase succeeds");
    }

    let stats = hub.get_platform_stats().expect("stats");
    assert_eq!(stats.total_revenue, 100 * BUYERS as u64);
    assert_eq!(escrow.balance(&alice), 100 * BUYERS as u64);
    for i in 0..BUYERS {
        let buyer = AccountId::from(format!("buyer-{i}"));
        assert!(hub.has_access_to_content(&buyer, content_id).expect("access"));
    }
}

#[test]
fn concurrent_creation_allocates_gap_free_ids() {
    let (hub, _) = test_hub();

    const CREATORS: usize = 6;
    const PER_CREATOR: usize = 5;

    for i in 0..CREATORS {
        let creator = AccountId::from(format!("creator-{i}"));
        hub.register_creator(&creator, &format!("Creator {i}"), "")
            .expect("register");
    }

    let handles: Vec<_> = (0..CREATORS)
        .map(|i| {
            let hub = hub.clone();
            thread::spawn(move || {
                let creator = AccountId::from(format!("creator-{i}"));
                (0..PER_CREATOR)
                    .map(|j| {
                        hub.create_content(&creator, &format!("T{j}"), "ref", 10)
                            .expect("create")
                    })
                    .collect::<Vec<ContentId>>()
            })
        })
        .collect();

    let mut ids: Vec<ContentId> = handles
        .into_iter()
        .flat_map(|handle| handle.join().expect("thread panicked"))
        .collect();
    ids.sort_unstable();

    let expected: Vec<ContentId> = (1..=(CREATORS * PER_CREATOR) as ContentId).collect();
    assert_eq!(ids, expected, "ids are gap-free, unique, and start at 1");

    // Each creator's own index is in creation order.
    for i in 0..CREATORS {
        let creator = AccountId::from(format!("creator-{i}"));
        let index = hub.creator_content(&creator).expect("index");
        assert_eq!(index.len(), PER_CREATOR);
        assert!(index.windows(2).all(|w| w[0] < w[1]), "index is ordered");
    }
}
