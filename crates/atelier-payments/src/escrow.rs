//! In-process escrow.
//!
//! Tracks two pots per account: funds deposited into escrow ahead of a
//! purchase, and settled balances credited by transfers and refunds.
//! Mirrors the bookkeeping a real processor would do, which lets tests
//! observe exact balance effects of a purchase.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use atelier_types::AccountId;

use crate::{PaymentError, PaymentProcessor, Result};

/// In-memory [`PaymentProcessor`] implementation.
#[derive(Default)]
pub struct MemoryEscrow {
    inner: Mutex<EscrowState>,
}

#[derive(Default)]
struct EscrowState {
    /// Funds deposited ahead of a purchase, per account.
    escrowed: HashMap<AccountId, u64>,
    /// Settled funds, per account.
    settled: HashMap<AccountId, u64>,
}

impl MemoryEscrow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deposit funds into an account's escrow.
    pub fn deposit(&self, account: &AccountId, amount: u64) {
        let mut state = self.lock();
        *state.escrowed.entry(account.clone()).or_insert(0) += amount;
    }

    /// Funds currently held in escrow for an account.
    pub fn escrowed(&self, account: &AccountId) -> u64 {
        self.lock().escrowed.get(account).copied().unwrap_or(0)
    }

    /// Settled balance of an account.
    pub fn balance(&self, account: &AccountId) -> u64 {
        self.lock().settled.get(account).copied().unwrap_or(0)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, EscrowState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PaymentProcessor for MemoryEscrow {
    fn transfer(&self, from: &AccountId, to: &AccountId, amount: u64) -> Result<()> {
        let mut state = self.lock();
        let escrowed = state.escrowed.entry(from.clone()).or_insert(0);
        if *escrowed < amount {
            return Err(PaymentError::TransferFailed(format!(
                "insufficient escrow for {from}: have {escrowed}, need {amount}"
            )));
        }
        *escrowed -= amount;
        *state.settled.entry(to.clone()).or_insert(0) += amount;
        tracing::debug!(%from, %to, amount, "escrow transfer settled");
        Ok(())
    }

    fn refund(&self, to: &AccountId, amount: u64) -> Result<()> {
        let mut state = self.lock();
        let escrowed = state.escrowed.entry(to.clone()).or_insert(0);
        if *escrowed < amount {
            return Err(PaymentError::TransferFailed(format!(
                "insufficient escrow for refund to {to}: have {escrowed}, need {amount}"
            )));
        }
        *escrowed -= amount;
        *state.settled.entry(to.clone()).or_insert(0) += amount;
        tracing::debug!(%to, amount, "escrow refunded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deposit_and_transfer() {
        let escrow = MemoryEscrow::new();
        let bob = AccountId::from("bob");
        let alice = AccountId::from("alice");

        escrow.deposit(&bob, 100);
        assert_eq!(escrow.escrowed(&bob), 100);

        escrow.transfer(&bob, &alice, 100).expect("transfer");
        assert_eq!(escrow.escrowed(&bob), 0);
        assert_eq!(escrow.balance(&alice), 100);
        assert_eq!(escrow.balance(&bob), 0);
    }

    #[test]
    fn test_transfer_insufficient_escrow() {
        let escrow = MemoryEscrow::new();
        let bob = AccountId::from("bob");
        let alice = AccountId::from("alice");

        escrow.deposit(&bob, 50);
        let result = escrow.transfer(&bob, &alice, 100);
        assert!(matches!(result, Err(PaymentError::TransferFailed(_))));
        assert_eq!(escrow.escrowed(&bob), 50, "failed transfer moves nothing");
        assert_eq!(escrow.balance(&alice), 0);
    }

    #[test]
    fn test_refund_returns_overpayment() {
        let escrow = MemoryEscrow::new();
        let bob = AccountId::from("bob");
        let alice = AccountId::from("alice");

        escrow.deposit(&bob, 150);
        escrow.transfer(&bob, &alice, 100).expect("transfer");
        escrow.refund(&bob, 50).expect("refund");

        assert_eq!(escrow.escrowed(&bob), 0);
        assert_eq!(escrow.balance(&bob), 50);
        assert_eq!(escrow.balance(&alice), 100);
    }

    #[test]
    fn test_refund_without_escrow_fails() {
        let escrow = MemoryEscrow::new();
        let bob = AccountId::from("bob");
        assert!(escrow.refund(&bob, 10).is_err());
    }
}
