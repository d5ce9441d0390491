use crate::constants::*;
use crate::error::*;
use crate::math::{SafeCast, SafeMath};
use anchor_lang::prelude::*;

/// Per-owner index of withdrawal requests plus lifetime audit counters.
#[account]
#[derive(Default)]
pub struct Staker {
    /// The pool this staker belongs to
    pub pool: Pubkey,
    /// The staker's wallet
    pub owner: Pubkey,
    /// Total base asset deposited, fees included
    pub total_deposited: u128,
    /// Total base asset received from either exit path
    pub total_withdrawn: u128,
    /// Total emergency-exit penalties paid
    pub total_penalties_paid: u128,
    /// When the staker was created
    pub created_at: i64,
    /// Bump seed for PDA
    pub bump: u8,
    /// Ids of every withdrawal request this staker has made, oldest first
    pub request_ids: Vec<u64>,
}

impl Staker {
    const BASE_LEN: usize = 8 + // discriminator
        32 + // pool
        32 + // owner
        16 + // total_deposited
        16 + // total_withdrawn
        16 + // total_penalties_paid
        8 + // created_at
        1 + // bump
        4; // request_ids length prefix

    pub const INIT_LEN: usize = Self::space(0);

    pub const fn space(request_count: usize) -> usize {
        Self::BASE_LEN + 8 * request_count
    }

    pub fn initialize(&mut self, pool: Pubkey, owner: Pubkey, now: i64, bump: u8) {
        self.pool = pool;
        self.owner = owner;
        self.total_deposited = 0;
        self.total_withdrawn = 0;
        self.total_penalties_paid = 0;
        self.created_at = now;
        self.bump = bump;
        self.request_ids = Vec::new();
    }

    pub fn record_request(&mut self, id: u64) -> VaultResult {
        if self.request_ids.len() >= MAX_REQUESTS_PER_STAKER {
            return Err(VaultError::TooManyRequests);
        }
        self.request_ids.push(id);
        Ok(())
    }

    pub fn record_deposit(&mut self, amount: u64) -> VaultResult {
        self.total_deposited = self.total_deposited.safe_add(amount.safe_cast()?)?;
        Ok(())
    }

    pub fn record_withdrawal(&mut self, amount: u64, penalty: u64) -> VaultResult {
        self.total_withdrawn = self.total_withdrawn.safe_add(amount.safe_cast()?)?;
        self.total_penalties_paid = self.total_penalties_paid.safe_add(penalty.safe_cast()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_space_grows_by_one_id() {
        assert_eq!(Staker::space(1) - Staker::space(0), 8);
        assert_eq!(Staker::INIT_LEN, Staker::space(0));
    }

    #[test]
    fn test_request_index_is_bounded() {
        let mut staker = Staker::default();
        for id in 0..MAX_REQUESTS_PER_STAKER as u64 {
            staker.record_request(id).unwrap();
        }
        assert!(matches!(
            staker.record_request(u64::MAX),
            Err(VaultError::TooManyRequests)
        ));
        assert_eq!(staker.request_ids.len(), MAX_REQUESTS_PER_STAKER);
    }

    #[test]
    fn test_audit_counters() {
        let mut staker = Staker::default();
        staker.record_deposit(100).unwrap();
        staker.record_withdrawal(9, 1).unwrap();
        staker.record_withdrawal(55, 0).unwrap();
        assert_eq!(staker.total_deposited, 100);
        assert_eq!(staker.total_withdrawn, 64);
        assert_eq!(staker.total_penalties_paid, 1);
    }
}
