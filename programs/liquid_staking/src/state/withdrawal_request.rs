use crate::error::*;
use crate::math::SafeMath;
use anchor_lang::prelude::*;

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum WithdrawalStatus {
    #[default]
    Pending,
    Processed,
    Canceled,
}

/// A delayed exit. Never closed, only marked terminal.
#[account]
#[derive(Default)]
pub struct WithdrawalRequest {
    /// Sequential id within the pool
    pub id: u64,
    /// Pool this request belongs to
    pub pool: Pubkey,
    /// Only the owner may process or cancel
    pub owner: Pubkey,
    /// Base asset value locked in at request time
    pub base_asset_amount: u128,
    /// Shares burned when the request was made
    pub shares_burned: u64,
    /// When the request was made
    pub requested_at: i64,
    /// Earliest time the request can be processed
    pub unlock_time: i64,
    /// Current status
    pub status: WithdrawalStatus,
    /// When the request was processed or canceled
    pub settled_at: i64,
    /// Bump seed for PDA
    pub bump: u8,
}

impl WithdrawalRequest {
    pub const LEN: usize = 8 + // discriminator
        8 + // id
        32 + // pool
        32 + // owner
        16 + // base_asset_amount
        8 + // shares_burned
        8 + // requested_at
        8 + // unlock_time
        1 + // status
        8 + // settled_at
        1 + // bump
        16; // padding

    pub fn is_pending(&self) -> bool {
        self.status == WithdrawalStatus::Pending
    }

    /// Whether the request can be processed at `now` and how long until it unlocks
    pub fn can_process(&self, now: i64) -> ExitStatus {
        // negative remaining time clamps to zero
        let seconds_remaining = u64::try_from(self.unlock_time.saturating_sub(now)).unwrap_or(0);

        ExitStatus {
            processable: self.is_pending() && now >= self.unlock_time,
            seconds_remaining,
        }
    }

    pub fn require_owner(&self, caller: &Pubkey) -> VaultResult {
        if self.owner != *caller {
            return Err(VaultError::NotOwner);
        }
        Ok(())
    }

    pub fn mark_processed(&mut self, now: i64) -> VaultResult {
        if !self.is_pending() {
            return Err(VaultError::RequestNotPending);
        }
        if now < self.unlock_time {
            return Err(VaultError::NotYetUnlocked);
        }
        self.status = WithdrawalStatus::Processed;
        self.settled_at = now;
        Ok(())
    }

    pub fn mark_canceled(&mut self, now: i64) -> VaultResult {
        if !self.is_pending() {
            return Err(VaultError::RequestNotPending);
        }
        self.status = WithdrawalStatus::Canceled;
        self.settled_at = now;
        Ok(())
    }

    pub fn unlock_time_for(requested_at: i64, withdrawal_delay: i64) -> VaultResult<i64> {
        requested_at.safe_add(withdrawal_delay)
    }
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExitStatus {
    pub processable: bool,
    pub seconds_remaining: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending_request(unlock_time: i64) -> WithdrawalRequest {
        WithdrawalRequest {
            id: 0,
            owner: Pubkey::new_unique(),
            base_asset_amount: 55,
            unlock_time,
            ..Default::default()
        }
    }

    #[test]
    fn test_can_process_before_and_after_unlock() {
        let request = pending_request(1_000);

        assert_eq!(
            request.can_process(400),
            ExitStatus { processable: false, seconds_remaining: 600 }
        );
        assert_eq!(
            request.can_process(1_000),
            ExitStatus { processable: true, seconds_remaining: 0 }
        );
        assert_eq!(
            request.can_process(5_000),
            ExitStatus { processable: true, seconds_remaining: 0 }
        );
    }

    #[test]
    fn test_terminal_requests_are_never_processable() {
        let mut request = pending_request(1_000);
        request.mark_canceled(10).unwrap();
        assert_eq!(request.status, WithdrawalStatus::Canceled);
        assert!(!request.can_process(2_000).processable);
    }

    #[test]
    fn test_status_transitions_happen_once() {
        let mut request = pending_request(1_000);
        assert!(matches!(request.mark_processed(999), Err(VaultError::NotYetUnlocked)));
        request.mark_processed(1_000).unwrap();
        assert_eq!(request.settled_at, 1_000);

        assert!(matches!(request.mark_processed(2_000), Err(VaultError::RequestNotPending)));
        assert!(matches!(request.mark_canceled(2_000), Err(VaultError::RequestNotPending)));
        assert_eq!(request.status, WithdrawalStatus::Processed);
    }

    #[test]
    fn test_require_owner() {
        let request = pending_request(1_000);
        assert!(request.require_owner(&request.owner.clone()).is_ok());
        assert!(matches!(
            request.require_owner(&Pubkey::new_unique()),
            Err(VaultError::NotOwner)
        ));
    }
}
