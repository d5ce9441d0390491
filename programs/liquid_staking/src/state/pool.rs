use crate::constants::*;
use crate::error::*;
use crate::math::{staking_math, SafeCast, SafeMath};
use anchor_lang::prelude::*;

/// Where the emergency-exit penalty ends up.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PenaltyDisposition {
    /// Penalty stays in custody and backs the remaining shares
    #[default]
    RetainInPool,
    /// Penalty is forwarded to the fee beneficiary
    ForwardToBeneficiary,
}

#[account]
#[derive(Default)]
pub struct Pool {
    /// Operator allowed to change configuration
    pub authority: Pubkey,
    /// The deposited base asset
    pub base_mint: Pubkey,
    /// The liquid share token, mint authority is this pool
    pub share_mint: Pubkey,
    /// Pool-owned token account holding the base asset
    pub custody: Pubkey,
    /// Token account of the revenue distributor receiving fees
    pub fee_beneficiary: Pubkey,
    /// Net base asset deposited minus net base asset paid out, before accrual
    pub total_principal: u128,
    /// Checkpoint of the last accrual fold
    pub last_accrual_time: i64,
    /// Annual yield rate in basis points
    pub annual_rate_bps: u16,
    /// Base asset reserved for pending withdrawal requests
    pub total_pending_withdrawals: u128,
    /// Cumulative deposit fees forwarded to the fee beneficiary
    pub total_fees_collected: u128,
    /// Emergency penalties retained since the last checkpoint
    pub retained_penalties: u128,
    /// Cumulative emergency penalties retained in the pool
    pub total_penalties_retained: u128,
    /// Cumulative emergency penalties forwarded to the fee beneficiary
    pub total_penalties_forwarded: u128,
    /// Cumulative base asset sent in to fund accrued yield
    pub total_rewards_funded: u128,
    /// Delay between an exit request and its unlock, in seconds
    pub withdrawal_delay: i64,
    /// Smallest accepted deposit
    pub min_deposit: u64,
    /// Fee skimmed from every deposit, in basis points
    pub deposit_fee_bps: u16,
    /// Allowed emergency-exit penalties, in basis points
    pub penalty_tiers: Vec<u16>,
    /// Where emergency-exit penalties go
    pub penalty_disposition: PenaltyDisposition,
    /// Id assigned to the next withdrawal request
    pub next_request_id: u64,
    /// Number of withdrawal requests still pending
    pub open_requests: u64,
    /// Whether new deposits and exits are paused
    pub is_paused: bool,
    /// Pool creation timestamp
    pub created_at: i64,
    /// Bump seed for the pool PDA
    pub bump: u8,
    /// Bump seed for the custody PDA
    pub custody_bump: u8,
    /// Reserved for future use
    pub _reserved: [u8; 32],
}

impl Pool {
    pub const LEN: usize = 8 + // discriminator
        32 + // authority
        32 + // base_mint
        32 + // share_mint
        32 + // custody
        32 + // fee_beneficiary
        16 + // total_principal
        8 + // last_accrual_time
        2 + // annual_rate_bps
        16 + // total_pending_withdrawals
        16 + // total_fees_collected
        16 + // retained_penalties
        16 + // total_penalties_retained
        16 + // total_penalties_forwarded
        16 + // total_rewards_funded
        8 + // withdrawal_delay
        8 + // min_deposit
        2 + // deposit_fee_bps
        4 + 2 * MAX_PENALTY_TIERS + // penalty_tiers
        1 + // penalty_disposition
        8 + // next_request_id
        8 + // open_requests
        1 + // is_paused
        8 + // created_at
        1 + // bump
        1 + // custody_bump
        32; // _reserved

    #[allow(clippy::too_many_arguments)]
    pub fn initialize(
        &mut self,
        authority: Pubkey,
        base_mint: Pubkey,
        share_mint: Pubkey,
        custody: Pubkey,
        fee_beneficiary: Pubkey,
        params: InitializePoolParams,
        now: i64,
        bump: u8,
        custody_bump: u8,
    ) -> VaultResult {
        self.authority = authority;
        self.base_mint = base_mint;
        self.share_mint = share_mint;
        self.custody = custody;
        self.fee_beneficiary = fee_beneficiary;
        self.total_principal = 0;
        self.last_accrual_time = now;
        self.total_pending_withdrawals = 0;
        self.total_fees_collected = 0;
        self.retained_penalties = 0;
        self.total_penalties_retained = 0;
        self.total_penalties_forwarded = 0;
        self.total_rewards_funded = 0;
        self.next_request_id = 0;
        self.open_requests = 0;
        self.is_paused = false;
        self.created_at = now;
        self.bump = bump;
        self.custody_bump = custody_bump;

        let annual_rate_bps = params.annual_rate_bps.unwrap_or(DEFAULT_ANNUAL_RATE_BPS);
        validate_annual_rate(annual_rate_bps)?;
        self.annual_rate_bps = annual_rate_bps;

        let withdrawal_delay = params.withdrawal_delay.unwrap_or(DEFAULT_WITHDRAWAL_DELAY);
        validate_withdrawal_delay(withdrawal_delay)?;
        self.withdrawal_delay = withdrawal_delay;

        let deposit_fee_bps = params.deposit_fee_bps.unwrap_or(DEFAULT_DEPOSIT_FEE_BPS);
        validate_deposit_fee(deposit_fee_bps)?;
        self.deposit_fee_bps = deposit_fee_bps;

        let min_deposit = params.min_deposit.unwrap_or(DEFAULT_MIN_DEPOSIT);
        if min_deposit == 0 {
            return Err(VaultError::InvalidPoolConfig);
        }
        self.min_deposit = min_deposit;

        let penalty_tiers = params
            .penalty_tiers
            .unwrap_or_else(|| DEFAULT_PENALTY_TIERS.to_vec());
        validate_penalty_tiers(&penalty_tiers)?;
        self.penalty_tiers = penalty_tiers;

        self.penalty_disposition = params.penalty_disposition.unwrap_or_default();

        Ok(())
    }

    /// Yield earned on principal since `last_accrual_time`, not yet folded in.
    pub fn accrued_since_checkpoint(&self, now: i64) -> VaultResult<u128> {
        let elapsed = now.safe_sub(self.last_accrual_time)?;
        staking_math::calculate_accrual(self.total_principal, self.annual_rate_bps, elapsed)
    }

    /// Everything that backs the outstanding shares at `now`
    pub fn pool_backing(&self, now: i64) -> VaultResult<u128> {
        self.total_principal
            .safe_add(self.retained_penalties)?
            .safe_add(self.accrued_since_checkpoint(now)?)
    }

    /// Fold accrued yield and retained penalties into principal.
    /// Must run before any mutation reads the rate.
    pub fn checkpoint(&mut self, now: i64) -> VaultResult<u128> {
        let accrued = self.accrued_since_checkpoint(now)?;

        self.total_principal = self
            .total_principal
            .safe_add(accrued)?
            .safe_add(self.retained_penalties)?;
        self.retained_penalties = 0;

        // a clock running backwards never rewinds the checkpoint
        if now > self.last_accrual_time {
            self.last_accrual_time = now;
        }

        Ok(accrued)
    }

    /// Exchange rate scaled by `RATE_PRECISION`
    pub fn rate(&self, total_shares: u64, now: i64) -> VaultResult<u128> {
        staking_math::calculate_rate(self.pool_backing(now)?, total_shares.safe_cast()?)
    }

    /// Backing not spoken for by pending withdrawals
    pub fn available_liquidity(&self, now: i64) -> VaultResult<u128> {
        Ok(self
            .pool_backing(now)?
            .saturating_sub(self.total_pending_withdrawals))
    }

    pub fn require_active(&self) -> VaultResult {
        if self.is_paused {
            return Err(VaultError::PoolPaused);
        }
        Ok(())
    }

    pub fn validate_penalty(&self, penalty_bps: u16) -> VaultResult {
        if !self.penalty_tiers.contains(&penalty_bps) {
            return Err(VaultError::InvalidPenaltyTier);
        }
        Ok(())
    }

    /// Change the yield rate. Elapsed time is settled at the old rate first.
    pub fn set_annual_rate(&mut self, annual_rate_bps: u16, now: i64) -> VaultResult<u128> {
        validate_annual_rate(annual_rate_bps)?;
        let accrued = self.checkpoint(now)?;
        self.annual_rate_bps = annual_rate_bps;
        Ok(accrued)
    }

    pub fn set_withdrawal_delay(&mut self, withdrawal_delay: i64) -> VaultResult {
        validate_withdrawal_delay(withdrawal_delay)?;
        self.withdrawal_delay = withdrawal_delay;
        Ok(())
    }

    pub fn set_deposit_fee(&mut self, deposit_fee_bps: u16) -> VaultResult {
        validate_deposit_fee(deposit_fee_bps)?;
        self.deposit_fee_bps = deposit_fee_bps;
        Ok(())
    }

    /// Point fee and forwarded-penalty transfers at a new token account of the base mint.
    pub fn set_fee_beneficiary(&mut self, account: Pubkey, mint: &Pubkey) -> VaultResult {
        if *mint != self.base_mint {
            return Err(VaultError::InvalidTokenMint);
        }
        self.fee_beneficiary = account;
        Ok(())
    }

    pub fn update_config(&mut self, params: UpdatePoolConfigParams, now: i64) -> VaultResult {
        // validate everything before touching state so a rejected update changes nothing
        if let Some(annual_rate_bps) = params.annual_rate_bps {
            validate_annual_rate(annual_rate_bps)?;
        }
        if let Some(withdrawal_delay) = params.withdrawal_delay {
            validate_withdrawal_delay(withdrawal_delay)?;
        }
        if let Some(deposit_fee_bps) = params.deposit_fee_bps {
            validate_deposit_fee(deposit_fee_bps)?;
        }
        if params.min_deposit == Some(0) {
            return Err(VaultError::InvalidPoolConfig);
        }
        if let Some(penalty_tiers) = &params.penalty_tiers {
            validate_penalty_tiers(penalty_tiers)?;
        }

        if let Some(annual_rate_bps) = params.annual_rate_bps {
            self.set_annual_rate(annual_rate_bps, now)?;
        }
        if let Some(withdrawal_delay) = params.withdrawal_delay {
            self.withdrawal_delay = withdrawal_delay;
        }
        if let Some(deposit_fee_bps) = params.deposit_fee_bps {
            self.deposit_fee_bps = deposit_fee_bps;
        }
        if let Some(min_deposit) = params.min_deposit {
            self.min_deposit = min_deposit;
        }
        if let Some(penalty_tiers) = params.penalty_tiers {
            self.penalty_tiers = penalty_tiers;
        }
        if let Some(penalty_disposition) = params.penalty_disposition {
            self.penalty_disposition = penalty_disposition;
        }
        if let Some(is_paused) = params.is_paused {
            self.is_paused = is_paused;
        }

        Ok(())
    }

    /// CRITICAL: Verify pool accounting after every state-modifying operation.
    /// `total_shares` is the share supply as it stands once the operation settles.
    pub fn verify_invariants(&self, total_shares: u64, now: i64) -> VaultResult {
        // Invariant 1: the rate never drops below the bootstrap peg
        let backing = self.pool_backing(now)?;
        let shares: u128 = total_shares.safe_cast()?;
        if shares > backing {
            msg!(
                "INVARIANT VIOLATION: share supply ({}) > pool backing ({})",
                shares,
                backing
            );
            return Err(VaultError::InvariantViolation);
        }

        // Invariant 2: nothing reserved without an open request
        if self.open_requests == 0 && self.total_pending_withdrawals != 0 {
            msg!(
                "INVARIANT VIOLATION: pending withdrawals ({}) with no open requests",
                self.total_pending_withdrawals
            );
            return Err(VaultError::InvariantViolation);
        }

        // Invariant 3: open requests never outnumber issued ids
        if self.open_requests > self.next_request_id {
            msg!(
                "INVARIANT VIOLATION: open requests ({}) > issued requests ({})",
                self.open_requests,
                self.next_request_id
            );
            return Err(VaultError::InvariantViolation);
        }

        // Invariant 4: configuration stays in range
        if self.annual_rate_bps > MAX_ANNUAL_RATE_BPS {
            msg!(
                "INVARIANT VIOLATION: annual rate ({}) above maximum",
                self.annual_rate_bps
            );
            return Err(VaultError::InvariantViolation);
        }

        Ok(())
    }
}

pub fn validate_annual_rate(annual_rate_bps: u16) -> VaultResult {
    if annual_rate_bps > MAX_ANNUAL_RATE_BPS {
        return Err(VaultError::RateOutOfRange);
    }
    Ok(())
}

pub fn validate_deposit_fee(deposit_fee_bps: u16) -> VaultResult {
    if deposit_fee_bps > MAX_DEPOSIT_FEE_BPS {
        return Err(VaultError::RateOutOfRange);
    }
    Ok(())
}

pub fn validate_withdrawal_delay(withdrawal_delay: i64) -> VaultResult {
    if !(MIN_WITHDRAWAL_DELAY..=MAX_WITHDRAWAL_DELAY).contains(&withdrawal_delay) {
        return Err(VaultError::InvalidPoolConfig);
    }
    Ok(())
}

pub fn validate_penalty_tiers(penalty_tiers: &[u16]) -> VaultResult {
    if penalty_tiers.is_empty() || penalty_tiers.len() > MAX_PENALTY_TIERS {
        return Err(VaultError::TooManyPenaltyTiers);
    }
    if penalty_tiers
        .iter()
        .any(|bps| *bps == 0 || *bps > MAX_EMERGENCY_PENALTY_BPS)
    {
        return Err(VaultError::RateOutOfRange);
    }
    Ok(())
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default)]
pub struct InitializePoolParams {
    pub annual_rate_bps: Option<u16>,
    pub withdrawal_delay: Option<i64>,
    pub deposit_fee_bps: Option<u16>,
    pub min_deposit: Option<u64>,
    pub penalty_tiers: Option<Vec<u16>>,
    pub penalty_disposition: Option<PenaltyDisposition>,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default)]
pub struct UpdatePoolConfigParams {
    pub annual_rate_bps: Option<u16>,
    pub withdrawal_delay: Option<i64>,
    pub deposit_fee_bps: Option<u16>,
    pub min_deposit: Option<u64>,
    pub penalty_tiers: Option<Vec<u16>>,
    pub penalty_disposition: Option<PenaltyDisposition>,
    pub is_paused: Option<bool>,
}
