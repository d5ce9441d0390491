use crate::state::PenaltyDisposition;
use anchor_lang::prelude::*;

#[event]
pub struct DepositEvent {
    pub pool: Pubkey,
    pub owner: Pubkey,
    pub amount: u64,
    pub fee: u64,
    pub net: u64,
    pub shares_minted: u64,
    pub rate: u128,
    pub total_principal: u128,
}

#[event]
pub struct EmergencyExitEvent {
    pub pool: Pubkey,
    pub owner: Pubkey,
    pub shares_burned: u64,
    pub gross: u64,
    pub penalty_bps: u16,
    pub penalty: u64,
    pub net: u64,
    pub rate: u128,
    pub penalty_disposition: PenaltyDisposition,
}

#[event]
pub struct ExitRequestedEvent {
    pub pool: Pubkey,
    pub owner: Pubkey,
    pub request_id: u64,
    pub shares_burned: u64,
    pub base_asset_amount: u128,
    pub unlock_time: i64,
    pub rate: u128,
}

#[event]
pub struct ExitProcessedEvent {
    pub pool: Pubkey,
    pub owner: Pubkey,
    pub request_id: u64,
    pub amount: u64,
    pub total_pending_withdrawals: u128,
}

#[event]
pub struct ExitCanceledEvent {
    pub pool: Pubkey,
    pub owner: Pubkey,
    pub request_id: u64,
    pub base_asset_amount: u128,
    pub shares_minted: u64,
    pub rate: u128,
}

#[event]
pub struct RewardsFundedEvent {
    pub pool: Pubkey,
    pub funder: Pubkey,
    pub amount: u64,
    pub total_rewards_funded: u128,
}

#[event]
pub struct AnnualRateUpdated {
    pub pool: Pubkey,
    pub authority: Pubkey,
    pub old_rate_bps: u16,
    pub new_rate_bps: u16,
    pub accrued: u128,
}

#[event]
pub struct PoolConfigUpdated {
    pub pool: Pubkey,
    pub authority: Pubkey,
    pub annual_rate_bps: u16,
    pub withdrawal_delay: i64,
    pub deposit_fee_bps: u16,
    pub min_deposit: u64,
    pub penalty_disposition: PenaltyDisposition,
    pub fee_beneficiary: Pubkey,
    pub is_paused: bool,
}

#[event]
pub struct AccrualCheckpointed {
    pub pool: Pubkey,
    pub accrued: u128,
    pub total_principal: u128,
    pub timestamp: i64,
}
