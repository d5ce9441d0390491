use anchor_lang::prelude::*;
use instructions::*;
use state::*;

pub mod adapters;
pub mod constants;
pub mod error;
pub mod events;
pub mod instructions;
pub mod ledger;
pub mod math;
pub mod state;
mod utils;
pub mod vault;

declare_id!("LStk4Qx7n2VYp9cWqgM3ZrT8bJfH6uEoD5aKsN1yXvR");

#[program]
pub mod liquid_staking {
    use super::*;

    /// Create a pool for `base_mint` with its custody account
    pub fn initialize_pool(
        ctx: Context<InitializePool>,
        params: InitializePoolParams,
    ) -> Result<()> {
        instructions::initialize_pool(ctx, params)
    }

    /// Create the caller's staker account
    pub fn initialize_staker(ctx: Context<InitializeStaker>) -> Result<()> {
        instructions::initialize_staker(ctx)
    }

    /// Deposit base asset and receive shares
    pub fn deposit(ctx: Context<Deposit>, amount: u64) -> Result<()> {
        instructions::deposit(ctx, amount)
    }

    /// Exit immediately at a penalty
    pub fn emergency_exit(
        ctx: Context<EmergencyExit>,
        share_amount: u64,
        penalty_bps: u16,
    ) -> Result<()> {
        instructions::emergency_exit(ctx, share_amount, penalty_bps)
    }

    /// Burn shares and queue their value for payout after the withdrawal delay
    pub fn request_exit(ctx: Context<RequestExit>, share_amount: u64) -> Result<()> {
        instructions::request_exit(ctx, share_amount)
    }

    /// Pay out an unlocked withdrawal request
    pub fn process_exit(ctx: Context<ProcessExit>, request_id: u64) -> Result<()> {
        instructions::process_exit(ctx, request_id)
    }

    /// Cancel a pending withdrawal request and get shares back at the current rate
    pub fn cancel_exit(ctx: Context<CancelExit>, request_id: u64) -> Result<()> {
        instructions::cancel_exit(ctx, request_id)
    }

    /// Send base asset into custody to fund accrued yield
    pub fn fund_rewards(ctx: Context<FundRewards>, amount: u64) -> Result<()> {
        instructions::fund_rewards(ctx, amount)
    }

    /// Fold accrued yield into principal (permissionless)
    pub fn checkpoint(ctx: Context<Checkpoint>) -> Result<()> {
        instructions::checkpoint(ctx)
    }

    /// Update pool configuration (only authority)
    pub fn update_pool_config(
        ctx: Context<ConfigurePool>,
        params: UpdatePoolConfigParams,
    ) -> Result<()> {
        instructions::update_pool_config(ctx, params)
    }

    /// Change the annual yield rate (only authority)
    pub fn set_annual_rate(ctx: Context<ConfigurePool>, annual_rate_bps: u16) -> Result<()> {
        instructions::set_annual_rate(ctx, annual_rate_bps)
    }

    /// Change the withdrawal delay for future requests (only authority)
    pub fn set_withdrawal_delay(ctx: Context<ConfigurePool>, withdrawal_delay: i64) -> Result<()> {
        instructions::set_withdrawal_delay(ctx, withdrawal_delay)
    }

    /// Change the deposit fee (only authority)
    pub fn set_deposit_fee(ctx: Context<ConfigurePool>, deposit_fee_bps: u16) -> Result<()> {
        instructions::set_deposit_fee(ctx, deposit_fee_bps)
    }

    pub fn rate(ctx: Context<PoolView>) -> Result<u128> {
        instructions::rate(ctx)
    }

    pub fn pool_backing(ctx: Context<PoolView>) -> Result<u128> {
        instructions::pool_backing(ctx)
    }

    pub fn pending_withdrawals(ctx: Context<PoolView>) -> Result<u128> {
        instructions::pending_withdrawals(ctx)
    }

    pub fn available_liquidity(ctx: Context<PoolView>) -> Result<u128> {
        instructions::available_liquidity(ctx)
    }

    pub fn can_process(ctx: Context<RequestView>) -> Result<ExitStatus> {
        instructions::can_process(ctx)
    }

    pub fn requests_of(ctx: Context<StakerView>) -> Result<Vec<u64>> {
        instructions::requests_of(ctx)
    }

    pub fn request_details(ctx: Context<RequestView>) -> Result<WithdrawalRequest> {
        instructions::request_details(ctx)
    }
}
