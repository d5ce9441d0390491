use anchor_lang::prelude::*;
use anchor_spl::token::Mint;
use crate::error::*;
use crate::state::*;
use crate::utils::*;

#[derive(Accounts)]
pub struct PoolView<'info> {
    pub pool: Box<Account<'info, Pool>>,

    #[account(address = pool.share_mint @ VaultError::InvalidTokenMint)]
    pub share_mint: Account<'info, Mint>,
}

#[derive(Accounts)]
pub struct RequestView<'info> {
    pub withdrawal_request: Account<'info, WithdrawalRequest>,
}

#[derive(Accounts)]
pub struct StakerView<'info> {
    pub staker: Account<'info, Staker>,
}

/// Base asset per share, scaled by 1e18, including accrual up to now
pub fn rate(ctx: Context<PoolView>) -> Result<u128> {
    let now = get_current_timestamp()?;
    let rate = ctx.accounts.pool.rate(ctx.accounts.share_mint.supply, now)?;
    msg!("rate: {}", rate);
    Ok(rate)
}

pub fn pool_backing(ctx: Context<PoolView>) -> Result<u128> {
    let now = get_current_timestamp()?;
    Ok(ctx.accounts.pool.pool_backing(now)?)
}

pub fn pending_withdrawals(ctx: Context<PoolView>) -> Result<u128> {
    Ok(ctx.accounts.pool.total_pending_withdrawals)
}

pub fn available_liquidity(ctx: Context<PoolView>) -> Result<u128> {
    let now = get_current_timestamp()?;
    Ok(ctx.accounts.pool.available_liquidity(now)?)
}

pub fn can_process(ctx: Context<RequestView>) -> Result<ExitStatus> {
    let now = get_current_timestamp()?;
    Ok(ctx.accounts.withdrawal_request.can_process(now))
}

pub fn requests_of(ctx: Context<StakerView>) -> Result<Vec<u64>> {
    Ok(ctx.accounts.staker.request_ids.clone())
}

pub fn request_details(ctx: Context<RequestView>) -> Result<WithdrawalRequest> {
    Ok(WithdrawalRequest::clone(&ctx.accounts.withdrawal_request))
}
