use anchor_lang::prelude::*;
use anchor_spl::token::TokenAccount;
use crate::constants::*;
use crate::error::*;
use crate::events::{AnnualRateUpdated, PoolConfigUpdated};
use crate::state::*;
use crate::utils::*;

#[derive(Accounts)]
pub struct ConfigurePool<'info> {
    #[account(
        mut,
        seeds = [POOL_SEED, pool.base_mint.as_ref()],
        bump = pool.bump,
        constraint = pool.authority == authority.key() @ VaultError::Unauthorized,
    )]
    pub pool: Box<Account<'info, Pool>>,

    pub authority: Signer<'info>,

    /// Replacement fee beneficiary, only read by `update_pool_config`
    pub new_fee_beneficiary: Option<Account<'info, TokenAccount>>,
}

pub fn update_pool_config(ctx: Context<ConfigurePool>, params: UpdatePoolConfigParams) -> Result<()> {
    let now = get_current_timestamp()?;
    let new_beneficiary = ctx
        .accounts
        .new_fee_beneficiary
        .as_ref()
        .map(|account| (account.key(), account.mint));
    let pool = &mut ctx.accounts.pool;

    if let Some((account, mint)) = new_beneficiary {
        pool.set_fee_beneficiary(account, &mint)?;
        msg!("Fee beneficiary set to {}", account);
    }
    pool.update_config(params, now)?;

    msg!(
        "Pool config updated: rate {} bps, fee {} bps, delay {}s, min deposit {}, paused {}",
        pool.annual_rate_bps,
        pool.deposit_fee_bps,
        pool.withdrawal_delay,
        pool.min_deposit,
        pool.is_paused
    );

    emit_config(pool, ctx.accounts.authority.key());

    Ok(())
}

pub fn set_annual_rate(ctx: Context<ConfigurePool>, annual_rate_bps: u16) -> Result<()> {
    let now = get_current_timestamp()?;
    let pool = &mut ctx.accounts.pool;
    let old_rate_bps = pool.annual_rate_bps;

    let accrued = pool.set_annual_rate(annual_rate_bps, now)?;

    msg!(
        "Annual rate changed from {} to {} bps ({} accrued at the old rate)",
        old_rate_bps,
        annual_rate_bps,
        accrued
    );

    emit!(AnnualRateUpdated {
        pool: pool.key(),
        authority: ctx.accounts.authority.key(),
        old_rate_bps,
        new_rate_bps: annual_rate_bps,
        accrued,
    });

    Ok(())
}

pub fn set_withdrawal_delay(ctx: Context<ConfigurePool>, withdrawal_delay: i64) -> Result<()> {
    let pool = &mut ctx.accounts.pool;
    pool.set_withdrawal_delay(withdrawal_delay)?;
    msg!("Withdrawal delay set to {}s", withdrawal_delay);
    emit_config(pool, ctx.accounts.authority.key());
    Ok(())
}

pub fn set_deposit_fee(ctx: Context<ConfigurePool>, deposit_fee_bps: u16) -> Result<()> {
    let pool = &mut ctx.accounts.pool;
    pool.set_deposit_fee(deposit_fee_bps)?;
    msg!("Deposit fee set to {} bps", deposit_fee_bps);
    emit_config(pool, ctx.accounts.authority.key());
    Ok(())
}

fn emit_config(pool: &Account<Pool>, authority: Pubkey) {
    emit!(PoolConfigUpdated {
        pool: pool.key(),
        authority,
        annual_rate_bps: pool.annual_rate_bps,
        withdrawal_delay: pool.withdrawal_delay,
        deposit_fee_bps: pool.deposit_fee_bps,
        min_deposit: pool.min_deposit,
        penalty_disposition: pool.penalty_disposition,
        fee_beneficiary: pool.fee_beneficiary,
        is_paused: pool.is_paused,
    });
}
