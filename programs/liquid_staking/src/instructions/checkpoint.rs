use anchor_lang::prelude::*;
use anchor_spl::token::Mint;
use crate::constants::*;
use crate::error::*;
use crate::events::AccrualCheckpointed;
use crate::state::*;
use crate::utils::*;

/// Permissionless crank folding accrued yield into principal.
#[derive(Accounts)]
pub struct Checkpoint<'info> {
    #[account(
        mut,
        seeds = [POOL_SEED, pool.base_mint.as_ref()],
        bump = pool.bump,
    )]
    pub pool: Box<Account<'info, Pool>>,

    #[account(address = pool.share_mint @ VaultError::InvalidTokenMint)]
    pub share_mint: Account<'info, Mint>,
}

pub fn checkpoint(ctx: Context<Checkpoint>) -> Result<()> {
    let now = get_current_timestamp()?;
    let total_shares = ctx.accounts.share_mint.supply;
    let pool = &mut ctx.accounts.pool;

    let accrued = pool.checkpoint(now)?;
    pool.verify_invariants(total_shares, now)?;

    msg!(
        "Checkpoint: accrued {}, principal now {}",
        accrued,
        pool.total_principal
    );

    emit!(AccrualCheckpointed {
        pool: pool.key(),
        accrued,
        total_principal: pool.total_principal,
        timestamp: now,
    });

    Ok(())
}
