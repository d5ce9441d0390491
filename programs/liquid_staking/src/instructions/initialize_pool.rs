use anchor_lang::prelude::*;
use anchor_lang::solana_program::program_option::COption;
use anchor_spl::token::{Mint, Token, TokenAccount};
use crate::constants::*;
use crate::error::*;
use crate::state::*;
use crate::utils::*;

#[derive(Accounts)]
pub struct InitializePool<'info> {
    #[account(
        init,
        payer = authority,
        space = Pool::LEN,
        seeds = [POOL_SEED, base_mint.key().as_ref()],
        bump
    )]
    pub pool: Box<Account<'info, Pool>>,

    pub base_mint: Account<'info, Mint>,

    /// Share mint, handed over to the pool PDA before initialization
    #[account(
        constraint = share_mint.mint_authority == COption::Some(pool.key()) @ VaultError::InvalidTokenMint,
        constraint = share_mint.freeze_authority.is_none() @ VaultError::InvalidTokenMint,
        constraint = share_mint.supply == 0 @ VaultError::InvalidTokenMint,
        constraint = share_mint.decimals == base_mint.decimals @ VaultError::InvalidTokenMint,
        constraint = share_mint.key() != base_mint.key() @ VaultError::InvalidTokenMint,
    )]
    pub share_mint: Account<'info, Mint>,

    #[account(
        init,
        payer = authority,
        token::mint = base_mint,
        token::authority = pool,
        seeds = [CUSTODY_SEED, pool.key().as_ref()],
        bump
    )]
    pub custody: Account<'info, TokenAccount>,

    #[account(
        constraint = fee_beneficiary.mint == base_mint.key() @ VaultError::InvalidTokenMint,
    )]
    pub fee_beneficiary: Account<'info, TokenAccount>,

    #[account(mut)]
    pub authority: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
    pub rent: Sysvar<'info, Rent>,
}

pub fn initialize_pool(ctx: Context<InitializePool>, params: InitializePoolParams) -> Result<()> {
    let now = get_current_timestamp()?;
    let pool = &mut ctx.accounts.pool;

    pool.initialize(
        ctx.accounts.authority.key(),
        ctx.accounts.base_mint.key(),
        ctx.accounts.share_mint.key(),
        ctx.accounts.custody.key(),
        ctx.accounts.fee_beneficiary.key(),
        params,
        now,
        ctx.bumps.pool,
        ctx.bumps.custody,
    )?;

    msg!(
        "Pool initialized: {} (rate {} bps, fee {} bps, delay {}s)",
        pool.key(),
        pool.annual_rate_bps,
        pool.deposit_fee_bps,
        pool.withdrawal_delay
    );

    Ok(())
}
