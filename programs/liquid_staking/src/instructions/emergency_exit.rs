use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};
use crate::adapters::*;
use crate::constants::*;
use crate::error::*;
use crate::events::EmergencyExitEvent;
use crate::ledger::Ports;
use crate::state::*;
use crate::utils::*;
use crate::vault;

#[derive(Accounts)]
pub struct EmergencyExit<'info> {
    #[account(
        mut,
        seeds = [POOL_SEED, pool.base_mint.as_ref()],
        bump = pool.bump,
    )]
    pub pool: Box<Account<'info, Pool>>,

    #[account(
        mut,
        seeds = [STAKER_SEED, pool.key().as_ref(), owner.key().as_ref()],
        bump = staker.bump,
        constraint = staker.owner == owner.key() @ VaultError::Unauthorized,
    )]
    pub staker: Account<'info, Staker>,

    #[account(
        mut,
        address = pool.share_mint @ VaultError::InvalidTokenMint,
    )]
    pub share_mint: Account<'info, Mint>,

    #[account(
        mut,
        address = pool.custody @ VaultError::InvalidTokenAccount,
    )]
    pub custody: Account<'info, TokenAccount>,

    #[account(
        mut,
        address = pool.fee_beneficiary @ VaultError::InvalidTokenAccount,
    )]
    pub fee_beneficiary: Account<'info, TokenAccount>,

    #[account(
        mut,
        constraint = owner_base_account.mint == pool.base_mint @ VaultError::InvalidTokenMint,
        constraint = owner_base_account.owner == owner.key() @ VaultError::InvalidTokenAccount,
    )]
    pub owner_base_account: Account<'info, TokenAccount>,

    #[account(
        mut,
        constraint = owner_share_account.mint == pool.share_mint @ VaultError::InvalidTokenMint,
        constraint = owner_share_account.owner == owner.key() @ VaultError::InvalidTokenAccount,
    )]
    pub owner_share_account: Account<'info, TokenAccount>,

    pub owner: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

pub fn emergency_exit(ctx: Context<EmergencyExit>, share_amount: u64, penalty_bps: u16) -> Result<()> {
    let now = get_current_timestamp()?;
    let accounts = ctx.accounts;
    let pool_key = accounts.pool.key();
    let owner = accounts.owner.key();

    let signer = PoolSigner::new(&accounts.pool);
    let token_program = accounts.token_program.to_account_info();
    let pool_info = accounts.pool.to_account_info();

    let mut shares = SplShareLedger::new(
        token_program.clone(),
        &accounts.share_mint,
        pool_info.clone(),
        TokenWallet::new(&accounts.owner_share_account, &accounts.owner),
        &signer,
    );
    let mut custody = SplCustody::new(
        token_program.clone(),
        &accounts.custody,
        pool_info.clone(),
        TokenWallet::new(&accounts.owner_base_account, &accounts.owner),
        &signer,
    );
    let mut fees = TokenFeeBeneficiary::new(
        token_program,
        &accounts.custody,
        pool_info,
        &accounts.fee_beneficiary,
        &signer,
    );
    let mut ports = Ports::new(&mut shares, &mut custody, &mut fees);

    let receipt = vault::emergency_exit(
        &mut accounts.pool,
        &mut accounts.staker,
        &mut ports,
        &owner,
        share_amount,
        penalty_bps,
        now,
    )?;

    emit!(EmergencyExitEvent {
        pool: pool_key,
        owner,
        shares_burned: receipt.shares_burned,
        gross: receipt.gross,
        penalty_bps,
        penalty: receipt.penalty,
        net: receipt.net,
        rate: receipt.rate,
        penalty_disposition: receipt.penalty_disposition,
    });

    Ok(())
}
