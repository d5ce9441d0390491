use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};
use crate::adapters::*;
use crate::constants::*;
use crate::error::*;
use crate::events::ExitProcessedEvent;
use crate::ledger::Ports;
use crate::state::*;
use crate::utils::*;
use crate::vault;

#[derive(Accounts)]
#[instruction(request_id: u64)]
pub struct ProcessExit<'info> {
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
        seeds = [
            WITHDRAWAL_REQUEST_SEED,
            pool.key().as_ref(),
            &request_id.to_le_bytes(),
        ],
        bump = withdrawal_request.bump,
        constraint = withdrawal_request.pool == pool.key() @ VaultError::InvalidPoolConfig,
    )]
    pub withdrawal_request: Account<'info, WithdrawalRequest>,

    #[account(address = pool.share_mint @ VaultError::InvalidTokenMint)]
    pub share_mint: Account<'info, Mint>,

    #[account(
        mut,
        address = pool.custody @ VaultError::InvalidTokenAccount,
    )]
    pub custody: Account<'info, TokenAccount>,

    #[account(
        mut,
        constraint = owner_base_account.mint == pool.base_mint @ VaultError::InvalidTokenMint,
        constraint = owner_base_account.owner == owner.key() @ VaultError::InvalidTokenAccount,
    )]
    pub owner_base_account: Account<'info, TokenAccount>,

    pub owner: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

pub fn process_exit(ctx: Context<ProcessExit>, request_id: u64) -> Result<()> {
    let now = get_current_timestamp()?;
    let accounts = ctx.accounts;
    let pool_key = accounts.pool.key();
    let owner = accounts.owner.key();

    let signer = PoolSigner::new(&accounts.pool);
    let mut shares = ShareSupply::new(&accounts.share_mint);
    let mut custody = SplCustody::new(
        accounts.token_program.to_account_info(),
        &accounts.custody,
        accounts.pool.to_account_info(),
        TokenWallet::new(&accounts.owner_base_account, &accounts.owner),
        &signer,
    );
    let mut ports = Ports {
        shares: Some(&mut shares),
        custody: Some(&mut custody),
        fees: None,
    };

    let payout = vault::process_exit(
        &mut accounts.pool,
        &mut accounts.staker,
        &mut accounts.withdrawal_request,
        &mut ports,
        &owner,
        now,
    )?;

    emit!(ExitProcessedEvent {
        pool: pool_key,
        owner,
        request_id,
        amount: payout.amount,
        total_pending_withdrawals: accounts.pool.total_pending_withdrawals,
    });

    Ok(())
}
