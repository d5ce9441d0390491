use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};
use crate::adapters::*;
use crate::constants::*;
use crate::error::*;
use crate::events::ExitRequestedEvent;
use crate::ledger::Ports;
use crate::state::*;
use crate::utils::*;
use crate::vault;

#[derive(Accounts)]
pub struct RequestExit<'info> {
    #[account(
        mut,
        seeds = [POOL_SEED, pool.base_mint.as_ref()],
        bump = pool.bump,
    )]
    pub pool: Box<Account<'info, Pool>>,

    /// Grows by one id per request
    #[account(
        mut,
        seeds = [STAKER_SEED, pool.key().as_ref(), owner.key().as_ref()],
        bump = staker.bump,
        constraint = staker.owner == owner.key() @ VaultError::Unauthorized,
        realloc = Staker::space(staker.request_ids.len() + 1),
        realloc::payer = owner,
        realloc::zero = false,
    )]
    pub staker: Account<'info, Staker>,

    #[account(
        init,
        payer = owner,
        space = WithdrawalRequest::LEN,
        seeds = [
            WITHDRAWAL_REQUEST_SEED,
            pool.key().as_ref(),
            &pool.next_request_id.to_le_bytes(),
        ],
        bump
    )]
    pub withdrawal_request: Account<'info, WithdrawalRequest>,

    #[account(
        mut,
        address = pool.share_mint @ VaultError::InvalidTokenMint,
    )]
    pub share_mint: Account<'info, Mint>,

    #[account(
        mut,
        constraint = owner_share_account.mint == pool.share_mint @ VaultError::InvalidTokenMint,
        constraint = owner_share_account.owner == owner.key() @ VaultError::InvalidTokenAccount,
    )]
    pub owner_share_account: Account<'info, TokenAccount>,

    #[account(mut)]
    pub owner: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

pub fn request_exit(ctx: Context<RequestExit>, share_amount: u64) -> Result<()> {
    let now = get_current_timestamp()?;
    let accounts = ctx.accounts;
    let pool_key = accounts.pool.key();
    let owner = accounts.owner.key();

    accounts.withdrawal_request.pool = pool_key;
    accounts.withdrawal_request.bump = ctx.bumps.withdrawal_request;

    let signer = PoolSigner::new(&accounts.pool);
    let mut shares = SplShareLedger::new(
        accounts.token_program.to_account_info(),
        &accounts.share_mint,
        accounts.pool.to_account_info(),
        TokenWallet::new(&accounts.owner_share_account, &accounts.owner),
        &signer,
    );
    let mut ports = Ports::shares_only(&mut shares);

    let ticket = vault::request_exit(
        &mut accounts.pool,
        &mut accounts.staker,
        &mut accounts.withdrawal_request,
        &mut ports,
        &owner,
        share_amount,
        now,
    )?;

    emit!(ExitRequestedEvent {
        pool: pool_key,
        owner,
        request_id: ticket.id,
        shares_burned: ticket.shares_burned,
        base_asset_amount: ticket.base_asset_amount,
        unlock_time: ticket.unlock_time,
        rate: ticket.rate,
    });

    Ok(())
}
