use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};
use crate::adapters::*;
use crate::constants::*;
use crate::error::*;
use crate::events::ExitCanceledEvent;
use crate::ledger::Ports;
use crate::state::*;
use crate::utils::*;
use crate::vault;

#[derive(Accounts)]
#[instruction(request_id: u64)]
pub struct CancelExit<'info> {
    #[account(
        mut,
        seeds = [POOL_SEED, pool.base_mint.as_ref()],
        bump = pool.bump,
    )]
    pub pool: Box<Account<'info, Pool>>,

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

    pub owner: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

pub fn cancel_exit(ctx: Context<CancelExit>, request_id: u64) -> Result<()> {
    let now = get_current_timestamp()?;
    let accounts = ctx.accounts;
    let pool_key = accounts.pool.key();
    let owner = accounts.owner.key();

    let signer = PoolSigner::new(&accounts.pool);
    let mut shares = SplShareLedger::new(
        accounts.token_program.to_account_info(),
        &accounts.share_mint,
        accounts.pool.to_account_info(),
        TokenWallet::new(&accounts.owner_share_account, &accounts.owner),
        &signer,
    );
    let mut ports = Ports::shares_only(&mut shares);

    let receipt = vault::cancel_exit(
        &mut accounts.pool,
        &mut accounts.withdrawal_request,
        &mut ports,
        &owner,
        now,
    )?;

    emit!(ExitCanceledEvent {
        pool: pool_key,
        owner,
        request_id,
        base_asset_amount: receipt.base_asset_amount,
        shares_minted: receipt.shares_minted,
        rate: receipt.rate,
    });

    Ok(())
}
