use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};
use crate::adapters::*;
use crate::constants::*;
use crate::error::*;
use crate::events::RewardsFundedEvent;
use crate::ledger::Ports;
use crate::state::*;
use crate::vault;

#[derive(Accounts)]
pub struct FundRewards<'info> {
    #[account(
        mut,
        seeds = [POOL_SEED, pool.base_mint.as_ref()],
        bump = pool.bump,
    )]
    pub pool: Box<Account<'info, Pool>>,

    #[account(
        mut,
        address = pool.custody @ VaultError::InvalidTokenAccount,
    )]
    pub custody: Account<'info, TokenAccount>,

    #[account(
        mut,
        constraint = funder_account.mint == pool.base_mint @ VaultError::InvalidTokenMint,
        constraint = funder_account.owner == funder.key() @ VaultError::InvalidTokenAccount,
    )]
    pub funder_account: Account<'info, TokenAccount>,

    pub funder: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

pub fn fund_rewards(ctx: Context<FundRewards>, amount: u64) -> Result<()> {
    let accounts = ctx.accounts;
    let pool_key = accounts.pool.key();
    let funder = accounts.funder.key();

    let signer = PoolSigner::new(&accounts.pool);
    let mut custody = SplCustody::new(
        accounts.token_program.to_account_info(),
        &accounts.custody,
        accounts.pool.to_account_info(),
        TokenWallet::new(&accounts.funder_account, &accounts.funder),
        &signer,
    );
    let mut ports = Ports::custody_only(&mut custody);

    vault::fund_rewards(&mut accounts.pool, &mut ports, &funder, amount)?;

    emit!(RewardsFundedEvent {
        pool: pool_key,
        funder,
        amount,
        total_rewards_funded: accounts.pool.total_rewards_funded,
    });

    Ok(())
}
