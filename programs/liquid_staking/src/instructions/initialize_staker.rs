use anchor_lang::prelude::*;
use crate::constants::*;
use crate::state::*;
use crate::utils::*;

#[derive(Accounts)]
pub struct InitializeStaker<'info> {
    pub pool: Box<Account<'info, Pool>>,

    #[account(
        init,
        payer = owner,
        space = Staker::INIT_LEN,
        seeds = [STAKER_SEED, pool.key().as_ref(), owner.key().as_ref()],
        bump
    )]
    pub staker: Account<'info, Staker>,

    #[account(mut)]
    pub owner: Signer<'info>,

    pub system_program: Program<'info, System>,
}

pub fn initialize_staker(ctx: Context<InitializeStaker>) -> Result<()> {
    let now = get_current_timestamp()?;
    let staker = &mut ctx.accounts.staker;

    staker.initialize(
        ctx.accounts.pool.key(),
        ctx.accounts.owner.key(),
        now,
        ctx.bumps.staker,
    );

    msg!("Staker initialized: {}", staker.key());

    Ok(())
}
