//! SPL token implementations of the vault's collaborator traits.
//!
//! Each adapter snapshots the balances it is handed when the instruction
//! starts and keeps them current as it issues CPIs, so the accounting core
//! sees post-transfer numbers without reloading accounts mid-instruction.

use crate::constants::*;
use crate::error::*;
use crate::ledger::{BaseAssetCustody, FeeBeneficiary, ShareLedger};
use crate::math::SafeMath;
use crate::state::Pool;
use anchor_lang::prelude::*;
use anchor_spl::token::{self, Burn, Mint, MintTo, TokenAccount, Transfer};

/// Owned copy of the pool PDA seeds, so CPIs can sign while the pool
/// account itself is borrowed mutably.
pub struct PoolSigner {
    base_mint: Pubkey,
    bump: [u8; 1],
}

impl PoolSigner {
    pub fn new(pool: &Pool) -> Self {
        Self {
            base_mint: pool.base_mint,
            bump: [pool.bump],
        }
    }

    pub fn seeds(&self) -> [&[u8]; 3] {
        [POOL_SEED, self.base_mint.as_ref(), &self.bump]
    }
}

/// A signer's token account for one mint.
pub struct TokenWallet<'info> {
    owner: Pubkey,
    account: AccountInfo<'info>,
    authority: AccountInfo<'info>,
    balance: u64,
}

impl<'info> TokenWallet<'info> {
    pub fn new(account: &Account<'info, TokenAccount>, authority: &Signer<'info>) -> Self {
        Self {
            owner: authority.key(),
            account: account.to_account_info(),
            authority: authority.to_account_info(),
            balance: account.amount,
        }
    }

    fn balance_of(&self, holder: &Pubkey) -> u64 {
        if *holder == self.owner {
            self.balance
        } else {
            0
        }
    }

    fn require_owner(&self, holder: &Pubkey, failure: VaultError) -> VaultResult {
        if *holder != self.owner {
            msg!("No token account wired for {}", holder);
            return Err(failure);
        }
        Ok(())
    }
}

pub struct SplShareLedger<'a, 'info> {
    token_program: AccountInfo<'info>,
    share_mint: AccountInfo<'info>,
    pool: AccountInfo<'info>,
    wallet: TokenWallet<'info>,
    supply: u64,
    signer: &'a PoolSigner,
}

impl<'a, 'info> SplShareLedger<'a, 'info> {
    pub fn new(
        token_program: AccountInfo<'info>,
        share_mint: &Account<'info, Mint>,
        pool: AccountInfo<'info>,
        wallet: TokenWallet<'info>,
        signer: &'a PoolSigner,
    ) -> Self {
        Self {
            token_program,
            share_mint: share_mint.to_account_info(),
            pool,
            wallet,
            supply: share_mint.supply,
            signer,
        }
    }
}

impl ShareLedger for SplShareLedger<'_, '_> {
    fn balance_of(&self, holder: &Pubkey) -> u64 {
        self.wallet.balance_of(holder)
    }

    fn total_supply(&self) -> u64 {
        self.supply
    }

    fn mint(&mut self, to: &Pubkey, amount: u64) -> VaultResult {
        self.wallet.require_owner(to, VaultError::ShareLedgerFailure)?;

        let seeds = self.signer.seeds();
        let signer_seeds = &[&seeds[..]];
        let cpi_accounts = MintTo {
            mint: self.share_mint.clone(),
            to: self.wallet.account.clone(),
            authority: self.pool.clone(),
        };
        let cpi_ctx =
            CpiContext::new_with_signer(self.token_program.clone(), cpi_accounts, signer_seeds);
        token::mint_to(cpi_ctx, amount).map_err(|err| {
            msg!("Share mint of {} failed: {:?}", amount, err);
            VaultError::ShareLedgerFailure
        })?;

        self.supply = self.supply.safe_add(amount)?;
        self.wallet.balance = self.wallet.balance.safe_add(amount)?;
        Ok(())
    }

    fn burn(&mut self, from: &Pubkey, amount: u64) -> VaultResult {
        self.wallet.require_owner(from, VaultError::ShareLedgerFailure)?;
        if self.wallet.balance < amount {
            return Err(VaultError::InsufficientBalance);
        }

        let cpi_accounts = Burn {
            mint: self.share_mint.clone(),
            from: self.wallet.account.clone(),
            authority: self.wallet.authority.clone(),
        };
        let cpi_ctx = CpiContext::new(self.token_program.clone(), cpi_accounts);
        token::burn(cpi_ctx, amount).map_err(|err| {
            msg!("Share burn of {} failed: {:?}", amount, err);
            VaultError::ShareLedgerFailure
        })?;

        self.supply = self.supply.safe_sub(amount)?;
        self.wallet.balance = self.wallet.balance.safe_sub(amount)?;
        Ok(())
    }
}

/// Share supply for operations that never mint or burn.
pub struct ShareSupply(u64);

impl ShareSupply {
    pub fn new(share_mint: &Account<'_, Mint>) -> Self {
        Self(share_mint.supply)
    }
}

impl ShareLedger for ShareSupply {
    fn balance_of(&self, _holder: &Pubkey) -> u64 {
        0
    }

    fn total_supply(&self) -> u64 {
        self.0
    }

    fn mint(&mut self, _to: &Pubkey, _amount: u64) -> VaultResult {
        msg!("Share supply is read-only here");
        Err(VaultError::ShareLedgerFailure)
    }

    fn burn(&mut self, _from: &Pubkey, _amount: u64) -> VaultResult {
        msg!("Share supply is read-only here");
        Err(VaultError::ShareLedgerFailure)
    }
}

pub struct SplCustody<'a, 'info> {
    token_program: AccountInfo<'info>,
    custody: AccountInfo<'info>,
    pool: AccountInfo<'info>,
    wallet: TokenWallet<'info>,
    held: u64,
    signer: &'a PoolSigner,
}

impl<'a, 'info> SplCustody<'a, 'info> {
    pub fn new(
        token_program: AccountInfo<'info>,
        custody: &Account<'info, TokenAccount>,
        pool: AccountInfo<'info>,
        wallet: TokenWallet<'info>,
        signer: &'a PoolSigner,
    ) -> Self {
        Self {
            token_program,
            custody: custody.to_account_info(),
            pool,
            wallet,
            held: custody.amount,
            signer,
        }
    }
}

impl BaseAssetCustody for SplCustody<'_, '_> {
    fn balance_of(&self, holder: &Pubkey) -> u64 {
        self.wallet.balance_of(holder)
    }

    fn custody_balance(&self) -> u64 {
        self.held
    }

    fn pull(&mut self, from: &Pubkey, amount: u64) -> VaultResult {
        self.wallet.require_owner(from, VaultError::CustodyTransferFailure)?;
        if self.wallet.balance < amount {
            return Err(VaultError::InsufficientBalance);
        }

        let cpi_accounts = Transfer {
            from: self.wallet.account.clone(),
            to: self.custody.clone(),
            authority: self.wallet.authority.clone(),
        };
        let cpi_ctx = CpiContext::new(self.token_program.clone(), cpi_accounts);
        token::transfer(cpi_ctx, amount).map_err(|err| {
            msg!("Transfer of {} into custody failed: {:?}", amount, err);
            VaultError::CustodyTransferFailure
        })?;

        self.wallet.balance = self.wallet.balance.safe_sub(amount)?;
        self.held = self.held.safe_add(amount)?;
        Ok(())
    }

    fn pay(&mut self, to: &Pubkey, amount: u64) -> VaultResult {
        self.wallet.require_owner(to, VaultError::CustodyTransferFailure)?;
        if self.held < amount {
            return Err(VaultError::InsufficientLiquidity);
        }

        let seeds = self.signer.seeds();
        let signer_seeds = &[&seeds[..]];
        let cpi_accounts = Transfer {
            from: self.custody.clone(),
            to: self.wallet.account.clone(),
            authority: self.pool.clone(),
        };
        let cpi_ctx =
            CpiContext::new_with_signer(self.token_program.clone(), cpi_accounts, signer_seeds);
        token::transfer(cpi_ctx, amount).map_err(|err| {
            msg!("Transfer of {} out of custody failed: {:?}", amount, err);
            VaultError::CustodyTransferFailure
        })?;

        self.held = self.held.safe_sub(amount)?;
        self.wallet.balance = self.wallet.balance.safe_add(amount)?;
        Ok(())
    }
}

/// Pays fees out of custody into the configured beneficiary token account.
pub struct TokenFeeBeneficiary<'a, 'info> {
    token_program: AccountInfo<'info>,
    custody: AccountInfo<'info>,
    pool: AccountInfo<'info>,
    beneficiary: AccountInfo<'info>,
    signer: &'a PoolSigner,
}

impl<'a, 'info> TokenFeeBeneficiary<'a, 'info> {
    pub fn new(
        token_program: AccountInfo<'info>,
        custody: &Account<'info, TokenAccount>,
        pool: AccountInfo<'info>,
        beneficiary: &Account<'info, TokenAccount>,
        signer: &'a PoolSigner,
    ) -> Self {
        Self {
            token_program,
            custody: custody.to_account_info(),
            pool,
            beneficiary: beneficiary.to_account_info(),
            signer,
        }
    }
}

impl FeeBeneficiary for TokenFeeBeneficiary<'_, '_> {
    fn receive_fee(&mut self, amount: u64) -> VaultResult {
        let seeds = self.signer.seeds();
        let signer_seeds = &[&seeds[..]];
        let cpi_accounts = Transfer {
            from: self.custody.clone(),
            to: self.beneficiary.clone(),
            authority: self.pool.clone(),
        };
        let cpi_ctx =
            CpiContext::new_with_signer(self.token_program.clone(), cpi_accounts, signer_seeds);
        token::transfer(cpi_ctx, amount).map_err(|err| {
            msg!("Fee transfer of {} failed: {:?}", amount, err);
            VaultError::FeeForwardFailure
        })
    }
}
