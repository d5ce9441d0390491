// Shared in-memory harness for driving the vault core without a validator.
#![allow(dead_code)]

use anchor_lang::prelude::*;
use liquid_staking::error::*;
use liquid_staking::ledger::*;
use liquid_staking::state::*;
use liquid_staking::vault::{self, *};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

pub const START: i64 = 1_700_000_000;

/// Token balances behind all three collaborator handles
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BankState {
    pub shares: HashMap<Pubkey, u64>,
    pub share_supply: u64,
    pub wallets: HashMap<Pubkey, u64>,
    pub custody: u64,
    pub fees: u64,
    pub fail_fees: bool,
    pub fail_mint: bool,
    pub fail_pay: bool,
}

pub type Bank = Rc<RefCell<BankState>>;

pub struct ShareHandle(pub Bank);
pub struct CustodyHandle(pub Bank);
pub struct FeeHandle(pub Bank);

impl ShareLedger for ShareHandle {
    fn balance_of(&self, holder: &Pubkey) -> u64 {
        self.0.borrow().shares.get(holder).copied().unwrap_or(0)
    }

    fn total_supply(&self) -> u64 {
        self.0.borrow().share_supply
    }

    fn mint(&mut self, to: &Pubkey, amount: u64) -> VaultResult {
        let mut bank = self.0.borrow_mut();
        if bank.fail_mint {
            return Err(VaultError::ShareLedgerFailure);
        }
        *bank.shares.entry(*to).or_default() += amount;
        bank.share_supply += amount;
        Ok(())
    }

    fn burn(&mut self, from: &Pubkey, amount: u64) -> VaultResult {
        let mut bank = self.0.borrow_mut();
        let balance = bank.shares.entry(*from).or_default();
        if *balance < amount {
            return Err(VaultError::InsufficientBalance);
        }
        *balance -= amount;
        bank.share_supply -= amount;
        Ok(())
    }
}

impl BaseAssetCustody for CustodyHandle {
    fn balance_of(&self, holder: &Pubkey) -> u64 {
        self.0.borrow().wallets.get(holder).copied().unwrap_or(0)
    }

    fn custody_balance(&self) -> u64 {
        self.0.borrow().custody
    }

    fn pull(&mut self, from: &Pubkey, amount: u64) -> VaultResult {
        let mut bank = self.0.borrow_mut();
        let wallet = bank.wallets.entry(*from).or_default();
        if *wallet < amount {
            return Err(VaultError::InsufficientBalance);
        }
        *wallet -= amount;
        bank.custody += amount;
        Ok(())
    }

    fn pay(&mut self, to: &Pubkey, amount: u64) -> VaultResult {
        let mut bank = self.0.borrow_mut();
        if bank.fail_pay {
            return Err(VaultError::CustodyTransferFailure);
        }
        if bank.custody < amount {
            return Err(VaultError::InsufficientLiquidity);
        }
        bank.custody -= amount;
        *bank.wallets.entry(*to).or_default() += amount;
        Ok(())
    }
}

impl FeeBeneficiary for FeeHandle {
    fn receive_fee(&mut self, amount: u64) -> VaultResult {
        let mut bank = self.0.borrow_mut();
        if bank.fail_fees || bank.custody < amount {
            return Err(VaultError::FeeForwardFailure);
        }
        bank.custody -= amount;
        bank.fees += amount;
        Ok(())
    }
}

/// A pool, its stakers and requests, and the bank they settle against.
pub struct Harness {
    pub pool: Pool,
    pub bank: Bank,
    pub stakers: HashMap<Pubkey, Staker>,
    pub requests: Vec<WithdrawalRequest>,
    pub now: i64,
}

impl Harness {
    pub fn new(params: InitializePoolParams) -> Self {
        let mut pool = Pool::default();
        pool.initialize(
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            params,
            START,
            255,
            254,
        )
        .unwrap();

        Self {
            pool,
            bank: Rc::new(RefCell::new(BankState::default())),
            stakers: HashMap::new(),
            requests: Vec::new(),
            now: START,
        }
    }

    /// Pool with no deposit fee and the given annual rate
    pub fn feeless(annual_rate_bps: u16) -> Self {
        Self::new(InitializePoolParams {
            annual_rate_bps: Some(annual_rate_bps),
            deposit_fee_bps: Some(0),
            ..Default::default()
        })
    }

    pub fn user(&mut self, wallet: u64) -> Pubkey {
        let user = Pubkey::new_unique();
        self.bank.borrow_mut().wallets.insert(user, wallet);
        let mut staker = Staker::default();
        staker.initialize(Pubkey::new_unique(), user, self.now, 255);
        self.stakers.insert(user, staker);
        user
    }

    pub fn warp(&mut self, seconds: i64) {
        self.now += seconds;
    }

    pub fn wallet(&self, user: &Pubkey) -> u64 {
        self.bank.borrow().wallets.get(user).copied().unwrap_or(0)
    }

    pub fn shares(&self, user: &Pubkey) -> u64 {
        self.bank.borrow().shares.get(user).copied().unwrap_or(0)
    }

    pub fn supply(&self) -> u64 {
        self.bank.borrow().share_supply
    }

    pub fn custody(&self) -> u64 {
        self.bank.borrow().custody
    }

    pub fn fees(&self) -> u64 {
        self.bank.borrow().fees
    }

    pub fn rate(&self) -> u128 {
        self.pool.rate(self.supply(), self.now).unwrap()
    }

    pub fn deposit(&mut self, user: &Pubkey, amount: u64) -> VaultResult<DepositReceipt> {
        let mut shares = ShareHandle(self.bank.clone());
        let mut custody = CustodyHandle(self.bank.clone());
        let mut fees = FeeHandle(self.bank.clone());
        let mut ports = Ports::new(&mut shares, &mut custody, &mut fees);
        let staker = self.stakers.entry(*user).or_default();
        vault::deposit(&mut self.pool, staker, &mut ports, user, amount, self.now)
    }

    pub fn emergency_exit(
        &mut self,
        user: &Pubkey,
        share_amount: u64,
        penalty_bps: u16,
    ) -> VaultResult<EmergencyExitReceipt> {
        let mut shares = ShareHandle(self.bank.clone());
        let mut custody = CustodyHandle(self.bank.clone());
        let mut fees = FeeHandle(self.bank.clone());
        let mut ports = Ports::new(&mut shares, &mut custody, &mut fees);
        let staker = self.stakers.entry(*user).or_default();
        vault::emergency_exit(
            &mut self.pool,
            staker,
            &mut ports,
            user,
            share_amount,
            penalty_bps,
            self.now,
        )
    }

    pub fn request_exit(&mut self, user: &Pubkey, share_amount: u64) -> VaultResult<ExitTicket> {
        let mut shares = ShareHandle(self.bank.clone());
        let mut ports = Ports::shares_only(&mut shares);
        let staker = self.stakers.entry(*user).or_default();
        let mut request = WithdrawalRequest {
            pool: Pubkey::default(),
            bump: 255,
            ..Default::default()
        };

        let ticket = vault::request_exit(
            &mut self.pool,
            staker,
            &mut request,
            &mut ports,
            user,
            share_amount,
            self.now,
        )?;
        assert_eq!(ticket.id as usize, self.requests.len());
        self.requests.push(request);
        Ok(ticket)
    }

    pub fn process_exit(&mut self, user: &Pubkey, id: u64) -> VaultResult<ExitPayout> {
        let mut shares = ShareHandle(self.bank.clone());
        let mut custody = CustodyHandle(self.bank.clone());
        let mut ports = Ports {
            shares: Some(&mut shares),
            custody: Some(&mut custody),
            fees: None,
        };
        let staker = self.stakers.entry(*user).or_default();
        vault::process_exit(
            &mut self.pool,
            staker,
            &mut self.requests[id as usize],
            &mut ports,
            user,
            self.now,
        )
    }

    pub fn cancel_exit(&mut self, user: &Pubkey, id: u64) -> VaultResult<CancelReceipt> {
        let mut shares = ShareHandle(self.bank.clone());
        let mut ports = Ports::shares_only(&mut shares);
        vault::cancel_exit(
            &mut self.pool,
            &mut self.requests[id as usize],
            &mut ports,
            user,
            self.now,
        )
    }

    pub fn fund_rewards(&mut self, funder: &Pubkey, amount: u64) -> VaultResult {
        let mut custody = CustodyHandle(self.bank.clone());
        let mut ports = Ports::custody_only(&mut custody);
        vault::fund_rewards(&mut self.pool, &mut ports, funder, amount)
    }

    /// Everything a failed call must leave untouched
    pub fn snapshot(&self) -> (Vec<u8>, BankState, Vec<Vec<u8>>) {
        let mut pool = Vec::new();
        self.pool.serialize(&mut pool).unwrap();

        let mut stakers: Vec<&Staker> = self.stakers.values().collect();
        stakers.sort_by_key(|staker| staker.owner);
        let mut accounts: Vec<Vec<u8>> = stakers
            .into_iter()
            .map(|staker| {
                let mut bytes = Vec::new();
                staker.serialize(&mut bytes).unwrap();
                bytes
            })
            .collect();
        for request in &self.requests {
            let mut bytes = Vec::new();
            request.serialize(&mut bytes).unwrap();
            accounts.push(bytes);
        }

        // a rolled-back mint leaves a zero entry behind
        let mut bank = self.bank.borrow().clone();
        bank.shares.retain(|_, balance| *balance > 0);
        bank.wallets.retain(|_, balance| *balance > 0);

        (pool, bank, accounts)
    }
}
