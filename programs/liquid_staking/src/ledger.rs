//! Collaborators the vault moves value through, and the settlement step that
//! applies a staged operation's external effects all-or-nothing.

use crate::error::*;
use anchor_lang::prelude::*;

/// The share token. Only the vault mints or burns.
pub trait ShareLedger {
    fn balance_of(&self, holder: &Pubkey) -> u64;
    fn total_supply(&self) -> u64;
    fn mint(&mut self, to: &Pubkey, amount: u64) -> VaultResult;
    /// Fails when `from` holds less than `amount`
    fn burn(&mut self, from: &Pubkey, amount: u64) -> VaultResult;
}

/// The pool's holding of the base asset.
pub trait BaseAssetCustody {
    /// Base asset held by `holder` outside the pool
    fn balance_of(&self, holder: &Pubkey) -> u64;
    /// Base asset held by the pool
    fn custody_balance(&self) -> u64;
    /// Move `amount` from `from` into custody
    fn pull(&mut self, from: &Pubkey, amount: u64) -> VaultResult;
    /// Move `amount` out of custody to `to`
    fn pay(&mut self, to: &Pubkey, amount: u64) -> VaultResult;
}

/// Revenue distributor. Accepts and accumulates fees paid out of custody.
pub trait FeeBeneficiary {
    fn receive_fee(&mut self, amount: u64) -> VaultResult;
}

/// One external call made while settling a vault operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    Pull { from: Pubkey, amount: u64 },
    Pay { to: Pubkey, amount: u64 },
    Mint { to: Pubkey, amount: u64 },
    Burn { from: Pubkey, amount: u64 },
    Fee { amount: u64 },
}

impl Effect {
    pub fn amount(&self) -> u64 {
        match self {
            Effect::Pull { amount, .. }
            | Effect::Pay { amount, .. }
            | Effect::Mint { amount, .. }
            | Effect::Burn { amount, .. }
            | Effect::Fee { amount } => *amount,
        }
    }

    /// The call that undoes this one. Fees cannot be taken back.
    pub fn inverse(&self) -> Option<Effect> {
        match *self {
            Effect::Pull { from, amount } => Some(Effect::Pay { to: from, amount }),
            Effect::Pay { to, amount } => Some(Effect::Pull { from: to, amount }),
            Effect::Mint { to, amount } => Some(Effect::Burn { from: to, amount }),
            Effect::Burn { from, amount } => Some(Effect::Mint { to: from, amount }),
            Effect::Fee { .. } => None,
        }
    }
}

/// The collaborators available to one operation. An instruction only wires
/// the ones it touches.
#[derive(Default)]
pub struct Ports<'a> {
    pub shares: Option<&'a mut dyn ShareLedger>,
    pub custody: Option<&'a mut dyn BaseAssetCustody>,
    pub fees: Option<&'a mut dyn FeeBeneficiary>,
}

impl<'a> Ports<'a> {
    pub fn new(
        shares: &'a mut dyn ShareLedger,
        custody: &'a mut dyn BaseAssetCustody,
        fees: &'a mut dyn FeeBeneficiary,
    ) -> Self {
        Self {
            shares: Some(shares),
            custody: Some(custody),
            fees: Some(fees),
        }
    }

    pub fn shares_only(shares: &'a mut dyn ShareLedger) -> Self {
        Self {
            shares: Some(shares),
            ..Default::default()
        }
    }

    pub fn custody_only(custody: &'a mut dyn BaseAssetCustody) -> Self {
        Self {
            custody: Some(custody),
            ..Default::default()
        }
    }

    pub fn shares(&mut self) -> VaultResult<&mut (dyn ShareLedger + 'a)> {
        self.shares.as_deref_mut().ok_or_else(|| missing_port("share ledger"))
    }

    pub fn custody(&mut self) -> VaultResult<&mut (dyn BaseAssetCustody + 'a)> {
        self.custody.as_deref_mut().ok_or_else(|| missing_port("custody"))
    }

    pub fn fees(&mut self) -> VaultResult<&mut (dyn FeeBeneficiary + 'a)> {
        self.fees.as_deref_mut().ok_or_else(|| missing_port("fee beneficiary"))
    }

    fn apply(&mut self, effect: &Effect) -> VaultResult {
        match *effect {
            Effect::Pull { from, amount } => self.custody()?.pull(&from, amount),
            Effect::Pay { to, amount } => self.custody()?.pay(&to, amount),
            Effect::Mint { to, amount } => self.shares()?.mint(&to, amount),
            Effect::Burn { from, amount } => self.shares()?.burn(&from, amount),
            Effect::Fee { amount } => self.fees()?.receive_fee(amount),
        }
    }

    /// Apply `effects` in order. On failure, undo what was applied in reverse
    /// order and return the first error. Zero-amount effects are skipped.
    pub fn settle(&mut self, effects: &[Effect]) -> VaultResult {
        for (step, effect) in effects.iter().enumerate() {
            if effect.amount() == 0 {
                continue;
            }

            if let Err(err) = self.apply(effect) {
                msg!("Settlement failed at step {}: {:?}", step, effect);
                self.compensate(&effects[..step])?;
                return Err(err);
            }
        }
        Ok(())
    }

    fn compensate(&mut self, applied: &[Effect]) -> VaultResult {
        for effect in applied.iter().rev() {
            if effect.amount() == 0 {
                continue;
            }

            let inverse = effect.inverse().ok_or_else(|| {
                msg!("INVARIANT VIOLATION: cannot roll back {:?}", effect);
                VaultError::InvariantViolation
            })?;

            if self.apply(&inverse).is_err() {
                msg!("INVARIANT VIOLATION: rollback of {:?} failed", effect);
                return Err(VaultError::InvariantViolation);
            }
        }
        Ok(())
    }
}

fn missing_port(name: &str) -> VaultError {
    msg!("INVARIANT VIOLATION: {} not wired for this operation", name);
    VaultError::InvariantViolation
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Default)]
    struct Tokens {
        balances: HashMap<Pubkey, u64>,
        supply: u64,
        custody: u64,
        fees: u64,
        fail_fees: bool,
        fail_mint: bool,
    }

    impl ShareLedger for Tokens {
        fn balance_of(&self, holder: &Pubkey) -> u64 {
            self.balances.get(holder).copied().unwrap_or(0)
        }
        fn total_supply(&self) -> u64 {
            self.supply
        }
        fn mint(&mut self, to: &Pubkey, amount: u64) -> VaultResult {
            if self.fail_mint {
                return Err(VaultError::ShareLedgerFailure);
            }
            *self.balances.entry(*to).or_default() += amount;
            self.supply += amount;
            Ok(())
        }
        fn burn(&mut self, from: &Pubkey, amount: u64) -> VaultResult {
            let balance = self.balances.entry(*from).or_default();
            if *balance < amount {
                return Err(VaultError::InsufficientBalance);
            }
            *balance -= amount;
            self.supply -= amount;
            Ok(())
        }
    }

    #[derive(Default)]
    struct Custody {
        wallets: HashMap<Pubkey, u64>,
        held: u64,
    }

    impl BaseAssetCustody for Custody {
        fn balance_of(&self, holder: &Pubkey) -> u64 {
            self.wallets.get(holder).copied().unwrap_or(0)
        }
        fn custody_balance(&self) -> u64 {
            self.held
        }
        fn pull(&mut self, from: &Pubkey, amount: u64) -> VaultResult {
            let wallet = self.wallets.entry(*from).or_default();
            if *wallet < amount {
                return Err(VaultError::InsufficientBalance);
            }
            *wallet -= amount;
            self.held += amount;
            Ok(())
        }
        fn pay(&mut self, to: &Pubkey, amount: u64) -> VaultResult {
            if self.held < amount {
                return Err(VaultError::InsufficientLiquidity);
            }
            self.held -= amount;
            *self.wallets.entry(*to).or_default() += amount;
            Ok(())
        }
    }

    impl FeeBeneficiary for Tokens {
        fn receive_fee(&mut self, amount: u64) -> VaultResult {
            if self.fail_fees {
                return Err(VaultError::FeeForwardFailure);
            }
            self.fees += amount;
            Ok(())
        }
    }

    #[test]
    fn test_inverse_pairs() {
        let who = Pubkey::new_unique();
        assert_eq!(
            Effect::Pull { from: who, amount: 3 }.inverse(),
            Some(Effect::Pay { to: who, amount: 3 })
        );
        assert_eq!(
            Effect::Burn { from: who, amount: 3 }.inverse(),
            Some(Effect::Mint { to: who, amount: 3 })
        );
        assert_eq!(Effect::Fee { amount: 3 }.inverse(), None);
    }

    #[test]
    fn test_settle_applies_in_order() {
        let user = Pubkey::new_unique();
        let mut custody = Custody::default();
        custody.wallets.insert(user, 100);
        let mut shares = Tokens::default();
        let mut fees = Tokens::default();

        let mut ports = Ports::new(&mut shares, &mut custody, &mut fees);
        ports
            .settle(&[
                Effect::Pull { from: user, amount: 100 },
                Effect::Mint { to: user, amount: 99 },
                Effect::Fee { amount: 1 },
            ])
            .unwrap();
        drop(ports);

        assert_eq!(custody.held, 100);
        assert_eq!(custody.balance_of(&user), 0);
        assert_eq!(shares.balance_of(&user), 99);
        assert_eq!(fees.fees, 1);
    }

    #[test]
    fn test_settle_rolls_back_on_fee_failure() {
        let user = Pubkey::new_unique();
        let mut custody = Custody::default();
        custody.wallets.insert(user, 100);
        let mut shares = Tokens::default();
        let mut fees = Tokens {
            fail_fees: true,
            ..Default::default()
        };

        let mut ports = Ports::new(&mut shares, &mut custody, &mut fees);
        let result = ports.settle(&[
            Effect::Pull { from: user, amount: 100 },
            Effect::Mint { to: user, amount: 99 },
            Effect::Fee { amount: 1 },
        ]);
        drop(ports);

        assert!(matches!(result, Err(VaultError::FeeForwardFailure)));
        assert_eq!(custody.held, 0);
        assert_eq!(custody.balance_of(&user), 100);
        assert_eq!(shares.balance_of(&user), 0);
        assert_eq!(shares.supply, 0);
    }

    #[test]
    fn test_settle_refuses_to_roll_back_a_fee() {
        let user = Pubkey::new_unique();
        let mut shares = Tokens {
            fail_mint: true,
            ..Default::default()
        };
        let mut custody = Custody::default();
        let mut fees = Tokens::default();

        let mut ports = Ports::new(&mut shares, &mut custody, &mut fees);
        let result = ports.settle(&[
            Effect::Fee { amount: 1 },
            Effect::Mint { to: user, amount: 5 },
        ]);
        assert!(matches!(result, Err(VaultError::InvariantViolation)));
    }

    #[test]
    fn test_missing_port_is_fatal() {
        let mut custody = Custody::default();
        let mut ports = Ports::custody_only(&mut custody);
        let result = ports.settle(&[Effect::Mint {
            to: Pubkey::new_unique(),
            amount: 1,
        }]);
        assert!(matches!(result, Err(VaultError::InvariantViolation)));
    }

    #[test]
    fn test_zero_amount_effects_are_skipped() {
        let mut custody = Custody::default();
        let mut ports = Ports::custody_only(&mut custody);
        ports
            .settle(&[Effect::Fee { amount: 0 }, Effect::Mint { to: Pubkey::new_unique(), amount: 0 }])
            .unwrap();
    }
}
