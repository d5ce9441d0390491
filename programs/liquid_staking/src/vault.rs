//! Host-independent accounting for deposits, emergency exits and the delayed
//! exit queue.
//!
//! Every operation runs read-accrue-mutate on a staged copy of the pool and
//! staker, settles its external effects through [`Ports`], and only then
//! commits the staged state. A failed call leaves every account untouched.

use crate::error::*;
use crate::ledger::{Effect, Ports};
use crate::math::{staking_math, SafeCast, SafeMath};
use crate::state::*;
use anchor_lang::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DepositReceipt {
    pub amount: u64,
    pub fee: u64,
    pub net: u64,
    pub shares: u64,
    pub rate: u128,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EmergencyExitReceipt {
    pub shares_burned: u64,
    pub gross: u64,
    pub penalty: u64,
    pub net: u64,
    pub rate: u128,
    pub penalty_disposition: PenaltyDisposition,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExitTicket {
    pub id: u64,
    pub shares_burned: u64,
    pub base_asset_amount: u128,
    pub unlock_time: i64,
    pub rate: u128,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExitPayout {
    pub id: u64,
    pub amount: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CancelReceipt {
    pub id: u64,
    pub base_asset_amount: u128,
    pub shares_minted: u64,
    pub rate: u128,
}

/// Deposit `amount` of base asset and mint shares at the post-accrual rate.
pub fn deposit(
    pool: &mut Pool,
    staker: &mut Staker,
    ports: &mut Ports<'_>,
    caller: &Pubkey,
    amount: u64,
    now: i64,
) -> VaultResult<DepositReceipt> {
    pool.require_active()?;

    if amount == 0 || amount < pool.min_deposit {
        return Err(VaultError::InsufficientAmount);
    }
    if ports.custody()?.balance_of(caller) < amount {
        return Err(VaultError::InsufficientBalance);
    }

    let mut staged = pool.clone();
    staged.checkpoint(now)?;

    let total_shares = ports.shares()?.total_supply();
    let fee: u64 = staking_math::apply_bps(amount.safe_cast()?, staged.deposit_fee_bps)?.safe_cast()?;
    let net = amount.safe_sub(fee)?;

    // shares are priced before the deposit joins the backing
    let rate = staged.rate(total_shares, now)?;
    let shares: u64 = staking_math::calculate_shares(net.safe_cast()?, rate)?.safe_cast()?;
    if shares == 0 {
        return Err(VaultError::InsufficientAmount);
    }

    staged.total_principal = staged.total_principal.safe_add(net.safe_cast()?)?;
    staged.total_fees_collected = staged.total_fees_collected.safe_add(fee.safe_cast()?)?;
    staged.verify_invariants(total_shares.safe_add(shares)?, now)?;

    let mut staged_staker = staker.clone();
    staged_staker.record_deposit(amount)?;

    ports.settle(&[
        Effect::Pull { from: *caller, amount },
        Effect::Mint { to: *caller, amount: shares },
        Effect::Fee { amount: fee },
    ])?;

    *pool = staged;
    *staker = staged_staker;

    msg!(
        "Deposited {} (fee {}, net {}), minted {} shares at rate {}",
        amount,
        fee,
        net,
        shares,
        rate
    );

    Ok(DepositReceipt {
        amount,
        fee,
        net,
        shares,
        rate,
    })
}

/// Burn `share_amount` and pay out immediately, less `penalty_bps`.
pub fn emergency_exit(
    pool: &mut Pool,
    staker: &mut Staker,
    ports: &mut Ports<'_>,
    caller: &Pubkey,
    share_amount: u64,
    penalty_bps: u16,
    now: i64,
) -> VaultResult<EmergencyExitReceipt> {
    if share_amount == 0 {
        return Err(VaultError::InsufficientAmount);
    }
    pool.validate_penalty(penalty_bps)?;
    if ports.shares()?.balance_of(caller) < share_amount {
        return Err(VaultError::InsufficientBalance);
    }

    let mut staged = pool.clone();
    staged.checkpoint(now)?;

    let total_shares = ports.shares()?.total_supply();
    let rate = staged.rate(total_shares, now)?;
    let gross_value = staking_math::calculate_base_asset(share_amount.safe_cast()?, rate)?;
    let gross: u64 = gross_value.safe_cast()?;
    if gross == 0 {
        return Err(VaultError::InsufficientAmount);
    }

    let penalty: u64 = staking_math::apply_bps(gross_value, penalty_bps)?.safe_cast()?;
    let net = gross.safe_sub(penalty)?;

    staged.total_principal = staged
        .total_principal
        .checked_sub(gross_value)
        .ok_or_else(|| {
            msg!(
                "INVARIANT VIOLATION: exit of {} exceeds principal {}",
                gross,
                staged.total_principal
            );
            VaultError::InvariantViolation
        })?;

    let penalty_value: u128 = penalty.safe_cast()?;
    let mut effects = vec![
        Effect::Burn { from: *caller, amount: share_amount },
        Effect::Pay { to: *caller, amount: net },
    ];
    let outflow = match staged.penalty_disposition {
        PenaltyDisposition::RetainInPool => {
            staged.retained_penalties = staged.retained_penalties.safe_add(penalty_value)?;
            staged.total_penalties_retained =
                staged.total_penalties_retained.safe_add(penalty_value)?;
            net
        }
        PenaltyDisposition::ForwardToBeneficiary => {
            staged.total_penalties_forwarded =
                staged.total_penalties_forwarded.safe_add(penalty_value)?;
            effects.push(Effect::Fee { amount: penalty });
            gross
        }
    };

    // pending requests keep first claim on custody
    let custody_after = ports
        .custody()?
        .custody_balance()
        .checked_sub(outflow)
        .ok_or(VaultError::InsufficientLiquidity)?;
    if u128::from(custody_after) < staged.total_pending_withdrawals {
        return Err(VaultError::InsufficientLiquidity);
    }

    staged.verify_invariants(total_shares.safe_sub(share_amount)?, now)?;

    let mut staged_staker = staker.clone();
    staged_staker.record_withdrawal(net, penalty)?;

    ports.settle(&effects)?;

    *pool = staged;
    *staker = staged_staker;

    msg!(
        "Emergency exit of {} shares at rate {}: gross {}, penalty {}, paid {}",
        share_amount,
        rate,
        gross,
        penalty,
        net
    );

    Ok(EmergencyExitReceipt {
        shares_burned: share_amount,
        gross,
        penalty,
        net,
        rate,
        penalty_disposition: pool.penalty_disposition,
    })
}

/// Burn `share_amount` now and queue a payout of its current value.
/// `request` is the freshly created account for id `pool.next_request_id`.
pub fn request_exit(
    pool: &mut Pool,
    staker: &mut Staker,
    request: &mut WithdrawalRequest,
    ports: &mut Ports<'_>,
    caller: &Pubkey,
    share_amount: u64,
    now: i64,
) -> VaultResult<ExitTicket> {
    if share_amount == 0 {
        return Err(VaultError::InsufficientAmount);
    }
    if ports.shares()?.balance_of(caller) < share_amount {
        return Err(VaultError::InsufficientBalance);
    }

    let mut staged = pool.clone();
    staged.checkpoint(now)?;

    let total_shares = ports.shares()?.total_supply();
    let rate = staged.rate(total_shares, now)?;
    let value = staking_math::calculate_base_asset(share_amount.safe_cast()?, rate)?;
    if value == 0 {
        return Err(VaultError::InsufficientAmount);
    }
    // payouts go through the token program in u64
    let _: u64 = value.safe_cast()?;

    // the holder's claim leaves principal in the same instant their backing does
    staged.total_principal = staged.total_principal.checked_sub(value).ok_or_else(|| {
        msg!(
            "INVARIANT VIOLATION: request of {} exceeds principal {}",
            value,
            staged.total_principal
        );
        VaultError::InvariantViolation
    })?;
    staged.total_pending_withdrawals = staged.total_pending_withdrawals.safe_add(value)?;

    let id = staged.next_request_id;
    staged.next_request_id = staged.next_request_id.safe_add(1)?;
    staged.open_requests = staged.open_requests.safe_add(1)?;
    staged.verify_invariants(total_shares.safe_sub(share_amount)?, now)?;

    let unlock_time = WithdrawalRequest::unlock_time_for(now, staged.withdrawal_delay)?;
    let mut staged_request = request.clone();
    staged_request.id = id;
    staged_request.owner = *caller;
    staged_request.base_asset_amount = value;
    staged_request.shares_burned = share_amount;
    staged_request.requested_at = now;
    staged_request.unlock_time = unlock_time;
    staged_request.status = WithdrawalStatus::Pending;
    staged_request.settled_at = 0;

    let mut staged_staker = staker.clone();
    staged_staker.record_request(id)?;

    ports.settle(&[Effect::Burn { from: *caller, amount: share_amount }])?;

    *pool = staged;
    *staker = staged_staker;
    *request = staged_request;

    msg!(
        "Exit request {} for {} shares at rate {}: {} unlocks at {}",
        id,
        share_amount,
        rate,
        value,
        unlock_time
    );

    Ok(ExitTicket {
        id,
        shares_burned: share_amount,
        base_asset_amount: value,
        unlock_time,
        rate,
    })
}

/// Pay out an unlocked request to its owner.
pub fn process_exit(
    pool: &mut Pool,
    staker: &mut Staker,
    request: &mut WithdrawalRequest,
    ports: &mut Ports<'_>,
    caller: &Pubkey,
    now: i64,
) -> VaultResult<ExitPayout> {
    request.require_owner(caller)?;

    let mut staged_request = request.clone();
    staged_request.mark_processed(now)?;

    let amount: u64 = staged_request.base_asset_amount.safe_cast()?;
    if ports.custody()?.custody_balance() < amount {
        return Err(VaultError::InsufficientLiquidity);
    }

    let mut staged = pool.clone();
    staged.checkpoint(now)?;
    staged.total_pending_withdrawals = staged
        .total_pending_withdrawals
        .checked_sub(staged_request.base_asset_amount)
        .ok_or_else(|| {
            msg!(
                "INVARIANT VIOLATION: request {} exceeds pending total {}",
                staged_request.id,
                staged.total_pending_withdrawals
            );
            VaultError::InvariantViolation
        })?;
    staged.open_requests = staged
        .open_requests
        .checked_sub(1)
        .ok_or(VaultError::InvariantViolation)?;

    let total_shares = ports.shares()?.total_supply();
    staged.verify_invariants(total_shares, now)?;

    let mut staged_staker = staker.clone();
    staged_staker.record_withdrawal(amount, 0)?;

    ports.settle(&[Effect::Pay { to: *caller, amount }])?;

    *pool = staged;
    *staker = staged_staker;
    *request = staged_request;

    msg!("Processed exit request {}: paid {}", request.id, amount);

    Ok(ExitPayout {
        id: request.id,
        amount,
    })
}

/// Abandon a pending request and re-mint shares at the current rate.
pub fn cancel_exit(
    pool: &mut Pool,
    request: &mut WithdrawalRequest,
    ports: &mut Ports<'_>,
    caller: &Pubkey,
    now: i64,
) -> VaultResult<CancelReceipt> {
    request.require_owner(caller)?;

    let mut staged_request = request.clone();
    staged_request.mark_canceled(now)?;
    let value = staged_request.base_asset_amount;

    let mut staged = pool.clone();
    staged.checkpoint(now)?;

    let total_shares = ports.shares()?.total_supply();
    // priced at today's rate, not the rate the request locked in
    let rate = staged.rate(total_shares, now)?;
    let shares: u64 = staking_math::calculate_shares(value, rate)?.safe_cast()?;
    if shares == 0 {
        return Err(VaultError::InsufficientAmount);
    }

    staged.total_pending_withdrawals = staged
        .total_pending_withdrawals
        .checked_sub(value)
        .ok_or_else(|| {
            msg!(
                "INVARIANT VIOLATION: request {} exceeds pending total {}",
                staged_request.id,
                staged.total_pending_withdrawals
            );
            VaultError::InvariantViolation
        })?;
    staged.total_principal = staged.total_principal.safe_add(value)?;
    staged.open_requests = staged
        .open_requests
        .checked_sub(1)
        .ok_or(VaultError::InvariantViolation)?;
    staged.verify_invariants(total_shares.safe_add(shares)?, now)?;

    ports.settle(&[Effect::Mint { to: *caller, amount: shares }])?;

    *pool = staged;
    *request = staged_request;

    msg!(
        "Canceled exit request {}: {} returned as {} shares at rate {}",
        request.id,
        value,
        shares,
        rate
    );

    Ok(CancelReceipt {
        id: request.id,
        base_asset_amount: value,
        shares_minted: shares,
        rate,
    })
}

/// Record base asset sent into custody to fund accrued yield.
pub fn fund_rewards(
    pool: &mut Pool,
    ports: &mut Ports<'_>,
    funder: &Pubkey,
    amount: u64,
) -> VaultResult {
    if amount == 0 {
        return Err(VaultError::InsufficientAmount);
    }
    if ports.custody()?.balance_of(funder) < amount {
        return Err(VaultError::InsufficientBalance);
    }

    let total_rewards_funded = pool.total_rewards_funded.safe_add(amount.safe_cast()?)?;

    ports.settle(&[Effect::Pull { from: *funder, amount }])?;

    pool.total_rewards_funded = total_rewards_funded;

    msg!("Funded {} base asset for rewards", amount);

    Ok(())
}
