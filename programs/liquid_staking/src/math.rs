use crate::error::*;

/// Safe math operations trait to prevent overflows
pub trait SafeMath<T> {
    fn safe_add(&self, other: T) -> VaultResult<T>;
    fn safe_sub(&self, other: T) -> VaultResult<T>;
    fn safe_mul(&self, other: T) -> VaultResult<T>;
    fn safe_div(&self, other: T) -> VaultResult<T>;
}

/// Implementation for u128
impl SafeMath<u128> for u128 {
    fn safe_add(&self, other: u128) -> VaultResult<u128> {
        self.checked_add(other).ok_or(VaultError::MathOverflow)
    }

    fn safe_sub(&self, other: u128) -> VaultResult<u128> {
        self.checked_sub(other).ok_or(VaultError::MathOverflow)
    }

    fn safe_mul(&self, other: u128) -> VaultResult<u128> {
        self.checked_mul(other).ok_or(VaultError::MathOverflow)
    }

    fn safe_div(&self, other: u128) -> VaultResult<u128> {
        if other == 0 {
            return Err(VaultError::DivisionByZero);
        }
        self.checked_div(other).ok_or(VaultError::MathOverflow)
    }
}

/// Implementation for u64
impl SafeMath<u64> for u64 {
    fn safe_add(&self, other: u64) -> VaultResult<u64> {
        self.checked_add(other).ok_or(VaultError::MathOverflow)
    }

    fn safe_sub(&self, other: u64) -> VaultResult<u64> {
        self.checked_sub(other).ok_or(VaultError::MathOverflow)
    }

    fn safe_mul(&self, other: u64) -> VaultResult<u64> {
        self.checked_mul(other).ok_or(VaultError::MathOverflow)
    }

    fn safe_div(&self, other: u64) -> VaultResult<u64> {
        if other == 0 {
            return Err(VaultError::DivisionByZero);
        }
        self.checked_div(other).ok_or(VaultError::MathOverflow)
    }
}

/// Implementation for i64 (timestamps)
impl SafeMath<i64> for i64 {
    fn safe_add(&self, other: i64) -> VaultResult<i64> {
        self.checked_add(other).ok_or(VaultError::MathOverflow)
    }

    fn safe_sub(&self, other: i64) -> VaultResult<i64> {
        self.checked_sub(other).ok_or(VaultError::MathOverflow)
    }

    fn safe_mul(&self, other: i64) -> VaultResult<i64> {
        self.checked_mul(other).ok_or(VaultError::MathOverflow)
    }

    fn safe_div(&self, other: i64) -> VaultResult<i64> {
        if other == 0 {
            return Err(VaultError::DivisionByZero);
        }
        self.checked_div(other).ok_or(VaultError::MathOverflow)
    }
}

/// Safe casting operations
pub trait SafeCast<T> {
    fn safe_cast(&self) -> VaultResult<T>;
}

impl SafeCast<u64> for u128 {
    fn safe_cast(&self) -> VaultResult<u64> {
        u64::try_from(*self).map_err(|_| VaultError::MathOverflow)
    }
}

impl SafeCast<u128> for u64 {
    fn safe_cast(&self) -> VaultResult<u128> {
        Ok(*self as u128)
    }
}

impl SafeCast<u128> for u16 {
    fn safe_cast(&self) -> VaultResult<u128> {
        Ok(*self as u128)
    }
}

impl SafeCast<u128> for i64 {
    fn safe_cast(&self) -> VaultResult<u128> {
        if *self < 0 {
            return Err(VaultError::MathOverflow);
        }
        Ok(*self as u128)
    }
}

impl SafeCast<u64> for i64 {
    fn safe_cast(&self) -> VaultResult<u64> {
        u64::try_from(*self).map_err(|_| VaultError::MathOverflow)
    }
}

/// Exchange-rate and accrual arithmetic. Every division floors.
pub mod staking_math {
    use super::*;
    use crate::constants::*;

    /// Base-asset value of one share, scaled by `RATE_PRECISION`.
    /// An empty share supply bootstraps at exactly 1:1.
    pub fn calculate_rate(pool_backing: u128, total_shares: u128) -> VaultResult<u128> {
        if total_shares == 0 {
            return Ok(RATE_PRECISION);
        }

        pool_backing
            .safe_mul(RATE_PRECISION)?
            .safe_div(total_shares)
    }

    /// Shares minted for `base_amount` at `rate`
    pub fn calculate_shares(base_amount: u128, rate: u128) -> VaultResult<u128> {
        base_amount.safe_mul(RATE_PRECISION)?.safe_div(rate)
    }

    /// Base asset redeemed for `shares` at `rate`
    pub fn calculate_base_asset(shares: u128, rate: u128) -> VaultResult<u128> {
        shares.safe_mul(rate)?.safe_div(RATE_PRECISION)
    }

    /// Yield accrued on `principal` over `elapsed_seconds` at a simple annual rate.
    pub fn calculate_accrual(
        principal: u128,
        annual_rate_bps: u16,
        elapsed_seconds: i64,
    ) -> VaultResult<u128> {
        if principal == 0 || annual_rate_bps == 0 || elapsed_seconds <= 0 {
            return Ok(0);
        }

        let elapsed: u128 = elapsed_seconds.safe_cast()?;
        let rate_bps: u128 = annual_rate_bps.safe_cast()?;

        principal
            .safe_mul(rate_bps)?
            .safe_mul(elapsed)?
            .safe_div(BASIS_POINTS_PRECISION.safe_mul(SECONDS_PER_YEAR)?)
    }

    /// `amount * bps / 10_000`
    pub fn apply_bps(amount: u128, bps: u16) -> VaultResult<u128> {
        let bps: u128 = bps.safe_cast()?;
        amount.safe_mul(bps)?.safe_div(BASIS_POINTS_PRECISION)
    }
}

#[cfg(test)]
mod tests {
    use super::staking_math::*;
    use super::*;
    use crate::constants::*;

    #[test]
    fn test_safe_math_operations() {
        assert_eq!(10u128.safe_add(20).unwrap(), 30);
        assert!(u128::MAX.safe_add(1).is_err());

        assert_eq!(20u64.safe_sub(10).unwrap(), 10);
        assert!(10u64.safe_sub(20).is_err());

        assert_eq!(10i64.safe_mul(5).unwrap(), 50);
        assert!(i64::MAX.safe_mul(2).is_err());

        assert!(matches!(20u128.safe_div(0), Err(VaultError::DivisionByZero)));
    }

    #[test]
    fn test_safe_cast_operations() {
        assert_eq!(SafeCast::<u64>::safe_cast(&100u128).unwrap(), 100u64);
        assert!(SafeCast::<u64>::safe_cast(&((u64::MAX as u128) + 1)).is_err());
        assert!(SafeCast::<u128>::safe_cast(&(-1i64)).is_err());
        assert_eq!(SafeCast::<u128>::safe_cast(&2_000u16).unwrap(), 2_000u128);
    }

    #[test]
    fn test_bootstrap_rate() {
        assert_eq!(calculate_rate(0, 0).unwrap(), RATE_PRECISION);
        assert_eq!(calculate_rate(5_000, 0).unwrap(), RATE_PRECISION);
    }

    #[test]
    fn test_rate_floors() {
        // 10 backing over 3 shares = 3.333.. -> floor
        assert_eq!(calculate_rate(10, 3).unwrap(), 3_333_333_333_333_333_333);
        assert_eq!(calculate_rate(110, 100).unwrap(), 1_100_000_000_000_000_000);
    }

    #[test]
    fn test_shares_and_base_asset_conversion() {
        let rate = 1_100_000_000_000_000_000u128;
        assert_eq!(calculate_base_asset(50, rate).unwrap(), 55);
        assert_eq!(calculate_shares(55, 1_200_000_000_000_000_000).unwrap(), 45);
        assert_eq!(calculate_shares(99, RATE_PRECISION).unwrap(), 99);
        assert!(matches!(calculate_shares(1, 0), Err(VaultError::DivisionByZero)));
    }

    #[test]
    fn test_accrual_one_year() {
        let accrued = calculate_accrual(1_000_000, 800, SECONDS_PER_YEAR as i64).unwrap();
        assert_eq!(accrued, 80_000);

        // half a year at 20%
        let accrued = calculate_accrual(1_000_000, 2_000, (SECONDS_PER_YEAR / 2) as i64).unwrap();
        assert_eq!(accrued, 100_000);
    }

    #[test]
    fn test_accrual_edge_cases() {
        assert_eq!(calculate_accrual(0, 800, ONE_DAY).unwrap(), 0);
        assert_eq!(calculate_accrual(1_000, 0, ONE_DAY).unwrap(), 0);
        assert_eq!(calculate_accrual(1_000, 800, 0).unwrap(), 0);
        assert_eq!(calculate_accrual(1_000, 800, -100).unwrap(), 0);
        // too small to accrue a whole unit in one second
        assert_eq!(calculate_accrual(1_000, 800, 1).unwrap(), 0);
    }

    #[test]
    fn test_apply_bps() {
        assert_eq!(apply_bps(100, 100).unwrap(), 1);
        assert_eq!(apply_bps(10, 1_000).unwrap(), 1);
        assert_eq!(apply_bps(99, 100).unwrap(), 0);
        assert_eq!(apply_bps(1_000, 0).unwrap(), 0);
    }
}
