use static_assertions::const_assert;

/// Time constants
pub const ONE_MINUTE: i64 = 60;
pub const ONE_HOUR: i64 = ONE_MINUTE * 60;
pub const ONE_DAY: i64 = ONE_HOUR * 24;
pub const ONE_WEEK: i64 = ONE_DAY * 7;
pub const SECONDS_PER_YEAR: u128 = 365 * 24 * 60 * 60;

/// Precision constants
pub const RATE_PRECISION: u128 = 1_000_000_000_000_000_000; // 1e18
pub const BASIS_POINTS_PRECISION: u128 = 10_000;

/// Yield configuration limits
pub const MAX_ANNUAL_RATE_BPS: u16 = 2_000; // 20%
pub const DEFAULT_ANNUAL_RATE_BPS: u16 = 0;

/// Deposit configuration
pub const MAX_DEPOSIT_FEE_BPS: u16 = 1_000; // 10%
pub const DEFAULT_DEPOSIT_FEE_BPS: u16 = 100; // 1%
pub const DEFAULT_MIN_DEPOSIT: u64 = 1;

/// Withdrawal queue configuration
pub const MIN_WITHDRAWAL_DELAY: i64 = ONE_MINUTE * 10;
pub const MAX_WITHDRAWAL_DELAY: i64 = ONE_DAY * 90;
pub const DEFAULT_WITHDRAWAL_DELAY: i64 = ONE_WEEK;
pub const MAX_REQUESTS_PER_STAKER: usize = 1_024;

/// Emergency exit penalty tiers (in basis points)
pub const MAX_PENALTY_TIERS: usize = 8;
pub const MAX_EMERGENCY_PENALTY_BPS: u16 = 5_000; // 50%
pub const DEFAULT_PENALTY_TIERS: [u16; 5] = [500, 1_000, 1_500, 2_000, 2_500];

/// PDA seeds
pub const POOL_SEED: &[u8] = b"pool";
pub const CUSTODY_SEED: &[u8] = b"custody";
pub const STAKER_SEED: &[u8] = b"staker";
pub const WITHDRAWAL_REQUEST_SEED: &[u8] = b"withdrawal_request";

const_assert!(MAX_ANNUAL_RATE_BPS as u128 <= BASIS_POINTS_PRECISION);
const_assert!(MAX_DEPOSIT_FEE_BPS as u128 <= BASIS_POINTS_PRECISION);
const_assert!(MAX_EMERGENCY_PENALTY_BPS as u128 <= BASIS_POINTS_PRECISION);
const_assert!(DEFAULT_PENALTY_TIERS.len() <= MAX_PENALTY_TIERS);
const_assert!(MIN_WITHDRAWAL_DELAY <= DEFAULT_WITHDRAWAL_DELAY);
const_assert!(DEFAULT_WITHDRAWAL_DELAY <= MAX_WITHDRAWAL_DELAY);
