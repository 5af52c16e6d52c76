/// Limit Order Pool Protocol Constants
///
/// This module defines the protocol parameters and numeric boundaries shared by the
/// fixed-point math, the tick ledger and the limit order overlay. Prices are carried
/// as Q64.96 square-root ratios and fee growth as Q128.128 accumulators.
use primitive_types::U256;

/// The minimum tick index supported by the protocol.
///
/// Calculated as log_1.0001(2^-128); the square-root ratio at this tick is
/// [`MIN_SQRT_RATIO`].
pub const MIN_TICK: i32 = -887272;

/// The maximum tick index supported by the protocol.
pub const MAX_TICK: i32 = -MIN_TICK;

/// The value of `get_sqrt_ratio_at_tick(MIN_TICK)` in Q64.96.
pub const MIN_SQRT_RATIO: U256 = U256([4295128739, 0, 0, 0]);

/// The value of `get_sqrt_ratio_at_tick(MAX_TICK)` in Q64.96,
/// 1461446703485210103287273052203988822378723970342.
pub const MAX_SQRT_RATIO: U256 = U256([6743328256752651558, 17280870778742802505, 4294805859, 0]);

/// 2^96, the scale of Q64.96 prices.
pub const Q96: U256 = U256([0, 1 << 32, 0, 0]);

/// 2^128, the scale of Q128.128 fee growth.
pub const Q128: U256 = U256([0, 0, 1, 0]);

/// Number of fractional bits of a Q64.96 value.
pub const RESOLUTION_96: u32 = 96;

/// Number of fractional bits of a Q128.128 fee growth accumulator.
pub const RESOLUTION_128: u32 = 128;

/// Denominator for fee rates and protocol fee shares expressed in basis points.
pub const BPS_DENOMINATOR: u128 = 10_000;

/// Fee tiers (fee in basis points, tick spacing).
///
/// Low fee tier (0.05%), suited to correlated pairs.
pub const FEE_TIER_LOW: u16 = 5;
pub const TICK_SPACING_LOW: u16 = 10;

/// Medium fee tier (0.30%).
pub const FEE_TIER_MEDIUM: u16 = 30;
pub const TICK_SPACING_MEDIUM: u16 = 60;

/// High fee tier (1.00%).
pub const FEE_TIER_HIGH: u16 = 100;
pub const TICK_SPACING_HIGH: u16 = 200;

/// Upper bound for the share of swap fees diverted to the protocol.
pub const MAX_PROTOCOL_FEE_SHARE_BPS: u16 = 2_500;

/// Seed prefix of the pool PDA: `[POOL_SEED, token0_mint, token1_mint]`.
pub const POOL_SEED: &[u8] = b"pool";

/// Space reserved for a pool account.
///
/// Ticks, positions and limit orders are stored inline, so this bounds how many
/// of them a single pool can hold. It is the largest size an account can be
/// created with through a CPI.
pub const POOL_ACCOUNT_SPACE: usize = 10 * 1024;
