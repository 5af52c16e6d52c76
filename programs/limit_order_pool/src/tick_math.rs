/// Conversion between tick indices and Q64.96 square-root prices.
///
/// A tick `t` corresponds to the price 1.0001^t, so its square-root ratio is
/// sqrt(1.0001)^t * 2^96. The forward conversion multiplies together precomputed
/// Q128.128 factors of sqrt(1.0001)^-(2^i), one per set bit of |t|, and inverts
/// the product for positive ticks. The result is exact to within one unit and
/// strictly increasing in `t`, which the inverse conversion relies on.
use crate::constants::*;
use crate::errors::ErrorCode;
use anchor_lang::prelude::*;
use primitive_types::U256;

/// sqrt(1.0001)^-1 in Q128.128, applied when bit 0 of |tick| is set.
const RATIO_BIT_0: u128 = 0xfffcb933bd6fad37aa2d162d1a594001;

/// sqrt(1.0001)^-(2^i) in Q128.128 for i = 1..=19.
const RATIO_LADDER: [u128; 19] = [
    0xfff97272373d413259a46990580e213a,
    0xfff2e50f5f656932ef12357cf3c7fdcc,
    0xffe5caca7e10e4e61c3624eaa0941cd0,
    0xffcb9843d60f6159c9db58835c926644,
    0xff973b41fa98c081472e6896dfb254c0,
    0xff2ea16466c96a3843ec78b326b52861,
    0xfe5dee046a99a2a811c461f1969c3053,
    0xfcbe86c7900a88aedcffc83b479aa3a4,
    0xf987a7253ac413176f2b074cf7815e54,
    0xf3392b0822b70005940c7a398e4b70f3,
    0xe7159475a2c29b7443b29c7fa6e889d9,
    0xd097f3bdfd2022b8845ad8f792aa5825,
    0xa9f746462d870fdf8a65dc1f90e061e5,
    0x70d869a156d2a1b890bb3df62baf32f7,
    0x31be135f97d08fd981231505542fcfa6,
    0x09aa508b5b7a84e1c677de54f3e99bc9,
    0x005d6af8dedb81196699c329225ee604,
    0x00002216e584f5fa1ea926041bedfe98,
    0x00000000048a170391f7dc42444e8fa2,
];

/// Converts a tick index to its Q64.96 square-root price
///
/// # Arguments
/// * `tick` - A tick index in `[MIN_TICK, MAX_TICK]`
///
/// # Returns
/// * `Result<U256>` - sqrt(1.0001^tick) * 2^96, rounded up, or `TickOutOfRange`
pub fn get_sqrt_ratio_at_tick(tick: i32) -> Result<U256> {
    require!(
        (MIN_TICK..=MAX_TICK).contains(&tick),
        ErrorCode::TickOutOfRange
    );

    let abs_tick = tick.unsigned_abs();

    let mut ratio = if abs_tick & 0x1 != 0 {
        U256::from(RATIO_BIT_0)
    } else {
        Q128
    };

    for (i, factor) in RATIO_LADDER.iter().enumerate() {
        if abs_tick & (0x2 << i) != 0 {
            // ratio <= 2^128 and factor < 2^128, so the product fits in 256 bits
            ratio = (ratio * U256::from(*factor)) >> RESOLUTION_128;
        }
    }

    if tick > 0 {
        ratio = U256::MAX / ratio;
    }

    // Q128.128 -> Q64.96, rounding up so that get_tick_at_sqrt_ratio of the
    // result is always `tick`.
    let remainder = ratio & U256::from(u32::MAX);
    let mut sqrt_price_x96 = ratio >> 32;
    if !remainder.is_zero() {
        sqrt_price_x96 += U256::one();
    }

    Ok(sqrt_price_x96)
}

/// Converts a Q64.96 square-root price to the greatest tick whose ratio is at
/// most that price
///
/// # Arguments
/// * `sqrt_price_x96` - A price in `[MIN_SQRT_RATIO, MAX_SQRT_RATIO)`
///
/// # Returns
/// * `Result<i32>` - The tick `t` with `ratio(t) <= sqrt_price_x96 < ratio(t + 1)`,
///   or `SqrtPriceOutOfRange`
pub fn get_tick_at_sqrt_ratio(sqrt_price_x96: U256) -> Result<i32> {
    require!(
        sqrt_price_x96 >= MIN_SQRT_RATIO && sqrt_price_x96 < MAX_SQRT_RATIO,
        ErrorCode::SqrtPriceOutOfRange
    );

    // Binary search over the monotonic forward conversion.
    let mut low = MIN_TICK;
    let mut high = MAX_TICK - 1;
    let mut ans = MIN_TICK;

    while low <= high {
        let mid = low + (high - low) / 2;
        if get_sqrt_ratio_at_tick(mid)? <= sqrt_price_x96 {
            ans = mid;
            low = mid + 1;
        } else {
            high = mid - 1;
        }
    }

    Ok(ans)
}
