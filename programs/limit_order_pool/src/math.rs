/// Limit Order Pool Fixed-Point Math Library
///
/// This module implements the full-precision arithmetic behind the pool: 512-bit
/// intermediate `mul_div`, signed liquidity deltas, token amounts between two
/// square-root prices and the price reached after adding or removing an amount.
///
/// Prices are Q64.96 values held in a `U256` (they need up to 160 bits). Every
/// function takes an explicit rounding direction or documents the one it uses:
/// amounts the pool receives round up, amounts it pays out round down, so that
/// rounding never drains the pool.
use crate::constants::*;
use crate::errors::ErrorCode;
use anchor_lang::prelude::*;
use primitive_types::{U256, U512};

/// Computes `floor(a * b / denominator)` with a 512-bit intermediate product.
///
/// # Arguments
/// * `a` - The multiplicand
/// * `b` - The multiplier
/// * `denominator` - The divisor
///
/// # Returns
/// * `Result<U256>` - The quotient, or `MathOverflow` when the denominator is zero
///   or the quotient does not fit in 256 bits
pub fn mul_div(a: U256, b: U256, denominator: U256) -> Result<U256> {
    require!(!denominator.is_zero(), ErrorCode::MathOverflow);

    let product = a.full_mul(b);
    let quotient = product / U512::from(denominator);

    U256::try_from(quotient).map_err(|_| error!(ErrorCode::MathOverflow))
}

/// Computes `ceil(a * b / denominator)` with a 512-bit intermediate product.
pub fn mul_div_rounding_up(a: U256, b: U256, denominator: U256) -> Result<U256> {
    require!(!denominator.is_zero(), ErrorCode::MathOverflow);

    let product = a.full_mul(b);
    let denominator = U512::from(denominator);
    let mut quotient = product / denominator;
    if !(product % denominator).is_zero() {
        quotient += U512::one();
    }

    U256::try_from(quotient).map_err(|_| error!(ErrorCode::MathOverflow))
}

/// Computes `ceil(a / b)`.
pub fn div_rounding_up(a: U256, b: U256) -> Result<U256> {
    require!(!b.is_zero(), ErrorCode::DivisionByZero);

    let quotient = a / b;
    if (a % b).is_zero() {
        Ok(quotient)
    } else {
        // a / b < a for b > 1, and b == 1 never leaves a remainder
        Ok(quotient + U256::one())
    }
}

/// Adds a signed liquidity delta to a liquidity amount.
///
/// Fails with `MathOverflow` when the result would be negative or exceed `u128`.
pub fn add_delta(x: u128, y: i128) -> Result<u128> {
    if y < 0 {
        x.checked_sub(y.unsigned_abs())
            .ok_or(error!(ErrorCode::MathOverflow))
    } else {
        x.checked_add(y as u128)
            .ok_or(error!(ErrorCode::MathOverflow))
    }
}

/// Narrows a `U256` to `u128`, failing with `MathOverflow` if it does not fit.
pub fn to_u128(value: U256) -> Result<u128> {
    require!(value.bits() <= 128, ErrorCode::MathOverflow);
    Ok(value.low_u128())
}

fn to_u160(value: U256) -> Result<U256> {
    require!(value.bits() <= 160, ErrorCode::MathOverflow);
    Ok(value)
}

fn sorted(a: U256, b: U256) -> (U256, U256) {
    if a > b {
        (b, a)
    } else {
        (a, b)
    }
}

/// Calculates the amount of token 0 held by `liquidity` between two prices
///
/// ΔX = L * 2^96 * (sqrt_upper - sqrt_lower) / (sqrt_upper * sqrt_lower)
///
/// The prices may be passed in either order.
///
/// # Arguments
/// * `sqrt_ratio_a_x96` - One boundary of the range in Q64.96
/// * `sqrt_ratio_b_x96` - The other boundary of the range in Q64.96
/// * `liquidity` - The amount of liquidity
/// * `round_up` - Whether to round the result up
///
/// # Returns
/// * `Result<U256>` - The amount of token 0
pub fn get_amount_0_delta(
    sqrt_ratio_a_x96: U256,
    sqrt_ratio_b_x96: U256,
    liquidity: u128,
    round_up: bool,
) -> Result<U256> {
    let (sqrt_lower, sqrt_upper) = sorted(sqrt_ratio_a_x96, sqrt_ratio_b_x96);
    require!(!sqrt_lower.is_zero(), ErrorCode::SqrtPriceOutOfRange);

    let numerator1 = U256::from(liquidity) << RESOLUTION_96;
    let numerator2 = sqrt_upper - sqrt_lower;

    if round_up {
        div_rounding_up(
            mul_div_rounding_up(numerator1, numerator2, sqrt_upper)?,
            sqrt_lower,
        )
    } else {
        Ok(mul_div(numerator1, numerator2, sqrt_upper)? / sqrt_lower)
    }
}

/// Calculates the amount of token 1 held by `liquidity` between two prices
///
/// ΔY = L * (sqrt_upper - sqrt_lower) / 2^96
///
/// The prices may be passed in either order.
pub fn get_amount_1_delta(
    sqrt_ratio_a_x96: U256,
    sqrt_ratio_b_x96: U256,
    liquidity: u128,
    round_up: bool,
) -> Result<U256> {
    let (sqrt_lower, sqrt_upper) = sorted(sqrt_ratio_a_x96, sqrt_ratio_b_x96);

    if round_up {
        mul_div_rounding_up(U256::from(liquidity), sqrt_upper - sqrt_lower, Q96)
    } else {
        mul_div(U256::from(liquidity), sqrt_upper - sqrt_lower, Q96)
    }
}

/// Price reached after adding or removing `amount` of token 0, rounded up.
///
/// sqrt_next = L * sqrt_p / (L ± amount * sqrt_p)
///
/// Rounding up keeps the price from moving further than the amount pays for in
/// both directions.
fn get_next_sqrt_price_from_amount_0_rounding_up(
    sqrt_price_x96: U256,
    liquidity: u128,
    amount: U256,
    add: bool,
) -> Result<U256> {
    if amount.is_zero() {
        return Ok(sqrt_price_x96);
    }
    let numerator1 = U256::from(liquidity) << RESOLUTION_96;

    if add {
        if let Some(product) = amount.checked_mul(sqrt_price_x96) {
            if let Some(denominator) = numerator1.checked_add(product) {
                return mul_div_rounding_up(numerator1, sqrt_price_x96, denominator);
            }
        }
        // Falls back to the less precise L / (L / sqrt_p + amount) form.
        let denominator = (numerator1 / sqrt_price_x96)
            .checked_add(amount)
            .ok_or(ErrorCode::MathOverflow)?;
        div_rounding_up(numerator1, denominator)
    } else {
        let product = amount
            .checked_mul(sqrt_price_x96)
            .ok_or(ErrorCode::InsufficientLiquidity)?;
        require!(numerator1 > product, ErrorCode::InsufficientLiquidity);
        let denominator = numerator1 - product;
        to_u160(mul_div_rounding_up(numerator1, sqrt_price_x96, denominator)?)
    }
}

/// Price reached after adding or removing `amount` of token 1, rounded down.
///
/// sqrt_next = sqrt_p ± amount / L
fn get_next_sqrt_price_from_amount_1_rounding_down(
    sqrt_price_x96: U256,
    liquidity: u128,
    amount: U256,
    add: bool,
) -> Result<U256> {
    let liquidity = U256::from(liquidity);

    if add {
        let quotient = mul_div(amount, Q96, liquidity)?;
        let next = sqrt_price_x96
            .checked_add(quotient)
            .ok_or(ErrorCode::MathOverflow)?;
        to_u160(next)
    } else {
        let quotient = mul_div_rounding_up(amount, Q96, liquidity)?;
        require!(sqrt_price_x96 > quotient, ErrorCode::InsufficientLiquidity);
        Ok(sqrt_price_x96 - quotient)
    }
}

/// Computes the price after `amount_in` of the input token enters the pool
///
/// # Arguments
/// * `sqrt_price_x96` - The starting price
/// * `liquidity` - The active liquidity
/// * `amount_in` - How much of the input token is added
/// * `zero_for_one` - Whether the input token is token 0
///
/// # Returns
/// * `Result<U256>` - The next price, never overshooting what `amount_in` pays for
pub fn get_next_sqrt_price_from_input(
    sqrt_price_x96: U256,
    liquidity: u128,
    amount_in: U256,
    zero_for_one: bool,
) -> Result<U256> {
    require!(!sqrt_price_x96.is_zero(), ErrorCode::SqrtPriceOutOfRange);
    require!(liquidity > 0, ErrorCode::InsufficientLiquidity);

    if zero_for_one {
        get_next_sqrt_price_from_amount_0_rounding_up(sqrt_price_x96, liquidity, amount_in, true)
    } else {
        get_next_sqrt_price_from_amount_1_rounding_down(sqrt_price_x96, liquidity, amount_in, true)
    }
}

/// Computes the price after `amount_out` of the output token leaves the pool
///
/// Fails with `InsufficientLiquidity` if the active liquidity cannot provide
/// `amount_out`.
pub fn get_next_sqrt_price_from_output(
    sqrt_price_x96: U256,
    liquidity: u128,
    amount_out: U256,
    zero_for_one: bool,
) -> Result<U256> {
    require!(!sqrt_price_x96.is_zero(), ErrorCode::SqrtPriceOutOfRange);
    require!(liquidity > 0, ErrorCode::InsufficientLiquidity);

    if zero_for_one {
        get_next_sqrt_price_from_amount_1_rounding_down(sqrt_price_x96, liquidity, amount_out, false)
    } else {
        get_next_sqrt_price_from_amount_0_rounding_up(sqrt_price_x96, liquidity, amount_out, false)
    }
}

/// Fees accrued by `liquidity` while the fee growth inside its range moved from
/// `inside_last_x128` to `inside_now_x128`.
///
/// Fee growth accumulators wrap, so the difference is taken modulo 2^256.
pub fn fees_earned(
    liquidity: u128,
    inside_now_x128: U256,
    inside_last_x128: U256,
) -> Result<u128> {
    let growth = inside_now_x128.overflowing_sub(inside_last_x128).0;
    to_u128(mul_div(growth, U256::from(liquidity), Q128)?)
}
