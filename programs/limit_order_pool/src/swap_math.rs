/// Single swap step within one liquidity band.
///
/// A step moves the price from `sqrt_ratio_current_x96` toward
/// `sqrt_ratio_target_x96` (the next initialized tick or the caller's price
/// limit, whichever is closer) using at most `amount_remaining`. Liquidity is
/// constant for the whole step.
use crate::constants::*;
use crate::math::*;
use anchor_lang::prelude::*;
use primitive_types::U256;

/// Outcome of [`compute_swap_step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SwapStep {
    /// Price reached by the step; equals the target when the band was exhausted.
    pub sqrt_ratio_next_x96: U256,
    /// Input consumed, excluding the fee.
    pub amount_in: U256,
    pub amount_out: U256,
    /// Fee charged on the input, in input-token units.
    pub fee_amount: U256,
}

/// Computes one swap step
///
/// The direction is implied by the prices: `current >= target` means token 0 is
/// sold for token 1. A positive `amount_remaining` is an exact-input budget
/// (fee included), a negative one is the exact output still wanted.
///
/// # Arguments
/// * `sqrt_ratio_current_x96` - The current pool price
/// * `sqrt_ratio_target_x96` - The price the step may not pass
/// * `liquidity` - The active liquidity
/// * `amount_remaining` - Remaining input (> 0) or output (< 0)
/// * `fee_rate_bps` - Fee charged on input, in basis points
///
/// # Returns
/// * `Result<SwapStep>` - The price reached and the amounts moved
pub fn compute_swap_step(
    sqrt_ratio_current_x96: U256,
    sqrt_ratio_target_x96: U256,
    liquidity: u128,
    amount_remaining: i128,
    fee_rate_bps: u16,
) -> Result<SwapStep> {
    let zero_for_one = sqrt_ratio_current_x96 >= sqrt_ratio_target_x96;
    let exact_in = amount_remaining >= 0;
    let remaining = U256::from(amount_remaining.unsigned_abs());
    let fee_rate = U256::from(fee_rate_bps);
    let bps = U256::from(BPS_DENOMINATOR);

    let mut amount_in = U256::zero();
    let mut amount_out = U256::zero();
    let sqrt_ratio_next_x96;

    if exact_in {
        let remaining_less_fee = mul_div(remaining, bps - fee_rate, bps)?;
        amount_in = if zero_for_one {
            get_amount_0_delta(sqrt_ratio_target_x96, sqrt_ratio_current_x96, liquidity, true)?
        } else {
            get_amount_1_delta(sqrt_ratio_current_x96, sqrt_ratio_target_x96, liquidity, true)?
        };
        sqrt_ratio_next_x96 = if remaining_less_fee >= amount_in {
            sqrt_ratio_target_x96
        } else {
            get_next_sqrt_price_from_input(
                sqrt_ratio_current_x96,
                liquidity,
                remaining_less_fee,
                zero_for_one,
            )?
        };
    } else {
        amount_out = if zero_for_one {
            get_amount_1_delta(sqrt_ratio_target_x96, sqrt_ratio_current_x96, liquidity, false)?
        } else {
            get_amount_0_delta(sqrt_ratio_current_x96, sqrt_ratio_target_x96, liquidity, false)?
        };
        sqrt_ratio_next_x96 = if remaining >= amount_out {
            sqrt_ratio_target_x96
        } else {
            get_next_sqrt_price_from_output(
                sqrt_ratio_current_x96,
                liquidity,
                remaining,
                zero_for_one,
            )?
        };
    }

    let reached_target = sqrt_ratio_target_x96 == sqrt_ratio_next_x96;

    // Amounts computed against the target can be reused only if it was reached.
    if zero_for_one {
        if !(reached_target && exact_in) {
            amount_in =
                get_amount_0_delta(sqrt_ratio_next_x96, sqrt_ratio_current_x96, liquidity, true)?;
        }
        if !(reached_target && !exact_in) {
            amount_out =
                get_amount_1_delta(sqrt_ratio_next_x96, sqrt_ratio_current_x96, liquidity, false)?;
        }
    } else {
        if !(reached_target && exact_in) {
            amount_in =
                get_amount_1_delta(sqrt_ratio_current_x96, sqrt_ratio_next_x96, liquidity, true)?;
        }
        if !(reached_target && !exact_in) {
            amount_out =
                get_amount_0_delta(sqrt_ratio_current_x96, sqrt_ratio_next_x96, liquidity, false)?;
        }
    }

    // Never hand out more than was asked for.
    if !exact_in && amount_out > remaining {
        amount_out = remaining;
    }

    let fee_amount = if exact_in && sqrt_ratio_next_x96 != sqrt_ratio_target_x96 {
        // The whole remaining budget is consumed; whatever did not move the price
        // is fee.
        remaining - amount_in
    } else {
        mul_div_rounding_up(amount_in, fee_rate, bps - fee_rate)?
    };

    Ok(SwapStep {
        sqrt_ratio_next_x96,
        amount_in,
        amount_out,
        fee_amount,
    })
}
