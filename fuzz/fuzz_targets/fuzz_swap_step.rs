#![no_main]

use arbitrary::Arbitrary;
use honggfuzz::fuzz;
use limit_order_pool::constants::{BPS_DENOMINATOR, MAX_TICK, MIN_TICK};
use limit_order_pool::swap_math::compute_swap_step;
use limit_order_pool::tick_math::get_sqrt_ratio_at_tick;
use primitive_types::U256;

#[derive(Debug, Clone, Arbitrary)]
struct SwapStepInput {
    current_tick: i32,
    target_tick: i32,
    liquidity: u64,
    amount_remaining: i64,
    fee_rate_bps: u16,
}

fn fuzz_swap_step(input: SwapStepInput) {
    let span = MAX_TICK - MIN_TICK + 1;
    let current_tick = MIN_TICK + input.current_tick.rem_euclid(span);
    let target_tick = MIN_TICK + input.target_tick.rem_euclid(span);
    let fee_rate_bps = input.fee_rate_bps % BPS_DENOMINATOR as u16;
    let amount = input.amount_remaining as i128;

    let current = get_sqrt_ratio_at_tick(current_tick).unwrap();
    let target = get_sqrt_ratio_at_tick(target_tick).unwrap();

    let step = match compute_swap_step(current, target, input.liquidity as u128, amount, fee_rate_bps) {
        Ok(step) => step,
        // Exact output larger than the whole band's reserves.
        Err(_) => {
            assert!(amount < 0);
            return;
        }
    };

    // The price moves toward the target and never past it.
    if current >= target {
        assert!(step.sqrt_ratio_next_x96 <= current && step.sqrt_ratio_next_x96 >= target);
    } else {
        assert!(step.sqrt_ratio_next_x96 >= current && step.sqrt_ratio_next_x96 <= target);
    }

    let magnitude = U256::from(amount.unsigned_abs());
    if amount >= 0 {
        assert!(step.amount_in + step.fee_amount <= magnitude);
    } else {
        assert!(step.amount_out <= magnitude);
    }
    if fee_rate_bps == 0 {
        assert!(step.fee_amount.is_zero());
    }
}

fn main() {
    loop {
        fuzz!(|data: SwapStepInput| {
            fuzz_swap_step(data);
        });
    }
}
