#![no_main]

use arbitrary::Arbitrary;
use honggfuzz::fuzz;
use limit_order_pool::constants::{MAX_SQRT_RATIO, MAX_TICK, MIN_SQRT_RATIO, MIN_TICK};
use limit_order_pool::tick_math::{get_sqrt_ratio_at_tick, get_tick_at_sqrt_ratio};
use primitive_types::U256;

#[derive(Debug, Clone, Arbitrary)]
enum TickMathOp {
    FromTick(i32),
    FromPrice([u64; 3]),
}

fn fuzz_tick_math(op: TickMathOp) {
    match op {
        TickMathOp::FromTick(tick) => {
            let result = get_sqrt_ratio_at_tick(tick);
            if !(MIN_TICK..=MAX_TICK).contains(&tick) {
                assert!(result.is_err());
                return;
            }
            let ratio = result.unwrap();
            assert!(ratio >= MIN_SQRT_RATIO && ratio <= MAX_SQRT_RATIO);
            if tick < MAX_TICK {
                assert_eq!(get_tick_at_sqrt_ratio(ratio).unwrap(), tick);
                assert!(get_sqrt_ratio_at_tick(tick + 1).unwrap() > ratio);
            }
        }
        TickMathOp::FromPrice(limbs) => {
            // 160-bit prices cover the whole valid range and some of both sides.
            let price = U256([limbs[0], limbs[1], limbs[2] & 0xffff_ffff, 0]);
            let result = get_tick_at_sqrt_ratio(price);
            if price < MIN_SQRT_RATIO || price >= MAX_SQRT_RATIO {
                assert!(result.is_err());
                return;
            }
            let tick = result.unwrap();
            assert!(get_sqrt_ratio_at_tick(tick).unwrap() <= price);
            assert!(get_sqrt_ratio_at_tick(tick + 1).unwrap() > price);
        }
    }
}

fn main() {
    loop {
        fuzz!(|data: TickMathOp| {
            fuzz_tick_math(data);
        });
    }
}
