#![no_main]

use anchor_lang::prelude::*;
use arbitrary::Arbitrary;
use honggfuzz::fuzz;
use limit_order_pool::errors::ErrorCode;
use limit_order_pool::math::{mul_div, mul_div_rounding_up};
use primitive_types::{U256, U512};

#[derive(Debug, Clone, Arbitrary)]
struct MulDivInput {
    a: [u64; 4],
    b: [u64; 4],
    denominator: [u64; 4],
}

fn fuzz_mul_div(input: MulDivInput) {
    let a = U256(input.a);
    let b = U256(input.b);
    let denominator = U256(input.denominator);

    let down = mul_div(a, b, denominator);
    let up = mul_div_rounding_up(a, b, denominator);

    if denominator.is_zero() {
        assert_eq!(down.unwrap_err(), error!(ErrorCode::MathOverflow));
        return;
    }

    let product = a.full_mul(b);
    let exact = product / U512::from(denominator);
    let remainder_is_zero = (product % U512::from(denominator)).is_zero();

    match down {
        Ok(value) => {
            assert_eq!(U512::from(value), exact);
            if a.is_zero() || b.is_zero() {
                assert!(value.is_zero());
            }
            match up {
                Ok(rounded) if remainder_is_zero => assert_eq!(rounded, value),
                Ok(rounded) => assert_eq!(rounded, value + 1),
                // Only the rounding step can overflow here.
                Err(_) => assert_eq!(value, U256::MAX),
            }
        }
        Err(_) => {
            assert!(exact > U512::from(U256::MAX));
            assert!(up.is_err());
        }
    }
}

fn main() {
    loop {
        fuzz!(|data: MulDivInput| {
            fuzz_mul_div(data);
        });
    }
}
