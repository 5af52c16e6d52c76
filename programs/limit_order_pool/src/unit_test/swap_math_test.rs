use crate::constants::*;
use crate::math::{get_amount_0_delta, get_amount_1_delta};
use crate::swap_math::*;
use crate::tick_math::get_sqrt_ratio_at_tick;
use primitive_types::U256;

const LIQUIDITY: u128 = 1_000_000_000_000_000_000;

fn sqrt_at(tick: i32) -> U256 {
    get_sqrt_ratio_at_tick(tick).unwrap()
}

fn dec(value: &str) -> U256 {
    U256::from_dec_str(value).unwrap()
}

mod exact_input_tests {
    use super::*;

    #[test]
    fn test_stops_short_of_target_zero_for_one() {
        let step = compute_swap_step(Q96, sqrt_at(-60), LIQUIDITY, 1_000_000_000_000_000, 30).unwrap();

        assert_eq!(
            step.sqrt_ratio_next_x96,
            dec("79149250711305166342700278159")
        );
        assert_eq!(step.amount_in, U256::from(997_000_000_000_000u128));
        assert_eq!(step.amount_out, U256::from(996_006_981_039_903u128));
        assert_eq!(step.fee_amount, U256::from(3_000_000_000_000u128));
        // The whole budget is consumed.
        assert_eq!(
            step.amount_in + step.fee_amount,
            U256::from(1_000_000_000_000_000u128)
        );
    }

    #[test]
    fn test_stops_short_of_target_one_for_zero() {
        let step = compute_swap_step(Q96, sqrt_at(60), LIQUIDITY, 1_000_000_000_000_000, 30).unwrap();

        assert_eq!(
            step.sqrt_ratio_next_x96,
            dec("79307152992291059138124713654")
        );
        assert_eq!(step.amount_in, U256::from(997_000_000_000_000u128));
        assert_eq!(step.amount_out, U256::from(996_006_981_039_903u128));
        assert_eq!(step.fee_amount, U256::from(3_000_000_000_000u128));
    }

    #[test]
    fn test_reaches_target() {
        let target = sqrt_at(-10);
        let step = compute_swap_step(Q96, target, LIQUIDITY, LIQUIDITY as i128, 5).unwrap();

        assert_eq!(step.sqrt_ratio_next_x96, target);
        assert_eq!(step.amount_in, U256::from(500_100_010_000_501u128));
        assert_eq!(step.amount_out, U256::from(499_850_034_993_001u128));
        assert_eq!(step.fee_amount, U256::from(250_175_092_547u128));
        assert_eq!(
            step.amount_in,
            get_amount_0_delta(target, Q96, LIQUIDITY, true).unwrap()
        );
    }

    #[test]
    fn test_zero_fee() {
        let step = compute_swap_step(Q96, sqrt_at(600), LIQUIDITY, 1_000_000_000_000_000, 0).unwrap();

        assert_eq!(
            step.sqrt_ratio_next_x96,
            dec("79307390676778601931137494286")
        );
        assert_eq!(step.amount_in, U256::from(1_000_000_000_000_000u128));
        assert_eq!(step.amount_out, U256::from(999_000_999_000_999u128));
        assert!(step.fee_amount.is_zero());
    }

    #[test]
    fn test_zero_liquidity_jumps_to_target() {
        let target = sqrt_at(120);
        let step = compute_swap_step(Q96, target, 0, 1_000, 30).unwrap();

        assert_eq!(step.sqrt_ratio_next_x96, target);
        assert!(step.amount_in.is_zero());
        assert!(step.amount_out.is_zero());
        assert!(step.fee_amount.is_zero());
    }

    #[test]
    fn test_current_equals_target() {
        let step = compute_swap_step(Q96, Q96, LIQUIDITY, 1_000, 30).unwrap();
        assert_eq!(step.sqrt_ratio_next_x96, Q96);
        assert!(step.amount_in.is_zero());
        assert!(step.amount_out.is_zero());
    }
}

mod exact_output_tests {
    use super::*;

    #[test]
    fn test_stops_short_of_target_one_for_zero() {
        let step =
            compute_swap_step(Q96, sqrt_at(60), LIQUIDITY, -1_000_000_000_000_000, 30).unwrap();

        assert_eq!(
            step.sqrt_ratio_next_x96,
            dec("79307469984248586179723674011")
        );
        assert_eq!(step.amount_in, U256::from(1_001_001_001_001_002u128));
        assert_eq!(step.amount_out, U256::from(1_000_000_000_000_000u128));
        assert_eq!(step.fee_amount, U256::from(3_012_039_120_365u128));
    }

    #[test]
    fn test_stops_short_of_target_zero_for_one() {
        let step =
            compute_swap_step(Q96, sqrt_at(-60), LIQUIDITY, -1_000_000_000_000_000, 30).unwrap();

        assert_eq!(
            step.sqrt_ratio_next_x96,
            dec("79148934351750073255950406385")
        );
        assert_eq!(step.amount_in, U256::from(1_001_001_001_001_002u128));
        assert_eq!(step.amount_out, U256::from(1_000_000_000_000_000u128));
    }

    #[test]
    fn test_reaches_target_and_caps_output() {
        let target = sqrt_at(-10);
        let step = compute_swap_step(Q96, target, LIQUIDITY, -(LIQUIDITY as i128), 5).unwrap();

        assert_eq!(step.sqrt_ratio_next_x96, target);
        assert_eq!(
            step.amount_out,
            get_amount_1_delta(target, Q96, LIQUIDITY, false).unwrap()
        );
        assert!(step.amount_out < U256::from(LIQUIDITY));
    }

    #[test]
    fn test_output_never_exceeds_request() {
        for requested in [1i128, 7, 1_000, 999_999_999] {
            let step = compute_swap_step(Q96, sqrt_at(-600), LIQUIDITY, -requested, 30).unwrap();
            assert!(step.amount_out <= U256::from(requested as u128));
        }
    }
}
