use super::*;
use crate::config::{FeeTier, PoolConfig};
use crate::constants::*;
use crate::errors::ErrorCode;
use crate::ledger::{Asset, InMemoryTokenLedger};
use crate::limit_order::*;
use crate::math::get_amount_1_delta;
use crate::state::pool::Pool;
use crate::state::swap::SwapDirection;
use crate::tick_math::get_sqrt_ratio_at_tick;
use anchor_lang::prelude::*;
use primitive_types::U256;

const LP_LIQUIDITY: u128 = 2_000_000_000_000_000_000;
const ORDER_LIQUIDITY: u128 = 100_000_000;

struct Fixture {
    pool: Pool,
    ledger: InMemoryTokenLedger,
    maker: Pubkey,
    taker: Pubkey,
    other: Pubkey,
}

/// Low tier pool at tick 0 backed by full-range liquidity.
fn setup() -> Fixture {
    let lp = Pubkey::new_unique();
    let maker = Pubkey::new_unique();
    let taker = Pubkey::new_unique();
    let other = Pubkey::new_unique();
    let mut ledger = funded_ledger(&[lp, maker, taker, other]);
    let mut pool = create_pool(FeeTier::Low);
    let (lower, upper) = full_range(TICK_SPACING_LOW);
    pool.mint(&lp, lower, upper, LP_LIQUIDITY, &mut ledger).unwrap();
    Fixture {
        pool,
        ledger,
        maker,
        taker,
        other,
    }
}

impl Fixture {
    fn swap_up(&mut self, amount: i128) -> crate::state::swap::SwapResult {
        self.pool
            .swap(
                &self.taker,
                SwapDirection::OneForZero,
                amount,
                MAX_SQRT_RATIO - 1,
                &mut self.ledger,
            )
            .unwrap()
    }

    fn swap_down(&mut self, amount: i128) -> crate::state::swap::SwapResult {
        self.pool
            .swap(
                &self.taker,
                SwapDirection::ZeroForOne,
                amount,
                MIN_SQRT_RATIO + 1,
                &mut self.ledger,
            )
            .unwrap()
    }
}

mod create_tests {
    use super::*;

    #[test]
    fn test_create_above_price_deposits_token0() {
        let mut f = setup();
        let deposited = f
            .pool
            .create_limit_order(&f.maker, 0, ORDER_LIQUIDITY, &mut f.ledger)
            .unwrap();

        assert_eq!(deposited, 49_986);
        assert_eq!(f.ledger.balance_of(&f.maker, Asset::Token0), FUNDING - 49_986);
        assert_eq!(f.ledger.balance_of(&f.maker, Asset::Token1), FUNDING);

        let order = f.pool.limit_order(0).unwrap();
        assert_eq!(order.owner, f.maker);
        assert_eq!(order.side, OrderSide::Token0);
        assert_eq!(order.state, OrderState::Open);
        assert_eq!(order.liquidity, ORDER_LIQUIDITY);
        assert_eq!(order.amount_deposited, 49_986);

        // The price sits on the lower tick, so the order is active liquidity.
        assert_eq!(f.pool.liquidity, LP_LIQUIDITY + ORDER_LIQUIDITY);
        assert_eq!(f.pool.tick_info(0).unwrap().liquidity_gross, ORDER_LIQUIDITY);
        assert_eq!(
            f.pool.tick_info(10).unwrap().liquidity_net,
            -(ORDER_LIQUIDITY as i128)
        );
    }

    #[test]
    fn test_create_below_price_deposits_token1() {
        let mut f = setup();
        let deposited = f
            .pool
            .create_limit_order(&f.maker, -10, ORDER_LIQUIDITY, &mut f.ledger)
            .unwrap();

        assert_eq!(deposited, 49_986);
        assert_eq!(f.pool.limit_order(-10).unwrap().side, OrderSide::Token1);
        assert_eq!(f.ledger.balance_of(&f.maker, Asset::Token1), FUNDING - 49_986);
        assert_eq!(f.pool.liquidity, LP_LIQUIDITY);
    }

    #[test]
    fn test_create_rejects_occupied_tick() {
        let mut f = setup();
        f.pool
            .create_limit_order(&f.maker, 0, ORDER_LIQUIDITY, &mut f.ledger)
            .unwrap();

        for owner in [f.maker, f.other] {
            assert_eq!(
                f.pool
                    .create_limit_order(&owner, 0, ORDER_LIQUIDITY, &mut f.ledger)
                    .unwrap_err(),
                error!(ErrorCode::TickOccupied)
            );
        }
    }

    #[test]
    fn test_create_rejects_price_inside_range() {
        let maker = Pubkey::new_unique();
        let mut ledger = funded_ledger(&[maker]);
        let mut pool = Pool::default();
        let price = get_sqrt_ratio_at_tick(5).unwrap();
        pool.initialize(pool_params(PoolConfig::from_fee_tier(FeeTier::Low), price))
            .unwrap();

        assert_eq!(
            pool.create_limit_order(&maker, 0, ORDER_LIQUIDITY, &mut ledger)
                .unwrap_err(),
            error!(ErrorCode::PriceInsideOrderRange)
        );
        assert!(pool.limit_order(0).is_none());
        assert!(pool.ticks.is_empty());
    }

    #[test]
    fn test_create_invalid_input() {
        let mut f = setup();
        assert_eq!(
            f.pool
                .create_limit_order(&f.maker, 0, 0, &mut f.ledger)
                .unwrap_err(),
            error!(ErrorCode::ZeroLiquidity)
        );
        assert_eq!(
            f.pool
                .create_limit_order(&f.maker, 5, ORDER_LIQUIDITY, &mut f.ledger)
                .unwrap_err(),
            error!(ErrorCode::TickNotAligned)
        );
        assert_eq!(
            f.pool
                .create_limit_order(&f.maker, 887_270, ORDER_LIQUIDITY, &mut f.ledger)
                .unwrap_err(),
            error!(ErrorCode::InvalidTickRange)
        );
    }

    #[test]
    fn test_create_without_funds_leaves_no_order() {
        let mut f = setup();
        let broke = Pubkey::new_unique();
        assert_eq!(
            f.pool
                .create_limit_order(&broke, 0, ORDER_LIQUIDITY, &mut f.ledger)
                .unwrap_err(),
            error!(ErrorCode::InsufficientBalance)
        );
        assert!(f.pool.limit_order(0).is_none());
        assert_eq!(f.pool.liquidity, LP_LIQUIDITY);
    }
}

mod fill_tests {
    use super::*;

    #[test]
    fn test_crossing_upper_tick_fills_token0_order() {
        let mut f = setup();
        f.pool
            .create_limit_order(&f.maker, 0, ORDER_LIQUIDITY, &mut f.ledger)
            .unwrap();

        let result = f.swap_up(3_000_000_000_000_000_000);

        assert_eq!(result.ticks_crossed, vec![10]);
        assert_eq!(
            result.filled_orders,
            vec![FilledOrder {
                owner: f.maker,
                tick: 0,
                liquidity: ORDER_LIQUIDITY,
                asset: Asset::Token1,
                amount: 50_010,
            }]
        );
        assert_eq!(result.liquidity, LP_LIQUIDITY);

        let order = f.pool.limit_order(0).unwrap();
        assert_eq!(order.state, OrderState::Filled);
        assert_eq!(order.amount_settled, 50_010);
        // The order's liquidity has left the tick ledger.
        assert!(f.pool.tick_info(0).is_none());
        assert!(f.pool.tick_info(10).is_none());
        assert_eq!(f.pool.ticks.liquidity_net_sum().unwrap(), 0);
    }

    #[test]
    fn test_crossing_lower_tick_fills_token1_order() {
        let mut f = setup();
        f.pool
            .create_limit_order(&f.maker, -10, ORDER_LIQUIDITY, &mut f.ledger)
            .unwrap();

        let result = f.swap_down(3_000_000_000_000_000_000);

        assert_eq!(result.ticks_crossed, vec![0, -10]);
        assert_eq!(result.filled_orders.len(), 1);
        assert_eq!(result.filled_orders[0].asset, Asset::Token0);
        assert_eq!(result.filled_orders[0].amount, 50_010);
        assert_eq!(f.pool.limit_order(-10).unwrap().state, OrderState::Filled);

        let collected = f
            .pool
            .collect_limit_order(&f.maker, -10, &mut f.ledger)
            .unwrap();
        assert_eq!(collected, (50_010 + 25, 0));
    }

    #[test]
    fn test_moving_away_does_not_fill() {
        let mut f = setup();
        f.pool
            .create_limit_order(&f.maker, 0, ORDER_LIQUIDITY, &mut f.ledger)
            .unwrap();

        let result = f.swap_down(1_000_000_000);
        assert!(result.filled_orders.is_empty());
        assert_eq!(f.pool.limit_order(0).unwrap().state, OrderState::Open);
    }

    #[test]
    fn test_one_swap_fills_adjacent_orders() {
        let mut f = setup();
        f.pool
            .create_limit_order(&f.maker, 0, ORDER_LIQUIDITY, &mut f.ledger)
            .unwrap();
        f.pool
            .create_limit_order(&f.other, 10, 2 * ORDER_LIQUIDITY, &mut f.ledger)
            .unwrap();

        let result = f.swap_up(3_000_000_000_000_000_000);

        let filled: Vec<(Pubkey, i32)> = result
            .filled_orders
            .iter()
            .map(|fill| (fill.owner, fill.tick))
            .collect();
        assert_eq!(filled, vec![(f.maker, 0), (f.other, 10)]);
        assert_eq!(result.ticks_crossed, vec![10, 20]);
        assert_eq!(result.liquidity, LP_LIQUIDITY);
        assert!(f.pool.tick_info(10).is_none());
        assert!(f.pool.tick_info(20).is_none());
    }

    #[test]
    fn test_stopping_inside_range_leaves_order_open() {
        let mut f = setup();
        f.pool
            .create_limit_order(&f.maker, 0, ORDER_LIQUIDITY, &mut f.ledger)
            .unwrap();

        let limit = get_sqrt_ratio_at_tick(5).unwrap();
        let result = f
            .pool
            .swap(
                &f.taker,
                SwapDirection::OneForZero,
                1_000_000_000_000_000_000,
                limit,
                &mut f.ledger,
            )
            .unwrap();
        assert!(result.filled_orders.is_empty());
        assert_eq!(result.tick, 5);
        assert_eq!(f.pool.limit_order(0).unwrap().state, OrderState::Open);
    }
}

mod cancel_tests {
    use super::*;

    #[test]
    fn test_cancel_untouched_refunds_exact_deposit() {
        let mut f = setup();
        f.pool
            .create_limit_order(&f.maker, 0, ORDER_LIQUIDITY, &mut f.ledger)
            .unwrap();

        let refunded = f
            .pool
            .cancel_limit_order(&f.maker, 0, &mut f.ledger)
            .unwrap();

        assert_eq!(refunded, (49_986, 0));
        assert_eq!(f.ledger.balance_of(&f.maker, Asset::Token0), FUNDING);
        assert!(f.pool.limit_order(0).is_none());
        assert_eq!(f.pool.liquidity, LP_LIQUIDITY);
        assert!(f.pool.tick_info(0).is_none());
        assert!(f.pool.tick_info(10).is_none());
    }

    #[test]
    fn test_cancel_partially_converted_order() {
        let mut f = setup();
        f.pool
            .create_limit_order(&f.maker, 0, ORDER_LIQUIDITY, &mut f.ledger)
            .unwrap();
        let limit = get_sqrt_ratio_at_tick(5).unwrap();
        f.pool
            .swap(
                &f.taker,
                SwapDirection::OneForZero,
                1_000_000_000_000_000_000,
                limit,
                &mut f.ledger,
            )
            .unwrap();

        let refunded = f
            .pool
            .cancel_limit_order(&f.maker, 0, &mut f.ledger)
            .unwrap();

        // Principal at the current price, rounded down, plus token1 fees.
        assert_eq!(refunded, (24_989, 25_001 + 12));
        assert_eq!(f.pool.liquidity, LP_LIQUIDITY);
    }

    #[test]
    fn test_cancel_twice_fails() {
        let mut f = setup();
        f.pool
            .create_limit_order(&f.maker, 0, ORDER_LIQUIDITY, &mut f.ledger)
            .unwrap();
        f.pool
            .cancel_limit_order(&f.maker, 0, &mut f.ledger)
            .unwrap();

        assert_eq!(
            f.pool
                .cancel_limit_order(&f.maker, 0, &mut f.ledger)
                .unwrap_err(),
            error!(ErrorCode::OrderNotFound)
        );
        assert_eq!(
            f.pool
                .collect_limit_order(&f.maker, 0, &mut f.ledger)
                .unwrap_err(),
            error!(ErrorCode::OrderNotFound)
        );
    }

    #[test]
    fn test_cancel_filled_order_fails() {
        let mut f = setup();
        f.pool
            .create_limit_order(&f.maker, 0, ORDER_LIQUIDITY, &mut f.ledger)
            .unwrap();
        f.swap_up(3_000_000_000_000_000_000);

        assert_eq!(
            f.pool
                .cancel_limit_order(&f.maker, 0, &mut f.ledger)
                .unwrap_err(),
            error!(ErrorCode::OrderAlreadyFilled)
        );
    }

    #[test]
    fn test_cancel_requires_owner_and_order() {
        let mut f = setup();
        f.pool
            .create_limit_order(&f.maker, 0, ORDER_LIQUIDITY, &mut f.ledger)
            .unwrap();

        assert_eq!(
            f.pool
                .cancel_limit_order(&f.other, 0, &mut f.ledger)
                .unwrap_err(),
            error!(ErrorCode::NotOrderOwner)
        );
        assert_eq!(
            f.pool
                .cancel_limit_order(&f.maker, 10, &mut f.ledger)
                .unwrap_err(),
            error!(ErrorCode::OrderNotFound)
        );
        assert_eq!(f.pool.limit_order(0).unwrap().state, OrderState::Open);
    }

    #[test]
    fn test_tick_reusable_after_cancel() {
        let mut f = setup();
        f.pool
            .create_limit_order(&f.maker, 0, ORDER_LIQUIDITY, &mut f.ledger)
            .unwrap();
        f.pool
            .cancel_limit_order(&f.maker, 0, &mut f.ledger)
            .unwrap();

        f.pool
            .create_limit_order(&f.other, 0, ORDER_LIQUIDITY, &mut f.ledger)
            .unwrap();
        assert_eq!(f.pool.limit_order(0).unwrap().owner, f.other);
        assert_eq!(f.pool.limit_order(0).unwrap().state, OrderState::Open);
    }

    #[test]
    fn test_order_cycles_do_not_grow_pool_account() {
        let mut f = setup();
        let base = f.pool.try_to_vec().unwrap().len();

        for tick in (1..=60).map(|i| i * TICK_SPACING_LOW as i32) {
            f.pool
                .create_limit_order(&f.maker, tick, ORDER_LIQUIDITY, &mut f.ledger)
                .unwrap();
            f.pool
                .cancel_limit_order(&f.maker, tick, &mut f.ledger)
                .unwrap();
        }

        assert!(f.pool.limit_orders.is_empty());
        assert_eq!(f.pool.try_to_vec().unwrap().len(), base);
        assert!(base + 8 <= POOL_ACCOUNT_SPACE);
    }
}

mod collect_tests {
    use super::*;

    #[test]
    fn test_collect_filled_order() {
        let mut f = setup();
        f.pool
            .create_limit_order(&f.maker, 0, ORDER_LIQUIDITY, &mut f.ledger)
            .unwrap();
        f.swap_up(3_000_000_000_000_000_000);

        let collected = f
            .pool
            .collect_limit_order(&f.maker, 0, &mut f.ledger)
            .unwrap();

        // Proceeds rounded down plus the token1 fees earned while converting.
        assert_eq!(collected, (0, 50_010 + 25));
        assert_eq!(
            f.ledger.balance_of(&f.maker, Asset::Token1),
            FUNDING + 50_010 + 25
        );
        assert_eq!(
            f.ledger.balance_of(&f.maker, Asset::Token0),
            FUNDING - 49_986
        );
        assert!(f.pool.limit_order(0).is_none());

        let closed_form = get_amount_1_delta(
            get_sqrt_ratio_at_tick(0).unwrap(),
            get_sqrt_ratio_at_tick(TICK_SPACING_LOW as i32).unwrap(),
            ORDER_LIQUIDITY,
            false,
        )
        .unwrap();
        assert!(U256::from(collected.1) >= closed_form);
    }

    #[test]
    fn test_collect_proceeds_are_frozen() {
        let mut f = setup();
        f.pool
            .create_limit_order(&f.maker, 0, ORDER_LIQUIDITY, &mut f.ledger)
            .unwrap();
        f.swap_up(3_000_000_000_000_000_000);
        // Swapping back through the range does not convert the proceeds again.
        f.swap_down(5_000_000_000_000_000_000);

        let collected = f
            .pool
            .collect_limit_order(&f.maker, 0, &mut f.ledger)
            .unwrap();
        assert_eq!(collected, (0, 50_010 + 25));
    }

    #[test]
    fn test_collect_open_order_fails() {
        let mut f = setup();
        f.pool
            .create_limit_order(&f.maker, 0, ORDER_LIQUIDITY, &mut f.ledger)
            .unwrap();
        assert_eq!(
            f.pool
                .collect_limit_order(&f.maker, 0, &mut f.ledger)
                .unwrap_err(),
            error!(ErrorCode::OrderNotFilled)
        );
    }

    #[test]
    fn test_collect_twice_fails() {
        let mut f = setup();
        f.pool
            .create_limit_order(&f.maker, 0, ORDER_LIQUIDITY, &mut f.ledger)
            .unwrap();
        f.swap_up(3_000_000_000_000_000_000);
        f.pool
            .collect_limit_order(&f.maker, 0, &mut f.ledger)
            .unwrap();

        assert_eq!(
            f.pool
                .collect_limit_order(&f.maker, 0, &mut f.ledger)
                .unwrap_err(),
            error!(ErrorCode::OrderNotFound)
        );
        assert_eq!(
            f.pool
                .cancel_limit_order(&f.maker, 0, &mut f.ledger)
                .unwrap_err(),
            error!(ErrorCode::OrderNotFound)
        );
    }

    #[test]
    fn test_filled_order_occupies_tick_until_collected() {
        let mut f = setup();
        f.pool
            .create_limit_order(&f.maker, 0, ORDER_LIQUIDITY, &mut f.ledger)
            .unwrap();
        f.swap_up(3_000_000_000_000_000_000);

        assert_eq!(
            f.pool
                .create_limit_order(&f.other, 0, ORDER_LIQUIDITY, &mut f.ledger)
                .unwrap_err(),
            error!(ErrorCode::TickOccupied)
        );

        f.pool
            .collect_limit_order(&f.maker, 0, &mut f.ledger)
            .unwrap();
        // The price is now above the range, so the new order sells token1.
        f.pool
            .create_limit_order(&f.other, 0, ORDER_LIQUIDITY, &mut f.ledger)
            .unwrap();
        assert_eq!(f.pool.limit_order(0).unwrap().side, OrderSide::Token1);
    }

    #[test]
    fn test_collect_by_stranger_fails() {
        let mut f = setup();
        f.pool
            .create_limit_order(&f.maker, 0, ORDER_LIQUIDITY, &mut f.ledger)
            .unwrap();
        f.swap_up(3_000_000_000_000_000_000);
        assert_eq!(
            f.pool
                .collect_limit_order(&f.other, 0, &mut f.ledger)
                .unwrap_err(),
            error!(ErrorCode::NotOrderOwner)
        );
    }
}
