/// Limit orders on top of the concentrated liquidity pool.
///
/// A limit order is single-asset liquidity over exactly one tick spacing,
/// `[tick, tick + spacing)`, placed entirely on one side of the current price.
/// When a swap crosses the far boundary of that range, the deposit has been
/// fully converted into the other asset; the order is marked filled, its
/// liquidity is pulled out of the tick ledger so it cannot convert back, and the
/// proceeds are frozen until the owner collects them.
///
/// Orders are keyed by their lower tick. At most one non-terminal order may rest
/// on a tick, whoever owns it. Canceling or collecting an order removes its
/// record, since the book lives inline in the pool account.
use anchor_lang::prelude::*;
use primitive_types::U256;
use std::collections::BTreeMap;

use crate::errors::ErrorCode;
use crate::events::{Burn, LimitOrderCanceled, LimitOrderCollected, LimitOrderCreated, Mint};
use crate::ledger::{Asset, Settlement, TokenLedger};
use crate::math::{self, fees_earned, to_u128};
use crate::state::pool::Pool;
use crate::state::swap::SwapDirection;
use crate::tick_math;
use crate::u256_wrapper::U256Wrapper;

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OrderState {
    #[default]
    Open,
    Filled,
    Canceled,
    Collected,
}

impl OrderState {
    /// Canceled and collected orders no longer occupy their tick.
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderState::Canceled | OrderState::Collected)
    }
}

/// Which asset an order deposits.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OrderSide {
    /// Sells token0; the range sits at or above the price and fills when the
    /// price rises through its upper tick.
    #[default]
    Token0,
    /// Sells token1; the range sits at or below the price and fills when the
    /// price falls through its lower tick.
    Token1,
}

impl OrderSide {
    pub fn deposit_asset(self) -> Asset {
        match self {
            OrderSide::Token0 => Asset::Token0,
            OrderSide::Token1 => Asset::Token1,
        }
    }

    pub fn proceeds_asset(self) -> Asset {
        self.deposit_asset().other()
    }
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LimitOrder {
    pub owner: Pubkey,
    /// Lower tick of the order's range
    pub tick: i32,
    pub side: OrderSide,
    pub liquidity: u128,
    /// Amount of the deposit asset debited at creation
    pub amount_deposited: u128,
    pub state: OrderState,
    /// Fee growth inside the range at creation, in Q128.128
    pub fee_growth_inside_0_last_x128: U256Wrapper,
    pub fee_growth_inside_1_last_x128: U256Wrapper,
    /// Fee growth inside the range at the crossing that filled the order
    pub fee_growth_inside_0_at_fill_x128: U256Wrapper,
    pub fee_growth_inside_1_at_fill_x128: U256Wrapper,
    /// Amount of the proceeds asset the order converted into, rounded down
    pub amount_settled: u128,
}

impl LimitOrder {
    pub fn upper_tick(&self, tick_spacing: u16) -> i32 {
        self.tick + tick_spacing as i32
    }

    /// Whether crossing `crossed_tick` in `direction` converts the whole order.
    pub fn fills_on(&self, crossed_tick: i32, direction: SwapDirection, tick_spacing: u16) -> bool {
        match (self.side, direction) {
            (OrderSide::Token0, SwapDirection::OneForZero) => {
                crossed_tick == self.upper_tick(tick_spacing)
            }
            (OrderSide::Token1, SwapDirection::ZeroForOne) => crossed_tick == self.tick,
            _ => false,
        }
    }

    /// Fees earned between placement and fill.
    pub fn fees_owed(&self) -> Result<(u128, u128)> {
        Ok((
            fees_earned(
                self.liquidity,
                self.fee_growth_inside_0_at_fill_x128.value(),
                self.fee_growth_inside_0_last_x128.value(),
            )?,
            fees_earned(
                self.liquidity,
                self.fee_growth_inside_1_at_fill_x128.value(),
                self.fee_growth_inside_1_last_x128.value(),
            )?,
        ))
    }
}

/// Summary of an order filled during a swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilledOrder {
    pub owner: Pubkey,
    pub tick: i32,
    pub liquidity: u128,
    /// The asset the order was converted into
    pub asset: Asset,
    pub amount: u128,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct LimitOrderBook {
    orders: BTreeMap<i32, LimitOrder>,
}

impl LimitOrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, tick: i32) -> Option<&LimitOrder> {
        self.orders.get(&tick)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&i32, &LimitOrder)> {
        self.orders.iter()
    }

    /// Fails with `TickOccupied` if a non-terminal order rests on `tick`.
    pub fn ensure_vacant(&self, tick: i32) -> Result<()> {
        match self.orders.get(&tick) {
            Some(order) if !order.state.is_terminal() => err!(ErrorCode::TickOccupied),
            _ => Ok(()),
        }
    }

    pub fn insert(&mut self, order: LimitOrder) {
        self.orders.insert(order.tick, order);
    }

    pub fn remove(&mut self, tick: i32) -> Option<LimitOrder> {
        self.orders.remove(&tick)
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Looks up the order on `tick`, checking that `owner` owns it.
    pub fn get_owned(&self, tick: i32, owner: &Pubkey) -> Result<LimitOrder> {
        let order = self.orders.get(&tick).ok_or(ErrorCode::OrderNotFound)?;
        require_keys_eq!(order.owner, *owner, ErrorCode::NotOrderOwner);
        Ok(*order)
    }
}

impl Pool {
    /// Places a limit order of `liquidity` on `[tick, tick + spacing)`.
    ///
    /// The deposit asset follows from the price: token0 if the range is at or
    /// above it, token1 if at or below. The deposit (rounded up) is debited from
    /// `owner`.
    ///
    /// # Returns
    /// * `Result<u128>` - The amount of the deposit asset debited.
    pub fn create_limit_order(
        &mut self,
        owner: &Pubkey,
        tick: i32,
        liquidity: u128,
        ledger: &mut dyn TokenLedger,
    ) -> Result<u128> {
        let order = self.transact(|pool| {
            pool.limit_orders.ensure_vacant(tick)?;
            require!(liquidity > 0, ErrorCode::ZeroLiquidity);
            require!(pool.config.is_aligned(tick), ErrorCode::TickNotAligned);
            let tick_upper = tick + pool.config.tick_spacing as i32;
            pool.check_ticks(tick, tick_upper)?;

            let sqrt_price = pool.sqrt_price_x96();
            let side = if sqrt_price <= tick_math::get_sqrt_ratio_at_tick(tick)? {
                OrderSide::Token0
            } else if sqrt_price >= tick_math::get_sqrt_ratio_at_tick(tick_upper)? {
                OrderSide::Token1
            } else {
                return err!(ErrorCode::PriceInsideOrderRange);
            };

            let delta = i128::try_from(liquidity).map_err(|_| error!(ErrorCode::MathOverflow))?;
            let change = pool.modify_range(tick, tick_upper, delta)?;
            let amount_deposited = match side {
                OrderSide::Token0 => change.amount0,
                OrderSide::Token1 => change.amount1,
            };

            let order = LimitOrder {
                owner: *owner,
                tick,
                side,
                liquidity,
                amount_deposited,
                state: OrderState::Open,
                fee_growth_inside_0_last_x128: change.fee_growth_inside_0_x128.into(),
                fee_growth_inside_1_last_x128: change.fee_growth_inside_1_x128.into(),
                ..LimitOrder::default()
            };
            pool.limit_orders.insert(order);

            ledger.settle(owner, &Settlement::debit(side.deposit_asset(), amount_deposited))?;
            msg!(
                "Limit order created at tick {}: {} of {:?}",
                tick,
                amount_deposited,
                side.deposit_asset()
            );
            Ok(order)
        })?;

        let (amount0, amount1) = match order.side {
            OrderSide::Token0 => (order.amount_deposited, 0),
            OrderSide::Token1 => (0, order.amount_deposited),
        };
        emit!(Mint {
            owner: *owner,
            tick_lower: tick,
            tick_upper: order.upper_tick(self.config.tick_spacing),
            liquidity,
            amount0,
            amount1,
        });
        emit!(LimitOrderCreated {
            owner: *owner,
            tick,
            liquidity,
            asset: order.side.deposit_asset(),
            amount: order.amount_deposited,
        });
        Ok(order.amount_deposited)
    }

    /// Settles the order resting on the range just crossed, if the crossing
    /// completed its conversion.
    ///
    /// Called by the swap loop right after `crossed_tick` has been crossed, with
    /// the fee growth at that moment. `tick_after` is the pool tick after the
    /// crossing. The order's liquidity is removed from both boundary ticks; the
    /// active liquidity is left alone since the range is already out of range.
    pub(crate) fn on_tick_crossed(
        &mut self,
        crossed_tick: i32,
        direction: SwapDirection,
        tick_after: i32,
        fee_growth_global_0_x128: U256,
        fee_growth_global_1_x128: U256,
    ) -> Result<Option<FilledOrder>> {
        let tick_spacing = self.config.tick_spacing;
        let order_tick = match direction {
            SwapDirection::OneForZero => crossed_tick - tick_spacing as i32,
            SwapDirection::ZeroForOne => crossed_tick,
        };
        let mut order = match self.limit_orders.get(order_tick) {
            Some(order)
                if order.state == OrderState::Open
                    && order.fills_on(crossed_tick, direction, tick_spacing) =>
            {
                *order
            }
            _ => return Ok(None),
        };

        let tick_upper = order.upper_tick(tick_spacing);
        let (inside_0, inside_1) = self.ticks.fee_growth_inside(
            order.tick,
            tick_upper,
            tick_after,
            fee_growth_global_0_x128,
            fee_growth_global_1_x128,
        );

        let sqrt_lower = tick_math::get_sqrt_ratio_at_tick(order.tick)?;
        let sqrt_upper = tick_math::get_sqrt_ratio_at_tick(tick_upper)?;
        let amount_settled = to_u128(match order.side {
            OrderSide::Token0 => {
                math::get_amount_1_delta(sqrt_lower, sqrt_upper, order.liquidity, false)?
            }
            OrderSide::Token1 => {
                math::get_amount_0_delta(sqrt_lower, sqrt_upper, order.liquidity, false)?
            }
        })?;

        let delta = i128::try_from(order.liquidity).map_err(|_| error!(ErrorCode::MathOverflow))?;
        let max_liquidity = self.config.max_liquidity_per_tick();
        for (boundary, upper) in [(order.tick, false), (tick_upper, true)] {
            let flipped = self.ticks.update(
                boundary,
                tick_after,
                -delta,
                fee_growth_global_0_x128,
                fee_growth_global_1_x128,
                upper,
                max_liquidity,
                tick_spacing,
            )?;
            if flipped {
                self.ticks.clear(boundary);
            }
        }

        order.state = OrderState::Filled;
        order.fee_growth_inside_0_at_fill_x128 = inside_0.into();
        order.fee_growth_inside_1_at_fill_x128 = inside_1.into();
        order.amount_settled = amount_settled;
        self.limit_orders.insert(order);

        msg!(
            "Limit order at tick {} filled: {} of {:?}",
            order.tick,
            amount_settled,
            order.side.proceeds_asset()
        );

        Ok(Some(FilledOrder {
            owner: order.owner,
            tick: order.tick,
            liquidity: order.liquidity,
            asset: order.side.proceeds_asset(),
            amount: amount_settled,
        }))
    }

    /// Withdraws an open order.
    ///
    /// If the price never entered the order's range the exact deposit is
    /// returned; otherwise the range's current token amounts (rounded down).
    /// Fees earned while in range are added on top.
    ///
    /// # Returns
    /// * `Result<(u128, u128)>` - The token0 and token1 amounts credited.
    pub fn cancel_limit_order(
        &mut self,
        owner: &Pubkey,
        tick: i32,
        ledger: &mut dyn TokenLedger,
    ) -> Result<(u128, u128)> {
        let (order, amount0, amount1) = self.transact(|pool| {
            let order = pool.limit_orders.get_owned(tick, owner)?;
            match order.state {
                OrderState::Open => {}
                OrderState::Filled | OrderState::Collected => {
                    return err!(ErrorCode::OrderAlreadyFilled)
                }
                OrderState::Canceled => return err!(ErrorCode::OrderNotOpen),
            }

            let tick_upper = order.upper_tick(pool.config.tick_spacing);
            let sqrt_price = pool.sqrt_price_x96();
            let untouched = match order.side {
                OrderSide::Token0 => sqrt_price <= tick_math::get_sqrt_ratio_at_tick(tick)?,
                OrderSide::Token1 => sqrt_price >= tick_math::get_sqrt_ratio_at_tick(tick_upper)?,
            };

            let delta = i128::try_from(order.liquidity).map_err(|_| error!(ErrorCode::MathOverflow))?;
            let change = pool.modify_range(tick, tick_upper, -delta)?;

            let (principal_0, principal_1) = match (untouched, order.side) {
                (true, OrderSide::Token0) => (order.amount_deposited, 0),
                (true, OrderSide::Token1) => (0, order.amount_deposited),
                (false, _) => (change.amount0, change.amount1),
            };
            let fees_0 = fees_earned(
                order.liquidity,
                change.fee_growth_inside_0_x128,
                order.fee_growth_inside_0_last_x128.value(),
            )?;
            let fees_1 = fees_earned(
                order.liquidity,
                change.fee_growth_inside_1_x128,
                order.fee_growth_inside_1_last_x128.value(),
            )?;
            let amount0 = principal_0.checked_add(fees_0).ok_or(ErrorCode::MathOverflow)?;
            let amount1 = principal_1.checked_add(fees_1).ok_or(ErrorCode::MathOverflow)?;

            pool.limit_orders.remove(tick);

            ledger.settle(
                owner,
                &Settlement {
                    credit_0: amount0,
                    credit_1: amount1,
                    ..Settlement::default()
                },
            )?;
            msg!("Limit order at tick {} canceled", tick);
            Ok((order, amount0, amount1))
        })?;

        emit!(Burn {
            owner: *owner,
            tick_lower: tick,
            tick_upper: order.upper_tick(self.config.tick_spacing),
            liquidity: order.liquidity,
            amount0,
            amount1,
        });
        emit!(LimitOrderCanceled {
            owner: *owner,
            tick,
            amount0,
            amount1,
        });
        Ok((amount0, amount1))
    }

    /// Pays out a filled order: the frozen proceeds plus the fees it earned
    /// between placement and fill.
    ///
    /// # Returns
    /// * `Result<(u128, u128)>` - The token0 and token1 amounts credited.
    pub fn collect_limit_order(
        &mut self,
        owner: &Pubkey,
        tick: i32,
        ledger: &mut dyn TokenLedger,
    ) -> Result<(u128, u128)> {
        let (amount0, amount1) = self.transact(|pool| {
            let order = pool.limit_orders.get_owned(tick, owner)?;
            require!(order.state == OrderState::Filled, ErrorCode::OrderNotFilled);

            let (fees_0, fees_1) = order.fees_owed()?;
            let (proceeds_0, proceeds_1) = match order.side.proceeds_asset() {
                Asset::Token0 => (order.amount_settled, 0),
                Asset::Token1 => (0, order.amount_settled),
            };
            let amount0 = proceeds_0.checked_add(fees_0).ok_or(ErrorCode::MathOverflow)?;
            let amount1 = proceeds_1.checked_add(fees_1).ok_or(ErrorCode::MathOverflow)?;

            pool.limit_orders.remove(tick);

            ledger.settle(
                owner,
                &Settlement {
                    credit_0: amount0,
                    credit_1: amount1,
                    ..Settlement::default()
                },
            )?;
            msg!("Limit order at tick {} collected", tick);
            Ok((amount0, amount1))
        })?;

        emit!(LimitOrderCollected {
            owner: *owner,
            tick,
            amount0,
            amount1,
        });
        Ok((amount0, amount1))
    }
}
