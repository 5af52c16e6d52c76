use crate::constants::*;
use crate::errors::ErrorCode;
use crate::events::{LimitOrderFilled, Swap};
use crate::ledger::{Asset, Settlement, TokenLedger};
use crate::limit_order::FilledOrder;
use crate::math::{add_delta, mul_div, to_u128};
use crate::state::pool::Pool;
use crate::swap_math::compute_swap_step;
use crate::tick_math;
use anchor_lang::prelude::*;
use primitive_types::U256;

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwapDirection {
    /// Sell token0 for token1; the price moves down.
    ZeroForOne,
    /// Sell token1 for token0; the price moves up.
    OneForZero,
}

impl SwapDirection {
    pub fn is_zero_for_one(self) -> bool {
        matches!(self, SwapDirection::ZeroForOne)
    }

    pub fn input_asset(self) -> Asset {
        match self {
            SwapDirection::ZeroForOne => Asset::Token0,
            SwapDirection::OneForZero => Asset::Token1,
        }
    }

    pub fn output_asset(self) -> Asset {
        self.input_asset().other()
    }
}

/// Outcome of a swap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapResult {
    /// Pool balance deltas: positive amounts were paid in by the swapper,
    /// negative amounts were paid out.
    pub amount0: i128,
    pub amount1: i128,
    pub sqrt_price_x96: U256,
    pub tick: i32,
    pub liquidity: u128,
    /// Initialized ticks crossed, in crossing order.
    pub ticks_crossed: Vec<i32>,
    /// Limit orders filled by the crossings.
    pub filled_orders: Vec<FilledOrder>,
}

impl SwapResult {
    fn settlement(&self) -> Settlement {
        let mut settlement = Settlement::default();
        if self.amount0 >= 0 {
            settlement.debit_0 = self.amount0.unsigned_abs();
        } else {
            settlement.credit_0 = self.amount0.unsigned_abs();
        }
        if self.amount1 >= 0 {
            settlement.debit_1 = self.amount1.unsigned_abs();
        } else {
            settlement.credit_1 = self.amount1.unsigned_abs();
        }
        settlement
    }
}

/// Running state of the swap loop, committed to the pool at the end.
struct SwapState {
    /// Input (exact in) or output (exact out) still to be swapped
    amount_specified_remaining: i128,
    /// Output (exact in) or input (exact out) accumulated so far
    amount_calculated: i128,
    sqrt_price_x96: U256,
    tick: i32,
    /// Fee growth of the input token
    fee_growth_global_x128: U256,
    protocol_fee: u128,
    liquidity: u128,
}

fn to_i128(value: U256) -> Result<i128> {
    i128::try_from(to_u128(value)?).map_err(|_| error!(ErrorCode::MathOverflow))
}

impl Pool {
    /// Swaps against the pool.
    ///
    /// # Arguments
    /// * `swapper` - The account paying the input and receiving the output.
    /// * `direction` - Which token is sold.
    /// * `amount_specified` - Exact input if positive, exact output if negative.
    /// * `sqrt_price_limit_x96` - The swap stops once the price reaches this
    ///   value. It must lie strictly between the current price and the extreme
    ///   ratio in the swap direction.
    /// * `ledger` - Debits the input from and credits the output to `swapper`.
    ///
    /// # Returns
    /// * `Result<SwapResult>` - The pool deltas and the resulting price state.
    pub fn swap(
        &mut self,
        swapper: &Pubkey,
        direction: SwapDirection,
        amount_specified: i128,
        sqrt_price_limit_x96: U256,
        ledger: &mut dyn TokenLedger,
    ) -> Result<SwapResult> {
        let result = self.transact(|pool| {
            let result = pool.execute_swap(direction, amount_specified, sqrt_price_limit_x96)?;
            ledger.settle(swapper, &result.settlement())?;
            Ok(result)
        })?;

        emit!(Swap {
            sender: *swapper,
            amount0: result.amount0,
            amount1: result.amount1,
            sqrt_price_x96: result.sqrt_price_x96.into(),
            liquidity: result.liquidity,
            tick: result.tick,
        });
        for fill in &result.filled_orders {
            emit!(LimitOrderFilled {
                owner: fill.owner,
                tick: fill.tick,
                liquidity: fill.liquidity,
                asset: fill.asset,
                amount: fill.amount,
            });
        }

        Ok(result)
    }

    /// The swap loop. Mutates `self`, which is expected to be a draft.
    fn execute_swap(
        &mut self,
        direction: SwapDirection,
        amount_specified: i128,
        sqrt_price_limit_x96: U256,
    ) -> Result<SwapResult> {
        require!(amount_specified != 0, ErrorCode::ZeroAmountSpecified);

        let zero_for_one = direction.is_zero_for_one();
        let sqrt_price_start = self.sqrt_price_x96();
        if zero_for_one {
            require!(
                sqrt_price_limit_x96 < sqrt_price_start && sqrt_price_limit_x96 > MIN_SQRT_RATIO,
                ErrorCode::InvalidSqrtPriceLimit
            );
        } else {
            require!(
                sqrt_price_limit_x96 > sqrt_price_start && sqrt_price_limit_x96 < MAX_SQRT_RATIO,
                ErrorCode::InvalidSqrtPriceLimit
            );
        }

        let exact_input = amount_specified > 0;
        let tick_spacing = self.config.tick_spacing;
        let fee_rate_bps = self.config.fee_rate_bps;
        let protocol_fee_share = U256::from(self.config.protocol_fee_share_bps);
        let (fee_growth_global_0, fee_growth_global_1) = self.fee_growth_global_x128();

        let mut state = SwapState {
            amount_specified_remaining: amount_specified,
            amount_calculated: 0,
            sqrt_price_x96: sqrt_price_start,
            tick: self.tick,
            fee_growth_global_x128: if zero_for_one {
                fee_growth_global_0
            } else {
                fee_growth_global_1
            },
            protocol_fee: 0,
            liquidity: self.liquidity,
        };
        let mut ticks_crossed = Vec::new();
        let mut filled_orders = Vec::new();

        while state.amount_specified_remaining != 0 && state.sqrt_price_x96 != sqrt_price_limit_x96 {
            let sqrt_price_step_start = state.sqrt_price_x96;

            if state.liquidity == 0
                && !self
                    .ticks
                    .has_initialized_tick_beyond(state.tick, tick_spacing, zero_for_one)
            {
                return err!(ErrorCode::InsufficientLiquidity);
            }

            let (tick_next, initialized) = self.ticks.next_initialized_tick_within_one_word(
                state.tick,
                tick_spacing,
                zero_for_one,
            );
            // The bitmap knows nothing of the tick bounds.
            let tick_next = tick_next.clamp(MIN_TICK, MAX_TICK);
            let sqrt_price_next = tick_math::get_sqrt_ratio_at_tick(tick_next)?;

            let sqrt_price_target = if zero_for_one {
                sqrt_price_next.max(sqrt_price_limit_x96)
            } else {
                sqrt_price_next.min(sqrt_price_limit_x96)
            };

            let step = compute_swap_step(
                state.sqrt_price_x96,
                sqrt_price_target,
                state.liquidity,
                state.amount_specified_remaining,
                fee_rate_bps,
            )?;
            state.sqrt_price_x96 = step.sqrt_ratio_next_x96;

            let amount_in = to_i128(step.amount_in)?;
            let amount_out = to_i128(step.amount_out)?;
            let amount_in_with_fee = amount_in
                .checked_add(to_i128(step.fee_amount)?)
                .ok_or(ErrorCode::MathOverflow)?;

            if exact_input {
                state.amount_specified_remaining = state
                    .amount_specified_remaining
                    .checked_sub(amount_in_with_fee)
                    .ok_or(ErrorCode::MathOverflow)?;
                state.amount_calculated = state
                    .amount_calculated
                    .checked_sub(amount_out)
                    .ok_or(ErrorCode::MathOverflow)?;
            } else {
                state.amount_specified_remaining = state
                    .amount_specified_remaining
                    .checked_add(amount_out)
                    .ok_or(ErrorCode::MathOverflow)?;
                state.amount_calculated = state
                    .amount_calculated
                    .checked_add(amount_in_with_fee)
                    .ok_or(ErrorCode::MathOverflow)?;
            }

            let mut lp_fee = step.fee_amount;
            if !protocol_fee_share.is_zero() {
                let protocol_cut = lp_fee * protocol_fee_share / U256::from(BPS_DENOMINATOR);
                lp_fee -= protocol_cut;
                state.protocol_fee = state
                    .protocol_fee
                    .checked_add(to_u128(protocol_cut)?)
                    .ok_or(ErrorCode::MathOverflow)?;
            }

            if state.liquidity > 0 {
                let growth = mul_div(lp_fee, Q128, U256::from(state.liquidity))?;
                state.fee_growth_global_x128 = state.fee_growth_global_x128.overflowing_add(growth).0;
            }

            if state.sqrt_price_x96 == sqrt_price_next {
                if initialized {
                    let (fee_growth_0, fee_growth_1) = if zero_for_one {
                        (state.fee_growth_global_x128, fee_growth_global_1)
                    } else {
                        (fee_growth_global_0, state.fee_growth_global_x128)
                    };

                    let mut liquidity_net = self.ticks.cross(tick_next, fee_growth_0, fee_growth_1);
                    // Moving leftward, the net is applied in reverse.
                    if zero_for_one {
                        liquidity_net = liquidity_net
                            .checked_neg()
                            .ok_or(ErrorCode::MathOverflow)?;
                    }
                    state.liquidity = add_delta(state.liquidity, liquidity_net)?;
                    state.tick = if zero_for_one { tick_next - 1 } else { tick_next };

                    msg!("Crossed tick {}, active liquidity {}", tick_next, state.liquidity);
                    ticks_crossed.push(tick_next);

                    if let Some(fill) = self.on_tick_crossed(
                        tick_next,
                        direction,
                        state.tick,
                        fee_growth_0,
                        fee_growth_1,
                    )? {
                        filled_orders.push(fill);
                    }
                } else {
                    state.tick = if zero_for_one { tick_next - 1 } else { tick_next };
                }
            } else if state.sqrt_price_x96 != sqrt_price_step_start {
                // Stopped inside the band: recompute the tick from the price.
                state.tick = tick_math::get_tick_at_sqrt_ratio(state.sqrt_price_x96)?;
            }
        }

        self.sqrt_price_x96 = state.sqrt_price_x96.into();
        self.tick = state.tick;
        self.liquidity = state.liquidity;
        if zero_for_one {
            self.fee_growth_global_0_x128 = state.fee_growth_global_x128.into();
            self.protocol_fees.token0 = self
                .protocol_fees
                .token0
                .checked_add(state.protocol_fee)
                .ok_or(ErrorCode::MathOverflow)?;
        } else {
            self.fee_growth_global_1_x128 = state.fee_growth_global_x128.into();
            self.protocol_fees.token1 = self
                .protocol_fees
                .token1
                .checked_add(state.protocol_fee)
                .ok_or(ErrorCode::MathOverflow)?;
        }

        let amount_swapped = amount_specified - state.amount_specified_remaining;
        let (amount0, amount1) = if zero_for_one == exact_input {
            (amount_swapped, state.amount_calculated)
        } else {
            (state.amount_calculated, amount_swapped)
        };

        Ok(SwapResult {
            amount0,
            amount1,
            sqrt_price_x96: state.sqrt_price_x96,
            tick: state.tick,
            liquidity: state.liquidity,
            ticks_crossed,
            filled_orders,
        })
    }
}
