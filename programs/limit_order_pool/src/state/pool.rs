use crate::config::PoolConfig;
use crate::constants::*;
use crate::errors::ErrorCode;
use crate::events::{Burn, Collect, Mint, PoolInitialized};
use crate::ledger::{Settlement, TokenLedger};
use crate::limit_order::{LimitOrder, LimitOrderBook};
use crate::math::{self, add_delta, to_u128};
use crate::position::{Position, PositionKey};
use crate::tick::{TickInfo, TickLedger};
use crate::tick_math;
use crate::u256_wrapper::U256Wrapper;
use anchor_lang::prelude::*;
use primitive_types::U256;
use std::collections::BTreeMap;

/// Fees set aside for the protocol, per token.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProtocolFees {
    pub token0: u128,
    pub token1: u128,
}

/// State of one trading pair: price, active liquidity, fee accumulators, every
/// initialized tick, every range position and every limit order.
///
/// Each mutating operation runs on a draft copy through [`Pool::transact`], so a
/// failed call leaves the pool exactly as it was.
#[account]
#[derive(Default, Debug, PartialEq)]
pub struct Pool {
    /// Bump seed for PDA.
    pub bump: u8,
    /// The mint address of the first token (token0).
    pub token0_mint: Pubkey,
    /// The mint address of the second token (token1).
    pub token1_mint: Pubkey,
    /// The vault holding token0 for this pool.
    pub token0_vault: Pubkey,
    /// The vault holding token1 for this pool.
    pub token1_vault: Pubkey,
    pub config: PoolConfig,
    /// The current square root of the price, sqrt(token1/token0) * 2^96.
    pub sqrt_price_x96: U256Wrapper,
    /// The current tick index, always `get_tick_at_sqrt_ratio(sqrt_price_x96)`
    /// except right after crossing a tick downward, where it is the crossed tick
    /// minus one.
    pub tick: i32,
    /// The total active liquidity within the current tick's price range.
    pub liquidity: u128,
    /// Fees earned per unit of liquidity over the life of the pool, Q128.128.
    pub fee_growth_global_0_x128: U256Wrapper,
    pub fee_growth_global_1_x128: U256Wrapper,
    pub protocol_fees: ProtocolFees,
    pub ticks: TickLedger,
    pub positions: BTreeMap<PositionKey, Position>,
    pub limit_orders: LimitOrderBook,
    pub initialized: bool,
    /// Non-zero while an operation is in progress.
    pub call_depth: u8,
}

/// Parameters for initializing a new pool.
#[derive(Clone, Debug)]
pub struct InitializePoolParams {
    pub bump: u8,
    pub token0_mint: Pubkey,
    pub token1_mint: Pubkey,
    pub token0_vault: Pubkey,
    pub token1_vault: Pubkey,
    pub initial_sqrt_price_x96: U256,
    pub config: PoolConfig,
}

/// Result of applying a liquidity delta to a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RangeChange {
    /// Token amounts owed to the pool (delta > 0, rounded up) or released by it
    /// (delta < 0, rounded down)
    pub amount0: u128,
    pub amount1: u128,
    pub fee_growth_inside_0_x128: U256,
    pub fee_growth_inside_1_x128: U256,
}

impl Pool {
    /// The size of the Pool account in bytes.
    pub const LEN: usize = POOL_ACCOUNT_SPACE;

    /// Initializes the state of a new pool.
    ///
    /// # Arguments
    /// * `params` - Mints, vaults, PDA bump, starting price and configuration.
    pub fn initialize(&mut self, params: InitializePoolParams) -> Result<()> {
        require!(!self.initialized, ErrorCode::PoolAlreadyInitialized);
        if params.token0_mint == params.token1_mint {
            return err!(ErrorCode::MintsMustDiffer);
        }
        require!(
            params.token0_mint < params.token1_mint,
            ErrorCode::InvalidMintOrder
        );
        params.config.validate()?;

        let tick = tick_math::get_tick_at_sqrt_ratio(params.initial_sqrt_price_x96)
            .map_err(|_| error!(ErrorCode::InvalidInitialPrice))?;

        self.bump = params.bump;
        self.token0_mint = params.token0_mint;
        self.token1_mint = params.token1_mint;
        self.token0_vault = params.token0_vault;
        self.token1_vault = params.token1_vault;
        self.config = params.config;
        self.sqrt_price_x96 = params.initial_sqrt_price_x96.into();
        self.tick = tick;
        self.liquidity = 0;
        self.fee_growth_global_0_x128 = U256Wrapper::ZERO;
        self.fee_growth_global_1_x128 = U256Wrapper::ZERO;
        self.protocol_fees = ProtocolFees::default();
        self.ticks = TickLedger::new();
        self.positions = BTreeMap::new();
        self.limit_orders = LimitOrderBook::new();
        self.call_depth = 0;
        self.initialized = true;

        msg!(
            "Pool initialized: tick {}, fee {} bps, spacing {}",
            tick,
            self.config.fee_rate_bps,
            self.config.tick_spacing
        );
        emit!(PoolInitialized {
            token0_mint: self.token0_mint,
            token1_mint: self.token1_mint,
            sqrt_price_x96: self.sqrt_price_x96,
            tick,
            fee_rate_bps: self.config.fee_rate_bps,
            tick_spacing: self.config.tick_spacing,
        });

        Ok(())
    }

    pub fn sqrt_price_x96(&self) -> U256 {
        self.sqrt_price_x96.value()
    }

    pub fn fee_growth_global_x128(&self) -> (U256, U256) {
        (
            self.fee_growth_global_0_x128.value(),
            self.fee_growth_global_1_x128.value(),
        )
    }

    pub fn tick_info(&self, tick: i32) -> Option<&TickInfo> {
        self.ticks.get(tick)
    }

    pub fn position(&self, owner: &Pubkey, tick_lower: i32, tick_upper: i32) -> Option<&Position> {
        self.positions
            .get(&PositionKey::new(*owner, tick_lower, tick_upper))
    }

    pub fn limit_order(&self, tick: i32) -> Option<&LimitOrder> {
        self.limit_orders.get(tick)
    }

    pub fn protocol_fees(&self) -> ProtocolFees {
        self.protocol_fees
    }

    /// Runs `op` against a draft of the pool and commits the draft only if `op`
    /// succeeds.
    ///
    /// Fails with `ReentrancyDetected` if another operation is still in progress
    /// on this pool.
    pub(crate) fn transact<T>(&mut self, op: impl FnOnce(&mut Pool) -> Result<T>) -> Result<T> {
        require!(self.call_depth == 0, ErrorCode::ReentrancyDetected);
        require!(self.initialized, ErrorCode::PoolNotInitialized);

        let mut draft = self.clone();
        draft.call_depth = 1;
        let output = op(&mut draft)?;
        draft.call_depth = 0;

        *self = draft;
        Ok(output)
    }

    /// Validates a range against the pool's spacing and usable tick range.
    pub(crate) fn check_ticks(&self, tick_lower: i32, tick_upper: i32) -> Result<()> {
        require!(tick_lower < tick_upper, ErrorCode::InvalidTickRange);
        require!(
            tick_lower >= self.config.min_tick && tick_upper <= self.config.max_tick,
            ErrorCode::InvalidTickRange
        );
        require!(
            self.config.is_aligned(tick_lower) && self.config.is_aligned(tick_upper),
            ErrorCode::TickNotAligned
        );
        Ok(())
    }

    /// Applies `liquidity_delta` to the range `[tick_lower, tick_upper)`.
    ///
    /// Updates both boundary ticks (clearing any that become uninitialized),
    /// adjusts the active liquidity if the range contains the current tick, and
    /// returns the token amounts the change is worth together with the fee
    /// growth inside the range.
    pub(crate) fn modify_range(
        &mut self,
        tick_lower: i32,
        tick_upper: i32,
        liquidity_delta: i128,
    ) -> Result<RangeChange> {
        let (fee_growth_global_0, fee_growth_global_1) = self.fee_growth_global_x128();
        let tick_current = self.tick;
        let max_liquidity = self.config.max_liquidity_per_tick();
        let tick_spacing = self.config.tick_spacing;

        let mut flipped_lower = false;
        let mut flipped_upper = false;
        if liquidity_delta != 0 {
            flipped_lower = self.ticks.update(
                tick_lower,
                tick_current,
                liquidity_delta,
                fee_growth_global_0,
                fee_growth_global_1,
                false,
                max_liquidity,
                tick_spacing,
            )?;
            flipped_upper = self.ticks.update(
                tick_upper,
                tick_current,
                liquidity_delta,
                fee_growth_global_0,
                fee_growth_global_1,
                true,
                max_liquidity,
                tick_spacing,
            )?;
        }

        let (fee_growth_inside_0_x128, fee_growth_inside_1_x128) = self.ticks.fee_growth_inside(
            tick_lower,
            tick_upper,
            tick_current,
            fee_growth_global_0,
            fee_growth_global_1,
        );

        if liquidity_delta < 0 {
            if flipped_lower {
                self.ticks.clear(tick_lower);
            }
            if flipped_upper {
                self.ticks.clear(tick_upper);
            }
        }

        let round_up = liquidity_delta > 0;
        let liquidity = liquidity_delta.unsigned_abs();
        let sqrt_lower = tick_math::get_sqrt_ratio_at_tick(tick_lower)?;
        let sqrt_upper = tick_math::get_sqrt_ratio_at_tick(tick_upper)?;
        let sqrt_price = self.sqrt_price_x96();

        let (amount0, amount1) = if tick_current < tick_lower {
            // Range is above the price: all token0.
            (
                math::get_amount_0_delta(sqrt_lower, sqrt_upper, liquidity, round_up)?,
                U256::zero(),
            )
        } else if tick_current < tick_upper {
            self.liquidity = add_delta(self.liquidity, liquidity_delta)?;
            (
                math::get_amount_0_delta(sqrt_price, sqrt_upper, liquidity, round_up)?,
                math::get_amount_1_delta(sqrt_lower, sqrt_price, liquidity, round_up)?,
            )
        } else {
            // Range is below the price: all token1.
            (
                U256::zero(),
                math::get_amount_1_delta(sqrt_lower, sqrt_upper, liquidity, round_up)?,
            )
        };

        Ok(RangeChange {
            amount0: to_u128(amount0)?,
            amount1: to_u128(amount1)?,
            fee_growth_inside_0_x128,
            fee_growth_inside_1_x128,
        })
    }

    /// Adds liquidity to a range position owned by `owner` and debits the
    /// token amounts it requires.
    ///
    /// # Returns
    /// * `Result<(u128, u128)>` - The token0 and token1 amounts paid in.
    pub fn mint(
        &mut self,
        owner: &Pubkey,
        tick_lower: i32,
        tick_upper: i32,
        liquidity: u128,
        ledger: &mut dyn TokenLedger,
    ) -> Result<(u128, u128)> {
        let (amount0, amount1) = self.transact(|pool| {
            pool.check_ticks(tick_lower, tick_upper)?;
            require!(liquidity > 0, ErrorCode::ZeroLiquidity);
            let delta = i128::try_from(liquidity).map_err(|_| error!(ErrorCode::MathOverflow))?;

            let change = pool.modify_range(tick_lower, tick_upper, delta)?;
            pool.positions
                .entry(PositionKey::new(*owner, tick_lower, tick_upper))
                .or_default()
                .update(
                    delta,
                    change.fee_growth_inside_0_x128,
                    change.fee_growth_inside_1_x128,
                )?;

            ledger.settle(
                owner,
                &Settlement {
                    debit_0: change.amount0,
                    debit_1: change.amount1,
                    ..Settlement::default()
                },
            )?;
            Ok((change.amount0, change.amount1))
        })?;

        emit!(Mint {
            owner: *owner,
            tick_lower,
            tick_upper,
            liquidity,
            amount0,
            amount1,
        });
        Ok((amount0, amount1))
    }

    /// Removes liquidity from a range position.
    ///
    /// Nothing is transferred: the released amounts and the fees earned so far
    /// are added to the position's owed tokens, to be taken with
    /// [`Pool::collect`]. Burning zero liquidity only settles fees.
    pub fn burn(
        &mut self,
        owner: &Pubkey,
        tick_lower: i32,
        tick_upper: i32,
        liquidity: u128,
    ) -> Result<(u128, u128)> {
        let (amount0, amount1) = self.transact(|pool| {
            pool.check_ticks(tick_lower, tick_upper)?;
            let key = PositionKey::new(*owner, tick_lower, tick_upper);
            let mut position = *pool
                .positions
                .get(&key)
                .ok_or(ErrorCode::PositionNotFound)?;
            require!(
                position.liquidity >= liquidity,
                ErrorCode::PositionLiquidityTooLow
            );
            let delta = i128::try_from(liquidity).map_err(|_| error!(ErrorCode::MathOverflow))?;

            let change = pool.modify_range(tick_lower, tick_upper, -delta)?;
            position.update(
                -delta,
                change.fee_growth_inside_0_x128,
                change.fee_growth_inside_1_x128,
            )?;
            position.tokens_owed_0 = position
                .tokens_owed_0
                .checked_add(change.amount0)
                .ok_or(ErrorCode::MathOverflow)?;
            position.tokens_owed_1 = position
                .tokens_owed_1
                .checked_add(change.amount1)
                .ok_or(ErrorCode::MathOverflow)?;
            pool.positions.insert(key, position);

            Ok((change.amount0, change.amount1))
        })?;

        emit!(Burn {
            owner: *owner,
            tick_lower,
            tick_upper,
            liquidity,
            amount0,
            amount1,
        });
        Ok((amount0, amount1))
    }

    /// Pays out up to the requested amounts of a position's owed tokens.
    ///
    /// A fully drained position with no liquidity left is removed.
    pub fn collect(
        &mut self,
        owner: &Pubkey,
        tick_lower: i32,
        tick_upper: i32,
        amount0_requested: u128,
        amount1_requested: u128,
        ledger: &mut dyn TokenLedger,
    ) -> Result<(u128, u128)> {
        let (amount0, amount1) = self.transact(|pool| {
            let key = PositionKey::new(*owner, tick_lower, tick_upper);
            let position = pool
                .positions
                .get_mut(&key)
                .ok_or(ErrorCode::PositionNotFound)?;

            let amount0 = amount0_requested.min(position.tokens_owed_0);
            let amount1 = amount1_requested.min(position.tokens_owed_1);
            position.tokens_owed_0 -= amount0;
            position.tokens_owed_1 -= amount1;
            if position.is_empty() {
                pool.positions.remove(&key);
            }

            ledger.settle(
                owner,
                &Settlement {
                    credit_0: amount0,
                    credit_1: amount1,
                    ..Settlement::default()
                },
            )?;
            Ok((amount0, amount1))
        })?;

        emit!(Collect {
            owner: *owner,
            tick_lower,
            tick_upper,
            amount0,
            amount1,
        });
        Ok((amount0, amount1))
    }
}
