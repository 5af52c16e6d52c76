/// Per-tick liquidity and fee bookkeeping.
///
/// A tick is initialized while at least one position (or limit order) uses it as
/// a boundary. For every initialized tick the ledger stores the gross liquidity
/// referencing it, the net liquidity that becomes active when the price crosses
/// it upward, and the fee growth that happened on the far side of it. The
/// "outside" side flips every time the tick is crossed.
use anchor_lang::prelude::*;
use primitive_types::U256;
use std::collections::BTreeMap;

use crate::errors::ErrorCode;
use crate::math::add_delta;
use crate::tick_bitmap::TickBitmap;
use crate::u256_wrapper::U256Wrapper;

/// Represents the state of an initialized tick.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, AnchorSerialize, AnchorDeserialize)]
pub struct TickInfo {
    /// Total liquidity of all ranges that use this tick as a boundary
    pub liquidity_gross: u128,
    /// Liquidity added to the active total when crossing upward (subtracted
    /// when crossing downward)
    pub liquidity_net: i128,
    /// Fee growth per unit of liquidity on the side of this tick away from the
    /// current price, in Q128.128
    pub fee_growth_outside_0_x128: U256Wrapper,
    pub fee_growth_outside_1_x128: U256Wrapper,
}

impl TickInfo {
    /// Updates the tick's liquidity values when a range referencing this tick changes.
    ///
    /// # Arguments
    ///
    /// * `tick` - This tick's index.
    /// * `tick_current` - The pool's current tick.
    /// * `liquidity_delta` - Liquidity added (positive) or removed (negative).
    /// * `fee_growth_global_0_x128` / `fee_growth_global_1_x128` - Current global
    ///   fee growth, used to seed the outside values when the tick is initialized.
    /// * `upper` - True if this tick is the upper boundary of the range.
    /// * `max_liquidity` - Cap on the gross liquidity referencing one tick.
    ///
    /// # Returns
    ///
    /// * `Result<bool>` - Whether the tick flipped between initialized and
    ///   uninitialized.
    #[allow(clippy::too_many_arguments)]
    pub fn update(
        &mut self,
        tick: i32,
        tick_current: i32,
        liquidity_delta: i128,
        fee_growth_global_0_x128: U256,
        fee_growth_global_1_x128: U256,
        upper: bool,
        max_liquidity: u128,
    ) -> Result<bool> {
        let liquidity_gross_before = self.liquidity_gross;
        let liquidity_gross_after = add_delta(liquidity_gross_before, liquidity_delta)?;

        require!(
            liquidity_gross_after <= max_liquidity,
            ErrorCode::TickLiquidityOverflow
        );

        let flipped = (liquidity_gross_after == 0) != (liquidity_gross_before == 0);

        if liquidity_gross_before == 0 {
            // By convention all growth before initialization happened below the tick.
            if tick <= tick_current {
                self.fee_growth_outside_0_x128 = fee_growth_global_0_x128.into();
                self.fee_growth_outside_1_x128 = fee_growth_global_1_x128.into();
            }
        }

        self.liquidity_gross = liquidity_gross_after;

        self.liquidity_net = if upper {
            self.liquidity_net.checked_sub(liquidity_delta)
        } else {
            self.liquidity_net.checked_add(liquidity_delta)
        }
        .ok_or_else(|| error!(ErrorCode::MathOverflow))?;

        Ok(flipped)
    }

    /// Flips the outside fee growth when the price crosses this tick and
    /// returns the tick's net liquidity.
    pub fn cross(&mut self, fee_growth_global_0_x128: U256, fee_growth_global_1_x128: U256) -> i128 {
        self.fee_growth_outside_0_x128 = fee_growth_global_0_x128
            .overflowing_sub(self.fee_growth_outside_0_x128.value())
            .0
            .into();
        self.fee_growth_outside_1_x128 = fee_growth_global_1_x128
            .overflowing_sub(self.fee_growth_outside_1_x128.value())
            .0
            .into();
        self.liquidity_net
    }
}

/// All initialized ticks of a pool together with the bitmap that indexes them.
#[derive(Debug, Default, Clone, PartialEq, Eq, AnchorSerialize, AnchorDeserialize)]
pub struct TickLedger {
    ticks: BTreeMap<i32, TickInfo>,
    bitmap: TickBitmap,
}

impl TickLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, tick: i32) -> Option<&TickInfo> {
        self.ticks.get(&tick)
    }

    pub fn is_initialized(&self, tick: i32) -> bool {
        self.ticks.contains_key(&tick)
    }

    /// Iterates over initialized ticks in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (&i32, &TickInfo)> {
        self.ticks.iter()
    }

    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    pub fn bitmap(&self) -> &TickBitmap {
        &self.bitmap
    }

    /// Applies a liquidity change to one boundary tick and keeps the bitmap in
    /// sync. A tick whose gross liquidity drops to zero stays in the map until
    /// [`TickLedger::clear`] is called, so that fee growth inside the range can
    /// still be read after the update.
    ///
    /// Returns whether the tick flipped.
    #[allow(clippy::too_many_arguments)]
    pub fn update(
        &mut self,
        tick: i32,
        tick_current: i32,
        liquidity_delta: i128,
        fee_growth_global_0_x128: U256,
        fee_growth_global_1_x128: U256,
        upper: bool,
        max_liquidity: u128,
        tick_spacing: u16,
    ) -> Result<bool> {
        let mut info = self.ticks.get(&tick).copied().unwrap_or_default();
        let flipped = info.update(
            tick,
            tick_current,
            liquidity_delta,
            fee_growth_global_0_x128,
            fee_growth_global_1_x128,
            upper,
            max_liquidity,
        )?;

        if flipped {
            self.bitmap.flip_tick(tick, tick_spacing)?;
        }
        if flipped || info.liquidity_gross > 0 {
            self.ticks.insert(tick, info);
        }

        Ok(flipped)
    }

    /// Removes an uninitialized tick's data.
    pub fn clear(&mut self, tick: i32) {
        if let Some(info) = self.ticks.get(&tick) {
            if info.liquidity_gross == 0 {
                self.ticks.remove(&tick);
            }
        }
    }

    /// Crosses an initialized tick and returns its net liquidity; crossing an
    /// uninitialized tick is a no-op returning zero.
    pub fn cross(
        &mut self,
        tick: i32,
        fee_growth_global_0_x128: U256,
        fee_growth_global_1_x128: U256,
    ) -> i128 {
        match self.ticks.get_mut(&tick) {
            Some(info) => info.cross(fee_growth_global_0_x128, fee_growth_global_1_x128),
            None => 0,
        }
    }

    /// Fee growth per unit of liquidity inside `[tick_lower, tick_upper)`
    ///
    /// inside = global - below(lower) - above(upper), all modulo 2^256. The value
    /// is only meaningful as a difference between two readings.
    ///
    /// # Returns
    ///
    /// * `(U256, U256)` - Fee growth inside for token 0 and token 1.
    pub fn fee_growth_inside(
        &self,
        tick_lower: i32,
        tick_upper: i32,
        tick_current: i32,
        fee_growth_global_0_x128: U256,
        fee_growth_global_1_x128: U256,
    ) -> (U256, U256) {
        let lower = self.ticks.get(&tick_lower).copied().unwrap_or_default();
        let upper = self.ticks.get(&tick_upper).copied().unwrap_or_default();

        let below = |outside: U256, global: U256| {
            if tick_current >= tick_lower {
                outside
            } else {
                global.overflowing_sub(outside).0
            }
        };
        let above = |outside: U256, global: U256| {
            if tick_current < tick_upper {
                outside
            } else {
                global.overflowing_sub(outside).0
            }
        };

        let inside = |global: U256, lower_outside: U256, upper_outside: U256| {
            global
                .overflowing_sub(below(lower_outside, global))
                .0
                .overflowing_sub(above(upper_outside, global))
                .0
        };

        (
            inside(
                fee_growth_global_0_x128,
                lower.fee_growth_outside_0_x128.value(),
                upper.fee_growth_outside_0_x128.value(),
            ),
            inside(
                fee_growth_global_1_x128,
                lower.fee_growth_outside_1_x128.value(),
                upper.fee_growth_outside_1_x128.value(),
            ),
        )
    }

    pub fn next_initialized_tick_within_one_word(
        &self,
        tick: i32,
        tick_spacing: u16,
        lte: bool,
    ) -> (i32, bool) {
        self.bitmap
            .next_initialized_tick_within_one_word(tick, tick_spacing, lte)
    }

    /// Whether any initialized tick remains at or below (`lte`) or above `tick`.
    pub fn has_initialized_tick_beyond(&self, tick: i32, tick_spacing: u16, lte: bool) -> bool {
        self.bitmap
            .next_initialized_tick(tick, tick_spacing, lte)
            .is_some()
    }

    /// Sum of net liquidity over all initialized ticks; zero whenever every
    /// range has both boundaries registered.
    pub fn liquidity_net_sum(&self) -> Result<i128> {
        self.ticks.values().try_fold(0i128, |sum, info| {
            sum.checked_add(info.liquidity_net)
                .ok_or_else(|| error!(ErrorCode::MathOverflow))
        })
    }
}
