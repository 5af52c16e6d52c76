/// Defines the state for a liquidity provider's range position.
///
/// A position is identified by its owner and tick boundaries. Besides its
/// liquidity it remembers the fee growth inside its range at the last time it was
/// touched, so fees earned since then can be credited to `tokens_owed_*` on the
/// next update.
use anchor_lang::prelude::*;
use primitive_types::U256;

use crate::errors::ErrorCode;
use crate::math::{add_delta, fees_earned};
use crate::u256_wrapper::U256Wrapper;

#[derive(
    AnchorSerialize,
    AnchorDeserialize,
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
)]
pub struct PositionKey {
    pub owner: Pubkey,
    pub tick_lower: i32,
    pub tick_upper: i32,
}

impl PositionKey {
    pub fn new(owner: Pubkey, tick_lower: i32, tick_upper: i32) -> Self {
        Self {
            owner,
            tick_lower,
            tick_upper,
        }
    }
}

/// Represents the state of a range position.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Position {
    /// The amount of liquidity provided by this position.
    pub liquidity: u128,
    /// Fee growth inside the range as of the last update, in Q128.128
    pub fee_growth_inside_0_last_x128: U256Wrapper,
    pub fee_growth_inside_1_last_x128: U256Wrapper,
    /// Tokens owed to the owner from burned liquidity and accrued fees
    pub tokens_owed_0: u128,
    pub tokens_owed_1: u128,
}

impl Position {
    /// Credits fees accrued since the last update and applies a liquidity change.
    ///
    /// # Arguments
    /// * `liquidity_delta` - Liquidity added or removed; zero just accrues fees.
    /// * `fee_growth_inside_0_x128` / `fee_growth_inside_1_x128` - Current fee
    ///   growth inside the position's range.
    pub fn update(
        &mut self,
        liquidity_delta: i128,
        fee_growth_inside_0_x128: U256,
        fee_growth_inside_1_x128: U256,
    ) -> Result<()> {
        if liquidity_delta == 0 {
            // Poking an empty position is meaningless.
            require!(self.liquidity > 0, ErrorCode::ZeroLiquidity);
        }
        let liquidity_next = add_delta(self.liquidity, liquidity_delta)
            .map_err(|_| error!(ErrorCode::PositionLiquidityTooLow))?;

        let owed_0 = fees_earned(
            self.liquidity,
            fee_growth_inside_0_x128,
            self.fee_growth_inside_0_last_x128.value(),
        )?;
        let owed_1 = fees_earned(
            self.liquidity,
            fee_growth_inside_1_x128,
            self.fee_growth_inside_1_last_x128.value(),
        )?;

        self.liquidity = liquidity_next;
        self.fee_growth_inside_0_last_x128 = fee_growth_inside_0_x128.into();
        self.fee_growth_inside_1_last_x128 = fee_growth_inside_1_x128.into();

        // Owed amounts are collected long before they could overflow.
        self.tokens_owed_0 = self.tokens_owed_0.wrapping_add(owed_0);
        self.tokens_owed_1 = self.tokens_owed_1.wrapping_add(owed_1);

        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.liquidity == 0 && self.tokens_owed_0 == 0 && self.tokens_owed_1 == 0
    }
}
