/// Pool configuration.
///
/// Fixed at initialization: the fee rate charged on swap input, the tick spacing
/// that every range boundary must be aligned to, the share of fees diverted to
/// the protocol and the usable tick range derived from the spacing.
use anchor_lang::prelude::*;

use crate::constants::*;
use crate::errors::ErrorCode;

/// Standard fee tiers.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeeTier {
    /// 0.05%, spacing 10
    Low,
    /// 0.30%, spacing 60
    Medium,
    /// 1.00%, spacing 200
    High,
}

impl FeeTier {
    pub fn fee_rate_bps(self) -> u16 {
        match self {
            FeeTier::Low => FEE_TIER_LOW,
            FeeTier::Medium => FEE_TIER_MEDIUM,
            FeeTier::High => FEE_TIER_HIGH,
        }
    }

    pub fn tick_spacing(self) -> u16 {
        match self {
            FeeTier::Low => TICK_SPACING_LOW,
            FeeTier::Medium => TICK_SPACING_MEDIUM,
            FeeTier::High => TICK_SPACING_HIGH,
        }
    }
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoolConfig {
    pub tick_spacing: u16,
    /// Fee charged on swap input, in basis points
    pub fee_rate_bps: u16,
    /// Share of each swap fee kept by the protocol, in basis points of the fee
    pub protocol_fee_share_bps: u16,
    /// Lowest usable tick: MIN_TICK rounded toward zero to the spacing
    pub min_tick: i32,
    /// Highest usable tick: MAX_TICK rounded toward zero to the spacing
    pub max_tick: i32,
}

impl PoolConfig {
    /// Builds a configuration for an arbitrary fee rate and spacing.
    pub fn new(fee_rate_bps: u16, tick_spacing: u16) -> Result<Self> {
        require!(tick_spacing > 0, ErrorCode::InvalidTickSpacing);

        let spacing = tick_spacing as i32;
        let config = Self {
            tick_spacing,
            fee_rate_bps,
            protocol_fee_share_bps: 0,
            min_tick: (MIN_TICK / spacing) * spacing,
            max_tick: (MAX_TICK / spacing) * spacing,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_fee_tier(tier: FeeTier) -> Self {
        let spacing = tier.tick_spacing() as i32;
        Self {
            tick_spacing: tier.tick_spacing(),
            fee_rate_bps: tier.fee_rate_bps(),
            protocol_fee_share_bps: 0,
            min_tick: (MIN_TICK / spacing) * spacing,
            max_tick: (MAX_TICK / spacing) * spacing,
        }
    }

    pub fn with_protocol_fee_share(mut self, protocol_fee_share_bps: u16) -> Result<Self> {
        self.protocol_fee_share_bps = protocol_fee_share_bps;
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        require!(self.tick_spacing > 0, ErrorCode::InvalidTickSpacing);
        require!(
            (self.fee_rate_bps as u128) < BPS_DENOMINATOR,
            ErrorCode::InvalidFeeRate
        );
        require!(
            self.protocol_fee_share_bps <= MAX_PROTOCOL_FEE_SHARE_BPS,
            ErrorCode::InvalidFeeRate
        );
        require!(
            self.min_tick >= MIN_TICK
                && self.max_tick <= MAX_TICK
                && self.min_tick < self.max_tick,
            ErrorCode::InvalidTickRange
        );
        require!(
            self.is_aligned(self.min_tick) && self.is_aligned(self.max_tick),
            ErrorCode::TickNotAligned
        );
        Ok(())
    }

    pub fn is_aligned(&self, tick: i32) -> bool {
        tick % self.tick_spacing as i32 == 0
    }

    /// Cap on the gross liquidity referencing a single tick.
    ///
    /// Chosen so that even if every usable tick held the cap, the active
    /// liquidity would still fit in a `u128`.
    pub fn max_liquidity_per_tick(&self) -> u128 {
        let spacing = self.tick_spacing as i32;
        let num_ticks = ((self.max_tick - self.min_tick) / spacing) as u128 + 1;
        u128::MAX / num_ticks
    }
}
