//! Unit tests for the pool program.
//!
//! Shared fixtures live here; each component has its own test file.

use crate::config::{FeeTier, PoolConfig};
use crate::constants::Q96;
use crate::ledger::{Asset, InMemoryTokenLedger};
use crate::state::pool::{InitializePoolParams, Pool};
use anchor_lang::prelude::*;
use primitive_types::U256;

pub mod limit_order_test;
pub mod swap_math_test;

/// Funds every test account with this much of both tokens.
pub(crate) const FUNDING: u128 = 1_000_000_000_000_000_000_000_000;

/// Initialization parameters with fresh mints in ascending order.
pub(crate) fn pool_params(config: PoolConfig, initial_sqrt_price_x96: U256) -> InitializePoolParams {
    let (a, b) = (Pubkey::new_unique(), Pubkey::new_unique());
    InitializePoolParams {
        bump: 254,
        token0_mint: a.min(b),
        token1_mint: a.max(b),
        token0_vault: Pubkey::new_unique(),
        token1_vault: Pubkey::new_unique(),
        initial_sqrt_price_x96,
        config,
    }
}

/// A pool at price 1.0 (tick 0) with the given fee tier.
pub(crate) fn create_pool(tier: FeeTier) -> Pool {
    let mut pool = Pool::default();
    pool.initialize(pool_params(PoolConfig::from_fee_tier(tier), Q96))
        .unwrap();
    pool
}

/// A ledger where each of `accounts` holds [`FUNDING`] of both tokens.
pub(crate) fn funded_ledger(accounts: &[Pubkey]) -> InMemoryTokenLedger {
    let mut ledger = InMemoryTokenLedger::new();
    for account in accounts {
        ledger.fund(account, Asset::Token0, FUNDING).unwrap();
        ledger.fund(account, Asset::Token1, FUNDING).unwrap();
    }
    ledger
}

/// Full-range bounds for a spacing, rounded toward zero.
pub(crate) fn full_range(tick_spacing: u16) -> (i32, i32) {
    let config = PoolConfig::new(0, tick_spacing).unwrap();
    (config.min_tick, config.max_tick)
}
