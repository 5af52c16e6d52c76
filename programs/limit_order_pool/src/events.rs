use anchor_lang::prelude::*;

use crate::ledger::Asset;
use crate::u256_wrapper::U256Wrapper;

#[event]
pub struct PoolInitialized {
    pub token0_mint: Pubkey,
    pub token1_mint: Pubkey,
    pub sqrt_price_x96: U256Wrapper,
    pub tick: i32,
    pub fee_rate_bps: u16,
    pub tick_spacing: u16,
}

#[event]
pub struct Mint {
    pub owner: Pubkey,
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub liquidity: u128,
    pub amount0: u128,
    pub amount1: u128,
}

#[event]
pub struct Burn {
    pub owner: Pubkey,
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub liquidity: u128,
    pub amount0: u128,
    pub amount1: u128,
}

#[event]
pub struct Collect {
    pub owner: Pubkey,
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub amount0: u128,
    pub amount1: u128,
}

/// Signed pool deltas: positive amounts flowed into the pool.
#[event]
pub struct Swap {
    pub sender: Pubkey,
    pub amount0: i128,
    pub amount1: i128,
    pub sqrt_price_x96: U256Wrapper,
    pub liquidity: u128,
    pub tick: i32,
}

#[event]
pub struct LimitOrderCreated {
    pub owner: Pubkey,
    pub tick: i32,
    pub liquidity: u128,
    pub asset: Asset,
    pub amount: u128,
}

#[event]
pub struct LimitOrderFilled {
    pub owner: Pubkey,
    pub tick: i32,
    pub liquidity: u128,
    /// The asset the order was converted into
    pub asset: Asset,
    pub amount: u128,
}

#[event]
pub struct LimitOrderCanceled {
    pub owner: Pubkey,
    pub tick: i32,
    pub amount0: u128,
    pub amount1: u128,
}

#[event]
pub struct LimitOrderCollected {
    pub owner: Pubkey,
    pub tick: i32,
    pub amount0: u128,
    pub amount1: u128,
}
