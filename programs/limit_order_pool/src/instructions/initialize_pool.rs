/// Initialize Pool Instruction Module
///
/// Creates the pool PDA for a token pair together with its two vaults and sets
/// the starting price. The pool starts with no liquidity, no positions and no
/// limit orders.
use crate::config::PoolConfig;
use crate::state::pool::InitializePoolParams;
use crate::u256_wrapper::U256Wrapper;
use crate::InitializePool;
use anchor_lang::prelude::*;

/// Handler function for initializing a new pool
///
/// # Parameters
/// * `ctx` - The context containing all accounts involved in the operation
/// * `initial_sqrt_price_x96` - The starting sqrt price in Q64.96
/// * `fee_rate_bps` - Swap fee in basis points
/// * `tick_spacing` - Spacing every range boundary must be aligned to
/// * `protocol_fee_share_bps` - Share of swap fees kept by the protocol
///
/// # Errors
/// * `ErrorCode::MintsMustDiffer` - If both token mints are the same
/// * `ErrorCode::InvalidMintOrder` - If `token0_mint` does not sort before `token1_mint`
/// * `ErrorCode::InvalidInitialPrice` - If the price is outside the representable range
/// * `ErrorCode::InvalidFeeRate` / `ErrorCode::InvalidTickSpacing` - On a bad configuration
pub fn handler(
    ctx: Context<InitializePool>,
    initial_sqrt_price_x96: U256Wrapper,
    fee_rate_bps: u16,
    tick_spacing: u16,
    protocol_fee_share_bps: u16,
) -> Result<()> {
    let config = PoolConfig::new(fee_rate_bps, tick_spacing)?
        .with_protocol_fee_share(protocol_fee_share_bps)?;

    let params = InitializePoolParams {
        bump: ctx.bumps.pool,
        token0_mint: ctx.accounts.token0_mint.key(),
        token1_mint: ctx.accounts.token1_mint.key(),
        token0_vault: ctx.accounts.token0_vault.key(),
        token1_vault: ctx.accounts.token1_vault.key(),
        initial_sqrt_price_x96: initial_sqrt_price_x96.value(),
        config,
    };

    ctx.accounts.pool.initialize(params)
}
