#![allow(unexpected_cfgs)]

use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};
use constants::POOL_SEED;
use errors::ErrorCode;
use state::pool::Pool;
use state::swap::SwapDirection;
use u256_wrapper::U256Wrapper;

declare_id!("3ecHAkHk5nCQ8YHaVzGm3iEKbshijiBi6puJGQvFzMbu");

// Core math and pool state
pub mod config;
pub mod constants;
pub mod errors;
pub mod events;
pub mod ledger;
pub mod limit_order;
pub mod math;
pub mod position;
pub mod state;
pub mod swap_math;
pub mod tick;
pub mod tick_bitmap;
pub mod tick_math;
pub mod u256_wrapper;

// Instruction handlers and the SPL token ledger
pub mod instructions;

#[cfg(test)]
pub mod unit_test;


#[program]
pub mod limit_order_pool {
    use super::*;

    /// Initializes a new pool for a pair of tokens.
    ///
    /// # Arguments
    ///
    /// * `ctx` - The context containing all necessary accounts.
    /// * `initial_sqrt_price_x96` - The starting sqrt(price) in Q64.96.
    /// * `fee_rate_bps` - The swap fee in basis points (e.g., 30 for 0.3%).
    /// * `tick_spacing` - The spacing between usable ticks.
    /// * `protocol_fee_share_bps` - Share of swap fees set aside for the protocol.
    pub fn initialize_pool_handler(
        ctx: Context<InitializePool>,
        initial_sqrt_price_x96: U256Wrapper,
        fee_rate_bps: u16,
        tick_spacing: u16,
        protocol_fee_share_bps: u16,
    ) -> Result<()> {
        instructions::initialize_pool::handler(
            ctx,
            initial_sqrt_price_x96,
            fee_rate_bps,
            tick_spacing,
            protocol_fee_share_bps,
        )
    }

    /// Adds liquidity to the signer's position on `[tick_lower_index, tick_upper_index)`.
    pub fn mint_position_handler(
        ctx: Context<PoolInteraction>,
        tick_lower_index: i32,
        tick_upper_index: i32,
        liquidity: u128,
    ) -> Result<()> {
        instructions::mint_position::handler(ctx, tick_lower_index, tick_upper_index, liquidity)
    }

    pub fn burn_position_handler(
        ctx: Context<BurnPosition>,
        tick_lower_index: i32,
        tick_upper_index: i32,
        liquidity: u128,
    ) -> Result<()> {
        instructions::burn_position::handler(ctx, tick_lower_index, tick_upper_index, liquidity)
    }

    pub fn collect_position_handler(
        ctx: Context<PoolInteraction>,
        tick_lower_index: i32,
        tick_upper_index: i32,
        amount0_requested: u64,
        amount1_requested: u64,
    ) -> Result<()> {
        instructions::collect_position::handler(
            ctx,
            tick_lower_index,
            tick_upper_index,
            amount0_requested,
            amount1_requested,
        )
    }

    /// Swaps against the pool.
    ///
    /// # Arguments
    ///
    /// * `ctx` - The context containing all necessary accounts.
    /// * `direction` - Which token is sold.
    /// * `amount_specified` - Exact input if positive, exact output if negative.
    /// * `sqrt_price_limit_x96` - The price at which the swap stops.
    /// * `other_amount_threshold` - Minimum output (exact input) or maximum
    ///   input (exact output).
    pub fn swap_handler(
        ctx: Context<PoolInteraction>,
        direction: SwapDirection,
        amount_specified: i64,
        sqrt_price_limit_x96: U256Wrapper,
        other_amount_threshold: u64,
    ) -> Result<()> {
        instructions::swap::handler(
            ctx,
            direction,
            amount_specified,
            sqrt_price_limit_x96,
            other_amount_threshold,
        )
    }

    /// Places a limit order of `liquidity` on `[tick, tick + tick_spacing)`.
    pub fn create_limit_order_handler(
        ctx: Context<PoolInteraction>,
        tick: i32,
        liquidity: u128,
    ) -> Result<()> {
        instructions::create_limit_order::handler(ctx, tick, liquidity)
    }

    pub fn cancel_limit_order_handler(ctx: Context<PoolInteraction>, tick: i32) -> Result<()> {
        instructions::cancel_limit_order::handler(ctx, tick)
    }

    pub fn collect_limit_order_handler(ctx: Context<PoolInteraction>, tick: i32) -> Result<()> {
        instructions::collect_limit_order::handler(ctx, tick)
    }
}

#[derive(Accounts)]
pub struct InitializePool<'info> {
    #[account(
        init,
        payer = payer,
        seeds = [
            POOL_SEED,
            token0_mint.key().as_ref(),
            token1_mint.key().as_ref()
        ],
        bump,
        space = Pool::LEN
    )]
    pub pool: Account<'info, Pool>,

    pub token0_mint: Account<'info, Mint>,

    #[account(
        constraint = token0_mint.key() != token1_mint.key() @ ErrorCode::MintsMustDiffer,
        constraint = token0_mint.key() < token1_mint.key() @ ErrorCode::InvalidMintOrder
    )]
    pub token1_mint: Account<'info, Mint>,

    #[account(
        init,
        payer = payer,
        token::mint = token0_mint,
        token::authority = pool,
    )]
    pub token0_vault: Account<'info, TokenAccount>,

    #[account(
        init,
        payer = payer,
        token::mint = token1_mint,
        token::authority = pool,
    )]
    pub token1_vault: Account<'info, TokenAccount>,

    #[account(mut)]
    pub payer: Signer<'info>,

    pub system_program: Program<'info, System>,
    pub token_program: Program<'info, Token>,
    pub rent: Sysvar<'info, Rent>,
}

/// Accounts for every instruction that moves tokens between the signer and
/// the pool.
#[derive(Accounts)]
pub struct PoolInteraction<'info> {
    #[account(
        mut,
        seeds = [
            POOL_SEED,
            pool.token0_mint.as_ref(),
            pool.token1_mint.as_ref()
        ],
        bump = pool.bump
    )]
    pub pool: Account<'info, Pool>,

    #[account(
        mut,
        constraint = token0_vault.key() == pool.token0_vault @ ErrorCode::InvalidTokenVault
    )]
    pub token0_vault: Account<'info, TokenAccount>,

    #[account(
        mut,
        constraint = token1_vault.key() == pool.token1_vault @ ErrorCode::InvalidTokenVault
    )]
    pub token1_vault: Account<'info, TokenAccount>,

    #[account(
        mut,
        constraint = owner_token0.mint == pool.token0_mint @ ErrorCode::InvalidTokenAccount,
        constraint = owner_token0.owner == owner.key() @ ErrorCode::InvalidTokenAccount
    )]
    pub owner_token0: Account<'info, TokenAccount>,

    #[account(
        mut,
        constraint = owner_token1.mint == pool.token1_mint @ ErrorCode::InvalidTokenAccount,
        constraint = owner_token1.owner == owner.key() @ ErrorCode::InvalidTokenAccount
    )]
    pub owner_token1: Account<'info, TokenAccount>,

    pub owner: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

#[derive(Accounts)]
pub struct BurnPosition<'info> {
    #[account(
        mut,
        seeds = [
            POOL_SEED,
            pool.token0_mint.as_ref(),
            pool.token1_mint.as_ref()
        ],
        bump = pool.bump
    )]
    pub pool: Account<'info, Pool>,

    pub owner: Signer<'info>,
}
