use anchor_lang::prelude::*;

use crate::errors::ErrorCode;
use crate::instructions::SplTokenLedger;
use crate::state::swap::SwapDirection;
use crate::u256_wrapper::U256Wrapper;
use crate::PoolInteraction;

/// Swaps through the pool, settling against the signer's token accounts.
///
/// # Parameters
/// * `direction` - Which token is sold
/// * `amount_specified` - Exact input if positive, exact output if negative
/// * `sqrt_price_limit_x96` - Price at which the swap stops
/// * `other_amount_threshold` - Minimum output for exact input, maximum input
///   for exact output
pub fn handler(
    ctx: Context<PoolInteraction>,
    direction: SwapDirection,
    amount_specified: i64,
    sqrt_price_limit_x96: U256Wrapper,
    other_amount_threshold: u64,
) -> Result<()> {
    let mut ledger = SplTokenLedger::new(ctx.accounts);
    let swapper = ctx.accounts.owner.key();

    let result = ctx.accounts.pool.swap(
        &swapper,
        direction,
        amount_specified as i128,
        sqrt_price_limit_x96.value(),
        &mut ledger,
    )?;

    let (amount_in, amount_out) = match direction {
        SwapDirection::ZeroForOne => (result.amount0, result.amount1),
        SwapDirection::OneForZero => (result.amount1, result.amount0),
    };
    if amount_specified > 0 {
        require!(
            amount_out.unsigned_abs() >= other_amount_threshold as u128,
            ErrorCode::SlippageExceeded
        );
    } else {
        require!(
            amount_in.unsigned_abs() <= other_amount_threshold as u128,
            ErrorCode::SlippageExceeded
        );
    }

    msg!(
        "Swapped {} in for {} out, tick now {}",
        amount_in,
        amount_out.unsigned_abs(),
        result.tick
    );
    Ok(())
}
