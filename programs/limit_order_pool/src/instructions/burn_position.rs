use anchor_lang::prelude::*;

use crate::BurnPosition;

/// Removes liquidity from a position. The released tokens stay in the pool as
/// owed amounts until `collect_position` is called.
pub fn handler(
    ctx: Context<BurnPosition>,
    tick_lower_index: i32,
    tick_upper_index: i32,
    liquidity: u128,
) -> Result<()> {
    let owner = ctx.accounts.owner.key();
    let (amount0, amount1) =
        ctx.accounts
            .pool
            .burn(&owner, tick_lower_index, tick_upper_index, liquidity)?;
    msg!(
        "Burned {} liquidity on [{}, {}): owed {} token0, {} token1",
        liquidity,
        tick_lower_index,
        tick_upper_index,
        amount0,
        amount1
    );
    Ok(())
}
