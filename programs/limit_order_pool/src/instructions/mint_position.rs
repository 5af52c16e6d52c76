use anchor_lang::prelude::*;

use crate::instructions::SplTokenLedger;
use crate::PoolInteraction;

pub fn handler(
    ctx: Context<PoolInteraction>,
    tick_lower_index: i32,
    tick_upper_index: i32,
    liquidity: u128,
) -> Result<()> {
    let mut ledger = SplTokenLedger::new(ctx.accounts);
    let owner = ctx.accounts.owner.key();

    let (amount0, amount1) = ctx.accounts.pool.mint(
        &owner,
        tick_lower_index,
        tick_upper_index,
        liquidity,
        &mut ledger,
    )?;
    msg!(
        "Minted {} liquidity on [{}, {}): paid {} token0, {} token1",
        liquidity,
        tick_lower_index,
        tick_upper_index,
        amount0,
        amount1
    );
    Ok(())
}
