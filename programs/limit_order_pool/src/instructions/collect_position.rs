use anchor_lang::prelude::*;

use crate::instructions::SplTokenLedger;
use crate::PoolInteraction;

pub fn handler(
    ctx: Context<PoolInteraction>,
    tick_lower_index: i32,
    tick_upper_index: i32,
    amount0_requested: u64,
    amount1_requested: u64,
) -> Result<()> {
    let mut ledger = SplTokenLedger::new(ctx.accounts);
    let owner = ctx.accounts.owner.key();

    ctx.accounts.pool.collect(
        &owner,
        tick_lower_index,
        tick_upper_index,
        amount0_requested as u128,
        amount1_requested as u128,
        &mut ledger,
    )?;
    Ok(())
}
