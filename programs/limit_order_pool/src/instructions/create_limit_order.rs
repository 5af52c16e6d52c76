use anchor_lang::prelude::*;

use crate::instructions::SplTokenLedger;
use crate::PoolInteraction;

/// Places a limit order on `[tick, tick + tick_spacing)`, debiting the
/// single-asset deposit from the signer.
pub fn handler(ctx: Context<PoolInteraction>, tick: i32, liquidity: u128) -> Result<()> {
    let mut ledger = SplTokenLedger::new(ctx.accounts);
    let owner = ctx.accounts.owner.key();

    ctx.accounts
        .pool
        .create_limit_order(&owner, tick, liquidity, &mut ledger)?;
    Ok(())
}
