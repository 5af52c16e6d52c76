use anchor_lang::prelude::*;

use crate::instructions::SplTokenLedger;
use crate::PoolInteraction;

pub fn handler(ctx: Context<PoolInteraction>, tick: i32) -> Result<()> {
    let mut ledger = SplTokenLedger::new(ctx.accounts);
    let owner = ctx.accounts.owner.key();

    ctx.accounts
        .pool
        .collect_limit_order(&owner, tick, &mut ledger)?;
    Ok(())
}
