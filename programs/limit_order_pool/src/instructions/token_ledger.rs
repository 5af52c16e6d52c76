/// SPL token backed [`TokenLedger`].
///
/// Debits move tokens from the signer's token accounts into the pool vaults
/// under the signer's authority; credits move tokens out of the vaults signed by
/// the pool PDA. A failed transfer aborts the whole transaction, which is what
/// makes the on-chain settlement atomic.
use anchor_lang::prelude::*;
use anchor_spl::token::{self, Transfer};

use crate::constants::POOL_SEED;
use crate::errors::ErrorCode;
use crate::ledger::{Asset, TokenLedger};
use crate::PoolInteraction;

pub struct SplTokenLedger<'info> {
    owner: Pubkey,
    owner_info: AccountInfo<'info>,
    owner_token0: AccountInfo<'info>,
    owner_token1: AccountInfo<'info>,
    token0_vault: AccountInfo<'info>,
    token1_vault: AccountInfo<'info>,
    pool: AccountInfo<'info>,
    token_program: AccountInfo<'info>,
    token0_mint: Pubkey,
    token1_mint: Pubkey,
    bump: u8,
}

impl<'info> SplTokenLedger<'info> {
    pub fn new(accounts: &PoolInteraction<'info>) -> Self {
        Self {
            owner: accounts.owner.key(),
            owner_info: accounts.owner.to_account_info(),
            owner_token0: accounts.owner_token0.to_account_info(),
            owner_token1: accounts.owner_token1.to_account_info(),
            token0_vault: accounts.token0_vault.to_account_info(),
            token1_vault: accounts.token1_vault.to_account_info(),
            pool: accounts.pool.to_account_info(),
            token_program: accounts.token_program.to_account_info(),
            token0_mint: accounts.pool.token0_mint,
            token1_mint: accounts.pool.token1_mint,
            bump: accounts.pool.bump,
        }
    }

    /// (owner token account, pool vault) for an asset
    fn accounts_for(&self, asset: Asset) -> (AccountInfo<'info>, AccountInfo<'info>) {
        match asset {
            Asset::Token0 => (self.owner_token0.clone(), self.token0_vault.clone()),
            Asset::Token1 => (self.owner_token1.clone(), self.token1_vault.clone()),
        }
    }

    fn checked_amount(&self, account: &Pubkey, amount: u128) -> Result<u64> {
        require_keys_eq!(*account, self.owner, ErrorCode::UnauthorizedAccess);
        u64::try_from(amount).map_err(|_| error!(ErrorCode::MathOverflow))
    }
}

impl<'info> TokenLedger for SplTokenLedger<'info> {
    fn debit(&mut self, account: &Pubkey, asset: Asset, amount: u128) -> Result<()> {
        if amount == 0 {
            return Ok(());
        }
        let amount = self.checked_amount(account, amount)?;
        let (from, to) = self.accounts_for(asset);

        token::transfer(
            CpiContext::new(
                self.token_program.clone(),
                Transfer {
                    from,
                    to,
                    authority: self.owner_info.clone(),
                },
            ),
            amount,
        )
    }

    fn credit(&mut self, account: &Pubkey, asset: Asset, amount: u128) -> Result<()> {
        if amount == 0 {
            return Ok(());
        }
        let amount = self.checked_amount(account, amount)?;
        let (to, from) = self.accounts_for(asset);

        let bump = [self.bump];
        let seeds: &[&[u8]] = &[
            POOL_SEED,
            self.token0_mint.as_ref(),
            self.token1_mint.as_ref(),
            &bump,
        ];
        let signer_seeds = &[seeds];

        token::transfer(
            CpiContext::new_with_signer(
                self.token_program.clone(),
                Transfer {
                    from,
                    to,
                    authority: self.pool.clone(),
                },
                signer_seeds,
            ),
            amount,
        )
    }
}
