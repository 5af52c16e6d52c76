/// Token movements between users and the pool.
///
/// The pool never touches balances itself. Every state-changing operation ends
/// by asking a [`TokenLedger`] to debit what the user pays in and credit what
/// the pool pays out. On-chain the ledger is backed by SPL token transfers
/// (`instructions::token_ledger`); tests and simulations use
/// [`InMemoryTokenLedger`].
use anchor_lang::prelude::*;
use std::collections::BTreeMap;

use crate::errors::ErrorCode;

#[derive(
    AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
pub enum Asset {
    Token0,
    Token1,
}

impl Asset {
    pub fn other(self) -> Self {
        match self {
            Asset::Token0 => Asset::Token1,
            Asset::Token1 => Asset::Token0,
        }
    }
}

/// Net token movements of one pool operation for a single account.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Settlement {
    pub debit_0: u128,
    pub debit_1: u128,
    pub credit_0: u128,
    pub credit_1: u128,
}

impl Settlement {
    pub fn debit(asset: Asset, amount: u128) -> Self {
        match asset {
            Asset::Token0 => Self {
                debit_0: amount,
                ..Self::default()
            },
            Asset::Token1 => Self {
                debit_1: amount,
                ..Self::default()
            },
        }
    }

    pub fn credit(asset: Asset, amount: u128) -> Self {
        match asset {
            Asset::Token0 => Self {
                credit_0: amount,
                ..Self::default()
            },
            Asset::Token1 => Self {
                credit_1: amount,
                ..Self::default()
            },
        }
    }

    /// Debits first so the pool holds the input before it pays anything out.
    pub fn apply<L: TokenLedger + ?Sized>(&self, ledger: &mut L, account: &Pubkey) -> Result<()> {
        ledger.debit(account, Asset::Token0, self.debit_0)?;
        ledger.debit(account, Asset::Token1, self.debit_1)?;
        ledger.credit(account, Asset::Token0, self.credit_0)?;
        ledger.credit(account, Asset::Token1, self.credit_1)?;
        Ok(())
    }
}

pub trait TokenLedger {
    /// Moves `amount` of `asset` from `account` into the pool.
    fn debit(&mut self, account: &Pubkey, asset: Asset, amount: u128) -> Result<()>;

    /// Moves `amount` of `asset` from the pool to `account`.
    fn credit(&mut self, account: &Pubkey, asset: Asset, amount: u128) -> Result<()>;

    /// Applies every movement of a settlement.
    ///
    /// Implementations that cannot roll back a partially applied settlement on
    /// their own should override this.
    fn settle(&mut self, account: &Pubkey, settlement: &Settlement) -> Result<()> {
        settlement.apply(self, account)
    }
}

/// Balance book for a single pool and its users.
///
/// Tracks the pool's own reserves as well, so a credit the pool cannot cover
/// fails instead of minting tokens.
#[derive(Debug, Default, Clone)]
pub struct InMemoryTokenLedger {
    balances: BTreeMap<(Pubkey, Asset), u128>,
    reserve_0: u128,
    reserve_1: u128,
}

impl InMemoryTokenLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gives `account` tokens from outside the pool.
    pub fn fund(&mut self, account: &Pubkey, asset: Asset, amount: u128) -> Result<()> {
        let balance = self.balances.entry((*account, asset)).or_default();
        *balance = balance
            .checked_add(amount)
            .ok_or(ErrorCode::MathOverflow)?;
        Ok(())
    }

    pub fn balance_of(&self, account: &Pubkey, asset: Asset) -> u128 {
        self.balances
            .get(&(*account, asset))
            .copied()
            .unwrap_or_default()
    }

    /// Tokens currently held by the pool.
    pub fn reserve(&self, asset: Asset) -> u128 {
        match asset {
            Asset::Token0 => self.reserve_0,
            Asset::Token1 => self.reserve_1,
        }
    }

    fn reserve_mut(&mut self, asset: Asset) -> &mut u128 {
        match asset {
            Asset::Token0 => &mut self.reserve_0,
            Asset::Token1 => &mut self.reserve_1,
        }
    }
}

impl TokenLedger for InMemoryTokenLedger {
    fn debit(&mut self, account: &Pubkey, asset: Asset, amount: u128) -> Result<()> {
        if amount == 0 {
            return Ok(());
        }
        let balance = self.balance_of(account, asset);
        require!(balance >= amount, ErrorCode::InsufficientBalance);

        let reserve = self.reserve_mut(asset);
        *reserve = reserve.checked_add(amount).ok_or(ErrorCode::MathOverflow)?;
        self.balances.insert((*account, asset), balance - amount);
        Ok(())
    }

    fn credit(&mut self, account: &Pubkey, asset: Asset, amount: u128) -> Result<()> {
        if amount == 0 {
            return Ok(());
        }
        let balance = self
            .balance_of(account, asset)
            .checked_add(amount)
            .ok_or(ErrorCode::MathOverflow)?;

        let reserve = self.reserve_mut(asset);
        *reserve = reserve
            .checked_sub(amount)
            .ok_or(ErrorCode::InsufficientBalance)?;
        self.balances.insert((*account, asset), balance);
        Ok(())
    }

    fn settle(&mut self, account: &Pubkey, settlement: &Settlement) -> Result<()> {
        let mut draft = self.clone();
        settlement.apply(&mut draft, account)?;
        *self = draft;
        Ok(())
    }
}
