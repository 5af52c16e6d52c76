pub mod burn_position;
pub mod cancel_limit_order;
pub mod collect_limit_order;
pub mod collect_position;
pub mod create_limit_order;
pub mod initialize_pool;
pub mod mint_position;
pub mod swap;
pub mod token_ledger;

pub use token_ledger::SplTokenLedger;
