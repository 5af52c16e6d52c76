pub mod pool;
pub mod swap;
