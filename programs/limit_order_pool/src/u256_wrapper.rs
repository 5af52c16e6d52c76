/// Storable 256-bit unsigned integer.
///
/// `primitive_types::U256` has no Borsh implementation, so every 256-bit value that
/// lives in account state, events or instruction arguments (sqrt prices, fee growth
/// accumulators, bitmap words) is stored through this wrapper and converted back to
/// a `U256` for arithmetic.
use anchor_lang::prelude::*;
use primitive_types::U256;

#[derive(
    AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash,
)]
pub struct U256Wrapper {
    /// Little-endian 64-bit limbs, the same layout `U256` uses internally.
    limbs: [u64; 4],
}

impl U256Wrapper {
    pub const ZERO: Self = Self { limbs: [0; 4] };

    pub fn new(value: U256) -> Self {
        Self { limbs: value.0 }
    }

    /// Get the inner U256 value
    pub fn value(&self) -> U256 {
        U256(self.limbs)
    }

    pub fn is_zero(&self) -> bool {
        self.limbs == [0; 4]
    }
}

impl From<U256> for U256Wrapper {
    fn from(value: U256) -> Self {
        Self::new(value)
    }
}

impl From<U256Wrapper> for U256 {
    fn from(value: U256Wrapper) -> Self {
        value.value()
    }
}

impl From<u128> for U256Wrapper {
    fn from(value: u128) -> Self {
        Self::new(U256::from(value))
    }
}

impl PartialOrd for U256Wrapper {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for U256Wrapper {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.value().cmp(&other.value())
    }
}
