/// Tick Bitmap Implementation
///
/// Tracks which ticks are initialized using one bit per spacing-aligned tick.
/// Ticks are first compressed (divided by the tick spacing, rounding toward
/// negative infinity) and the compressed index is split into a 16-bit word
/// position and an 8-bit position inside a 256-bit word. Only non-empty words
/// are stored.
use crate::errors::ErrorCode;
use crate::u256_wrapper::U256Wrapper;
use anchor_lang::prelude::*;
use primitive_types::U256;
use std::collections::BTreeMap;

/// Bits per bitmap word
pub const WORD_SIZE: i32 = 256;

/// Compresses a tick by the spacing, rounding toward negative infinity.
pub fn compress(tick: i32, tick_spacing: u16) -> i32 {
    tick.div_euclid(tick_spacing as i32)
}

/// Calculates the position in the tick bitmap for a compressed tick
///
/// # Parameters
/// * `compressed` - The compressed tick index
///
/// # Returns
/// * `(i16, u8)` - The word index and bit position within that word
pub fn position(compressed: i32) -> (i16, u8) {
    let word_pos = compressed.div_euclid(WORD_SIZE) as i16;
    let bit_pos = compressed.rem_euclid(WORD_SIZE) as u8;
    (word_pos, bit_pos)
}

fn most_significant_bit(word: U256) -> u8 {
    (255 - word.leading_zeros()) as u8
}

fn least_significant_bit(word: U256) -> u8 {
    word.trailing_zeros() as u8
}

/// Mask of every bit at positions `<= bit_pos`.
fn mask_at_or_below(bit_pos: u8) -> U256 {
    let bit = U256::one() << bit_pos;
    (bit - U256::one()) + bit
}

/// Mask of every bit at positions `>= bit_pos`.
fn mask_at_or_above(bit_pos: u8) -> U256 {
    !((U256::one() << bit_pos) - U256::one())
}

#[derive(Debug, Default, Clone, PartialEq, Eq, AnchorSerialize, AnchorDeserialize)]
pub struct TickBitmap {
    /// Non-empty words keyed by word position
    words: BTreeMap<i16, U256Wrapper>,
}

impl TickBitmap {
    pub fn new() -> Self {
        Self::default()
    }

    fn word(&self, word_pos: i16) -> U256 {
        self.words
            .get(&word_pos)
            .map(|word| word.value())
            .unwrap_or_default()
    }

    /// Flips the initialized state of a tick
    ///
    /// # Parameters
    /// * `tick` - The tick to flip, which must be a multiple of `tick_spacing`
    /// * `tick_spacing` - The spacing between usable ticks
    ///
    /// # Returns
    /// * `Result<()>` - `TickNotAligned` if the tick is not on the spacing grid
    pub fn flip_tick(&mut self, tick: i32, tick_spacing: u16) -> Result<()> {
        require!(
            tick % tick_spacing as i32 == 0,
            ErrorCode::TickNotAligned
        );

        let (word_pos, bit_pos) = position(tick / tick_spacing as i32);
        let flipped = self.word(word_pos) ^ (U256::one() << bit_pos);

        if flipped.is_zero() {
            self.words.remove(&word_pos);
        } else {
            self.words.insert(word_pos, flipped.into());
        }
        Ok(())
    }

    pub fn is_initialized(&self, tick: i32, tick_spacing: u16) -> bool {
        if tick % tick_spacing as i32 != 0 {
            return false;
        }
        let (word_pos, bit_pos) = position(tick / tick_spacing as i32);
        !(self.word(word_pos) & (U256::one() << bit_pos)).is_zero()
    }

    /// Finds the next initialized tick contained in the same word as `tick`
    ///
    /// When `lte` is true the search covers ticks at or below `tick`, otherwise
    /// strictly above it. If no initialized tick exists in that part of the word,
    /// the word's boundary tick is returned with `initialized == false`, so a
    /// caller can advance one word at a time.
    ///
    /// # Parameters
    /// * `tick` - The starting tick (need not be aligned)
    /// * `tick_spacing` - The spacing between usable ticks
    /// * `lte` - Whether to search at-or-below (true) or above (false)
    ///
    /// # Returns
    /// * `(i32, bool)` - The next tick and whether it is initialized
    pub fn next_initialized_tick_within_one_word(
        &self,
        tick: i32,
        tick_spacing: u16,
        lte: bool,
    ) -> (i32, bool) {
        let spacing = tick_spacing as i32;
        let compressed = compress(tick, tick_spacing);

        if lte {
            let (word_pos, bit_pos) = position(compressed);
            let masked = self.word(word_pos) & mask_at_or_below(bit_pos);

            if masked.is_zero() {
                (
                    (compressed - bit_pos as i32) * spacing,
                    false,
                )
            } else {
                let msb = most_significant_bit(masked);
                (
                    (compressed - (bit_pos - msb) as i32) * spacing,
                    true,
                )
            }
        } else {
            // Start from the next tick; the current one is not a candidate.
            let (word_pos, bit_pos) = position(compressed + 1);
            let masked = self.word(word_pos) & mask_at_or_above(bit_pos);

            if masked.is_zero() {
                (
                    (compressed + 1 + (u8::MAX - bit_pos) as i32) * spacing,
                    false,
                )
            } else {
                let lsb = least_significant_bit(masked);
                (
                    (compressed + 1 + (lsb - bit_pos) as i32) * spacing,
                    true,
                )
            }
        }
    }

    /// Finds the nearest initialized tick in a direction, across all words
    ///
    /// Uses the same direction convention as
    /// [`TickBitmap::next_initialized_tick_within_one_word`]. Returns `None` when
    /// no initialized tick exists on that side.
    pub fn next_initialized_tick(&self, tick: i32, tick_spacing: u16, lte: bool) -> Option<i32> {
        let (next, initialized) = self.next_initialized_tick_within_one_word(tick, tick_spacing, lte);
        if initialized {
            return Some(next);
        }

        let spacing = tick_spacing as i32;
        let (word_pos, _) = position(compress(next, tick_spacing));

        if lte {
            let (pos, word) = self.words.range(..word_pos).next_back()?;
            let base = *pos as i32 * WORD_SIZE;
            Some((base + most_significant_bit(word.value()) as i32) * spacing)
        } else {
            let start = word_pos.checked_add(1)?;
            let (pos, word) = self.words.range(start..).next()?;
            let base = *pos as i32 * WORD_SIZE;
            Some((base + least_significant_bit(word.value()) as i32) * spacing)
        }
    }

    /// Number of initialized ticks
    pub fn count(&self) -> u32 {
        self.words
            .values()
            .map(|word| {
                let limbs = word.value().0;
                limbs.iter().map(|limb| limb.count_ones()).sum::<u32>()
            })
            .sum()
    }
}
