//! Bit-reversal permutation for sequency ordering.
//!
//! Copying a window through this permutation before the butterfly stages
//! run is what makes the transform emit coefficients in sequency order
//! (increasing number of sign changes) instead of natural Hadamard order.
//!
//! For an exponent `p`, index `i` maps to `i` with its low `p` bits reversed:
//!
//! | p | permutation |
//! |---|-------------|
//! | 0 | `[0]` |
//! | 1 | `[0, 1]` |
//! | 2 | `[0, 2, 1, 3]` |
//! | 3 | `[0, 4, 2, 6, 1, 5, 3, 7]` |

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec::Vec;

/// Reverse the low `bits` bits of `index`.
///
/// Bits above `bits` are discarded. `bits == 0` always yields 0, so a
/// one-sample window never shifts by the full word width.
///
/// # Example
///
/// ```rust
/// use walsh_core::bit_reverse;
///
/// assert_eq!(bit_reverse(0b001, 3), 0b100);
/// assert_eq!(bit_reverse(0b110, 3), 0b011);
/// assert_eq!(bit_reverse(5, 0), 0);
/// ```
#[inline]
pub fn bit_reverse(index: usize, bits: u32) -> usize {
    if bits == 0 {
        return 0;
    }
    debug_assert!(bits <= usize::BITS);
    index.reverse_bits() >> (usize::BITS - bits)
}

/// Build the sequency permutation for a window of `2^power` samples.
///
/// Pure and deterministic. Callers on the audio thread should hold a
/// [`Permutation`] instead, which only rebuilds when the exponent changes.
pub fn bit_reversal_permutation(power: u32) -> Vec<usize> {
    let len = 1usize << power;
    (0..len).map(|i| bit_reverse(i, power)).collect()
}

/// Cached bit-reversal permutation for one window exponent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permutation {
    power: u32,
    indices: Vec<usize>,
}

impl Permutation {
    /// Build the permutation for `2^power` indices.
    pub fn new(power: u32) -> Self {
        Self {
            power,
            indices: bit_reversal_permutation(power),
        }
    }

    /// Window exponent this permutation was built for.
    pub fn power(&self) -> u32 {
        self.power
    }

    /// Number of indices (`2^power`).
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Always false; a permutation covers at least one index.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// The permuted indices: position `i` reads from source index `indices()[i]`.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Rebuild for a new exponent. Returns `false` without touching the
    /// cache when the exponent is unchanged.
    pub fn set_power(&mut self, power: u32) -> bool {
        if power == self.power {
            return false;
        }
        self.power = power;
        self.indices.clear();
        let len = 1usize << power;
        self.indices.extend((0..len).map(|i| bit_reverse(i, power)));
        true
    }
}
