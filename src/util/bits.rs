//! Bitmask helpers shared by trigger links and poll votes.
//!
//! Both record types encode a set of relationships as one integer: bit `i` set means
//! "related to the entity at ordinal `i`".

/// Iterates the set bits of `n` from lowest to highest, yielding each as a power of two.
///
/// `13` (`0b1101`) yields `1`, `4`, `8`.
pub fn bit_positions(mut n: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        if n == 0 {
            return None;
        }
        let lowest = n & n.wrapping_neg();
        n ^= lowest;
        Some(lowest)
    })
}

/// Iterates the indices of the set bits of `n` in ascending order.
pub fn bit_indices(n: u64) -> impl Iterator<Item = usize> {
    bit_positions(n).map(bit_index)
}

/// Converts a single-bit value back to its index (`log2`).
pub fn bit_index(bit: u64) -> usize {
    bit.trailing_zeros() as usize
}

/// Builds a mask from a list of indices. Indices of 64 or above are ignored.
pub fn mask_of(indices: impl IntoIterator<Item = usize>) -> u64 {
    indices
        .into_iter()
        .filter(|&i| i < u64::BITS as usize)
        .fold(0, |mask, i| mask | 1 << i)
}
