// Copyright 2026 driedpampas@proton.me
// SPDX-License-Identifier: GPL-3.0-or-later

//! Bit-packing codec for palette-indexed block arrays.
//!
//! Packs a sequence of non-negative integers, each representable in
//! `bit_length` bits, into a sequence of 64-bit words. Entries are placed
//! LSB-first within a word and never split across a word boundary — an
//! entry that would straddle the boundary starts the next word instead,
//! leaving the unused high bits of the previous word zeroed. This is the
//! layout the current Anvil `BlockStates`/`data` long arrays use (see
//! `bb_common::chunk::paletted::bits::BitArray` for the same no-split
//! convention over a fixed-length 4096-entry array).

/// Packs `values` into 64-bit words using `bit_length` bits per entry.
///
/// # Panics
/// Panics if `bit_length` is 0 or greater than 64, or if any value in
/// `values` does not fit in `bit_length` bits.
pub fn pack(values: &[u64], bit_length: u32) -> Vec<u64> {
    assert!(
        bit_length >= 1 && bit_length <= 64,
        "bit_length must be in 1..=64, got {bit_length}"
    );
    if values.is_empty() {
        return Vec::new();
    }

    let entries_per_word = if bit_length == 64 {
        1
    } else {
        (64 / bit_length) as usize
    };
    let word_count = values.len().div_ceil(entries_per_word);
    let mut words = Vec::with_capacity(word_count);

    let mask: u64 = if bit_length == 64 {
        u64::MAX
    } else {
        (1u64 << bit_length) - 1
    };

    let mut chunks = values.chunks(entries_per_word);
    for chunk in &mut chunks {
        let mut word: u64 = 0;
        for (i, &v) in chunk.iter().enumerate() {
            assert!(
                v & !mask == 0,
                "value {v} does not fit in {bit_length} bits"
            );
            word |= v << (i as u32 * bit_length);
        }
        words.push(word);
    }
    words
}

/// Unpacks `len` values of `bit_length` bits each from `words`.
///
/// This is the exact inverse of [`pack`]: `unpack(&pack(xs, b), b, xs.len()) == xs`.
///
/// # Panics
/// Panics if `bit_length` is 0 or greater than 64.
pub fn unpack(words: &[u64], bit_length: u32, len: usize) -> Vec<u64> {
    assert!(
        bit_length >= 1 && bit_length <= 64,
        "bit_length must be in 1..=64, got {bit_length}"
    );
    if len == 0 {
        return Vec::new();
    }

    let entries_per_word = if bit_length == 64 {
        1
    } else {
        (64 / bit_length) as usize
    };
    let mask: u64 = if bit_length == 64 {
        u64::MAX
    } else {
        (1u64 << bit_length) - 1
    };

    let mut values = Vec::with_capacity(len);
    'outer: for &word in words {
        for i in 0..entries_per_word {
            if values.len() == len {
                break 'outer;
            }
            values.push((word >> (i as u32 * bit_length)) & mask);
        }
    }
    values
}

/// Returns the smallest `bit_length` such that `palette_size` distinct ids
/// fit, clamped to at least 1 (spec's `ceil(log2(palette_size))`, clamped).
pub fn bits_for_palette_size(palette_size: usize) -> u32 {
    if palette_size <= 1 {
        return 1;
    }
    (usize::BITS - (palette_size - 1).leading_zeros()).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_empty() {
        assert_eq!(pack(&[], 4), Vec::<u64>::new());
        assert_eq!(unpack(&[], 4, 0), Vec::<u64>::new());
    }

    #[test]
    fn round_trip_various_bit_lengths() {
        for &bit_length in &[1u32, 2, 3, 4, 5, 6, 8, 13, 15, 16, 31, 32, 63, 64] {
            let max = if bit_length == 64 {
                u64::MAX
            } else {
                (1u64 << bit_length) - 1
            };
            let values: Vec<u64> = (0..4096).map(|i| (i as u64) % (max + 1)).collect();
            let packed = pack(&values, bit_length);
            let unpacked = unpack(&packed, bit_length, values.len());
            assert_eq!(unpacked, values, "round trip failed for bit_length={bit_length}");
        }
    }

    #[test]
    fn palette_of_five_over_4096_uses_192_words() {
        // spec scenario: palette of 5 states -> bit_length 3, 4096 indices -> 192 longs.
        let bit_length = bits_for_palette_size(5);
        assert_eq!(bit_length, 3);
        let values: Vec<u64> = (0..4096).map(|i| (i % 5) as u64).collect();
        let packed = pack(&values, bit_length);
        assert_eq!(packed.len(), 192);
        assert_eq!(unpack(&packed, bit_length, values.len()), values);
    }

    #[test]
    fn no_split_across_word_boundary() {
        // bit_length=5: 12 entries per word (60 of 64 bits used, 4 bits wasted at the top).
        let values = vec![0x1Fu64, 0, 0x1F, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0x1F];
        let packed = pack(&values, 5);
        assert_eq!(packed[0], 0x1F << 10 | 0x1F);
        assert_eq!(packed[1], 0x1F);
    }

    #[test]
    fn bits_for_palette_size_matches_spec() {
        assert_eq!(bits_for_palette_size(0), 1);
        assert_eq!(bits_for_palette_size(1), 1);
        assert_eq!(bits_for_palette_size(2), 1);
        assert_eq!(bits_for_palette_size(3), 2);
        assert_eq!(bits_for_palette_size(4), 2);
        assert_eq!(bits_for_palette_size(5), 3);
        assert_eq!(bits_for_palette_size(256), 8);
        assert_eq!(bits_for_palette_size(257), 9);
    }

    #[test]
    #[should_panic(expected = "does not fit")]
    fn pack_rejects_oversized_values() {
        pack(&[16], 4);
    }
}
