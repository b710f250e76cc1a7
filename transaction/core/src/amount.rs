// Copyright (c) 2019-2025 The Umbra Foundation

//! Decomposition of amounts into canonical power-of-ten denominations.
//!
//! Arbitrary amounts would let an observer link outputs back to a payment by
//! value alone. Wallets therefore split every amount into round-number
//! chunks (one nonzero decimal digit each) that are indistinguishable from
//! other users' outputs, with digits too small to be worth an output of
//! their own merged into a single dust chunk.

/// Decompose `amount` into power-of-ten chunks and at most one dust chunk.
///
/// Walks the decimal digits from least to most significant. Digits are
/// accumulated into a dust total while it stays at or below
/// `dust_threshold`; the first time a digit would push it over, the dust is
/// emitted (once, if nonzero) and every remaining nonzero digit is emitted
/// as its own chunk, in ascending order of magnitude. If the dust total
/// never exceeds the threshold it is emitted once at the end.
///
/// `62387455827` with a threshold covering the low six digits decomposes as
/// dust `455827` followed by chunks `7000000, 80000000, 300000000,
/// 2000000000, 60000000000`. A zero amount emits nothing.
pub fn decompose_amount_into_digits<C, D>(
    amount: u64,
    dust_threshold: u64,
    mut chunk_handler: C,
    mut dust_handler: D,
) where
    C: FnMut(u64),
    D: FnMut(u64),
{
    if amount == 0 {
        return;
    }

    let mut amount = amount;
    let mut is_dust_handled = false;
    let mut dust = 0u64;
    let mut order = 1u64;

    while amount != 0 {
        let chunk = (amount % 10) * order;
        amount /= 10;
        // Saturation only matters after the final digit of a 20-digit value,
        // when order is no longer used.
        order = order.saturating_mul(10);

        if dust.checked_add(chunk).is_some_and(|total| total <= dust_threshold) {
            dust += chunk;
        } else {
            if !is_dust_handled && dust != 0 {
                dust_handler(dust);
                is_dust_handled = true;
            }
            if chunk != 0 {
                chunk_handler(chunk);
            }
        }
    }

    if !is_dust_handled && dust != 0 {
        dust_handler(dust);
    }
}

/// A materialized decomposition of an amount.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DecomposedAmount {
    /// The denomination chunks, least significant first.
    pub chunks: Vec<u64>,

    /// The dust remainder, at most `dust_threshold`; zero if none.
    pub dust: u64,
}

impl DecomposedAmount {
    /// Decompose `amount` with the given dust threshold.
    pub fn decompose(amount: u64, dust_threshold: u64) -> Self {
        let mut chunks = Vec::new();
        let mut dust = 0u64;
        decompose_amount_into_digits(
            amount,
            dust_threshold,
            |chunk| chunks.push(chunk),
            |d| dust = d,
        );
        Self { chunks, dust }
    }

    /// Sum of all chunks and the dust; always equals the decomposed amount.
    pub fn total(&self) -> u64 {
        self.chunks.iter().sum::<u64>() + self.dust
    }
}
