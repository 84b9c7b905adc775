//! Transposition table for caching search results.
//!
//! One entry per slot, indexed by the low bits of the position key, and
//! every store overwrites its slot. `get` hands back whatever occupies
//! the slot; callers confirm a hit with [`TtEntry::matches`] before
//! trusting depth, score or move.

use std::mem;

use crate::board::MAX_PLY;

/// Default table size in megabytes.
pub const DEFAULT_TT_MB: usize = 16;

/// Scores at or beyond this magnitude encode a forced mate.
pub const MATE_THRESHOLD: i32 = 28000;

/// Score of being mated at the root; mate at ply `n` scores
/// `MATE_SCORE - n`.
pub const MATE_SCORE: i32 = MATE_THRESHOLD + MAX_PLY as i32;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bound {
    /// Score is at least this value (failed high)
    Lower,
    /// Score is the exact value
    Exact,
    /// Score is at most this value (failed low)
    Upper,
    /// Side to move is checkmated
    Checkmate,
    /// Side to move is stalemated
    Stalemate,
}

impl Bound {
    const ALL: [Bound; 5] = [
        Bound::Lower,
        Bound::Exact,
        Bound::Upper,
        Bound::Checkmate,
        Bound::Stalemate,
    ];

    fn code(self) -> u64 {
        self as u64 + 1
    }

    fn from_code(code: u64) -> Option<Self> {
        code.checked_sub(1)
            .and_then(|i| Bound::ALL.get(i as usize).copied())
    }
}

/// Mate scores are stored relative to the node, not the root.
fn score_to_table(score: i32, ply: usize) -> i32 {
    if score >= MATE_THRESHOLD {
        score + ply as i32
    } else if score <= -MATE_THRESHOLD {
        score - ply as i32
    } else {
        score
    }
}

fn score_from_table(score: i32, ply: usize) -> i32 {
    if score >= MATE_THRESHOLD {
        score - ply as i32
    } else if score <= -MATE_THRESHOLD {
        score + ply as i32
    } else {
        score
    }
}

/// Bytes in `size_mb` megabytes, saturating for absurd requests.
fn megabytes(size_mb: usize) -> usize {
    size_mb.saturating_mul(1024 * 1024)
}

/// Largest power-of-two entry count that fits in `bytes`, at least one.
fn entry_count(bytes: usize) -> usize {
    let fit = bytes / mem::size_of::<TtEntry>();
    if fit == 0 {
        1
    } else {
        1 << (usize::BITS - 1 - fit.leading_zeros())
    }
}

/// Packed data word:
/// - bits 0-23:  best move (`Move::bits`, 0 = none)
/// - bits 24-39: score (i16 as u16)
/// - bits 40-47: depth (u8)
/// - bits 48-50: bound (0 = empty slot)
/// - bits 51-58: flags (u8)
fn pack_entry(best_move_bits: u32, score: i16, depth: u8, bound: Bound, flags: u8) -> u64 {
    u64::from(best_move_bits & 0x00FF_FFFF)
        | u64::from(score as u16) << 24
        | u64::from(depth) << 40
        | bound.code() << 48
        | u64::from(flags) << 51
}

/// One table slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TtEntry {
    key: u64,
    data: u64,
}

impl TtEntry {
    /// Does this slot hold the position with `key`?
    #[inline]
    #[must_use]
    pub fn matches(&self, key: u64) -> bool {
        self.key == key && !self.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data == 0
    }

    #[inline]
    #[must_use]
    pub fn key(&self) -> u64 {
        self.key
    }

    /// Packed best move, 0 when none was stored.
    #[inline]
    #[must_use]
    pub fn best_move_bits(&self) -> u32 {
        (self.data & 0x00FF_FFFF) as u32
    }

    #[inline]
    #[must_use]
    pub fn depth(&self) -> u8 {
        (self.data >> 40) as u8
    }

    /// Bound kind, `None` for an empty slot.
    #[inline]
    #[must_use]
    pub fn bound(&self) -> Option<Bound> {
        Bound::from_code((self.data >> 48) & 0x7)
    }

    #[inline]
    #[must_use]
    pub fn flags(&self) -> u8 {
        (self.data >> 51) as u8
    }

    /// Stored score re-derived for a probe at `ply`.
    #[inline]
    #[must_use]
    pub fn score(&self, ply: usize) -> i32 {
        score_from_table(i32::from((self.data >> 24) as u16 as i16), ply)
    }
}

pub struct TranspositionTable {
    entries: Vec<TtEntry>,
    mask: usize,
}

impl TranspositionTable {
    /// Create a new transposition table with the given size in megabytes.
    #[must_use]
    pub fn new(size_mb: usize) -> Self {
        Self::with_budget(megabytes(size_mb))
    }

    /// Largest power-of-two entry count that fits in `bytes` (at least
    /// one entry).
    #[must_use]
    pub fn with_budget(bytes: usize) -> Self {
        let len = entry_count(bytes);
        log::debug!("transposition table: {len} entries for a {bytes} byte budget");
        TranspositionTable {
            entries: vec![TtEntry::default(); len],
            mask: len - 1,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    fn index(&self, key: u64) -> usize {
        (key as usize) & self.mask
    }

    /// The slot for `key`, whatever it currently holds.
    #[inline]
    #[must_use]
    pub fn get(&self, key: u64) -> &TtEntry {
        &self.entries[self.index(key)]
    }

    /// Overwrite the slot for `key`. `score` is relative to the root;
    /// `ply` is the distance of the stored node from it.
    #[allow(clippy::too_many_arguments)]
    pub fn store(
        &mut self,
        key: u64,
        best_move_bits: u32,
        depth: u8,
        bound: Bound,
        score: i32,
        ply: usize,
        flags: u8,
    ) {
        let stored = score_to_table(score, ply);
        debug_assert!(
            i16::try_from(stored).is_ok(),
            "score {score} at ply {ply} does not fit the table"
        );
        let stored = stored.clamp(i32::from(i16::MIN), i32::from(i16::MAX));
        let index = self.index(key);
        self.entries[index] = TtEntry {
            key,
            data: pack_entry(best_move_bits, stored as i16, depth, bound, flags),
        };
    }

    /// Clear all entries from the table.
    pub fn clear(&mut self) {
        self.entries.fill(TtEntry::default());
    }

    /// Returns hash table fullness in per mille (0-1000).
    #[must_use]
    pub fn hashfull_per_mille(&self) -> u32 {
        // Sample the first 1000 slots
        let sample = &self.entries[..self.entries.len().min(1000)];
        let occupied = sample.iter().filter(|e| !e.is_empty()).count();
        (occupied * 1000 / sample.len()) as u32
    }
}

impl Default for TranspositionTable {
    fn default() -> Self {
        Self::new(DEFAULT_TT_MB)
    }
}
