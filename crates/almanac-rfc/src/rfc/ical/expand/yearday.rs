//! Candidate day set for one expanded month or year.
//!
//! Bits cover day-of-year ordinals `-3..=367`. Ordinals at or below zero
//! and past the end of the year address the neighbouring years, which lets
//! SKIP substitutes and week spill-over live in the same set as the year's
//! own days.

const MIN_DAY: i32 = -3;
const MAX_DAY: i32 = 367;
const WORDS: usize = 6;

/// Bitset of day-of-year ordinals in `-3..=367`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct YearDaySet {
    bits: [u64; WORDS],
}

fn slot(day: i32) -> Option<(usize, u32)> {
    if !(MIN_DAY..=MAX_DAY).contains(&day) {
        return None;
    }
    let offset = u32::try_from(day - MIN_DAY).ok()?;
    let word = usize::try_from(offset / 64).ok()?;
    Some((word, offset % 64))
}

fn day_at(word: usize, bit: u32) -> i32 {
    let word = i32::try_from(word).unwrap_or(0);
    MIN_DAY + word * 64 + i32::try_from(bit).unwrap_or(0)
}

impl YearDaySet {
    pub const MIN_DAY: i32 = MIN_DAY;
    pub const MAX_DAY: i32 = MAX_DAY;

    #[must_use]
    pub const fn new() -> Self {
        Self { bits: [0; WORDS] }
    }

    /// Marks `day`, returning `false` when it is out of range.
    pub fn set(&mut self, day: i32) -> bool {
        let Some((word, bit)) = slot(day) else {
            return false;
        };
        self.bits[word] |= 1 << bit;
        true
    }

    #[must_use]
    pub fn get(&self, day: i32) -> bool {
        slot(day).is_some_and(|(word, bit)| self.bits[word] & (1 << bit) != 0)
    }

    pub fn clear(&mut self) {
        self.bits = [0; WORDS];
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bits.iter().all(|&w| w == 0)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bits
            .iter()
            .map(|w| usize::try_from(w.count_ones()).unwrap_or(0))
            .sum()
    }

    #[must_use]
    pub fn first(&self) -> Option<i32> {
        self.find_next(MIN_DAY - 1)
    }

    #[must_use]
    pub fn last(&self) -> Option<i32> {
        self.find_prev(MAX_DAY + 1)
    }

    /// Smallest marked day strictly after `after`.
    #[must_use]
    pub fn find_next(&self, after: i32) -> Option<i32> {
        let start = after.saturating_add(1).max(MIN_DAY);
        let (mut word, bit) = slot(start)?;
        let mut masked = self.bits[word] & (u64::MAX << bit);
        loop {
            if masked != 0 {
                return Some(day_at(word, masked.trailing_zeros()));
            }
            word += 1;
            if word == WORDS {
                return None;
            }
            masked = self.bits[word];
        }
    }

    /// Largest marked day strictly before `before`.
    #[must_use]
    pub fn find_prev(&self, before: i32) -> Option<i32> {
        let end = before.saturating_sub(1).min(MAX_DAY);
        let (mut word, bit) = slot(end)?;
        let mut masked = self.bits[word] & (u64::MAX >> (63 - bit));
        loop {
            if masked != 0 {
                return Some(day_at(word, 63 - masked.leading_zeros()));
            }
            if word == 0 {
                return None;
            }
            word -= 1;
            masked = self.bits[word];
        }
    }

    /// Marked days in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = i32> + '_ {
        let mut cursor = self.first();
        std::iter::from_fn(move || {
            let day = cursor?;
            cursor = self.find_next(day);
            Some(day)
        })
    }

    /// Marked days in descending order.
    pub fn iter_rev(&self) -> impl Iterator<Item = i32> + '_ {
        let mut cursor = self.last();
        std::iter::from_fn(move || {
            let day = cursor?;
            cursor = self.find_prev(day);
            Some(day)
        })
    }
}
