use crate::accent::color::Color;
use crate::accent::histogram::Histogram;
use crate::accent::quantize::{brightness, decode};
use crate::error::{AccentError, Result};
use std::cmp::Reverse;

/// Share of the populated bins, most frequent first, that stays in the running (1/5).
const POPULAR_NUM: usize = 1;
const POPULAR_DEN: usize = 5;

/// Position of the pick inside the brightness-ordered popular bins (1/4 down).
/// Skips the brightest, near-white tones.
const PICK_NUM: usize = 1;
const PICK_DEN: usize = 4;

/// The popular bins in brightness order and the one chosen from them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ranking {
    /// `(bin, count)` pairs, brightest first.
    pub popular: Vec<(usize, u64)>,
    /// How many bins had a non-zero count.
    pub populated: usize,
    /// Index into `popular` of the selected bin.
    pub pick: usize,
}

impl Ranking {
    pub fn bin(&self) -> usize {
        self.popular[self.pick].0
    }
}

pub fn rank_bins(histogram: &Histogram) -> Result<Ranking> {
    let mut pairs: Vec<(usize, u64)> = histogram.populated().collect();
    if pairs.is_empty() {
        return Err(AccentError::DegenerateHistogram);
    }
    let populated = pairs.len();

    pairs.sort_by_key(|&(bin, count)| (Reverse(count), bin));

    let keep = (populated * POPULAR_NUM)
        .div_ceil(POPULAR_DEN)
        .clamp(1, populated);
    pairs.truncate(keep);

    pairs.sort_by_key(|&(bin, _)| (Reverse(brightness(bin)), bin));

    let pick = (keep * PICK_NUM / PICK_DEN).min(keep - 1);

    Ok(Ranking {
        popular: pairs,
        populated,
        pick,
    })
}

/// Picks the accent color of a histogram.
///
/// The most frequent fifth of the populated bins is re-ordered by brightness and
/// the bin a quarter of the way down is returned, decoded and fully opaque.
pub fn select_accent(histogram: &Histogram) -> Result<Color> {
    let ranking = rank_bins(histogram)?;
    let bin = ranking.bin();
    let (r, g, b) = decode(bin);
    log::debug!(
        "accent: bin {bin} ({} populated, {} popular, pick {})",
        ranking.populated,
        ranking.popular.len(),
        ranking.pick
    );
    Ok(Color::opaque(r, g, b))
}
