use crate::accent::quantize::{quantize, BIN_COUNT};
use crate::error::{AccentError, Result};
use rayon::prelude::*;
use std::ops::Range;

pub const BYTES_PER_PIXEL: usize = 4;

/// Pixel counts per coarse color bin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    counts: [u64; BIN_COUNT],
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new()
    }
}

impl Histogram {
    pub fn new() -> Self {
        Self { counts: [0; BIN_COUNT] }
    }

    pub fn from_counts(counts: [u64; BIN_COUNT]) -> Self {
        Self { counts }
    }

    pub fn counts(&self) -> &[u64; BIN_COUNT] {
        &self.counts
    }

    pub fn count(&self, bin: usize) -> u64 {
        self.counts.get(bin).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }

    /// Populated bins as `(bin, count)` pairs in bin order.
    pub fn populated(&self) -> impl Iterator<Item = (usize, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c > 0)
            .map(|(bin, &c)| (bin, c))
    }

    /// Counts every `stride`-th pixel of an RGBA8 slice, starting at its first pixel.
    pub fn sample(&mut self, rgba: &[u8], stride: usize) {
        for px in rgba.chunks_exact(BYTES_PER_PIXEL).step_by(stride.max(1)) {
            let bin = quantize([px[0], px[1], px[2], px[3]]);
            self.counts[bin] += 1;
        }
    }

    /// Adds `other` into `self` counter by counter.
    pub fn merge(mut self, other: Self) -> Self {
        for (dst, &src) in self.counts.iter_mut().zip(other.counts.iter()) {
            if src > 0 {
                *dst += src;
            }
        }
        self
    }
}

/// Splits `total_pixels` into `concurrency_hint` contiguous ranges.
///
/// Every range but the last has `max(1, total / hint)` pixels; the last one
/// runs to the end of the buffer. A hint above the pixel count yields one
/// range per pixel, since any further range would be empty.
pub fn chunk_ranges(total_pixels: usize, concurrency_hint: usize) -> Vec<Range<usize>> {
    let tasks = concurrency_hint.clamp(1, total_pixels.max(1));
    let chunk_size = (total_pixels / tasks).max(1);

    (0..tasks)
        .map(|i| {
            let start = (chunk_size * i).min(total_pixels);
            let end = if i + 1 == tasks {
                total_pixels
            } else {
                (chunk_size * (i + 1)).min(total_pixels)
            };
            start..end
        })
        .collect()
}

/// How many pixels `build_histogram` will count for these parameters.
pub fn expected_samples(total_pixels: usize, downsample_factor: usize, concurrency_hint: usize) -> u64 {
    let stride = downsample_factor.max(1);
    chunk_ranges(total_pixels, concurrency_hint)
        .iter()
        .map(|r| r.len().div_ceil(stride) as u64)
        .sum()
}

/// Builds the global histogram of an RGBA8 buffer.
///
/// Each chunk is sampled into a private histogram on the current rayon pool
/// and the partial histograms are summed afterwards, so workers never write
/// to shared counters.
pub fn build_histogram(pixels: &[u8], downsample_factor: usize, concurrency_hint: usize) -> Result<Histogram> {
    if pixels.is_empty() {
        return Err(AccentError::invalid_input("pixel buffer is empty"));
    }
    if pixels.len() % BYTES_PER_PIXEL != 0 {
        return Err(AccentError::invalid_input(format!(
            "pixel buffer length {} is not a multiple of {BYTES_PER_PIXEL}",
            pixels.len()
        )));
    }

    let stride = downsample_factor.max(1);
    let total_pixels = pixels.len() / BYTES_PER_PIXEL;

    let ranges = chunk_ranges(total_pixels, concurrency_hint);
    let chunks = ranges.len();

    let histogram = ranges
        .into_par_iter()
        .map(|range| {
            let mut local = Histogram::new();
            local.sample(
                &pixels[range.start * BYTES_PER_PIXEL..range.end * BYTES_PER_PIXEL],
                stride,
            );
            local
        })
        .reduce(Histogram::new, Histogram::merge);

    log::debug!(
        "histogram: {} of {} pixels sampled (stride {}, {} chunks)",
        histogram.total(),
        total_pixels,
        stride,
        chunks
    );
    Ok(histogram)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(pixels: usize) -> Vec<u8> {
        (0..pixels)
            .flat_map(|i| {
                let v = (i * 37) as u32;
                [(v % 256) as u8, (v / 3 % 256) as u8, (v / 7 % 256) as u8, 255]
            })
            .collect()
    }

    #[test]
    fn last_chunk_absorbs_remainder() {
        let ranges = chunk_ranges(10, 3);
        assert_eq!(ranges, vec![0..3, 3..6, 6..10]);
    }

    #[test]
    fn more_chunks_than_pixels() {
        let ranges = chunk_ranges(2, 4);
        assert_eq!(ranges, vec![0..1, 1..2]);
        assert_eq!(expected_samples(2, 1, 4), 2);
    }

    #[test]
    fn huge_hint_is_bounded_by_pixel_count() {
        assert_eq!(chunk_ranges(3, usize::MAX).len(), 3);

        let px = gradient(2);
        assert_eq!(
            build_histogram(&px, 1, usize::MAX).unwrap(),
            build_histogram(&px, 1, 1).unwrap()
        );
        let px = gradient(90);
        assert_eq!(
            build_histogram(&px, 1, usize::MAX).unwrap(),
            build_histogram(&px, 1, 1).unwrap()
        );
    }

    #[test]
    fn zero_hint_is_one_chunk() {
        assert_eq!(chunk_ranges(5, 0), vec![0..5]);
    }

    #[test]
    fn total_matches_sampled_pixels() {
        let px = gradient(1000);
        for stride in [1usize, 2, 3, 7, 64] {
            for hint in [1usize, 2, 3, 6, 16] {
                let hist = build_histogram(&px, stride, hint).unwrap();
                let expected = expected_samples(1000, stride, hint);
                assert_eq!(hist.total(), expected, "stride {stride} hint {hint}");
                assert!(hist.total() <= 1000);
            }
        }
    }

    #[test]
    fn partition_does_not_change_counts() {
        let px = gradient(777);
        let single = build_histogram(&px, 1, 1).unwrap();
        for hint in [2usize, 3, 5, 8, 13, 1000] {
            assert_eq!(build_histogram(&px, 1, hint).unwrap(), single, "hint {hint}");
        }

        // chunk lengths that are multiples of the stride sample the same pixels
        let px = gradient(240);
        let single = build_histogram(&px, 4, 1).unwrap();
        assert_eq!(build_histogram(&px, 4, 3).unwrap(), single);
        assert_eq!(build_histogram(&px, 4, 6).unwrap(), single);
    }

    #[test]
    fn stride_samples_chunk_local_indices() {
        // two chunks of 3 pixels: indices 0 and 2 of each chunk are sampled
        let mut px = Vec::new();
        for color in [[255, 0, 0, 255], [0, 255, 0, 255], [0, 0, 255, 255]] {
            px.extend_from_slice(&color);
        }
        let twice: Vec<u8> = px.iter().chain(px.iter()).copied().collect();
        let hist = build_histogram(&twice, 2, 2).unwrap();
        assert_eq!(hist.count(quantize([255, 0, 0, 255])), 2);
        assert_eq!(hist.count(quantize([0, 255, 0, 255])), 0);
        assert_eq!(hist.count(quantize([0, 0, 255, 255])), 2);
    }

    #[test]
    fn zero_downsample_is_clamped() {
        let px = gradient(50);
        assert_eq!(build_histogram(&px, 0, 2).unwrap(), build_histogram(&px, 1, 2).unwrap());
    }

    #[test]
    fn empty_or_ragged_buffer_is_rejected() {
        assert!(matches!(build_histogram(&[], 1, 4), Err(AccentError::InvalidInput { .. })));
        assert!(matches!(build_histogram(&[1, 2, 3], 1, 1), Err(AccentError::InvalidInput { .. })));
    }

    #[test]
    fn merge_adds_counts() {
        let mut a = [0u64; BIN_COUNT];
        let mut b = [0u64; BIN_COUNT];
        a[3] = 2;
        b[3] = 5;
        b[400] = 1;
        let merged = Histogram::from_counts(a).merge(Histogram::from_counts(b));
        assert_eq!(merged.count(3), 7);
        assert_eq!(merged.count(400), 1);
        assert_eq!(merged.total(), 8);
        assert_eq!(merged.populated().collect::<Vec<_>>(), vec![(3, 7), (400, 1)]);
    }
}
