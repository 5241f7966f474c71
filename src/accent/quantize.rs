/// Number of coarse color bins: 3 bits for each of R, G and B.
pub const BIN_COUNT: usize = 512;

const SHIFT: u32 = 5;
const CHANNEL_MASK: u16 = 0x7;

/// Packs the top 3 bits of each color channel into a bin index in `0..512`.
/// Alpha is ignored.
#[inline]
pub fn quantize(pixel: [u8; 4]) -> usize {
    let [r, g, b, _a] = pixel;
    (((r >> SHIFT) as usize) << 6) | (((g >> SHIFT) as usize) << 3) | ((b >> SHIFT) as usize)
}

/// Unpacks a bin index into the color at the low edge of the bin.
#[inline]
pub fn decode(bin: usize) -> (u8, u8, u8) {
    let bin = bin as u16;
    let r = ((bin >> 6) & CHANNEL_MASK) << SHIFT;
    let g = ((bin >> 3) & CHANNEL_MASK) << SHIFT;
    let b = (bin & CHANNEL_MASK) << SHIFT;
    (r as u8, g as u8, b as u8)
}

/// Additive brightness of a decoded bin (R + G + B), in `0..=672`.
#[inline]
pub fn brightness(bin: usize) -> u16 {
    let (r, g, b) = decode(bin);
    r as u16 + g as u16 + b as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantize_is_total_and_ignores_alpha() {
        for r in (0..=255u8).step_by(7) {
            for g in (0..=255u8).step_by(11) {
                for b in (0..=255u8).step_by(13) {
                    let bin = quantize([r, g, b, 0]);
                    assert!(bin < BIN_COUNT);
                    assert_eq!(bin, quantize([r, g, b, 255]));
                }
            }
        }
        assert_eq!(quantize([255, 255, 255, 255]), BIN_COUNT - 1);
        assert_eq!(quantize([0, 0, 0, 0]), 0);
    }

    #[test]
    fn decode_then_quantize_returns_same_bin() {
        for bin in 0..BIN_COUNT {
            let (r, g, b) = decode(bin);
            assert_eq!(quantize([r, g, b, 255]), bin);
        }
    }

    #[test]
    fn decode_uses_low_edge_of_bin() {
        assert_eq!(decode(quantize([255, 0, 0, 255])), (224, 0, 0));
        assert_eq!(decode(quantize([31, 63, 95, 255])), (0, 32, 64));
        assert_eq!(brightness(BIN_COUNT - 1), 672);
        assert_eq!(brightness(0), 0);
    }
}
