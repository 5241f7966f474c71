//! Accent color extraction from RGBA8 images.
//!
//! Pixels are quantized into 512 coarse bins (3 bits per channel) on a bounded
//! rayon pool, the most frequent bins are re-ranked by brightness, and the bin a
//! quarter of the way down that ranking becomes the accent.
//!
//! ```no_run
//! use accent_color::{AccentExtractor, AccentRequest};
//!
//! let img = image::open("cover.png")?.to_rgba8();
//! let request = AccentRequest::from_image(&img, 2)?;
//! let accent = AccentExtractor::with_default_hint()?.extract(&request)?;
//! println!("{accent}");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod accent;
pub mod app;
pub mod data;
pub mod error;
pub mod render;
pub mod utils;

pub use accent::color::Color;
pub use accent::extractor::{extract_accent, AccentExtractor};
pub use accent::histogram::{build_histogram, Histogram};
pub use accent::quantize::{decode, quantize, BIN_COUNT};
pub use accent::request::AccentRequest;
pub use accent::select::{rank_bins, select_accent, Ranking};
pub use app::worker::{AccentHandle, AccentJob, AccentOutcome};
pub use error::{AccentError, Result};
