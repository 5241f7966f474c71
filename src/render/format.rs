use crate::accent::color::Color;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `#rrggbb`
    #[default]
    Hex,
    /// `rgb(r, g, b)`
    Rgb,
    /// `accent = "#rrggbb"`, ready to paste into a theme file
    Toml,
}

pub fn format_color(color: Color, format: OutputFormat) -> String {
    match format {
        OutputFormat::Hex => color.to_hex(),
        OutputFormat::Rgb => format!("rgb({}, {}, {})", color.r, color.g, color.b),
        OutputFormat::Toml => format!("accent = \"{}\"", color.to_hex()),
    }
}
