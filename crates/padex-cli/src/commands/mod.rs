//! CLI subcommands.

pub mod assess;
pub mod batch;
pub mod config;
pub mod extract;

use padex_core::PadexConfig;

/// Load the config file when given, else defaults.
pub fn load_config(path: Option<&str>) -> anyhow::Result<PadexConfig> {
    Ok(match path {
        Some(p) => PadexConfig::from_file(std::path::Path::new(p))?,
        None => PadexConfig::default(),
    })
}

/// Map a file extension to the MIME type the pipeline understands.
pub fn mime_for_extension(ext: &str) -> Option<&'static str> {
    match ext {
        "pdf" => Some("application/pdf"),
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "tif" | "tiff" => Some("image/tiff"),
        "bmp" => Some("image/bmp"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}
