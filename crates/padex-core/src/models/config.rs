//! Configuration structures for the extraction pipeline.

use padex_vision::OpenAiConfig;
use serde::{Deserialize, Serialize};

/// Main configuration for the padex pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PadexConfig {
    /// Extraction tuning.
    pub extraction: ExtractionConfig,

    /// Rasterizer settings.
    pub raster: RasterConfig,

    /// Vision backend settings. The API key is not stored here; it is
    /// read from the environment at backend construction.
    pub vision: OpenAiConfig,
}

/// Extraction tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Minimum embedded-text length for the pdf-text candidate. Passport
    /// data pages carry little text, so this is far lower than a typical
    /// document threshold.
    pub min_text_length: usize,

    /// Allow the rasterize-then-vision fallback for PDFs.
    pub enable_vision_fallback: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_text_length: 20,
            enable_vision_fallback: true,
        }
    }
}

/// Rasterizer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RasterConfig {
    /// DPI for rendering page 1.
    pub dpi: u32,

    /// Wall-clock limit for the external tool, in seconds.
    pub timeout_secs: u64,

    /// Rasterizer binary name.
    pub tool: String,
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            dpi: 300,
            timeout_secs: 15,
            tool: "pdftoppm".to_string(),
        }
    }
}

impl PadexConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }
}
