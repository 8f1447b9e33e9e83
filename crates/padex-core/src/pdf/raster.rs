//! First-page rasterization through poppler's pdftoppm.

use std::io::Write;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::RasterError;
use crate::models::config::RasterConfig;

/// A rasterized PDF page.
#[derive(Debug, Clone)]
pub struct RasterPage {
    /// PNG-encoded pixels.
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Port for turning the first PDF page into an image.
///
/// Injected into the extraction pipeline so tests and offline runs never
/// touch the external binary.
#[async_trait]
pub trait PageRasterizer: Send + Sync {
    async fn rasterize_first_page(&self, pdf: &[u8]) -> Result<RasterPage, RasterError>;
}

/// Production rasterizer shelling out to `pdftoppm`.
///
/// Invariants: both temp locations are RAII-owned, so no temp file
/// survives a call on any exit path; the child is killed and reaped when
/// the wall-clock limit expires.
pub struct PdftoppmRasterizer {
    config: RasterConfig,
}

impl PdftoppmRasterizer {
    pub fn new(config: RasterConfig) -> Self {
        Self { config }
    }

    /// Check whether the configured binary is runnable.
    pub async fn is_available(&self) -> bool {
        Command::new(&self.config.tool)
            .arg("-v")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .is_ok()
    }
}

impl Default for PdftoppmRasterizer {
    fn default() -> Self {
        Self::new(RasterConfig::default())
    }
}

#[async_trait]
impl PageRasterizer for PdftoppmRasterizer {
    async fn rasterize_first_page(&self, pdf: &[u8]) -> Result<RasterPage, RasterError> {
        let mut input = tempfile::Builder::new()
            .prefix("padex-raster-in")
            .suffix(".pdf")
            .tempfile()?;
        input.write_all(pdf)?;
        input.flush()?;

        let out_dir = tempfile::Builder::new()
            .prefix("padex-raster-out")
            .tempdir()?;
        let prefix = out_dir.path().join("page");

        let mut command = Command::new(&self.config.tool);
        command
            .arg("-png")
            .arg("-r")
            .arg(self.config.dpi.to_string())
            .arg("-f")
            .arg("1")
            .arg("-l")
            .arg("1")
            .arg("-singlefile")
            .arg(input.path())
            .arg(&prefix)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let limit = Duration::from_secs(self.config.timeout_secs);
        let output = match tokio::time::timeout(limit, command.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(RasterError::ToolMissing(self.config.tool.clone()));
            }
            Ok(Err(e)) => return Err(RasterError::Io(e)),
            Err(_) => {
                warn!(
                    "{} timed out after {}s, killing it",
                    self.config.tool, self.config.timeout_secs
                );
                return Err(RasterError::Timeout(self.config.timeout_secs));
            }
        };

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(RasterError::Failed { code, stderr });
        }

        let out_path = prefix.with_extension("png");
        let png = std::fs::read(&out_path).map_err(|_| RasterError::NoOutput)?;

        let (width, height) = image::load_from_memory(&png)
            .map(|img| (img.width(), img.height()))
            .unwrap_or((0, 0));

        debug!(
            "Rasterized page 1 to {}x{} at {} dpi",
            width, height, self.config.dpi
        );

        Ok(RasterPage { png, width, height })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_residue() -> usize {
        std::fs::read_dir(std::env::temp_dir())
            .map(|entries| {
                entries
                    .filter_map(|e| e.ok())
                    .filter(|e| {
                        e.file_name()
                            .to_string_lossy()
                            .starts_with("padex-raster")
                    })
                    .count()
            })
            .unwrap_or(0)
    }

    #[tokio::test]
    async fn test_garbage_pdf_fails_and_cleans_up() {
        let before = temp_residue();

        let rasterizer = PdftoppmRasterizer::default();
        let result = rasterizer.rasterize_first_page(b"0123456789").await;

        assert!(result.is_err());
        assert_eq!(temp_residue(), before);
    }

    #[tokio::test]
    async fn test_missing_tool_is_reported() {
        let rasterizer = PdftoppmRasterizer::new(RasterConfig {
            tool: "padex-no-such-rasterizer".to_string(),
            ..Default::default()
        });

        let result = rasterizer.rasterize_first_page(b"0123456789").await;
        assert!(matches!(result, Err(RasterError::ToolMissing(_))));
    }
}
