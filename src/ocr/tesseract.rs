//! OCR through poppler's `pdftoppm` and the `tesseract` CLI.

use std::fs::{self, File};
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::Duration;

use crate::error::{Error, Result};

use super::process::run_with_timeout;
use super::{OcrConfig, OcrEngine};

/// Upper bound for the tool version probes.
const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// OCR provider backed by external poppler and Tesseract binaries.
///
/// Tool availability is probed once, at construction.
#[derive(Debug, Clone)]
pub struct TesseractOcr {
    config: OcrConfig,
    available: bool,
}

impl TesseractOcr {
    /// Create a provider and probe for the configured tools.
    pub fn new(config: OcrConfig) -> Self {
        let available = tools_available(&config);
        if available {
            log::info!(
                "OCR enabled (tesseract, language {})",
                config.language
            );
        } else {
            log::warn!("pdftoppm or tesseract not found, OCR disabled");
        }
        Self { config, available }
    }

    /// Create a provider with the default configuration.
    pub fn detect() -> Self {
        Self::new(OcrConfig::default())
    }

    /// Get the provider configuration.
    pub fn config(&self) -> &OcrConfig {
        &self.config
    }

    fn render_page(&self, pdf: &Path, page_number: u32, dpi: u32, out_base: &Path) -> Result<()> {
        let page = page_number.to_string();
        let dpi = dpi.to_string();
        let mut command = Command::new(&self.config.pdftoppm);
        command
            .args(["-f", page.as_str(), "-l", page.as_str()])
            .args(["-r", dpi.as_str()])
            .args(["-png", "-singlefile"])
            .arg(pdf)
            .arg(out_base);
        self.run_tool(command, "pdftoppm", out_base)
    }

    fn recognize_image(&self, image: &Path, out_base: &Path) -> Result<()> {
        let mut command = Command::new(&self.config.tesseract);
        command
            .arg(image)
            .arg(out_base)
            .args(["-l", self.config.language.as_str()]);
        self.run_tool(command, "tesseract", out_base)
    }

    /// Run one tool with stdout discarded and stderr kept for diagnostics.
    fn run_tool(&self, mut command: Command, tool: &str, out_base: &Path) -> Result<()> {
        let stderr_path = out_base.with_extension(format!("{}.err", tool));
        command
            .stdout(Stdio::null())
            .stderr(Stdio::from(File::create(&stderr_path)?));

        let status = run_with_timeout(&mut command, self.config.timeout)?;
        if status.success() {
            return Ok(());
        }

        let stderr = fs::read_to_string(&stderr_path).unwrap_or_default();
        Err(Error::Ocr(format!(
            "{} exited with {}: {}",
            tool,
            status,
            stderr.trim()
        )))
    }
}

impl OcrEngine for TesseractOcr {
    fn name(&self) -> &str {
        "tesseract"
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn recognize_page(&self, document: &[u8], page_number: u32, dpi: u32) -> Result<String> {
        if !self.available {
            return Err(Error::Ocr("pdftoppm or tesseract is not installed".to_string()));
        }

        let dir = tempfile::tempdir()?;
        let pdf = dir.path().join("input.pdf");
        fs::write(&pdf, document)?;

        let page_base = dir.path().join("page");
        self.render_page(&pdf, page_number, dpi, &page_base)?;

        let text_base = dir.path().join("text");
        self.recognize_image(&page_base.with_extension("png"), &text_base)?;

        let raw = fs::read(text_base.with_extension("txt"))?;
        let text = String::from_utf8_lossy(&raw).trim().to_string();
        log::debug!(
            "OCR recognized {} chars on page {}",
            text.chars().count(),
            page_number
        );
        Ok(text)
    }
}

/// Probe both tools by asking for their versions.
fn tools_available(config: &OcrConfig) -> bool {
    let probe = |program: &Path, flag: &str| {
        let mut command = Command::new(program);
        command.arg(flag).stdout(Stdio::null()).stderr(Stdio::null());
        match run_with_timeout(&mut command, PROBE_TIMEOUT) {
            Ok(_) => true,
            Err(e) => {
                log::debug!("OCR tool probe failed: {}", e);
                false
            }
        }
    };

    // Short-circuit: tesseract is not probed when pdftoppm is missing
    probe(config.pdftoppm.as_path(), "-v") && probe(config.tesseract.as_path(), "--version")
}
