use crate::ocr::error::{OcrDiagnostics, OcrError};
use std::process::Command;

/// Probes the `tesseract` binary installed next to the linked library.
pub struct OcrHealthChecker {
    tessdata_path: Option<String>,
}

impl OcrHealthChecker {
    pub fn new(tessdata_path: Option<String>) -> Self {
        Self { tessdata_path }
    }

    fn tesseract_command(&self) -> Command {
        let mut command = Command::new("tesseract");
        if let Some(path) = &self.tessdata_path {
            command.env("TESSDATA_PREFIX", path);
        }
        command
    }

    pub fn check_tesseract_installation(&self) -> Result<String, OcrError> {
        let output = self
            .tesseract_command()
            .arg("--version")
            .output()
            .map_err(|_| OcrError::TesseractNotInstalled)?;

        if !output.status.success() {
            return Err(OcrError::TesseractNotInstalled);
        }

        // Older releases print the version banner on stderr
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        let version = stdout
            .lines()
            .chain(stderr.lines())
            .find(|line| !line.trim().is_empty())
            .map(|s| s.trim().to_string())
            .unwrap_or_else(|| "Unknown".to_string());

        Ok(version)
    }

    pub fn get_available_languages(&self) -> Result<Vec<String>, OcrError> {
        let output = self
            .tesseract_command()
            .arg("--list-langs")
            .output()
            .map_err(|_| OcrError::TesseractNotInstalled)?;

        if !output.status.success() {
            return Err(OcrError::TesseractNotInstalled);
        }

        let langs_output = String::from_utf8_lossy(&output.stdout);
        Ok(parse_language_list(&langs_output))
    }

    /// Validate a language combination (e.g., "eng+spa")
    pub fn validate_language_combination(&self, lang_combination: &str) -> Result<(), OcrError> {
        if lang_combination.trim().is_empty() {
            return Err(OcrError::LanguageDataNotFound {
                lang: "empty".to_string(),
            });
        }

        let available = self.get_available_languages()?;
        for lang in lang_combination.split('+').map(str::trim) {
            if !available.iter().any(|l| l == lang) {
                return Err(OcrError::LanguageDataNotFound {
                    lang: lang.to_string(),
                });
            }
        }

        Ok(())
    }

    pub fn diagnostics(&self, configured_language: &str) -> OcrDiagnostics {
        OcrDiagnostics {
            tesseract_version: self.check_tesseract_installation().ok(),
            available_languages: self.get_available_languages().unwrap_or_default(),
            configured_language: configured_language.to_string(),
            tessdata_path: self.tessdata_path.clone(),
        }
    }
}

/// `tesseract --list-langs` prints a header line followed by one code per line.
pub(crate) fn parse_language_list(output: &str) -> Vec<String> {
    let mut languages: Vec<String> = output
        .lines()
        .filter(|line| !line.starts_with("List of available languages"))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    languages.sort();
    languages.dedup();
    languages
}
