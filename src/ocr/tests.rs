#[cfg(test)]
mod tests {
    use crate::ocr::error::{OcrDiagnostics, OcrError};
    use crate::ocr::health::parse_language_list;
    use crate::ocr::tsv::fragments_from_tsv;
    use crate::ocr::{FigureDetector, OcrService, OcrSettings, TextRecognizer};

    const TSV_HEADER: &str =
        "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext";

    fn word(block: u32, line: u32, word_num: u32, conf: f32, text: &str) -> String {
        format!("5\t1\t{}\t1\t{}\t{}\t10\t10\t40\t12\t{}\t{}", block, line, word_num, conf, text)
    }

    fn settings(max_width: u32, max_height: u32) -> OcrSettings {
        OcrSettings {
            language: "eng".to_string(),
            tessdata_path: None,
            timeout_seconds: 5,
            max_image_width: max_width,
            max_image_height: max_height,
        }
    }

    #[test]
    fn test_tsv_groups_words_into_lines() {
        let tsv = [
            TSV_HEADER.to_string(),
            "1\t1\t0\t0\t0\t0\t0\t0\t800\t600\t-1\t".to_string(),
            "4\t1\t1\t1\t1\t0\t10\t10\t200\t12\t-1\t".to_string(),
            word(1, 1, 1, 90.0, "Total:"),
            word(1, 1, 2, 80.0, "12"),
            word(1, 2, 1, 70.0, "and"),
            word(1, 2, 2, 60.0, "8.5"),
            word(2, 1, 1, 95.0, "Thanks"),
        ]
        .join("\n");

        let fragments = fragments_from_tsv(&tsv);
        let texts: Vec<&str> = fragments.iter().map(|f| f.text.as_str()).collect();
        assert_eq!(texts, vec!["Total: 12", "and 8.5", "Thanks"]);

        assert!((fragments[0].confidence - 0.85).abs() < 1e-6);
        assert!((fragments[1].confidence - 0.65).abs() < 1e-6);
        assert!((fragments[2].confidence - 0.95).abs() < 1e-6);
    }

    #[test]
    fn test_tsv_skips_empty_words_and_clamps_confidence() {
        let tsv = [
            TSV_HEADER.to_string(),
            word(1, 1, 1, -1.0, ""),
            word(1, 1, 2, -1.0, "   "),
            word(1, 1, 3, -1.0, "42"),
            word(1, 2, 1, 250.0, "7"),
        ]
        .join("\n");

        let fragments = fragments_from_tsv(&tsv);
        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[0].text, "42");
        assert_eq!(fragments[0].confidence, 0.0);
        assert_eq!(fragments[1].confidence, 1.0);
    }

    #[test]
    fn test_tsv_ignores_truncated_rows() {
        let tsv = format!("{}\n5\t1\t1\n{}\n", TSV_HEADER, word(1, 1, 1, 50.0, "3"));
        let fragments = fragments_from_tsv(&tsv);
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].text, "3");

        assert!(fragments_from_tsv("").is_empty());
        assert!(fragments_from_tsv(TSV_HEADER).is_empty());
    }

    #[test]
    fn test_parse_language_list() {
        let output = "List of available languages in \"/usr/share/tessdata/\" (3):\neng\nosd\n\nspa\neng\n";
        assert_eq!(parse_language_list(output), vec!["eng", "osd", "spa"]);
        assert!(parse_language_list("").is_empty());
    }

    #[test]
    fn test_ocr_error_classification() {
        let err = OcrError::TesseractNotInstalled;
        assert_eq!(err.error_code(), "OCR_NOT_INSTALLED");
        assert!(err.is_configuration_error());
        assert!(!err.is_input_error());

        let err = OcrError::ImageTooLarge {
            width: 20000,
            height: 100,
            max_width: 10000,
            max_height: 10000,
        };
        assert_eq!(err.error_code(), "OCR_IMAGE_TOO_LARGE");
        assert!(err.is_input_error());
        assert!(err.to_string().contains("20000x100"));

        let err = OcrError::LanguageDataNotFound { lang: "deu".to_string() };
        assert!(err.to_string().contains("tesseract-ocr-deu"));
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_diagnostics_language_combination() {
        let mut diagnostics = OcrDiagnostics {
            tesseract_version: Some("tesseract 5.3.0".to_string()),
            available_languages: vec!["eng".to_string(), "spa".to_string()],
            configured_language: "eng+spa".to_string(),
            tessdata_path: None,
        };
        assert!(diagnostics.language_available());

        diagnostics.configured_language = "eng+deu".to_string();
        assert!(!diagnostics.language_available());

        let rendered = diagnostics.to_string();
        assert!(rendered.contains("tesseract 5.3.0"));
        assert!(rendered.contains("Not set"));
        assert!(rendered.contains("eng, spa"));
    }

    #[test]
    fn test_settings_follow_config() {
        let config = crate::config::Config {
            ocr_language: "eng+spa".to_string(),
            ocr_timeout_seconds: 7,
            ..Default::default()
        };
        let settings = OcrSettings::from_config(&config);
        assert_eq!(settings.language, "eng+spa");
        assert_eq!(settings.timeout_seconds, 7);
        assert_eq!(settings.max_image_width, config.ocr_max_image_width);
    }

    #[cfg(not(feature = "ocr"))]
    #[tokio::test]
    async fn test_without_engine_every_call_reports_not_installed() {
        let service = OcrService::new(settings(100, 100));

        assert!(matches!(service.preflight(), Err(OcrError::TesseractNotInstalled)));
        assert!(matches!(
            service.recognize_text(b"anything").await,
            Err(OcrError::TesseractNotInstalled)
        ));
        assert!(matches!(
            service.detect_fragments(std::path::Path::new("/nonexistent.png")).await,
            Err(OcrError::TesseractNotInstalled)
        ));
    }

    #[cfg(feature = "ocr")]
    fn encoded_png(width: u32, height: u32) -> Vec<u8> {
        let mut buffer = std::io::Cursor::new(Vec::new());
        image::RgbImage::new(width, height)
            .write_to(&mut buffer, image::ImageFormat::Png)
            .unwrap();
        buffer.into_inner()
    }

    #[cfg(feature = "ocr")]
    #[tokio::test]
    async fn test_oversized_image_is_rejected_before_recognition() {
        let service = OcrService::new(settings(10, 10));
        let result = service.recognize_text(&encoded_png(20, 5)).await;

        match result {
            Err(OcrError::ImageTooLarge { width, height, .. }) => {
                assert_eq!((width, height), (20, 5));
            }
            other => panic!("expected ImageTooLarge, got {:?}", other),
        }
    }

    #[cfg(feature = "ocr")]
    #[tokio::test]
    async fn test_undecodable_file_is_invalid_format() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("garbage.png");
        std::fs::write(&path, b"definitely not an image").unwrap();

        let service = OcrService::new(settings(100, 100));
        let result = service.detect_fragments(&path).await;
        assert!(matches!(result, Err(OcrError::InvalidImageFormat { .. })));
    }
}
