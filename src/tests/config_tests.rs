#[cfg(test)]
mod tests {
    use crate::config::Config;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.ocr_language, "eng");
        assert_eq!(config.max_upload_bytes(), 50 * 1024 * 1024);
        assert!(config.azure_credentials().is_none());
    }

    #[test]
    fn test_validation_rejects_unusable_values() {
        let config = Config {
            ocr_language: String::new(),
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            max_file_size_mb: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            ocr_timeout_seconds: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_azure_credentials_need_both_parts() {
        let config = Config {
            azure_endpoint: Some("https://example.cognitiveservices.azure.com".to_string()),
            ..Config::default()
        };
        assert!(config.azure_credentials().is_none());

        let config = Config {
            azure_endpoint: Some("https://example.cognitiveservices.azure.com".to_string()),
            azure_key: Some("secret".to_string()),
            ..Config::default()
        };
        assert_eq!(
            config.azure_credentials(),
            Some(("https://example.cognitiveservices.azure.com", "secret"))
        );
    }
}
