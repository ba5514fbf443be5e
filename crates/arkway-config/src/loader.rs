use std::path::Path;

use http::HeaderName;

use crate::Config;

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        let config = Self::from_toml(&raw)?;

        tracing::debug!(path = %path.display(), model = %config.model.name, "loaded configuration");

        Ok(config)
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if expansion, parsing, or validation fails
    pub fn from_toml(raw: &str) -> anyhow::Result<Self> {
        let expanded =
            crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid setting
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_model()?;
        self.validate_provider()?;
        Ok(())
    }

    fn validate_model(&self) -> anyhow::Result<()> {
        if self.model.name.trim().is_empty() {
            anyhow::bail!("model.name must not be empty");
        }

        Ok(())
    }

    fn validate_provider(&self) -> anyhow::Result<()> {
        let base_url = self.provider.base_url();
        if !matches!(base_url.scheme(), "http" | "https") {
            anyhow::bail!("provider.base_url must use http or https, got '{}'", base_url.scheme());
        }

        for name in self.provider.headers.keys() {
            HeaderName::try_from(name.as_str())
                .map_err(|e| anyhow::anyhow!("invalid header name '{name}' in provider.headers: {e}"))?;
        }

        self.provider.timeout()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use secrecy::ExposeSecret;

    use crate::Config;

    #[test]
    fn minimal_config() {
        let config = Config::from_toml("[model]\nname = \"openai/doubao-seed-1-6\"\n").unwrap();
        assert_eq!(config.model.name, "openai/doubao-seed-1-6");
        assert!(config.provider.api_key.is_none());
    }

    #[test]
    fn model_section_is_required() {
        let err = Config::from_toml("[provider]\ntimeout = \"10s\"\n").unwrap_err();
        assert!(err.to_string().contains("failed to parse config"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = Config::from_toml("[model]\nname = \"openai/x\"\ncolour = \"blue\"\n").unwrap_err();
        assert!(err.to_string().contains("failed to parse config"));
    }

    #[test]
    fn empty_model_name_fails_validation() {
        let err = Config::from_toml("[model]\nname = \"  \"\n").unwrap_err();
        assert!(err.to_string().contains("model.name"));
    }

    #[test]
    fn non_http_base_url_fails_validation() {
        let raw = "[provider]\nbase_url = \"ftp://example.com\"\n[model]\nname = \"openai/x\"\n";
        let err = Config::from_toml(raw).unwrap_err();
        assert!(err.to_string().contains("http or https"));
    }

    #[test]
    fn invalid_header_name_fails_validation() {
        let raw = "[provider.headers]\n\"bad header\" = \"v\"\n[model]\nname = \"openai/x\"\n";
        let err = Config::from_toml(raw).unwrap_err();
        assert!(err.to_string().contains("bad header"));
    }

    #[test]
    fn load_expands_environment() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[provider]\napi_key = \"{{{{ env.ARKWAY_LOADER_KEY }}}}\"\n\n[model]\nname = \"openai/doubao-seed-1-6\""
        )
        .unwrap();

        temp_env::with_var("ARKWAY_LOADER_KEY", Some("ark-from-env"), || {
            let config = Config::load(file.path()).unwrap();
            assert_eq!(config.provider.api_key.unwrap().expose_secret(), "ark-from-env");
        });
    }

    #[test]
    fn load_reports_missing_file() {
        let err = Config::load(std::path::Path::new("/nonexistent/arkway.toml")).unwrap_err();
        assert!(err.to_string().contains("failed to read config file"));
    }
}
