// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Site configuration from the page's `#vitrine-config` JSON block.

use vitrine_core::config::SiteConfig;
use vitrine_core::error::ConfigError;

/// Id of the `<script type="application/json">` element holding overrides.
pub(crate) const CONFIG_ELEMENT_ID: &str = "vitrine-config";

/// Parses and validates a configuration block.
pub(crate) fn parse(text: &str) -> Result<SiteConfig, ConfigError> {
    let config: SiteConfig =
        serde_json::from_str(text).map_err(|err| ConfigError::Parse(err.to_string()))?;
    config.validate()?;
    Ok(config)
}

/// The configuration to run with, plus the reason the supplied block was
/// ignored, if it was.
///
/// A missing or blank block means the defaults.
pub(crate) fn resolve(text: Option<&str>) -> (SiteConfig, Option<ConfigError>) {
    match text.map(str::trim).filter(|t| !t.is_empty()) {
        None => (SiteConfig::default(), None),
        Some(text) => match parse(text) {
            Ok(config) => (config, None),
            Err(err) => (SiteConfig::default(), Some(err)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_core::carousel::KeyboardScope;
    use vitrine_core::config::LogLevel;
    use vitrine_core::time::Duration;

    #[test]
    fn absent_block_uses_defaults() {
        assert_eq!(resolve(None), (SiteConfig::default(), None));
        assert_eq!(resolve(Some("  \n ")), (SiteConfig::default(), None));
    }

    #[test]
    fn partial_block_overrides_only_named_fields() {
        let (config, err) = resolve(Some(
            r#"{
                "carousel": { "autoplay_interval": 8000, "keyboard_scope": "carousel-focus" },
                "form": { "endpoint": "/api/contact" },
                "log_level": "debug"
            }"#,
        ));
        assert_eq!(err, None);
        assert_eq!(config.carousel.autoplay_interval, Duration(8000));
        assert_eq!(config.carousel.keyboard_scope, KeyboardScope::CarouselFocus);
        assert_eq!(config.form.endpoint.as_deref(), Some("/api/contact"));
        assert_eq!(config.form.latency, Duration(2000), "untouched field keeps default");
        assert_eq!(config.log_level, LogLevel::Debug);
    }

    #[test]
    fn malformed_block_falls_back() {
        let (config, err) = resolve(Some("{ not json"));
        assert_eq!(config, SiteConfig::default());
        assert!(matches!(err, Some(ConfigError::Parse(_))), "got {err:?}");
    }

    #[test]
    fn invalid_block_falls_back() {
        let (config, err) = resolve(Some(r#"{ "typing": { "phrases": [] } }"#));
        assert_eq!(config, SiteConfig::default());
        assert_eq!(err, Some(ConfigError::NoPhrases));
    }
}
