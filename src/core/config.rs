use anyhow::{Result, bail};
use std::path::PathBuf;

pub const DEFAULT_API_HOST: &str = "127.0.0.1";
pub const DEFAULT_API_PORT: u16 = 3000;
const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub model: String,
}

#[derive(Debug, Clone)]
pub struct FirecrawlConfig {
    pub api_key: String,
}

#[derive(Debug, Clone)]
pub struct TypefullyConfig {
    pub api_key: String,
}

/// Runtime configuration, built once at startup and passed by parameter into
/// everything that needs it.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_host: String,
    pub api_port: u16,
    pub data_dir: PathBuf,
    pub openai: OpenAiConfig,
    pub firecrawl: FirecrawlConfig,
    pub typefully: TypefullyConfig,
}

impl Config {
    /// Read configuration from process environment variables. All collaborator
    /// API keys are required; the daemon refuses to start with a partial set.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = ["OPENAI_API_KEY", "FIRECRAWL_API_KEY", "TYPEFULLY_API_KEY"];
        let mut missing = Vec::new();
        for key in required {
            let present = get(key).map(|v| !v.trim().is_empty()).unwrap_or(false);
            if !present {
                missing.push(key);
            }
        }
        if !missing.is_empty() {
            bail!(
                "Missing required environment variables: {}",
                missing.join(", ")
            );
        }

        let api_host = get("PLUME_API_HOST").unwrap_or_else(|| DEFAULT_API_HOST.to_string());
        let api_port = match get("PLUME_API_PORT") {
            Some(raw) => match raw.parse() {
                Ok(port) => port,
                Err(_) => bail!("PLUME_API_PORT must be a port number, got '{}'", raw),
            },
            None => DEFAULT_API_PORT,
        };
        let data_dir = match get("PLUME_DATA_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("plume"),
        };

        Ok(Self {
            api_host,
            api_port,
            data_dir,
            openai: OpenAiConfig {
                api_key: get("OPENAI_API_KEY").unwrap_or_default(),
                model: get("PLUME_OPENAI_MODEL")
                    .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            },
            firecrawl: FirecrawlConfig {
                api_key: get("FIRECRAWL_API_KEY").unwrap_or_default(),
            },
            typefully: TypefullyConfig {
                api_key: get("TYPEFULLY_API_KEY").unwrap_or_default(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        let map: HashMap<&str, &str> = vars.iter().copied().collect();
        move |key| map.get(key).map(|v| v.to_string())
    }

    fn required_keys() -> Vec<(&'static str, &'static str)> {
        vec![
            ("OPENAI_API_KEY", "sk-test"),
            ("FIRECRAWL_API_KEY", "fc-test"),
            ("TYPEFULLY_API_KEY", "tf-test"),
        ]
    }

    #[test]
    fn all_missing_keys_are_reported_together() {
        let err = Config::from_lookup(|_| None).unwrap_err().to_string();
        assert!(err.contains("OPENAI_API_KEY"));
        assert!(err.contains("FIRECRAWL_API_KEY"));
        assert!(err.contains("TYPEFULLY_API_KEY"));
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let mut vars = required_keys();
        vars[0].1 = "   ";
        let err = Config::from_lookup(lookup(&vars)).unwrap_err().to_string();
        assert!(err.contains("OPENAI_API_KEY"));
        assert!(!err.contains("FIRECRAWL_API_KEY"));
    }

    #[test]
    fn defaults_are_applied() {
        let vars = required_keys();
        let config = Config::from_lookup(lookup(&vars)).unwrap();
        assert_eq!(config.api_host, DEFAULT_API_HOST);
        assert_eq!(config.api_port, DEFAULT_API_PORT);
        assert_eq!(config.openai.model, "gpt-4o");
        assert_eq!(config.openai.api_key, "sk-test");
    }

    #[test]
    fn overrides_win_over_defaults() {
        let mut vars = required_keys();
        vars.push(("PLUME_API_HOST", "0.0.0.0"));
        vars.push(("PLUME_API_PORT", "8080"));
        vars.push(("PLUME_OPENAI_MODEL", "gpt-4o-mini"));
        vars.push(("PLUME_DATA_DIR", "/tmp/plume-test"));
        let config = Config::from_lookup(lookup(&vars)).unwrap();
        assert_eq!(config.api_host, "0.0.0.0");
        assert_eq!(config.api_port, 8080);
        assert_eq!(config.openai.model, "gpt-4o-mini");
        assert_eq!(config.data_dir, PathBuf::from("/tmp/plume-test"));
    }

    #[test]
    fn invalid_port_is_rejected() {
        let mut vars = required_keys();
        vars.push(("PLUME_API_PORT", "not-a-port"));
        let err = Config::from_lookup(lookup(&vars)).unwrap_err().to_string();
        assert!(err.contains("PLUME_API_PORT"));
    }
}
