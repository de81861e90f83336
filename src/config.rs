//! Service configuration, read once from the environment at startup.
//!
//! Business logic never reads environment variables itself; the resolved
//! [`AppConfig`] is handed to the components that need it.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Default listen port.
pub const DEFAULT_PORT: u16 = 3000;
/// Default quote source.
const DEFAULT_QUOTES_FILE: &str = "data/quotes.json";
/// Default page size.
const DEFAULT_PAGE_SIZE: usize = 10;
/// Default upper bound on page size.
const DEFAULT_MAX_PAGE_SIZE: usize = 100;
/// Default provider HTTP timeout.
const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 30;

const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Configuration errors. All are fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A numeric variable did not parse.
    #[error("invalid value for {key}: {value:?}")]
    InvalidNumber {
        /// Variable name.
        key: String,
        /// Raw value.
        value: String,
    },

    /// A value is out of range or inconsistent with another.
    #[error("invalid configuration: {0}")]
    Invalid(String),

    /// A base URL did not parse.
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Which remote generation provider to call.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum ProviderKind {
    /// Google Gemini `generateContent`.
    #[default]
    Gemini,
    /// Any OpenAI-compatible `/chat/completions` endpoint.
    OpenAi,
    /// Never call a provider; always use the fallback.
    Disabled,
}

impl ProviderKind {
    /// Parse a provider name. Unrecognized names disable generation.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "gemini" | "google" => Self::Gemini,
            "openai" => Self::OpenAi,
            "" | "none" | "fallback" => Self::Disabled,
            other => {
                tracing::warn!("Unknown AI_PROVIDER {other:?}, chat will use fallback replies");
                Self::Disabled
            }
        }
    }
}

/// Connection settings for one provider.
#[derive(Clone)]
pub struct ProviderSettings {
    /// API key. `None` disables this provider.
    pub api_key: Option<String>,
    /// Model identifier.
    pub model: String,
    /// API base URL, without trailing slash.
    pub base_url: String,
}

impl fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Generation provider configuration.
#[derive(Clone, Debug)]
pub struct LlmConfig {
    /// Selected provider.
    pub provider: ProviderKind,
    /// Gemini settings.
    pub gemini: ProviderSettings,
    /// OpenAI-compatible settings.
    pub openai: ProviderSettings,
    /// Whole-request timeout for provider calls.
    pub timeout: Duration,
}

impl LlmConfig {
    /// Settings of the selected provider, if it has an API key.
    #[must_use]
    pub fn active(&self) -> Option<&ProviderSettings> {
        let settings = match self.provider {
            ProviderKind::Gemini => &self.gemini,
            ProviderKind::OpenAi => &self.openai,
            ProviderKind::Disabled => return None,
        };
        settings.api_key.as_ref().map(|_| settings)
    }
}

/// Page size bounds applied at the HTTP boundary.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PaginationConfig {
    /// Limit used when the caller gives none.
    pub default_limit: usize,
    /// Largest accepted limit.
    pub max_limit: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_PAGE_SIZE,
            max_limit: DEFAULT_MAX_PAGE_SIZE,
        }
    }
}

/// Fully resolved service configuration.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Listen port.
    pub port: u16,
    /// JSON quote source.
    pub quotes_file: PathBuf,
    /// Optional directory of static client files served at `/`.
    pub static_dir: Option<PathBuf>,
    /// Page size bounds.
    pub pagination: PaginationConfig,
    /// Generation provider settings.
    pub llm: LlmConfig,
}

impl AppConfig {
    /// Read configuration from the process environment.
    ///
    /// # Errors
    /// Returns an error if a variable is malformed or out of range.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to its
    /// value.
    ///
    /// # Errors
    /// Returns an error if a variable is malformed or out of range.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let text = |key: &str, default: &str| var(key).unwrap_or_else(|| default.to_string());

        let config = Self {
            port: parse_or(&var, "PORT", DEFAULT_PORT)?,
            quotes_file: PathBuf::from(text("QUOTES_FILE", DEFAULT_QUOTES_FILE)),
            static_dir: var("STATIC_DIR").map(PathBuf::from),
            pagination: PaginationConfig {
                default_limit: parse_or(&var, "DEFAULT_PAGE_SIZE", DEFAULT_PAGE_SIZE)?,
                max_limit: parse_or(&var, "MAX_PAGE_SIZE", DEFAULT_MAX_PAGE_SIZE)?,
            },
            llm: LlmConfig {
                provider: var("AI_PROVIDER").map_or_else(ProviderKind::default, |p| {
                    ProviderKind::from_name(&p)
                }),
                gemini: ProviderSettings {
                    api_key: var("GEMINI_API_KEY"),
                    model: text("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
                    base_url: trim_slash(text("GEMINI_BASE_URL", DEFAULT_GEMINI_BASE_URL)),
                },
                openai: ProviderSettings {
                    api_key: var("OPENAI_API_KEY"),
                    model: text("OPENAI_MODEL", DEFAULT_OPENAI_MODEL),
                    base_url: trim_slash(text("OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL)),
                },
                timeout: Duration::from_secs(parse_or(
                    &var,
                    "PROVIDER_TIMEOUT_SECS",
                    DEFAULT_PROVIDER_TIMEOUT_SECS,
                )?),
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration invariants.
    ///
    /// # Errors
    /// Returns an error if any values are out of range or invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pagination.max_limit == 0 {
            return Err(ConfigError::Invalid("MAX_PAGE_SIZE must be > 0".to_string()));
        }

        if self.pagination.default_limit == 0 {
            return Err(ConfigError::Invalid("DEFAULT_PAGE_SIZE must be > 0".to_string()));
        }

        if self.pagination.default_limit > self.pagination.max_limit {
            return Err(ConfigError::Invalid(
                "DEFAULT_PAGE_SIZE must not exceed MAX_PAGE_SIZE".to_string(),
            ));
        }

        if self.llm.timeout.is_zero() {
            return Err(ConfigError::Invalid(
                "PROVIDER_TIMEOUT_SECS must be > 0".to_string(),
            ));
        }

        Url::parse(&self.llm.gemini.base_url)?;
        Url::parse(&self.llm.openai.base_url)?;

        Ok(())
    }
}

fn parse_or<T, F>(var: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    var(key).map_or(Ok(default), |raw| {
        raw.parse().map_err(|_| ConfigError::InvalidNumber {
            key: key.to_string(),
            value: raw,
        })
    })
}

fn trim_slash(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
