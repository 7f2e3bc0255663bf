// =============================================================================
// CONFIGURATION
// =============================================================================
//
// Everything comes from environment variables (a `.env` file is loaded first
// by each binary if present). Credentials are required; everything else has
// a default.
//
// **Required:**
// - `SUPABASE_URL`, `SUPABASE_KEY` - vector store endpoint and key
// - `GOOGLE_API_KEY` - embedding provider
// - `GROQ_API_KEY` - completion provider (server only)
//
// **Optional:** see `AppConfig::from_lookup` for names and defaults.

use crate::core::rag::models::{CompletionConfig, RetrievalConfig};
use crate::infra::ai::gemini_client::DEFAULT_EMBEDDING_MODEL;
use crate::infra::ai::openai_compatible_client::DEFAULT_COMPLETION_BASE_URL;
use crate::infra::vector::supabase_store::{DEFAULT_MATCH_FUNCTION, DEFAULT_TABLE};
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_EMBEDDING_DIMENSIONS: usize = 768;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Missing {0} environment variable")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub url: String,
    pub key: String,
    pub table: String,
    pub match_function: String,
}

#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    pub api_key: String,
    pub model: String,
    pub dimensions: usize,
}

/// Configuration for the HTTP server.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub store: StoreConfig,
    pub embedding: EmbeddingConfig,
    pub completion_api_key: String,
    pub completion_base_url: String,
    pub completion: CompletionConfig,
    pub retrieval: RetrievalConfig,
}

/// Configuration for the seeder. `store` is `None` for a dry run.
#[derive(Debug, Clone)]
pub struct SeedConfig {
    pub store: Option<StoreConfig>,
    pub embedding: EmbeddingConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let store = store_config(&lookup)?;
        let embedding = embedding_config(&lookup)?;
        let completion_api_key = required(&lookup, "GROQ_API_KEY")?;

        let completion_defaults = CompletionConfig::default();
        let temperature: f32 = parsed(
            &lookup,
            "COMPLETION_TEMPERATURE",
            completion_defaults.temperature,
        )?;
        if !(0.0..=2.0).contains(&temperature) {
            return Err(invalid("COMPLETION_TEMPERATURE", temperature, "must be within 0..=2"));
        }

        let max_tokens: Option<u32> = parsed_optional(&lookup, "COMPLETION_MAX_TOKENS")?;
        if max_tokens == Some(0) {
            return Err(invalid("COMPLETION_MAX_TOKENS", 0, "must be at least 1"));
        }

        let retrieval_defaults = RetrievalConfig::default();
        let match_threshold: f32 =
            parsed(&lookup, "MATCH_THRESHOLD", retrieval_defaults.match_threshold)?;
        if !(-1.0..=1.0).contains(&match_threshold) {
            return Err(invalid("MATCH_THRESHOLD", match_threshold, "must be within -1..=1"));
        }
        let match_count: usize = parsed(&lookup, "MATCH_COUNT", retrieval_defaults.match_count)?;
        if match_count == 0 {
            return Err(invalid("MATCH_COUNT", match_count, "must be at least 1"));
        }

        Ok(Self {
            bind_addr: optional(&lookup, "BIND_ADDR", DEFAULT_BIND_ADDR),
            store,
            embedding,
            completion_api_key,
            completion_base_url: optional(
                &lookup,
                "COMPLETION_BASE_URL",
                DEFAULT_COMPLETION_BASE_URL,
            ),
            completion: CompletionConfig {
                model: optional(&lookup, "COMPLETION_MODEL", &completion_defaults.model),
                temperature,
                max_tokens: max_tokens.or(completion_defaults.max_tokens),
            },
            retrieval: RetrievalConfig {
                match_threshold,
                match_count,
            },
        })
    }
}

impl SeedConfig {
    pub fn from_env(dry_run: bool) -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok(), dry_run)
    }

    pub fn from_lookup<F>(lookup: F, dry_run: bool) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let store = if dry_run {
            None
        } else {
            Some(store_config(&lookup)?)
        };

        Ok(Self {
            store,
            embedding: embedding_config(&lookup)?,
        })
    }
}

fn store_config<F>(lookup: &F) -> Result<StoreConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    Ok(StoreConfig {
        url: required(lookup, "SUPABASE_URL")?,
        key: required(lookup, "SUPABASE_KEY")?,
        table: optional(lookup, "KNOWLEDGE_TABLE", DEFAULT_TABLE),
        match_function: optional(lookup, "MATCH_FUNCTION", DEFAULT_MATCH_FUNCTION),
    })
}

fn embedding_config<F>(lookup: &F) -> Result<EmbeddingConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let dimensions: usize = parsed(lookup, "EMBEDDING_DIMENSIONS", DEFAULT_EMBEDDING_DIMENSIONS)?;
    if dimensions == 0 {
        return Err(invalid("EMBEDDING_DIMENSIONS", dimensions, "must be at least 1"));
    }

    Ok(EmbeddingConfig {
        api_key: required(lookup, "GOOGLE_API_KEY")?,
        model: optional(lookup, "EMBEDDING_MODEL", DEFAULT_EMBEDDING_MODEL),
        dimensions,
    })
}

/// Empty values count as missing.
fn required<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::Missing(key))
}

fn optional<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parsed<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key).map(|v| v.trim().to_string()) {
        Some(value) if !value.is_empty() => value.parse().map_err(|_| ConfigError::Invalid {
            key,
            value,
            reason: "not a valid number",
        }),
        _ => Ok(default),
    }
}

/// Unset or blank means `None`.
fn parsed_optional<F, T>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key).map(|v| v.trim().to_string()) {
        Some(value) if !value.is_empty() => {
            value.parse().map(Some).map_err(|_| ConfigError::Invalid {
                key,
                value,
                reason: "not a valid number",
            })
        }
        _ => Ok(None),
    }
}

fn invalid(key: &'static str, value: impl ToString, reason: &'static str) -> ConfigError {
    ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason,
    }
}
