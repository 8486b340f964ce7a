use thiserror::Error;

use super::Environment;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("missing required environment variable {0}")]
    MissingVariable(&'static str),
    #[error("invalid value for {variable}: {message}")]
    InvalidValue {
        variable: &'static str,
        message: String,
    },
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub environment: Environment,
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub qdrant: QdrantSettings,
    pub chunking: ChunkingSettings,
    pub llm: LlmSettings,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct QdrantSettings {
    pub url: String,
    pub collection_name: String,
}

#[derive(Debug, Clone)]
pub struct ChunkingSettings {
    pub max_chunk_chars: usize,
    pub overlap_chars: usize,
}

#[derive(Debug, Clone)]
pub struct LlmSettings {
    pub api_key: String,
    pub embedding_model: String,
    pub embedding_batch_size: usize,
    pub chat_model: String,
    pub top_k: u64,
}

impl Settings {
    /// Reads configuration from the environment. Only secrets and
    /// connection strings are required; tunables default sensibly.
    pub fn from_env() -> Result<Self, SettingsError> {
        Ok(Self {
            environment: Environment::try_from(
                optional("APP_ENV").unwrap_or_else(|| "local".to_string()),
            )
            .map_err(|message| SettingsError::InvalidValue {
                variable: "APP_ENV",
                message,
            })?,
            server: ServerSettings {
                host: optional("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port: parsed("PORT", 8080)?,
            },
            database: DatabaseSettings {
                url: required("DATABASE_URL")?,
                max_connections: parsed("DATABASE_MAX_CONNECTIONS", 10)?,
            },
            qdrant: QdrantSettings {
                url: optional("QDRANT_URL").unwrap_or_else(|| "http://localhost:6334".to_string()),
                collection_name: optional("QDRANT_COLLECTION")
                    .unwrap_or_else(|| "carbon_documents".to_string()),
            },
            chunking: ChunkingSettings {
                max_chunk_chars: parsed("CHUNK_MAX_CHARS", 1200)?,
                overlap_chars: parsed("CHUNK_OVERLAP_CHARS", 200)?,
            },
            llm: LlmSettings {
                api_key: required("OPENAI_API_KEY")?,
                embedding_model: optional("EMBEDDING_MODEL")
                    .unwrap_or_else(|| "text-embedding-3-small".to_string()),
                embedding_batch_size: parsed("EMBEDDING_BATCH_SIZE", 64)?,
                chat_model: optional("CHAT_MODEL").unwrap_or_else(|| "gpt-4o-mini".to_string()),
                top_k: parsed("RETRIEVAL_TOP_K", 5)?,
            },
        })
    }
}

fn optional(variable: &'static str) -> Option<String> {
    std::env::var(variable).ok().filter(|v| !v.is_empty())
}

fn required(variable: &'static str) -> Result<String, SettingsError> {
    optional(variable).ok_or(SettingsError::MissingVariable(variable))
}

fn parsed<T: std::str::FromStr>(variable: &'static str, default: T) -> Result<T, SettingsError>
where
    T::Err: std::fmt::Display,
{
    match optional(variable) {
        Some(raw) => raw.parse().map_err(|e: T::Err| SettingsError::InvalidValue {
            variable,
            message: e.to_string(),
        }),
        None => Ok(default),
    }
}
