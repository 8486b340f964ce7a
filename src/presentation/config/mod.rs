mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    ChunkingSettings, DatabaseSettings, LlmSettings, QdrantSettings, ServerSettings, Settings,
    SettingsError,
};
