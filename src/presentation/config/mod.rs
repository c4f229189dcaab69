mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{AiSettings, RetentionSettings, ServerSettings, Settings, StorageSettings};
