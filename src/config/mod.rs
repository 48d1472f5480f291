mod settings;

pub use settings::{
    Config, ConfigError, HttpConfig, TomlConfig, TomlHttpConfig, TomlReplayConfig, EXAMPLE_CONFIG,
};
