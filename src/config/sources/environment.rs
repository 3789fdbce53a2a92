//! Environment variable source: PATHSTORE_* prefix with __ separator

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::Environment;

/// Prefix of every configuration variable
pub const ENV_PREFIX: &str = "PATHSTORE";

/// Add environment variable overlay to builder.
/// `PATHSTORE_STORE__MAX_NODES=100` sets `store.max_nodes`.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );
    Ok(builder)
}
