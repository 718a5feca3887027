pub mod config;
pub mod logging;

// Pure filename synthesis
pub mod record;
pub mod template;
pub mod tokens;

// Host integration
pub mod host;
pub mod pipeline;
