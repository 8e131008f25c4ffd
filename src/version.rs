// Version information for the embedding server

/// Full version string
pub const VERSION: &str = "v0.1.0-minilm-embeddings-2025-10-19";

/// Semantic version number
pub const VERSION_NUMBER: &str = env!("CARGO_PKG_VERSION");

/// Build date
pub const BUILD_DATE: &str = "2025-10-19";
