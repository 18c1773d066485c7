use thiserror::Error;

/// Errors raised while decoding layout requests and configuration.
///
/// The layout passes themselves never fail; degenerate input produces empty
/// results instead.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("invalid layout request: {0}")]
    InvalidRequest(#[from] serde_json::Error),
    #[error("invalid scale: {0}")]
    InvalidScale(String),
    #[error("invalid font shorthand `{0}`")]
    InvalidFont(String),
}
