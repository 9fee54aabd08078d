//! Error kinds distinguished programmatically, wrapped in `anyhow::Error`
//! everywhere they cross a public boundary.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("input error: {0}")]
    InputError(String),

    #[error("output geometry error: {0}")]
    OutputGeometryError(String),

    #[error("allocation failure: {0}")]
    AllocationFailure(String),

    #[error("render cancelled")]
    Cancelled,

    #[error("render failure: {0}")]
    RenderFailure(String),
}
