use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlatformError {
    /// Windowing, GL context or GL function loading failed.
    #[error("initialization failed: {0}")]
    Initialization(String),
    #[error("a window already owns the windowing subsystem")]
    AlreadyInitialized,
}

pub(crate) fn init_err(what: &str, err: impl std::fmt::Display) -> PlatformError {
    PlatformError::Initialization(format!("{what}: {err}"))
}
