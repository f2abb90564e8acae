use thiserror::Error;

/// Errors surfaced by the scheduler and its sink adapters. None of them is fatal to the
/// event loop: a clip that fails is skipped and the queue keeps draining.
#[derive(Error, Debug)]
pub enum SchedulerError {
    /// Identifier does not resolve to playable content
    #[error("clip not found: {0}")]
    ClipNotFound(String),

    /// The sink session could not be activated or configured
    #[error("sink activation failed: {0}")]
    SinkActivation(String),

    /// Output stream or playback device could not be opened
    #[error("audio device error: {0}")]
    Device(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SchedulerError>;
