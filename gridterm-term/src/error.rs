//! Typed error type for gridterm-term.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TermError {
    #[error("failed to open pty: {0}")]
    PtyOpen(#[source] anyhow::Error),

    #[error("failed to spawn shell '{shell}': {source}")]
    SpawnShell {
        shell: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to resize pty: {0}")]
    Resize(#[source] anyhow::Error),

    #[error("pty writer unavailable (child has exited)")]
    WriterClosed,

    #[error("invalid shell command line: {0}")]
    InvalidCommandLine(String),
}
