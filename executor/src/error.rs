use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExecError {
    /// The code block's tag has no interpreter. Only fatal at run time;
    /// the parser drops such blocks unless catch-all mode is on.
    #[error("unsupported language: '{0}'")]
    UnsupportedLanguage(String),
    #[error("cannot run '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
