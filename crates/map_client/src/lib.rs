use std::{error, fmt, sync::Arc};

pub mod backend;
pub mod config;
pub mod orchestrator;
pub mod overlay;
pub mod resolver;
pub mod session;
pub mod state;

#[cfg(test)]
mod testing;

pub use backend::Backend;
pub use config::{SessionConfig, StalePolicy};
pub use session::{MapSession, MapSessionHandle, SessionError, SessionResult};
pub use state::MapView;

/// Why a backend request did not produce a usable answer. Every variant is
/// handled the same way: the affected display state degrades, nothing else.
#[derive(Debug, Clone)]
pub enum FetchError {
    /// The server could not be reached or the connection broke.
    Transport(Arc<dyn error::Error + Send + Sync>),
    /// The server answered with something other than 200.
    Status {
        status: u16,
        url: String,
        body: Option<String>,
    },
    /// The answer could not be decoded.
    Decode(String),
    /// The request task panicked before producing an answer.
    Aborted(String),
}

impl FetchError {
    pub fn transport<E: error::Error + Send + Sync + 'static>(why: E) -> Self {
        Self::Transport(Arc::new(why))
    }
}

impl error::Error for FetchError {}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FetchError::Transport(why) => write!(f, "request failed: {}", why),
            FetchError::Status { status, url, body } => match body {
                Some(text) if !text.is_empty() => {
                    write!(f, "invalid response ({}) {}: {}", status, url, text)
                }
                _ => write!(f, "invalid response ({}) {}", status, url),
            },
            FetchError::Decode(why) => write!(f, "malformed response: {}", why),
            FetchError::Aborted(why) => write!(f, "request aborted: {}", why),
        }
    }
}

pub type FetchResult<T> = Result<T, FetchError>;
