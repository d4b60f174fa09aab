// Error types shared by the library. Every operation returns `Result<T>`
// and only the binary decides to print and exit.

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required environment variable is unset or empty.
    #[error("{0} is not set")]
    MissingVar(&'static str),

    #[error("{name} is invalid: {reason}")]
    InvalidVar { name: &'static str, reason: String },

    /// The env file exists but could not be loaded.
    #[error("Error loading env file {}", path.display())]
    EnvFile {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },

    #[error("Error making request")]
    Transport(#[from] reqwest::Error),

    #[error("Error building request: {0}")]
    Request(String),

    /// 401 or 403 from the API, usually a bad or expired token.
    #[error("Request was rejected ({status}), check MEISTERTASK_API_KEY")]
    Unauthorized { status: u16 },

    #[error("Resource not found: {url}")]
    NotFound { url: String },

    #[error("API responded with {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Error decoding {what}")]
    Decode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("No tasks found")]
    NoTasks,

    #[error("Invalid index {index}, expected a value between 1 and {len}")]
    InvalidIndex { index: i64, len: usize },

    #[error("Error writing output")]
    Output(#[from] std::io::Error),

    #[error("Could not determine the home directory")]
    NoHomeDir,

    #[error("Error writing snapshot {}", path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn decode(what: &'static str, source: serde_json::Error) -> Self {
        Error::Decode { what, source }
    }

    pub(crate) fn persistence(path: &std::path::Path, source: std::io::Error) -> Self {
        Error::Persistence {
            path: path.to_path_buf(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(err: Error) -> String {
        format!("{:#}", anyhow::Error::from(err))
    }

    #[test]
    fn decode_cause_is_printed_once() {
        let source = serde_json::from_str::<Vec<u8>>("{}").unwrap_err();
        let cause = source.to_string();
        let text = rendered(Error::decode("task list", source));

        assert!(text.starts_with("Error decoding task list: "));
        assert_eq!(text.matches(cause.as_str()).count(), 1);
    }

    #[test]
    fn io_causes_are_printed_once() {
        let io = || std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");

        let text = rendered(Error::persistence(std::path::Path::new("/x/tasks.json"), io()));
        assert_eq!(text, "Error writing snapshot /x/tasks.json: denied");

        let text = rendered(Error::Output(io()));
        assert_eq!(text, "Error writing output: denied");
    }
}
