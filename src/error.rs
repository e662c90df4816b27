use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(
        "unsupported database driver: '{driver}' (supported: {})",
        crate::dump::supported_drivers().join(", "),
        driver = .0
    )]
    UnsupportedDriver(String),

    #[error("something went wrong when creating database dump: {binary:?} {}", describe_exit(.code))]
    SubprocessFailure { binary: String, code: Option<i32> },

    #[error("{0}")]
    Config(String),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Command(String),

    #[error("{0}")]
    Schema(String),
}

impl Error {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Error::Io {
            context: context.into(),
            source,
        }
    }
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("exited with code {}", c),
        None => "could not be run to completion".into(),
    }
}
