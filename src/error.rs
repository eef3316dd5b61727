use camino::Utf8PathBuf;

/// Every way a single invocation can fail. All of them are terminal.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unknown command '{0}'")]
    UnknownCommand(String),
    #[error("no command was specified")]
    MissingCommand,
    #[error("'{command}' takes {expected} positional argument(s) but {actual} were supplied\nusage: {usage}")]
    ArgumentCount {
        command: &'static str,
        expected: usize,
        actual: usize,
        usage: String,
    },
    /// The flag layer rejected the command line (unknown flag, bad enum value...)
    #[error(transparent)]
    Flags(#[from] clap::Error),
    #[error("invalid value '{value}' for --{flag}: {reason}")]
    ValueFormat {
        flag: &'static str,
        value: String,
        reason: String,
    },
    #[error("failed to parse --{flag} as JSON")]
    Parse {
        flag: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("'{0}' already exists, pass --overwrite to replace it")]
    FileExists(Utf8PathBuf),
    #[error("I/O error for '{path}'")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unable to acquire credentials")]
    Credentials(#[source] anyhow::Error),
    #[error("failed to send request")]
    Transport(#[source] reqwest::Error),
    #[error("request failed with HTTP {status}: {message}")]
    Server { status: u16, message: String },
    #[error("failed to decode response")]
    Decode(#[source] serde_json::Error),
    #[error("'{0}' can't be used as an API endpoint")]
    InvalidEndpoint(url::Url),
    #[error("'{value}' is not a valid {param}")]
    InvalidPathParameter { param: &'static str, value: String },
    #[error("request is missing path parameter '{0}'")]
    MissingPathParameter(String),
    #[error("failed to write output")]
    Output(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
