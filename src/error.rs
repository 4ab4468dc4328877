use miette::Diagnostic;
use thiserror::Error;

/// Main error type for resimg operations
#[derive(Error, Diagnostic, Debug)]
pub enum ResimgError {
    #[error("IO error: {0}")]
    #[diagnostic(code(resimg::io))]
    IoError(#[from] std::io::Error),

    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(resimg::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Config error: {message}")]
    #[diagnostic(code(resimg::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Input error: {message}")]
    #[diagnostic(code(resimg::input))]
    Input {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("No asset declarations found")]
    #[diagnostic(
        code(resimg::empty),
        help("Name at least one layer like `hero-l-@2x.png` so it carries an image extension")
    )]
    EmptyAssetSet,
}

pub type Result<T> = std::result::Result<T, ResimgError>;
