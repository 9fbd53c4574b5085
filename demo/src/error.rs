use std::io;

#[derive(Debug, thiserror::Error)]
pub enum DemoError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{0}")]
    Options(#[from] clopt::Error),

    #[error("Argument `{0}' is not valid Unicode.")]
    NonUnicodeArgument(String),

    #[error(
        "Argument `{argument}' passed to option {option} is not a valid quality specifier \
         (allowed values: good, bad, ugly)."
    )]
    UnknownQuality {
        argument: String,
        option: clopt::OptionName,
    },
}

pub type Result<T> = std::result::Result<T, DemoError>;
