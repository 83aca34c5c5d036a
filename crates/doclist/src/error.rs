#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Unknown command: {0}. Type `help` for the list of commands")]
    UnknownCommand(String),

    #[error("Missing argument for `{command}`: expected {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },

    #[error("Invalid value `{value}` for `{command}`: expected {expected}")]
    InvalidValue {
        command: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("Error loading doctors: {0}")]
    CatalogUnavailable(String),
}
