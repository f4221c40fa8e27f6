use thiserror::Error;

/// A statement the grammar rejected on submission.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error("{message}")]
    Syntax { message: String, position: usize },
    /// The buffer ended with a bracket, literal or comment still open.
    #[error("missing closing delimiter")]
    MissingDelimiter { position: usize },
}

impl SyntaxError {
    pub fn message(&self) -> String {
        self.to_string()
    }

    pub fn position(&self) -> usize {
        match self {
            SyntaxError::Syntax { position, .. } | SyntaxError::MissingDelimiter { position } => {
                *position
            }
        }
    }

    pub fn is_missing_delimiter(&self) -> bool {
        matches!(self, SyntaxError::MissingDelimiter { .. })
    }
}

#[derive(Debug, Error)]
pub enum HistoryFileError {
    #[error("history file io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("history record encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}
