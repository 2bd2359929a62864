use thiserror::Error as DError;

#[derive(Debug, Clone, DError)]
pub enum ErrorKind {
    #[error("Empty vote sample")]
    EmptySample,

    #[error("Couldn't convert types")]
    ConvertType,

    #[error("Operation was cancelled")]
    Cancelled,
}
