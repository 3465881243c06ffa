use crate::parsing::structure::StructureError;
use crate::result_operators::ResultOperatorError;
use thiserror::Error;

#[derive(Debug, Error)]
#[error(transparent)]
pub struct Error(Box<ErrorKind>);

impl<E> From<E> for Error
where
    ErrorKind: From<E>,
{
    fn from(value: E) -> Self {
        Error(Box::new(value.into()))
    }
}

#[derive(Debug, Error)]
pub enum ErrorKind {
    #[error("Invalid query structure:\n{0}")]
    Structure(#[from] StructureError),
    #[error("Result operator failed:\n{0}")]
    ResultOperator(#[from] ResultOperatorError),
    #[error("JSON error:\n{0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        &self.0
    }

    pub fn into_inner(self) -> ErrorKind {
        *self.0
    }
}
