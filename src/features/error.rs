use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum CoordinateError {
    #[error("Line does not contain a degree/minute/second coordinate")]
    NoMatch,

    #[error("Malformed numeric token in coordinate: {0}")]
    Malformed(String),
}
