use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SeedError {
    #[error("invalid wheel index {0:?}")]
    InvalidIndex(String),
    #[error("color token has {found} characters, expected {expected}")]
    TokenLength { expected: usize, found: usize },
    #[error("invalid color token character {0:?}")]
    TokenChar(char),
}
