use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScanError>;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("tag must not be empty")]
    EmptyTag,

    #[error("invalid pattern for tag {tag:?}: {source}")]
    InvalidTagPattern { tag: String, source: regex::Error },
}
