pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid payload ({section}): {message}")]
    InvalidPayload { section: String, message: String },

    #[error("duplicate node id in payload: {id}")]
    DuplicateId { id: String },
}
