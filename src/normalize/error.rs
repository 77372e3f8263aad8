use thiserror::Error;

pub type Result<T> = std::result::Result<T, NormalizeError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    /// The first record matched none of the known source signatures.
    #[error("Unrecognized source shape (keys: {keys})")]
    UnrecognizedShape { keys: String },
}

impl NormalizeError {
    pub(crate) fn unrecognized(record: &serde_json::Value) -> Self {
        let keys = match record.as_object() {
            Some(obj) => obj.keys().cloned().collect::<Vec<_>>().join(", "),
            None => "<not an object>".to_string(),
        };
        Self::UnrecognizedShape { keys }
    }
}
