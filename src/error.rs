use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DenoiseError {
    #[error("unknown denoising strategy '{name}' (run `fmri-denoiseqc strategies` for the catalog)")]
    UnknownStrategy { name: String },

    #[error("missing confound '{name}': {detail}")]
    MissingConfound { name: String, detail: String },

    #[error("shape mismatch in {context}: expected {expected}, got {got}")]
    ShapeMismatch {
        context: &'static str,
        expected: String,
        got: String,
    },

    #[error("duplicate confound column '{name}'")]
    DuplicateColumn { name: String },
}

impl DenoiseError {
    pub fn missing(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::MissingConfound {
            name: name.into(),
            detail: detail.into(),
        }
    }

    pub fn shape(context: &'static str, expected: impl std::fmt::Debug, got: impl std::fmt::Debug) -> Self {
        Self::ShapeMismatch {
            context,
            expected: format!("{:?}", expected),
            got: format!("{:?}", got),
        }
    }
}
