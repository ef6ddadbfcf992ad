use thiserror::Error;

/// Failures raised by the accessors of [`SharedPtr`](crate::SharedPtr) and
/// [`SharedArray`](crate::SharedArray).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum PointerError {
    #[error("invalid pointer: null dereference")]
    NullDereference,

    #[error("index {index} is out of bounds for a shared array of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("shared value is already borrowed by another guard")]
    Borrowed,
}

impl PointerError {
    pub fn is_null_dereference(&self) -> bool {
        matches!(self, Self::NullDereference)
    }
}
