use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheError {
    /// add/replace/append/prepend precondition on key presence did not hold
    ItemNotStored = 0x05,
}

impl CacheError {
    pub fn to_static_string(&self) -> &'static str {
        match self {
            CacheError::ItemNotStored => "Item is not stored",
        }
    }

    pub fn is_not_stored(&self) -> bool {
        matches!(self, CacheError::ItemNotStored)
    }
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_static_string())
    }
}

impl std::error::Error for CacheError {}

pub type Result<T> = std::result::Result<T, CacheError>;
