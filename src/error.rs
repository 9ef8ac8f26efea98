use std::fmt;

/// Everything that can go wrong in the client core. None of these are fatal:
/// the page always falls back to an empty feed and guest permissions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteError {
    /// A create operation is missing a required field.
    Validation(&'static str),
    /// The persisted bundle could not be parsed.
    StorageParse(String),
    /// The storage backend refused the write.
    QuotaExceeded,
    /// The static feed was unreachable or unreadable.
    Fetch(String),
    /// The delete target does not live in local data.
    CannotDeleteStaticContent,
    /// Login code mismatch, or login attempted without a local config.
    AuthDenied,
}

impl fmt::Display for SiteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SiteError::Validation(what) => write!(f, "{}", what),
            SiteError::StorageParse(detail) => {
                write!(f, "stored data is unreadable: {}", detail)
            }
            SiteError::QuotaExceeded => write!(f, "local storage is full, nothing was saved"),
            SiteError::Fetch(detail) => write!(f, "static feed unavailable: {}", detail),
            SiteError::CannotDeleteStaticContent => {
                write!(f, "published content cannot be deleted from the client")
            }
            SiteError::AuthDenied => write!(f, "access denied: invalid credentials"),
        }
    }
}
