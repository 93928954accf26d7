//! Credential value type for locking and unlocking PDFs

/// User and/or owner passwords for a PDF document.
///
/// At least one secret is always present: there is no empty constructor.
/// A `Credential` is built once per call and never stored by the library.
///
/// # Example
///
/// ```
/// use pdf_utilities::Credential;
///
/// // A single password is treated as the user password
/// let user_only = Credential::from_password("s3cret");
/// assert_eq!(user_only.user_password(), Some("s3cret"));
/// assert_eq!(user_only.owner_password(), None);
///
/// let pair = Credential::new("reader", "admin");
/// assert_eq!(pair.owner_password(), Some("admin"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    user_password: Option<String>,
    owner_password: Option<String>,
}

impl Credential {
    /// Create a credential from a single password, used as the user password.
    pub fn from_password(password: impl Into<String>) -> Self {
        Self {
            user_password: Some(password.into()),
            owner_password: None,
        }
    }

    /// Create a credential with both a user and an owner password.
    pub fn new(user_password: impl Into<String>, owner_password: impl Into<String>) -> Self {
        Self {
            user_password: Some(user_password.into()),
            owner_password: Some(owner_password.into()),
        }
    }

    /// Create a credential carrying only an owner password.
    pub fn from_owner_password(owner_password: impl Into<String>) -> Self {
        Self {
            user_password: None,
            owner_password: Some(owner_password.into()),
        }
    }

    /// The user password, if present.
    pub fn user_password(&self) -> Option<&str> {
        self.user_password.as_deref()
    }

    /// The owner password, if present.
    pub fn owner_password(&self) -> Option<&str> {
        self.owner_password.as_deref()
    }
}
