use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorName(String);

impl AuthorName {
    /// Accepts any name that is not blank. The name is kept exactly as given.
    pub fn new(raw: &str) -> Result<Self, AuthorNameEmptyError> {
        if raw.trim().is_empty() {
            Err(AuthorNameEmptyError)
        } else {
            Ok(Self(raw.into()))
        }
    }

    pub fn new_unchecked(raw: &str) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AuthorName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Author name cannot be empty")]
pub struct AuthorNameEmptyError;

/// A stored author. Two authors are the same entity iff their ids are equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    id: Uuid,
    name: AuthorName,
    picture_url: Option<String>,
}

impl Author {
    pub const fn new(id: Uuid, name: AuthorName, picture_url: Option<String>) -> Self {
        Self {
            id,
            name,
            picture_url,
        }
    }

    pub const fn id(&self) -> Uuid {
        self.id
    }

    pub const fn name(&self) -> &AuthorName {
        &self.name
    }

    pub fn picture_url(&self) -> Option<&str> {
        self.picture_url.as_deref()
    }
}

#[derive(Debug)]
pub struct CreateAuthorRequest {
    id: Option<Uuid>,
    name: AuthorName,
    picture_url: Option<String>,
}

impl CreateAuthorRequest {
    pub const fn new(id: Option<Uuid>, name: AuthorName, picture_url: Option<String>) -> Self {
        Self {
            id,
            name,
            picture_url,
        }
    }

    pub const fn id(&self) -> Option<Uuid> {
        self.id
    }

    pub const fn name(&self) -> &AuthorName {
        &self.name
    }

    pub fn picture_url(&self) -> Option<&str> {
        self.picture_url.as_deref()
    }
}

#[derive(Error, Debug)]
pub enum CreateAuthorError {
    #[error("Author with id \"{id}\" already exists")]
    Duplicate { id: Uuid },
    #[error(transparent)]
    Unknown(anyhow::Error),
}

#[derive(Debug)]
pub struct FindAuthorRequest {
    id: Uuid,
}

impl FindAuthorRequest {
    pub const fn new(id: Uuid) -> Self {
        Self { id }
    }

    pub const fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Error, Debug)]
pub enum FindAuthorError {
    #[error("Author with id \"{id}\" does not exist")]
    NotFound { id: Uuid },
    #[error(transparent)]
    Unknown(anyhow::Error),
}

#[derive(Error, Debug)]
#[error(transparent)]
pub struct FindAllAuthorsError(#[from] pub anyhow::Error);

/// Replaces the name and picture of an existing author. A `None` picture clears it.
#[derive(Debug)]
pub struct UpdateAuthorRequest {
    id: Uuid,
    name: AuthorName,
    picture_url: Option<String>,
}

impl UpdateAuthorRequest {
    pub const fn new(id: Uuid, name: AuthorName, picture_url: Option<String>) -> Self {
        Self {
            id,
            name,
            picture_url,
        }
    }

    pub const fn id(&self) -> Uuid {
        self.id
    }

    pub const fn name(&self) -> &AuthorName {
        &self.name
    }

    pub fn picture_url(&self) -> Option<&str> {
        self.picture_url.as_deref()
    }
}

#[derive(Error, Debug)]
pub enum UpdateAuthorError {
    #[error("Author with id \"{id}\" does not exist")]
    NotFound { id: Uuid },
    #[error(transparent)]
    Unknown(anyhow::Error),
}

#[derive(Debug)]
pub struct DeleteAuthorRequest {
    id: Uuid,
}

impl DeleteAuthorRequest {
    pub const fn new(id: Uuid) -> Self {
        Self { id }
    }

    pub const fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Error, Debug)]
pub enum DeleteAuthorError {
    #[error("Author with id \"{id}\" does not exist")]
    NotFound { id: Uuid },
    #[error(transparent)]
    Unknown(#[from] anyhow::Error),
}
