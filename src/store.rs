use crate::model::{
    Author, CreateAuthorError, CreateAuthorRequest, DeleteAuthorError, DeleteAuthorRequest,
    FindAllAuthorsError, FindAuthorError, FindAuthorRequest, UpdateAuthorError,
    UpdateAuthorRequest,
};
use async_trait::async_trait;

/// Persistence port for authors.
///
/// Implementations own every author record and must be safe to share across
/// concurrent callers; nothing above this trait adds locking of its own.
#[async_trait]
pub trait AuthorStore: Send + Sync + 'static {
    /// Inserts a new author, generating an id when the request carries none.
    async fn create_author(&self, req: &CreateAuthorRequest) -> Result<Author, CreateAuthorError>;

    async fn find_author(&self, req: &FindAuthorRequest) -> Result<Author, FindAuthorError>;

    async fn find_all_authors(&self) -> Result<Vec<Author>, FindAllAuthorsError>;

    /// Fails with `NotFound` when the id does not resolve; never inserts.
    async fn update_author(&self, req: &UpdateAuthorRequest) -> Result<(), UpdateAuthorError>;

    async fn delete_author(&self, req: &DeleteAuthorRequest) -> Result<(), DeleteAuthorError>;
}
