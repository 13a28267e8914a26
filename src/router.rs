use crate::codec::{self, CodecError};
use crate::model::{
    AuthorName, AuthorNameEmptyError, CreateAuthorError, CreateAuthorRequest, DeleteAuthorError,
    DeleteAuthorRequest, FindAllAuthorsError, FindAuthorError, FindAuthorRequest,
    UpdateAuthorError, UpdateAuthorRequest,
};
use crate::proto::author_management;
use crate::proto::event_manager::{Action, Event};
use crate::store::AuthorStore;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

/// An action tag plus its still-encoded payload.
///
/// The action is kept as the raw wire value so that tags outside [`Action`]
/// reach [`CommandRouter::dispatch`] and are answered instead of dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    action: i32,
    payload: String,
}

impl Command {
    pub fn new(action: Action, payload: impl Into<String>) -> Self {
        Self::from_raw(action as i32, payload)
    }

    pub fn from_raw(action: i32, payload: impl Into<String>) -> Self {
        Self {
            action,
            payload: payload.into(),
        }
    }

    pub const fn action(&self) -> i32 {
        self.action
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }
}

impl From<Event> for Command {
    fn from(event: Event) -> Self {
        Self::from_raw(event.action, event.message)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("id not set on the request")]
    MissingId,
    #[error("\"{0}\" is not a valid author id")]
    InvalidId(String),
    #[error(transparent)]
    Name(#[from] AuthorNameEmptyError),
}

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error(transparent)]
    Decode(#[from] CodecError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("action not supported")]
    UnsupportedAction(i32),
    #[error(transparent)]
    Create(#[from] CreateAuthorError),
    #[error(transparent)]
    Find(#[from] FindAuthorError),
    #[error(transparent)]
    FindAll(#[from] FindAllAuthorsError),
    #[error(transparent)]
    Update(#[from] UpdateAuthorError),
    #[error(transparent)]
    Delete(#[from] DeleteAuthorError),
}

/// Result strings of a successful command, or the reason it failed.
pub type Outcome = Result<Vec<String>, DispatchError>;

/// Dispatches decoded commands to the author store.
///
/// Every command makes at most one store call and nothing is retried; store
/// failures are returned unchanged inside [`DispatchError`].
pub struct CommandRouter<S> {
    store: Arc<S>,
}

impl<S> Clone for CommandRouter<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: AuthorStore> CommandRouter<S> {
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn dispatch(&self, command: Command) -> Outcome {
        let Ok(action) = Action::try_from(command.action) else {
            debug!(action = command.action, "Rejecting unknown action");
            return Err(DispatchError::UnsupportedAction(command.action));
        };
        debug!(action = action.as_str_name(), "Dispatching command");

        match action {
            Action::Create => self.create_author(&command.payload).await,
            Action::Read => self.read_author(&command.payload).await,
            Action::Update => self.update_author(&command.payload).await,
            Action::Delete => self.delete_author(&command.payload).await,
        }
    }

    async fn create_author(&self, payload: &str) -> Outcome {
        let author = codec::decode_author(payload)?;
        let id = match author.uuid.as_deref() {
            None | Some("") => None,
            Some(raw) => Some(parse_id(raw)?),
        };
        let name = AuthorName::new(&author.name).map_err(ValidationError::from)?;

        let req = CreateAuthorRequest::new(id, name, author.pic_url);
        let created = self.store.create_author(&req).await?;

        Ok(vec![created.id().to_string()])
    }

    async fn update_author(&self, payload: &str) -> Outcome {
        let author = codec::decode_author(payload)?;
        let id = required_id(author.uuid.as_deref())?;
        let name = AuthorName::new(&author.name).map_err(ValidationError::from)?;

        let req = UpdateAuthorRequest::new(id, name, author.pic_url);
        self.store.update_author(&req).await?;

        Ok(Vec::new())
    }

    async fn read_author(&self, payload: &str) -> Outcome {
        let query = codec::decode_query(payload)?;
        if query.all_entries {
            let authors = self.store.find_all_authors().await?;
            let authors = authors.iter().map(author_management::Author::from).collect();
            return Ok(vec![codec::encode_author_list(authors)]);
        }

        let id = required_id(query.uuid.as_deref())?;
        let author = self.store.find_author(&FindAuthorRequest::new(id)).await?;

        Ok(vec![codec::encode_author(&author_management::Author::from(
            &author,
        ))])
    }

    async fn delete_author(&self, payload: &str) -> Outcome {
        let query = codec::decode_query(payload)?;
        let id = required_id(query.uuid.as_deref())?;

        self.store
            .delete_author(&DeleteAuthorRequest::new(id))
            .await?;

        Ok(Vec::new())
    }
}

fn parse_id(raw: &str) -> Result<Uuid, ValidationError> {
    Uuid::parse_str(raw).map_err(|_| ValidationError::InvalidId(raw.to_owned()))
}

// proto3 cannot tell an unset string from an empty one, so both count as missing.
fn required_id(raw: Option<&str>) -> Result<Uuid, ValidationError> {
    match raw {
        None | Some("") => Err(ValidationError::MissingId),
        Some(raw) => parse_id(raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Author;
    use crate::proto::event_manager::Query;
    use crate::sqlite::Sqlite;
    use async_trait::async_trait;
    use proptest::prelude::*;
    use proptest::test_runner::{Config, TestRunner};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Store that counts calls and holds no data.
    #[derive(Default)]
    struct CountingStore {
        calls: AtomicUsize,
    }

    impl CountingStore {
        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn record(&self) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl AuthorStore for CountingStore {
        async fn create_author(
            &self,
            req: &CreateAuthorRequest,
        ) -> Result<Author, CreateAuthorError> {
            self.record();
            Ok(Author::new(
                req.id().unwrap_or_else(Uuid::new_v4),
                req.name().clone(),
                req.picture_url().map(str::to_owned),
            ))
        }

        async fn find_author(&self, req: &FindAuthorRequest) -> Result<Author, FindAuthorError> {
            self.record();
            Err(FindAuthorError::NotFound { id: req.id() })
        }

        async fn find_all_authors(&self) -> Result<Vec<Author>, FindAllAuthorsError> {
            self.record();
            Ok(Vec::new())
        }

        async fn update_author(&self, req: &UpdateAuthorRequest) -> Result<(), UpdateAuthorError> {
            self.record();
            Err(UpdateAuthorError::NotFound { id: req.id() })
        }

        async fn delete_author(&self, req: &DeleteAuthorRequest) -> Result<(), DeleteAuthorError> {
            self.record();
            Err(DeleteAuthorError::NotFound { id: req.id() })
        }
    }

    fn router() -> (CommandRouter<CountingStore>, Arc<CountingStore>) {
        let store = Arc::new(CountingStore::default());
        (CommandRouter::new(Arc::clone(&store)), store)
    }

    fn query(uuid: Option<&str>, all_entries: bool) -> String {
        codec::encode_query(&Query {
            uuid: uuid.map(str::to_owned),
            all_entries,
        })
    }

    fn author(uuid: Option<&str>, name: &str) -> String {
        codec::encode_author(&author_management::Author {
            uuid: uuid.map(str::to_owned),
            name: name.to_owned(),
            pic_url: None,
        })
    }

    #[tokio::test]
    async fn unknown_action_is_not_supported() {
        let (router, store) = router();

        let err = router
            .dispatch(Command::from_raw(42, author(None, "John Doe")))
            .await
            .unwrap_err();

        assert!(matches!(err, DispatchError::UnsupportedAction(42)));
        assert_eq!(err.to_string(), "action not supported");
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn delete_without_id_fails_before_store() {
        let (router, store) = router();

        let err = router
            .dispatch(Command::new(Action::Delete, query(None, false)))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "id not set on the request");
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn delete_unknown_id_surfaces_store_error() {
        let (router, store) = router();
        let id = Uuid::new_v4().to_string();

        let err = router
            .dispatch(Command::new(Action::Delete, query(Some(&id), false)))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DispatchError::Delete(DeleteAuthorError::NotFound { .. })
        ));
        assert_eq!(store.calls(), 1);
    }

    #[tokio::test]
    async fn read_single_without_id_fails_before_store() {
        let (router, store) = router();

        let err = router
            .dispatch(Command::new(Action::Read, query(None, false)))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DispatchError::Validation(ValidationError::MissingId)
        ));
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn read_all_ignores_id() {
        let (router, store) = router();

        let results = router
            .dispatch(Command::new(Action::Read, query(Some("garbage"), true)))
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        let list = codec::decode_author_list(&results[0]).unwrap();
        assert!(list.authors.is_empty());
        assert_eq!(store.calls(), 1);
    }

    #[test]
    fn read_all_counts_stored_authors_whatever_the_id() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let known = Uuid::new_v4().to_string();
        let id = prop_oneof![
            Just(None),
            Just(Some(String::new())),
            Just(Some(Uuid::new_v4().to_string())),
            Just(Some(known.clone())),
            proptest::option::of(any::<String>()),
        ];

        let mut runner = TestRunner::new(Config::with_cases(32));
        runner
            .run(&(0usize..6, id), |(stored, id)| {
                runtime.block_on(async {
                    let store = Sqlite::new("sqlite::memory:").await.unwrap();
                    let router = CommandRouter::new(Arc::new(store));
                    for index in 0..stored {
                        // The first author takes the known id so that case hits a stored record.
                        let uuid = (index == 0).then_some(known.as_str());
                        router
                            .dispatch(Command::new(Action::Create, author(uuid, "Test")))
                            .await
                            .unwrap();
                    }

                    let results = router
                        .dispatch(Command::new(Action::Read, query(id.as_deref(), true)))
                        .await
                        .unwrap();

                    prop_assert_eq!(results.len(), 1);
                    let list = codec::decode_author_list(&results[0]).unwrap();
                    prop_assert_eq!(list.authors.len(), stored);
                    Ok(())
                })
            })
            .unwrap();
    }

    #[tokio::test]
    async fn update_without_id_fails_before_store() {
        let (router, store) = router();

        let err = router
            .dispatch(Command::new(Action::Update, author(None, "John Doe")))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "id not set on the request");
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn create_with_malformed_id_is_rejected() {
        let (router, store) = router();

        let err = router
            .dispatch(Command::new(Action::Create, author(Some("1234"), "John Doe")))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DispatchError::Validation(ValidationError::InvalidId(ref raw)) if raw == "1234"
        ));
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn create_with_blank_name_is_rejected() {
        let (router, store) = router();

        let err = router
            .dispatch(Command::new(Action::Create, author(None, "  ")))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DispatchError::Validation(ValidationError::Name(_))
        ));
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn create_returns_new_id() {
        let (router, store) = router();

        let results = router
            .dispatch(Command::new(Action::Create, author(None, "John Doe")))
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].len(), 36);
        assert!(Uuid::parse_str(&results[0]).is_ok());
        assert_eq!(store.calls(), 1);
    }

    #[tokio::test]
    async fn malformed_payload_is_a_decode_error() {
        let (router, store) = router();

        let err = router
            .dispatch(Command::new(Action::Create, "%%%"))
            .await
            .unwrap_err();

        assert!(matches!(err, DispatchError::Decode(_)));
        assert_eq!(store.calls(), 0);
    }
}
