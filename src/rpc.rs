use crate::codec;
use crate::model::{CreateAuthorError, DeleteAuthorError, FindAuthorError, UpdateAuthorError};
use crate::proto::author_management::author_management_server::{
    AuthorManagement, AuthorManagementServer,
};
use crate::proto::author_management::{self, Author, GetAuthorResponse, RequestId};
use crate::proto::event_manager::{Action, Query};
use crate::router::{Command, CommandRouter, DispatchError};
use crate::store::AuthorStore;
use async_trait::async_trait;
use tonic::{Request, Response, Status};
use tracing::error;

impl From<DispatchError> for Status {
    fn from(err: DispatchError) -> Self {
        match &err {
            DispatchError::Decode(_) | DispatchError::Validation(_) => {
                Self::invalid_argument(err.to_string())
            }
            DispatchError::UnsupportedAction(_) => Self::unimplemented(err.to_string()),
            DispatchError::Create(CreateAuthorError::Duplicate { .. }) => {
                Self::already_exists(err.to_string())
            }
            DispatchError::Find(FindAuthorError::NotFound { .. })
            | DispatchError::Update(UpdateAuthorError::NotFound { .. })
            | DispatchError::Delete(DeleteAuthorError::NotFound { .. }) => {
                Self::not_found(err.to_string())
            }
            _ => {
                error!(error = %err, "Author store failure");
                Self::internal("Internal server error")
            }
        }
    }
}

/// Serves the typed RPC surface through the same [`CommandRouter`] as the queue.
///
/// Each method wraps its request into a [`Command`], so both transports share one
/// set of dispatch and validation rules.
pub struct RpcAdapter<S> {
    router: CommandRouter<S>,
}

impl<S: AuthorStore> RpcAdapter<S> {
    pub const fn new(router: CommandRouter<S>) -> Self {
        Self { router }
    }

    pub fn into_service(self) -> AuthorManagementServer<Self> {
        AuthorManagementServer::new(self)
    }

    async fn dispatch(&self, command: Command) -> Result<Vec<String>, Status> {
        self.router.dispatch(command).await.map_err(Status::from)
    }
}

fn single_result(results: Vec<String>) -> Result<String, Status> {
    results
        .into_iter()
        .next()
        .ok_or_else(|| Status::internal("Command produced no result"))
}

fn undecodable(err: codec::CodecError) -> Status {
    error!(error = %err, "Failed to decode command result");
    Status::internal("Internal server error")
}

fn success() -> author_management::Response {
    author_management::Response {
        success: true,
        uuid: None,
    }
}

#[async_trait]
impl<S: AuthorStore> AuthorManagement for RpcAdapter<S> {
    #[tracing::instrument(skip(self))]
    async fn create_author(
        &self,
        request: Request<Author>,
    ) -> Result<Response<author_management::Response>, Status> {
        let payload = codec::encode_author(request.get_ref());
        let id = single_result(self.dispatch(Command::new(Action::Create, payload)).await?)?;

        Ok(Response::new(author_management::Response {
            success: true,
            uuid: Some(id),
        }))
    }

    #[tracing::instrument(skip(self))]
    async fn get_author(&self, request: Request<RequestId>) -> Result<Response<Author>, Status> {
        let payload = codec::encode_query(&Query {
            uuid: Some(request.into_inner().uuid),
            all_entries: false,
        });
        let encoded = single_result(self.dispatch(Command::new(Action::Read, payload)).await?)?;

        let author = codec::decode_author(&encoded).map_err(undecodable)?;
        Ok(Response::new(author))
    }

    #[tracing::instrument(skip(self))]
    async fn get_authors(
        &self,
        _request: Request<()>,
    ) -> Result<Response<GetAuthorResponse>, Status> {
        let payload = codec::encode_query(&Query {
            uuid: None,
            all_entries: true,
        });
        let encoded = single_result(self.dispatch(Command::new(Action::Read, payload)).await?)?;

        let list = codec::decode_author_list(&encoded).map_err(undecodable)?;
        Ok(Response::new(GetAuthorResponse {
            authors: list.authors,
        }))
    }

    #[tracing::instrument(skip(self))]
    async fn update_author(
        &self,
        request: Request<Author>,
    ) -> Result<Response<author_management::Response>, Status> {
        let payload = codec::encode_author(request.get_ref());
        self.dispatch(Command::new(Action::Update, payload)).await?;

        Ok(Response::new(success()))
    }

    #[tracing::instrument(skip(self))]
    async fn delete_author(
        &self,
        request: Request<RequestId>,
    ) -> Result<Response<author_management::Response>, Status> {
        let payload = codec::encode_query(&Query {
            uuid: Some(request.into_inner().uuid),
            all_entries: false,
        });
        self.dispatch(Command::new(Action::Delete, payload)).await?;

        Ok(Response::new(success()))
    }
}
