//! Protobuf messages for the two wire surfaces.
//!
//! `author_management` is the typed RPC schema, together with the generated
//! `author_management_server` service stubs; `event_manager` is the schema of
//! the command queue, whose `Event.message` carries a base64 encoded
//! `author_management::Author` or `event_manager::Query`.

pub mod author_management {
    #[derive(Clone, PartialEq, Eq, ::prost::Message)]
    pub struct Author {
        #[prost(string, optional, tag = "1")]
        pub uuid: Option<String>,
        #[prost(string, tag = "2")]
        pub name: String,
        #[prost(string, optional, tag = "3")]
        pub pic_url: Option<String>,
    }

    #[derive(Clone, PartialEq, Eq, ::prost::Message)]
    pub struct AuthorList {
        #[prost(message, repeated, tag = "1")]
        pub authors: Vec<Author>,
    }

    #[derive(Clone, PartialEq, Eq, ::prost::Message)]
    pub struct RequestId {
        #[prost(string, tag = "1")]
        pub uuid: String,
    }

    #[derive(Clone, PartialEq, Eq, ::prost::Message)]
    pub struct Response {
        #[prost(bool, tag = "1")]
        pub success: bool,
        /// Id of the created author; only set by `CreateAuthor`.
        #[prost(string, optional, tag = "2")]
        pub uuid: Option<String>,
    }

    #[derive(Clone, PartialEq, Eq, ::prost::Message)]
    pub struct GetAuthorResponse {
        #[prost(message, repeated, tag = "1")]
        pub authors: Vec<Author>,
    }

    /// Path-form alias of `()` for the generated `GetAuthors` stub.
    type Empty = ();

    include!(concat!(
        env!("OUT_DIR"),
        "/author_management.AuthorManagement.rs"
    ));
}

pub mod event_manager {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum Action {
        Create = 0,
        Read = 1,
        Update = 2,
        Delete = 3,
    }

    impl Action {
        pub const fn as_str_name(self) -> &'static str {
            match self {
                Self::Create => "CREATE",
                Self::Read => "READ",
                Self::Update => "UPDATE",
                Self::Delete => "DELETE",
            }
        }
    }

    #[derive(Clone, PartialEq, Eq, ::prost::Message)]
    pub struct Event {
        #[prost(enumeration = "Action", tag = "1")]
        pub action: i32,
        #[prost(string, tag = "2")]
        pub message: String,
    }

    #[derive(Clone, PartialEq, Eq, ::prost::Message)]
    pub struct Query {
        #[prost(string, optional, tag = "1")]
        pub uuid: Option<String>,
        #[prost(bool, tag = "2")]
        pub all_entries: bool,
    }

    #[derive(Clone, PartialEq, Eq, ::prost::Message)]
    pub struct Response {
        #[prost(bool, tag = "1")]
        pub success: bool,
        #[prost(string, repeated, tag = "2")]
        pub result: Vec<String>,
        #[prost(string, optional, tag = "3")]
        pub error: Option<String>,
    }
}

impl From<&crate::model::Author> for author_management::Author {
    fn from(author: &crate::model::Author) -> Self {
        Self {
            uuid: Some(author.id().to_string()),
            name: author.name().to_string(),
            pic_url: author.picture_url().map(str::to_owned),
        }
    }
}
