//! Wire encoding for the queue surface.
//!
//! Queue message bodies are raw protobuf, but the payload nested inside an
//! `Event` and every result string travel as base64 of a protobuf message
//! because those fields are strings.

use crate::proto::author_management::{Author, AuthorList};
use crate::proto::event_manager::{Event, Query, Response};
use crate::router::Command;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use prost::Message;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("malformed {kind}: {source}")]
    Protobuf {
        kind: &'static str,
        #[source]
        source: prost::DecodeError,
    },
}

fn decode_message<M: Message + Default>(
    kind: &'static str,
    bytes: &[u8],
) -> Result<M, CodecError> {
    M::decode(bytes).map_err(|source| CodecError::Protobuf { kind, source })
}

fn decode_base64_message<M: Message + Default>(
    kind: &'static str,
    payload: &str,
) -> Result<M, CodecError> {
    let bytes = STANDARD.decode(payload)?;
    decode_message(kind, &bytes)
}

fn encode_base64_message<M: Message>(message: &M) -> String {
    STANDARD.encode(message.encode_to_vec())
}

/// Decodes a queue message body into a command.
pub fn decode_command(bytes: &[u8]) -> Result<Command, CodecError> {
    let event: Event = decode_message("event", bytes)?;
    Ok(Command::from(event))
}

pub fn encode_command(command: &Command) -> Vec<u8> {
    Event {
        action: command.action(),
        message: command.payload().to_owned(),
    }
    .encode_to_vec()
}

pub fn decode_author(payload: &str) -> Result<Author, CodecError> {
    decode_base64_message("author", payload)
}

pub fn decode_author_list(payload: &str) -> Result<AuthorList, CodecError> {
    decode_base64_message("author list", payload)
}

pub fn decode_query(payload: &str) -> Result<Query, CodecError> {
    decode_base64_message("query", payload)
}

pub fn encode_author(author: &Author) -> String {
    encode_base64_message(author)
}

pub fn encode_author_list(authors: Vec<Author>) -> String {
    encode_base64_message(&AuthorList { authors })
}

pub fn encode_query(query: &Query) -> String {
    encode_base64_message(query)
}

pub fn encode_response(response: &Response) -> Vec<u8> {
    response.encode_to_vec()
}

pub fn decode_response(bytes: &[u8]) -> Result<Response, CodecError> {
    decode_message("response", bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proto::event_manager::Action;
    use proptest::prelude::*;

    fn author(name: &str, pic_url: Option<&str>) -> Author {
        Author {
            uuid: Some(uuid::Uuid::new_v4().to_string()),
            name: name.to_owned(),
            pic_url: pic_url.map(str::to_owned),
        }
    }

    #[test]
    fn author_survives_encoding() {
        for original in [
            author("John Doe", None),
            author("Walter José", Some("https://example.com/pic.png")),
            author("名前", Some("")),
        ] {
            let decoded = decode_author(&encode_author(&original)).unwrap();
            assert_eq!(decoded, original);
        }
    }

    proptest! {
        #[test]
        fn any_author_survives_encoding(
            uuid in proptest::option::of(any::<String>()),
            name in any::<String>(),
            pic_url in proptest::option::of(any::<String>()),
        ) {
            let original = Author { uuid, name, pic_url };

            let decoded = decode_author(&encode_author(&original)).unwrap();

            prop_assert_eq!(decoded, original);
        }

        #[test]
        fn any_query_survives_encoding(
            uuid in proptest::option::of(any::<String>()),
            all_entries in any::<bool>(),
        ) {
            let original = Query { uuid, all_entries };

            let decoded = decode_query(&encode_query(&original)).unwrap();

            prop_assert_eq!(decoded, original);
        }
    }

    #[test]
    fn author_encoding_is_base64_of_protobuf() {
        let author = author("Walter José", None);
        let expected = STANDARD.encode(author.encode_to_vec());
        assert_eq!(encode_author(&author), expected);
    }

    #[test]
    fn author_list_keeps_every_entry() {
        let authors: Vec<_> = (0..3).map(|_| author("Test", None)).collect();

        let decoded = decode_author_list(&encode_author_list(authors.clone())).unwrap();

        assert_eq!(decoded.authors, authors);
    }

    #[test]
    fn query_decodes_id_and_flag() {
        let query = Query {
            uuid: Some(uuid::Uuid::new_v4().to_string()),
            all_entries: false,
        };

        let decoded = decode_query(&encode_query(&query)).unwrap();

        assert_eq!(decoded, query);
    }

    #[test]
    fn command_decodes_action_and_payload() {
        let command = Command::new(Action::Read, "EventProto");

        let decoded = decode_command(&encode_command(&command)).unwrap();

        assert_eq!(decoded, command);
    }

    #[test]
    fn invalid_base64_fails_closed() {
        let err = decode_author("not base64!").unwrap_err();
        assert!(matches!(err, CodecError::Base64(_)));
    }

    #[test]
    fn truncated_protobuf_fails_closed() {
        let bytes = author("John Doe", None).encode_to_vec();
        let truncated = STANDARD.encode(&bytes[..bytes.len() - 2]);

        let err = decode_author(&truncated).unwrap_err();

        assert!(matches!(err, CodecError::Protobuf { kind: "author", .. }));
    }

    #[test]
    fn malformed_envelope_is_an_error() {
        let err = decode_command(&[0xff, 0xff, 0xff]).unwrap_err();
        assert!(matches!(err, CodecError::Protobuf { kind: "event", .. }));
    }

    #[test]
    fn response_round_trips_as_raw_bytes() {
        let response = Response {
            success: false,
            result: Vec::new(),
            error: Some("action not supported".to_owned()),
        };

        let decoded = decode_response(&encode_response(&response)).unwrap();

        assert_eq!(decoded, response);
    }
}
