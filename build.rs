use tonic_build::manual::{Builder, Method, Service};

const CODEC: &str = "tonic_prost::ProstCodec";
const MESSAGES: &str = "crate::proto::author_management";

fn unary(name: &str, route_name: &str, input_type: &str, output_type: &str) -> Method {
    Method::builder()
        .name(name)
        .route_name(route_name)
        .input_type(input_type)
        .output_type(output_type)
        .codec_path(CODEC)
        .build()
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let author = format!("{MESSAGES}::Author");
    let request_id = format!("{MESSAGES}::RequestId");
    let response = format!("{MESSAGES}::Response");
    let empty = format!("{MESSAGES}::Empty");
    let get_author_response = format!("{MESSAGES}::GetAuthorResponse");

    let service = Service::builder()
        .name("AuthorManagement")
        .package("author_management")
        .method(unary("create_author", "CreateAuthor", &author, &response))
        .method(unary("get_author", "GetAuthor", &request_id, &author))
        .method(unary("get_authors", "GetAuthors", &empty, &get_author_response))
        .method(unary("update_author", "UpdateAuthor", &author, &response))
        .method(unary("delete_author", "DeleteAuthor", &request_id, &response))
        .build();

    Builder::new().build_client(false).compile(&[service]);
}
