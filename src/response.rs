use crate::proto::event_manager::Response;
use crate::router::Outcome;

/// Shapes a dispatch outcome into the queue reply envelope.
///
/// `success` is set exactly when there is no error, and a failed outcome
/// never carries results.
pub fn build_response(outcome: Outcome) -> Response {
    match outcome {
        Ok(result) => Response {
            success: true,
            result,
            error: None,
        },
        Err(err) => Response {
            success: false,
            result: Vec::new(),
            error: Some(err.to_string()),
        },
    }
}
