use axum::http::{HeaderValue, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Issues time-ordered request ids for requests that arrive without one.
#[derive(Clone, Copy, Debug, Default)]
pub struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::now_v7().to_string())
            .ok()
            .map(RequestId::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_parse_as_uuid() {
        let request = Request::new(());
        let id = MakeRequestUuidV7.make_request_id(&request).unwrap();
        let text = id.header_value().to_str().unwrap();
        assert_eq!(Uuid::parse_str(text).unwrap().get_version_num(), 7);
    }
}
