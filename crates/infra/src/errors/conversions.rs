//! Conversions from external infrastructure errors into client errors.

use std::error::Error as StdError;

use courier_domain::constants::{NO_HTTP_STATUS, RETRY_AFTER_CONTEXT_KEY};
use courier_domain::{ClientError, ErrorCode};
use reqwest::Error as HttpError;
use serde_json::{Map, Value};
use url::ParseError as UrlError;

/// Longest slice of a non-JSON error body kept as the failure message.
const MAX_RAW_MESSAGE_LEN: usize = 512;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub ClientError);

impl From<InfraError> for ClientError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<ClientError> for InfraError {
    fn from(value: ClientError) -> Self {
        Self(value)
    }
}

trait IntoClientError {
    fn into_client_error(self) -> ClientError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → ClientError */
/* -------------------------------------------------------------------------- */

impl IntoClientError for HttpError {
    fn into_client_error(self) -> ClientError {
        let detail = error_chain(&self);

        if self.is_timeout() {
            return ClientError::network(format!("request timed out: {detail}"));
        }

        #[cfg(not(target_arch = "wasm32"))]
        if self.is_connect() {
            return ClientError::network(format!("connection failed: {detail}"));
        }

        ClientError::network(detail)
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        Self(value.into_client_error())
    }
}

/* -------------------------------------------------------------------------- */
/* url::ParseError → ClientError */
/* -------------------------------------------------------------------------- */

impl IntoClientError for UrlError {
    fn into_client_error(self) -> ClientError {
        ClientError::new(
            ErrorCode::Validation,
            format!("invalid request URL: {self}"),
            NO_HTTP_STATUS,
        )
    }
}

impl From<UrlError> for InfraError {
    fn from(value: UrlError) -> Self {
        Self(value.into_client_error())
    }
}

/* -------------------------------------------------------------------------- */
/* HTTP responses → ClientError */
/* -------------------------------------------------------------------------- */

/// Fields of a JSON error body. Each one is read independently, so a
/// mistyped field never hides the others.
#[derive(Debug, Default)]
struct ErrorBody {
    code: Option<String>,
    message: Option<String>,
    context: Option<Map<String, Value>>,
}

impl ErrorBody {
    fn parse(body: &str) -> Self {
        match serde_json::from_str::<Value>(body) {
            Ok(Value::Object(mut fields)) => Self {
                code: fields.get("code").and_then(Value::as_str).map(str::to_owned),
                message: fields.get("message").and_then(Value::as_str).map(str::to_owned),
                context: match fields.remove("context") {
                    Some(Value::Object(context)) => Some(context),
                    _ => None,
                },
            },
            Ok(Value::Null) => Self::default(),
            _ => {
                let raw = body.trim();
                Self {
                    message: (!raw.is_empty()).then(|| truncate(raw, MAX_RAW_MESSAGE_LEN)),
                    ..Self::default()
                }
            }
        }
    }
}

/// Build the failure for a non-2xx response.
///
/// `request_line` is `"<METHOD> <path>"` and only appears in the message when
/// the body offers nothing better.
pub fn status_failure(
    status: reqwest::StatusCode,
    body: &str,
    retry_after_secs: Option<u64>,
    request_line: &str,
) -> ClientError {
    let ErrorBody { code, message, mut context } = ErrorBody::parse(body);

    let code = code.filter(|code| !code.trim().is_empty()).map_or_else(
        || ErrorCode::from_status(status.as_u16()),
        |code| ErrorCode::from(code.as_str()),
    );

    let message = message.filter(|m| !m.trim().is_empty()).unwrap_or_else(|| {
        format!(
            "{request_line} returned {} {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown Status")
        )
    });

    if let Some(secs) = retry_after_secs {
        let context = context.get_or_insert_with(Map::new);
        context.entry(RETRY_AFTER_CONTEXT_KEY).or_insert_with(|| Value::from(secs));
    }

    let error = ClientError::new(code, message, status.as_u16());
    match context {
        Some(context) => error.with_context(context),
        None => error,
    }
}

/// The body of a successful response could not be read off the wire.
pub fn body_read_failure(status: reqwest::StatusCode, err: &HttpError) -> ClientError {
    ClientError::new(
        ErrorCode::NetworkError,
        format!("failed to read response body: {}", error_chain(err)),
        status.as_u16(),
    )
}

/// Parse a `Retry-After` header given in delta-seconds.
///
/// HTTP-date values are ignored.
pub fn parse_retry_after(value: Option<&reqwest::header::HeaderValue>) -> Option<u64> {
    value?.to_str().ok()?.trim().parse().ok()
}

fn error_chain(err: &dyn StdError) -> String {
    let mut rendered = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !rendered.contains(&cause_text) {
            rendered.push_str(": ");
            rendered.push_str(&cause_text);
        }
        source = cause.source();
    }
    rendered
}

fn truncate(text: &str, max: usize) -> String {
    if text.len() <= max {
        return text.to_string();
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use std::net::TcpListener;
    use std::time::Duration;

    use reqwest::header::HeaderValue;
    use reqwest::{Client, StatusCode};
    use serde_json::json;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[test]
    fn body_code_and_message_take_precedence() {
        let error = status_failure(
            StatusCode::NOT_FOUND,
            r#"{"code":"not_found","message":"Widget w1 not found"}"#,
            None,
            "GET /widgets/w1",
        );

        assert_eq!(error.code(), &ErrorCode::NotFound);
        assert_eq!(error.status(), 404);
        assert_eq!(error.message(), "Widget w1 not found");
        assert!(error.context().is_none());
    }

    #[test]
    fn body_code_outside_vocabulary_is_kept() {
        let error =
            status_failure(StatusCode::BAD_REQUEST, r#"{"code":"bad_request"}"#, None, "POST /x");

        assert_eq!(error.code(), &ErrorCode::Other("bad_request".to_string()));
        assert_eq!(error.message(), "POST /x returned 400 Bad Request");
    }

    #[test]
    fn missing_body_falls_back_to_status_table() {
        let error = status_failure(StatusCode::CONFLICT, "", None, "PATCH /widgets/w1");

        assert_eq!(error.code(), &ErrorCode::Conflict);
        assert_eq!(error.status(), 409);
        assert_eq!(error.message(), "PATCH /widgets/w1 returned 409 Conflict");
    }

    #[test]
    fn raw_text_body_becomes_message() {
        let error =
            status_failure(StatusCode::BAD_GATEWAY, "  upstream down \n", None, "GET /widgets");

        assert_eq!(error.code(), &ErrorCode::Unknown);
        assert_eq!(error.status(), 502);
        assert_eq!(error.message(), "upstream down");
    }

    #[test]
    fn mistyped_fields_do_not_hide_the_body_code() {
        let error = status_failure(
            StatusCode::BAD_REQUEST,
            r#"{"code":"conflict","message":42}"#,
            None,
            "POST /widgets",
        );

        assert_eq!(error.code(), &ErrorCode::Conflict);
        assert_eq!(error.message(), "POST /widgets returned 400 Bad Request");

        let error = status_failure(
            StatusCode::BAD_REQUEST,
            r#"{"code":"conflict","message":"dup","context":"widget"}"#,
            None,
            "POST /widgets",
        );

        assert_eq!(error.code(), &ErrorCode::Conflict);
        assert_eq!(error.message(), "dup");
        assert!(error.context().is_none());
    }

    #[test]
    fn null_body_is_treated_as_empty() {
        let error = status_failure(StatusCode::NOT_FOUND, "null", None, "GET /widgets/w1");

        assert_eq!(error.code(), &ErrorCode::NotFound);
        assert_eq!(error.message(), "GET /widgets/w1 returned 404 Not Found");
    }

    #[test]
    fn long_raw_bodies_are_truncated() {
        let body = "x".repeat(2_000);
        let error = status_failure(StatusCode::INTERNAL_SERVER_ERROR, &body, None, "GET /");

        assert_eq!(error.message().len(), MAX_RAW_MESSAGE_LEN + 3);
        assert!(error.message().ends_with("..."));
    }

    #[test]
    fn retry_after_is_merged_into_context() {
        let error = status_failure(
            StatusCode::TOO_MANY_REQUESTS,
            r#"{"message":"slow down","context":{"bucket":"writes"}}"#,
            Some(7),
            "POST /widgets",
        );

        assert_eq!(error.code(), &ErrorCode::RateLimited);
        let context = error.context().unwrap();
        assert_eq!(context["bucket"], json!("writes"));
        assert_eq!(context[RETRY_AFTER_CONTEXT_KEY], json!(7));
        assert_eq!(error.retry_after(), Some(Duration::from_secs(7)));
    }

    #[test]
    fn body_supplied_retry_hint_wins() {
        let error = status_failure(
            StatusCode::TOO_MANY_REQUESTS,
            r#"{"context":{"retry_after_secs":30}}"#,
            Some(7),
            "GET /widgets",
        );

        assert_eq!(error.retry_after(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn retry_after_accepts_delta_seconds_only() {
        assert_eq!(parse_retry_after(Some(&HeaderValue::from_static("12"))), Some(12));
        assert_eq!(
            parse_retry_after(Some(&HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT"))),
            None
        );
        assert_eq!(parse_retry_after(None), None);
    }

    #[test]
    fn url_errors_map_to_validation() {
        let err = url::Url::parse("not a url").unwrap_err();
        let mapped: ClientError = InfraError::from(err).into();

        assert_eq!(mapped.code(), &ErrorCode::Validation);
        assert_eq!(mapped.status(), 0);
    }

    #[tokio::test]
    async fn refused_connection_maps_to_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = Client::builder().no_proxy().build().unwrap();
        let err = client.get(format!("http://{addr}/")).send().await.unwrap_err();

        let mapped: ClientError = InfraError::from(err).into();
        assert_eq!(mapped.code(), &ErrorCode::NetworkError);
        assert_eq!(mapped.status(), 0);
        assert!(mapped.message().starts_with("connection failed"));
    }

    #[tokio::test]
    async fn timeouts_say_so() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let client =
            Client::builder().no_proxy().timeout(Duration::from_millis(50)).build().unwrap();
        let err = client.get(server.uri()).send().await.unwrap_err();

        let mapped: ClientError = InfraError::from(err).into();
        assert_eq!(mapped.code(), &ErrorCode::NetworkError);
        assert!(mapped.message().starts_with("request timed out"));
    }
}
