//! JSON request admission gate.
//!
//! # Responsibilities
//! - Decide, per request, whether a write request may reach its handler
//! - Require a JSON content-type on POST/PUT/PATCH requests
//! - Require a parseable body when one is present
//! - Skip enforcement for allow-listed paths (file uploads, webhooks)
//!
//! # Design Decisions
//! - Pure function of (request data, policy): no I/O, no logging, no state
//! - Allow-list matching is case-sensitive; `*` matches any remainder
//! - Explicit glob matcher, no regex and no router facilities, so the
//!   policy can be unit tested without a server
//! - Empty bodies always pass: there is nothing to parse

use axum::http::{Method, StatusCode};

/// Methods whose bodies carry data that creates or modifies state.
const WRITE_METHODS: [Method; 3] = [Method::POST, Method::PUT, Method::PATCH];

/// Outcome of evaluating one request against the policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Pass the request through to the next handler unchanged.
    Forward,
    /// Short-circuit with a structured error response.
    Reject(Rejection),
}

/// The two terminal rejection kinds the gate can produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Content-Type missing or not a JSON variant on a write request.
    UnsupportedMediaType,
    /// JSON content-type but the body failed to parse; carries the
    /// parser diagnostic.
    MalformedJson(String),
}

impl Rejection {
    pub fn status(&self) -> StatusCode {
        match self {
            Rejection::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Rejection::MalformedJson(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Short machine-stable label for the error envelope.
    pub fn label(&self) -> &'static str {
        match self {
            Rejection::UnsupportedMediaType => "Unsupported Media Type",
            Rejection::MalformedJson(_) => "Bad Request",
        }
    }

    pub fn message(&self) -> String {
        match self {
            Rejection::UnsupportedMediaType => {
                "Requests must use Content-Type: application/json".to_string()
            }
            Rejection::MalformedJson(detail) => format!("Malformed JSON: {detail}"),
        }
    }
}

/// Immutable admission policy: the ordered allow-list of path patterns
/// exempt from JSON enforcement.
///
/// Constructed once at startup from configuration and shared read-only,
/// so evaluation needs no locking.
#[derive(Debug, Clone)]
pub struct JsonPolicy {
    except_paths: Vec<String>,
}

impl JsonPolicy {
    /// Build a policy from glob patterns. Patterns are matched against
    /// the request path without its leading slash, so both
    /// `api/v1/files/*` and `/api/v1/files/*` spellings are accepted.
    pub fn new(except_paths: Vec<String>) -> Self {
        let except_paths = except_paths
            .into_iter()
            .map(|p| p.trim_start_matches('/').to_string())
            .collect();
        Self { except_paths }
    }

    /// True when `evaluate` could reject this request, i.e. the adapter
    /// must buffer the body before calling it.
    pub fn requires_inspection(&self, method: &Method, path: &str) -> bool {
        WRITE_METHODS.contains(method) && !self.is_excepted(path)
    }

    fn is_excepted(&self, path: &str) -> bool {
        let path = path.trim_start_matches('/');
        self.except_paths.iter().any(|p| pattern_matches(p, path))
    }

    /// Evaluate one request. Idempotent: the same inputs always produce
    /// the same decision.
    pub fn evaluate(
        &self,
        method: &Method,
        path: &str,
        content_type: Option<&str>,
        body: &[u8],
    ) -> GateDecision {
        // Read-only and delete methods are never body-checked.
        if !WRITE_METHODS.contains(method) {
            return GateDecision::Forward;
        }

        if self.is_excepted(path) {
            return GateDecision::Forward;
        }

        if !is_json_media_type(content_type.unwrap_or("")) {
            return GateDecision::Reject(Rejection::UnsupportedMediaType);
        }

        // Empty body is permitted regardless of the declared type.
        if body.is_empty() {
            return GateDecision::Forward;
        }

        match serde_json::from_slice::<serde::de::IgnoredAny>(body) {
            Ok(_) => GateDecision::Forward,
            Err(e) => GateDecision::Reject(Rejection::MalformedJson(e.to_string())),
        }
    }
}

/// Accepts `application/json` and `application/<token>+json`, where
/// `<token>` consists of word characters, dots, plus signs or hyphens,
/// immediately followed by `;` or end-of-value. Case-insensitive.
fn is_json_media_type(value: &str) -> bool {
    let value = value.to_ascii_lowercase();
    let Some(rest) = value.strip_prefix("application/") else {
        return false;
    };
    let subtype = match rest.split_once(';') {
        Some((subtype, _params)) => subtype,
        None => rest,
    };
    if subtype == "json" {
        return true;
    }
    match subtype.strip_suffix("+json") {
        Some(token) => {
            !token.is_empty()
                && token
                    .bytes()
                    .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'.' | b'+' | b'-'))
        }
        None => false,
    }
}

/// Glob match where `*` matches any remainder, including `/`.
/// Everything else is a literal, compared case-sensitively.
fn pattern_matches(pattern: &str, path: &str) -> bool {
    let mut parts = pattern.split('*');
    // split always yields at least one element
    let prefix = parts.next().unwrap_or("");
    if !path.starts_with(prefix) {
        return false;
    }
    let mut pos = prefix.len();

    let mut literals: Vec<&str> = parts.collect();
    if literals.is_empty() {
        // No wildcard: the pattern is an exact path.
        return pos == path.len();
    }
    let suffix = literals.pop().unwrap_or("");

    for literal in literals {
        if literal.is_empty() {
            continue;
        }
        match path[pos..].find(literal) {
            Some(i) => pos += i + literal.len(),
            None => return false,
        }
    }

    if suffix.is_empty() {
        return true;
    }
    path.len() >= pos + suffix.len() && path.ends_with(suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> JsonPolicy {
        JsonPolicy::new(vec![
            "api/v1/files/*".to_string(),
            "api/v1/webhooks/*".to_string(),
        ])
    }

    #[test]
    fn read_and_delete_methods_always_forward() {
        let policy = policy();
        for method in [Method::GET, Method::DELETE, Method::HEAD, Method::OPTIONS] {
            let decision = policy.evaluate(
                &method,
                "/api/v1/items",
                Some("text/plain"),
                b"not json at all",
            );
            assert_eq!(decision, GateDecision::Forward, "method {method}");
        }
    }

    #[test]
    fn excepted_paths_forward_regardless_of_content() {
        let policy = policy();
        let decision = policy.evaluate(
            &Method::POST,
            "/api/v1/files/avatar",
            Some("multipart/form-data; boundary=x"),
            b"--x--",
        );
        assert_eq!(decision, GateDecision::Forward);

        let decision = policy.evaluate(&Method::PUT, "/api/v1/webhooks/github", None, b"payload");
        assert_eq!(decision, GateDecision::Forward);
    }

    #[test]
    fn exception_matching_is_case_sensitive() {
        let policy = policy();
        let decision = policy.evaluate(&Method::POST, "/API/v1/files/avatar", None, b"");
        assert_eq!(
            decision,
            GateDecision::Reject(Rejection::UnsupportedMediaType)
        );
    }

    #[test]
    fn json_object_body_forwards() {
        let decision = policy().evaluate(
            &Method::POST,
            "/api/v1/items",
            Some("application/json"),
            b"{}",
        );
        assert_eq!(decision, GateDecision::Forward);
    }

    #[test]
    fn non_json_content_type_rejected_with_415() {
        let policy = policy();
        for content_type in [Some("text/plain"), Some("application/xml"), None] {
            let decision =
                policy.evaluate(&Method::POST, "/api/v1/items", content_type, b"anything");
            let GateDecision::Reject(rejection) = decision else {
                panic!("expected rejection for {content_type:?}");
            };
            assert_eq!(rejection.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
            assert_eq!(rejection.label(), "Unsupported Media Type");
        }
    }

    #[test]
    fn vendor_json_suffix_qualifies() {
        let decision = policy().evaluate(
            &Method::PATCH,
            "/api/v1/items/3",
            Some("application/vnd.api+json"),
            b"{\"a\":1}",
        );
        assert_eq!(decision, GateDecision::Forward);
    }

    #[test]
    fn content_type_matching_is_case_insensitive_and_allows_params() {
        let policy = policy();
        for content_type in [
            "Application/JSON",
            "application/json; charset=utf-8",
            "application/vnd.api+JSON;ext=bulk",
        ] {
            let decision =
                policy.evaluate(&Method::POST, "/api/v1/items", Some(content_type), b"{}");
            assert_eq!(decision, GateDecision::Forward, "content type {content_type}");
        }
    }

    #[test]
    fn lookalike_subtypes_do_not_qualify() {
        let policy = policy();
        for content_type in ["application/jsonp", "application/+json", "text/json"] {
            let decision =
                policy.evaluate(&Method::POST, "/api/v1/items", Some(content_type), b"{}");
            assert_eq!(
                decision,
                GateDecision::Reject(Rejection::UnsupportedMediaType),
                "content type {content_type}"
            );
        }
    }

    #[test]
    fn malformed_body_rejected_with_parser_detail() {
        let decision = policy().evaluate(
            &Method::POST,
            "/api/v1/items",
            Some("application/json"),
            b"{\"a\":}",
        );
        let GateDecision::Reject(rejection) = decision else {
            panic!("expected rejection");
        };
        assert_eq!(rejection.status(), StatusCode::BAD_REQUEST);
        assert_eq!(rejection.label(), "Bad Request");
        assert!(rejection.message().starts_with("Malformed JSON: "));
        assert!(rejection.message().len() > "Malformed JSON: ".len());
    }

    #[test]
    fn empty_body_forwards_even_with_json_content_type() {
        let decision = policy().evaluate(
            &Method::PUT,
            "/api/v1/items/9",
            Some("application/json"),
            b"",
        );
        assert_eq!(decision, GateDecision::Forward);
    }

    #[test]
    fn evaluation_is_idempotent() {
        let policy = policy();
        let first = policy.evaluate(&Method::POST, "/api/v1/items", Some("text/html"), b"x");
        let second = policy.evaluate(&Method::POST, "/api/v1/items", Some("text/html"), b"x");
        assert_eq!(first, second);
    }

    #[test]
    fn requires_inspection_mirrors_method_and_exception_checks() {
        let policy = policy();
        assert!(policy.requires_inspection(&Method::POST, "/api/v1/items"));
        assert!(!policy.requires_inspection(&Method::GET, "/api/v1/items"));
        assert!(!policy.requires_inspection(&Method::POST, "/api/v1/webhooks/stripe"));
    }

    #[test]
    fn wildcard_matches_any_remainder() {
        assert!(pattern_matches("api/v1/files/*", "api/v1/files/a"));
        assert!(pattern_matches("api/v1/files/*", "api/v1/files/a/b/c"));
        assert!(!pattern_matches("api/v1/files/*", "api/v1/files"));
        assert!(!pattern_matches("api/v1/files/*", "api/v1/filesystem/a"));
    }

    #[test]
    fn pattern_without_wildcard_is_exact() {
        assert!(pattern_matches("api/v1/ping", "api/v1/ping"));
        assert!(!pattern_matches("api/v1/ping", "api/v1/ping/extra"));
    }

    #[test]
    fn interior_wildcard_is_supported() {
        assert!(pattern_matches("api/*/webhooks/*", "api/v2/webhooks/github"));
        assert!(!pattern_matches("api/*/webhooks", "api/v2/webhooks/github"));
    }
}
