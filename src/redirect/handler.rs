//! Redirect handlers.
//!
//! # Responsibilities
//! - Match on the percent-decoded request path
//! - Answer matched paths with `301 Moved Permanently` + `Location`
//! - Hand unmatched requests to the fallback service untouched
//! - Build handlers from a map or from a YAML / JSON document
//!
//! # Design Decisions
//! - `Redirect<T, S>` is a `tower::Service`; an axum `Router` is a valid fallback
//! - `poll_ready` is delegated to the fallback so its readiness is respected
//! - Structured builders return `Built`, which always contains a handler

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::http::{header, HeaderValue, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use futures_util::future::{self, Either, Ready};
use percent_encoding::percent_decode_str;
use tower::Service;

use crate::redirect::decode::{decode_entries, DecodeError, Format};
use crate::redirect::table::{EntryList, PathMap, RedirectTable};

/// Service that redirects paths found in `T` and forwards everything else to `S`.
#[derive(Debug)]
pub struct Redirect<T, S> {
    table: Arc<T>,
    fallback: S,
}

impl<T, S> Redirect<T, S>
where
    T: RedirectTable,
{
    pub fn new(table: T, fallback: S) -> Self {
        Self {
            table: Arc::new(table),
            fallback,
        }
    }

    /// The frozen table this handler resolves against.
    pub fn table(&self) -> &T {
        &self.table
    }
}

impl<T, S: Clone> Clone for Redirect<T, S> {
    fn clone(&self) -> Self {
        Self {
            table: Arc::clone(&self.table),
            fallback: self.fallback.clone(),
        }
    }
}

impl<T, S, B> Service<Request<B>> for Redirect<T, S>
where
    T: RedirectTable,
    S: Service<Request<B>, Response = Response>,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Either<Ready<Result<Response, S::Error>>, S::Future>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.fallback.poll_ready(cx)
    }

    fn call(&mut self, req: Request<B>) -> Self::Future {
        let location = {
            let path = decoded_path(req.uri().path());
            resolve(&*self.table, &path)
        };

        match location {
            Some(location) => Either::Left(future::ready(Ok(permanent_redirect(location)))),
            None => Either::Right(self.fallback.call(req)),
        }
    }
}

/// Redirect target for `path`, if it has one that fits in a header.
fn resolve<T: RedirectTable>(table: &T, path: &str) -> Option<HeaderValue> {
    let Some(url) = table.lookup(path) else {
        tracing::trace!(path = %path, "No redirect matched");
        return None;
    };

    match HeaderValue::from_str(url) {
        Ok(location) => {
            tracing::debug!(path = %path, location = %url, "Redirecting");
            Some(location)
        }
        Err(_) => {
            tracing::warn!(
                path = %path,
                location = ?url,
                "Redirect target is not a valid header value, using fallback"
            );
            None
        }
    }
}

/// Percent-decode a request path; raw path if the result is not UTF-8.
fn decoded_path(raw: &str) -> Cow<'_, str> {
    percent_decode_str(raw)
        .decode_utf8()
        .unwrap_or(Cow::Borrowed(raw))
}

fn permanent_redirect(location: HeaderValue) -> Response {
    (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, location)]).into_response()
}

/// A handler built from a structured document, paired with the decode error.
///
/// The handler is present even when `error` is set; it then serves only the
/// entries that decoded (often none), sending everything else to the fallback.
#[derive(Debug)]
#[must_use = "a decode error is only reported through `Built`"]
pub struct Built<H> {
    pub handler: H,
    pub error: Option<DecodeError>,
}

impl<H> Built<H> {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    pub fn into_parts(self) -> (H, Option<DecodeError>) {
        (self.handler, self.error)
    }

    /// Discard the degraded handler if decoding failed.
    pub fn into_result(self) -> Result<H, DecodeError> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.handler),
        }
    }
}

/// Build a handler that redirects each key of `paths_to_urls` to its value.
pub fn map_handler<S>(paths_to_urls: HashMap<String, String>, fallback: S) -> Redirect<PathMap, S> {
    Redirect::new(PathMap::new(paths_to_urls), fallback)
}

/// Build a handler from a YAML list of `path` / `url` records.
///
/// ```yaml
/// - path: /some-path
///   url: https://www.some-url.com/demo
/// ```
///
/// The earliest record for a path wins.
pub fn yaml_handler<S>(yml: &[u8], fallback: S) -> Built<Redirect<EntryList, S>> {
    structured_handler(yml, Format::Yaml, fallback)
}

/// Build a handler from a JSON array of `{"path": ..., "url": ...}` objects.
pub fn json_handler<S>(json: &[u8], fallback: S) -> Built<Redirect<EntryList, S>> {
    structured_handler(json, Format::Json, fallback)
}

/// Build a handler from a document in the given format.
pub fn structured_handler<S>(
    data: &[u8],
    format: Format,
    fallback: S,
) -> Built<Redirect<EntryList, S>> {
    let (entries, error) = decode_entries(data, format);
    Built {
        handler: Redirect::new(EntryList::new(entries), fallback),
        error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::routing::get;
    use axum::Router;
    use std::convert::Infallible;
    use tower::ServiceExt;

    fn default_mux() -> Router {
        Router::new().route("/", get(|| async { "Hello, world!" }))
    }

    fn request(path: &str) -> Request<Body> {
        Request::builder().uri(path).body(Body::empty()).unwrap()
    }

    fn location(response: &Response) -> Option<&str> {
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn gophercises_paths() -> HashMap<String, String> {
        HashMap::from([
            (
                "/urlshort-go".to_string(),
                "https://github.com/gophercises/urlshort".to_string(),
            ),
            (
                "/urlshort-final".to_string(),
                "https://github.com/gophercises/urlshort/tree/solution".to_string(),
            ),
        ])
    }

    #[tokio::test]
    async fn test_map_handler_redirects_known_path() {
        let handler = map_handler(gophercises_paths(), default_mux());

        let response = handler.oneshot(request("/urlshort-go")).await.unwrap();
        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(
            location(&response),
            Some("https://github.com/gophercises/urlshort")
        );
    }

    #[tokio::test]
    async fn test_map_handler_every_key_redirects() {
        let paths = gophercises_paths();
        let handler = map_handler(paths.clone(), default_mux());

        for (path, url) in &paths {
            let response = handler.clone().oneshot(request(path)).await.unwrap();
            assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
            assert_eq!(location(&response), Some(url.as_str()));
        }
    }

    #[tokio::test]
    async fn test_map_handler_unknown_path_falls_back() {
        let handler = map_handler(gophercises_paths(), default_mux());

        let response = handler.clone().oneshot(request("/unknown")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(location(&response).is_none());

        let response = handler.oneshot(request("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "Hello, world!");
    }

    #[tokio::test]
    async fn test_query_string_is_not_part_of_path() {
        let handler = map_handler(gophercises_paths(), default_mux());

        let response = handler
            .oneshot(request("/urlshort-go?ref=readme"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
    }

    #[tokio::test]
    async fn test_fallback_response_is_returned_unchanged() {
        let fallback = tower::service_fn(|_req: Request<Body>| async {
            Ok::<_, Infallible>(
                (StatusCode::IM_A_TEAPOT, [("x-fallback", "yes")], "short and stout").into_response(),
            )
        });
        let handler = map_handler(HashMap::new(), fallback);

        let response = handler.oneshot(request("/anything")).await.unwrap();
        assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
        assert_eq!(response.headers().get("x-fallback").unwrap(), "yes");
        assert_eq!(body_text(response).await, "short and stout");
    }

    #[tokio::test]
    async fn test_yaml_handler_redirects_and_falls_back() {
        let yml = b"- path: /some-path\n  url: https://www.some-url.com/demo";
        let built = yaml_handler(yml, default_mux());
        assert!(built.is_ok());
        let handler = built.into_result().unwrap();

        let response = handler.clone().oneshot(request("/some-path")).await.unwrap();
        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(location(&response), Some("https://www.some-url.com/demo"));

        let response = handler.oneshot(request("/other")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_yaml_handler_first_match_wins() {
        let yml = b"
- path: /dup
  url: https://a.example
- path: /dup
  url: https://b.example
";
        let handler = yaml_handler(yml, default_mux()).into_result().unwrap();
        assert_eq!(handler.table().len(), 2);

        let response = handler.oneshot(request("/dup")).await.unwrap();
        assert_eq!(location(&response), Some("https://a.example"));
    }

    #[tokio::test]
    async fn test_yaml_decode_failure_still_yields_fallback_handler() {
        let built = yaml_handler(b"- path: /a\n  url: [oops\n", default_mux());
        let (handler, error) = built.into_parts();
        assert!(error.is_some());
        assert!(handler.table().is_empty());

        for path in ["/a", "/", "/anything"] {
            let response = handler.clone().oneshot(request(path)).await.unwrap();
            assert_ne!(response.status(), StatusCode::MOVED_PERMANENTLY);
        }
    }

    #[tokio::test]
    async fn test_yaml_partial_decode_serves_surviving_entries() {
        let yml = b"
- path: /broken
  url: {not: a string}
- path: /works
  url: https://works.example
";
        let built = yaml_handler(yml, default_mux());
        assert!(!built.is_ok());

        let response = built.handler.clone().oneshot(request("/works")).await.unwrap();
        assert_eq!(location(&response), Some("https://works.example"));

        let response = built.handler.oneshot(request("/broken")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_json_handler() {
        let json = br#"[{"path": "/gh", "url": "https://github.com"}]"#;
        let handler = json_handler(json, default_mux()).into_result().unwrap();

        let response = handler.oneshot(request("/gh")).await.unwrap();
        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(location(&response), Some("https://github.com"));
    }

    #[tokio::test]
    async fn test_handlers_nest() {
        let map = map_handler(gophercises_paths(), default_mux());
        let yml = b"- path: /urlshort-go\n  url: https://example.com/from-yaml\n";
        let handler = yaml_handler(yml, map).into_result().unwrap();

        // Outer table is consulted first
        let response = handler.clone().oneshot(request("/urlshort-go")).await.unwrap();
        assert_eq!(location(&response), Some("https://example.com/from-yaml"));

        let response = handler.clone().oneshot(request("/urlshort-final")).await.unwrap();
        assert_eq!(
            location(&response),
            Some("https://github.com/gophercises/urlshort/tree/solution")
        );

        let response = handler.oneshot(request("/")).await.unwrap();
        assert_eq!(body_text(response).await, "Hello, world!");
    }

    #[tokio::test]
    async fn test_encoded_request_path_matches_decoded_entry() {
        let yml = "- path: /hello world\n  url: https://a.example\n- path: /café\n  url: https://b.example\n";
        let handler = yaml_handler(yml.as_bytes(), default_mux()).into_result().unwrap();

        let response = handler.clone().oneshot(request("/hello%20world")).await.unwrap();
        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(location(&response), Some("https://a.example"));

        let response = handler.oneshot(request("/caf%C3%A9")).await.unwrap();
        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(location(&response), Some("https://b.example"));
    }

    #[tokio::test]
    async fn test_map_handler_decodes_request_path() {
        let paths = HashMap::from([("/a b".to_string(), "https://a.example".to_string())]);
        let handler = map_handler(paths, default_mux());

        let response = handler.oneshot(request("/a%20b")).await.unwrap();
        assert_eq!(location(&response), Some("https://a.example"));
    }

    #[test]
    fn test_decoded_path() {
        assert_eq!(decoded_path("/plain"), "/plain");
        assert_eq!(decoded_path("/hello%20world"), "/hello world");
        assert_eq!(decoded_path("/caf%C3%A9"), "/café");
        // Not UTF-8 once decoded: compared as sent
        assert_eq!(decoded_path("/bad%FF"), "/bad%FF");
    }

    #[tokio::test]
    async fn test_missing_url_field_is_not_an_error() {
        let built = yaml_handler(b"- path: /a\n", default_mux());
        assert!(built.is_ok());
        assert_eq!(built.handler.table().len(), 1);
    }

    #[tokio::test]
    async fn test_unrepresentable_location_falls_back() {
        let paths = HashMap::from([("/bad".to_string(), "https://a\nb".to_string())]);
        let handler = map_handler(paths, default_mux());

        let response = handler.oneshot(request("/bad")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_handler_is_shareable_across_tasks() {
        fn assert_shareable<T: Send + Sync + Clone + 'static>() {}
        assert_shareable::<Redirect<PathMap, Router>>();
        assert_shareable::<Redirect<EntryList, Redirect<PathMap, Router>>>();
    }
}
