//! Inertia view of an incoming request.

use crate::protocol::{self, constants::headers};
use axum::extract::FromRequestParts;
use http::header::REFERER;
use http::request::Parts;
use http::{HeaderMap, Method, Uri};
use percent_encoding::percent_decode_str;
use std::convert::Infallible;

/// Inertia protocol information parsed from request headers.
///
/// [`InertiaLayer`](super::InertiaLayer) parses it once per request and stores it
/// in the request extensions; handlers can extract it directly.
///
/// # Examples
///
/// ```
/// use http::{HeaderMap, Method, Uri};
/// use inertia_axum::server::InertiaRequest;
///
/// let mut headers = HeaderMap::new();
/// headers.insert("x-inertia", "true".parse().unwrap());
/// headers.insert("x-inertia-partial-component", "Users/Index".parse().unwrap());
/// headers.insert("x-inertia-partial-data", "users, filters".parse().unwrap());
///
/// let req = InertiaRequest::from_parts(&Method::GET, &Uri::from_static("/users"), &headers);
/// assert!(req.is_inertia);
/// assert!(req.is_partial_for("Users/Index"));
/// assert_eq!(req.partial_only.as_deref(), Some(&["users".to_string(), "filters".to_string()][..]));
/// ```
#[derive(Debug, Clone)]
pub struct InertiaRequest {
    /// Request method
    pub method: Method,

    /// Request URI
    pub uri: Uri,

    /// `X-Inertia` carries a boolean literal
    pub is_inertia: bool,

    /// `X-Inertia-Version`
    pub version: Option<String>,

    /// `X-Inertia-Partial-Component`
    pub partial_component: Option<String>,

    /// `X-Inertia-Partial-Data`, `None` when the header is absent
    pub partial_only: Option<Vec<String>>,

    /// `X-Inertia-Partial-Except`, `None` when the header is absent
    pub partial_except: Option<Vec<String>>,

    /// `X-Inertia-Reset`
    pub reset: Vec<String>,

    /// `X-Inertia-Error-Bag`, `None` when absent or empty
    pub error_bag: Option<String>,

    /// `Referer`, `None` when absent or empty
    pub referer: Option<String>,

    /// All request headers
    pub headers: HeaderMap,
}

impl InertiaRequest {
    /// Parse the Inertia headers of a request.
    #[must_use]
    pub fn from_parts(method: &Method, uri: &Uri, headers: &HeaderMap) -> Self {
        let text = |name: &http::HeaderName| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

        InertiaRequest {
            method: method.clone(),
            uri: uri.clone(),
            is_inertia: text(&headers::INERTIA)
                .map(|v| protocol::parse_inertia_flag(&v))
                .unwrap_or(false),
            version: text(&headers::VERSION),
            partial_component: text(&headers::PARTIAL_COMPONENT),
            partial_only: text(&headers::PARTIAL_ONLY).map(|v| protocol::parse_key_list(&v)),
            partial_except: text(&headers::PARTIAL_EXCEPT).map(|v| protocol::parse_key_list(&v)),
            reset: text(&headers::RESET)
                .map(|v| protocol::parse_key_list(&v))
                .unwrap_or_default(),
            error_bag: non_empty(text(&headers::ERROR_BAG)),
            referer: non_empty(text(&REFERER)),
            headers: headers.clone(),
        }
    }

    /// Whether this is a partial reload targeting `component`.
    #[inline]
    #[must_use]
    pub fn is_partial_for(&self, component: &str) -> bool {
        self.partial_component.as_deref() == Some(component)
    }

    /// Percent-decoded path and query, used as the page URL.
    ///
    /// ```
    /// use http::{HeaderMap, Method, Uri};
    /// use inertia_axum::server::InertiaRequest;
    ///
    /// let uri = Uri::from_static("/users?name=J%C3%BCrgen");
    /// let req = InertiaRequest::from_parts(&Method::GET, &uri, &HeaderMap::new());
    /// assert_eq!(req.requested_uri(), "/users?name=Jürgen");
    /// ```
    pub fn requested_uri(&self) -> String {
        let raw = self
            .uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");
        percent_decode_str(raw).decode_utf8_lossy().into_owned()
    }
}

impl<S> FromRequestParts<S> for InertiaRequest
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(request) = parts.extensions.get::<InertiaRequest>() {
            return Ok(request.clone());
        }
        Ok(InertiaRequest::from_parts(&parts.method, &parts.uri, &parts.headers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(pairs: &[(&'static str, &'static str)]) -> InertiaRequest {
        let mut headers = HeaderMap::new();
        for (name, value) in pairs {
            headers.insert(*name, value.parse().unwrap());
        }
        InertiaRequest::from_parts(&Method::GET, &Uri::from_static("/"), &headers)
    }

    #[test]
    fn test_plain_request() {
        let req = request(&[]);
        assert!(!req.is_inertia);
        assert!(req.partial_only.is_none());
        assert!(req.partial_except.is_none());
        assert!(req.reset.is_empty());
        assert!(!req.is_partial_for("Test/Page"));
    }

    #[test]
    fn test_inertia_flag_accepts_any_boolean() {
        assert!(request(&[("x-inertia", "false")]).is_inertia);
        assert!(!request(&[("x-inertia", "yes")]).is_inertia);
    }

    #[test]
    fn test_empty_only_header_is_present_but_empty() {
        let req = request(&[("x-inertia-partial-data", "")]);
        assert_eq!(req.partial_only, Some(vec![]));
    }

    #[test]
    fn test_empty_error_bag_and_referer_are_none() {
        let req = request(&[("x-inertia-error-bag", ""), ("referer", " ")]);
        assert!(req.error_bag.is_none());
        assert!(req.referer.is_none());
    }

    #[test]
    fn test_reset_list() {
        let req = request(&[("x-inertia-reset", "posts, comments")]);
        assert_eq!(req.reset, vec!["posts", "comments"]);
    }
}
