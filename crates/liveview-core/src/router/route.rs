//! In-session URL parsing.

use url::{Url, form_urlencoded};

use liveview_protocols::QueryParameters;

use crate::error::RouterError;

/// Base used to resolve relative in-app URLs such as `/profile?id=42`.
const RELATIVE_BASE: &str = "http://liveview.local/";

/// A parsed in-session URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub path: String,
    pub query: QueryParameters,
}

/// Split `url` into a path and its query parameters.
///
/// Accepts absolute URLs and app-relative ones. Query segments without `=`
/// are skipped and later duplicates win. Fails only when the string cannot
/// be parsed as a URL at all.
pub fn parse_route(url: &str) -> Result<Route, RouterError> {
    let parsed = match Url::parse(url) {
        Ok(parsed) => parsed,
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(RELATIVE_BASE)
            .and_then(|base| base.join(url))
            .map_err(|e| invalid(url, e))?,
        Err(e) => return Err(invalid(url, e)),
    };

    let mut query = QueryParameters::new();
    for segment in parsed.query().unwrap_or_default().split('&') {
        if !segment.contains('=') {
            continue;
        }
        if let Some((key, value)) = form_urlencoded::parse(segment.as_bytes()).next() {
            query.insert(key.into_owned(), value.into_owned());
        }
    }

    Ok(Route {
        path: parsed.path().to_string(),
        query,
    })
}

fn invalid(url: &str, error: url::ParseError) -> RouterError {
    RouterError::InvalidUrl {
        url: url.to_string(),
        reason: error.to_string(),
    }
}
