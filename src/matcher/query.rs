use serde_json::Value as Json;
use serde_json_path::JsonPath;
use tracing::debug;

/// Evaluates a path expression against a claim document.
///
/// Implementations return the matched values in document order. A malformed
/// expression or a path that does not exist yields an empty result, never an
/// error.
pub trait DocumentQuery {
    fn query<'a>(&self, document: &'a Json, path: &str) -> Vec<&'a Json>;
}

impl<T: DocumentQuery + ?Sized> DocumentQuery for &T {
    fn query<'a>(&self, document: &'a Json, path: &str) -> Vec<&'a Json> {
        (**self).query(document, path)
    }
}

/// RFC 9535 JSONPath queries, backed by `serde_json_path`.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonPathQuery;

impl DocumentQuery for JsonPathQuery {
    fn query<'a>(&self, document: &'a Json, path: &str) -> Vec<&'a Json> {
        match JsonPath::parse(path) {
            Ok(json_path) => json_path.query(document).all(),
            Err(error) => {
                debug!(path = %path, %error, "Ignoring malformed JSONPath expression");
                Vec::new()
            }
        }
    }
}
