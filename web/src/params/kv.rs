use crate::Error;
use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub(crate) struct KvParams {
    /// Name of an existing key-value bucket.
    pub(crate) bucket: Option<String>,
    pub(crate) key: Option<String>,
}

impl KvParams {
    /// Both `bucket` and `key` must be present and non-empty.
    pub(crate) fn into_target(self) -> Result<(String, String), Error> {
        match (self.bucket, self.key) {
            (Some(bucket), Some(key)) if !bucket.is_empty() && !key.is_empty() => Ok((bucket, key)),
            _ => Err(Error::bad_request("key and bucket must be defined")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn params(bucket: Option<&str>, key: Option<&str>) -> KvParams {
        KvParams {
            bucket: bucket.map(str::to_string),
            key: key.map(str::to_string),
        }
    }

    #[test]
    fn both_parts_are_required() {
        for incomplete in [
            params(None, Some("k")),
            params(Some("b"), None),
            params(Some(""), Some("k")),
            params(None, None),
        ] {
            let err = incomplete.into_target().unwrap_err();
            assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn complete_params_yield_the_target() {
        let (bucket, key) = params(Some("profiles"), Some("john")).into_target().unwrap();
        assert_eq!(bucket, "profiles");
        assert_eq!(key, "john");
    }
}
