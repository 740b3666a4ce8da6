use serde::Deserialize;
use utoipa::IntoParams;

const PATH_SEPARATOR: char = '/';

/// Map a URL path tail onto subject syntax: every `/` becomes `.`.
///
/// Total and idempotent on input that is already dotted.
pub fn to_subject(path: &str) -> String {
    path.replace(PATH_SEPARATOR, &backbone::subject::SEPARATOR.to_string())
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub(crate) struct SubjectParams {
    /// Subject used verbatim, wildcards included.
    pub(crate) subject: Option<String>,
}

impl SubjectParams {
    pub(crate) fn subject(self) -> Option<String> {
        self.subject.filter(|subject| !subject.is_empty())
    }
}
