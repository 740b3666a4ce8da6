pub(crate) mod authorized_subject;
pub(crate) mod credential;
