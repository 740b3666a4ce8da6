pub(crate) mod health_check_controller;
pub(crate) mod kv_controller;
pub(crate) mod publish_controller;
pub(crate) mod request_controller;
