pub(crate) mod common;
pub(crate) mod request;
pub(crate) mod step;
