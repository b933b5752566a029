mod request;
mod returns;
mod step;

pub use request::CompositeRequest;
pub use returns::{ReturnSpec, Returns};
pub use step::ApiRequest;
