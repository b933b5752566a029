mod rules;
mod validator;

use crate::error::ValidationError;
use crate::types::CompositeRequest;
use validator::Validator;

pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

impl Validate for CompositeRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_request(self)
    }
}

/// Static check of a whole composite request, collecting every violation.
pub fn validate_request(req: &CompositeRequest) -> Result<(), ValidationError> {
    let mut v = Validator::new();
    v.validate_request(req);
    v.finish()
}
