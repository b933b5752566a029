#![forbid(unsafe_code)]

//! Composite request model: parsing, validation, `{name}` templates and the
//! run-scoped variable store.

pub mod error;
pub mod expressions;
pub mod parser;
pub mod types;
pub mod validate;
pub mod variables;

pub use crate::error::{ParseError, ValidationError, Violation};
pub use crate::expressions::{is_token_name, parse_template, render, Scope, Segment, Template};
pub use crate::parser::{parse_request_str, ParsedRequest, RequestFormat};
pub use crate::types::{ApiRequest, CompositeRequest, ReturnSpec, Returns};
pub use crate::validate::{validate_request, Validate};
pub use crate::variables::{decode_list, encode_list, json_to_text, VariableStore, VariableValue};
