mod store;
mod value;

pub use store::VariableStore;
pub use value::{decode_list, encode_list, json_to_text, VariableValue};
