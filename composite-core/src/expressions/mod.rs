mod template;

pub use template::{
    is_token_name, parse_template, placeholders, render, Scope, Segment, Template, TOKEN_RE,
};
