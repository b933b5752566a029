use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

use regex::Regex;

/// `{name}` placeholder. Names are restricted so JSON text such as `{"a":1}`
/// never reads as a token.
pub static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([A-Za-z0-9_.\-]+)\}").expect("valid"));

static TOKEN_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.\-]+$").expect("valid"));

/// Whether `name` can appear inside a `{name}` token.
pub fn is_token_name(name: &str) -> bool {
    TOKEN_NAME_RE.is_match(name)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Token(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub segments: Vec<Segment>,
}

/// A name -> value lookup a template can be rendered against.
pub trait Scope {
    fn lookup(&self, name: &str) -> Option<Cow<'_, str>>;
}

impl Scope for BTreeMap<String, String> {
    fn lookup(&self, name: &str) -> Option<Cow<'_, str>> {
        self.get(name).map(|v| Cow::Borrowed(v.as_str()))
    }
}

impl Scope for HashMap<String, String> {
    fn lookup(&self, name: &str) -> Option<Cow<'_, str>> {
        self.get(name).map(|v| Cow::Borrowed(v.as_str()))
    }
}

pub fn parse_template(input: &str) -> Template {
    let mut segments = Vec::new();
    let mut last = 0;
    for caps in TOKEN_RE.captures_iter(input) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if whole.start() > last {
            segments.push(Segment::Literal(input[last..whole.start()].to_string()));
        }
        segments.push(Segment::Token(name.as_str().to_string()));
        last = whole.end();
    }
    if last < input.len() {
        segments.push(Segment::Literal(input[last..].to_string()));
    }
    Template { segments }
}

impl Template {
    /// Single pass against one scope. Unknown tokens are written back as `{name}`.
    pub fn render(&self, scope: &dyn Scope) -> String {
        let mut out = String::new();
        for seg in &self.segments {
            match seg {
                Segment::Literal(l) => out.push_str(l),
                Segment::Token(name) => match scope.lookup(name) {
                    Some(v) => out.push_str(&v),
                    None => {
                        out.push('{');
                        out.push_str(name);
                        out.push('}');
                    }
                },
            }
        }
        out
    }

    pub fn has_tokens(&self) -> bool {
        self.segments.iter().any(|s| matches!(s, Segment::Token(_)))
    }
}

/// Renders `input` against each scope in turn, left to right. Each scope gets
/// exactly one non-recursive pass over the output of the previous one.
pub fn render(input: &str, scopes: &[&dyn Scope]) -> String {
    let mut current = input.to_string();
    for scope in scopes {
        let tpl = parse_template(&current);
        if !tpl.has_tokens() {
            break;
        }
        current = tpl.render(*scope);
    }
    current
}

/// Names of every `{name}` token in `input`, in order of appearance.
pub fn placeholders(input: &str) -> Vec<String> {
    TOKEN_RE
        .captures_iter(input)
        .filter_map(|c| c.get(1).map(|m| m.as_str().to_string()))
        .collect()
}
