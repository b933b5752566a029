use crate::error::ParseError;
use crate::types::CompositeRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestFormat {
    Json,
    Yaml,
    Auto,
}

#[derive(Debug, Clone)]
pub struct ParsedRequest {
    pub request: CompositeRequest,
    pub format: RequestFormat,
}

pub fn parse_request_str(input: &str, format: RequestFormat) -> Result<ParsedRequest, ParseError> {
    match format {
        RequestFormat::Json => Ok(ParsedRequest {
            request: serde_json::from_str::<CompositeRequest>(input)?,
            format,
        }),
        RequestFormat::Yaml => Ok(ParsedRequest {
            request: serde_yaml::from_str::<CompositeRequest>(input)?,
            format,
        }),
        RequestFormat::Auto => parse_request_auto(input),
    }
}

fn parse_request_auto(input: &str) -> Result<ParsedRequest, ParseError> {
    if input.trim().is_empty() {
        return Err(ParseError::UnknownFormat);
    }

    // JSON always starts with `{` after trimming; anything else goes to YAML first.
    if input.trim_start().starts_with('{') {
        return match serde_json::from_str::<CompositeRequest>(input) {
            Ok(request) => Ok(ParsedRequest {
                request,
                format: RequestFormat::Json,
            }),
            Err(e) => match serde_yaml::from_str::<CompositeRequest>(input) {
                Ok(request) => Ok(ParsedRequest {
                    request,
                    format: RequestFormat::Yaml,
                }),
                Err(_) => Err(ParseError::Json(e)),
            },
        };
    }

    match serde_yaml::from_str::<CompositeRequest>(input) {
        Ok(request) => Ok(ParsedRequest {
            request,
            format: RequestFormat::Yaml,
        }),
        Err(e) => {
            if let Ok(request) = serde_json::from_str::<CompositeRequest>(input) {
                return Ok(ParsedRequest {
                    request,
                    format: RequestFormat::Json,
                });
            }
            Err(ParseError::Yaml(e))
        }
    }
}
