#![forbid(unsafe_code)]

//! Orchestration engine for composite requests: runs an ordered chain of
//! outbound HTTP calls, threading JSONPath-extracted values between them.

pub mod executor;

pub use crate::executor::{
    ExecutorConfig, ForwardedAuthorization, HttpClient, HttpError, Orchestrator,
    ReqwestHttpClient, StepError, StringResponse,
};
