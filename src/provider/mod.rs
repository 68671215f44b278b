//! HTTP plumbing shared by the OpenAI story and speech clients.

pub mod http;

pub use http::{bearer_headers, shared_client, status_to_error};
