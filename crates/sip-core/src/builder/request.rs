use crate::types::{Headers, Method, SIP_VERSION};

use super::serialize;

/// Builds a SIP request
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    method: Method,
    uri: String,
    headers: Headers,
    body: String,
}

impl RequestBuilder {
    pub fn new(method: Method, uri: impl Into<String>) -> Self {
        Self {
            method,
            uri: uri.into(),
            headers: Headers::new(),
            body: String::new(),
        }
    }

    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.append(name, value);
        self
    }

    pub fn body(mut self, content_type: &str, body: impl Into<String>) -> Self {
        self.headers.append("Content-Type", content_type);
        self.body = body.into();
        self
    }

    pub fn build(self) -> String {
        let start_line = format!("{} {} {}", self.method, self.uri, SIP_VERSION);
        serialize(&start_line, &self.headers, &self.body)
    }
}
