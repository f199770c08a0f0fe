use crate::types::{Headers, StatusCode, SIP_VERSION};

use super::serialize;

/// Builds a SIP response
#[derive(Debug, Clone)]
pub struct ResponseBuilder {
    status: StatusCode,
    headers: Headers,
    body: String,
}

impl ResponseBuilder {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Headers::new(),
            body: String::new(),
        }
    }

    /// Append a header; repeated names keep every value in order
    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Append one header line per value
    pub fn headers<I, V>(mut self, name: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        for value in values {
            self.headers.append(name, value);
        }
        self
    }

    /// Set the body together with its Content-Type
    pub fn body(mut self, content_type: &str, body: impl Into<String>) -> Self {
        self.headers.append("Content-Type", content_type);
        self.body = body.into();
        self
    }

    pub fn build(self) -> String {
        let start_line = format!("{} {}", SIP_VERSION, self.status);
        serialize(&start_line, &self.headers, &self.body)
    }
}
