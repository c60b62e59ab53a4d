use std::time::Duration;

use crate::consts::consts::DEFAULT_ENDPOINT;

/// Where and how the HTTP gateway talks to the person resource
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub endpoint: String,
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

// Implements: https://rust-unofficial.github.io/patterns/patterns/creational/builder.html
impl ClientOptions {
    /// Full URL of the resource, every method targets the same path
    pub fn set_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Upper bound for a whole request, from dispatch to the last byte of the body
    pub fn set_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn set_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(5),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_defaults() {
        let options = ClientOptions::default()
            .set_endpoint("http://localhost:8080/api/personas")
            .set_timeout(Duration::from_secs(1));

        assert_eq!(options.endpoint, "http://localhost:8080/api/personas");
        assert_eq!(options.timeout, Duration::from_secs(1));
        assert_eq!(options.connect_timeout, Duration::from_secs(5));
    }
}
