use crate::config::DEFAULT_TIMEOUT;
use crate::core::types::{Protocol, Target};
use std::time::Duration;

/// Global options shared by every subcommand
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// Overrides the protocol's default port when set
    pub port: Option<u16>,
    pub timeout: Duration,
}

impl CommandContext {
    pub fn new() -> Self {
        Self {
            port: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_port(mut self, port: Option<u16>) -> Self {
        self.port = port;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn target(&self, protocol: Protocol, host: &str, username: &str, password: &str) -> Target {
        let target = Target::new(host, protocol, username, password);
        match self.port {
            Some(port) => target.with_port(port),
            None => target,
        }
    }
}

impl Default for CommandContext {
    fn default() -> Self {
        Self::new()
    }
}
