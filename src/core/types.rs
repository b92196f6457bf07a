use std::fmt;

/// Remote login protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    Telnet,
    Ssh,
}

impl Protocol {
    pub fn default_port(&self) -> u16 {
        match self {
            Protocol::Telnet => 23,
            Protocol::Ssh => 22,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Protocol::Telnet => "telnet",
            Protocol::Ssh => "ssh",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Host and credentials for one session
#[derive(Clone)]
pub struct Target {
    pub host: String,
    pub port: u16,
    pub protocol: Protocol,
    pub username: String,
    password: String,
}

impl Target {
    pub fn new(
        host: impl Into<String>,
        protocol: Protocol,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port: protocol.default_port(),
            protocol,
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// `host:port`, with `localhost` pinned to IPv4 loopback
    pub fn address(&self) -> String {
        format!(
            "{}:{}",
            if self.host == "localhost" { "127.0.0.1" } else { self.host.as_str() },
            self.port
        )
    }
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Target")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("protocol", &self.protocol)
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Result of one remote command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_status: i32,
}

impl CommandOutput {
    pub fn new(stdout: impl Into<String>, stderr: impl Into<String>, exit_status: i32) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: stderr.into(),
            exit_status,
        }
    }
}
