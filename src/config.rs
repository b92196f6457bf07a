use crate::clean::CleanStrategy;
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_POST_COMMAND_WAIT: Duration = Duration::from_secs(2);
pub const DEFAULT_EXIT_GRACE: Duration = Duration::from_millis(200);

pub const LOGIN_PROMPT: &str = "login: ";
pub const PASSWORD_PROMPT: &str = "Password: ";

/// How the Telnet backend collects output once the command is sent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureMode {
    /// Take whatever has arrived by the end of the dwell, then log out.
    Drain,
    /// Log out after the dwell and read until the remote hangs up.
    UntilClose,
}

/// Telnet session tuning
#[derive(Debug, Clone)]
pub struct TelnetConfig {
    /// Connect, prompt and read timeout
    pub timeout: Duration,
    /// Pause after the password before the banner is discarded
    pub settle_delay: Duration,
    /// Fixed dwell after the command is written. Output produced after
    /// this elapses is lost.
    pub post_command_wait: Duration,
    pub exit_grace: Duration,
    pub capture: CaptureMode,
    pub clean: CleanStrategy,
}

impl Default for TelnetConfig {
    fn default() -> Self {
        Self::echo_skip()
    }
}

impl TelnetConfig {
    /// Drain after a 2s dwell and clean with echo-skip.
    pub fn echo_skip() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            settle_delay: Duration::from_millis(500),
            post_command_wait: DEFAULT_POST_COMMAND_WAIT,
            exit_grace: DEFAULT_EXIT_GRACE,
            capture: CaptureMode::Drain,
            clean: CleanStrategy::default(),
        }
    }

    /// Log out after a short dwell, read to EOF and clean with window-slice.
    pub fn window_slice() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            settle_delay: Duration::from_secs(1),
            post_command_wait: Duration::from_millis(500),
            exit_grace: DEFAULT_EXIT_GRACE,
            capture: CaptureMode::UntilClose,
            clean: CleanStrategy::WindowSlice,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    pub fn with_post_command_wait(mut self, wait: Duration) -> Self {
        self.post_command_wait = wait;
        self
    }

    pub fn with_exit_grace(mut self, grace: Duration) -> Self {
        self.exit_grace = grace;
        self
    }

    pub fn with_clean(mut self, clean: CleanStrategy) -> Self {
        self.clean = clean;
        self
    }
}

/// SSH session tuning
#[derive(Debug, Clone)]
pub struct SshConfig {
    pub timeout: Duration,
}

impl Default for SshConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl SshConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
