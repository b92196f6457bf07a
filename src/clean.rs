//! Strips login noise, command echoes and shell prompts from a Telnet
//! transcript. Both strategies are plain substring matching; neither knows
//! anything about shell syntax, wrapped echoes, or output that happens to
//! contain `exit` or the command text itself.

/// How to cut command output out of a raw Telnet capture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanStrategy {
    /// Drop echo lines, blanks, `#` lines and anything mentioning `exit`.
    /// With `skip_following`, the line right after each echo is dropped too.
    EchoSkip { skip_following: bool },
    /// Keep the lines between the command echo and the first `exit`/`logout`.
    WindowSlice,
}

impl Default for CleanStrategy {
    fn default() -> Self {
        CleanStrategy::EchoSkip {
            skip_following: false,
        }
    }
}

impl CleanStrategy {
    pub fn apply(&self, raw: &str, command: &str) -> String {
        let lines = split_lines(raw);
        let kept = match self {
            CleanStrategy::EchoSkip { skip_following } => echo_skip(&lines, command, *skip_following),
            CleanStrategy::WindowSlice => window_slice(&lines, command),
        };
        kept.join("\n")
    }
}

/// Split on `\n`, dropping the `\r` a Telnet line ending leaves behind.
pub fn split_lines(raw: &str) -> Vec<&str> {
    raw.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect()
}

pub fn echo_skip<'a>(lines: &[&'a str], command: &str, skip_following: bool) -> Vec<&'a str> {
    let mut kept = Vec::new();
    let mut skip_next = false;

    for &line in lines {
        if line.contains(command) {
            skip_next = skip_following;
            continue;
        }
        if skip_next {
            skip_next = false;
            continue;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || mentions_exit(line) {
            continue;
        }
        kept.push(line);
    }

    kept
}

pub fn window_slice<'a>(lines: &[&'a str], command: &str) -> Vec<&'a str> {
    let start = lines
        .iter()
        .position(|line| line.contains(command))
        .map_or(0, |i| i + 1);

    let end = lines[start..]
        .iter()
        .position(|line| {
            let lower = line.to_lowercase();
            lower.contains("exit") || lower.contains("logout")
        })
        .map_or(lines.len(), |i| start + i);

    lines[start..end].to_vec()
}

fn mentions_exit(line: &str) -> bool {
    line.to_lowercase().contains("exit")
}
