//! Tests for output cleaning

use crate::clean::{echo_skip, split_lines, window_slice, CleanStrategy};

#[test]
fn test_window_slice_between_echo_and_exit() {
    let lines = ["welcome", "ls -la", "file1", "file2", "exit"];
    assert_eq!(window_slice(&lines, "ls -la"), vec!["file1", "file2"]);
}

#[test]
fn test_window_slice_without_terminator_runs_to_end() {
    let lines = ["root@box:~# uptime", " 12:01:33 up 3 days"];
    assert_eq!(window_slice(&lines, "uptime"), vec![" 12:01:33 up 3 days"]);
}

#[test]
fn test_window_slice_without_echo_starts_at_top() {
    let lines = ["file1", "file2", "logout"];
    assert_eq!(window_slice(&lines, "ls"), vec!["file1", "file2"]);
}

#[test]
fn test_window_slice_terminator_is_case_insensitive() {
    let lines = ["ls", "a", "EXIT", "b"];
    assert_eq!(window_slice(&lines, "ls"), vec!["a"]);

    let lines = ["ls", "a", "Connection LOGOUT"];
    assert_eq!(window_slice(&lines, "ls"), vec!["a"]);
}

#[test]
fn test_window_slice_echo_on_last_line() {
    let lines = ["banner", "ls"];
    assert!(window_slice(&lines, "ls").is_empty());
}

#[test]
fn test_echo_skip_drops_comments_and_exit() {
    let lines = ["ls -la", "file1", "# comment", "exit"];
    assert_eq!(echo_skip(&lines, "ls -la", false), vec!["file1"]);
}

#[test]
fn test_echo_skip_removes_only_the_echo() {
    let lines = [
        "root@OpenWrt:~# cat /etc/hostname",
        "OpenWrt",
        "root@OpenWrt:~# ",
    ];
    assert_eq!(
        echo_skip(&lines, "cat /etc/hostname", false),
        vec!["OpenWrt", "root@OpenWrt:~# "]
    );
}

#[test]
fn test_echo_skip_keeps_every_output_line() {
    let output = ["eth0", "eth1", "br-lan", "wlan0"];
    let mut lines = vec!["ip -br link"];
    lines.extend_from_slice(&output);
    assert_eq!(echo_skip(&lines, "ip -br link", false), output.to_vec());
}

#[test]
fn test_echo_skip_following_line() {
    let lines = ["ls -la", "ls -la", "file1", "file2"];
    // Two consecutive echoes: the second is caught by the echo match itself
    assert_eq!(echo_skip(&lines, "ls -la", true), vec!["file2"]);

    let lines = ["ls -la", "file1", "file2"];
    assert_eq!(echo_skip(&lines, "ls -la", true), vec!["file2"]);
}

#[test]
fn test_echo_skip_drops_blank_and_indented_comment() {
    let lines = ["uname", "", "   ", "  # root prompt", "Linux", "Exited"];
    assert_eq!(echo_skip(&lines, "uname", false), vec!["Linux"]);
}

#[test]
fn test_split_lines_strips_carriage_returns() {
    assert_eq!(split_lines("a\r\nb\r\n"), vec!["a", "b", ""]);
    assert_eq!(split_lines("a\rb"), vec!["a\rb"]);
}

#[test]
fn test_apply_window_slice_on_transcript() {
    let raw = "Welcome to OpenWrt\r\nroot@OpenWrt:~# ls -la\r\nfile1\r\nfile2\r\nroot@OpenWrt:~# exit\r\n";
    assert_eq!(CleanStrategy::WindowSlice.apply(raw, "ls -la"), "file1\nfile2");
}

#[test]
fn test_apply_echo_skip_on_transcript() {
    let raw = "ls -la\r\nfile1\r\nfile2\r\nroot@OpenWrt:~# ";
    let strategy = CleanStrategy::default();
    assert_eq!(strategy.apply(raw, "ls -la"), "file1\nfile2\nroot@OpenWrt:~# ");
}

#[test]
fn test_apply_empty_capture() {
    assert_eq!(CleanStrategy::default().apply("", "ls"), "");
    assert_eq!(CleanStrategy::WindowSlice.apply("", "ls"), "");
}
