//! Telnet option negotiation.
//!
//! The runner wants a dumb line-mode terminal, so every option the server
//! offers or requests is refused: `DO`/`DONT` get `WONT`, `WILL`/`WONT` get
//! `DONT`. Command sequences never reach the data stream. The decoder keeps
//! its state between calls, so a sequence split across two socket reads is
//! handled the same as one delivered whole.

use bytes::{BufMut, BytesMut};
use log::*;

pub const IAC: u8 = 255;
pub const DONT: u8 = 254;
pub const DO: u8 = 253;
pub const WONT: u8 = 252;
pub const WILL: u8 = 251;
pub const SB: u8 = 250;
pub const SE: u8 = 240;

const NUL: u8 = 0;
const XON: u8 = 0x11;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Data,
    Iac,
    Option(u8),
    Sub,
    SubIac,
}

/// Resumable decoder for the server-to-client byte stream
#[derive(Debug)]
pub struct Negotiator {
    state: State,
}

impl Default for Negotiator {
    fn default() -> Self {
        Self::new()
    }
}

impl Negotiator {
    pub fn new() -> Self {
        Self { state: State::Data }
    }

    /// Feed raw socket bytes. Plain data is appended to `data`; any replies
    /// owed to the server are appended to `replies`.
    pub fn decode(&mut self, input: &[u8], data: &mut BytesMut, replies: &mut BytesMut) {
        for &byte in input {
            self.state = match (self.state, byte) {
                (State::Data, IAC) => State::Iac,
                (State::Data, NUL) | (State::Data, XON) => State::Data,
                (State::Data, b) => {
                    data.put_u8(b);
                    State::Data
                }
                (State::Iac, IAC) => {
                    data.put_u8(IAC);
                    State::Data
                }
                (State::Iac, cmd @ (DO | DONT | WILL | WONT)) => State::Option(cmd),
                (State::Iac, SB) => State::Sub,
                (State::Iac, other) => {
                    trace!("Ignoring telnet command {}", other);
                    State::Data
                }
                (State::Option(cmd), option) => {
                    let answer = refusal(cmd);
                    debug!("Refusing telnet option {} ({} -> {})", option, cmd, answer);
                    replies.put_slice(&[IAC, answer, option]);
                    State::Data
                }
                (State::Sub, IAC) => State::SubIac,
                (State::Sub, _) => State::Sub,
                (State::SubIac, SE) => State::Data,
                (State::SubIac, _) => State::Sub,
            };
        }
    }
}

fn refusal(cmd: u8) -> u8 {
    match cmd {
        DO | DONT => WONT,
        _ => DONT,
    }
}

/// Double any IAC byte in outgoing data.
pub fn escape(data: &[u8]) -> BytesMut {
    let mut out = BytesMut::with_capacity(data.len());
    for &byte in data {
        if byte == IAC {
            out.put_u8(IAC);
        }
        out.put_u8(byte);
    }
    out
}
