use crate::config::TelnetConfig;
use crate::core::types::{Protocol, Target};
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::{self, JoinHandle};
use std::time::Duration;

const SERVER_READ_TIMEOUT: Duration = Duration::from_secs(5);

/// One step of a scripted Telnet conversation, seen from the server side
#[derive(Debug, Clone)]
pub enum Step {
    /// Write these bytes to the client
    Send(Vec<u8>),
    /// Read one line from the client and record it (without the newline)
    ReadLine,
    /// Read exactly this many raw bytes and record them
    ReadBytes(usize),
    /// Keep the connection open until the client hangs up
    Hold,
}

pub fn send(text: &str) -> Step {
    Step::Send(text.as_bytes().to_vec())
}

/// Loopback Telnet server that plays a fixed script against one client.
pub struct StubTelnetServer {
    port: u16,
    handle: JoinHandle<Vec<Vec<u8>>>,
}

impl StubTelnetServer {
    pub fn start(script: Vec<Step>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            play(stream, script)
        });

        Self { port, handle }
    }

    pub fn target(&self) -> Target {
        Target::new("127.0.0.1", Protocol::Telnet, "root", "secret").with_port(self.port)
    }

    /// Wait for the script to finish and return what the client sent, one
    /// entry per `ReadLine`/`ReadBytes` step.
    pub fn received(self) -> Vec<Vec<u8>> {
        self.handle.join().unwrap()
    }

    pub fn received_lines(self) -> Vec<String> {
        self.received()
            .into_iter()
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
            .collect()
    }
}

fn play(stream: TcpStream, script: Vec<Step>) -> Vec<Vec<u8>> {
    stream.set_read_timeout(Some(SERVER_READ_TIMEOUT)).unwrap();
    let mut writer = stream.try_clone().unwrap();
    let mut reader = BufReader::new(stream);
    let mut received = Vec::new();

    for step in script {
        match step {
            Step::Send(bytes) => {
                if writer.write_all(&bytes).is_err() {
                    break;
                }
            }
            Step::ReadLine => {
                let mut line = Vec::new();
                match reader.read_until(b'\n', &mut line) {
                    Ok(0) | Err(_) => break,
                    Ok(_) => {
                        if line.last() == Some(&b'\n') {
                            line.pop();
                        }
                        received.push(line);
                    }
                }
            }
            Step::ReadBytes(count) => {
                let mut bytes = vec![0u8; count];
                if reader.read_exact(&mut bytes).is_err() {
                    break;
                }
                received.push(bytes);
            }
            Step::Hold => {
                let mut sink = Vec::new();
                let _ = reader.read_to_end(&mut sink);
            }
        }
    }

    received
}

/// Login exchange up to and including the discarded shell banner.
pub fn login_script() -> Vec<Step> {
    vec![
        send("BusyBox v1.36.1 (OpenWrt)\r\nOpenWrt login: "),
        Step::ReadLine,
        send("Password: "),
        Step::ReadLine,
        send("\r\n\r\nBusyBox v1.36.1 built-in shell (ash)\r\n\r\nroot@OpenWrt:~# "),
    ]
}

/// Timings short enough for loopback tests.
pub fn fast_config(base: TelnetConfig) -> TelnetConfig {
    base.with_timeout(Duration::from_secs(2))
        .with_settle_delay(Duration::from_millis(100))
        .with_post_command_wait(Duration::from_millis(200))
        .with_exit_grace(Duration::from_millis(10))
}
