pub mod fixtures;
pub mod mocks;

pub use fixtures::{fast_config, login_script, send, Step, StubTelnetServer};
pub use mocks::StubExecChannel;
