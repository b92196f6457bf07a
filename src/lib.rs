pub mod clean;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod error;
pub mod transport;

#[cfg(test)]
pub mod testing;

#[cfg(test)]
mod clean_test;
