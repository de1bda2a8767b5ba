// Library target for the integration tests and criterion benchmarks.
// The binary entry point is main.rs; this file re-declares the module tree so
// that tests can drive sessions through `quizr::quiz::*` / `quizr::source::*`.
// The terminal front end is only exercised through the binary.
#![allow(dead_code)]

pub mod config;
pub mod error;
pub mod quiz;
pub mod source;
pub mod store;

// Private: theme loading reads the config dir, app ties the screens together
mod app;
mod event;
mod logging;
mod ui;
