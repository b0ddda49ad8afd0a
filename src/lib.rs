// Library target exists for the integration tests under tests/.
// The binary entry point is main.rs; this file re-declares the module tree so
// that tests can drive `parsons::session::*` and `parsons::app::*` directly.
// Most code is only exercised through the binary, so suppress dead_code warnings.
#![allow(dead_code)]

pub mod app;
pub mod config;
pub mod generator;
pub mod problem;
pub mod session;
pub mod store;
pub mod ui;

// Private: only the binary drives these
mod event;
mod telemetry;
