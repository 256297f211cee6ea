// The binary in main.rs is a thin shell over this library; integration tests
// and the criterion bench drive the same modules headlessly.

pub mod app;
pub mod config;
pub mod event;
pub mod logging;
pub mod session;
pub mod source;
pub mod store;
pub mod ui;
