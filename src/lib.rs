//! eeon library exports for testing

pub mod app;
pub mod core;
pub mod inference;
pub mod server;
pub mod tui;
pub mod visitors;

#[cfg(test)]
pub mod test_support;
