pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod notify;
pub mod page;
pub mod prompt;
pub mod store;

#[cfg(test)]
mod test_support;
