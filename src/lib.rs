pub mod complete;
pub mod config;
pub mod editor;
pub mod error;
pub mod frontend;
pub mod highlight;
pub mod history;
pub mod logging;
pub mod parser;
pub mod terminal;
pub mod ui;
pub mod util;

#[cfg(test)]
mod test_support;
