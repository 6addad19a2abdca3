pub mod app;
pub mod cli;
pub mod client;
pub mod config;
pub mod console;
pub mod dex;
pub mod model;
pub mod output;
pub mod search;
pub mod utils;
pub mod view;

#[cfg(test)]
mod tests;
