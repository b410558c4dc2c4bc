pub mod app;
pub mod cli;
pub mod config;
pub mod export;
pub mod fetch;
pub mod model;
pub mod table;
pub mod view;

#[cfg(test)]
mod tests;
