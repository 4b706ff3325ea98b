pub mod account;
pub mod catalog;
pub mod cli;
pub mod compare;
pub mod config;
pub mod db;
pub mod history;
pub mod product;
pub mod render;
pub mod search;
pub mod session;
pub mod state;

#[cfg(test)]
mod testing;
