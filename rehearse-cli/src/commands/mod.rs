pub mod config;
pub mod key;
pub mod serve;
