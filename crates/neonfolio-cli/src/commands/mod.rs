pub mod config;
pub mod demo;
pub mod preview;
pub mod replay;
