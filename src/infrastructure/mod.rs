pub mod config;
pub mod extract;
pub mod network;
pub mod storage;
