pub mod command;
pub mod config;
pub mod geocode;
pub mod models;
pub mod storage;
pub mod store;
pub mod tiles;
pub mod viewport;
