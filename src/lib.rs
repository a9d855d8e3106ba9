#[macro_use] extern crate rocket;
#[macro_use] extern crate serde_derive;

pub mod common;
pub mod config;
pub mod entry;
pub mod fetch;
pub mod loader;
pub mod refresher;
pub mod rest_api;
pub mod server;
pub mod store;
