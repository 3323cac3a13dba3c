#![forbid(unsafe_code)]

pub mod challenge;
pub mod changelog;
pub mod cli;
pub mod extract;
pub mod feed;
pub mod fetchers;
pub mod logging;
pub mod models;
