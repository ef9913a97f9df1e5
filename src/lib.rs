//! Turns web pages without feeds into RSS: periodic fetching, heuristic
//! article extraction and per-feed RSS artifacts served from disk.

pub mod cli;
pub mod config;
pub mod discovery;
pub mod domain;
pub mod errors;
pub mod extract;
pub mod fetch;
pub mod opml;
pub mod rss;
pub mod services;
pub mod storage;
pub mod util;
