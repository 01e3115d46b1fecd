//! Static catalog site generator for mobile phone themes.
//!
//! Reads a JSON theme catalog and writes a filterable home page plus one
//! detail page per theme.

pub mod catalog;
pub mod classify;
pub mod config;
pub mod error;
pub mod filter;
pub mod generate;
pub mod html;
pub mod lightbox;
pub mod options;
pub mod types;
pub mod utils;
