//! Mood-aware movie recommendation service.
//!
//! Movies are compared by the words in their tags; the nearest neighbours of a
//! chosen movie are filtered by the categories a mood accepts and decorated
//! with display details from TMDB.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
