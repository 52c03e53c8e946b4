//! wordcycle-server — HTTP front end for the vocabulary cycle samplers.

pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
