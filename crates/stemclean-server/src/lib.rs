//! stemclean-server: HTTP front end for the stem extraction pipeline

pub mod args;
pub mod error;
pub mod routes;
pub mod server;
pub mod web;
