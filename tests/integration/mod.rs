//! Integration tests against the public `obsmon` library surface

mod aggregate;
mod cache;
mod comments;
mod config;
mod helpers;
