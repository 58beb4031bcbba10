//! nodestore - A schema-governed JSON document store
//!
//! Documents are untyped JSON trees validated against named schemas,
//! addressed by RFC 6901 pointers, and guarded by optimistic locking.

pub mod cli;
pub mod config;
pub mod domain;
pub mod observability;
pub mod pointer;
pub mod schema;
pub mod service;
pub mod storage;
pub mod validation;
