pub mod config;
pub mod handlers;
pub mod humanize;
pub mod ledger;
pub mod observability;
pub mod schema;
pub mod service;
pub mod storage;
