//! Piggymetrics backend: budget ledger domain plus the document store that
//! serves it over HTTP.

pub mod config;
pub mod db;
pub mod domain;
pub mod rest;
pub mod save_gate;
pub mod services;
