//! End-to-end suite against a spawned application.
//!
//! Cases touching Postgres are ignored by default so the suite runs
//! anywhere; exercise them (including the conditional-update claim that
//! guards against double sends) against a local database with
//! `cargo test -- --ignored`.

mod health_check;
mod helpers;
