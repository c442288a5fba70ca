//! hearth - a terminal client for a family recipe archive.
//!
//! The interesting part is the data-synchronization layer: an in-memory
//! resource store mirrored against a remote REST API, with a local SQLite
//! cache so the last-known state survives restarts and offline stretches.
//! The TUI on top is a thin presentation layer over store snapshots.

pub mod api;
pub mod app;
pub mod cache;
pub mod commands;
pub mod config;
pub mod event;
pub mod logging;
pub mod store;
pub mod sync;
pub mod ui;
