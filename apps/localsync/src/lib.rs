//! # LocalSync - plugin state server
//!
//! The application layer around [`localsync_core`]: HTTP API, persistence
//! lifecycle, configuration and CLI.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                   apps/localsync (THE BINARY)                  │
//! │                                                                │
//! │  ┌────────────┐    ┌────────────┐    ┌──────────────────────┐  │
//! │  │    CLI     │    │  HTTP API  │    │ PersistenceController│  │
//! │  │   (clap)   │    │   (axum)   │    │ (load/autosave/exit) │  │
//! │  └─────┬──────┘    └─────┬──────┘    └──────────┬───────────┘  │
//! │        └─────────────────┼──────────────────────┘              │
//! │                          ▼                                     │
//! │                 ┌──────────────────┐                           │
//! │                 │  localsync-core  │                           │
//! │                 │   (THE STORE)    │                           │
//! │                 └──────────────────┘                           │
//! └────────────────────────────────────────────────────────────────┘
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod persistence;
