//! # Folio Architecture
//!
//! Folio is a **UI-agnostic portfolio library**: sectioned PDF documents and
//! images, persisted locally, shown through a document viewer and a rotating
//! 3D carousel. The page it renders into is an abstract [`surface::Surface`];
//! the `folio` CLI drives an in-memory page, a browser host would drive a
//! real one.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Host (CLI, browser shell)                                  │
//! │  - Delivers control attributes, keys, file inputs, frames   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Owns section state, handles, viewer, carousel, surface   │
//! │  - Dispatches actions, reloads after every mutation         │
//! └─────────────────────────────────────────────────────────────┘
//!                  │                           │
//!                  ▼                           ▼
//! ┌────────────────────────────┐ ┌──────────────────────────────┐
//! │  Commands (commands/*.rs)  │ │  Presentation                │
//! │  upload, delete, list      │ │  loader, viewer, carousel    │
//! └────────────────────────────┘ └──────────────────────────────┘
//!                  │
//!                  ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - BlobStore trait over a StorageBackend                    │
//! │  - FileStore (production), InMemoryStore (testing)          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! Nothing in this crate writes to stdout/stderr or prompts. User-facing
//! messages go through [`surface::Surface::alert`] and
//! [`surface::Surface::confirm`], or come back as [`commands::CmdResult`].
//!
//! ## Threading
//!
//! Folio is single-threaded and cooperative. Display handles and the memory
//! backend use `Rc`/`RefCell`, so the core is `!Send` by construction, and
//! the carousel rotates one frame per [`api::Portfolio::tick`].
//!
//! ## Module Overview
//!
//! - [`api`]: The facade, entry point for all operations
//! - [`commands`]: Upload, delete and list over a store
//! - [`store`]: Storage abstraction, schema versioning and backends
//! - [`model`]: Sections, records, media kinds
//! - [`handles`]: Reference-counted display handles
//! - [`loader`]: Full-refresh load and render cycle
//! - [`viewer`]: Document viewer modal
//! - [`carousel`]: Ring geometry and the rotation task
//! - [`events`]: Control attributes, actions and keys
//! - [`surface`]: The page interface and its headless implementation
//! - [`config`]: Configuration management
//! - [`init`]: Data directory resolution and context wiring
//! - [`error`]: Error types

pub mod api;
pub mod carousel;
pub mod commands;
pub mod config;
pub mod error;
pub mod events;
pub mod handles;
pub mod init;
pub mod loader;
pub mod model;
pub mod store;
pub mod surface;
pub mod viewer;
