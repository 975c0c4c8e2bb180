//! tales-core - Core library for Tales
//!
//! This crate contains the note models, the hosted note store client, the
//! realtime change feed and the notes view controller used by every Tales
//! front end.

pub mod config;
pub mod controller;
pub mod debounce;
pub mod error;
pub mod models;
pub mod realtime;
pub mod render;
pub mod search;
pub mod store;
pub mod view;

pub use error::{Error, Result};
pub use models::{Note, NoteDraft, NoteId};
