//! # outbreak-repl
//!
//! An interactive editor for the eight mass-outbreak slots of a live game
//! session.
//!
//! Edits go straight to the connected device with compare-and-set writes.
//! A refused write drops the session; the local record keeps the edit.
//!
//! ## Features
//!
//! - Connect to a block bridge over HTTP, or to a simulated `memory` device
//! - Edit any field of the selected slot, including single coordinates
//! - Dump a slot to a snapshot file and load it back as a reviewable draft
//! - Offer curated defaults when a slot's species changes
//! - Tab completion, highlighting and history (vi mode from EDITOR, .inputrc
//!   or `--edit-mode`)
//!
//! ## Usage
//!
//! ```bash
//! outbreak --device http://127.0.0.1:8080 --defaults ~/outbreak-defaults
//!
//! # Inside the REPL:
//! > list
//! > select 3
//! > set max_spawns 10
//! > set center.x 412.5
//! > dump ~/slot3.json
//! > load ~/slot3.json
//! > apply
//! ```

pub mod commands;
pub mod completer;
pub mod config;
pub mod context;
pub mod highlighter;
pub mod host;
pub mod io;
pub mod repl;

pub use config::{EditMode, EditorConfig};
pub use context::{ContextError, EditorContext};
pub use repl::{run, ReplCore};
