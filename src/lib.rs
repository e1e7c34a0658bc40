#![forbid(unsafe_code)]
//! Translation unit generator for XLIFF 1.2 files.
//!
//! Turns a piece of selected source text into a localization call such as
//! `{{ 'home.hello_world'|trans }}` and keeps the matching `<trans-unit>` in
//! an XLIFF file up to date.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use xliffgen::{NoopNotifier, Selection, Settings, generate};
//!
//! let settings = Settings::load(".")?;
//! let selection = Selection {
//!     text: "Hello World".to_string(),
//!     range: 4..15,
//!     file_path: Some("templates/home.twig".to_string()),
//! };
//! let replacement = generate(&selection, &settings, Path::new("."), &NoopNotifier)?;
//! assert_eq!(replacement.text, "{{ 'home.hello_world'|trans }}");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! The building blocks are usable on their own:
//!
//! - [`identifier::derive_unit_id`] for unit ids,
//! - [`template`] for picking and filling call templates,
//! - [`sync::sync_unit`] for updating a translation file,
//! - [`xliff::XliffDocument`] for in-memory edits.

pub mod error;
pub mod generate;
pub mod identifier;
pub mod notify;
pub mod settings;
pub mod sync;
pub mod template;
pub mod traits;
pub mod tree;
pub mod xliff;

// Re-export most used types for easy consumption
pub use crate::{
    error::Error,
    generate::{Replacement, Selection, TextBuffer, generate, translation_call},
    identifier::derive_unit_id,
    notify::{ChangeNotifier, LogNotifier, NoopNotifier},
    settings::Settings,
    sync::sync_unit,
    template::SourceKind,
    xliff::{SyncOutcome, TranslationUnit, XliffDocument},
};
