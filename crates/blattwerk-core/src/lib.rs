// SPDX-License-Identifier: MIT
//
// blattwerk-core — Domain types and bookkeeping for the Blattwerk
// image-to-PDF binder: the staged image collection, file intake with
// per-file and aggregate size quotas, configuration, and the unified
// error taxonomy with user-facing message mapping.

pub mod collection;
pub mod config;
pub mod error;
pub mod human_errors;
pub mod intake;
pub mod types;

pub use collection::ImageCollection;
pub use config::AppConfig;
pub use error::{BlattwerkError, Result};
pub use intake::{FileIntake, FileSource, IntakeReport, PickedFile};
pub use types::*;
