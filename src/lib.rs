//! Scoregen - linked scoring spreadsheets for scored competitions
//!
//! This library generates one "overview" spreadsheet that aggregates every
//! contestant's scores, plus one private scoring spreadsheet per juror whose
//! entries feed the overview through live cross-document formulas.
//!
//! # Features
//!
//! - Template-driven: scoring rows are anchored by "Points:" marker rows
//! - One replicated sheet per contestant, one private document per juror
//! - Row-shift-safe expansion (marker snapshot + bottom-up processing)
//! - Cooperative cancellation between stages and per-row iterations
//! - Remote service behind async traits, with an in-memory backend for
//!   tests and simulation
//!
//! # Example
//!
//! ```no_run
//! use scoregen::pipeline::{CancelToken, SheetGenerator};
//! use scoregen::remote::MemoryRemote;
//! use scoregen::types::{Competition, Contestant, Juror};
//!
//! # async fn demo() -> Result<(), scoregen::error::GenerateError> {
//! let remote = MemoryRemote::new();
//! let mut competition = Competition::new("Demo", "template-id");
//! competition.jury.push(Juror::new("X", 100));
//! competition.contestants.push(Contestant::new("A"));
//!
//! let generator = SheetGenerator::new(&remote, &remote);
//! let cancel = CancelToken::new();
//! let progress = |message: &str| println!("{message}");
//! let set = generator
//!     .generate(&competition, "parent-folder", &progress, &cancel)
//!     .await?;
//! println!("overview: {}", set.overview_id);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod column;
pub mod error;
pub mod pipeline;
pub mod remote;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use error::{GenResult, GenerateError};
pub use pipeline::{CancelToken, GeneratorConfig, ProgressSink, SheetGenerator};
pub use types::{Competition, Contestant, GeneratedDocumentSet, Juror};
