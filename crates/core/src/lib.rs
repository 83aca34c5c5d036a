//! Core library for doclist
//!
//! This crate implements the **Functional Core** of the doclist application,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! The doclist project uses a two-crate architecture to enforce separation of concerns:
//!
//! - **`doclist_core`** (this crate): view-state synchronization with zero I/O
//! - **`doclist`**: catalog fetching, terminal rendering and orchestration (the Imperative Shell)
//!
//! ## Functional Core Principles
//!
//! - **Pure functions**: the query codec and the filter/sort engine are total
//!   functions of their inputs
//! - **No side effects**: the sync controller only talks to the outside world
//!   through the [`sync::Navigator`] and [`sync::Presenter`] traits
//! - **Deterministic**: the same events in the same order always produce the
//!   same visible list and the same query string
//!
//! # Module Organization
//!
//! - [`provider`]: catalog records and lenient parsing of fee/experience strings
//! - [`state`]: the canonical view state and its toggle-style mutations
//! - [`query`]: view state <-> URL query string
//! - [`filter`]: visible list derivation, specialty index and search suggestions
//! - [`sync`]: the event-driven controller keeping state, list and URL consistent
//! - [`error`]: errors surfaced to the presentation layer
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use doclist_core::sync::{Event, MemoryHistory, SyncController};
//!
//! let history = MemoryHistory::new("?search=ali&sort=experience");
//! let mut controller = SyncController::new(history, presenter);
//!
//! controller.dispatch(Event::DataArrived(Ok(records)));
//! controller.dispatch(Event::ModeToggled(ConsultationMode::Video));
//!
//! assert_eq!(
//!     controller.navigator().current_query(),
//!     "consultationType=video&search=ali&sort=experience"
//! );
//! ```

pub mod error;
pub mod filter;
pub mod provider;
pub mod query;
pub mod state;
pub mod sync;

pub use error::FetchError;
pub use provider::{ProviderRecord, Specialty};
pub use state::{ConsultationMode, SortKey, ViewState, ViewStateStore};
pub use sync::{Event, EventSender, LoadStatus, Navigator, Presenter, SyncController, ViewModel};
