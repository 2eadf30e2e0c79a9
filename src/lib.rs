//! Demandsearch – the search and filtering engine behind a demand-planning
//! front end.
//!
//! Users locate products, channels and locations, and the history and
//! forecast series attached to them, by composing field/value criteria. The
//! engine compiles criteria into the search backend's boolean query string,
//! reconciles the returned key triples against locally held or bulk-fetched
//! rows, and exposes the result as a filterable, sortable, paginated and
//! exportable view.
//!
//! ## Modules
//! * [`criterion`] and [`compiler`] – criteria and their compilation to
//!   `token:value (AND|OR) ...` strings.
//! * [`registry`] – UI field names to backend tokens per [`registry::Domain`],
//!   and the saved-query applicability check.
//! * [`reconcile`] – filter mode (master rows whose id was returned) and
//!   projection mode (the keys themselves).
//! * [`view`] – the generic filter/sort/page/export state of one screen.
//! * [`controller`] – per-screen orchestration of searches and saved searches.
//! * [`interface`] – tickets that let a newer search overtake an older one.
//! * [`collaborator`] – the external services, as traits; [`memory`] holds
//!   in-memory implementations.
//! * [`builder`] and [`profile`] – authoring of saved searches and cleanse
//!   profiles.
//! * [`settings`] and [`server`] – configuration and the HTTP compile service.
//!
//! ## Quick Start
//! ```
//! use demandsearch::{compiler, criterion::Criterion};
//! let query = compiler::compile(&[
//!     Criterion::and("businessunit", "Fast Food"),
//!     Criterion::and("isnew", "Yes"),
//! ]);
//! assert_eq!(query.unwrap().as_str(), "businessunit:\"*Fast Food*\" AND isnew:*Yes*");
//! ```

pub mod builder;
pub mod collaborator;
pub mod compiler;
pub mod controller;
pub mod criterion;
pub mod error;
pub mod interface;
pub mod memory;
pub mod model;
pub mod profile;
pub mod reconcile;
pub mod registry;
pub mod server;
pub mod settings;
pub mod source;
pub mod view;

pub use error::{Result, SearchError};
