//! # jsonform
//!
//! A host-agnostic form engine driven by declarative JSON schemas.
//!
//! jsonform interprets an arbitrarily nested schema document into typed
//! input widgets, tracks their live values in a registry keyed by
//! structural path, and re-evaluates conditional-visibility expressions
//! referencing other fields whenever any value changes. Presentation and
//! network are external collaborators behind traits: any widget toolkit
//! that can create elements, set attributes and deliver events can host a
//! form, and any request/response channel can feed it.
//!
//! ## Features
//!
//! - Schema-driven widget construction: boolean toggle, enumerated choice,
//!   free/secret text
//! - Conditional visibility via `path == literal` dependency expressions
//! - Arbitrarily nested, optionally collapsible sections
//! - `$`-reference resolution for dynamic option lists
//! - Required-field validation with a single aggregate submission
//! - In-memory render host for tests and headless driving
//! - Blocking HTTP transport with basic auth (requires the `http` feature)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use jsonform::{FormApp, host::memory::MemoryHost, run::FileTransport};
//!
//! let mut host = MemoryHost::new();
//! let mount = host.mount();
//! let transport = FileTransport::new("user.json", "saved.json");
//! let mut app = FormApp::new(Box::new(transport), mount);
//! app.load(&mut host).unwrap();
//! ```
//!
//! ## Modules
//!
//! - [`data`] - schema classification, paths, and the field registry
//! - [`visibility`] - the conditional-visibility sublanguage
//! - [`render`] - tree renderer and widget factory
//! - [`host`] - render-target abstraction and the in-memory host
//! - [`session`] - the live form session: registry plus event dispatch
//! - [`run`] - transports and the load/save/reset lifecycle
//! - [`client`] - blocking HTTP transport (requires the `http` feature)

/// Schema data model, path addressing, and the field registry.
pub mod data;

/// Error types for schema interpretation and transport.
pub mod error;

/// Rendering-target abstraction and the in-memory host.
pub mod host;

/// Recursive schema-tree renderer and widget factory.
pub mod render;

/// Transports and the form lifecycle commands.
pub mod run;

/// The live form session.
pub mod session;

/// The conditional-visibility sublanguage.
pub mod visibility;

/// Blocking HTTP transport.
#[cfg(feature = "http")]
pub mod client;

pub use run::{FormApp, FormTransport, SaveOutcome};
pub use session::FormSession;
pub use serde_json::Value;
