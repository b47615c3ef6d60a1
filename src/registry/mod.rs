//! Command registry: the console commands available for exposure.
//!
//! Commands are collected from one or more [`CommandSource`]s into a
//! [`CommandRegistry`]. The registry is read-only once route generation
//! starts.
//!
//! ```text
//! ┌──────────────┐  ┌────────────────┐  ┌───────────────┐
//! │ StaticSource │  │ ManifestSource │  │ ListingSource │
//! └──────┬───────┘  └───────┬────────┘  └───────┬───────┘
//!        └──────────────────┼───────────────────┘
//!                           ▼
//!              ┌─────────────────────────┐
//!              │ CommandRegistry trait   │
//!              │ (DefaultCommandRegistry)│
//!              └─────────────────────────┘
//! ```

mod command;
mod error;
mod listing;
mod registry;
mod source;

pub use command::{Command, Parameter, ParameterKind};
pub use error::{RegistryError, RegistryResult};
pub use listing::ListingSource;
pub use registry::{CommandRegistry, DefaultCommandRegistry};
#[cfg(feature = "config")]
pub use source::ManifestSource;
pub use source::{CommandSource, StaticSource};
