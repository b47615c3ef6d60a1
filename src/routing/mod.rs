//! Route generation: commands in, immutable route table out.
//!
//! ```text
//! CommandRegistry ──► Router ──(forbidden globs)──► RouteAdapter ──► RouteTable
//!                                                   (hidden check,
//!                                                    URI + name)
//! ```
//!
//! The table is built once at boot. Every route, static or generated, is
//! served by the same invocation entry point, which uses
//! [`RouteTable::resolve`] to find out what to run.

mod adapter;
mod error;
mod method;
mod pattern;
mod router;
mod table;

pub use adapter::{RouteAdapter, RouteDescriptor, Segment, ROUTE_NAME_PREFIX};
pub use error::{RouteError, RouteResult};
pub use method::{HttpMethod, HttpMethods};
pub use pattern::{GlobPattern, PatternSet};
pub use router::{Router, RouterConfig, DEFAULT_PREFIX};
pub use table::{RouteMatch, RouteTable, RouteTarget, StaticRoute};
