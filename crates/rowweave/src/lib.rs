//! ## Crate layout
//! - `core`: values, rows, descriptors, the grouping engine and materializers.
//! - `session`: the [`Weaver`] session that pairs one configuration with an
//!   optional trace sink and exposes typed entry points.
//!
//! Most callers only need the `prelude`.

pub use rowweave_core as core;

mod session;

pub use core::error::{ErrorKind, WeaveError};
pub use session::Weaver;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        Weaver,
        core::{
            materialize::{JsonMaterializer, SerdeMaterializer},
            obs::{CountingSink, TracingSink, WeaveTraceSink},
            prelude::*,
        },
    };
}
