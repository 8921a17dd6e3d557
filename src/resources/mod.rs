//! Named resource registries.
//!
//! A registry dispatches each resource description to the loader registered
//! for its kind. [`Programs`] is the registry for shader programs: it infers
//! the kind of descriptions that leave it unset (`single` when a single file
//! path is given, `separate` otherwise) before resolving a loader.

/// Generic kind-dispatched registry and the loader trait.
pub mod base;
/// Search-directory file lookup.
pub mod finder;
/// Built-in program loaders.
pub mod loaders;
/// Program descriptions and kinds.
pub mod meta;
/// The shader program registry.
pub mod programs;
/// Stage sources and preprocessing.
pub mod shader;

pub use base::{BoxedLoader, DynLoader, Loader, Registry, ResourceDescription};
pub use finder::FileFinder;
pub use loaders::{SeparateFileLoader, SingleFileLoader};
pub use meta::{ProgramDescription, ProgramKind};
pub use programs::{ProgramLoader, Programs};
pub use shader::{ProgramShaders, ShaderSource, ShaderStage};
