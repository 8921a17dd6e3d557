//! Built-in program loaders and the name table used to enable them.

mod separate;
mod single;

use rustc_hash::FxHashMap;
pub use separate::SeparateFileLoader;
pub use single::SingleFileLoader;

use crate::resources::programs::ProgramLoader;

/// Constructor for a boxed program loader.
pub type ProgramLoaderFactory = fn() -> Box<ProgramLoader>;

/// Built-in program loaders keyed by the name used in `PROGRAM_LOADERS`.
pub fn program_loader_factories(
) -> FxHashMap<&'static str, ProgramLoaderFactory> {
    let mut factories: FxHashMap<&'static str, ProgramLoaderFactory> =
        FxHashMap::default();
    let _ = factories.insert("single", single_file);
    let _ = factories.insert("separate", separate_files);
    factories
}

fn single_file() -> Box<ProgramLoader> {
    Box::new(SingleFileLoader)
}

fn separate_files() -> Box<ProgramLoader> {
    Box::new(SeparateFileLoader)
}
