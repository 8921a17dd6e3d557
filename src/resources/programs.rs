//! Shader program registry.

use crate::error::GlviewError;
use crate::resources::base::{DynLoader, Registry};
use crate::resources::finder::FileFinder;
use crate::resources::loaders::program_loader_factories;
use crate::resources::meta::ProgramDescription;
use crate::resources::shader::ProgramShaders;
use crate::settings::Settings;

/// Loader trait object for shader programs.
pub type ProgramLoader = DynLoader<ProgramDescription, ProgramShaders>;

/// Registry for the shader programs requested during initialization.
///
/// Programs are queued with [`add`](Self::add) while the application sets up
/// and loaded together with [`load_pool`](Self::load_pool) once everything
/// that needs a program has asked for it.
pub struct Programs {
    registry: Registry<ProgramDescription, ProgramShaders>,
}

impl Programs {
    /// Settings key naming the enabled program loaders.
    pub const SETTING: &'static str = "PROGRAM_LOADERS";

    /// Create a registry with explicit loaders.
    pub fn new(loaders: Vec<Box<ProgramLoader>>, finder: FileFinder) -> Self {
        Self {
            registry: Registry::new(Self::SETTING, loaders, finder),
        }
    }

    /// Create a registry with the loaders and search directories named in
    /// `settings`. Unknown loader names are rejected.
    pub fn from_settings(settings: &Settings) -> Result<Self, GlviewError> {
        let factories = program_loader_factories();
        let loaders = settings
            .program_loaders
            .iter()
            .map(|name| {
                factories
                    .get(name.as_str())
                    .map(|factory| factory())
                    .ok_or_else(|| GlviewError::UnknownLoader {
                        name: name.clone(),
                        setting: Self::SETTING,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let finder = FileFinder::new(settings.program_dirs.iter().cloned());
        log::debug!(
            "{}: {} loader(s), {} search dir(s)",
            Self::SETTING,
            loaders.len(),
            finder.dirs().len()
        );
        Ok(Self::new(loaders, finder))
    }

    /// Register an additional loader, e.g. for a custom kind.
    pub fn register(&mut self, loader: Box<ProgramLoader>) {
        self.registry.register(loader);
    }

    /// Resolve the loader for `description`.
    ///
    /// A description without a kind, or with an empty one, is first given
    /// one: `single` when it has a path, `separate` otherwise. The kind is
    /// written back into the description.
    pub fn resolve_loader(
        &self,
        description: &mut ProgramDescription,
    ) -> Result<&ProgramLoader, GlviewError> {
        self.registry.resolve_loader(description)
    }

    /// Resolve and load one program.
    pub fn load(
        &self,
        description: &mut ProgramDescription,
    ) -> Result<ProgramShaders, GlviewError> {
        self.registry.load(description)
    }

    /// Queue a program for [`load_pool`](Self::load_pool).
    pub fn add(&mut self, description: ProgramDescription) {
        self.registry.add(description);
    }

    /// Number of queued programs.
    pub fn count(&self) -> usize {
        self.registry.count()
    }

    /// Load every queued program in insertion order, emptying the queue.
    pub fn load_pool(
        &mut self,
    ) -> Vec<(ProgramDescription, Result<ProgramShaders, GlviewError>)> {
        self.registry.load_pool()
    }

    /// Finder used to locate program files.
    pub fn finder(&self) -> &FileFinder {
        self.registry.finder()
    }
}
