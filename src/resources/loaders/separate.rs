use crate::error::GlviewError;
use crate::resources::base::Loader;
use crate::resources::finder::{read_source, FileFinder};
use crate::resources::meta::ProgramDescription;
use crate::resources::shader::{Preprocessor, ProgramShaders, ShaderStage};

/// Loads programs with one file per stage.
#[derive(Debug, Default, Clone, Copy)]
pub struct SeparateFileLoader;

impl Loader for SeparateFileLoader {
    type Description = ProgramDescription;
    type Output = ProgramShaders;

    fn kind(&self) -> &str {
        "separate"
    }

    fn load(
        &self,
        description: &ProgramDescription,
        finder: &FileFinder,
    ) -> Result<ProgramShaders, GlviewError> {
        let stage_paths = description.stage_paths();
        let has = |wanted: ShaderStage| {
            stage_paths.iter().any(|&(stage, _)| stage == wanted)
        };

        let fail = |message: &str| GlviewError::ProgramLoad {
            label: description.label.clone(),
            message: message.to_owned(),
        };
        if has(ShaderStage::Compute) {
            if stage_paths.len() > 1 {
                return Err(fail(
                    "a compute shader cannot be combined with other stages",
                ));
            }
        } else if !has(ShaderStage::Vertex) {
            return Err(fail("a vertex or compute shader is required"));
        }

        let preprocessor = Preprocessor::new(finder, &description.defines);
        let mut sources = Vec::with_capacity(stage_paths.len());
        for (stage, path) in stage_paths {
            let resolved = finder.find(path)?;
            let source = read_source(&resolved)?;
            log::debug!(
                "{}: {stage} stage from {}",
                description.label,
                resolved.display()
            );
            sources.push(preprocessor.process(stage, &resolved, &source)?);
        }

        log::info!(
            "Loaded program '{}' ({} separate stage{})",
            description.label,
            sources.len(),
            if sources.len() == 1 { "" } else { "s" }
        );

        Ok(ProgramShaders::new(
            description.label.clone(),
            sources,
            description.varyings.clone(),
            description.reloadable,
        ))
    }
}
