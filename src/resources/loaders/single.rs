use crate::error::GlviewError;
use crate::resources::base::Loader;
use crate::resources::finder::{read_source, FileFinder};
use crate::resources::meta::ProgramDescription;
use crate::resources::shader::{Preprocessor, ProgramShaders, ShaderStage};

/// Loads programs whose stages share one file.
///
/// The file is compiled once per stage with `<STAGE>_SHADER` defined, so a
/// source guards each stage with `#if defined VERTEX_SHADER` and so on. The
/// vertex stage is always built; other stages only when their symbol occurs
/// in the file. A file mentioning `COMPUTE_SHADER` is a compute program.
#[derive(Debug, Default, Clone, Copy)]
pub struct SingleFileLoader;

const OPTIONAL_STAGES: [ShaderStage; 4] = [
    ShaderStage::TessControl,
    ShaderStage::TessEvaluation,
    ShaderStage::Geometry,
    ShaderStage::Fragment,
];

impl Loader for SingleFileLoader {
    type Description = ProgramDescription;
    type Output = ProgramShaders;

    fn kind(&self) -> &str {
        "single"
    }

    fn load(
        &self,
        description: &ProgramDescription,
        finder: &FileFinder,
    ) -> Result<ProgramShaders, GlviewError> {
        let path = description
            .path
            .as_deref()
            .ok_or_else(|| GlviewError::ProgramLoad {
                label: description.label.clone(),
                message: "single-file program has no path".to_owned(),
            })?;
        let resolved = finder.find(path)?;
        let source = read_source(&resolved)?;
        let preprocessor = Preprocessor::new(finder, &description.defines);

        let is_compute = source.contains(ShaderStage::Compute.define());
        let stages: Vec<ShaderStage> = if is_compute {
            vec![ShaderStage::Compute]
        } else {
            std::iter::once(ShaderStage::Vertex)
                .chain(
                    OPTIONAL_STAGES
                        .into_iter()
                        .filter(|stage| source.contains(stage.define())),
                )
                .collect()
        };

        let sources = stages
            .into_iter()
            .map(|stage| preprocessor.process(stage, &resolved, &source))
            .collect::<Result<Vec<_>, _>>()?;

        log::info!(
            "Loaded program '{}' from {} ({} stage{})",
            description.label,
            resolved.display(),
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
