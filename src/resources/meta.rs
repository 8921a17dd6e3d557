use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::resources::base::ResourceDescription;
use crate::resources::shader::ShaderStage;

/// Which loader family handles a program description.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProgramKind {
    /// All stages live in one file, selected by `<STAGE>_SHADER` defines.
    Single,
    /// Each stage lives in its own file.
    Separate,
    /// A loader registered under any other name.
    Custom(String),
}

impl ProgramKind {
    /// Kind implied by a description that does not declare one.
    pub fn infer(path: Option<&Path>) -> Self {
        if path.is_some() {
            Self::Single
        } else {
            Self::Separate
        }
    }

    /// Tag matched against [`Loader::kind`](crate::resources::Loader::kind).
    pub fn as_str(&self) -> &str {
        match self {
            Self::Single => "single",
            Self::Separate => "separate",
            Self::Custom(tag) => tag,
        }
    }
}

impl From<&str> for ProgramKind {
    fn from(tag: &str) -> Self {
        match tag {
            "single" => Self::Single,
            "separate" => Self::Separate,
            other => Self::Custom(other.to_owned()),
        }
    }
}

impl fmt::Display for ProgramKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Describes a shader program to load.
///
/// Either `path` names a single file holding every stage, or the per-stage
/// paths name one file each. `kind` is filled in by
/// [`Programs::resolve_loader`](crate::resources::Programs::resolve_loader)
/// when left unset or empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgramDescription {
    /// Human-readable name used in logs and errors.
    pub label: String,
    /// Single file containing all stages.
    pub path: Option<PathBuf>,
    /// Loader kind; inferred from `path` when `None` or empty.
    pub kind: Option<ProgramKind>,
    /// Vertex stage file.
    pub vertex_shader: Option<PathBuf>,
    /// Geometry stage file.
    pub geometry_shader: Option<PathBuf>,
    /// Fragment stage file.
    pub fragment_shader: Option<PathBuf>,
    /// Tessellation control stage file.
    pub tess_control_shader: Option<PathBuf>,
    /// Tessellation evaluation stage file.
    pub tess_evaluation_shader: Option<PathBuf>,
    /// Compute stage file.
    pub compute_shader: Option<PathBuf>,
    /// Values substituted into matching `#define NAME value` lines.
    pub defines: BTreeMap<String, String>,
    /// Transform feedback outputs. Detected from the source when empty.
    pub varyings: Vec<String>,
    /// Whether the program may be reloaded when its files change.
    pub reloadable: bool,
}

impl ProgramDescription {
    /// Create an empty description with the given label.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    /// Single-file program at `path`; the label is the path itself.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            label: path.display().to_string(),
            path: Some(path),
            ..Self::default()
        }
    }

    /// Set the single-file path.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Set the loader kind explicitly.
    #[must_use]
    pub fn with_kind(mut self, kind: impl Into<ProgramKind>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Set the file for one stage.
    #[must_use]
    pub fn with_stage(
        mut self,
        stage: ShaderStage,
        path: impl Into<PathBuf>,
    ) -> Self {
        let path = Some(path.into());
        match stage {
            ShaderStage::Vertex => self.vertex_shader = path,
            ShaderStage::Geometry => self.geometry_shader = path,
            ShaderStage::Fragment => self.fragment_shader = path,
            ShaderStage::TessControl => self.tess_control_shader = path,
            ShaderStage::TessEvaluation => self.tess_evaluation_shader = path,
            ShaderStage::Compute => self.compute_shader = path,
        }
        self
    }

    /// Add a define override.
    #[must_use]
    pub fn with_define(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        let _ = self.defines.insert(name.into(), value.into());
        self
    }

    /// Set explicit transform feedback varyings.
    #[must_use]
    pub fn with_varyings<I, S>(mut self, varyings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.varyings = varyings.into_iter().map(Into::into).collect();
        self
    }

    /// Mark the program as reloadable.
    #[must_use]
    pub fn reloadable(mut self, reloadable: bool) -> Self {
        self.reloadable = reloadable;
        self
    }

    /// File configured for one stage.
    pub fn stage_path(&self, stage: ShaderStage) -> Option<&Path> {
        match stage {
            ShaderStage::Vertex => self.vertex_shader.as_deref(),
            ShaderStage::Geometry => self.geometry_shader.as_deref(),
            ShaderStage::Fragment => self.fragment_shader.as_deref(),
            ShaderStage::TessControl => self.tess_control_shader.as_deref(),
            ShaderStage::TessEvaluation => {
                self.tess_evaluation_shader.as_deref()
            }
            ShaderStage::Compute => self.compute_shader.as_deref(),
        }
    }

    /// Stages with a configured file, in pipeline order.
    pub fn stage_paths(&self) -> Vec<(ShaderStage, &Path)> {
        ShaderStage::ALL
            .iter()
            .filter_map(|&stage| {
                self.stage_path(stage).map(|path| (stage, path))
            })
            .collect()
    }
}

impl ResourceDescription for ProgramDescription {
    fn label(&self) -> &str {
        &self.label
    }

    fn kind(&self) -> Option<&str> {
        self.kind.as_ref().map(ProgramKind::as_str)
    }

    /// `single` when `path` is set, `separate` otherwise. An empty tag
    /// counts as unset.
    fn infer_kind(&mut self) {
        if self.kind().is_some_and(|kind| !kind.is_empty()) {
            return;
        }
        let kind = ProgramKind::infer(self.path.as_deref());
        log::debug!("Program '{}' defaults to kind '{kind}'", self.label);
        self.kind = Some(kind);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infer_kind_from_path_presence() {
        assert_eq!(
            ProgramKind::infer(Some(Path::new("a.glsl"))),
            ProgramKind::Single
        );
        assert_eq!(ProgramKind::infer(None), ProgramKind::Separate);
    }

    #[test]
    fn kind_tags_round_trip() {
        for tag in ["single", "separate", "spirv"] {
            assert_eq!(ProgramKind::from(tag).as_str(), tag);
        }
        assert_eq!(
            ProgramKind::from("spirv"),
            ProgramKind::Custom("spirv".to_owned())
        );
    }

    #[test]
    fn stage_paths_follow_pipeline_order() {
        let desc = ProgramDescription::new("lit")
            .with_stage(ShaderStage::Fragment, "lit.fs")
            .with_stage(ShaderStage::Vertex, "lit.vs");
        let stages: Vec<_> =
            desc.stage_paths().into_iter().map(|(s, _)| s).collect();
        assert_eq!(stages, [ShaderStage::Vertex, ShaderStage::Fragment]);
        assert_eq!(
            desc.stage_path(ShaderStage::Vertex),
            Some(Path::new("lit.vs"))
        );
        assert_eq!(desc.stage_path(ShaderStage::Compute), None);
    }

    #[test]
    fn infer_kind_keeps_explicit_and_fills_empty() {
        let mut explicit =
            ProgramDescription::from_path("a.glsl").with_kind("separate");
        explicit.infer_kind();
        assert_eq!(explicit.kind, Some(ProgramKind::Separate));

        let mut empty = ProgramDescription::new("b").with_kind("");
        empty.infer_kind();
        assert_eq!(empty.kind, Some(ProgramKind::Separate));
    }

    #[test]
    fn from_path_labels_with_path() {
        let desc = ProgramDescription::from_path("programs/cube.glsl");
        assert_eq!(desc.label, "programs/cube.glsl");
        assert!(desc.kind.is_none());
    }
}
