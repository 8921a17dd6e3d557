//! GLSL stage sources and the preprocessing applied while loading them.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::GlviewError;
use crate::resources::finder::{read_source, FileFinder};

/// Maximum `#include` nesting before expansion is aborted.
pub const MAX_INCLUDE_DEPTH: usize = 16;

/// A programmable pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ShaderStage {
    /// Vertex stage.
    Vertex,
    /// Tessellation control stage.
    TessControl,
    /// Tessellation evaluation stage.
    TessEvaluation,
    /// Geometry stage.
    Geometry,
    /// Fragment stage.
    Fragment,
    /// Compute stage.
    Compute,
}

impl ShaderStage {
    /// Every stage, in pipeline order.
    pub const ALL: [Self; 6] = [
        Self::Vertex,
        Self::TessControl,
        Self::TessEvaluation,
        Self::Geometry,
        Self::Fragment,
        Self::Compute,
    ];

    /// Preprocessor symbol defined while compiling this stage.
    pub fn define(self) -> &'static str {
        match self {
            Self::Vertex => "VERTEX_SHADER",
            Self::TessControl => "TESS_CONTROL_SHADER",
            Self::TessEvaluation => "TESS_EVALUATION_SHADER",
            Self::Geometry => "GEOMETRY_SHADER",
            Self::Fragment => "FRAGMENT_SHADER",
            Self::Compute => "COMPUTE_SHADER",
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Vertex => "vertex",
            Self::TessControl => "tess_control",
            Self::TessEvaluation => "tess_evaluation",
            Self::Geometry => "geometry",
            Self::Fragment => "fragment",
            Self::Compute => "compute",
        };
        f.write_str(name)
    }
}

/// Preprocessed source of one stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    stage: ShaderStage,
    name: String,
    lines: Vec<String>,
}

impl ShaderSource {
    /// Stage this source is compiled for.
    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    /// Name of the source, usually the file it was read from.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Source lines after preprocessing.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Full source text.
    pub fn source(&self) -> String {
        self.lines.join("\n")
    }

    /// Names declared by `out` statements, in declaration order.
    pub fn out_attributes(&self) -> Vec<String> {
        self.lines
            .iter()
            .filter_map(|line| out_attribute(line))
            .collect()
    }
}

/// Parse `[layout(...)] out <type> <name>[...];` into `name`.
fn out_attribute(line: &str) -> Option<String> {
    let line = line.trim();
    if line.starts_with("//") {
        return None;
    }
    let tokens: Vec<&str> = line
        .split(|c: char| c.is_whitespace() || c == ';')
        .filter(|t| !t.is_empty())
        .collect();
    let out = tokens.iter().position(|&t| t == "out")?;
    // Skip `in`/`out` parameter qualifiers inside function signatures.
    if line.contains('(') && !line.starts_with("layout") {
        return None;
    }
    let name = *tokens.get(out + 2)?;
    let name = name.split('[').next().unwrap_or(name);
    (!name.is_empty()).then(|| name.to_owned())
}

/// Applies includes, define overrides and stage defines to raw sources.
pub struct Preprocessor<'a> {
    finder: &'a FileFinder,
    defines: &'a BTreeMap<String, String>,
}

impl<'a> Preprocessor<'a> {
    /// Create a preprocessor resolving includes through `finder`.
    pub fn new(
        finder: &'a FileFinder,
        defines: &'a BTreeMap<String, String>,
    ) -> Self {
        Self { finder, defines }
    }

    /// Preprocess `source` for `stage`.
    ///
    /// `origin` is the file the source came from; relative includes are
    /// resolved against its directory before the search directories.
    pub fn process(
        &self,
        stage: ShaderStage,
        origin: &Path,
        source: &str,
    ) -> Result<ShaderSource, GlviewError> {
        let name = origin.display().to_string();
        let mut lines: Vec<String> =
            source.trim().lines().map(str::to_owned).collect();

        let has_version = lines
            .first()
            .is_some_and(|l| l.trim_start().starts_with("#version"));
        if !has_version {
            return Err(GlviewError::ShaderSource {
                name,
                message: "first line must be a #version directive".to_owned(),
            });
        }

        lines = self.expand_includes(&name, lines, origin, 0)?;
        self.apply_defines(&mut lines);
        lines.insert(1, format!("#define {} 1", stage.define()));

        Ok(ShaderSource { stage, name, lines })
    }

    fn expand_includes(
        &self,
        name: &str,
        lines: Vec<String>,
        origin: &Path,
        depth: usize,
    ) -> Result<Vec<String>, GlviewError> {
        if depth > MAX_INCLUDE_DEPTH {
            return Err(GlviewError::IncludeDepth {
                name: name.to_owned(),
                depth,
            });
        }

        let mut expanded = Vec::with_capacity(lines.len());
        for line in lines {
            let Some(target) = include_target(&line) else {
                expanded.push(line);
                continue;
            };
            let path = self.resolve_include(origin, Path::new(target))?;
            log::debug!("{name}: including {}", path.display());
            let included = read_source(&path)?;
            let included_lines =
                included.trim().lines().map(str::to_owned).collect();
            expanded.extend(self.expand_includes(
                name,
                included_lines,
                &path,
                depth + 1,
            )?);
        }
        Ok(expanded)
    }

    fn resolve_include(
        &self,
        origin: &Path,
        target: &Path,
    ) -> Result<PathBuf, GlviewError> {
        if let Some(dir) = origin.parent() {
            let sibling = dir.join(target);
            if sibling.is_file() {
                return Ok(sibling);
            }
        }
        self.finder.find(target)
    }

    fn apply_defines(&self, lines: &mut [String]) {
        if self.defines.is_empty() {
            return;
        }
        for line in lines.iter_mut() {
            let mut parts = line.split_whitespace();
            if parts.next() != Some("#define") {
                continue;
            }
            let Some(symbol) = parts.next() else {
                continue;
            };
            if let Some(value) = self.defines.get(symbol) {
                *line = format!("#define {symbol} {value}");
            }
        }
    }
}

/// `#include "path"` or `#include <path>` target, if the line is an include.
fn include_target(line: &str) -> Option<&str> {
    let rest = line.trim().strip_prefix("#include")?.trim();
    let target = rest
        .strip_prefix('"')
        .and_then(|r| r.strip_suffix('"'))
        .or_else(|| rest.strip_prefix('<').and_then(|r| r.strip_suffix('>')))
        .unwrap_or(rest);
    (!target.is_empty()).then_some(target)
}

/// A loaded shader program: preprocessed sources for each present stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramShaders {
    label: String,
    stages: BTreeMap<ShaderStage, ShaderSource>,
    varyings: Vec<String>,
    reloadable: bool,
}

impl ProgramShaders {
    /// Assemble a program from preprocessed stages.
    ///
    /// Explicit `varyings` are kept. Otherwise, for programs without a
    /// fragment stage, the `out` declarations of the last vertex-processing
    /// stage become the transform feedback varyings.
    pub fn new(
        label: impl Into<String>,
        stages: impl IntoIterator<Item = ShaderSource>,
        varyings: Vec<String>,
        reloadable: bool,
    ) -> Self {
        let stages: BTreeMap<_, _> =
            stages.into_iter().map(|s| (s.stage, s)).collect();
        let detect = varyings.is_empty()
            && !stages.contains_key(&ShaderStage::Fragment);
        let varyings = if detect {
            [
                ShaderStage::Geometry,
                ShaderStage::TessEvaluation,
                ShaderStage::Vertex,
            ]
            .iter()
            .find_map(|stage| stages.get(stage))
            .map(ShaderSource::out_attributes)
            .unwrap_or_default()
        } else {
            varyings
        };
        Self {
            label: label.into(),
            stages,
            varyings,
            reloadable,
        }
    }

    /// Program label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Source for `stage`, if present.
    pub fn stage(&self, stage: ShaderStage) -> Option<&ShaderSource> {
        self.stages.get(&stage)
    }

    /// Present stages, in pipeline order.
    pub fn stages(&self) -> impl Iterator<Item = &ShaderSource> {
        self.stages.values()
    }

    /// Whether this is a compute program.
    pub fn is_compute(&self) -> bool {
        self.stages.contains_key(&ShaderStage::Compute)
    }

    /// Transform feedback varyings.
    pub fn varyings(&self) -> &[String] {
        &self.varyings
    }

    /// Whether the program may be reloaded when its files change.
    pub fn reloadable(&self) -> bool {
        self.reloadable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixtures() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
    }

    fn process(
        stage: ShaderStage,
        source: &str,
        defines: &BTreeMap<String, String>,
    ) -> Result<ShaderSource, GlviewError> {
        let finder = FileFinder::default();
        Preprocessor::new(&finder, defines).process(
            stage,
            Path::new("inline.glsl"),
            source,
        )
    }

    #[test]
    fn stage_define_follows_version() {
        let src = process(
            ShaderStage::Fragment,
            "\n#version 330\nvoid main() {}\n",
            &BTreeMap::new(),
        )
        .unwrap();
        assert_eq!(src.lines()[0], "#version 330");
        assert_eq!(src.lines()[1], "#define FRAGMENT_SHADER 1");
        assert_eq!(src.lines()[2], "void main() {}");
        assert_eq!(src.stage(), ShaderStage::Fragment);
    }

    #[test]
    fn missing_version_is_rejected() {
        let err =
            process(ShaderStage::Vertex, "void main() {}", &BTreeMap::new())
                .unwrap_err();
        assert!(matches!(
            err,
            GlviewError::ShaderSource { ref name, .. } if name == "inline.glsl"
        ));
    }

    #[test]
    fn defines_are_substituted() {
        let defines =
            BTreeMap::from([("NUM_LIGHTS".to_owned(), "8".to_owned())]);
        let src = process(
            ShaderStage::Vertex,
            "#version 330\n#define NUM_LIGHTS 2\n#define GAMMA 2.2\n",
            &defines,
        )
        .unwrap();
        assert!(src.lines().contains(&"#define NUM_LIGHTS 8".to_owned()));
        assert!(src.lines().contains(&"#define GAMMA 2.2".to_owned()));
    }

    #[test]
    fn includes_resolve_next_to_origin() {
        let origin = fixtures().join("programs/include/main.glsl");
        let source = std::fs::read_to_string(&origin).unwrap();
        let finder = FileFinder::default();
        let defines = BTreeMap::new();
        let src = Preprocessor::new(&finder, &defines)
            .process(ShaderStage::Fragment, &origin, &source)
            .unwrap();
        let text = src.source();
        assert!(text.contains("vec3 apply_lighting"));
        assert!(text.contains("float luminance"));
        assert!(!text.contains("#include"));
    }

    #[test]
    fn recursive_include_hits_depth_cap() {
        let origin = fixtures().join("programs/include/recursive.glsl");
        let source = std::fs::read_to_string(&origin).unwrap();
        let finder = FileFinder::default();
        let defines = BTreeMap::new();
        let err = Preprocessor::new(&finder, &defines)
            .process(ShaderStage::Vertex, &origin, &source)
            .unwrap_err();
        assert!(matches!(
            err,
            GlviewError::IncludeDepth { depth, .. }
                if depth == MAX_INCLUDE_DEPTH + 1
        ));
    }

    #[test]
    fn include_target_forms() {
        assert_eq!(
            include_target("#include \"common.glsl\""),
            Some("common.glsl")
        );
        assert_eq!(
            include_target("  #include <lib/noise.glsl>"),
            Some("lib/noise.glsl")
        );
        assert_eq!(include_target("#define X 1"), None);
        assert_eq!(include_target("#include"), None);
    }

    #[test]
    fn out_attribute_parsing() {
        assert_eq!(
            out_attribute("out vec3 out_pos;").as_deref(),
            Some("out_pos")
        );
        assert_eq!(
            out_attribute("layout(location = 0) out vec4 color;").as_deref(),
            Some("color")
        );
        assert_eq!(
            out_attribute("flat out int ids[4];").as_deref(),
            Some("ids")
        );
        assert_eq!(out_attribute("in vec3 in_position;"), None);
        assert_eq!(out_attribute("void f(out float x) {"), None);
        assert_eq!(out_attribute("// out vec3 old;"), None);
    }

    #[test]
    fn varyings_detected_without_fragment_stage() {
        let vs = process(
            ShaderStage::Vertex,
            "#version 330\nin vec3 in_pos;\n\
             out vec3 out_pos;\nout float out_life;\n",
            &BTreeMap::new(),
        )
        .unwrap();
        let program =
            ProgramShaders::new("feedback", [vs.clone()], Vec::new(), false);
        assert_eq!(program.varyings(), ["out_pos", "out_life"]);

        let explicit = ProgramShaders::new(
            "feedback",
            [vs],
            vec!["out_pos".to_owned()],
            false,
        );
        assert_eq!(explicit.varyings(), ["out_pos"]);
    }

    #[test]
    fn stages_iterate_in_pipeline_order() {
        let defines = BTreeMap::new();
        let fs =
            process(ShaderStage::Fragment, "#version 330\n", &defines).unwrap();
        let vs =
            process(ShaderStage::Vertex, "#version 330\n", &defines).unwrap();
        let program = ProgramShaders::new("lit", [fs, vs], Vec::new(), true);
        let order: Vec<_> =
            program.stages().map(ShaderSource::stage).collect();
        assert_eq!(order, [ShaderStage::Vertex, ShaderStage::Fragment]);
        assert!(program.varyings().is_empty());
        assert!(program.reloadable());
        assert!(!program.is_compute());
    }
}
