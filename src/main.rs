//! Loads shader programs the way an application would at startup and logs
//! what each one resolved to, along with the configured projection.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use glview::camera::{Projection, ProjectionUpdate};
use glview::resources::{ProgramDescription, ProgramKind, Programs, ShaderStage};
use glview::settings::Settings;
use glview::GlviewError;

#[derive(Parser, Debug)]
#[command(name = "glview", about = "Resolve and preprocess shader programs")]
struct Cli {
    /// Settings file (TOML). Defaults are used when omitted.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Extra program search directory, searched after `PROGRAM_DIRS`.
    #[arg(long = "dir")]
    dirs: Vec<PathBuf>,

    /// Single-file program to load.
    #[arg(long = "program")]
    programs: Vec<PathBuf>,

    /// Vertex shader of a separate-file program.
    #[arg(long, requires = "fragment")]
    vertex: Option<PathBuf>,

    /// Fragment shader of a separate-file program.
    #[arg(long, requires = "vertex")]
    fragment: Option<PathBuf>,

    /// `NAME=VALUE` define override applied to every program.
    #[arg(long = "define", value_parser = parse_define)]
    defines: Vec<(String, String)>,

    /// Viewport aspect ratio overriding the settings.
    #[arg(long)]
    aspect_ratio: Option<f32>,
}

fn parse_define(arg: &str) -> Result<(String, String), String> {
    arg.split_once('=')
        .map(|(name, value)| (name.to_owned(), value.to_owned()))
        .ok_or_else(|| format!("expected NAME=VALUE, got '{arg}'"))
}

fn run(cli: Cli) -> Result<usize, GlviewError> {
    let mut settings = match &cli.settings {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    settings.program_dirs.extend(cli.dirs);

    let mut programs = Programs::from_settings(&settings)?;
    let with_defines = |mut desc: ProgramDescription| {
        for (name, value) in &cli.defines {
            desc = desc.with_define(name.clone(), value.clone());
        }
        desc
    };

    for path in cli.programs {
        programs.add(with_defines(ProgramDescription::from_path(path)));
    }
    if let (Some(vertex), Some(fragment)) = (cli.vertex, cli.fragment) {
        let label = vertex.display().to_string();
        programs.add(with_defines(
            ProgramDescription::new(label)
                .with_stage(ShaderStage::Vertex, vertex)
                .with_stage(ShaderStage::Fragment, fragment),
        ));
    }

    let mut failures = 0;
    for (desc, result) in programs.load_pool() {
        let kind = desc.kind.as_ref().map_or("?", ProgramKind::as_str);
        match result {
            Ok(program) => {
                for stage in program.stages() {
                    log::info!(
                        "{} [{kind}] {}: {} lines",
                        desc.label,
                        stage.stage(),
                        stage.lines().len()
                    );
                }
                if !program.varyings().is_empty() {
                    log::info!(
                        "{} varyings: {}",
                        desc.label,
                        program.varyings().join(", ")
                    );
                }
            }
            Err(e) => {
                log::error!("{} [{kind}]: {e}", desc.label);
                failures += 1;
            }
        }
    }

    let mut projection = Projection::from_settings(&settings.projection);
    if let Some(aspect_ratio) = cli.aspect_ratio {
        projection.update(
            ProjectionUpdate::default().with_aspect_ratio(aspect_ratio),
        );
    }
    let (a, b) = projection.projection_constants();
    log::info!(
        "Projection fov={} aspect={} near={} far={} constants=({a}, {b})",
        projection.fov(),
        projection.aspect_ratio(),
        projection.near(),
        projection.far()
    );
    log::debug!("Projection matrix: {:?}", projection.matrix_array());

    Ok(failures)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .init();

    match run(Cli::parse()) {
        Ok(0) => ExitCode::SUCCESS,
        Ok(failures) => {
            log::error!("{failures} program(s) failed to load");
            ExitCode::FAILURE
        }
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
