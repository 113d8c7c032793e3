//! `patchbay gen`: the full compilation pipeline.
//!
//! 1. Load `patchbay.toml` if one is in use, and merge command-line flags
//! 2. Compile the hardware descriptor
//! 3. Order the patch list and truncate it to the target's app slots
//! 4. Analyze the patches (in parallel)
//! 5. Wire each patch to the target
//! 6. Emit the build unit and write it with the board header

use std::fs;
use std::path::{Path, PathBuf};

use patchbay_config::BuildOptions;
use patchbay_diagnostics::DiagnosticSink;
use patchbay_emit::{emit, order_patches, AppSource};
use tracing::info;

use crate::pipeline::{
    analyze_patches, constants, include_path, load_project, merge_options, render_diagnostics,
};
use crate::{GenArgs, GlobalArgs};

/// Inputs of one build after config and flags are merged.
#[derive(Debug)]
pub struct BuildPlan {
    /// Hardware descriptor path.
    pub target: PathBuf,
    /// Patch source paths.
    pub patches: Vec<PathBuf>,
    /// Output directory.
    pub output: PathBuf,
    /// Build parameters.
    pub options: BuildOptions,
}

/// Merges the project configuration (if any) with the command line.
pub fn plan(args: &GenArgs, global: &GlobalArgs) -> Result<BuildPlan, Box<dyn std::error::Error>> {
    let project = load_project(global)?;
    let (dir, base, cfg_target, cfg_patches, cfg_output) = match &project {
        Some(p) => (
            p.dir.clone(),
            p.config.build.options(),
            Some(p.config.target.hardware.clone()).filter(|s| !s.is_empty()),
            p.config.project.patches.clone(),
            Some(p.config.build.output_dir.clone()),
        ),
        None => (PathBuf::from("."), BuildOptions::default(), None, Vec::new(), None),
    };

    let target = match (&args.target, cfg_target) {
        (Some(t), _) => t.clone(),
        (None, Some(t)) => dir.join(t),
        (None, None) => return Err("no hardware target given (use --target or patchbay.toml)".into()),
    };
    let patches: Vec<PathBuf> = if args.patches.is_empty() {
        cfg_patches.iter().map(|p| dir.join(p)).collect()
    } else {
        args.patches.clone()
    };
    if patches.is_empty() {
        return Err("no patch sources given".into());
    }
    let output = match (&args.output, cfg_output) {
        (Some(o), _) => o.clone(),
        (None, Some(o)) => dir.join(o),
        (None, None) => PathBuf::from("build"),
    };

    let mut options = merge_options(base, &args.build);
    options.boost |= args.boost;
    options.fastmath |= args.fastmath;
    options.nooled |= args.nooled;
    options.validate()?;

    Ok(BuildPlan {
        target,
        patches,
        output,
        options,
    })
}

fn target_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "daisy".to_string())
}

/// Runs the `patchbay gen` command.
///
/// Returns exit code 0 on success, 1 if errors were reported. Stage failures
/// are reported as coded diagnostics; only configuration and I/O failures
/// are returned as errors.
pub fn run(args: &GenArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let plan = plan(args, global)?;
    let sink = DiagnosticSink::new();
    let result = build(&plan, global, &sink);
    render_diagnostics(&sink, global.color);
    result?;
    Ok(if sink.has_errors() { 1 } else { 0 })
}

fn build(
    plan: &BuildPlan,
    global: &GlobalArgs,
    sink: &DiagnosticSink,
) -> Result<(), Box<dyn std::error::Error>> {
    let hw = match patchbay_hardware::load_descriptor(&plan.target, sink) {
        Ok(hw) => hw,
        Err(e) => {
            sink.emit(e.to_diagnostic(plan.target.display().to_string()));
            return Ok(());
        }
    };
    let target = target_name(&plan.target);

    let paths = order_patches(&plan.patches, hw.max_apps, sink);
    let patches = analyze_patches(&paths, &constants(&plan.options), sink)?;
    if sink.has_errors() {
        return Ok(());
    }

    let mut apps = Vec::with_capacity(patches.len());
    for patch in &patches {
        match patchbay_wiring::resolve(patch, &hw, sink) {
            Ok(app) => apps.push(app),
            Err(e) => sink.emit(e.to_diagnostic(patch.name.as_str())),
        }
    }
    if sink.has_errors() {
        return Ok(());
    }

    fs::create_dir_all(&plan.output)?;
    let includes: Vec<String> = paths.iter().map(|p| include_path(p, &plan.output)).collect();
    let sources: Vec<AppSource<'_>> = apps
        .iter()
        .zip(&includes)
        .map(|(app, include)| AppSource { app, include })
        .collect();
    let artifact = match emit(&target, &hw, &plan.options, &sources) {
        Ok(artifact) => artifact,
        Err(e) => {
            sink.emit(e.to_diagnostic(target));
            return Ok(());
        }
    };

    let header = plan.output.join(artifact.header_file_name());
    let main = plan.output.join(artifact.main_file_name());
    fs::write(&header, &artifact.board_header)?;
    fs::write(&main, &artifact.main_source)?;
    info!(header = %header.display(), main = %main.display(), "wrote build");

    if !global.quiet {
        eprintln!(
            "   Generated {} ({} app(s), {})",
            main.display(),
            apps.len(),
            artifact.hash.short()
        );
    }
    Ok(())
}
