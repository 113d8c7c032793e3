//! `patchbay inspect`: prints the descriptor the analyzer extracts from a
//! patch source as JSON.

use patchbay_config::BuildOptions;
use patchbay_diagnostics::DiagnosticSink;

use crate::pipeline::{analyze_patches, constants, merge_options, render_diagnostics};
use crate::{GlobalArgs, InspectArgs};

/// Runs the `patchbay inspect` command.
///
/// Returns exit code 0 on success, 1 if errors were reported.
pub fn run(args: &InspectArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let options = merge_options(BuildOptions::default(), &args.build);
    options.validate()?;

    let sink = DiagnosticSink::new();
    let result = analyze_patches(
        std::slice::from_ref(&args.patch),
        &constants(&options),
        &sink,
    );
    render_diagnostics(&sink, global.color);
    let Some(patch) = result?.into_iter().next() else {
        return Ok(1);
    };

    println!("{}", serde_json::to_string_pretty(&patch)?);
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BuildFlags;
    use std::fs;

    fn global() -> GlobalArgs {
        GlobalArgs {
            quiet: true,
            verbose: 0,
            color: false,
            config: None,
        }
    }

    #[test]
    fn inspects_a_patch() {
        let tmp = tempfile::tempdir().unwrap();
        let patch = tmp.path().join("tone.cpp");
        fs::write(
            &patch,
            "namespace tone {\nconst char *gen_kernel_innames[] = { };\nconst char *gen_kernel_outnames[] = { \"out1\" };\n}\n",
        )
        .unwrap();
        let args = InspectArgs {
            patch,
            build: BuildFlags::default(),
        };
        assert_eq!(run(&args, &global()).unwrap(), 0);
    }

    #[test]
    fn malformed_patch_exits_nonzero() {
        let tmp = tempfile::tempdir().unwrap();
        let patch = tmp.path().join("tone.cpp");
        fs::write(&patch, "const char *gen_kernel_innames[] = { };\n").unwrap();
        let args = InspectArgs {
            patch,
            build: BuildFlags::default(),
        };
        assert_eq!(run(&args, &global()).unwrap(), 1);
    }

    #[test]
    fn rejects_unsupported_block_size() {
        let args = InspectArgs {
            patch: "tone.cpp".into(),
            build: BuildFlags {
                samplerate: None,
                blocksize: Some(7),
            },
        };
        let err = run(&args, &global()).unwrap_err();
        assert!(err.to_string().contains("block size 7"));
    }
}
