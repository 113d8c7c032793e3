//! `patchbay check`: compiles a hardware descriptor and lists what patches
//! can bind to.

use std::fmt::Write;

use patchbay_diagnostics::DiagnosticSink;
use patchbay_hardware::HardwareDescriptor;

use crate::pipeline::render_diagnostics;
use crate::{CheckArgs, GlobalArgs, ReportFormat};

/// Runs the `patchbay check` command.
///
/// Returns exit code 0 if the descriptor compiled, 1 otherwise.
pub fn run(args: &CheckArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let sink = DiagnosticSink::new();
    let result = patchbay_hardware::load_descriptor(&args.target, &sink);
    if let Err(e) = &result {
        sink.emit(e.to_diagnostic(args.target.display().to_string()));
    }
    render_diagnostics(&sink, global.color);
    let Ok(hw) = result else {
        return Ok(1);
    };

    match args.format {
        ReportFormat::Text => print!("{}", summary(&hw)),
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&hw)?),
    }
    if !global.quiet {
        eprintln!(
            "   Checked {} ({} warning(s))",
            args.target.display(),
            sink.warning_count()
        );
    }
    Ok(0)
}

/// Renders a plain-text listing of the descriptor's signals.
fn summary(hw: &HardwareDescriptor) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({}, {} app slot(s))", hw.struct_name(), hw.som, hw.max_apps);

    let _ = writeln!(out, "inputs:");
    for s in &hw.inputs {
        let mut notes = Vec::new();
        if s.automap {
            notes.push("automap".to_string());
        }
        if s.is_bool {
            notes.push("bool".to_string());
        }
        if let Some((lo, hi)) = s.range {
            notes.push(format!("[{lo}, {hi}]"));
        }
        if notes.is_empty() {
            let _ = writeln!(out, "  {}", s.name);
        } else {
            let _ = writeln!(out, "  {} ({})", s.name, notes.join(", "));
        }
    }

    let _ = writeln!(out, "outputs:");
    for s in &hw.outputs {
        let _ = writeln!(out, "  {} [{}]", s.name, s.phase);
    }

    if !hw.datahandlers.is_empty() {
        let _ = writeln!(out, "datahandlers:");
        for d in &hw.datahandlers {
            let _ = writeln!(out, "  {}", d.name);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use patchbay_hardware::{compile, parse_descriptor};

    const POD: &str = r#"{
        "name": "pod",
        "max_apps": 8,
        "components": {
            "knob1": {"component": "AnalogControl", "pin": 21},
            "sw1": {"component": "Switch", "pin": 28},
            "led1": {"component": "Led", "pin": 22}
        }
    }"#;

    #[test]
    fn lists_signals() {
        let raw = parse_descriptor(POD).unwrap();
        let hw = compile(&raw, None, &DiagnosticSink::new()).unwrap();
        let text = summary(&hw);
        assert!(text.starts_with("DaisyPod ("));
        assert!(text.contains("8 app slot(s)"));
        assert!(text.contains("  knob1 (automap)\n"));
        assert!(text.contains("  led1 ["));
        assert!(!text.contains("datahandlers:"));
    }

    #[test]
    fn missing_descriptor_exits_nonzero() {
        let args = CheckArgs {
            target: "/nonexistent/pod.json".into(),
            format: ReportFormat::Text,
        };
        let global = GlobalArgs {
            quiet: true,
            verbose: 0,
            color: false,
            config: None,
        };
        assert_eq!(run(&args, &global).unwrap(), 1);
    }

    #[test]
    fn load_failure_diagnostic_names_the_descriptor() {
        let err = patchbay_hardware::load_descriptor(
            std::path::Path::new("/nonexistent/pod.json"),
            &DiagnosticSink::new(),
        )
        .unwrap_err();
        let diag = err.to_diagnostic("/nonexistent/pod.json");
        assert_eq!(diag.code, patchbay_hardware::E201);
        assert!(diag.message.contains("/nonexistent/pod.json"));
    }
}
