//! The build unit: every app of a build against one target, in one source.

use crate::app::{member_name, struct_name, write_app, Context};
use crate::defines::target_defines;
use crate::error::EmitError;
use crate::fragment::{CodeWriter, Fragment};
use patchbay_common::{ContentHash, Phase};
use patchbay_config::BuildOptions;
use patchbay_hardware::HardwareDescriptor;
use patchbay_wiring::App;
use serde::Serialize;
use tracing::info;

/// One resolved app and the path its patch source is included from.
#[derive(Debug, Clone, Copy)]
pub struct AppSource<'a> {
    /// The wired app.
    pub app: &'a App,
    /// Include path of the patch source, relative to the build directory.
    pub include: &'a str,
}

/// The rendered output of a build.
#[derive(Debug, Clone, Serialize)]
pub struct Artifact {
    /// Build name: the app names joined by `_`.
    pub name: String,
    /// Target name, used for file names.
    pub target: String,
    /// Board support header.
    pub board_header: String,
    /// The main translation unit.
    pub main_source: String,
    /// Hash over both texts.
    pub hash: ContentHash,
}

impl Artifact {
    /// File name of the main unit, `<name>_<target>.cpp`.
    pub fn main_file_name(&self) -> String {
        format!("{}_{}.cpp", self.name, self.target)
    }

    /// File name of the board header, `<target>.h`.
    pub fn header_file_name(&self) -> String {
        header_file_name(&self.target)
    }
}

fn header_file_name(target: &str) -> String {
    format!("{target}.h")
}

/// Renders the build of `apps` against `hw`.
///
/// Apps are registered in the order given; callers sort them first. Two apps
/// with the same name would declare the same struct, so they are rejected
/// with [`EmitError::DuplicateApp`].
pub fn emit(
    target: &str,
    hw: &HardwareDescriptor,
    options: &BuildOptions,
    apps: &[AppSource<'_>],
) -> Result<Artifact, EmitError> {
    if apps.is_empty() {
        return Err(EmitError::NoApps);
    }
    for (i, later) in apps.iter().enumerate() {
        if let Some(earlier) = apps[..i].iter().find(|a| a.app.name == later.app.name) {
            return Err(EmitError::DuplicateApp {
                name: later.app.name.clone(),
                first: earlier.include.to_string(),
                second: later.include.to_string(),
            });
        }
    }
    let wired: Vec<&App> = apps.iter().map(|a| a.app).collect();
    let defines = target_defines(hw, options, &wired);
    let ctx = Context {
        hw,
        defines: &defines,
        samplerate_khz: options.samplerate_khz,
    };
    let name = wired.iter().map(|a| a.name.as_str()).collect::<Vec<_>>().join("_");
    let unit_inserts: Vec<Fragment> = hw.inserts.iter().map(Fragment::from).collect();

    let mut w = CodeWriter::new();
    w.line(format!("// {name} for {target}, generated by patchbay"));
    w.blank();
    for (k, v) in defines.iter() {
        w.line(format!("#define {k} ({v})"));
    }
    w.fragments(&unit_inserts, Phase::Header);
    w.blank();
    w.line(format!("#include \"{}\"", header_file_name(target)));
    w.line(format!("typedef patchbay::{} Daisy;", hw.struct_name()));
    w.line("#include \"genlib_daisy.h\"");
    w.line("#include \"genlib_daisy.cpp\"");
    w.blank();
    for a in apps {
        w.line(format!("#include \"{}\"", a.include));
    }
    for a in apps {
        w.blank();
        write_app(&mut w, a.app, &ctx)?;
    }

    w.blank();
    w.line("// only one app is live at a time");
    w.open("union {");
    for a in &wired {
        w.line(format!("{} {};", struct_name(a), member_name(a)));
    }
    w.close("} apps;");
    w.blank();
    w.open("oopsy::AppDef appdefs[] = {");
    for a in &wired {
        w.line(format!(
            "{{\"{}\", []()->void {{ oopsy::daisy.reset(apps.{}); }} }},",
            a.name,
            member_name(a)
        ));
    }
    w.close("};");
    w.blank();
    w.open("int main(void) {");
    w.line("Daisy& hardware = oopsy::daisy.hardware;");
    w.line(format!("hardware.Init({});", options.boost));
    w.line(format!(
        "hardware.SetAudioSampleRate(daisy::SaiHandle::Config::SampleRate::SAI_{}KHZ);",
        options.samplerate_khz
    ));
    w.line("hardware.SetAudioBlockSize(OOPSY_BLOCK_SIZE);");
    w.fragments(&unit_inserts, Phase::Init);
    w.line(format!("return oopsy::daisy.run(appdefs, {});", apps.len()));
    w.close("}");

    let main_source = w.finish();
    let hash = ContentHash::from_parts(&[hw.board_header.as_str(), main_source.as_str()]);
    info!(
        build = %name,
        board = target,
        apps = apps.len(),
        bytes = main_source.len() + hw.board_header.len(),
        hash = %hash.short(),
        "emitted build unit"
    );
    Ok(Artifact {
        name,
        target: target.to_string(),
        board_header: hw.board_header.clone(),
        main_source,
        hash,
    })
}
