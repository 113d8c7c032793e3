//! Typed representation of the `patchbay.toml` file.

use crate::options::BuildOptions;
use serde::de::{self, Deserializer, Visitor};
use serde::Deserialize;

/// The complete contents of a `patchbay.toml` file.
#[derive(Debug, Deserialize)]
pub struct ProjectConfig {
    /// Project identity and the patch sources to build.
    pub project: ProjectMeta,
    /// The hardware the patches are built for.
    #[serde(default)]
    pub target: TargetConfig,
    /// Build parameters.
    #[serde(default)]
    pub build: BuildConfig,
}

/// The `[project]` section.
#[derive(Debug, Deserialize)]
pub struct ProjectMeta {
    /// Project name, used in log output.
    pub name: String,
    /// Patch source files, relative to the project directory. The first one
    /// sorted by file name becomes the default app.
    #[serde(default, deserialize_with = "deserialize_string_or_vec")]
    pub patches: Vec<String>,
}

/// The `[target]` section.
#[derive(Debug, Default, Deserialize)]
pub struct TargetConfig {
    /// Path to the hardware descriptor JSON, relative to the project directory.
    #[serde(default)]
    pub hardware: String,
}

/// The `[build]` section.
#[derive(Debug, Deserialize)]
pub struct BuildConfig {
    /// Sample rate in kHz.
    #[serde(default = "default_samplerate")]
    pub samplerate_khz: u32,
    /// Audio block size in frames.
    #[serde(default = "default_blocksize")]
    pub blocksize: u32,
    /// Boost the MCU clock.
    #[serde(default)]
    pub boost: bool,
    /// Use fast math approximations.
    #[serde(default)]
    pub fastmath: bool,
    /// Keep OLED support when the target has a display.
    #[serde(default = "default_true")]
    pub oled: bool,
    /// Directory the generated sources are written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            samplerate_khz: default_samplerate(),
            blocksize: default_blocksize(),
            boost: false,
            fastmath: false,
            oled: true,
            output_dir: default_output_dir(),
        }
    }
}

impl BuildConfig {
    /// Converts this section into pipeline build options.
    pub fn options(&self) -> BuildOptions {
        BuildOptions {
            samplerate_khz: self.samplerate_khz,
            blocksize: self.blocksize,
            boost: self.boost,
            fastmath: self.fastmath,
            nooled: !self.oled,
        }
    }
}

fn default_samplerate() -> u32 {
    48
}

fn default_blocksize() -> u32 {
    24
}

fn default_true() -> bool {
    true
}

fn default_output_dir() -> String {
    "build".to_string()
}

/// Deserializes a field that can be either a single string or a list of strings.
///
/// Allows `patches = "reverb.cpp"` as well as `patches = ["a.cpp", "b.cpp"]`.
fn deserialize_string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(vec![v.to_string()])
        }

        fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut vec = Vec::new();
            while let Some(val) = seq.next_element::<String>()? {
                vec.push(val);
            }
            Ok(vec)
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_section_to_options() {
        let build = BuildConfig {
            samplerate_khz: 96,
            blocksize: 48,
            boost: true,
            fastmath: false,
            oled: false,
            output_dir: "out".to_string(),
        };
        let opts = build.options();
        assert_eq!(opts.samplerate_hz(), 96000);
        assert_eq!(opts.blocksize, 48);
        assert!(opts.boost);
        assert!(opts.nooled);
    }

    #[test]
    fn patches_accept_single_string() {
        let meta: ProjectMeta = toml::from_str("name = \"x\"\npatches = \"a.cpp\"").unwrap();
        assert_eq!(meta.patches, vec!["a.cpp"]);
    }
}
