/// Writers that fill a bootstrapped config tree.
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};

use super::errors::ConfigureError;
use super::layout::ConfigLayout;
use super::model::RunConfiguration;

/// Serialize `config` as a flat block-style YAML mapping to `layout.args`.
///
/// Any existing file at that path is replaced. Returns the path written.
///
/// # Errors
///
/// Returns `ConfigureError::Yaml` if serialization fails, `ConfigureError::Io` if
/// the file cannot be written.
pub fn save_args(config: &RunConfiguration, layout: &ConfigLayout) -> Result<PathBuf, ConfigureError> {
    let yaml = to_yaml(config)?;
    fs::write(&layout.args, yaml).map_err(|e| ConfigureError::io(&layout.args, e))?;
    info!("Writing arguments into File \"{}\"", layout.args.display());
    Ok(layout.args.clone())
}

/// Render `config` as block-style YAML that YAML 1.1 and 1.2 readers load identically.
///
/// serde_yaml emits YAML 1.2, which leaves scalars such as `yes`, `off` or `1_000`
/// plain. Those are single-quoted here; every other entry is left to serde_yaml.
///
/// # Errors
///
/// Returns `ConfigureError::Yaml` if an entry cannot be serialized.
pub fn to_yaml(config: &RunConfiguration) -> Result<String, ConfigureError> {
    let mut out = String::new();
    for (key, value) in config.entries() {
        if resolves_as_non_string_in_yaml11(value) {
            let _ = writeln!(out, "{key}: '{}'", value.replace('\'', "''"));
        } else {
            out.push_str(&serde_yaml::to_string(&BTreeMap::from([(key, value)]))?);
        }
    }
    Ok(out)
}

/// Whether a plain scalar `s` would load as something other than a string under
/// the YAML 1.1 core resolvers (bool, null, int, float, timestamp, merge, value).
#[must_use]
pub fn resolves_as_non_string_in_yaml11(s: &str) -> bool {
    const WORDS: &[&str] = &[
        "y", "Y", "yes", "Yes", "YES", "n", "N", "no", "No", "NO", "true", "True", "TRUE",
        "false", "False", "FALSE", "on", "On", "ON", "off", "Off", "OFF", "~", "null", "Null",
        "NULL", "", "<<", "=", ".nan", ".NaN", ".NAN",
    ];
    if WORDS.contains(&s) {
        return true;
    }

    let unsigned = s.strip_prefix(['+', '-']).unwrap_or(s);
    is_yaml11_int(unsigned)
        || is_yaml11_float(unsigned)
        || is_sexagesimal(unsigned)
        || is_timestamp(s)
}

fn all_of(s: &str, allowed: impl Fn(char) -> bool) -> bool {
    !s.is_empty() && s.chars().all(allowed)
}

fn is_digit_or_underscore(c: char) -> bool {
    c.is_ascii_digit() || c == '_'
}

fn is_yaml11_int(s: &str) -> bool {
    if let Some(bits) = s.strip_prefix("0b") {
        return all_of(bits, |c| matches!(c, '0' | '1' | '_'));
    }
    if let Some(hex) = s.strip_prefix("0x") {
        return all_of(hex, |c| c.is_ascii_hexdigit() || c == '_');
    }
    // 1.2 spelling of octal; 1.1 readers keep it a string but 1.2 readers do not.
    if let Some(oct) = s.strip_prefix("0o") {
        return all_of(oct, |c| matches!(c, '0'..='7' | '_'));
    }
    if let Some(oct) = s.strip_prefix('0') {
        return oct.is_empty() || all_of(oct, |c| matches!(c, '0'..='7' | '_'));
    }
    s.starts_with(|c: char| c.is_ascii_digit()) && all_of(s, is_digit_or_underscore)
}

fn is_yaml11_float(s: &str) -> bool {
    if matches!(s, ".inf" | ".Inf" | ".INF") {
        return true;
    }
    let (mantissa, exponent) = match s.find(['e', 'E']) {
        Some(at) => (&s[..at], Some(&s[at + 1..])),
        None => (s, None),
    };
    if let Some(exp) = exponent {
        let digits = exp.strip_prefix(['+', '-']).unwrap_or("");
        if !all_of(digits, |c| c.is_ascii_digit()) {
            return false;
        }
    }
    let Some((whole, frac)) = mantissa.split_once('.') else {
        return false;
    };
    if whole.is_empty() {
        all_of(frac, is_digit_or_underscore)
    } else {
        whole.starts_with(|c: char| c.is_ascii_digit())
            && all_of(whole, is_digit_or_underscore)
            && frac.chars().all(is_digit_or_underscore)
    }
}

/// Base-60 numbers such as `1:30` or `190:20:30.15`.
fn is_sexagesimal(s: &str) -> bool {
    let mut parts = s.split(':');
    let head = parts.next().unwrap_or("");
    if !head.starts_with(|c: char| c.is_ascii_digit()) || !all_of(head, is_digit_or_underscore) {
        return false;
    }
    let rest: Vec<&str> = parts.collect();
    let Some((last, middle)) = rest.split_last() else {
        return false;
    };
    let last = match last.split_once('.') {
        Some((seg, frac)) if frac.chars().all(is_digit_or_underscore) => seg,
        Some(_) => return false,
        None => last,
    };
    middle.iter().chain(std::iter::once(&last)).all(|seg| {
        let b = seg.as_bytes();
        match b {
            [d] => d.is_ascii_digit(),
            [hi, lo] => (b'0'..=b'5').contains(hi) && lo.is_ascii_digit(),
            _ => false,
        }
    })
}

/// `YYYY-M-D` prefix, which 1.1 loaders turn into dates or datetimes.
fn is_timestamp(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() >= 8 && b[..4].iter().all(u8::is_ascii_digit) && b[4] == b'-' && b[5].is_ascii_digit()
}

/// Read a run configuration back from an `args.yaml` file.
///
/// # Errors
///
/// Returns `ConfigureError::Io` if the file cannot be read, `ConfigureError::Yaml`
/// if it is not a valid run configuration mapping.
pub fn load_args(path: &Path) -> Result<RunConfiguration, ConfigureError> {
    let text = fs::read_to_string(path).map_err(|e| ConfigureError::io(path, e))?;
    Ok(serde_yaml::from_str(&text)?)
}

/// A producer of extra files inside a config tree.
pub trait ConfigWriter {
    /// Short name for logs and timings.
    fn name(&self) -> &'static str;

    /// Write this writer's files and return the paths created.
    ///
    /// # Errors
    ///
    /// Returns `ConfigureError` on any filesystem or serialization failure.
    fn write(
        &self,
        config: &RunConfiguration,
        layout: &ConfigLayout,
    ) -> Result<Vec<PathBuf>, ConfigureError>;
}

/// Shared configuration for all roles, destined for `general/`.
///
/// Emits nothing yet: the file set and format are not settled.
pub struct GeneralConfigWriter;

impl ConfigWriter for GeneralConfigWriter {
    fn name(&self) -> &'static str {
        "general_config"
    }

    fn write(
        &self,
        _config: &RunConfiguration,
        layout: &ConfigLayout,
    ) -> Result<Vec<PathBuf>, ConfigureError> {
        debug!("no general config emitted into {}", layout.general.display());
        Ok(Vec::new())
    }
}

/// Per-node configuration, destined for `nodes/`.
///
/// Emits nothing yet: the per-node format is not settled.
pub struct NodeConfigWriter;

impl ConfigWriter for NodeConfigWriter {
    fn name(&self) -> &'static str {
        "node_config"
    }

    fn write(
        &self,
        _config: &RunConfiguration,
        layout: &ConfigLayout,
    ) -> Result<Vec<PathBuf>, ConfigureError> {
        debug!("no node config emitted into {}", layout.nodes.display());
        Ok(Vec::new())
    }
}

/// Writers run after `args.yaml`, in order.
#[must_use]
pub fn extension_writers() -> Vec<Box<dyn ConfigWriter>> {
    vec![Box::new(GeneralConfigWriter), Box::new(NodeConfigWriter)]
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::config::layout::{Bootstrap, OverwritePolicy, generate_config_directory};
    use crate::config::Confirm;
    use tempfile::TempDir;

    struct Never;

    impl Confirm for Never {
        fn confirm(&mut self, _question: &str) -> Result<bool, ConfigureError> {
            panic!("unexpected prompt");
        }
    }

    fn sample() -> RunConfiguration {
        RunConfiguration {
            structure: "structure.file".to_owned(),
            chunk_size: "2MB".to_owned(),
            total_size: "100MB".to_owned(),
            algorithm: "testAlgorithm".to_owned(),
        }
    }

    fn bootstrapped(tmp: &TempDir) -> ConfigLayout {
        let layout = ConfigLayout::new(tmp.path().join("configure"), "_test_dir_").unwrap();
        let outcome = generate_config_directory(&layout, OverwritePolicy::Fail, &mut Never).unwrap();
        assert_eq!(outcome, Bootstrap::Created);
        layout
    }

    #[test]
    fn test_save_args_round_trips() {
        let tmp = TempDir::new().unwrap();
        let layout = bootstrapped(&tmp);

        let path = save_args(&sample(), &layout).unwrap();

        assert_eq!(path, layout.args);
        assert!(path.is_file());
        assert_eq!(load_args(&path).unwrap(), sample());
    }

    #[test]
    fn test_saved_yaml_is_flat_block_mapping() {
        let tmp = TempDir::new().unwrap();
        let layout = bootstrapped(&tmp);
        save_args(&sample(), &layout).unwrap();

        let text = fs::read_to_string(&layout.args).unwrap();
        assert_eq!(
            text,
            "structure: structure.file\nchunk_size: 2MB\ntotal_size: 100MB\nalgorithm: testAlgorithm\n"
        );
        assert!(!text.contains('{'));

        let generic: BTreeMap<String, String> = serde_yaml::from_str(&text).unwrap();
        let expected: BTreeMap<String, String> = sample()
            .entries()
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        assert_eq!(generic, expected);
    }

    #[test]
    fn test_yaml11_ambiguous_values_are_quoted() {
        let tmp = TempDir::new().unwrap();
        let layout = bootstrapped(&tmp);

        for value in [
            "yes", "no", "on", "off", "y", "n", "NO", "True", "~", "null", "1_000", "0b1", "0o7",
            "017", "0x1F", "42", "-3", "1:30", "190:20:30", "1.5", "-.5", ".inf", "6.8e+5",
            "2001-12-14", "=", "<<",
        ] {
            let config = RunConfiguration {
                structure: value.to_owned(),
                chunk_size: value.to_owned(),
                total_size: "10MB".to_owned(),
                algorithm: value.to_owned(),
            };
            save_args(&config, &layout).unwrap();

            let text = fs::read_to_string(&layout.args).unwrap();
            let quoted = format!("'{value}'");
            assert!(text.contains(&format!("structure: {quoted}\n")), "{value}: {text}");
            assert!(text.contains(&format!("chunk_size: {quoted}\n")), "{value}: {text}");
            assert!(text.contains(&format!("algorithm: {quoted}\n")), "{value}: {text}");
            assert!(text.contains("total_size: 10MB\n"), "{value}: {text}");
            assert_eq!(load_args(&layout.args).unwrap(), config, "{value}");
        }
    }

    #[test]
    fn test_plain_values_stay_plain() {
        for value in ["2MB", "100MB", "s.file", "defaultTestAlgorithm", "1.2.3", "yess", "v1:30"] {
            assert!(!resolves_as_non_string_in_yaml11(value), "{value}");
        }
    }

    #[test]
    fn test_save_args_replaces_existing_file() {
        let tmp = TempDir::new().unwrap();
        let layout = bootstrapped(&tmp);
        fs::write(&layout.args, "garbage: [1, 2]\n").unwrap();

        save_args(&sample(), &layout).unwrap();

        assert_eq!(load_args(&layout.args).unwrap(), sample());
    }

    #[test]
    fn test_save_args_without_tree_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let layout = ConfigLayout::new(tmp.path(), "missing").unwrap();
        let err = save_args(&sample(), &layout).unwrap_err();
        assert!(matches!(err, ConfigureError::Io { .. }));
    }

    #[test]
    fn test_extension_writers_emit_nothing() {
        let tmp = TempDir::new().unwrap();
        let layout = bootstrapped(&tmp);

        let writers = extension_writers();
        let names: Vec<&str> = writers.iter().map(|w| w.name()).collect();
        assert_eq!(names, ["general_config", "node_config"]);

        for writer in &writers {
            assert!(writer.write(&sample(), &layout).unwrap().is_empty());
        }
        assert_eq!(fs::read_dir(&layout.nodes).unwrap().count(), 0);
        assert_eq!(fs::read_dir(&layout.general).unwrap().count(), 0);
    }
}
