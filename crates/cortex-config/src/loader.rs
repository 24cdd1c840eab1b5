// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::debug;

use crate::Config;

/// One place configuration may come from.  Discovered files are optional;
/// an explicitly requested file must exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Discovered(PathBuf),
    Explicit(PathBuf),
}

impl ConfigSource {
    pub fn path(&self) -> &Path {
        match self {
            ConfigSource::Discovered(p) | ConfigSource::Explicit(p) => p,
        }
    }
}

/// Config sources from lowest to highest priority: system, user, then the
/// working directory, then `extra` (the `--config` flag) on top.
pub fn config_sources(extra: Option<&Path>) -> Vec<ConfigSource> {
    let mut discovered = vec![PathBuf::from("/etc/cortex/config.toml")];
    discovered.extend(dirs::home_dir().map(|home| home.join(".config/cortex/config.toml")));
    discovered.extend(dirs::config_dir().map(|dir| dir.join("cortex/config.toml")));
    discovered.push(PathBuf::from(".cortex/config.toml"));
    discovered.push(PathBuf::from("cortex.toml"));

    let mut sources: Vec<ConfigSource> = discovered.into_iter().map(ConfigSource::Discovered).collect();
    sources.extend(extra.map(|p| ConfigSource::Explicit(p.to_path_buf())));
    sources
}

/// Load the effective configuration from every discovered layer plus the
/// optional explicit path.
pub fn load(extra: Option<&Path>) -> anyhow::Result<Config> {
    load_from(&config_sources(extra))
}

/// Merge `sources` in order (later keys win) and convert to [`Config`].
/// Keys absent from every layer keep their defaults; a value of the wrong
/// type is an error rather than silently replaced.
pub fn load_from(sources: &[ConfigSource]) -> anyhow::Result<Config> {
    let mut merged = toml::Table::new();

    for source in sources {
        if let ConfigSource::Discovered(path) = source {
            if !path.is_file() {
                continue;
            }
        }
        debug!(path = %source.path().display(), "loading config layer");
        merge_tables(&mut merged, read_layer(source.path())?);
    }

    let config: Config = toml::Value::Table(merged)
        .try_into()
        .context("config does not match the expected schema")?;
    config.validate()?;
    Ok(config)
}

fn read_layer(path: &Path) -> anyhow::Result<toml::Table> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    text.parse::<toml::Table>().with_context(|| format!("parsing {}", path.display()))
}

/// Overlay `layer` onto `base`.  Nested tables merge key by key; any other
/// value from `layer` replaces the one in `base`.
fn merge_tables(base: &mut toml::Table, layer: toml::Table) {
    for (key, value) in layer {
        let toml::Value::Table(nested) = value else {
            base.insert(key, value);
            continue;
        };
        if let Some(toml::Value::Table(existing)) = base.get_mut(&key) {
            merge_tables(existing, nested);
        } else {
            base.insert(key, toml::Value::Table(nested));
        }
    }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn table(s: &str) -> toml::Table {
        s.parse().unwrap()
    }

    fn layer(text: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, "{text}").unwrap();
        f
    }

    // ── Merging ───────────────────────────────────────────────────────────────

    #[test]
    fn later_scalar_wins() {
        let mut dst = table("x = 1");
        merge_tables(&mut dst, table("x = 2"));
        assert_eq!(dst["x"].as_integer(), Some(2));
    }

    #[test]
    fn merge_nested_tables_keeps_untouched_keys() {
        let mut dst = table("[chat]\nplaceholder_title = \"Untitled\"\nmax_conversations = 10");
        merge_tables(&mut dst, table("[chat]\nmax_conversations = 20"));
        assert_eq!(dst["chat"]["placeholder_title"].as_str(), Some("Untitled"));
        assert_eq!(dst["chat"]["max_conversations"].as_integer(), Some(20));
    }

    // ── Sources ───────────────────────────────────────────────────────────────

    #[test]
    fn explicit_source_comes_last() {
        let sources = config_sources(Some(Path::new("custom.toml")));
        assert_eq!(sources.first(), Some(&ConfigSource::Discovered(PathBuf::from("/etc/cortex/config.toml"))));
        assert_eq!(sources.last(), Some(&ConfigSource::Explicit(PathBuf::from("custom.toml"))));
        assert_eq!(config_sources(None).len() + 1, sources.len());
    }

    #[test]
    fn missing_discovered_layer_is_skipped() {
        let sources = [ConfigSource::Discovered(PathBuf::from("/tmp/cortex_absent_layer_xyz.toml"))];
        assert_eq!(load_from(&sources).unwrap(), Config::default());
    }

    #[test]
    fn higher_layer_overrides_lower() {
        let low = layer("[chat]\nmax_conversations = 10\ntyping_delay_ms = 1");
        let high = layer("[chat]\nmax_conversations = 20");
        let sources = [
            ConfigSource::Discovered(low.path().to_path_buf()),
            ConfigSource::Explicit(high.path().to_path_buf()),
        ];
        let cfg = load_from(&sources).unwrap();
        assert_eq!(cfg.chat.max_conversations, 20);
        assert_eq!(cfg.chat.typing_delay_ms, 1);
    }

    // ── Loading ───────────────────────────────────────────────────────────────

    #[test]
    fn load_fails_for_missing_explicit_path() {
        let result = load(Some(Path::new("/tmp/cortex_nonexistent_config_xyz.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn load_explicit_file_overrides_defaults() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "[title]\nmax_len = 50\n\n[chat]\ntyping_delay_ms = 0").unwrap();
        let cfg = load(Some(f.path())).unwrap();
        assert_eq!(cfg.title.max_len, 50);
        assert_eq!(cfg.chat.typing_delay_ms, 0);
        assert_eq!(cfg.responder.summary_limit, 90);
    }

    #[test]
    fn load_rejects_wrong_value_type() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "[title]\nmax_len = \"long\"").unwrap();
        assert!(load(Some(f.path())).is_err());
    }

    #[test]
    fn load_rejects_out_of_range_limit() {
        let f = layer("[responder]\nsummary_limit = 1");
        let err = load(Some(f.path())).unwrap_err();
        assert!(err.to_string().contains("summary_limit"));
    }

    #[test]
    fn load_rejects_malformed_toml() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "[title\nmax_len = 1").unwrap();
        let err = load(Some(f.path())).unwrap_err();
        assert!(format!("{err:#}").contains("parsing"));
    }
}
