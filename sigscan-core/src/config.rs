//! Configuration file support for Sigscan
//!
//! Loads project-specific configuration from JSON files.
//!
//! Search order:
//! 1. Explicit path (--config CLI flag)
//! 2. `.sigscanrc.json` in the project root
//! 3. `sigscan.config.json` in the project root
//!
//! All fields are optional. CLI flags take precedence over config file values.

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default exclude patterns applied when no config is specified
const DEFAULT_EXCLUDES: &[&str] = &[
    "**/__pycache__/**",
    "**/.venv/**",
    "**/venv/**",
    "**/node_modules/**",
    "**/dist/**",
    "**/build/**",
];

/// Sigscan configuration loaded from a JSON config file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SigscanConfig {
    /// Glob patterns for scripts to include (default: every Python file)
    #[serde(default)]
    pub include: Vec<String>,

    /// Glob patterns for scripts to exclude (default: caches and vendored dirs)
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Whether to attach metadata headers to reports (default: true)
    #[serde(default)]
    pub headers: Option<bool>,
}

/// Resolved configuration with compiled glob patterns
#[derive(Debug)]
pub struct ResolvedConfig {
    /// Compiled include patterns (empty means include all)
    pub include: Option<GlobSet>,
    /// Compiled exclude patterns
    pub exclude: GlobSet,
    /// Whether to attach metadata headers to reports
    pub headers: bool,
    /// Path the config was loaded from (None if defaults)
    pub config_path: Option<PathBuf>,
}

impl SigscanConfig {
    /// Validate the configuration for logical errors
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.include {
            Glob::new(pattern).with_context(|| format!("invalid include pattern: {}", pattern))?;
        }
        for pattern in &self.exclude {
            Glob::new(pattern).with_context(|| format!("invalid exclude pattern: {}", pattern))?;
        }
        Ok(())
    }

    /// Resolve config into compiled form ready for use
    pub fn resolve(&self) -> Result<ResolvedConfig> {
        self.validate()?;

        // Compile include patterns
        let include = if self.include.is_empty() {
            None
        } else {
            let mut builder = GlobSetBuilder::new();
            for pattern in &self.include {
                builder.add(Glob::new(pattern)?);
            }
            Some(builder.build()?)
        };

        // Compile exclude patterns (fall back to defaults if user didn't specify any)
        let exclude = {
            let mut builder = GlobSetBuilder::new();
            if self.exclude.is_empty() {
                for pattern in DEFAULT_EXCLUDES {
                    builder.add(Glob::new(pattern)?);
                }
            } else {
                for pattern in &self.exclude {
                    builder.add(Glob::new(pattern)?);
                }
            }
            builder.build()?
        };

        Ok(ResolvedConfig {
            include,
            exclude,
            headers: self.headers.unwrap_or(true),
            config_path: None,
        })
    }
}

impl ResolvedConfig {
    /// Check whether a script path passes the include/exclude filters
    pub fn should_include(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();

        // Check exclude first
        if self.exclude.is_match(path_str.as_ref()) {
            return false;
        }

        // If include patterns exist, file must match at least one
        if let Some(ref include) = self.include {
            return include.is_match(path_str.as_ref());
        }

        true
    }

    /// Build a ResolvedConfig with all defaults (no config file)
    pub fn defaults() -> Result<Self> {
        SigscanConfig::default().resolve()
    }
}

/// Discover and load a config file from the project root
///
/// Returns `None` if no config file is found (use defaults).
pub fn discover_config(project_root: &Path) -> Result<Option<(SigscanConfig, PathBuf)>> {
    let rc_path = project_root.join(".sigscanrc.json");
    if rc_path.exists() {
        let config = load_config_file(&rc_path)?;
        return Ok(Some((config, rc_path)));
    }

    let config_path = project_root.join("sigscan.config.json");
    if config_path.exists() {
        let config = load_config_file(&config_path)?;
        return Ok(Some((config, config_path)));
    }

    Ok(None)
}

/// Load config from an explicit file path
pub fn load_config_file(path: &Path) -> Result<SigscanConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;

    let config: SigscanConfig = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse config file: {}", path.display()))?;

    config
        .validate()
        .with_context(|| format!("invalid config in: {}", path.display()))?;

    Ok(config)
}

/// Load and resolve configuration: explicit path, else discovery, else defaults
pub fn load_and_resolve(project_root: &Path, config_path: Option<&Path>) -> Result<ResolvedConfig> {
    let (config, source_path) = if let Some(path) = config_path {
        let config = load_config_file(path)?;
        (config, Some(path.to_path_buf()))
    } else {
        match discover_config(project_root)? {
            Some((config, path)) => (config, Some(path)),
            None => (SigscanConfig::default(), None),
        }
    };

    let mut resolved = config.resolve()?;
    resolved.config_path = source_path;
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_exclude_caches() {
        let resolved = ResolvedConfig::defaults().unwrap();
        assert!(!resolved.should_include(Path::new("scripts/__pycache__/jump.py")));
        assert!(!resolved.should_include(Path::new("venv/lib/thing.py")));
        assert!(resolved.should_include(Path::new("scripts/jump.py")));
        assert!(resolved.headers);
    }

    #[test]
    fn test_include_patterns_restrict() {
        let config = SigscanConfig {
            include: vec!["scripts/**/*.py".to_string()],
            ..Default::default()
        };
        let resolved = config.resolve().unwrap();
        assert!(resolved.should_include(Path::new("scripts/items/give.py")));
        assert!(!resolved.should_include(Path::new("tools/migrate.py")));
    }

    #[test]
    fn test_explicit_excludes_replace_defaults() {
        let config = SigscanConfig {
            exclude: vec!["**/legacy/**".to_string()],
            ..Default::default()
        };
        let resolved = config.resolve().unwrap();
        assert!(!resolved.should_include(Path::new("scripts/legacy/old.py")));
        // defaults are no longer in effect once the user supplies excludes
        assert!(resolved.should_include(Path::new("x/__pycache__/y.py")));
    }

    #[test]
    fn test_invalid_glob_is_rejected() {
        let config = SigscanConfig {
            include: vec!["scripts/[".to_string()],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_headers_flag() {
        let config: SigscanConfig = serde_json::from_str(r#"{"headers": false}"#).unwrap();
        let resolved = config.resolve().unwrap();
        assert!(!resolved.headers);
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let result: std::result::Result<SigscanConfig, _> =
            serde_json::from_str(r#"{"includes": []}"#);
        assert!(result.is_err());
    }
}
