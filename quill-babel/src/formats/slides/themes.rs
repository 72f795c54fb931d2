//! Slideshow theme lookup and installation.
//!
//! A theme is a directory of CSS, script and image files named after the
//! theme and found in one of the configured theme directories. A theme may
//! build on another one by naming it in a `__base__` file; files are
//! collected from the theme, then its bases, and finally the `default` theme,
//! with earlier themes taking precedence.

use crate::error::FormatError;
use log::debug;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_THEME: &str = "default";
pub const BASE_THEME_FILE: &str = "__base__";

/// Files linked directly from the slideshow page.
pub const DIRECT_THEME_FILES: [&str; 5] = [
    "slides.css",
    "outline.css",
    "print.css",
    "opera.css",
    "slides.js",
];

/// Files imported or referenced by the directly linked ones.
pub const INDIRECT_THEME_FILES: [&str; 5] = [
    "s5-core.css",
    "framing.css",
    "pretty.css",
    "blank.gif",
    "iepngfix.htc",
];

/// Every file a theme chain must provide, in reporting order.
pub fn required_theme_files() -> impl Iterator<Item = &'static str> {
    INDIRECT_THEME_FILES
        .into_iter()
        .chain(DIRECT_THEME_FILES)
}

/// Locates themes in an ordered list of search directories.
pub struct ThemeResolver<'a> {
    search_dirs: &'a [PathBuf],
}

impl<'a> ThemeResolver<'a> {
    pub fn new(search_dirs: &'a [PathBuf]) -> Self {
        Self { search_dirs }
    }

    /// Canonical directory of the theme called `name`.
    pub fn find(&self, name: &str) -> Result<PathBuf, FormatError> {
        self.search_dirs
            .iter()
            .map(|dir| dir.join(name))
            .find(|candidate| candidate.is_dir())
            .map(|dir| fs::canonicalize(&dir).unwrap_or(dir))
            .ok_or_else(|| FormatError::ThemeNotFound(name.to_string()))
    }

    /// Resolve `name` and its bases into an ordered chain of directories.
    ///
    /// A missing or empty `__base__` file, or a base already in the chain,
    /// makes the chain continue with the default theme, which always ends it.
    pub fn resolve(&self, name: &str) -> Result<ThemeChain, FormatError> {
        let mut dirs = vec![self.find(name)?];
        let mut current = name.to_string();

        while current != DEFAULT_THEME {
            let Some(last) = dirs.last() else { break };
            let base = read_base_theme(last);
            let next = match base {
                Some(base) => {
                    let dir = self.find(&base)?;
                    if dirs.contains(&dir) {
                        debug!("theme '{base}' already in chain, falling back to '{DEFAULT_THEME}'");
                        None
                    } else {
                        Some((base, dir))
                    }
                }
                None => None,
            };
            let (next_name, next_dir) = match next {
                Some(found) => found,
                None => match self.find(DEFAULT_THEME) {
                    Ok(dir) if !dirs.contains(&dir) => (DEFAULT_THEME.to_string(), dir),
                    Ok(_) => break,
                    Err(_) => {
                        debug!("no '{DEFAULT_THEME}' theme in the search path; chain ends at '{current}'");
                        break;
                    }
                },
            };
            debug!("theme '{current}' is based on '{next_name}'");
            dirs.push(next_dir);
            current = next_name;
        }

        Ok(ThemeChain {
            name: name.to_string(),
            dirs,
        })
    }
}

/// First non-empty, non-comment line of a theme's `__base__` file.
fn read_base_theme(dir: &Path) -> Option<String> {
    let content = fs::read_to_string(dir.join(BASE_THEME_FILE)).ok()?;
    content
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
}

/// The directories making up a theme, most specific first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeChain {
    pub name: String,
    pub dirs: Vec<PathBuf>,
}

/// What [`ThemeChain::install`] did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThemeInstall {
    /// Destination files written in this run.
    pub copied: Vec<PathBuf>,
    /// Files the output depends on: copied sources and existing destination
    /// files that were left untouched.
    pub dependencies: Vec<PathBuf>,
}

impl ThemeChain {
    /// Fail with every required file no directory of the chain provides.
    pub fn verify(&self) -> Result<(), FormatError> {
        let missing: Vec<String> = required_theme_files()
            .filter(|file| !self.dirs.iter().any(|dir| dir.join(file).is_file()))
            .map(str::to_string)
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(FormatError::MissingThemeFiles(missing))
        }
    }

    /// Copy the chain's files into `destination`.
    ///
    /// Each destination file is written at most once, from the first theme in
    /// the chain that has it. References to `ui/default` inside the files are
    /// rewritten to point at this theme.
    pub fn install(&self, destination: &Path, overwrite: bool) -> Result<ThemeInstall, FormatError> {
        self.verify()?;
        fs::create_dir_all(destination).map_err(|e| FormatError::io(destination, e))?;

        let replacement = format!("ui/{}", self.name);
        let mut handled = HashSet::new();
        let mut result = ThemeInstall::default();

        for dir in &self.dirs {
            let mut files: Vec<PathBuf> = fs::read_dir(dir)
                .map_err(|e| FormatError::io(dir, e))?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|path| path.is_file())
                .collect();
            files.sort();

            for source in files {
                let Some(file_name) = source.file_name() else {
                    continue;
                };
                if file_name == BASE_THEME_FILE {
                    continue;
                }
                let dest = destination.join(file_name);
                if !handled.insert(dest.clone()) {
                    continue;
                }
                if dest.exists() && !overwrite {
                    debug!("keeping existing theme file {}", dest.display());
                    result.dependencies.push(dest);
                    continue;
                }
                let data = fs::read(&source).map_err(|e| FormatError::io(&source, e))?;
                let data = replace_bytes(&data, b"ui/default", replacement.as_bytes());
                fs::write(&dest, data).map_err(|e| FormatError::io(&dest, e))?;
                debug!("copied {} to {}", source.display(), dest.display());
                result.dependencies.push(source);
                result.copied.push(dest);
            }
        }
        Ok(result)
    }
}

fn replace_bytes(data: &[u8], from: &[u8], to: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len());
    let mut i = 0;
    while i < data.len() {
        if data[i..].starts_with(from) {
            out.extend_from_slice(to);
            i += from.len();
        } else {
            out.push(data[i]);
            i += 1;
        }
    }
    out
}
