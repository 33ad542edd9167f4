//! Input collection for the command line
//!
//! Walks files and directories (respecting `.gitignore`), filters them by
//! glob, reads them in parallel and splits them into the strings that get
//! added to the tree. Strings keep their origin so results can point back
//! at a file and line.

use crate::tree::GeneralizedSuffixTree;
use crate::utils::is_binary;
use crate::utils::progress::adding_bar;
use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use log::{debug, warn};
use memmap2::Mmap;
use rayon::prelude::*;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// How file content is split into strings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// One string per non-empty line
    #[default]
    Lines,
    /// One string per file
    Files,
}

/// Where an added string came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    pub path: PathBuf,
    /// 1-based line number in `Lines` mode
    pub line: Option<usize>,
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}:{}", self.path.display(), line),
            None => write!(f, "{}", self.path.display()),
        }
    }
}

/// A string read from input, not yet added
#[derive(Debug, Clone)]
pub struct InputString {
    pub origin: Origin,
    pub text: String,
}

/// Expand `inputs` into a sorted list of files
///
/// Directories are walked with gitignore rules; `globs` (if any) must match
/// a file's path for it to be kept. Explicitly named files are always kept.
pub fn collect_paths(inputs: &[PathBuf], globs: &[String]) -> Result<Vec<PathBuf>> {
    let filter = build_globset(globs)?;
    let mut paths = Vec::new();

    for input in inputs {
        if input.is_file() {
            paths.push(input.clone());
            continue;
        }
        if !input.is_dir() {
            anyhow::bail!("No such file or directory: {}", input.display());
        }

        let walker = WalkBuilder::new(input)
            .hidden(true)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .filter_entry(|entry| entry.file_name() != ".git")
            .build();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!("{}", err);
                    continue;
                }
            };
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if let Some(filter) = &filter {
                let rel = path.strip_prefix(input).unwrap_or(path);
                if !filter.is_match(rel) && !filter.is_match(path) {
                    continue;
                }
            }
            paths.push(path.to_path_buf());
        }
    }

    paths.sort();
    paths.dedup();
    debug!("collected {} input files", paths.len());
    Ok(paths)
}

fn build_globset(globs: &[String]) -> Result<Option<GlobSet>> {
    if globs.is_empty() {
        return Ok(None);
    }

    let mut builder = GlobSetBuilder::new();
    for glob in globs {
        builder.add(Glob::new(glob).with_context(|| format!("Invalid glob: {}", glob))?);
    }
    Ok(Some(builder.build().context("Failed to build glob set")?))
}

/// Read every file in parallel and split it per `mode`
///
/// Output keeps the order of `paths`. Binary and non-UTF-8 files are
/// skipped with a warning.
pub fn read_strings(paths: &[PathBuf], mode: InputMode) -> Result<Vec<InputString>> {
    let per_file: Vec<Result<Vec<InputString>>> = paths
        .par_iter()
        .map(|path| read_file(path, mode))
        .collect();

    let mut strings = Vec::new();
    for file in per_file {
        strings.extend(file?);
    }
    Ok(strings)
}

/// Read strings from standard input, one per line
pub fn read_stdin(mode: InputMode) -> Result<Vec<InputString>> {
    let mut content = Vec::new();
    std::io::stdin()
        .read_to_end(&mut content)
        .context("Failed to read standard input")?;
    Ok(split_content(Path::new("<stdin>"), &content, mode).unwrap_or_default())
}

fn read_file(path: &Path, mode: InputMode) -> Result<Vec<InputString>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let len = file
        .metadata()
        .with_context(|| format!("Failed to stat {}", path.display()))?
        .len();
    if len == 0 {
        return Ok(Vec::new());
    }

    let mmap = unsafe { Mmap::map(&file) }
        .with_context(|| format!("Failed to map {}", path.display()))?;
    Ok(split_content(path, &mmap, mode).unwrap_or_default())
}

/// Split raw content into strings, `None` if it is not usable text
fn split_content(path: &Path, content: &[u8], mode: InputMode) -> Option<Vec<InputString>> {
    if is_binary(content) {
        warn!("skipping binary file {}", path.display());
        return None;
    }
    let Ok(text) = std::str::from_utf8(content) else {
        warn!("skipping {}: not valid UTF-8", path.display());
        return None;
    };

    let strings = match mode {
        InputMode::Files => vec![InputString {
            origin: Origin {
                path: path.to_path_buf(),
                line: None,
            },
            text: text.to_string(),
        }],
        InputMode::Lines => {
            let mut strings = Vec::new();
            let mut start = 0;
            let ends = memchr::memchr_iter(b'\n', content).chain(std::iter::once(content.len()));
            for (line, end) in ends.enumerate() {
                if start > end {
                    break;
                }
                let raw = &text[start..end];
                let raw = raw.strip_suffix('\r').unwrap_or(raw);
                if !raw.is_empty() {
                    strings.push(InputString {
                        origin: Origin {
                            path: path.to_path_buf(),
                            line: Some(line + 1),
                        },
                        text: raw.to_string(),
                    });
                }
                start = end + 1;
            }
            strings
        }
    };
    Some(strings)
}

/// Add every string to `tree` in order, returning the origin of each
/// source index
///
/// Rejected strings are skipped with a warning and get no source index.
pub fn add_all(
    tree: &mut GeneralizedSuffixTree,
    strings: Vec<InputString>,
    progress: bool,
) -> Vec<Origin> {
    let bar = adding_bar(strings.len(), progress);
    let mut origins = Vec::with_capacity(strings.len());

    for input in strings {
        let before = tree.len();
        match tree.add(&input.text) {
            Ok(()) if tree.len() > before => origins.push(input.origin),
            Ok(()) => {}
            Err(err) => warn!("skipping {}: {}", input.origin, err),
        }
        if let Some(bar) = &bar {
            bar.inc(1);
        }
    }

    if let Some(bar) = bar {
        bar.finish_with_message(format!("Added {} strings", origins.len()));
    }
    origins
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{TerminatorPolicy, TreeConfig};
    use std::fs;

    #[test]
    fn test_split_lines() {
        let strings = split_content(Path::new("a.txt"), b"one\r\n\ntwo\nthree", InputMode::Lines)
            .unwrap();
        let texts: Vec<&str> = strings.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["one", "two", "three"]);
        assert_eq!(strings[1].origin.line, Some(3));
        assert_eq!(strings[2].origin.to_string(), "a.txt:4");
    }

    #[test]
    fn test_split_files() {
        let strings = split_content(Path::new("a.txt"), b"one\ntwo\n", InputMode::Files).unwrap();
        assert_eq!(strings.len(), 1);
        assert_eq!(strings[0].text, "one\ntwo\n");
        assert_eq!(strings[0].origin.to_string(), "a.txt");
    }

    #[test]
    fn test_split_rejects_binary_and_invalid_utf8() {
        assert!(split_content(Path::new("bin"), b"ab\0cd", InputMode::Lines).is_none());
        assert!(split_content(Path::new("bad"), &[b'a', 0xff, b'b'], InputMode::Lines).is_none());
    }

    #[test]
    fn test_collect_and_read() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.txt"), "banana\n").unwrap();
        fs::write(dir.path().join("a.txt"), "apple\navocado\n").unwrap();
        fs::write(dir.path().join("c.md"), "cherry\n").unwrap();
        fs::write(dir.path().join("empty.txt"), "").unwrap();

        let inputs = vec![dir.path().to_path_buf()];
        let all = collect_paths(&inputs, &[]).unwrap();
        assert_eq!(all.len(), 4);

        let txt = collect_paths(&inputs, &["*.txt".to_string()]).unwrap();
        assert_eq!(txt.len(), 3);

        let strings = read_strings(&txt, InputMode::Lines).unwrap();
        let texts: Vec<&str> = strings.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["apple", "avocado", "banana"]);
    }

    #[test]
    fn test_collect_missing_path() {
        let missing = vec![PathBuf::from("/definitely/not/here")];
        assert!(collect_paths(&missing, &[]).is_err());
    }

    #[test]
    fn test_add_all_tracks_origins() {
        let mut tree = GeneralizedSuffixTree::with_config(TreeConfig {
            terminator_policy: TerminatorPolicy::Reject,
            ..Default::default()
        });
        let origin = |line| Origin {
            path: PathBuf::from("x"),
            line: Some(line),
        };
        let strings = vec![
            InputString { origin: origin(1), text: "abc".into() },
            InputString { origin: origin(2), text: "xbc".into() },
            InputString { origin: origin(3), text: "xyz".into() },
        ];

        let origins = add_all(&mut tree, strings, false);
        assert_eq!(origins, vec![origin(1), origin(3)]);
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.string(1).as_deref(), Some("xyz"));
    }
}
