//! Folder discovery and merge orchestration.
//!
//! Wrapper stripping relies on the fixed shape the script skeleton gives
//! every fragment: non-entry fragments open with a `namespace` line plus its
//! brace and close with one brace, the entry fragment nests one level deeper
//! because its wrapper also holds the grid program class declaration.
//! Fragments whose wrapper deviates from that shape produce undefined
//! output, same as the fixed-index slicing this replaces.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::MergeError;
use crate::fragment::{strip_blank_edges, Fragment};

/// Reserved output file name; excluded from discovery.
pub const OUTPUT_FILENAME: &str = "Program-for-code-editor.cs";

const FRAGMENT_EXTENSION: &str = ".cs";

/// Wrapper lines dropped from a non-entry fragment: `namespace X` and `{`
/// at the front, the closing `}` at the back.
const WRAPPER_HEAD: usize = 2;
const WRAPPER_TAIL: usize = 1;

/// Wrapper lines dropped from the entry fragment, which additionally nests
/// the grid program class declaration and its braces.
const ENTRY_WRAPPER_HEAD: usize = 4;
const ENTRY_WRAPPER_TAIL: usize = 2;

/// The working state of one merge run: the valid fragments in emission
/// order, the entry fragment and the deduplicated using directives.
#[derive(Debug)]
pub struct MergeSet {
    folder: PathBuf,
    fragments: Vec<Fragment>,
    entry_index: usize,
    using_namespaces: BTreeSet<String>,
    type_aliases: BTreeSet<String>,
}

impl MergeSet {
    /// Discover, read and validate all fragments in `folder`.
    ///
    /// Read-only over the folder; all validation happens here, before any
    /// output is written. Fails when no valid fragment exists or when the
    /// number of entry fragments is not exactly one.
    pub fn build(folder: &Path) -> Result<Self, MergeError> {
        let paths = discover(folder)?;

        let mut fragments = Vec::with_capacity(paths.len());
        for path in paths {
            let fragment = Fragment::read(&path)?;
            if fragment.is_valid() {
                tracing::debug!(
                    path = %fragment.path.display(),
                    namespace = %fragment.namespace,
                    entry = fragment.is_entry,
                    "classified fragment"
                );
                fragments.push(fragment);
            } else {
                tracing::debug!(path = %path.display(), "skipping disabled or empty fragment");
            }
        }

        if fragments.is_empty() {
            return Err(MergeError::NoValidSources {
                folder: folder.to_path_buf(),
            });
        }

        let entries: Vec<usize> = fragments
            .iter()
            .enumerate()
            .filter(|(_, fragment)| fragment.is_entry)
            .map(|(index, _)| index)
            .collect();
        let entry_index = match entries.as_slice() {
            [index] => *index,
            found => return Err(MergeError::EntryCount { found: found.len() }),
        };

        let mut using_namespaces = BTreeSet::new();
        let mut type_aliases = BTreeSet::new();
        for fragment in &fragments {
            for line in &fragment.using_lines {
                if line.contains('=') {
                    type_aliases.insert(line.clone());
                } else {
                    using_namespaces.insert(line.clone());
                }
            }
        }

        Ok(Self {
            folder: folder.to_path_buf(),
            fragments,
            entry_index,
            using_namespaces,
            type_aliases,
        })
    }

    /// Produce the merged program text: optional using sections, then every
    /// non-entry fragment in discovery order, then the entry fragment.
    pub fn render(&self, emit_usings: bool) -> String {
        let mut out = String::new();

        if emit_usings {
            for line in &self.using_namespaces {
                out.push_str(line);
                out.push('\n');
            }
            if !self.using_namespaces.is_empty() {
                out.push('\n');
            }

            for line in &self.type_aliases {
                out.push_str(line);
                out.push('\n');
            }
            if !self.type_aliases.is_empty() {
                out.push('\n');
            }
        }

        for (index, fragment) in self.fragments.iter().enumerate() {
            if index == self.entry_index {
                continue;
            }
            for line in unwrap_body(&fragment.code_lines, WRAPPER_HEAD, WRAPPER_TAIL) {
                out.push_str(&line);
                out.push('\n');
            }
            out.push('\n');
        }

        let entry = &self.fragments[self.entry_index];
        for line in unwrap_body(&entry.code_lines, ENTRY_WRAPPER_HEAD, ENTRY_WRAPPER_TAIL) {
            out.push_str(&line);
            out.push('\n');
        }

        out
    }

    /// Render and write the merged program, overwriting `output`.
    pub fn write(&self, output: &Path, emit_usings: bool) -> Result<(), MergeError> {
        let text = self.render(emit_usings);
        fs::write(output, text).map_err(|source| MergeError::Io {
            path: output.to_path_buf(),
            source,
        })?;
        tracing::info!(
            folder = %self.folder.display(),
            fragments = self.fragments.len(),
            output = %output.display(),
            "merged program written"
        );
        Ok(())
    }

    /// The valid fragments in discovery order.
    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// The single fragment declaring the `MyGridProgram`-derived class.
    pub fn entry(&self) -> &Fragment {
        &self.fragments[self.entry_index]
    }

    /// Deduplicated plain using directives (no alias assignment).
    pub fn using_namespaces(&self) -> &BTreeSet<String> {
        &self.using_namespaces
    }

    /// Deduplicated alias-assignment using directives.
    pub fn type_aliases(&self) -> &BTreeSet<String> {
        &self.type_aliases
    }
}

/// List the candidate fragment files in `folder`, sorted lexicographically
/// by file name. The sort order fixes the non-entry emission order.
fn discover(folder: &Path) -> Result<Vec<PathBuf>, MergeError> {
    let entries = fs::read_dir(folder).map_err(|source| MergeError::Io {
        path: folder.to_path_buf(),
        source,
    })?;

    let mut names: Vec<String> = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| MergeError::Io {
            path: folder.to_path_buf(),
            source,
        })?;
        let Some(name) = entry.file_name().to_str().map(|name| name.to_string()) else {
            continue;
        };
        if name.ends_with(FRAGMENT_EXTENSION) && name != OUTPUT_FILENAME {
            names.push(name);
        }
    }
    names.sort();

    Ok(names.into_iter().map(|name| folder.join(name)).collect())
}

/// Strip the fixed wrapper from a fragment body, the blank edges that
/// exposes, and the common indentation of what remains. Bodies shorter
/// than the wrapper render as empty.
fn unwrap_body(code_lines: &[String], head: usize, tail: usize) -> Vec<String> {
    if code_lines.len() <= head + tail {
        return Vec::new();
    }
    let mut lines: Vec<String> = code_lines[head..code_lines.len() - tail].to_vec();
    strip_blank_edges(&mut lines);
    remove_indentation(&mut lines);
    lines
}

/// Remove the minimum leading-whitespace width of the non-blank lines from
/// every line. Blank lines clamp to empty rather than going negative.
fn remove_indentation(lines: &mut [String]) {
    let indent = lines
        .iter()
        .filter(|line| !line.trim_start().is_empty())
        .map(|line| leading_width(line))
        .min()
        .unwrap_or(0);
    if indent == 0 {
        return;
    }
    for line in lines.iter_mut() {
        *line = line.chars().skip(indent).collect();
    }
}

fn leading_width(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}
