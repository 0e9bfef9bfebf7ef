//! Reading and classifying a single script fragment.
//!
//! Classification is line-based: each right-trimmed line is either a `using`
//! directive, a `namespace` declaration or ordinary code. The entry fragment
//! is recognized by a single-line regular expression standing in for real C#
//! parsing; keeping that heuristic isolated here lets it be swapped for a
//! proper parser later without touching the merge orchestration.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::error::MergeError;

/// First-line sentinel that excludes a fragment from merging entirely.
const DISABLE_SENTINEL: &str = "#if false";

const USING_PREFIX: &str = "using ";
const NAMESPACE_PREFIX: &str = "namespace ";

/// Matches the declaration of a class inherited from `MyGridProgram`,
/// which marks the entry fragment of the program.
static ENTRY_CLASS_RX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"class\s+[_a-zA-Z]+\s*:\s*MyGridProgram").expect("valid entry class regex")
});

/// One fragment file after classification. Immutable once constructed.
#[derive(Debug, Clone)]
pub struct Fragment {
    /// The originating file.
    pub path: PathBuf,
    /// Raw `using` directive lines, in encounter order.
    pub using_lines: Vec<String>,
    /// All other lines, right-trimmed, with blank edges stripped.
    pub code_lines: Vec<String>,
    /// True if any code line declares a `MyGridProgram`-derived class.
    pub is_entry: bool,
    /// The first `namespace` declaration's value, or empty.
    pub namespace: String,
}

impl Fragment {
    /// Read and classify one fragment file. A leading UTF-8 byte order mark
    /// is stripped transparently; only the file read itself can fail.
    pub fn read(path: &Path) -> Result<Self, MergeError> {
        let raw = fs::read_to_string(path).map_err(|source| MergeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let text = raw.strip_prefix('\u{feff}').unwrap_or(&raw);
        Ok(Self::from_text(path, text))
    }

    /// Classify fragment content that is already in memory.
    pub fn from_text(path: &Path, text: &str) -> Self {
        let mut using_lines = Vec::new();
        let mut code_lines: Vec<String> = Vec::new();
        let mut namespace = String::new();
        let mut is_entry = false;

        for raw in text.lines() {
            let line = raw.trim_end();
            let stripped = line.trim_start();

            if stripped.starts_with(USING_PREFIX) {
                using_lines.push(line.to_string());
                continue;
            }

            code_lines.push(line.to_string());

            // A namespace line is never an entry-class candidate.
            if let Some(value) = stripped.strip_prefix(NAMESPACE_PREFIX) {
                if namespace.is_empty() {
                    namespace = value.trim().to_string();
                }
                continue;
            }

            if ENTRY_CLASS_RX.is_match(line) {
                is_entry = true;
            }
        }

        strip_blank_edges(&mut code_lines);

        Self {
            path: path.to_path_buf(),
            using_lines,
            code_lines,
            is_entry,
            namespace,
        }
    }

    /// A fragment takes part in the merge only if it has code and is not
    /// explicitly disabled by an `#if false` on its first code line.
    pub fn is_valid(&self) -> bool {
        match self.code_lines.first() {
            Some(first) => first.trim_start() != DISABLE_SENTINEL,
            None => false,
        }
    }
}

/// Drop blank lines from both ends of the list.
pub(crate) fn strip_blank_edges(lines: &mut Vec<String>) {
    while lines.last().is_some_and(|line| line.trim().is_empty()) {
        lines.pop();
    }
    let keep = lines
        .iter()
        .position(|line| !line.trim().is_empty())
        .unwrap_or(0);
    lines.drain(..keep);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragment(text: &str) -> Fragment {
        Fragment::from_text(Path::new("Test.cs"), text)
    }

    #[test]
    fn splits_usings_from_code() {
        let frag = fragment(
            "using System;\n\
             using System.Text;\n\
             \n\
             namespace Demo\n\
             {\n\
             }\n",
        );
        assert_eq!(frag.using_lines, vec!["using System;", "using System.Text;"]);
        assert_eq!(frag.code_lines, vec!["namespace Demo", "{", "}"]);
    }

    #[test]
    fn records_first_namespace_only() {
        let frag = fragment("namespace First.Ns\n{\n}\nnamespace Second.Ns\n{\n}\n");
        assert_eq!(frag.namespace, "First.Ns");
    }

    #[test]
    fn detects_entry_class() {
        let frag = fragment("namespace Demo\n{\n    class Program : MyGridProgram\n    {\n    }\n}\n");
        assert!(frag.is_entry);
    }

    #[test]
    fn entry_detection_allows_missing_space_before_colon() {
        let frag = fragment("    public class Program: MyGridProgram\n");
        assert!(frag.is_entry);
    }

    #[test]
    fn namespace_lines_are_not_entry_candidates() {
        let frag = fragment("namespace Demo // class Foo : MyGridProgram\n{\n}\n");
        assert!(!frag.is_entry);
    }

    #[test]
    fn other_base_classes_are_not_entries() {
        let frag = fragment("    public class Program : SpaceEngineersProgram\n");
        assert!(!frag.is_entry);
    }

    #[test]
    fn trims_blank_edges_but_keeps_interior_blanks() {
        let frag = fragment("\n\n    int a;\n\n    int b;\n\n");
        assert_eq!(frag.code_lines, vec!["    int a;", "", "    int b;"]);
    }

    #[test]
    fn right_trims_but_preserves_indentation() {
        let frag = fragment("    int a;   \n");
        assert_eq!(frag.code_lines, vec!["    int a;"]);
    }

    #[test]
    fn empty_fragment_is_invalid() {
        assert!(!fragment("").is_valid());
        assert!(!fragment("\n\n   \n").is_valid());
    }

    #[test]
    fn disabled_fragment_is_invalid() {
        let frag = fragment("#if false\nnamespace Demo\n{\n}\n#endif\n");
        assert!(!frag.is_valid());
    }

    #[test]
    fn disable_sentinel_must_be_first_code_line() {
        let frag = fragment("using System;\n\n#if false\nnamespace Demo\n{\n}\n#endif\n");
        assert!(!frag.is_valid());
        let frag = fragment("namespace Demo\n#if false\n{\n}\n#endif\n");
        assert!(frag.is_valid());
    }

    #[test]
    fn reads_file_with_byte_order_mark() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Bom.cs");
        std::fs::write(&path, "\u{feff}using System;\nnamespace Demo\n{\n}\n").unwrap();
        let frag = Fragment::read(&path).unwrap();
        assert_eq!(frag.using_lines, vec!["using System;"]);
        assert_eq!(frag.code_lines[0], "namespace Demo");
    }

    #[test]
    fn missing_file_reports_path() {
        let err = Fragment::read(Path::new("/nonexistent/Missing.cs")).unwrap_err();
        assert!(err.to_string().contains("Missing.cs"));
    }
}
