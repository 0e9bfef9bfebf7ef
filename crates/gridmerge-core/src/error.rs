//! Error taxonomy for the merge pipeline.
//!
//! Both merge failures are fatal: validation happens before the write phase
//! begins, so a failed run never creates or modifies the output file.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MergeError {
    /// Discovery or validity filtering yielded zero usable fragments.
    #[error("no valid .cs source files found in {}", folder.display())]
    NoValidSources { folder: PathBuf },

    /// The number of fragments declaring a `MyGridProgram`-derived class
    /// is not exactly one.
    #[error(
        "exactly one source file must contain a class inherited from MyGridProgram ({})",
        if *found == 0 { "none found".to_string() } else { format!("found {found}") }
    )]
    EntryCount { found: usize },

    /// File or folder access failed; carries the offending path.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_count_message_distinguishes_none_from_multiple() {
        let none = MergeError::EntryCount { found: 0 }.to_string();
        let multiple = MergeError::EntryCount { found: 3 }.to_string();
        assert!(none.contains("none found"));
        assert!(multiple.contains("found 3"));
    }
}
