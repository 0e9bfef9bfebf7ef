//! # gridmerge-core
//!
//! Merges a Space Engineers programmable block script that is developed as
//! multiple `.cs` fragment files into the single source text the in-game
//! code editor accepts.
//!
//! Each fragment is a complete, IDE-friendly C# file: `using` directives,
//! a `namespace` wrapper and one or more classes. The merge keeps the code
//! of every fragment, strips the wrapper boilerplate, normalizes the
//! indentation and emits the fragment holding the `MyGridProgram`-derived
//! entry class last, so the result compiles inside the programmable block.
//!
//! Classification is purely lexical — a line-based scan with a single
//! regular expression standing in for real C# parsing. See [`fragment`]
//! for the classifier and [`merge`] for the orchestration.
//!
//! ```no_run
//! use gridmerge_core::MergeSet;
//!
//! let merge_set = MergeSet::build(std::path::Path::new("."))?;
//! print!("{}", merge_set.render(false));
//! # Ok::<(), gridmerge_core::MergeError>(())
//! ```

pub mod error;
pub mod fragment;
pub mod merge;

pub use error::MergeError;
pub use fragment::Fragment;
pub use merge::{MergeSet, OUTPUT_FILENAME};
