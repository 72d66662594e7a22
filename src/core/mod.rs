pub mod json;
pub mod normalize;
pub mod outcome;
pub mod output;
pub mod provision;

pub use json::{from_json, from_json_file, to_json, to_json_pretty};
pub use normalize::{
    normalize_path, normalize_separators, NormalizedPath, PathError, SeparatorNormalizer,
};
pub use outcome::{FailureKind, Outcome, Status};
pub use output::write_rendered;
pub use provision::{EntryKind, Provisioner, RemovePolicy};
