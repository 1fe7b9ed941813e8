pub mod index;
pub mod load;
pub mod record;

pub use index::Index;
pub use load::{LoadError, REQUIRED_COLUMNS};
pub use record::{OfficeEntry, Record};

/// Load the dataset at `path` into a fresh [`Index`].
pub fn load_index(path: impl AsRef<std::path::Path>) -> Result<Index, LoadError> {
    Index::load(path)
}
