use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::{debug, info};

use crate::load::{load_records, LoadError};
use crate::record::{OfficeEntry, Record};

/// In-memory lookup structures over one loaded dataset.
///
/// An `Index` is built whole by [`Index::load`] (or [`Index::build`]) and is
/// immutable afterwards; a reload builds a fresh `Index` and replaces the old
/// binding, so a failed reload leaves the previous index untouched.
#[derive(Debug, Default)]
pub struct Index {
    by_code: HashMap<String, Record>,
    /// Keyed by the lowercased office name.
    by_office: HashMap<String, Record>,
    districts_by_state: HashMap<String, HashSet<String>>,
    offices_by_state_district: HashMap<(String, String), Vec<OfficeEntry>>,
}

impl Index {
    /// Load the CSV at `path` and build every mapping from it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let records = load_records(path)?;
        let total = records.len();
        let index = Self::build(records);
        info!(
            path = %path.display(),
            rows = total,
            codes = index.len(),
            states = index.districts_by_state.len(),
            "index built"
        );
        Ok(index)
    }

    /// Build the four mappings in one pass, in input order.
    ///
    /// Duplicate codes and duplicate office names both follow last-write-wins;
    /// the (state, district) office listing keeps every row, in order.
    pub fn build(records: impl IntoIterator<Item = Record>) -> Self {
        let mut index = Index::default();
        let mut overwritten = 0usize;

        for record in records {
            if let Some(prev) = index
                .by_code
                .insert(record.code.clone(), record.clone())
            {
                debug!(code = %record.code, prev_office = %prev.office_name, "duplicate code overwritten");
                overwritten += 1;
            }
            index
                .by_office
                .insert(record.office_name.to_lowercase(), record.clone());

            index
                .districts_by_state
                .entry(record.state.clone())
                .or_default()
                .insert(record.district.clone());

            index
                .offices_by_state_district
                .entry((record.state.clone(), record.district.clone()))
                .or_default()
                .push(OfficeEntry::from(&record));
        }

        if overwritten > 0 {
            debug!(overwritten, "duplicate codes replaced by later rows");
        }
        index
    }

    /// Exact-match lookup by postal code. Format validation (e.g. "must be
    /// 6 digits") belongs to the caller.
    pub fn find_by_code(&self, code: &str) -> Option<&Record> {
        self.by_code.get(code)
    }

    /// Case-insensitive lookup by office name.
    pub fn find_by_office_name(&self, name: &str) -> Option<&Record> {
        self.by_office.get(&name.to_lowercase())
    }

    /// Distinct district names of `state`, in no particular order. Empty for
    /// an unknown state.
    pub fn list_districts<'a>(&'a self, state: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.districts_by_state
            .get(state)
            .into_iter()
            .flatten()
            .map(String::as_str)
    }

    /// Offices of `(state, district)` in dataset order, duplicates included.
    /// Empty for an unknown pair.
    pub fn list_offices(&self, state: &str, district: &str) -> &[OfficeEntry] {
        self.offices_by_state_district
            .get(&(state.to_string(), district.to_string()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of distinct postal codes loaded.
    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}
