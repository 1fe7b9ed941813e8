use serde::{Deserialize, Serialize};

/// One normalized dataset row: a postal code and the office it belongs to.
/// All fields are whitespace-trimmed and non-empty by the time a `Record`
/// leaves the loader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub code: String,
    pub office_name: String,
    pub district: String,
    pub state: String,
}

/// Office reference kept in the per-(state, district) listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfficeEntry {
    pub office_name: String,
    pub code: String,
}

impl From<&Record> for OfficeEntry {
    fn from(r: &Record) -> Self {
        OfficeEntry {
            office_name: r.office_name.clone(),
            code: r.code.clone(),
        }
    }
}
