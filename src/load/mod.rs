use csv::ReaderBuilder;
use std::{fs::File, io::Read, path::Path};
use thiserror::Error;
use tracing::warn;

use crate::record::Record;

/// Columns every dataset must carry, matched case-insensitively against the
/// header row.
pub const REQUIRED_COLUMNS: [&str; 4] = ["pincode", "officename", "district", "statename"];

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read `{path}`: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("header is missing required column(s): {}", missing.join(", "))]
    Schema { missing: Vec<String> },
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Positions of the required columns within the header row.
#[derive(Debug, Clone, Copy)]
struct Columns {
    code: usize,
    office: usize,
    district: usize,
    state: usize,
}

fn resolve_columns(headers: &csv::StringRecord) -> Result<Columns, LoadError> {
    let find = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    };

    let code = find("pincode");
    let office = find("officename");
    let district = find("district");
    let state = find("statename");

    if let (Some(code), Some(office), Some(district), Some(state)) =
        (code, office, district, state)
    {
        return Ok(Columns {
            code,
            office,
            district,
            state,
        });
    }

    let missing = REQUIRED_COLUMNS
        .iter()
        .zip([code, office, district, state])
        .filter(|(_, pos)| pos.is_none())
        .map(|(name, _)| name.to_string())
        .collect();
    Err(LoadError::Schema { missing })
}

/// Read every valid record from the CSV at `path`, in input order.
///
/// Fails before yielding anything if the file is unreadable or the header
/// lacks a required column. Data rows are trimmed per field; rows with any
/// empty field after trimming are skipped with a warning and never reach
/// the index.
pub fn load_records(path: impl AsRef<Path>) -> Result<Vec<Record>, LoadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    read_records(file)
}

/// Same as [`load_records`], but over any reader.
pub fn read_records<R: Read>(input: R) -> Result<Vec<Record>, LoadError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input);

    let headers = reader.headers()?.clone();
    let columns = resolve_columns(&headers)?;

    let mut records = Vec::new();
    let mut skipped = 0usize;
    for (row, result) in reader.records().enumerate() {
        let raw = result?;
        // `flexible` lets short rows through; a missing cell reads as empty.
        let field = |i: usize| raw.get(i).unwrap_or("").trim();

        let record = Record {
            code: field(columns.code).to_string(),
            office_name: field(columns.office).to_string(),
            district: field(columns.district).to_string(),
            state: field(columns.state).to_string(),
        };
        if record.code.is_empty()
            || record.office_name.is_empty()
            || record.district.is_empty()
            || record.state.is_empty()
        {
            warn!(row = row + 1, "skipping row with empty required field");
            skipped += 1;
            continue;
        }
        records.push(record);
    }

    if skipped > 0 {
        warn!(skipped, kept = records.len(), "dropped incomplete rows");
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = "\
pincode,officename,district,statename
560001,Corporation Building,Bangalore,Karnataka
110001,Connaught Place,New Delhi,Delhi
";

    #[test]
    fn reads_rows_in_input_order() -> Result<(), LoadError> {
        let records = read_records(SAMPLE.as_bytes())?;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].code, "560001");
        assert_eq!(records[0].office_name, "Corporation Building");
        assert_eq!(records[1].state, "Delhi");
        Ok(())
    }

    #[test]
    fn header_match_is_case_insensitive_and_ignores_extra_columns() -> Result<(), LoadError> {
        let csv = "\
CircleName,Pincode,OfficeName,District,StateName
Karnataka Circle,560001,Corporation Building,Bangalore,Karnataka
";
        let records = read_records(csv.as_bytes())?;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].code, "560001");
        assert_eq!(records[0].district, "Bangalore");
        Ok(())
    }

    #[test]
    fn missing_columns_fail_with_their_names() {
        let csv = "pincode,officename,statename\n560001,Corporation Building,Karnataka\n";
        let err = read_records(csv.as_bytes()).unwrap_err();
        match err {
            LoadError::Schema { missing } => assert_eq!(missing, vec!["district".to_string()]),
            other => panic!("expected Schema error, got {other:?}"),
        }
    }

    #[test]
    fn schema_error_names_every_missing_column() {
        let csv = "pincode,statename\n560001,Karnataka\n";
        let err = read_records(csv.as_bytes()).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("officename") && msg.contains("district"), "{msg}");
        match err {
            LoadError::Schema { missing } => {
                assert_eq!(
                    missing,
                    vec!["officename".to_string(), "district".to_string()]
                );
            }
            other => panic!("expected Schema error, got {other:?}"),
        }
    }

    #[test]
    fn fields_are_trimmed() -> Result<(), LoadError> {
        let csv = "pincode,officename,district,statename\n 560001 , Corporation Building ,Bangalore, Karnataka \n";
        let records = read_records(csv.as_bytes())?;
        assert_eq!(records[0].code, "560001");
        assert_eq!(records[0].office_name, "Corporation Building");
        assert_eq!(records[0].state, "Karnataka");
        Ok(())
    }

    #[test]
    fn rows_with_empty_required_fields_are_skipped() -> Result<(), LoadError> {
        let csv = "\
pincode,officename,district,statename
560001,Corporation Building,Bangalore,Karnataka
,Orphan Office,Somewhere,Karnataka
110001,  ,New Delhi,Delhi
";
        let records = read_records(csv.as_bytes())?;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].code, "560001");
        Ok(())
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_records("/definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.to_string().contains("/definitely/not/here.csv"));
    }

    #[test]
    fn loads_from_a_real_file() -> anyhow::Result<()> {
        let mut tmp = NamedTempFile::new()?;
        tmp.write_all(SAMPLE.as_bytes())?;
        let records = load_records(tmp.path())?;
        assert_eq!(records.len(), 2);
        Ok(())
    }
}
