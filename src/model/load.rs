// CSV loaders for the flow matrix and the equipment table.
//
// Both loaders validate the process alphabet strictly: every label must
// appear exactly once, and an unknown label is rejected rather than ignored.
// Row numbers in errors are 1-based file lines (the header is line 1).

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::debug;

use super::equipment::{EquipmentSpec, EquipmentTable, PackingConfig};
use super::flow::FlowMatrix;
use super::types::{PROCESS_COUNT, ProcessId};
use crate::error::{Error, Result};

const FLOW_COLUMNS: &str = "flow matrix columns";
const FLOW_ROWS: &str = "flow matrix rows";
const EQUIPMENT_ROWS: &str = "equipment table";

/// Largest machine count accepted for a single process. Block packing scans
/// every row count up to the machine count, so this bounds the work per
/// department.
pub const MAX_MACHINES_PER_PROCESS: u32 = 10_000;

fn reader<R: Read>(rdr: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(rdr)
}

/// Resolve a label, recording it in `seen`. Fails on unknown or repeated labels.
fn claim_label(
    label: &str,
    seen: &mut [bool; PROCESS_COUNT],
    context: &str,
) -> Result<ProcessId> {
    let p: ProcessId = label.parse().map_err(|_| Error::UnknownProcess {
        label: label.to_string(),
        context: context.to_string(),
    })?;
    if seen[p.index()] {
        return Err(Error::DuplicateProcess {
            label: label.to_string(),
            context: context.to_string(),
        });
    }
    seen[p.index()] = true;
    Ok(p)
}

fn ensure_complete(seen: &[bool; PROCESS_COUNT], context: &str) -> Result<()> {
    match ProcessId::ALL.iter().find(|p| !seen[p.index()]) {
        Some(p) => Err(Error::MissingProcess {
            label: p.label().to_string(),
            context: context.to_string(),
        }),
        None => Ok(()),
    }
}

fn parse_number(raw: &str, row: usize, column: &str) -> Result<f64> {
    let value: f64 = raw.parse().map_err(|_| Error::InvalidNumber {
        row,
        column: column.to_string(),
        value: raw.to_string(),
    })?;
    if !value.is_finite() {
        return Err(Error::InvalidNumber {
            row,
            column: column.to_string(),
            value: raw.to_string(),
        });
    }
    if value < 0.0 {
        return Err(Error::NegativeValue { row, column: column.to_string(), value });
    }
    Ok(value)
}

/// Read a 13x13 flow matrix.
///
/// Expected shape: a header row `<corner>,A,B,...,M` followed by one row per
/// process `label,v_A,...,v_M`. Row and column labels may come in any order.
/// An empty cell counts as zero flow.
pub fn read_flow_matrix<R: Read>(rdr: R) -> Result<FlowMatrix> {
    let mut rdr = reader(rdr);
    let headers = rdr.headers()?.clone();

    let mut seen_cols = [false; PROCESS_COUNT];
    let columns: Vec<ProcessId> = headers
        .iter()
        .skip(1)
        .map(|h| claim_label(h, &mut seen_cols, FLOW_COLUMNS))
        .collect::<Result<_>>()?;
    ensure_complete(&seen_cols, FLOW_COLUMNS)?;

    let mut matrix = FlowMatrix::zeros();
    let mut seen_rows = [false; PROCESS_COUNT];
    let expected = columns.len() + 1;

    for (i, record) in rdr.records().enumerate() {
        let record = record?;
        let row = i + 2;
        if record.iter().all(str::is_empty) {
            continue;
        }
        if record.len() != expected {
            return Err(Error::RowLength { row, expected, found: record.len() });
        }
        let from = claim_label(&record[0], &mut seen_rows, FLOW_ROWS)?;
        for (&to, raw) in columns.iter().zip(record.iter().skip(1)) {
            let flow = if raw.is_empty() { 0.0 } else { parse_number(raw, row, to.label())? };
            matrix.set(from, to, flow);
        }
    }
    ensure_complete(&seen_rows, FLOW_ROWS)?;

    debug!(total_flow = matrix.total(), max_flow = matrix.max(), "loaded flow matrix");
    Ok(matrix)
}

pub fn read_flow_matrix_path<P: AsRef<Path>>(path: P) -> Result<FlowMatrix> {
    read_flow_matrix(File::open(path)?)
}

struct EquipmentColumns {
    process: usize,
    count: usize,
    unit_width: Option<usize>,
    unit_height: Option<usize>,
    overlap: Option<usize>,
}

impl EquipmentColumns {
    fn locate(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));
        Ok(Self {
            process: find("process").ok_or_else(|| Error::MissingColumn("process".into()))?,
            count: find("count").ok_or_else(|| Error::MissingColumn("count".into()))?,
            unit_width: find("unit_width"),
            unit_height: find("unit_height"),
            overlap: find("overlap"),
        })
    }
}

fn optional_field(
    record: &StringRecord,
    column: Option<usize>,
    name: &str,
    row: usize,
    default: f64,
) -> Result<f64> {
    match column.and_then(|c| record.get(c)) {
        Some(raw) if !raw.is_empty() => parse_number(raw, row, name),
        _ => Ok(default),
    }
}

/// Read the per-process equipment table.
///
/// Required columns: `process`, `count`. Optional: `unit_width`,
/// `unit_height`, `overlap`; missing or empty cells fall back to `packing`.
/// Counts must be whole numbers (`3` and `3.0` are both accepted) no larger
/// than `MAX_MACHINES_PER_PROCESS`.
pub fn read_equipment<R: Read>(rdr: R, packing: &PackingConfig) -> Result<EquipmentTable> {
    let mut rdr = reader(rdr);
    let headers = rdr.headers()?.clone();
    let cols = EquipmentColumns::locate(&headers)?;

    let mut seen = [false; PROCESS_COUNT];
    let mut specs = [packing.spec(0); PROCESS_COUNT];

    for (i, record) in rdr.records().enumerate() {
        let record = record?;
        let row = i + 2;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let label = record.get(cols.process).unwrap_or("");
        let p = claim_label(label, &mut seen, EQUIPMENT_ROWS)?;

        let raw_count = record.get(cols.count).unwrap_or("");
        let count = parse_number(raw_count, row, "count")?;
        if count.fract() != 0.0 {
            return Err(Error::InvalidNumber {
                row,
                column: "count".to_string(),
                value: raw_count.to_string(),
            });
        }
        if count > f64::from(MAX_MACHINES_PER_PROCESS) {
            return Err(Error::TooManyMachines {
                label: p.label().to_string(),
                count,
                max: MAX_MACHINES_PER_PROCESS,
            });
        }

        specs[p.index()] = EquipmentSpec {
            count: count as u32,
            unit_width: optional_field(&record, cols.unit_width, "unit_width", row, packing.unit_width)?,
            unit_height: optional_field(&record, cols.unit_height, "unit_height", row, packing.unit_height)?,
            overlap: optional_field(&record, cols.overlap, "overlap", row, packing.overlap)?,
        };
    }
    ensure_complete(&seen, EQUIPMENT_ROWS)?;

    let table = EquipmentTable::new(specs);
    debug!(total_machines = table.total_machines(), "loaded equipment table");
    Ok(table)
}

pub fn read_equipment_path<P: AsRef<Path>>(path: P, packing: &PackingConfig) -> Result<EquipmentTable> {
    read_equipment(File::open(path)?, packing)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Flow matrix CSV with the given `(from, to, flow)` entries, zeros elsewhere.
    pub(crate) fn flow_csv(entries: &[(ProcessId, ProcessId, f64)]) -> String {
        let mut out = String::from("From/To");
        for p in ProcessId::ALL {
            out.push(',');
            out.push_str(p.label());
        }
        out.push('\n');
        for from in ProcessId::ALL {
            out.push_str(from.label());
            for to in ProcessId::ALL {
                let v = entries
                    .iter()
                    .find(|(f, t, _)| *f == from && *t == to)
                    .map(|e| e.2)
                    .unwrap_or(0.0);
                out.push_str(&format!(",{v}"));
            }
            out.push('\n');
        }
        out
    }

    pub(crate) fn equipment_csv(count: u32) -> String {
        let mut out = String::from("process,count\n");
        for p in ProcessId::ALL {
            out.push_str(&format!("{},{}\n", p.label(), count));
        }
        out
    }

    #[test]
    fn test_read_flow_matrix() {
        let csv = flow_csv(&[(ProcessId::A, ProcessId::B, 120.0), (ProcessId::M, ProcessId::A, 3.5)]);
        let m = read_flow_matrix(csv.as_bytes()).unwrap();
        assert_eq!(m.get(ProcessId::A, ProcessId::B), 120.0);
        assert_eq!(m.get(ProcessId::M, ProcessId::A), 3.5);
        assert_eq!(m.get(ProcessId::B, ProcessId::A), 0.0);
    }

    #[test]
    fn test_read_flow_matrix_shuffled_columns() {
        let mut csv = String::from(",M,L,K,J,I,H,G,F,E,D,C,B,A\n");
        for p in ProcessId::ALL {
            // flow of 1 into A from every row, written in the last column
            csv.push_str(&format!("{},0,0,0,0,0,0,0,0,0,0,0,0,1\n", p.label()));
        }
        let m = read_flow_matrix(csv.as_bytes()).unwrap();
        assert_eq!(m.get(ProcessId::C, ProcessId::A), 1.0);
        assert_eq!(m.get(ProcessId::C, ProcessId::M), 0.0);
    }

    #[test]
    fn test_missing_column_is_named() {
        let header = "From/To,A,B,C,D,E,F,G,H,I,J,K,L\n";
        let err = read_flow_matrix(header.as_bytes()).unwrap_err();
        match err {
            Error::MissingProcess { label, .. } => assert_eq!(label, "M"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_row_is_named() {
        let csv: String = flow_csv(&[])
            .lines()
            .filter(|l| !l.starts_with("G,"))
            .map(|l| format!("{l}\n"))
            .collect();
        let err = read_flow_matrix(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::MissingProcess { ref label, .. } if label == "G"));
        assert!(err.to_string().contains("'G'"));
    }

    #[test]
    fn test_unknown_and_duplicate_labels() {
        let unknown = flow_csv(&[]).replacen(",M", ",Z", 1);
        assert!(matches!(
            read_flow_matrix(unknown.as_bytes()),
            Err(Error::UnknownProcess { ref label, .. }) if label == "Z"
        ));

        let duplicate = flow_csv(&[]).replace("\nB,", "\nA,");
        assert!(matches!(
            read_flow_matrix(duplicate.as_bytes()),
            Err(Error::DuplicateProcess { ref label, .. }) if label == "A"
        ));
    }

    #[test]
    fn test_short_row_and_bad_values() {
        let short = flow_csv(&[]).replace("\nC,0,", "\nC,");
        assert!(matches!(
            read_flow_matrix(short.as_bytes()),
            Err(Error::RowLength { row: 4, expected: 14, found: 13 })
        ));

        let bad = flow_csv(&[]).replace("\nD,0,", "\nD,abc,");
        assert!(matches!(read_flow_matrix(bad.as_bytes()), Err(Error::InvalidNumber { row: 5, .. })));

        let negative = flow_csv(&[]).replace("\nE,0,", "\nE,-4,");
        assert!(matches!(read_flow_matrix(negative.as_bytes()), Err(Error::NegativeValue { .. })));
    }

    #[test]
    fn test_read_equipment_defaults_and_overrides() {
        let mut csv = String::from("Process,Count,unit_width,unit_height,overlap\n");
        for p in ProcessId::ALL {
            if p == ProcessId::B {
                csv.push_str("B,8,36,14,0\n");
            } else {
                csv.push_str(&format!("{},3.0,,,\n", p.label()));
            }
        }
        let table = read_equipment(csv.as_bytes(), &PackingConfig::default()).unwrap();
        let b = table.get(ProcessId::B);
        assert_eq!((b.count, b.unit_width, b.unit_height, b.overlap), (8, 36.0, 14.0, 0.0));
        let a = table.get(ProcessId::A);
        assert_eq!((a.count, a.unit_width, a.overlap), (3, 14.0, 2.0));
    }

    #[test]
    fn test_read_equipment_errors() {
        let missing = equipment_csv(2).replace("K,2\n", "");
        assert!(matches!(
            read_equipment(missing.as_bytes(), &PackingConfig::default()),
            Err(Error::MissingProcess { ref label, .. }) if label == "K"
        ));

        let fractional = equipment_csv(2).replace("K,2", "K,2.5");
        assert!(matches!(
            read_equipment(fractional.as_bytes(), &PackingConfig::default()),
            Err(Error::InvalidNumber { .. })
        ));

        let huge = equipment_csv(2).replace("K,2", "K,400000000");
        match read_equipment(huge.as_bytes(), &PackingConfig::default()) {
            Err(Error::TooManyMachines { label, max, .. }) => {
                assert_eq!(label, "K");
                assert_eq!(max, MAX_MACHINES_PER_PROCESS);
            }
            other => panic!("unexpected result: {other:?}"),
        }

        let at_limit = equipment_csv(2).replace("K,2", &format!("K,{MAX_MACHINES_PER_PROCESS}"));
        let table = read_equipment(at_limit.as_bytes(), &PackingConfig::default()).unwrap();
        assert_eq!(table.get(ProcessId::K).count, MAX_MACHINES_PER_PROCESS);

        let no_count = "process,machines\nA,1\n";
        assert!(matches!(
            read_equipment(no_count.as_bytes(), &PackingConfig::default()),
            Err(Error::MissingColumn(ref c)) if c == "count"
        ));
    }
}
