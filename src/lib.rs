// src/lib.rs
pub mod domtbl;
pub mod error;
pub mod filter;
pub mod naming;
pub mod types;

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::domtbl::{is_data_line, open_table, DomTblRow};
pub use crate::error::HitError;
use crate::filter::{best_per_protein, HitFilter};
pub use crate::naming::NamingMode;
use crate::types::{Column, HitRecord, COLUMNS};

/// The hits kept for one replicon, in the column layout of `COLUMNS`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HitTable {
    pub rows: Vec<HitRecord>,
}

impl HitTable {
    /// Column names and types; the same for every table, including empty ones.
    pub fn schema(&self) -> &'static [Column] {
        &COLUMNS
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn header_line() -> String {
        COLUMNS.iter().map(|c| c.name).collect::<Vec<_>>().join("\t")
    }

    /// Generate the tab separated table on demand, header first.
    pub fn to_tsv(&self) -> String {
        let mut output = Self::header_line();
        output.push('\n');
        for row in &self.rows {
            output.push_str(&row.fields().join("\t"));
            output.push('\n');
        }
        output
    }

    /// Stream the rows (without header) to `out`.
    pub fn write_rows<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for row in &self.rows {
            writeln!(out, "{}", row.fields().join("\t"))?;
        }
        Ok(())
    }

    /// Stream the whole table, header included, to `out`.
    pub fn write_tsv<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "{}", Self::header_line())?;
        self.write_rows(out)
    }
}

/// Turns one domtblout row into a hit, or `None` if the filter rejects it.
fn hit_from_row(
    replicon_id: &str,
    row: DomTblRow,
    filter: &HitFilter,
    mode: NamingMode,
) -> Result<Option<HitRecord>, String> {
    let coverage = row.coverage()?;
    // Validated before filtering: a corrupt line fails whatever the thresholds.
    let id_prot = mode.protein_id(&row.target_name)?;
    let location = mode.gene_location(&row.description)?;

    if !filter.accepts(row.full_evalue, coverage) {
        log::debug!(
            "{}: rejected {} vs {} (e={:e}, cov={:.3})",
            replicon_id,
            row.target_name,
            row.query_name,
            row.full_evalue,
            coverage
        );
        return Ok(None);
    }

    Ok(Some(HitRecord {
        accession_number: replicon_id.to_string(),
        query_name: row.query_name,
        id_query: row.query_accession,
        id_prot,
        strand: location.strand,
        pos_beg: location.pos_beg,
        pos_end: location.pos_end,
        evalue: row.full_evalue,
    }))
}

/// Reads the HMMER domain table at `file_path` for replicon `replicon_id`.
///
/// Hits are kept when `evalue < evalue_threshold` and
/// `coverage > coverage_threshold` (pass `f64::INFINITY` and `0.0` to keep
/// everything), then reduced to the best hit per protein. A missing, empty or
/// comment-only file gives an empty table. Any malformed data line fails the
/// whole call.
pub fn read_hits<P: AsRef<Path>>(
    replicon_id: &str,
    file_path: P,
    evalue_threshold: f64,
    coverage_threshold: f64,
    mode: NamingMode,
) -> Result<HitTable, HitError> {
    let path = file_path.as_ref();
    if replicon_id.is_empty() {
        return Err(HitError::Config("replicon id is empty".into()));
    }
    let filter = HitFilter::new(evalue_threshold, coverage_threshold)?;

    let Some(reader) = open_table(path)? else {
        log::warn!("{}: no result file at {}", replicon_id, path.display());
        return Ok(HitTable::default());
    };

    let mut accepted = Vec::new();
    let mut data_lines = 0usize;
    for (idx, raw) in reader.split(b'\n').enumerate() {
        let raw = raw.map_err(|e| HitError::io(path, e))?;
        let line = std::str::from_utf8(&raw)
            .map_err(|e| HitError::parse(path, idx + 1, format!("line is not valid UTF-8 ({e})")))?;
        let line = line.strip_suffix('\r').unwrap_or(line);
        if !is_data_line(line) {
            continue;
        }
        data_lines += 1;

        let hit = DomTblRow::parse_line(line)
            .and_then(|row| hit_from_row(replicon_id, row, &filter, mode))
            .map_err(|msg| HitError::parse(path, idx + 1, msg))?;
        if let Some(hit) = hit {
            accepted.push(hit);
        }
    }

    let rows = best_per_protein(accepted);
    log::info!(
        "{}: {} hit line(s) in {}, {} kept",
        replicon_id,
        data_lines,
        path.display(),
        rows.len()
    );
    Ok(HitTable { rows })
}

/// Reads many replicons in parallel. Results are in `jobs` order, one per job.
pub fn read_hits_batch(
    jobs: &[(String, PathBuf)],
    evalue_threshold: f64,
    coverage_threshold: f64,
    mode: NamingMode,
) -> Vec<Result<HitTable, HitError>> {
    jobs.par_iter()
        .map(|(replicon_id, path)| {
            read_hits(replicon_id, path, evalue_threshold, coverage_threshold, mode)
        })
        .collect()
}
