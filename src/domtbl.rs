// src/domtbl.rs

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use flate2::read::MultiGzDecoder;

use crate::error::HitError;

/// Number of fixed, whitespace separated columns before the description.
pub const FIXED_COLUMNS: usize = 22;

/// One data line of a HMMER3 `--domtblout` file.
///
/// ```text
/// target  acc  tlen  query  acc  qlen  E-value score bias  #  of  c-Evalue i-Evalue score bias  hmm_from hmm_to  ali_from ali_to  env_from env_to  acc  description
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DomTblRow {
    pub target_name: String,
    pub target_accession: String,
    pub target_len: u64,
    pub query_name: String,
    pub query_accession: String,
    /// Length of the profile (HMM) that was searched.
    pub query_len: u64,
    pub full_evalue: f64,
    pub full_score: f64,
    pub full_bias: f64,
    pub domain_index: u32,
    pub domain_count: u32,
    pub c_evalue: f64,
    pub i_evalue: f64,
    pub domain_score: f64,
    pub domain_bias: f64,
    pub hmm_from: u64,
    pub hmm_to: u64,
    pub ali_from: u64,
    pub ali_to: u64,
    pub env_from: u64,
    pub env_to: u64,
    pub accuracy: f64,
    pub description: String,
}

fn field<T: FromStr>(fields: &[&str], idx: usize, name: &str) -> Result<T, String> {
    fields[idx]
        .parse()
        .map_err(|_| format!("column {} ({name}): '{}' is not a valid number", idx + 1, fields[idx]))
}

/// Like `field`, but the value must also be finite and non-negative.
fn evalue_field(fields: &[&str], idx: usize, name: &str) -> Result<f64, String> {
    let value: f64 = field(fields, idx, name)?;
    if !value.is_finite() || value < 0.0 {
        return Err(format!(
            "column {} ({name}): '{}' is not a valid e-value",
            idx + 1,
            fields[idx]
        ));
    }
    Ok(value)
}

impl DomTblRow {
    /// Parses one data line. The error is a bare message; the caller knows
    /// which file and line it came from.
    pub fn parse_line(line: &str) -> Result<Self, String> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() <= FIXED_COLUMNS {
            return Err(format!(
                "expected at least {} fields, found {}",
                FIXED_COLUMNS + 1,
                fields.len()
            ));
        }

        Ok(Self {
            target_name: fields[0].to_string(),
            target_accession: fields[1].to_string(),
            target_len: field(&fields, 2, "tlen")?,
            query_name: fields[3].to_string(),
            query_accession: fields[4].to_string(),
            query_len: field(&fields, 5, "qlen")?,
            full_evalue: evalue_field(&fields, 6, "E-value")?,
            full_score: field(&fields, 7, "score")?,
            full_bias: field(&fields, 8, "bias")?,
            domain_index: field(&fields, 9, "#")?,
            domain_count: field(&fields, 10, "of")?,
            c_evalue: evalue_field(&fields, 11, "c-Evalue")?,
            i_evalue: evalue_field(&fields, 12, "i-Evalue")?,
            domain_score: field(&fields, 13, "score")?,
            domain_bias: field(&fields, 14, "bias")?,
            hmm_from: field(&fields, 15, "hmm from")?,
            hmm_to: field(&fields, 16, "hmm to")?,
            ali_from: field(&fields, 17, "ali from")?,
            ali_to: field(&fields, 18, "ali to")?,
            env_from: field(&fields, 19, "env from")?,
            env_to: field(&fields, 20, "env to")?,
            accuracy: field(&fields, 21, "acc")?,
            description: fields[FIXED_COLUMNS..].join(" "),
        })
    }

    /// Fraction of the profile covered by this domain alignment.
    pub fn coverage(&self) -> Result<f64, String> {
        if self.query_len == 0 {
            return Err(format!("profile '{}' has length 0", self.query_name));
        }
        if self.hmm_to < self.hmm_from {
            return Err(format!(
                "hmm coordinates go backwards ({} > {})",
                self.hmm_from, self.hmm_to
            ));
        }
        Ok((self.hmm_to - self.hmm_from + 1) as f64 / self.query_len as f64)
    }
}

/// Blank lines and `#` comments carry no hit.
pub fn is_data_line(line: &str) -> bool {
    let trimmed = line.trim_start();
    !trimmed.is_empty() && !trimmed.starts_with('#')
}

/// Opens a result table, transparently decompressing `.gz` files.
/// A file that does not exist yields `Ok(None)`.
pub fn open_table(path: &Path) -> Result<Option<Box<dyn BufRead>>, HitError> {
    let f = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(HitError::io(path, e)),
    };

    let is_gz = path
        .extension()
        .map(|ext| ext == "gz")
        .unwrap_or(false);

    let reader: Box<dyn BufRead> = if is_gz {
        Box::new(BufReader::new(MultiGzDecoder::new(f)))
    } else {
        Box::new(BufReader::new(f))
    };
    Ok(Some(reader))
}
