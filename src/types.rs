// src/types.rs

use std::fmt;

/// Reading strand of a gene on its replicon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strand {
    Forward,
    Reverse,
}

impl Strand {
    /// `1` for forward, `-1` for reverse, as written in result tables.
    pub fn sign(self) -> i8 {
        match self {
            Strand::Forward => 1,
            Strand::Reverse => -1,
        }
    }

    pub fn from_sign(sign: i64) -> Option<Self> {
        match sign {
            1 => Some(Strand::Forward),
            -1 => Some(Strand::Reverse),
            _ => None,
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sign())
    }
}

/// Value type of a column in the hit table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Str,
    Int,
    Float,
}

/// A named, typed column of the hit table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub kind: ColumnType,
}

/// The fixed schema of every hit table, empty or not.
pub const COLUMNS: [Column; 8] = [
    Column { name: "Accession_number", kind: ColumnType::Str },
    Column { name: "query_name", kind: ColumnType::Str },
    Column { name: "ID_query", kind: ColumnType::Str },
    Column { name: "ID_prot", kind: ColumnType::Str },
    Column { name: "strand", kind: ColumnType::Int },
    Column { name: "pos_beg", kind: ColumnType::Int },
    Column { name: "pos_end", kind: ColumnType::Int },
    Column { name: "evalue", kind: ColumnType::Float },
];

/// One accepted hit, i.e. one row of the hit table.
#[derive(Debug, Clone, PartialEq)]
pub struct HitRecord {
    pub accession_number: String,
    pub query_name: String,
    pub id_query: String,
    pub id_prot: String,
    pub strand: Strand,
    pub pos_beg: u64,
    pub pos_end: u64,
    pub evalue: f64,
}

impl HitRecord {
    /// Field values in `COLUMNS` order, rendered as text.
    pub fn fields(&self) -> [String; 8] {
        [
            self.accession_number.clone(),
            self.query_name.clone(),
            self.id_query.clone(),
            self.id_prot.clone(),
            self.strand.to_string(),
            self.pos_beg.to_string(),
            self.pos_end.to_string(),
            format!("{:e}", self.evalue),
        ]
    }
}
