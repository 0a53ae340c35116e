// src/naming.rs

use std::fmt;
use std::str::FromStr;

use crate::error::HitError;
use crate::types::Strand;

/// How proteins were named by whatever produced the searched proteome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NamingMode {
    /// Proteins predicted by Prodigal; ids and coordinates are used as found.
    #[default]
    Default,
    /// Proteins from a pre-annotated Gembase genome.
    Gembase,
}

impl FromStr for NamingMode {
    type Err = HitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "default" | "prodigal" => Ok(NamingMode::Default),
            "gembase" => Ok(NamingMode::Gembase),
            _ => Err(HitError::UnknownMode(s.to_string())),
        }
    }
}

/// A Gembase protein name, e.g. `ACBA007p01a_000009`:
/// organism code, strain number, replicon kind and number, optional
/// draft letter, then the gene number after the underscore.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GembaseId {
    pub organism: String,
    pub strain: String,
    pub replicon_kind: char,
    pub replicon_number: u32,
    pub suffix: Option<char>,
    pub gene_number: u64,
}

/// Splits `s` after its leading run of chars matching `pred`.
fn take_while(s: &str, pred: impl Fn(char) -> bool) -> (&str, &str) {
    let end = s.find(|c: char| !pred(c)).unwrap_or(s.len());
    s.split_at(end)
}

impl FromStr for GembaseId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = |why: &str| format!("'{s}' is not a Gembase protein name: {why}");

        let (replicon, gene) = s.rsplit_once('_').ok_or_else(|| bad("no '_' before the gene number"))?;
        if gene.is_empty() || !gene.bytes().all(|b| b.is_ascii_digit()) {
            return Err(bad("gene number is not numeric"));
        }
        let gene_number = gene.parse().map_err(|_| bad("gene number out of range"))?;

        let (organism, rest) = take_while(replicon, |c| c.is_ascii_alphabetic());
        if organism.len() != 4 {
            return Err(bad("organism code must be 4 letters"));
        }
        let (strain, rest) = take_while(rest, |c| c.is_ascii_digit());
        if strain.is_empty() {
            return Err(bad("missing strain number"));
        }
        let mut chars = rest.chars();
        let replicon_kind = chars
            .next()
            .filter(|c| c.is_ascii_alphabetic())
            .ok_or_else(|| bad("missing replicon kind"))?;
        let (number, rest) = take_while(chars.as_str(), |c| c.is_ascii_digit());
        if number.is_empty() {
            return Err(bad("missing replicon number"));
        }
        let replicon_number = number.parse().map_err(|_| bad("replicon number out of range"))?;
        let suffix = match rest.len() {
            0 => None,
            1 if rest.as_bytes()[0].is_ascii_alphabetic() => rest.chars().next(),
            _ => return Err(bad("unexpected characters after replicon number")),
        };

        Ok(GembaseId {
            organism: organism.to_ascii_uppercase(),
            strain: strain.to_string(),
            replicon_kind: replicon_kind.to_ascii_lowercase(),
            replicon_number,
            suffix: suffix.map(|c| c.to_ascii_lowercase()),
            gene_number,
        })
    }
}

impl fmt::Display for GembaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}{:02}",
            self.organism, self.strain, self.replicon_kind, self.replicon_number
        )?;
        if let Some(c) = self.suffix {
            write!(f, "{c}")?;
        }
        write!(f, "_{:06}", self.gene_number)
    }
}

/// Gene location as read from a hit's target description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneLocation {
    pub pos_beg: u64,
    pub pos_end: u64,
    pub strand: Strand,
}

impl NamingMode {
    /// The `ID_prot` reported for a target name.
    pub fn protein_id(self, target_name: &str) -> Result<String, String> {
        match self {
            NamingMode::Default => Ok(target_name.to_string()),
            NamingMode::Gembase => Ok(target_name.parse::<GembaseId>()?.to_string()),
        }
    }

    /// Reads coordinates (and, in default mode, the strand) from a
    /// description of the form `# <c1> # <c2> # <strand> # ...`.
    pub fn gene_location(self, description: &str) -> Result<GeneLocation, String> {
        let mut tokens = description.split_whitespace().filter(|t| *t != "#");
        let mut coord = |what: &str| -> Result<u64, String> {
            let tok = tokens
                .next()
                .ok_or_else(|| format!("description lacks the {what} coordinate"))?;
            tok.parse()
                .map_err(|_| format!("{what} coordinate '{tok}' is not a positive integer"))
        };
        let c1 = coord("begin")?;
        let c2 = coord("end")?;

        match self {
            NamingMode::Default => {
                let tok = tokens
                    .next()
                    .ok_or_else(|| "description lacks the strand".to_string())?;
                let strand = tok
                    .parse::<i64>()
                    .ok()
                    .and_then(Strand::from_sign)
                    .ok_or_else(|| format!("strand '{tok}' is neither 1 nor -1"))?;
                Ok(GeneLocation { pos_beg: c1, pos_end: c2, strand })
            }
            NamingMode::Gembase => {
                let strand = if c1 <= c2 { Strand::Forward } else { Strand::Reverse };
                Ok(GeneLocation {
                    pos_beg: c1.min(c2),
                    pos_end: c1.max(c2),
                    strand,
                })
            }
        }
    }
}
