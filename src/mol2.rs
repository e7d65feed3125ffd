//! Splitting and parsing of multi-molecule Tripos mol2 files. Only the
//! `@<TRIPOS>MOLECULE` and `@<TRIPOS>ATOM` sections are read, everything else
//! in a record is ignored.

use std::{ops::Range, sync::LazyLock};

use log::trace;
use regex::Regex;

use crate::error::{Error, Result};

pub const MOLECULE_TAG: &str = "@<TRIPOS>MOLECULE";
pub const ATOM_TAG: &str = "@<TRIPOS>ATOM";

static FIRST_DIGIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d").unwrap());

#[derive(Clone, Debug, PartialEq)]
pub struct AtomEntry {
    pub element: String,
    pub position: [f64; 3],
}

impl AtomEntry {
    pub fn new(element: impl Into<String>, position: [f64; 3]) -> Self {
        Self {
            element: element.into(),
            position,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MoleculeRecord {
    pub conf_name: String,
    pub atom_count: usize,
    pub bond_count: usize,
    pub atoms: Vec<AtomEntry>,
}

/// return one half-open range of line indices per molecule in `lines`. each
/// range starts at a line containing [MOLECULE_TAG] and runs up to the next
/// tag, or to the end of `lines` for the last molecule. anything before the
/// first tag is left out
pub fn molecule_slices<S: AsRef<str>>(
    lines: &[S],
) -> Result<Vec<Range<usize>>> {
    let tags: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| line.as_ref().contains(MOLECULE_TAG))
        .map(|(i, _)| i)
        .collect();

    let Some(&last) = tags.last() else {
        return Err(Error::malformed(
            1,
            format!("missing {MOLECULE_TAG} tag"),
        ));
    };

    let mut ret: Vec<_> = tags.windows(2).map(|w| w[0]..w[1]).collect();
    ret.push(last..lines.len());
    trace!("found molecule slices {ret:?}");
    Ok(ret)
}

/// extract the element symbol from a composite atom name like `C1` or `Na23`
/// by taking everything before the first digit
pub fn element_symbol(token: &str) -> Option<&str> {
    let digit = FIRST_DIGIT.find(token)?;
    match &token[..digit.start()] {
        "" => None,
        s => Some(s),
    }
}

impl MoleculeRecord {
    /// parse a single molecule from `lines`, which should start with the
    /// [MOLECULE_TAG] line as returned by [molecule_slices]. `first_line` is
    /// the zero-based index of `lines[0]` in the full file and only affects
    /// the line numbers reported in errors
    pub fn parse<S: AsRef<str>>(
        lines: &[S],
        first_line: usize,
    ) -> Result<Self> {
        // one-based line number in the full file for index `i` into `lines`
        let line_no = |i: usize| first_line + i + 1;

        let conf_name = lines
            .get(1)
            .ok_or_else(|| {
                Error::malformed(line_no(1), "missing title line")
            })?
            .as_ref()
            .trim()
            .to_owned();

        let counts = lines.get(2).ok_or_else(|| {
            Error::malformed(line_no(2), "missing counts line")
        })?;
        let (atom_count, bond_count) =
            parse_counts(counts.as_ref(), line_no(2))?;

        let mut atoms = Vec::new();
        if atom_count > 0 {
            let start = lines
                .iter()
                .position(|line| line.as_ref().contains(ATOM_TAG))
                .ok_or_else(|| {
                    Error::malformed(
                        line_no(0),
                        format!("missing {ATOM_TAG} section"),
                    )
                })?
                + 1;

            // the count comes from the file, so check it against the lines
            // actually present before allocating for it
            let available = lines.len() - start;
            if atom_count > available {
                return Err(Error::malformed(
                    line_no(lines.len() - 1),
                    format!(
                        "ATOM section ended after {available} of {atom_count} \
                         atoms"
                    ),
                ));
            }
            atoms.reserve(atom_count);
            for (i, line) in
                lines.iter().enumerate().skip(start).take(atom_count)
            {
                atoms.push(parse_atom(line.as_ref(), line_no(i))?);
            }
        }

        Ok(Self {
            conf_name,
            atom_count,
            bond_count,
            atoms,
        })
    }
}

fn parse_counts(line: &str, line_no: usize) -> Result<(usize, usize)> {
    let fields: Vec<_> = line.split_whitespace().collect();
    if fields.len() < 2 {
        return Err(Error::malformed(
            line_no,
            "counts line must have at least atom and bond counts",
        ));
    }
    let atoms = fields[0].parse().map_err(|_| {
        Error::malformed(line_no, format!("invalid atom count `{}`", fields[0]))
    })?;
    let bonds = fields[1].parse().map_err(|_| {
        Error::malformed(line_no, format!("invalid bond count `{}`", fields[1]))
    })?;
    Ok((atoms, bonds))
}

fn parse_atom(line: &str, line_no: usize) -> Result<AtomEntry> {
    let fields: Vec<_> = line.split_whitespace().collect();
    if fields.len() < 5 {
        return Err(Error::malformed(
            line_no,
            format!("ATOM line has {} fields, need at least 5", fields.len()),
        ));
    }

    let element = element_symbol(fields[1]).ok_or_else(|| {
        Error::malformed(
            line_no,
            format!("unable to extract element from atom name `{}`", fields[1]),
        )
    })?;

    let mut position = [0.0; 3];
    for (p, field) in position.iter_mut().zip(&fields[2..5]) {
        *p = field.parse().map_err(|_| {
            Error::malformed(line_no, format!("invalid coordinate `{field}`"))
        })?;
    }

    Ok(AtomEntry::new(element, position))
}
