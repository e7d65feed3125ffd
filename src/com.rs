//! Gaussian `.com` input files

use std::{io::Write, path::Path};

use serde::Deserialize;

use crate::{
    error::{Error, Result},
    mol2::{AtomEntry, MoleculeRecord},
};

/// Computation parameters shared by every `.com` file generated in one run.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ComParams {
    /// The route card, without the leading `#`
    pub route: String,

    /// Written to `%nprocshared`
    pub cores: usize,

    /// Written to `%mem`, including the unit, like `4GB`
    pub memory: String,

    pub charge: isize,

    pub multiplicity: usize,
}

impl Default for ComParams {
    fn default() -> Self {
        Self {
            route: String::from("COMPUTATIONAL PARAMETERS HERE"),
            cores: 8,
            memory: String::from("4GB"),
            charge: 0,
            multiplicity: 1,
        }
    }
}

/// The name of the `.com` file for the conformer `conf_name`
pub fn output_name(prefix: &str, conf_name: &str) -> String {
    format!("{prefix}_{conf_name}.com")
}

pub struct ComFile<'a> {
    pub molecule: &'a MoleculeRecord,
    pub params: &'a ComParams,
}

impl<'a> ComFile<'a> {
    pub fn new(molecule: &'a MoleculeRecord, params: &'a ComParams) -> Self {
        Self { molecule, params }
    }

    /// create or truncate `path` and write `self` to it
    pub fn generate(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut out = std::fs::File::create(path)
            .map_err(|e| Error::io("create", path, e))?;
        out.write_all(self.to_string().as_bytes())
            .map_err(|e| Error::io("write", path, e))
    }

    pub fn write(&self, mut out: impl std::fmt::Write) -> std::fmt::Result {
        let ComParams {
            route,
            cores,
            memory,
            charge,
            multiplicity,
        } = self.params;
        writeln!(out, "%nprocshared={cores}")?;
        writeln!(out, "%mem={memory}")?;
        writeln!(out, "# {route} ")?;
        // blank lines around the title card are required
        writeln!(out)?;
        writeln!(out, "{}", self.molecule.conf_name)?;
        writeln!(out)?;
        writeln!(out, "{charge} {multiplicity}")?;
        for AtomEntry {
            element,
            position: [x, y, z],
        } in &self.molecule.atoms
        {
            writeln!(out, " {element}  {x:08.6}  {y:08.6}  {z:08.6}")?;
        }
        // and so is the final one
        writeln!(out)
    }
}

impl std::fmt::Display for ComFile<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.write(f)
    }
}

/// read the molecule specification back out of the contents of a `.com`
/// file. this is the third blank-line-separated section: a charge and
/// multiplicity line followed by one `element x y z` line per atom. it inverts
/// [ComFile::write] for the atom block, up to the six decimals written
pub fn read_geometry(text: &str) -> Result<Vec<AtomEntry>> {
    let mut section = 0;
    let mut in_blank = false;
    let mut lines = text.lines().enumerate().skip_while(|(_, line)| {
        if line.trim().is_empty() {
            if !in_blank {
                section += 1;
                in_blank = true;
            }
        } else {
            in_blank = false;
        }
        section < 2 || in_blank
    });

    let Some((i, charge_line)) = lines.next() else {
        return Err(Error::malformed(
            text.lines().count(),
            "missing charge and multiplicity line",
        ));
    };
    let fields: Vec<_> = charge_line.split_whitespace().collect();
    if fields.len() != 2
        || fields[0].parse::<isize>().is_err()
        || fields[1].parse::<usize>().is_err()
    {
        return Err(Error::malformed(
            i + 1,
            format!("invalid charge and multiplicity line `{charge_line}`"),
        ));
    }

    let mut ret = Vec::new();
    for (i, line) in lines.take_while(|(_, line)| !line.trim().is_empty()) {
        let fields: Vec<_> = line.split_whitespace().collect();
        let [element, x, y, z] = fields[..] else {
            return Err(Error::malformed(
                i + 1,
                format!("expected `element x y z`, found `{line}`"),
            ));
        };
        let mut position = [0.0; 3];
        for (p, field) in position.iter_mut().zip([x, y, z]) {
            *p = field.parse().map_err(|_| {
                Error::malformed(i + 1, format!("invalid coordinate `{field}`"))
            })?;
        }
        ret.push(AtomEntry::new(element, position));
    }
    Ok(ret)
}
