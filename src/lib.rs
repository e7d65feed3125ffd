use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use log::{debug, info, warn};

use com::{output_name, ComFile, ComParams};
use mol2::{molecule_slices, MoleculeRecord};

pub mod com;
pub mod config;
pub mod error;
pub mod link0;
pub mod mol2;

pub use error::{Error, Result};

/// load the lines of `path` without their line endings. contents that are not
/// UTF-8 are reported as malformed input rather than an I/O failure
pub fn load_lines(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    Ok(std::fs::read_to_string(path)
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::InvalidData => {
                Error::malformed(1, "file is not valid UTF-8").in_file(path)
            }
            _ => Error::io("read", path, e),
        })?
        .lines()
        .map(String::from)
        .collect())
}

/// split `lines` into molecules and parse each of them. the first malformed
/// record aborts the whole batch
pub fn parse_molecules<S: AsRef<str>>(
    lines: &[S],
) -> Result<Vec<MoleculeRecord>> {
    molecule_slices(lines)?
        .into_iter()
        .map(|r| MoleculeRecord::parse(&lines[r.clone()], r.start))
        .collect()
}

/// write one `.com` file per molecule in `molecules` to `dir`, creating it if
/// needed, and return the paths written. a later molecule with the same
/// conformer name as an earlier one overwrites its file
pub fn write_output(
    dir: impl AsRef<Path>,
    prefix: &str,
    params: &ComParams,
    molecules: &[MoleculeRecord],
) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    if !dir.exists() {
        std::fs::create_dir_all(dir)
            .map_err(|e| Error::io("create directory", dir, e))?;
    }
    let mut seen = HashSet::new();
    let mut ret = Vec::with_capacity(molecules.len());
    for mol in molecules {
        let path = dir.join(output_name(prefix, &mol.conf_name));
        if !seen.insert(path.clone()) {
            warn!(
                "duplicate conformer name {}, overwriting {}",
                mol.conf_name,
                path.display()
            );
        }
        ComFile::new(mol, params).generate(&path)?;
        debug!("wrote {} atoms to {}", mol.atoms.len(), path.display());
        ret.push(path);
    }
    Ok(ret)
}

/// parse every molecule in the mol2 file at `path` and write a `.com` file for
/// each of them to `out_dir`. nothing is written unless the whole file parses
pub fn split_file(
    path: impl AsRef<Path>,
    params: &ComParams,
    prefix: &str,
    out_dir: impl AsRef<Path>,
) -> Result<Vec<PathBuf>> {
    let path = path.as_ref();
    let lines = load_lines(path)?;
    let molecules = parse_molecules(&lines).map_err(|e| e.in_file(path))?;
    info!("found {} molecules in {}", molecules.len(), path.display());
    write_output(out_dir, prefix, params, &molecules)
}
