//! In-place edits to the header of existing `.com` files: the `%nprocshared`
//! and `%mem` link-0 directives and the route card.

use std::{collections::HashSet, path::Path};

use log::{debug, info, warn};
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::error::{Error, Result};

pub const CORES_DIRECTIVE: &str = "%nprocshared";
pub const MEM_DIRECTIVE: &str = "%mem";

#[derive(Clone, Debug, Default, PartialEq)]
pub struct HeaderChanges {
    pub cores: Option<usize>,

    /// memory in megabytes
    pub mem_mb: Option<usize>,

    /// replacement route card, without the leading `#`
    pub route: Option<String>,
}

impl HeaderChanges {
    pub fn is_empty(&self) -> bool {
        self.cores.is_none() && self.mem_mb.is_none() && self.route.is_none()
    }
}

/// replace the first line matching `pred` with `new`, returning whether such
/// a line was found
fn replace_first(
    lines: &mut [String],
    pred: impl Fn(&str) -> bool,
    new: String,
) -> bool {
    match lines.iter_mut().find(|line| pred(line.as_str())) {
        Some(line) => {
            *line = new;
            true
        }
        None => false,
    }
}

/// apply `changes` to the contents of a `.com` file. each directive is
/// matched by a plain substring search and only the first match is replaced.
/// the second value lists the requested directives that were not found
pub fn patch_header(
    text: &str,
    changes: &HeaderChanges,
) -> (String, Vec<&'static str>) {
    let mut lines: Vec<String> =
        text.split_inclusive('\n').map(String::from).collect();
    let mut missing = Vec::new();

    if let Some(cores) = changes.cores {
        if !replace_first(
            &mut lines,
            |line| line.contains(CORES_DIRECTIVE),
            format!("{CORES_DIRECTIVE}={cores}\n"),
        ) {
            missing.push(CORES_DIRECTIVE);
        }
    }

    if let Some(mem) = changes.mem_mb {
        if !replace_first(
            &mut lines,
            |line| line.contains(MEM_DIRECTIVE),
            format!("{MEM_DIRECTIVE}={mem}MB\n"),
        ) {
            missing.push(MEM_DIRECTIVE);
        }
    }

    if let Some(route) = &changes.route {
        if !replace_first(
            &mut lines,
            |line| line.trim_start().starts_with('#'),
            format!("# {route} \n"),
        ) {
            missing.push("#");
        }
    }

    (lines.concat(), missing)
}

/// rewrite the header of the `.com` file at `path` in place
pub fn patch_file(
    path: impl AsRef<Path>,
    changes: &HeaderChanges,
) -> Result<()> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .map_err(|e| Error::io("read", path, e))?;
    let (patched, missing) = patch_header(&text, changes);
    for directive in missing {
        warn!(
            "no {directive} line in {}, leaving it unchanged",
            path.display()
        );
    }
    std::fs::write(path, patched).map_err(|e| Error::io("write", path, e))?;
    debug!("patched {}", path.display());
    Ok(())
}

/// apply `changes` to every file in `paths` on the current rayon pool. paths
/// are deduplicated first so no file is written twice. stops at the first
/// error, leaving files that were already patched in place
pub fn patch_files<P: AsRef<Path>>(
    paths: &[P],
    changes: &HeaderChanges,
) -> Result<()> {
    let mut seen = HashSet::new();
    let paths: Vec<&Path> = paths
        .iter()
        .map(|p| p.as_ref())
        .filter(|p| seen.insert(*p))
        .collect();
    info!("patching {} files", paths.len());
    paths
        .into_par_iter()
        .try_for_each(|path| patch_file(path, changes))
}

#[cfg(test)]
mod tests {
    use super::*;

    const WATER: &str = "%chk=water.chk
%nprocshared=8
%mem=4GB
# B3LYP/6-31G(d) opt freq

water

0 1
 O  0.000000  0.000000  0.117300

";

    #[test]
    fn no_changes() {
        let (got, missing) = patch_header(WATER, &HeaderChanges::default());
        assert_eq!(got, WATER);
        assert!(missing.is_empty());
    }

    #[test]
    fn cores_and_mem() {
        let changes = HeaderChanges {
            cores: Some(16),
            mem_mb: Some(2000),
            route: None,
        };
        let (got, missing) = patch_header(WATER, &changes);
        let want = WATER
            .replace("%nprocshared=8", "%nprocshared=16")
            .replace("%mem=4GB", "%mem=2000MB");
        assert_eq!(got, want);
        assert!(missing.is_empty());
    }

    #[test]
    fn route() {
        let changes = HeaderChanges {
            route: Some(String::from("MP2/cc-pVTZ sp")),
            ..HeaderChanges::default()
        };
        let (got, _) = patch_header(WATER, &changes);
        assert_eq!(got.lines().nth(3), Some("# MP2/cc-pVTZ sp "));
        assert_eq!(got.lines().count(), WATER.lines().count());
    }

    #[test]
    fn first_match_wins() {
        let text = "%mem=1GB\n%mem=2GB\n# hf\n";
        let changes = HeaderChanges {
            mem_mb: Some(512),
            ..HeaderChanges::default()
        };
        let (got, _) = patch_header(text, &changes);
        assert_eq!(got, "%mem=512MB\n%mem=2GB\n# hf\n");
    }

    #[test]
    fn missing_directive() {
        let text = "%mem=1GB\n# hf\n\ntitle\n\n0 1\n H 0.0 0.0 0.0\n\n";
        let changes = HeaderChanges {
            cores: Some(4),
            ..HeaderChanges::default()
        };
        let (got, missing) = patch_header(text, &changes);
        assert_eq!(got, text);
        assert_eq!(missing, vec![CORES_DIRECTIVE]);
    }

    #[test]
    fn patch_in_place() {
        let dir = std::env::temp_dir()
            .join(format!("g09utils-link0-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("water.com");
        std::fs::copy("testfiles/water.com", &path).unwrap();

        let changes = HeaderChanges {
            cores: Some(2),
            ..HeaderChanges::default()
        };
        patch_file(&path, &changes).unwrap();
        let got = std::fs::read_to_string(&path).unwrap();
        assert!(got.contains("%nprocshared=2\n"));
        assert!(got.contains("%mem=4GB\n"));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn patch_many() {
        let dir = std::env::temp_dir()
            .join(format!("g09utils-link0-many-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let paths: Vec<_> = (0..4)
            .map(|i| {
                let path = dir.join(format!("water{i}.com"));
                std::fs::copy("testfiles/water.com", &path).unwrap();
                path
            })
            .collect();
        // the same file listed twice is only patched once
        let mut args = paths.clone();
        args.push(paths[0].clone());

        let changes = HeaderChanges {
            mem_mb: Some(1024),
            ..HeaderChanges::default()
        };
        patch_files(&args, &changes).unwrap();
        for path in &paths {
            let got = std::fs::read_to_string(path).unwrap();
            assert_eq!(got.lines().nth(2), Some("%mem=1024MB"));
        }

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_file() {
        let err = patch_file("testfiles/nope.com", &HeaderChanges::default())
            .unwrap_err();
        assert!(matches!(err, Error::Io { action: "read", .. }));
    }
}
