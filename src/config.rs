use std::{fs::read_to_string, path::Path};

use serde::Deserialize;

use crate::{
    com::ComParams,
    error::{Error, Result},
};

pub const DEFAULT_PREFIX: &str = "g09_mol2_inp";

/// Defaults for `split_mol2`, loaded from a TOML file. anything missing from
/// the file keeps its built-in default, and command line flags override both.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Prefix for each generated `.com` file
    pub prefix: String,

    /// The `[com]` table
    pub com: ComParams,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_owned(),
            com: ComParams::default(),
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents =
            read_to_string(path).map_err(|e| Error::io("read", path, e))?;
        toml::from_str(&contents).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_partial() {
        let got = Config::load("testfiles/split.toml").unwrap();
        let want = Config {
            prefix: String::from("benzene"),
            com: ComParams {
                route: String::from("B3LYP/6-31G(d) opt freq"),
                cores: 16,
                ..ComParams::default()
            },
        };
        assert_eq!(got, want);
    }

    #[test]
    fn empty_is_default() {
        let got: Config = toml::from_str("").unwrap();
        assert_eq!(got, Config::default());
    }

    #[test]
    fn bad_type() {
        let path = std::env::temp_dir()
            .join(format!("g09utils-config-{}.toml", std::process::id()));
        std::fs::write(&path, "[com]\ncores = \"eight\"\n").unwrap();
        let err = Config::load(&path).unwrap_err();
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(err, Error::Config { .. }));
    }
}
