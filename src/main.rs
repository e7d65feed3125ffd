//! Split a multi-molecule mol2 file into one Gaussian `.com` input per
//! molecule

use std::process::exit;

use clap::Parser;
use g09utils::{com::ComParams, config::Config, split_file};
use log::info;

#[derive(Parser)]
#[command(about = "Split up a mol2 file into .com g09 input files")]
struct Cli {
    /// The mol2 file to split.
    mol2: String,

    /// Memory, including unit, for each created .com file. Default 4GB
    #[arg(long)]
    mem: Option<String>,

    /// Cores for each created .com file. Default 8
    #[arg(long)]
    cores: Option<usize>,

    /// Computational parameters for the route card. Use quotes to enclose
    /// spaces.
    #[arg(long)]
    route: Option<String>,

    /// Charge for the molecular input specification. Default 0
    #[arg(long, allow_negative_numbers = true)]
    charge: Option<isize>,

    /// Multiplicity for the molecular input specification. Default 1
    #[arg(long)]
    mult: Option<usize>,

    /// Prefix for each .com file created. Default g09_mol2_inp
    #[arg(long)]
    prefix: Option<String>,

    /// Directory to write the .com files to.
    #[arg(short, long, default_value = ".")]
    output_dir: String,

    /// TOML file supplying defaults for any of the options above, with
    /// `prefix` at the top level and the rest in a `[com]` table.
    #[arg(short, long)]
    config: Option<String>,
}

impl Cli {
    /// resolve the prefix and `.com` parameters. flags take precedence over
    /// the config file, which takes precedence over the built-in defaults
    fn resolve(self) -> g09utils::Result<(String, ComParams)> {
        let Config { prefix, com } = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        let params = ComParams {
            route: self.route.unwrap_or(com.route),
            cores: self.cores.unwrap_or(com.cores),
            memory: self.mem.unwrap_or(com.memory),
            charge: self.charge.unwrap_or(com.charge),
            multiplicity: self.mult.unwrap_or(com.multiplicity),
        };
        Ok((self.prefix.unwrap_or(prefix), params))
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let input = cli.mol2.clone();
    let output_dir = cli.output_dir.clone();
    let (prefix, params) = match cli.resolve() {
        Ok(v) => v,
        Err(e) => {
            eprintln!("error: {e}");
            exit(1);
        }
    };

    match split_file(&input, &params, &prefix, &output_dir) {
        Ok(written) => {
            info!("wrote {} .com files to {output_dir}", written.len())
        }
        Err(e) => {
            eprintln!("error: {e}");
            exit(1);
        }
    }
}
