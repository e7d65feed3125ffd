//! Change the resource requests, and optionally the route card, of existing
//! Gaussian `.com` files in place.

use std::process::exit;

use clap::Parser;
use g09utils::link0::{patch_files, HeaderChanges};

#[derive(Parser)]
#[command(about = "Modify the header of one or more g09 .com files")]
struct Cli {
    /// Number of cores for g09 to use.
    #[arg(long)]
    cores: Option<usize>,

    /// Amount of memory, in megabytes, to use.
    #[arg(long)]
    mem: Option<usize>,

    /// g09 job parameters to replace the route card with. Use quotes to
    /// enclose spaces.
    #[arg(long)]
    route: Option<String>,

    /// The number of threads to use. Defaults to the number of logical CPUs as
    /// detected by rayon.
    #[arg(short, long, default_value_t = 0)]
    threads: usize,

    /// The .com files to modify.
    #[arg(required = true)]
    files: Vec<String>,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let changes = HeaderChanges {
        cores: cli.cores,
        mem_mb: cli.mem,
        route: cli.route,
    };

    if changes.is_empty() {
        println!("No changes to files specified, exiting");
        return;
    }

    if let Err(e) = rayon::ThreadPoolBuilder::new()
        .num_threads(cli.threads)
        .build_global()
    {
        eprintln!("error: failed to build thread pool: {e}");
        exit(1);
    }

    if let Err(e) = patch_files(&cli.files, &changes) {
        eprintln!("error: {e}");
        exit(1);
    }
}
