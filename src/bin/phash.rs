use std::fs::File;
use std::path::PathBuf;
use std::process::exit;

use clap::{Parser, ValueEnum};
use log::{error, info, warn};
use walkdir::WalkDir;

use batchpool::{hash32, hash64, BatchPool, Result, MAX_THREADS};

#[derive(Parser)]
#[command(name = "phash", version, about = "Parallel FNV-1a file hasher")]
struct Cli {
    /// Files or directories to hash (directories are walked recursively)
    #[arg(required = true, value_name = "PATH")]
    paths: Vec<PathBuf>,

    /// Number of worker threads (default: CPU count, capped at 32)
    #[arg(long, value_name = "N")]
    threads: Option<u32>,

    /// Hash variant
    #[arg(long, value_enum, default_value = "fnv64")]
    algo: Algo,
}

#[derive(Copy, Clone, ValueEnum)]
enum Algo {
    /// 32-bit FNV-1a, zero-extended
    Fnv32,
    /// 64-bit FNV-1a
    Fnv64,
}

fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Warn)
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        error!("{}", e);
        exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let threads = cli
        .threads
        .unwrap_or_else(|| (num_cpus::get() as u32).min(MAX_THREADS));

    let mut paths = Vec::new();
    let mut handles = Vec::new();
    for path in collect_files(&cli.paths) {
        match File::open(&path) {
            Ok(file) => {
                paths.push(path);
                handles.push(file);
            }
            Err(e) => warn!("Skipping {}: {}", path.display(), e),
        }
    }

    if handles.is_empty() {
        warn!("Nothing to hash");
        return Ok(());
    }

    info!("Hashing {} files on {} threads", handles.len(), threads);

    let executor = match cli.algo {
        Algo::Fnv32 => hash32 as fn(File) -> u64,
        Algo::Fnv64 => hash64 as fn(File) -> u64,
    };

    let mut pool = BatchPool::new(threads)?;
    let results = pool.execute(handles, executor)?;
    pool.close();

    for (path, hash) in paths.iter().zip(&results) {
        println!("{:016x}  {}", hash, path.display());
    }

    Ok(())
}

/// Expands the argument list into a flat file list, walking directories
/// recursively in filename order so output is deterministic.
fn collect_files(args: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for arg in args {
        if arg.is_dir() {
            for entry in WalkDir::new(arg).sort_by_file_name() {
                match entry {
                    Ok(entry) if entry.file_type().is_file() => {
                        files.push(entry.into_path());
                    }
                    Ok(_) => {}
                    Err(e) => warn!("Skipping directory entry: {}", e),
                }
            }
        } else {
            files.push(arg.clone());
        }
    }
    files
}
