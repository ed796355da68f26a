use crate::{
    constants::DEFAULT_OUTPUT_PATH,
    io::readers::collect_vcf_dir,
    utils::util::Result,
};
use anyhow::anyhow;
use clap::{ArgAction, ArgGroup, Parser, Subcommand};
use env_logger::fmt::Color;
use log::{Level, LevelFilter};
use once_cell::sync::Lazy;
use std::{
    io::Write,
    path::{Path, PathBuf},
};

/// Full version string including the crate version and git description.
///
/// # Examples
/// * `0.1.0-1ba958a-dirty` - while on a dirty branch
/// * `0.1.0-1ba958a` - with a fresh commit
pub static FULL_VERSION: Lazy<String> = Lazy::new(|| {
    let git_describe = env!("VERGEN_GIT_DESCRIBE");
    if git_describe.is_empty() {
        env!("CARGO_PKG_VERSION").to_string()
    } else {
        format!("{}-{}", env!("CARGO_PKG_VERSION"), git_describe)
    }
});

#[derive(Parser, Debug)]
#[command(name="vex",
          version=&**FULL_VERSION,
          about="VEP consequence and population allele-frequency extractor",
          long_about = None,
          help_template = "{name} {version}\n{about-section}\n{usage-heading}\n    {usage}\n\n{all-args}",
          )]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Specify multiple times to increase verbosity level (e.g., -vv for more verbosity)
    #[arg(
        short = 'v',
        long = "verbose",
        action = ArgAction::Count,
        global = true
    )]
    pub verbosity: u8,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Extract(ExtractArgs),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Extract(_) => "extract",
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(group(
    ArgGroup::new("input")
        .required(true)
        .args(["vcf", "vcf_dir"]),
))]
#[command(arg_required_else_help(true))]
pub struct ExtractArgs {
    /// Input VCF file (from VEP+LoF); may be gzipped
    #[arg(
        short = 'i',
        long = "vcf",
        visible_alias = "input",
        value_name = "VCF",
        value_parser = check_file_exists
    )]
    pub vcf: Option<PathBuf>,

    /// Input directory containing VCF files (from VEP+LoF); VCFs may be gzipped
    #[arg(
        long = "vcf-dir",
        value_name = "DIR",
        value_parser = check_dir_exists
    )]
    pub vcf_dir: Option<PathBuf>,

    /// Write the output table to this path
    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        default_value = DEFAULT_OUTPUT_PATH,
        value_parser = check_prefix_path
    )]
    pub output: String,

    /// Process gnomAD data (adds the ASJ population column)
    #[arg(long = "gnomad")]
    pub gnomad: bool,

    /// Process all variants, not only HC LoFs
    #[arg(long = "allvars")]
    pub allvars: bool,

    /// Process noncanonical transcripts
    #[arg(long = "noncanonical")]
    pub noncanonical: bool,
}

impl ExtractArgs {
    /// Input files in processing order: the single --vcf, or every file in
    /// --vcf-dir whose name contains "vcf".
    pub fn process_vcf_paths(&self) -> Result<Vec<PathBuf>> {
        match (&self.vcf, &self.vcf_dir) {
            (Some(vcf), None) => Ok(vec![vcf.clone()]),
            (None, Some(dir)) => {
                let paths = collect_vcf_dir(dir)?;
                if paths.is_empty() {
                    return Err(crate::vex_error!(
                        "No VCF files found in directory {}",
                        dir.display()
                    ));
                }
                Ok(paths)
            }
            _ => unreachable!("Either --vcf or --vcf-dir is provided, never both"),
        }
    }
}

/// Initializes the verbosity level for logging based on the command-line arguments.
///
/// Sets up the logger with a specific verbosity level that is determined
/// by the number of occurrences of the `-v` or `--verbose` flag in the command-line arguments.
///
/// # Arguments
///
/// * `args` - A reference to the parsed command-line arguments.
pub fn init_verbose(args: &Cli) {
    let filter_level: LevelFilter = match args.verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    env_logger::Builder::from_default_env()
        .format(|buf, record| {
            let level = record.level();
            let mut style = buf.style();
            match record.level() {
                Level::Error => style.set_color(Color::Red),
                Level::Warn => style.set_color(Color::Yellow),
                Level::Info => style.set_color(Color::Green),
                Level::Debug => style.set_color(Color::Blue),
                Level::Trace => style.set_color(Color::Cyan),
            };

            writeln!(
                buf,
                "{} [{}] {} - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                style.value(level),
                record.module_path().unwrap_or("unknown_module"),
                record.args()
            )
        })
        .filter_level(filter_level)
        .init();
}

/// Checks if the provided file path exists.
///
/// # Arguments
///
/// * `s` - A string slice representing the file path to check.
///
/// # Returns
///
/// Returns a `Result<PathBuf>` which is Ok if the file exists, or an Err with a descriptive message if not.
fn check_file_exists(s: &str) -> anyhow::Result<PathBuf> {
    let path = Path::new(s);
    if !path.exists() {
        return Err(anyhow!("File does not exist: {}", path.display()));
    }
    Ok(path.to_path_buf())
}

fn check_dir_exists(s: &str) -> anyhow::Result<PathBuf> {
    let path = Path::new(s);
    if !path.is_dir() {
        return Err(anyhow!("Directory does not exist: {}", path.display()));
    }
    Ok(path.to_path_buf())
}

fn check_prefix_path(s: &str) -> anyhow::Result<String> {
    let path = Path::new(s);
    if let Some(parent_dir) = path.parent() {
        if !parent_dir.as_os_str().is_empty() && !parent_dir.exists() {
            return Err(anyhow!("Path does not exist: {}", parent_dir.display()));
        }
    }
    Ok(s.to_string())
}
