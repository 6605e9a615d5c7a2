use clap::Parser;
use clap_verbosity_flag::{Verbosity, WarnLevel};
use std::path::{Path, PathBuf};

/// Emitrend: project emission inventories from their historical trend
///
/// Emitrend loads yearly vintages of an emission inventory, reconciles their
/// category groups, fits a linear trend between the two latest vintages and
/// scales the latest one to the target year.
#[derive(Debug, Parser, Clone)]
#[command(about, long_about, version)]
pub struct Cli {
    /// Path to configuration file.
    #[arg(short, long, value_parser = validate_file)]
    #[arg(required_unless_present = "print_default_config")]
    pub conffile: Option<PathBuf>,

    /// Print the report as JSON instead of tables and charts.
    #[arg(short, long)]
    pub json: bool,

    /// Write the projected inventory as CSV to this path.
    #[arg(short, long, value_parser = validate_output)]
    pub output: Option<PathBuf>,

    /// Print a loadable configuration template as TOML and exit.
    #[arg(long)]
    pub print_default_config: bool,

    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,
}

/// Check if the file exists.
#[inline(always)]
fn validate_file(file: &str) -> Result<PathBuf, String> {
    let path = Path::new(file);
    if path.is_file() {
        Ok(path.to_owned())
    } else {
        Err(format!("File not found: {:?}", path))
    }
}

/// Check that the output's directory exists.
#[inline(always)]
fn validate_output(file: &str) -> Result<PathBuf, String> {
    let path = Path::new(file);
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() && !dir.is_dir() => {
            Err(format!("Directory not found: {:?}", dir))
        }
        _ => Ok(path.to_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn conffile_is_required() {
        assert!(Cli::try_parse_from(["emitrend"]).is_err());
        let cli = Cli::try_parse_from(["emitrend", "--print-default-config"]).unwrap();
        assert!(cli.print_default_config);
        assert!(cli.conffile.is_none());
    }

    #[test]
    fn rejects_missing_files() {
        assert!(validate_file("/definitely/not/here.toml").is_err());
        assert!(validate_output("/definitely/not/here.csv").is_err());
        assert!(validate_output("projected.csv").is_ok());
    }
}
