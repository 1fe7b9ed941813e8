use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use pincheck::{Index, Record};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "pincheck", about = "Offline pincode / post office lookup")]
struct Cli {
    /// Path to the pincode CSV dataset
    #[arg(long, value_name = "CSV")]
    data: PathBuf,

    /// Emit results as JSON instead of text
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Look up the post office for a 6-digit pincode
    Code { pin: String },
    /// Look up the pincode for a post office name (case-insensitive)
    Office { name: String },
    /// List the districts of a state
    Districts { state: String },
    /// List the offices of a (state, district) pair, in dataset order
    Offices { state: String, district: String },
}

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let cli = Cli::parse();
    let index = Index::load(&cli.data)
        .with_context(|| format!("loading dataset from {}", cli.data.display()))?;
    info!(codes = index.len(), "dataset ready");

    match &cli.command {
        Command::Code { pin } => {
            validate_pin(pin)?;
            match index.find_by_code(pin) {
                Some(record) => print_record(record, cli.json)?,
                None => print_miss("Pincode not found in local database.", cli.json),
            }
        }
        Command::Office { name } => match index.find_by_office_name(name) {
            Some(record) => print_record(record, cli.json)?,
            None => print_miss("Post Office not found in local database.", cli.json),
        },
        Command::Districts { state } => {
            let mut districts: Vec<&str> = index.list_districts(state).collect();
            districts.sort_unstable();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&districts)?);
            } else {
                for district in districts {
                    println!("{district}");
                }
            }
        }
        Command::Offices { state, district } => {
            let offices = index.list_offices(state, district);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(offices)?);
            } else {
                for office in offices {
                    println!("{}  {}", office.code, office.office_name);
                }
            }
        }
    }

    Ok(())
}

/// Pincode format check, a presentation-layer concern: the index itself only
/// does exact string matching.
fn validate_pin(pin: &str) -> Result<()> {
    if pin.len() != 6 || !pin.chars().all(|c| c.is_ascii_digit()) {
        bail!("invalid pincode `{pin}`: enter exactly 6 digits");
    }
    Ok(())
}

fn print_record(record: &Record, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(record)?);
    } else {
        println!("Pincode: {}", record.code);
        println!("Officename: {}", record.office_name);
        println!("District: {}", record.district);
        println!("State: {}", record.state);
    }
    Ok(())
}

// "Not found" is a normal outcome, not an error: message on stdout, exit 0.
fn print_miss(message: &str, json: bool) {
    if json {
        println!("null");
    } else {
        println!("{message}");
    }
}

#[cfg(test)]
mod tests {
    use super::validate_pin;

    #[test]
    fn six_digits_pass() {
        assert!(validate_pin("560001").is_ok());
    }

    #[test]
    fn wrong_length_or_non_digits_fail() {
        for bad in ["56001", "5600011", "56000a", "", " 560001", "५६०००१"] {
            assert!(validate_pin(bad).is_err(), "{bad:?} should be rejected");
        }
    }
}
