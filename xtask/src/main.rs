mod check_backends;

use anyhow::{bail, Result};
use std::env;

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();

    match run_command(&args) {
        Ok(()) => Ok(()),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Parse and run the command from command-line arguments
fn run_command(args: &[String]) -> Result<()> {
    if args.len() < 2 {
        bail!(
            "Usage: cargo xtask <command>\nCommands:\n  check-backends [--no-cross]  Build and test every back-end configuration"
        );
    }

    let command = &args[1];

    match command.as_str() {
        "check-backends" => {
            let options = check_backends::Options::parse(&args[2..])?;
            check_backends::run(options)
        }
        _ => bail!("Unknown command: {}", command),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_command_no_args() {
        let args = vec!["xtask".to_string()];
        let result = run_command(&args);
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("Usage"));
    }

    #[test]
    fn test_run_command_unknown() {
        let args = vec!["xtask".to_string(), "unknown".to_string()];
        let result = run_command(&args);
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("Unknown command"));
    }

    #[test]
    fn test_run_command_bad_option() {
        let args = vec![
            "xtask".to_string(),
            "check-backends".to_string(),
            "--fast".to_string(),
        ];
        let err = run_command(&args).unwrap_err().to_string();
        assert!(err.contains("--fast"));
    }

    #[test]
    fn test_run_command_empty_args() {
        let args: Vec<String> = vec![];
        let result = run_command(&args);
        assert!(result.is_err());
    }
}
