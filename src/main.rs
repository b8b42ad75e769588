// src/main.rs

//! Command-line wrapper: encrypt or decrypt a file with a password.

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "ctrcrypt",
    version,
    about = "Encrypt or decrypt files with a password",
    group = clap::ArgGroup::new("mode").required(true).args(["encrypt", "decrypt"])
)]
struct Args {
    /// Input file
    #[arg(short = 'i', value_name = "PATH")]
    input: PathBuf,

    /// Output file (defaults to the input with extension .secure or .txt)
    #[arg(short = 'o', value_name = "PATH")]
    output: Option<PathBuf>,

    /// Encrypt the input
    #[arg(short = 'e')]
    encrypt: bool,

    /// Decrypt the input
    #[arg(short = 'd')]
    decrypt: bool,

    /// Password (for scripted use; interactive prompting is safer)
    #[arg(short = 'p', value_name = "PASSWORD")]
    password: Option<String>,

    /// Silent: never prompt (requires -p)
    #[arg(short = 's', requires = "password")]
    silent: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    if !args.input.is_file() {
        bail!("input file {} does not exist", args.input.display());
    }
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output(&args.input, args.encrypt));
    if output.exists() && !args.silent && !confirm_overwrite(&output)? {
        bail!("aborted: {} left untouched", output.display());
    }

    let password = resolve_password(&args)?;

    if args.encrypt {
        ctrcrypt::encrypt_file(args.input.clone())
            .with_password(password)
            .into_file(&output)
            .with_context(|| format!("encrypting {}", args.input.display()))?;
    } else {
        ctrcrypt::decrypt_file(args.input.clone())
            .with_password(password)
            .into_file(&output)
            .with_context(|| format!("decrypting {}", args.input.display()))?;
    }
    Ok(())
}

fn default_output(input: &Path, encrypting: bool) -> PathBuf {
    input.with_extension(if encrypting { "secure" } else { "txt" })
}

fn resolve_password(args: &Args) -> Result<String> {
    if let Some(password) = &args.password {
        return Ok(password.clone());
    }
    // -s without -p is rejected by clap, so prompting is allowed here
    let password = rpassword::prompt_password("Password: ")?;
    if password.is_empty() {
        bail!("password must not be empty");
    }
    if args.encrypt {
        let confirm = rpassword::prompt_password("Confirm password: ")?;
        if password != confirm {
            bail!("passwords do not match");
        }
    }
    Ok(password)
}

fn confirm_overwrite(path: &Path) -> Result<bool> {
    print!("{} exists, overwrite? [y/N] ", path.display());
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    let answer = answer.trim().to_ascii_lowercase();
    Ok(answer == "y" || answer == "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_output_extensions() {
        let input = Path::new("notes.txt");
        assert_eq!(default_output(input, true), PathBuf::from("notes.secure"));
        let secret = Path::new("notes.secure");
        assert_eq!(default_output(secret, false), PathBuf::from("notes.txt"));
    }

    #[test]
    fn extensionless_input_gains_extension() {
        let input = Path::new("notes");
        assert_eq!(default_output(input, true), PathBuf::from("notes.secure"));
    }
}
