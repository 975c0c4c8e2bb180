//! Shell completion scripts for `tales`.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use clap::CommandFactory;
use clap_complete::{generate, Shell};

use crate::cli::Cli;
use crate::error::CliError;

const BIN_NAME: &str = "tales";

pub fn write_completions(shell: Shell, out: &mut dyn Write) {
    generate(shell, &mut Cli::command(), BIN_NAME, out);
}

/// Print the script for `shell`, or save it to `output_path` and print the path.
pub fn run_completions(shell: Shell, output_path: Option<&Path>) -> Result<(), CliError> {
    if let Some(path) = output_path {
        let mut file = BufWriter::new(File::create(path)?);
        write_completions(shell, &mut file);
        file.flush()?;
        println!("{}", path.display());
    } else {
        let mut stdout = io::stdout().lock();
        write_completions(shell, &mut stdout);
        stdout.flush()?;
    }

    Ok(())
}
