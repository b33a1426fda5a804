use rbl::Result;

use std::{env, fs, path::PathBuf};

use anyhow::Context;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum InputArgsError {
    #[error("Couldn't parse input arguments: {0}")]
    Parse(String),

    #[error("Command script not found: {0}")]
    FileNotFound(String),
}

/// The first and only argument must be the path of a command script
pub fn parse_input_arg() -> Result<PathBuf> {
    let filename = env::args()
        .nth(1)
        .ok_or_else(|| InputArgsError::Parse("usage: room-bank-ledger <commands.csv>".to_string()))?;

    let path = fs::canonicalize(&filename).with_context(|| InputArgsError::FileNotFound(filename))?;

    Ok(path)
}
