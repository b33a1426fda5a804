use rbl::Result;

use std::{fs::File, path::Path};

use csv::{Reader, ReaderBuilder, Trim};

/// Headers are required; short rows are allowed so trailing empty columns can be omitted
pub fn build_csv_reader(filepath: &Path) -> Result<Reader<File>> {
    let reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_path(filepath)?;

    return Ok(reader);
}
