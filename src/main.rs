mod args;
mod config;
mod reader;
mod replay;
mod writer;

use rbl::input::InputCommand;
use rbl::Result;

use replay::Replay;

use std::sync::Arc;

fn main() -> Result {
    let ledger_config = config::configure_app()?;

    log::debug!("Application configured. Beginning replay...");

    let store = Arc::new(rbl::store::MemoryStore::new());
    let mut replay = Replay::new(rbl::build_services(store, ledger_config));

    process_data(&mut replay)?;

    log::debug!("Replay complete. Beginning report...");

    report_to_std_out(&replay)?;

    log::debug!("Application finished successfully!");

    Ok(())
}

/// Read the command script and apply every row; bad rows are logged and skipped
fn process_data(replay: &mut Replay) -> Result {
    let input_path = args::parse_input_arg()?;
    log::debug!("Found filepath as input arg: {input_path:?}");

    let mut rdr = reader::build_csv_reader(&input_path)?;

    log::debug!("Deserializing reader...");
    for record in rdr.deserialize::<InputCommand>() {
        log::debug!("Parsing record into InputCommand: {record:?}");
        let input_command = match record {
            Ok(input_command) => input_command,
            Err(e) => {
                log::warn!("{e}");
                continue;
            }
        };

        let command = match input_command.parse_command() {
            Ok(command) => command,
            Err(e) => {
                log::warn!("{e}");
                continue;
            }
        };

        log::debug!("Applying command: {command:?}");
        if let Err(e) = replay.apply(command) {
            log::warn!("{e}");
        }
    }

    Ok(())
}

/// Build report from results, and write report to stdout
fn report_to_std_out(replay: &Replay) -> Result {
    let report = replay.report()?;
    log::debug!("Successfully built report rows for {} players", report.len());

    let output = writer::write_report(&report)?;

    print!("{output}");

    Ok(())
}
