use rbl::reports::PlayerReport;
use rbl::Result;

use csv::Writer;

pub fn write_report(rows: &[PlayerReport]) -> Result<String> {
    let mut writer = Writer::from_writer(vec![]);

    for row in rows {
        log::debug!("Serializing report row: {row:?}");
        writer.serialize(row)?;
    }

    let utf8 = writer.into_inner()?;
    let string = String::from_utf8(utf8)?;

    return Ok(string);
}
