// Primitives for reading CSV files.

use poll_chart::builder::Builder;

use crate::chart::{
    io_common::{simplify_file_name, votes_from_text},
    *,
};

/// Reads a poll with one `id,text,votes` row per option, after a header row.
pub fn read_csv_poll(path: &str) -> ChartResult<Poll> {
    let rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;

    let mut builder = Builder::new(&simplify_file_name(path), "");
    for (idx, line_r) in rdr.into_records().enumerate() {
        // The header is line 1.
        let lineno = idx + 2;
        let line = line_r.context(CsvLineParseSnafu { lineno })?;
        debug!("read_csv_poll: lineno: {:?} row: {:?}", lineno, line);

        let id = line.get(0).context(CsvLineTooShortSnafu { lineno })?;
        let text = line.get(1).context(CsvLineTooShortSnafu { lineno })?;
        let votes = line.get(2).and_then(|cell| votes_from_text(cell, id));

        builder
            .add_option(id.trim(), text.trim(), votes)
            .context(InvalidPollSnafu {})?;
    }
    Ok(builder.build())
}
