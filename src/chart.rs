use log::{debug, info, warn};

use poll_chart::labels::{combined_label, EMPTY_STATE_MESSAGE, TITLE};
use poll_chart::*;
use snafu::{prelude::*, Snafu};

use std::fs;

use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::chart::config_reader::*;

pub mod config_reader;
mod io_common;
mod io_csv;
mod io_json;

#[derive(Debug, Snafu)]
pub enum ChartError {
    #[snafu(display("Error opening file {path}"))]
    OpeningFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error writing file {path}"))]
    WritingFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON in {path}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error serializing the view model"))]
    SerializingJson { source: serde_json::Error },
    #[snafu(display("Error opening CSV file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading CSV line {lineno}"))]
    CsvLineParse { source: csv::Error, lineno: usize },
    #[snafu(display("CSV line {lineno} needs at least an id and a text"))]
    CsvLineTooShort { lineno: usize },
    #[snafu(display("Invalid poll"))]
    InvalidPoll { source: ChartErrors },
    #[snafu(display("Invalid chart configuration"))]
    InvalidConfig { source: ChartErrors },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type ChartResult<T> = Result<T, ChartError>;

fn chart_kind_name(kind: ChartKind) -> &'static str {
    match kind {
        ChartKind::Linear => "linear",
        ChartKind::Circular => "circular",
    }
}

/// The name of a color index. Indexes are always below the palette size.
fn color_name(palette: &[String], color_index: usize) -> &str {
    palette.get(color_index).map(|s| s.as_str()).unwrap_or("")
}

/// The JSON form of the view model, as written by `--out` and compared by `--reference`.
pub fn view_model_to_json(
    poll: &Poll,
    vm: &ChartViewModel,
    display: &DisplayOptions,
    palette: &[String],
) -> JSValue {
    let ranked: Vec<JSValue> = vm
        .ranked_options
        .iter()
        .map(|ro| {
            json!({
                "id": ro.option.id,
                "text": ro.option.text,
                "rank": ro.rank,
                "colorIndex": ro.color_index,
                "color": color_name(palette, ro.color_index),
                "votes": ro.votes,
                "percentage": ro.percentage.value(),
            })
        })
        .collect();

    let rows: Vec<JSValue> = vm
        .rows(display)
        .iter()
        .map(|r| {
            json!({
                "optionId": r.option_id,
                "text": r.text,
                "colorIndex": r.color_index,
                "label": r.label,
            })
        })
        .collect();

    let mut res = json!({
        "poll": {"id": poll.id, "question": poll.question},
        "chartKind": chart_kind_name(vm.chart_kind),
        "totalVotes": vm.total_votes,
        "isEmpty": vm.is_empty,
        "rankedOptions": ranked,
        "rows": rows,
    });

    if let Some(segments) = &vm.segments {
        let js: Vec<JSValue> = segments
            .iter()
            .map(|s| json!({"startAngleDeg": s.start_angle_deg, "sweepAngleDeg": s.sweep_angle_deg}))
            .collect();
        res["segments"] = json!(js);
    }
    if let Some(bars) = &vm.bars {
        let js: Vec<JSValue> = bars
            .iter()
            .map(|b| json!({"widthFraction": b.width_fraction}))
            .collect();
        res["bars"] = json!(js);
    }
    if let Some(l) = vm.center_label() {
        res["centerLabel"] = json!(l);
    }
    if let Some(c) = vm.caption() {
        res["caption"] = json!(c);
    }
    res
}

/// The chart as lines of text: title, question, then one line per row.
pub fn format_summary(
    poll: &Poll,
    vm: &ChartViewModel,
    display: &DisplayOptions,
    palette: &[String],
) -> String {
    let mut lines: Vec<String> = vec![TITLE.to_string()];
    if !poll.question.is_empty() {
        lines.push(poll.question.clone());
    }
    if vm.is_empty {
        lines.push(EMPTY_STATE_MESSAGE.to_string());
        return lines.join("\n");
    }
    for ro in vm.ranked_options.iter() {
        let line = match combined_label(ro.votes, &ro.percentage, display) {
            Some(label) => format!(
                "[{}] {}: {}",
                color_name(palette, ro.color_index),
                ro.option.text,
                label
            ),
            None => format!(
                "[{}] {}",
                color_name(palette, ro.color_index),
                ro.option.text
            ),
        };
        lines.push(line);
    }
    if let Some(l) = vm.center_label() {
        lines.push(l);
    }
    if let Some(c) = vm.caption() {
        lines.push(c);
    }
    lines.join("\n")
}

pub fn read_poll(path: &str, input_type: Option<&str>) -> ChartResult<Poll> {
    match input_type.unwrap_or("json") {
        "json" => io_json::read_json_poll(path),
        "csv" => io_csv::read_csv_poll(path),
        x => whatever!("Cannot read input type {:?}: expected json or csv", x),
    }
}

fn read_reference(path: &str) -> ChartResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningFileSnafu { path })?;
    serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })
}

/// The configuration file, then the command line flags on top of it.
fn resolve_config(args: &Args) -> ChartResult<(ChartConfig, DisplayOptions, Vec<String>)> {
    let settings = match &args.config {
        Some(p) => read_settings(p)?,
        None => ChartSettings::default(),
    };
    info!("resolve_config: settings: {:?}", settings);
    let (config, mut display, palette) = validate_config(&settings)?;
    if let Some(k) = &args.chart_kind {
        display.chart_kind = parse_chart_kind(k)?;
    }
    if args.hide_percentage {
        display.show_percentage = false;
    }
    if args.hide_vote_count {
        display.show_vote_count = false;
    }
    Ok((config, display, palette))
}

pub fn run_chart(args: &Args) -> ChartResult<()> {
    let (config, display, palette) = resolve_config(args)?;
    let poll = read_poll(args.input.as_str(), args.input_type.as_deref())?;
    debug!("run_chart: poll: {:?}", poll);

    let vm = compute_chart(&poll, &config, &display);
    info!(
        "run_chart: {} options, {} votes",
        vm.ranked_options.len(),
        vm.total_votes
    );

    let result_js = view_model_to_json(&poll, &vm, &display, &palette);
    let pretty_js = serde_json::to_string_pretty(&result_js).context(SerializingJsonSnafu {})?;

    match args.out.as_deref() {
        None | Some("") => {}
        Some("stdout") => println!("{}", pretty_js),
        Some(p) => fs::write(p, pretty_js.as_bytes()).context(WritingFileSnafu { path: p })?,
    }

    if args.summary {
        println!("{}", format_summary(&poll, &vm, &display, &palette));
    }

    // The reference view model, if provided for comparison
    if let Some(ref_p) = &args.reference {
        let reference = read_reference(ref_p)?;
        let pretty_js_ref =
            serde_json::to_string_pretty(&reference).context(SerializingJsonSnafu {})?;
        if pretty_js_ref != pretty_js {
            warn!("Found differences with the reference view model");
            print_diff(pretty_js_ref.as_str(), pretty_js.as_str(), "\n");
            whatever!("Difference detected between the computed view model and the reference")
        }
    }

    Ok(())
}
