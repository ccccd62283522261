use clap::Parser;

/// Computes the results of a poll: tallies, percentages, display order, colors and pie geometry.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path) The poll snapshot to process.
    #[clap(short, long, value_parser)]
    pub input: String,

    /// (default json) The type of the input: json or csv. See the manual for both formats.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (file path, optional) A JSON file with the chart configuration (palette size, precisions,
    /// chart kind, toggles, rounding).
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (bar, pie, linear or circular) Overrides the chart kind of the configuration.
    #[clap(long, value_parser)]
    pub chart_kind: Option<String>,

    /// If passed as an argument, the percentages are left out of the labels.
    #[clap(long, takes_value = false)]
    pub hide_percentage: bool,

    /// If passed as an argument, the vote counts are left out of the labels.
    #[clap(long, takes_value = false)]
    pub hide_vote_count: bool,

    /// (file path, 'stdout' or empty) If specified, the view model of the chart will be written in JSON
    /// format to the given location.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference file containing the expected view model in JSON format. If provided,
    /// pollchart will check that the computed output matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// If passed as an argument, prints the rows of the chart as text.
    #[clap(long, takes_value = false)]
    pub summary: bool,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
