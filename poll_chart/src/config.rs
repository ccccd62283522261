// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// One answer of a poll, as supplied by the storage layer.
///
/// `votes` may be missing in malformed snapshots. Missing and negative counts
/// are both treated as zero by the engine.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct PollOption {
    pub id: String,
    pub text: String,
    pub votes: Option<i64>,
}

/// A poll snapshot. The options are kept in insertion order and are never
/// reordered by the engine.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Poll {
    pub id: String,
    pub question: String,
    pub options: Vec<PollOption>,
}

// ******** Output data structures *********

/// A percentage stored as a fixed-point number: `units / 10^precision`.
///
/// Keeping the value as an integer makes the angular layout exact and rules out
/// `NaN` values.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub struct Percentage {
    pub(crate) units: u64,
    pub(crate) precision: u32,
}

impl Percentage {
    pub const fn zero(precision: u32) -> Percentage {
        Percentage {
            units: 0,
            precision,
        }
    }

    /// The number of `10^-precision` steps. `556` for `55.6` at precision 1.
    pub fn units(&self) -> u64 {
        self.units
    }

    /// The number of decimal places.
    pub fn precision(&self) -> u32 {
        self.precision
    }

    pub fn value(&self) -> f64 {
        self.units as f64 / scale(self.precision) as f64
    }

    pub fn is_zero(&self) -> bool {
        self.units == 0
    }
}

/// Formats with exactly `precision` decimals: `56`, `55.6`, `100.0`.
impl Display for Percentage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = scale(self.precision);
        let whole = self.units / s;
        if self.precision == 0 {
            write!(f, "{}", whole)
        } else {
            let frac = self.units % s;
            write!(
                f,
                "{}.{:0width$}",
                whole,
                frac,
                width = self.precision as usize
            )
        }
    }
}

pub(crate) fn scale(precision: u32) -> u64 {
    10u64.pow(precision)
}

/// An option placed in display order.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RankedOption {
    pub option: PollOption,
    /// 0-based position in the display order.
    pub rank: usize,
    pub color_index: usize,
    /// The normalized tally.
    pub votes: u64,
    pub percentage: Percentage,
}

/// One wedge of a circular chart, in degrees.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct Segment {
    pub start_angle_deg: f64,
    pub sweep_angle_deg: f64,
}

impl Segment {
    pub fn end_angle_deg(&self) -> f64 {
        self.start_angle_deg + self.sweep_angle_deg
    }
}

/// The width of one bar of a linear chart, as a fraction of the full width.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct BarLayout {
    pub width_fraction: f64,
}

/// Everything a renderer needs to draw the results of a poll.
#[derive(PartialEq, Debug, Clone)]
pub struct ChartViewModel {
    pub chart_kind: ChartKind,
    pub total_votes: u64,
    pub is_empty: bool,
    /// All the options, in display order. Never a subset of the poll options.
    pub ranked_options: Vec<RankedOption>,
    /// Only present for circular charts.
    pub segments: Option<Vec<Segment>>,
    /// Only present for linear charts.
    pub bars: Option<Vec<BarLayout>>,
}

/// A render-ready line of the legend (circular) or of the bar list (linear).
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ChartRow {
    pub option_id: String,
    pub text: String,
    pub color_index: usize,
    /// `None` when both the vote count and the percentage are hidden.
    pub label: Option<String>,
}

/// Errors raised while assembling the inputs of the engine.
///
/// The engine itself never fails once it has a valid configuration.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum ChartErrors {
    PaletteTooSmall(usize),
    PrecisionTooLarge(u32),
    EmptyOptionId,
    DuplicateOptionId(String),
}

impl Error for ChartErrors {}

impl Display for ChartErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChartErrors::PaletteTooSmall(n) => write!(
                f,
                "palette size {} is too small (at least {} colors are required)",
                n, MIN_PALETTE_SIZE
            ),
            ChartErrors::PrecisionTooLarge(p) => write!(
                f,
                "precision {} is too large (at most {} decimal places)",
                p, MAX_PRECISION
            ),
            ChartErrors::EmptyOptionId => write!(f, "poll option with an empty id"),
            ChartErrors::DuplicateOptionId(id) => {
                write!(f, "poll option id {:?} is used more than once", id)
            }
        }
    }
}

// ********* Configuration **********

pub const MIN_PALETTE_SIZE: usize = 8;
pub const MAX_PRECISION: u32 = 6;

/// The color identifiers cycled across ranked options.
pub const DEFAULT_PALETTE: [&str; 8] = [
    "blue", "green", "yellow", "purple", "pink", "indigo", "red", "orange",
];

/// The layout of the chart. It selects the rounding precision and whether the
/// pie layout runs at all.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum ChartKind {
    /// Horizontal bars.
    Linear,
    /// Pie (donut) chart.
    Circular,
}

/// How percentages are rounded.
///
/// - Independent rounds every option on its own. The rounded figures may not
/// add up to exactly 100 (`{10, 5, 3}` gives `56 + 28 + 17 = 101`).
///
/// - LargestRemainder distributes the rounding so that the figures always add
/// up to exactly 100. This changes the figures of some options compared to the
/// independent rounding.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum RoundingMode {
    Independent,
    LargestRemainder,
}

/// The numeric settings of the engine.
///
/// The fields are only reachable through [ChartConfig::new] so that every
/// instance is valid.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub struct ChartConfig {
    palette_size: usize,
    linear_precision: u32,
    circular_precision: u32,
}

impl ChartConfig {
    pub const DEFAULT_CONFIG: ChartConfig = ChartConfig {
        palette_size: DEFAULT_PALETTE.len(),
        linear_precision: 0,
        circular_precision: 1,
    };

    pub fn new(
        palette_size: usize,
        linear_precision: u32,
        circular_precision: u32,
    ) -> Result<ChartConfig, ChartErrors> {
        if palette_size < MIN_PALETTE_SIZE {
            return Err(ChartErrors::PaletteTooSmall(palette_size));
        }
        for p in [linear_precision, circular_precision] {
            if p > MAX_PRECISION {
                return Err(ChartErrors::PrecisionTooLarge(p));
            }
        }
        Ok(ChartConfig {
            palette_size,
            linear_precision,
            circular_precision,
        })
    }

    pub fn palette_size(&self) -> usize {
        self.palette_size
    }

    pub fn linear_precision(&self) -> u32 {
        self.linear_precision
    }

    pub fn circular_precision(&self) -> u32 {
        self.circular_precision
    }

    /// The number of decimal places used for the given kind of chart.
    pub fn precision_for(&self, kind: ChartKind) -> u32 {
        match kind {
            ChartKind::Linear => self.linear_precision,
            ChartKind::Circular => self.circular_precision,
        }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        ChartConfig::DEFAULT_CONFIG
    }
}

/// What the caller wants to see.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub struct DisplayOptions {
    pub chart_kind: ChartKind,
    pub show_percentage: bool,
    pub show_vote_count: bool,
    pub rounding: RoundingMode,
}

impl DisplayOptions {
    pub const DEFAULT_OPTIONS: DisplayOptions = DisplayOptions {
        chart_kind: ChartKind::Linear,
        show_percentage: true,
        show_vote_count: true,
        rounding: RoundingMode::Independent,
    };

    pub fn with_kind(chart_kind: ChartKind) -> DisplayOptions {
        DisplayOptions {
            chart_kind,
            ..DisplayOptions::DEFAULT_OPTIONS
        }
    }
}

impl Default for DisplayOptions {
    fn default() -> Self {
        DisplayOptions::DEFAULT_OPTIONS
    }
}

/// The default color identifier for a color index, cycling through
/// [DEFAULT_PALETTE].
///
/// The names only match the color indexes one to one when the configuration
/// uses the default palette size. Larger palettes need their own names.
pub fn palette_color(color_index: usize) -> &'static str {
    DEFAULT_PALETTE[color_index % DEFAULT_PALETTE.len()]
}
