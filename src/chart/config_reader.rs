use crate::chart::*;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// The chart configuration file. Every key is optional.
#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChartSettings {
    #[serde(rename = "paletteSize")]
    pub palette_size: Option<usize>,
    #[serde(rename = "linearPrecision")]
    pub linear_precision: Option<u32>,
    #[serde(rename = "circularPrecision")]
    pub circular_precision: Option<u32>,
    #[serde(rename = "chartKind")]
    pub chart_kind: Option<String>,
    #[serde(rename = "showPercentage")]
    pub show_percentage: Option<bool>,
    #[serde(rename = "showVoteCount")]
    pub show_vote_count: Option<bool>,
    #[serde(rename = "rounding")]
    pub rounding: Option<String>,
    /// Color names, one per color index. Defaults to the 8 default names.
    #[serde(rename = "palette")]
    pub palette: Option<Vec<String>>,
}

pub fn read_settings(path: &str) -> ChartResult<ChartSettings> {
    let contents = fs::read_to_string(path).context(OpeningFileSnafu { path })?;
    debug!("read_settings: read content: {:?}", contents);
    serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })
}

pub fn parse_chart_kind(kind: &str) -> ChartResult<ChartKind> {
    match kind {
        "bar" | "linear" => Ok(ChartKind::Linear),
        "pie" | "circular" => Ok(ChartKind::Circular),
        x => whatever!("Unknown chart kind {:?}: expected bar, pie, linear or circular", x),
    }
}

fn parse_rounding(mode: &str) -> ChartResult<RoundingMode> {
    match mode {
        "independent" => Ok(RoundingMode::Independent),
        "largestRemainder" => Ok(RoundingMode::LargestRemainder),
        x => whatever!(
            "Unknown rounding mode {:?}: expected independent or largestRemainder",
            x
        ),
    }
}

/// The names of the colors, resolved against the palette size.
///
/// Without a `palette` key, the default names cover at most 8 colors. With it,
/// `paletteSize` may be left out and must otherwise match the number of names.
fn resolve_palette(settings: &ChartSettings) -> ChartResult<(usize, Vec<String>)> {
    match (&settings.palette, settings.palette_size) {
        (Some(names), Some(size)) if size != names.len() => whatever!(
            "paletteSize is {} but the palette has {} colors",
            size,
            names.len()
        ),
        (Some(names), _) => {
            let distinct: HashSet<&String> = names.iter().collect();
            if distinct.len() != names.len() {
                whatever!("The palette names must be distinct: {:?}", names)
            }
            Ok((names.len(), names.clone()))
        }
        (None, Some(size)) if size > DEFAULT_PALETTE.len() => whatever!(
            "paletteSize {} needs a palette with {} color names (only {} default colors)",
            size,
            size,
            DEFAULT_PALETTE.len()
        ),
        (None, size_o) => {
            let size = size_o.unwrap_or(ChartConfig::DEFAULT_CONFIG.palette_size());
            let names = DEFAULT_PALETTE[..size.min(DEFAULT_PALETTE.len())]
                .iter()
                .map(|n| n.to_string())
                .collect();
            Ok((size, names))
        }
    }
}

/// Turns the settings into the engine configuration, filling the gaps with the defaults.
///
/// The palette has exactly `palette_size` names.
pub fn validate_config(
    settings: &ChartSettings,
) -> ChartResult<(ChartConfig, DisplayOptions, Vec<String>)> {
    let defaults = ChartConfig::DEFAULT_CONFIG;
    let (palette_size, palette) = resolve_palette(settings)?;
    let config = ChartConfig::new(
        palette_size,
        settings
            .linear_precision
            .unwrap_or(defaults.linear_precision()),
        settings
            .circular_precision
            .unwrap_or(defaults.circular_precision()),
    )
    .context(InvalidConfigSnafu {})?;

    let default_display = DisplayOptions::DEFAULT_OPTIONS;
    let display = DisplayOptions {
        chart_kind: match settings.chart_kind.as_deref() {
            Some(k) => parse_chart_kind(k)?,
            None => default_display.chart_kind,
        },
        show_percentage: settings
            .show_percentage
            .unwrap_or(default_display.show_percentage),
        show_vote_count: settings
            .show_vote_count
            .unwrap_or(default_display.show_vote_count),
        rounding: match settings.rounding.as_deref() {
            Some(r) => parse_rounding(r)?,
            None => default_display.rounding,
        },
    };
    Ok((config, display, palette))
}
