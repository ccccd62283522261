mod config;
use log::{debug, info, warn};

pub mod builder;
pub mod labels;
pub mod manual;

pub use crate::config::*;

/// An option placed in display order, before percentages are attached.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct RankedSlot {
    /// Position of the option in the poll (insertion order).
    pub index: usize,
    /// Position of the option in the display order.
    pub rank: usize,
    pub color_index: usize,
    pub votes: u64,
}

/// Computes the view model of a poll.
///
/// Arguments:
/// * `poll` the snapshot to display. It is not modified.
/// * `config` the numeric settings (palette size, rounding precisions)
/// * `display` the kind of chart and what should be shown
///
/// The computation is pure: running it twice on the same snapshot gives the
/// same ranks and colors.
pub fn compute_chart(
    poll: &Poll,
    config: &ChartConfig,
    display: &DisplayOptions,
) -> ChartViewModel {
    info!(
        "compute_chart: poll {:?}: {} options, kind: {:?}, rounding: {:?}",
        poll.id,
        poll.options.len(),
        display.chart_kind,
        display.rounding
    );

    let (normalized, total_votes) = normalize(&poll.options);
    let slots = rank(&poll.options, &normalized, config);
    let precision = config.precision_for(display.chart_kind);

    let percentages: Vec<Percentage> = match display.rounding {
        RoundingMode::Independent => slots
            .iter()
            .map(|s| percentage(s.votes, total_votes, precision))
            .collect(),
        RoundingMode::LargestRemainder => {
            let ordered_votes: Vec<u64> = slots.iter().map(|s| s.votes).collect();
            largest_remainder_percentages(&ordered_votes, total_votes, precision)
        }
    };

    let ranked_options: Vec<RankedOption> = slots
        .iter()
        .zip(percentages)
        .map(|(slot, pct)| RankedOption {
            option: poll.options[slot.index].clone(),
            rank: slot.rank,
            color_index: slot.color_index,
            votes: slot.votes,
            percentage: pct,
        })
        .collect();

    let is_empty = total_votes == 0;
    let (segments, bars) = match display.chart_kind {
        ChartKind::Circular if is_empty => (Some(Vec::new()), None),
        ChartKind::Circular => (Some(layout_pie(&ranked_options)), None),
        ChartKind::Linear if is_empty => (None, Some(Vec::new())),
        ChartKind::Linear => (None, Some(layout_bars(&ranked_options))),
    };

    debug!(
        "compute_chart: poll {:?}: total votes: {}, empty: {}",
        poll.id, total_votes, is_empty
    );

    ChartViewModel {
        chart_kind: display.chart_kind,
        total_votes,
        is_empty,
        ranked_options,
        segments,
        bars,
    }
}

/// Coerces the vote counts of the options into non-negative tallies and sums them.
///
/// Missing and negative counts become zero. The total of an empty list is zero.
///
/// The total is always the exact sum of the tallies. When the counts are so
/// large that their sum does not fit in a `u64`, every tally is capped at
/// `u64::MAX / options.len()` first.
pub fn normalize(options: &[PollOption]) -> (Vec<u64>, u64) {
    let mut votes: Vec<u64> = options.iter().map(|o| normalize_votes(o.votes)).collect();
    let wide_total: u128 = votes.iter().map(|v| *v as u128).sum();
    let total = match u64::try_from(wide_total) {
        Ok(t) => t,
        Err(_) => {
            let cap = u64::MAX / votes.len() as u64;
            warn!(
                "normalize: total votes {} does not fit, capping every tally at {}",
                wide_total, cap
            );
            for v in votes.iter_mut() {
                *v = (*v).min(cap);
            }
            votes.iter().sum()
        }
    };
    debug!(
        "normalize: {} options, total votes: {}",
        votes.len(),
        total
    );
    (votes, total)
}

fn normalize_votes(votes: Option<i64>) -> u64 {
    match votes {
        Some(v) if v > 0 => v as u64,
        _ => 0,
    }
}

/// Orders the options by tally, highest first, and assigns the colors.
///
/// Options with the same tally keep their insertion order. The color index is
/// the rank modulo the palette size.
pub fn rank(options: &[PollOption], normalized: &[u64], config: &ChartConfig) -> Vec<RankedSlot> {
    let votes_of = |idx: usize| normalized.get(idx).copied().unwrap_or(0);

    let mut order: Vec<usize> = (0..options.len()).collect();
    // sort_by is stable: ties stay in insertion order.
    order.sort_by(|a, b| votes_of(*b).cmp(&votes_of(*a)));

    order
        .into_iter()
        .enumerate()
        .map(|(rank, index)| RankedSlot {
            index,
            rank,
            color_index: rank % config.palette_size(),
            votes: votes_of(index),
        })
        .collect()
}

/// The share of `votes` in `total_votes`, in percent, rounded half-up to
/// `precision` decimal places.
///
/// Zero when there are no votes at all. `votes` is expected to be at most
/// `total_votes`; larger shares saturate at `u64::MAX` units.
pub fn percentage(votes: u64, total_votes: u64, precision: u32) -> Percentage {
    if total_votes == 0 {
        return Percentage::zero(precision);
    }
    let total = total_votes as u128;
    let num = votes as u128 * 100 * scale(precision) as u128;
    // floor(num / total + 1/2)
    let units = (2 * num + total) / (2 * total);
    Percentage {
        units: u64::try_from(units).unwrap_or(u64::MAX),
        precision,
    }
}

/// Percentages that always add up to exactly 100 when there is at least one vote.
///
/// Every option first gets the rounded-down share, then the missing steps go
/// to the largest remainders. Equal remainders are served in the order of
/// `votes`, which is expected to be the display order.
pub fn largest_remainder_percentages(
    votes: &[u64],
    total_votes: u64,
    precision: u32,
) -> Vec<Percentage> {
    if total_votes == 0 {
        return votes.iter().map(|_| Percentage::zero(precision)).collect();
    }
    let total = total_votes as u128;
    let target = 100 * scale(precision) as u128;

    let mut units: Vec<u128> = Vec::with_capacity(votes.len());
    let mut remainders: Vec<(usize, u128)> = Vec::with_capacity(votes.len());
    for (idx, v) in votes.iter().enumerate() {
        let num = *v as u128 * target;
        units.push(num / total);
        remainders.push((idx, num % total));
    }

    let assigned: u128 = units.iter().sum();
    let leftover = target.saturating_sub(assigned) as usize;
    debug!(
        "largest_remainder_percentages: assigned {} of {} units, leftover: {}",
        assigned, target, leftover
    );

    // Stable: equal remainders keep the order of the input.
    remainders.sort_by(|a, b| b.1.cmp(&a.1));
    for (idx, _) in remainders.iter().take(leftover) {
        units[*idx] += 1;
    }

    units
        .into_iter()
        .map(|u| Percentage {
            units: u as u64,
            precision,
        })
        .collect()
}

/// Lays the options out as back-to-back wedges, starting at 0 degrees.
///
/// Each sweep is the percentage of the option times 3.6. The sweeps are not
/// adjusted to close the circle, so the last wedge may end slightly before or
/// after 360 degrees.
pub fn layout_pie(ranked: &[RankedOption]) -> Vec<Segment> {
    // Degrees are kept as integers in 10^-(precision + 1) steps: 55.6% -> 556 * 36 -> 200.16
    let mut start: u64 = 0;
    let segments: Vec<Segment> = ranked
        .iter()
        .map(|r| {
            let denom = scale(r.percentage.precision + 1) as f64;
            let sweep = r.percentage.units * 36;
            let seg = Segment {
                start_angle_deg: start as f64 / denom,
                sweep_angle_deg: sweep as f64 / denom,
            };
            start += sweep;
            seg
        })
        .collect();
    debug!(
        "layout_pie: {} segments, last end: {:?}",
        segments.len(),
        segments.last().map(|s| s.end_angle_deg())
    );
    segments
}

/// The bar widths of a linear chart, as fractions of the full width.
pub fn layout_bars(ranked: &[RankedOption]) -> Vec<BarLayout> {
    ranked
        .iter()
        .map(|r| BarLayout {
            width_fraction: r.percentage.units as f64
                / (100 * scale(r.percentage.precision)) as f64,
        })
        .collect()
}

impl ChartViewModel {
    /// The lines to display, in display order, with their combined labels.
    ///
    /// Empty when no vote was cast: the caller should show
    /// [labels::EMPTY_STATE_MESSAGE] instead.
    pub fn rows(&self, display: &DisplayOptions) -> Vec<ChartRow> {
        if self.is_empty {
            return Vec::new();
        }
        self.ranked_options
            .iter()
            .map(|r| ChartRow {
                option_id: r.option.id.clone(),
                text: r.option.text.clone(),
                color_index: r.color_index,
                label: labels::combined_label(r.votes, &r.percentage, display),
            })
            .collect()
    }

    /// The text in the middle of a circular chart. Only for non-empty
    /// circular charts.
    pub fn center_label(&self) -> Option<String> {
        match self.chart_kind {
            ChartKind::Circular if !self.is_empty => Some(labels::center_label(self.total_votes)),
            _ => None,
        }
    }

    /// The caption under a linear chart. Only for non-empty linear charts.
    pub fn caption(&self) -> Option<String> {
        match self.chart_kind {
            ChartKind::Linear if !self.is_empty => {
                Some(labels::total_votes_caption(self.total_votes))
            }
            _ => None,
        }
    }

    /// Finds the option with the given id.
    pub fn find(&self, option_id: &str) -> Option<&RankedOption> {
        self.ranked_options.iter().find(|r| r.option.id == option_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init_logs() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn opt(id: &str, text: &str, votes: Option<i64>) -> PollOption {
        PollOption {
            id: id.to_string(),
            text: text.to_string(),
            votes,
        }
    }

    fn languages_poll() -> Poll {
        Poll {
            id: "poll-1".to_string(),
            question: "What is your favorite programming language?".to_string(),
            options: vec![
                opt("opt-1", "JavaScript", Some(10)),
                opt("opt-2", "Python", Some(5)),
                opt("opt-3", "Java", Some(3)),
            ],
        }
    }

    fn run(poll: &Poll, kind: ChartKind) -> ChartViewModel {
        compute_chart(poll, &ChartConfig::DEFAULT_CONFIG, &DisplayOptions::with_kind(kind))
    }

    #[test]
    fn null_and_negative_votes_are_zero() {
        init_logs();
        let options = vec![
            opt("a", "A", None),
            opt("b", "B", Some(-4)),
            opt("c", "C", Some(7)),
        ];
        let (votes, total) = normalize(&options);
        assert_eq!(votes, vec![0, 0, 7]);
        assert_eq!(total, 7);
    }

    #[test]
    fn all_null_votes_give_an_empty_total() {
        let options = vec![opt("a", "AWS", None), opt("b", "Azure", None), opt("c", "GCP", None)];
        assert_eq!(normalize(&options), (vec![0, 0, 0], 0));
        assert_eq!(normalize(&[]), (vec![], 0));
    }

    #[test]
    fn ranking_is_stable_for_ties() {
        let options = vec![
            opt("a", "A", Some(2)),
            opt("b", "B", Some(5)),
            opt("c", "C", Some(2)),
            opt("d", "D", Some(5)),
            opt("e", "E", None),
            opt("f", "F", Some(0)),
        ];
        let (votes, _) = normalize(&options);
        let slots = rank(&options, &votes, &ChartConfig::DEFAULT_CONFIG);
        let order: Vec<usize> = slots.iter().map(|s| s.index).collect();
        assert_eq!(order, vec![1, 3, 0, 2, 4, 5]);
        let ranks: Vec<usize> = slots.iter().map(|s| s.rank).collect();
        assert_eq!(ranks, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn colors_cycle_through_the_palette() {
        let options: Vec<PollOption> = (0..10)
            .map(|i| opt(&format!("o{}", i), "x", Some(100 - i)))
            .collect();
        let (votes, _) = normalize(&options);
        let slots = rank(&options, &votes, &ChartConfig::DEFAULT_CONFIG);
        let colors: Vec<usize> = slots.iter().map(|s| s.color_index).collect();
        assert_eq!(colors, vec![0, 1, 2, 3, 4, 5, 6, 7, 0, 1]);

        let config = ChartConfig::new(9, 0, 1).unwrap();
        let slots = rank(&options, &votes, &config);
        assert_eq!(slots[8].color_index, 8);
        assert_eq!(slots[9].color_index, 0);
    }

    #[test]
    fn colors_are_stable_between_runs() {
        let poll = languages_poll();
        let first = run(&poll, ChartKind::Circular);
        let second = run(&poll, ChartKind::Circular);
        for option in poll.options.iter() {
            let c1 = first.find(&option.id).map(|r| r.color_index);
            let c2 = second.find(&option.id).map(|r| r.color_index);
            assert!(c1.is_some());
            assert_eq!(c1, c2);
        }
        assert_eq!(first, second);
    }

    #[test]
    fn linear_percentages_drift_above_100() {
        let vm = run(&languages_poll(), ChartKind::Linear);
        let pcts: Vec<u64> = vm.ranked_options.iter().map(|r| r.percentage.units()).collect();
        assert_eq!(pcts, vec![56, 28, 17]);
        assert_eq!(pcts.iter().sum::<u64>(), 101);
        let values: Vec<f64> = vm.ranked_options.iter().map(|r| r.percentage.value()).collect();
        assert_eq!(values, vec![56.0, 28.0, 17.0]);
    }

    #[test]
    fn circular_percentages_drift_above_100() {
        let vm = run(&languages_poll(), ChartKind::Circular);
        let values: Vec<f64> = vm.ranked_options.iter().map(|r| r.percentage.value()).collect();
        assert_eq!(values, vec![55.6, 27.8, 16.7]);
        let units: u64 = vm.ranked_options.iter().map(|r| r.percentage.units()).sum();
        assert_eq!(units, 1001);
    }

    #[test]
    fn percentage_rounds_half_up() {
        // 1/8 = 12.5%
        assert_eq!(percentage(1, 8, 0).units(), 13);
        // 1/16 = 6.25%
        assert_eq!(percentage(1, 16, 1).units(), 63);
        // 1/3 = 33.33%
        assert_eq!(percentage(1, 3, 0).units(), 33);
        assert_eq!(percentage(2, 3, 1).units(), 667);
        assert_eq!(percentage(3, 3, 1).units(), 1000);
        assert_eq!(percentage(0, 3, 1).units(), 0);
    }

    #[test]
    fn huge_counts_keep_the_total_exact() {
        init_logs();
        let options = vec![
            opt("a", "A", Some(i64::MAX)),
            opt("b", "B", Some(i64::MAX)),
            opt("c", "C", Some(i64::MAX)),
        ];
        let (votes, total) = normalize(&options);
        let sum: u128 = votes.iter().map(|v| *v as u128).sum();
        assert_eq!(sum, total as u128);
        assert_eq!(votes, vec![u64::MAX / 3; 3]);

        let poll = Poll {
            id: "huge".to_string(),
            question: "Q".to_string(),
            options,
        };
        let vm = run(&poll, ChartKind::Circular);
        assert_eq!(vm.total_votes, total);
        let units: Vec<u64> = vm
            .ranked_options
            .iter()
            .map(|r| r.percentage.units())
            .collect();
        assert_eq!(units, vec![333, 333, 333]);
        let last = vm.segments.unwrap().last().copied().unwrap();
        assert!(last.end_angle_deg() <= 360.0);
    }

    #[test]
    fn two_huge_counts_fit_without_capping() {
        let options = vec![opt("a", "A", Some(i64::MAX)), opt("b", "B", Some(i64::MAX))];
        let (votes, total) = normalize(&options);
        assert_eq!(votes, vec![i64::MAX as u64; 2]);
        assert_eq!(total, 2 * (i64::MAX as u64));
    }

    #[test]
    fn oversized_shares_saturate() {
        assert_eq!(percentage(u64::MAX, 1, 6).units(), u64::MAX);
        assert_eq!(percentage(3, 2, 0).units(), 150);
    }

    #[test]
    fn percentage_of_nothing_is_zero() {
        let p = percentage(0, 0, 1);
        assert!(p.is_zero());
        assert_eq!(p.value(), 0.0);
        assert_eq!(percentage(5, 0, 0), Percentage::zero(0));
    }

    #[test]
    fn largest_remainder_closes_to_100() {
        let pcts = largest_remainder_percentages(&[10, 5, 3], 18, 0);
        let units: Vec<u64> = pcts.iter().map(|p| p.units()).collect();
        assert_eq!(units, vec![55, 28, 17]);

        let pcts = largest_remainder_percentages(&[10, 5, 3], 18, 1);
        let units: Vec<u64> = pcts.iter().map(|p| p.units()).collect();
        assert_eq!(units, vec![555, 278, 167]);

        // Equal remainders go to the first options.
        let pcts = largest_remainder_percentages(&[1, 1, 1], 3, 0);
        let units: Vec<u64> = pcts.iter().map(|p| p.units()).collect();
        assert_eq!(units, vec![34, 33, 33]);

        let pcts = largest_remainder_percentages(&[0, 0], 0, 1);
        assert!(pcts.iter().all(|p| p.is_zero()));
    }

    #[test]
    fn largest_remainder_is_opt_in() {
        let display = DisplayOptions {
            rounding: RoundingMode::LargestRemainder,
            ..DisplayOptions::with_kind(ChartKind::Circular)
        };
        let vm = compute_chart(&languages_poll(), &ChartConfig::DEFAULT_CONFIG, &display);
        let values: Vec<f64> = vm.ranked_options.iter().map(|r| r.percentage.value()).collect();
        assert_eq!(values, vec![55.5, 27.8, 16.7]);
        let last = vm.segments.unwrap().last().copied().unwrap();
        assert_eq!(last.end_angle_deg(), 360.0);
    }

    #[test]
    fn circular_layout_end_to_end() {
        init_logs();
        let vm = run(&languages_poll(), ChartKind::Circular);
        let segments = vm.segments.clone().unwrap();
        assert!(vm.bars.is_none());
        assert_eq!(
            segments,
            vec![
                Segment {
                    start_angle_deg: 0.0,
                    sweep_angle_deg: 200.16
                },
                Segment {
                    start_angle_deg: 200.16,
                    sweep_angle_deg: 100.08
                },
                Segment {
                    start_angle_deg: 300.24,
                    sweep_angle_deg: 60.12
                },
            ]
        );
        // The drift is not corrected: 100.1% of the circle.
        assert_eq!(segments[2].end_angle_deg(), 360.36);
        assert_eq!(vm.center_label(), Some("18 votes".to_string()));
        assert_eq!(vm.caption(), None);
    }

    #[test]
    fn pie_layout_of_nothing_is_empty() {
        assert!(layout_pie(&[]).is_empty());
    }

    #[test]
    fn linear_layout_gives_bar_widths() {
        let vm = run(&languages_poll(), ChartKind::Linear);
        assert!(vm.segments.is_none());
        let widths: Vec<f64> = vm.bars.unwrap().iter().map(|b| b.width_fraction).collect();
        assert_eq!(widths, vec![0.56, 0.28, 0.17]);
    }

    #[test]
    fn view_model_keeps_every_option() {
        let poll = Poll {
            id: "poll-3".to_string(),
            question: "Which database do you prefer?".to_string(),
            options: vec![
                opt("opt-7", "MongoDB", Some(0)),
                opt("opt-8", "PostgreSQL", Some(1)),
                opt("opt-9", "MySQL", None),
            ],
        };
        let vm = run(&poll, ChartKind::Linear);
        assert_eq!(vm.total_votes, 1);
        assert!(!vm.is_empty);
        let ids: Vec<&str> = vm.ranked_options.iter().map(|r| r.option.id.as_str()).collect();
        assert_eq!(ids, vec!["opt-8", "opt-7", "opt-9"]);
        // The poll itself is untouched.
        assert_eq!(poll.options[0].id, "opt-7");
    }

    #[test]
    fn single_vote_labels() {
        let poll = Poll {
            id: "poll-3".to_string(),
            question: "Which database do you prefer?".to_string(),
            options: vec![
                opt("opt-7", "MongoDB", Some(1)),
                opt("opt-8", "PostgreSQL", Some(0)),
                opt("opt-9", "MySQL", Some(0)),
            ],
        };
        let vm = run(&poll, ChartKind::Linear);
        let rows = vm.rows(&DisplayOptions::DEFAULT_OPTIONS);
        let labels: Vec<Option<String>> = rows.iter().map(|r| r.label.clone()).collect();
        assert_eq!(
            labels,
            vec![
                Some("1 vote · 100%".to_string()),
                Some("0 votes · 0%".to_string()),
                Some("0 votes · 0%".to_string()),
            ]
        );
        assert_eq!(vm.caption(), Some("Total votes: 1".to_string()));

        let vm = run(&poll, ChartKind::Circular);
        assert_eq!(vm.center_label(), Some("1 vote".to_string()));
    }

    #[test]
    fn empty_polls_have_no_rows_or_segments() {
        let zero = Poll {
            id: "poll-2".to_string(),
            question: "Which framework do you prefer?".to_string(),
            options: vec![
                opt("opt-4", "React", Some(0)),
                opt("opt-5", "Vue", Some(0)),
                opt("opt-6", "Angular", None),
            ],
        };
        for kind in [ChartKind::Linear, ChartKind::Circular] {
            let vm = run(&zero, kind);
            assert!(vm.is_empty);
            assert_eq!(vm.total_votes, 0);
            assert_eq!(vm.ranked_options.len(), 3);
            assert!(vm.ranked_options.iter().all(|r| r.percentage.is_zero()));
            assert!(vm.rows(&DisplayOptions::with_kind(kind)).is_empty());
            assert!(vm.segments.as_ref().map_or(true, |s| s.is_empty()));
            assert!(vm.bars.as_ref().map_or(true, |b| b.is_empty()));
            assert_eq!(vm.center_label(), None);
            assert_eq!(vm.caption(), None);
        }
    }

    #[test]
    fn polls_without_options() {
        let poll = Poll {
            id: "poll-0".to_string(),
            question: "Nothing?".to_string(),
            options: vec![],
        };
        let vm = run(&poll, ChartKind::Circular);
        assert!(vm.is_empty);
        assert!(vm.ranked_options.is_empty());
        assert_eq!(vm.segments, Some(vec![]));
    }

    #[test]
    fn toggles_are_independent() {
        let vm = run(&languages_poll(), ChartKind::Linear);
        let label_with = |show_percentage, show_vote_count| {
            let display = DisplayOptions {
                show_percentage,
                show_vote_count,
                ..DisplayOptions::DEFAULT_OPTIONS
            };
            vm.rows(&display)[0].label.clone()
        };
        assert_eq!(label_with(true, true), Some("10 votes · 56%".to_string()));
        assert_eq!(label_with(false, true), Some("10 votes".to_string()));
        assert_eq!(label_with(true, false), Some("56%".to_string()));
        assert_eq!(label_with(false, false), None);
    }

    #[test]
    fn circular_rows_use_one_decimal() {
        let vm = run(&languages_poll(), ChartKind::Circular);
        let rows = vm.rows(&DisplayOptions::with_kind(ChartKind::Circular));
        let labels: Vec<String> = rows.iter().filter_map(|r| r.label.clone()).collect();
        assert_eq!(
            labels,
            vec!["10 votes · 55.6%", "5 votes · 27.8%", "3 votes · 16.7%"]
        );
        let colors: Vec<&str> = rows.iter().map(|r| palette_color(r.color_index)).collect();
        assert_eq!(colors, vec!["blue", "green", "yellow"]);
    }
}
