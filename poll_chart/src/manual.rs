/*!

This is the long-form manual for `poll_chart` and `pollchart`.

## Pipeline

A poll snapshot goes through four stages, all pure functions:

1. [normalize](crate::normalize): missing and negative vote counts become `0`,
   then the total is the sum of the tallies.
2. [rank](crate::rank): the options are sorted by tally, highest first. Options
   with the same tally keep the order in which they were created. The color of
   an option is its rank modulo the palette size.
3. [percentage](crate::percentage): the share of each option, rounded half-up.
   Bar charts use whole numbers, pie charts use one decimal place.
4. [layout_pie](crate::layout_pie) (pie charts) or
   [layout_bars](crate::layout_bars) (bar charts).

[compute_chart](crate::compute_chart) runs all of them and returns a
[ChartViewModel](crate::ChartViewModel).

## Rounding

Each percentage is rounded on its own. The figures do not always add up to 100:

| Votes | Bar | Pie |
|-------|-----|------|
| 10    | 56  | 55.6 |
| 5     | 28  | 27.8 |
| 3     | 17  | 16.7 |
| total | 101 | 100.1 |

The pie wedges follow the rounded figures, so the last wedge of this example ends
at 360.36 degrees. Use `RoundingMode::LargestRemainder` to get figures that add up
to exactly 100 (`55.5, 27.8, 16.7` for the pie above).

## Labels

When both the vote count and the percentage are shown, the label reads
`10 votes · 56%`. The singular `vote` is used for exactly one vote, so a poll with
a single vote shows `1 vote · 100%` and the other options `0 votes · 0%`.

A poll without any vote has no rows and no wedges. Show `No votes yet` instead.

## Command line

```bash
pollchart -i poll.json --chart-kind pie --summary
```

```text
Poll Results
What is your favorite programming language?
[blue] JavaScript: 10 votes · 55.6%
[green] Python: 5 votes · 27.8%
[yellow] Java: 3 votes · 16.7%
18 votes
```

### Input formats

- `json` (default): `{"id": ..., "question": ..., "options": [{"id": ..., "text": ..., "votes": ...}]}`.
  Other fields are ignored. A `votes` value that is not a whole number counts as `0`.
- `csv`: a header row, then one `id,text,votes` row per option. The file name is used as the poll id.

### Configuration

The `--config` flag points to a JSON file. All the keys are optional:

```json
{
  "paletteSize": 8,
  "linearPrecision": 0,
  "circularPrecision": 1,
  "chartKind": "pie",
  "showPercentage": true,
  "showVoteCount": true,
  "rounding": "independent",
  "palette": ["blue", "green", "yellow", "purple", "pink", "indigo", "red", "orange"]
}
```

`palette` names one color per color index. Without it, `paletteSize` can be at
most 8 (the default names). With it, `paletteSize` can be left out and otherwise
has to match the number of names.

`chartKind` accepts `bar`/`linear` and `pie`/`circular`. `rounding` accepts
`independent` and `largestRemainder`. The `--chart-kind`, `--hide-percentage` and
`--hide-vote-count` flags take precedence over the file.

*/
