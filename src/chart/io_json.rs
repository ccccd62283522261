// Primitives for reading poll snapshots in JSON.

use poll_chart::builder::Builder;
use serde::{Deserialize, Serialize};

use crate::chart::*;

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct JsonPollOption {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub votes: Option<JSValue>,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct JsonPoll {
    pub id: String,
    #[serde(default)]
    pub question: String,
    pub options: Vec<JsonPollOption>,
}

pub fn read_json_poll(path: &str) -> ChartResult<Poll> {
    let contents = fs::read_to_string(path).context(OpeningFileSnafu { path })?;
    let js_poll: JsonPoll =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    debug!("read_json_poll: {:?}", js_poll);
    json_to_poll(&js_poll)
}

pub fn json_to_poll(js_poll: &JsonPoll) -> ChartResult<Poll> {
    let mut builder = Builder::new(&js_poll.id, &js_poll.question);
    for o in js_poll.options.iter() {
        let votes = read_js_votes(&o.votes, &o.id);
        builder
            .add_option(&o.id, &o.text, votes)
            .context(InvalidPollSnafu {})?;
    }
    Ok(builder.build())
}

#[derive(PartialEq, Debug, Clone, Copy)]
enum NumberVotes {
    Count(i64),
    OutOfRange,
    NotWhole,
}

fn number_votes(n: &serde_json::Number) -> NumberVotes {
    if let Some(v) = n.as_i64() {
        return NumberVotes::Count(v);
    }
    match n.as_f64() {
        Some(f) if f.fract() != 0.0 => NumberVotes::NotWhole,
        // i64::MAX as f64 rounds up to 2^63, which is already out of range.
        Some(f) if f >= i64::MIN as f64 && f < i64::MAX as f64 => NumberVotes::Count(f as i64),
        Some(_) => NumberVotes::OutOfRange,
        None => NumberVotes::NotWhole,
    }
}

/// Whole JSON numbers are vote counts. Everything else counts as a missing value.
fn read_js_votes(x: &Option<JSValue>, option_id: &str) -> Option<i64> {
    match x {
        None | Some(JSValue::Null) => None,
        Some(JSValue::Number(n)) => match number_votes(n) {
            NumberVotes::Count(v) => Some(v),
            NumberVotes::OutOfRange => {
                warn!(
                    "read_js_votes: option {}: vote count {} is out of range, counting 0",
                    option_id, n
                );
                None
            }
            NumberVotes::NotWhole => {
                warn!(
                    "read_js_votes: option {}: vote count {} is not a whole number, counting 0",
                    option_id, n
                );
                None
            }
        },
        Some(other) => {
            warn!(
                "read_js_votes: option {}: vote count {} is not a number, counting 0",
                option_id, other
            );
            None
        }
    }
}
