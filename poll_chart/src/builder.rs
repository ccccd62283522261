pub use crate::config::*;

use std::collections::HashSet;

/// A builder for poll snapshots.
///
/// It checks that the option ids are not empty and unique within the poll.
///
/// ```
/// pub use poll_chart::builder::Builder;
/// # use poll_chart::ChartErrors;
///
/// let mut builder = Builder::new("poll-1", "What is your favorite programming language?")
///     .option("opt-1", "JavaScript", Some(10))?
///     .option("opt-2", "Python", Some(5))?;
///
/// builder.add_option_simple("Java", None)?;
///
/// let poll = builder.build();
/// assert_eq!(poll.options[2].id, "opt-3");
///
/// # Ok::<(), ChartErrors>(())
/// ```
pub struct Builder {
    pub(crate) _id: String,
    pub(crate) _question: String,
    pub(crate) _options: Vec<PollOption>,
    pub(crate) _ids: HashSet<String>,
}

impl Builder {
    pub fn new(id: &str, question: &str) -> Builder {
        Builder {
            _id: id.to_string(),
            _question: question.to_string(),
            _options: Vec::new(),
            _ids: HashSet::new(),
        }
    }

    pub fn option(mut self, id: &str, text: &str, votes: Option<i64>) -> Result<Builder, ChartErrors> {
        self.add_option(id, text, votes)?;
        Ok(self)
    }

    /// Adds an option with a generated id (`opt-<position>`, starting at 1).
    ///
    /// It is the simplest use case when the storage layer has no ids.
    pub fn add_option_simple(&mut self, text: &str, votes: Option<i64>) -> Result<(), ChartErrors> {
        let id = format!("opt-{}", self._options.len() + 1);
        self.add_option(&id, text, votes)
    }

    /// Adds an option at the end of the poll.
    ///
    /// votes: the raw count. Missing and negative counts are accepted here and
    /// counted as zero by the engine.
    pub fn add_option(&mut self, id: &str, text: &str, votes: Option<i64>) -> Result<(), ChartErrors> {
        if id.is_empty() {
            return Err(ChartErrors::EmptyOptionId);
        }
        if !self._ids.insert(id.to_string()) {
            return Err(ChartErrors::DuplicateOptionId(id.to_string()));
        }
        self._options.push(PollOption {
            id: id.to_string(),
            text: text.to_string(),
            votes,
        });
        Ok(())
    }

    pub fn build(self) -> Poll {
        Poll {
            id: self._id,
            question: self._question,
            options: self._options,
        }
    }
}
