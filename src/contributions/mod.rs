//! Contribution heatmap
//!
//! A year of day cells laid out as GitHub does: one column per week, Sunday
//! at the top. Data is either a live export or decorative random levels.

use anyhow::{Context, Result};
use chrono::{Datelike, Duration, NaiveDate};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::content::html_escape;

/// Columns in the grid
pub const WEEKS: usize = 53;

/// Activity bucket of a day
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "RawLevel")]
pub enum Level {
    #[default]
    None,
    FirstQuartile,
    SecondQuartile,
    ThirdQuartile,
    FourthQuartile,
}

impl Level {
    pub const ALL: [Level; 5] = [
        Level::None,
        Level::FirstQuartile,
        Level::SecondQuartile,
        Level::ThirdQuartile,
        Level::FourthQuartile,
    ];

    pub fn from_index(index: u8) -> Option<Level> {
        Level::ALL.get(usize::from(index)).copied()
    }

    pub fn index(self) -> u8 {
        self as u8
    }

    /// GitHub's `contributionLevel` names
    pub fn from_github(name: &str) -> Option<Level> {
        match name {
            "NONE" => Some(Level::None),
            "FIRST_QUARTILE" => Some(Level::FirstQuartile),
            "SECOND_QUARTILE" => Some(Level::SecondQuartile),
            "THIRD_QUARTILE" => Some(Level::ThirdQuartile),
            "FOURTH_QUARTILE" => Some(Level::FourthQuartile),
            _ => None,
        }
    }

    /// Bucket a count against the busiest day
    pub fn from_quartiles(count: u32, max: u32) -> Level {
        if count == 0 || max == 0 {
            return Level::None;
        }
        let ratio = f64::from(count) / f64::from(max);
        if ratio <= 0.25 {
            Level::FirstQuartile
        } else if ratio <= 0.5 {
            Level::SecondQuartile
        } else if ratio <= 0.75 {
            Level::ThirdQuartile
        } else {
            Level::FourthQuartile
        }
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> u8 {
        level.index()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawLevel {
    Index(u8),
    Name(String),
}

impl TryFrom<RawLevel> for Level {
    type Error = String;

    fn try_from(raw: RawLevel) -> Result<Self, Self::Error> {
        match raw {
            RawLevel::Index(i) => {
                Level::from_index(i).ok_or_else(|| format!("level out of range: {}", i))
            }
            RawLevel::Name(name) => {
                Level::from_github(&name).ok_or_else(|| format!("unknown level: {}", name))
            }
        }
    }
}

/// One cell of the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ContributionDay {
    pub date: NaiveDate,
    pub count: u32,
    pub level: Level,
}

impl ContributionDay {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            count: 0,
            level: Level::None,
        }
    }

    /// Hover text; inactive days have none
    pub fn tooltip(&self) -> Option<String> {
        if self.count == 0 {
            return None;
        }
        let noun = if self.count == 1 {
            "contribution"
        } else {
            "contributions"
        };
        Some(format!(
            "{} {} on {}",
            self.count,
            noun,
            self.date.format("%B %-d, %Y")
        ))
    }
}

#[derive(Deserialize)]
struct RawDay {
    date: NaiveDate,
    #[serde(alias = "contributionCount")]
    count: u32,
    #[serde(default, alias = "contributionLevel")]
    level: Option<Level>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawExport {
    Wrapped { contributions: Vec<RawDay> },
    Days(Vec<RawDay>),
}

/// Fixed-size heatmap ending at a given day
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContributionGraph {
    end: NaiveDate,
    days: BTreeMap<NaiveDate, ContributionDay>,
}

/// First day (a Sunday) of a grid ending at `end`
fn window_start(end: NaiveDate) -> NaiveDate {
    let back = i64::from(end.weekday().num_days_from_sunday()) + 7 * (WEEKS as i64 - 1);
    end - Duration::days(back)
}

impl ContributionGraph {
    /// Live data. Days outside the window are dropped, missing days are empty.
    pub fn from_days(days: impl IntoIterator<Item = ContributionDay>, end: NaiveDate) -> Self {
        let start = window_start(end);
        let days = days
            .into_iter()
            .filter(|d| d.date >= start && d.date <= end)
            .map(|d| (d.date, d))
            .collect();
        Self { end, days }
    }

    /// Load a JSON export, either a bare list of days or `{"contributions": [...]}`.
    ///
    /// Days without a level are bucketed against the busiest day. The grid ends
    /// at the latest day in the export.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let raw: RawExport = serde_json::from_str(&content)
            .with_context(|| format!("parsing {}", path.display()))?;
        let raw = match raw {
            RawExport::Wrapped { contributions } => contributions,
            RawExport::Days(days) => days,
        };

        let max = raw.iter().map(|d| d.count).max().unwrap_or(0);
        let end = raw
            .iter()
            .map(|d| d.date)
            .max()
            .context("contribution export has no days")?;

        let days = raw.into_iter().map(|d| ContributionDay {
            date: d.date,
            count: d.count,
            level: d
                .level
                .unwrap_or_else(|| Level::from_quartiles(d.count, max)),
        });
        Ok(Self::from_days(days, end))
    }

    /// Decorative demo data. Not a record of anything.
    pub fn random<R: Rng>(end: NaiveDate, rng: &mut R) -> Self {
        let start = window_start(end);
        let days = start
            .iter_days()
            .take_while(|d| *d <= end)
            .map(|date| {
                let level = Level::ALL[rng.gen_range(0..Level::ALL.len())];
                let count = match level {
                    Level::None => 0,
                    Level::FirstQuartile => rng.gen_range(1..=3),
                    Level::SecondQuartile => rng.gen_range(4..=6),
                    Level::ThirdQuartile => rng.gen_range(7..=9),
                    Level::FourthQuartile => rng.gen_range(10..=15),
                };
                ContributionDay { date, count, level }
            });
        Self::from_days(days, end)
    }

    pub fn start(&self) -> NaiveDate {
        window_start(self.end)
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn day(&self, date: NaiveDate) -> Option<ContributionDay> {
        if date < self.start() || date > self.end {
            return None;
        }
        Some(
            self.days
                .get(&date)
                .copied()
                .unwrap_or_else(|| ContributionDay::empty(date)),
        )
    }

    /// Sum of all counts in the window. Widened so large exports cannot overflow.
    pub fn total(&self) -> u64 {
        self.days.values().map(|d| u64::from(d.count)).sum()
    }

    /// Grid columns, Sunday first. Cells after the end date are `None`.
    pub fn weeks(&self) -> Vec<[Option<ContributionDay>; 7]> {
        let start = self.start();
        (0..WEEKS)
            .map(|week| {
                let mut column = [None; 7];
                for (weekday, cell) in column.iter_mut().enumerate() {
                    let date = start + Duration::days((week * 7 + weekday) as i64);
                    *cell = self.day(date);
                }
                column
            })
            .collect()
    }

    /// Grid markup. Active cells carry their tooltip text, inactive ones none.
    pub fn render_html(&self) -> String {
        let mut html = String::from(r#"<div class="contribution-graph">"#);
        for week in self.weeks() {
            html.push_str(r#"<div class="week">"#);
            for cell in week {
                match cell {
                    None => html.push_str(r#"<div class="day blank"></div>"#),
                    Some(day) => {
                        let _ = write!(
                            html,
                            r#"<div class="day" data-date="{}" data-level="{}""#,
                            day.date,
                            day.level.index()
                        );
                        if let Some(tip) = day.tooltip() {
                            let _ = write!(html, r#" data-tooltip="{}""#, html_escape(&tip));
                        }
                        html.push_str("></div>");
                    }
                }
            }
            html.push_str("</div>");
        }
        html.push_str("</div>");
        html
    }
}

/// JSON shape of a graph for clients
#[derive(Debug, Serialize)]
pub struct GraphData {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub total: u64,
    pub weeks: Vec<[Option<ContributionDay>; 7]>,
}

impl From<&ContributionGraph> for GraphData {
    fn from(graph: &ContributionGraph) -> Self {
        Self {
            start: graph.start(),
            end: graph.end(),
            total: graph.total(),
            weeks: graph.weeks(),
        }
    }
}
