use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// Leap year used to validate year-less dates so that 2/29 is accepted
const REFERENCE_YEAR: i32 = 2000;

/// Business category of a team, derived from its identifier prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamCategory {
    Conference,
    Individual,
    Wedding,
    GenericTour,
}

impl TeamCategory {
    /// Label used in the sales notice
    pub fn label(&self) -> &'static str {
        match self {
            TeamCategory::Conference => "会议团",
            TeamCategory::Individual => "散客团",
            TeamCategory::Wedding => "婚宴团",
            TeamCategory::GenericTour => "旅游团",
        }
    }
}

impl fmt::Display for TeamCategory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A calendar month/day pair with no year.
///
/// Ordering is numeric on (month, day), which is also the order used to pick
/// arrival and departure. No wraparound across the year end is attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonthDay {
    pub month: u32,
    pub day: u32,
}

impl MonthDay {
    /// Builds a date if the pair names a real day in some year
    pub fn new(month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(REFERENCE_YEAR, month, day).map(|_| MonthDay { month, day })
    }

    /// Parses a `M/D` or `MM/DD` token
    pub fn parse(token: &str) -> Option<Self> {
        let (month, day) = token.trim().split_once('/')?;
        let month = month.trim().parse::<u32>().ok()?;
        let day = day.trim().parse::<u32>().ok()?;
        Self::new(month, day)
    }

    /// Localized phrase, e.g. `12月19日`
    pub fn phrase(&self) -> String {
        format!("{}月{}日", self.month, self.day)
    }
}

impl fmt::Display for MonthDay {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:02}/{:02}", self.month, self.day)
    }
}

/// One room type booked for the team
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomLineItem {
    pub room_type: String,
    pub count: u32,
    pub unit_price: u32,
}

impl RoomLineItem {
    pub fn new(room_type: impl Into<String>, count: u32, unit_price: u32) -> Self {
        RoomLineItem {
            room_type: room_type.into(),
            count,
            unit_price,
        }
    }
}

/// The structured result of one extraction.
///
/// A reviewer may edit any field before the record is formatted, so the
/// notifier accepts records that never came out of the extractor. Dates are
/// optional for the same reason; the extractor always fills both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRecord {
    pub team_identifier: String,
    pub team_category: TeamCategory,
    pub arrival_date: Option<MonthDay>,
    pub departure_date: Option<MonthDay>,
    #[serde(default)]
    pub room_line_items: Vec<RoomLineItem>,
}

/// One row of the review table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow {
    pub room_type: String,
    pub count: u32,
    pub unit_price: u32,
}

impl BookingRecord {
    pub fn arrival_phrase(&self) -> Option<String> {
        self.arrival_date.map(|d| d.phrase())
    }

    pub fn departure_phrase(&self) -> Option<String> {
        self.departure_date.map(|d| d.phrase())
    }

    /// Joins the two date phrases; a missing side leaves the other alone
    pub fn date_range_phrase(&self, connector: &str) -> String {
        match (self.arrival_phrase(), self.departure_phrase()) {
            (Some(arrival), Some(departure)) => format!("{}{}{}", arrival, connector, departure),
            (Some(only), None) | (None, Some(only)) => only,
            (None, None) => String::new(),
        }
    }

    pub fn table_rows(&self) -> Vec<TableRow> {
        self.room_line_items
            .iter()
            .map(|item| TableRow {
                room_type: item.room_type.clone(),
                count: item.count,
                unit_price: item.unit_price,
            })
            .collect()
    }

    /// Stable ascending sort by room count
    pub fn sort_line_items(&mut self) {
        self.room_line_items.sort_by_key(|item| item.count);
    }
}
