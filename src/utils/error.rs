use thiserror::Error;

use crate::models::{BookingRecord, MonthDay, TeamCategory};

/// Why an OCR text could not be turned into a booking record.
///
/// Variants after `TeamIdentifierNotFound` keep what was found so far so the
/// caller can fall back to manual entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    #[error("OCR text is empty")]
    EmptyInput,

    #[error("no team identifier found")]
    TeamIdentifierNotFound,

    #[error("no date found for team {team_identifier}")]
    DateRangeNotFound { team_identifier: String },

    #[error("date token `{token}` for team {team_identifier} is not a valid month/day")]
    DateFormatUnparseable {
        team_identifier: String,
        token: String,
    },

    #[error("no room line items matched for team {team_identifier}")]
    NoRoomLineItemsMatched {
        team_identifier: String,
        team_category: TeamCategory,
        arrival_date: MonthDay,
        departure_date: MonthDay,
    },
}

impl ExtractionError {
    pub fn team_identifier(&self) -> Option<&str> {
        match self {
            ExtractionError::EmptyInput | ExtractionError::TeamIdentifierNotFound => None,
            ExtractionError::DateRangeNotFound { team_identifier }
            | ExtractionError::DateFormatUnparseable {
                team_identifier, ..
            }
            | ExtractionError::NoRoomLineItemsMatched {
                team_identifier, ..
            } => Some(team_identifier),
        }
    }

    /// Short machine-readable name of the failure
    pub fn kind(&self) -> &'static str {
        match self {
            ExtractionError::EmptyInput => "empty_input",
            ExtractionError::TeamIdentifierNotFound => "team_identifier_not_found",
            ExtractionError::DateRangeNotFound { .. } => "date_range_not_found",
            ExtractionError::DateFormatUnparseable { .. } => "date_format_unparseable",
            ExtractionError::NoRoomLineItemsMatched { .. } => "no_room_line_items_matched",
        }
    }

    /// A record with no line items, for manual completion. Only available
    /// once team and dates are known.
    pub fn partial_record(&self) -> Option<BookingRecord> {
        match self {
            ExtractionError::NoRoomLineItemsMatched {
                team_identifier,
                team_category,
                arrival_date,
                departure_date,
            } => Some(BookingRecord {
                team_identifier: team_identifier.clone(),
                team_category: *team_category,
                arrival_date: Some(*arrival_date),
                departure_date: Some(*departure_date),
                room_line_items: Vec::new(),
            }),
            _ => None,
        }
    }
}

/// Application-level failures around the extractor
#[derive(Debug, Error)]
pub enum NoticeError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Record format error: {0}")]
    RecordFormat(String),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),
}
