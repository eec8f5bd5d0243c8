use log::debug;

use crate::models::{DatePairing, MonthDay};

/// Outcome of choosing arrival and departure from the date tokens of a text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateLookup {
    Found {
        arrival: MonthDay,
        departure: MonthDay,
    },
    /// Nothing in the text looked like a date
    NoTokens,
    /// Date-shaped tokens exist but none is a real month/day; holds the first one
    OnlyInvalid(String),
}

/// Applies the pairing policy to date tokens given in document order.
///
/// A single distinct date is used for both arrival and departure.
pub fn pair_dates<'a, I>(tokens: I, pairing: DatePairing) -> DateLookup
where
    I: IntoIterator<Item = (&'a str, Option<MonthDay>)>,
{
    let mut first_invalid: Option<&str> = None;
    let mut distinct: Vec<MonthDay> = Vec::new();

    for (raw, value) in tokens {
        match value {
            Some(date) => {
                if !distinct.contains(&date) {
                    distinct.push(date);
                }
            }
            None => {
                debug!("Ignoring date-shaped token {}", raw);
                first_invalid.get_or_insert(raw);
            }
        }
    }

    if distinct.is_empty() {
        return match first_invalid {
            Some(raw) => DateLookup::OnlyInvalid(raw.to_string()),
            None => DateLookup::NoTokens,
        };
    }

    let in_document_order = distinct.clone();
    distinct.sort();

    let (arrival, departure) = match pairing {
        DatePairing::EarliestLatest => (distinct[0], distinct[distinct.len() - 1]),
        DatePairing::TwoEarliest => (distinct[0], *distinct.get(1).unwrap_or(&distinct[0])),
        DatePairing::DocumentOrder => (
            in_document_order[0],
            *in_document_order.get(1).unwrap_or(&in_document_order[0]),
        ),
    };

    DateLookup::Found { arrival, departure }
}
