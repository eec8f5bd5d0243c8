use log::{debug, info, warn};

use crate::models::{Association, BookingRecord, ExtractorConfig};
use crate::processing::dates::{pair_dates, DateLookup};
use crate::processing::normalize::normalize_ocr_text;
use crate::processing::rooms::{associate_by_proximity, associate_line_scoped};
use crate::processing::tokenizer::Tokenizer;
use crate::utils::ExtractionError;

/// Turns OCR text into a booking record.
///
/// Pipeline: normalize, tokenize once, then resolve team, dates and room line
/// items from the token stream. Failures are reported in a fixed order:
/// empty input, missing team, missing or unusable dates, no room items.
pub struct Extractor {
    config: ExtractorConfig,
    tokenizer: Tokenizer,
}

impl Extractor {
    pub fn new(config: ExtractorConfig) -> Self {
        let tokenizer = Tokenizer::new(&config);
        Extractor { config, tokenizer }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    pub fn extract(&self, raw_text: &str) -> Result<BookingRecord, ExtractionError> {
        let text = normalize_ocr_text(raw_text);
        if text.trim().is_empty() {
            warn!("Extraction failed: empty input");
            return Err(ExtractionError::EmptyInput);
        }

        let stream = self.tokenizer.tokenize(&text);
        debug!(
            "Tokenized {} lines into {} tokens",
            stream.lines().len(),
            stream.tokens.len()
        );

        // First team in document order wins
        let team_identifier = match stream.teams().next() {
            Some((_, identifier)) => identifier.to_string(),
            None => {
                warn!("Extraction failed: no team identifier");
                return Err(ExtractionError::TeamIdentifierNotFound);
            }
        };
        let team_category = self.config.categorize(&team_identifier);
        info!("Team {} ({:?})", team_identifier, team_category);

        let (arrival_date, departure_date) =
            match pair_dates(stream.dates(), self.config.date_pairing) {
                DateLookup::Found { arrival, departure } => (arrival, departure),
                DateLookup::NoTokens => {
                    warn!("Extraction failed: no date for {}", team_identifier);
                    return Err(ExtractionError::DateRangeNotFound { team_identifier });
                }
                DateLookup::OnlyInvalid(token) => {
                    warn!("Extraction failed: unusable date {} for {}", token, team_identifier);
                    return Err(ExtractionError::DateFormatUnparseable {
                        team_identifier,
                        token,
                    });
                }
            };

        let association = self.resolve_association(stream.content_line_count());
        let mut room_line_items = match association {
            Association::Proximity => associate_by_proximity(&stream),
            _ => associate_line_scoped(&stream, &self.config),
        };
        debug!(
            "{:?} association kept {} room line items",
            association,
            room_line_items.len()
        );

        if room_line_items.is_empty() {
            warn!("Extraction failed: no room line items for {}", team_identifier);
            return Err(ExtractionError::NoRoomLineItemsMatched {
                team_identifier,
                team_category,
                arrival_date,
                departure_date,
            });
        }

        // Stable: equal counts keep discovery order
        room_line_items.sort_by_key(|item| item.count);

        Ok(BookingRecord {
            team_identifier,
            team_category,
            arrival_date: Some(arrival_date),
            departure_date: Some(departure_date),
            room_line_items,
        })
    }

    fn resolve_association(&self, content_lines: usize) -> Association {
        match self.config.association {
            Association::Auto if content_lines >= 2 => Association::LineScoped,
            Association::Auto => Association::Proximity,
            fixed => fixed,
        }
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Extractor::new(ExtractorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoryPrefix, DatePairing, MonthDay, RoomLineItem, TeamCategory};

    const SAMPLE: &str = "CON045/SPRINGCO\n12/19 18:00\n12/21 10:00\nSTS 32\n580.00 BRK2,NSV\nJKN 50\n420.00";

    #[test]
    fn test_sample_document() {
        let record = Extractor::default().extract(SAMPLE).unwrap();
        assert_eq!(record.team_identifier, "CON045/SPRINGCO");
        assert_eq!(record.team_category, TeamCategory::Conference);
        assert_eq!(record.arrival_date, MonthDay::new(12, 19));
        assert_eq!(record.departure_date, MonthDay::new(12, 21));
        assert_eq!(
            record.room_line_items,
            vec![RoomLineItem::new("STS", 32, 580), RoomLineItem::new("JKN", 50, 420)]
        );
    }

    #[test]
    fn test_empty_input() {
        let extractor = Extractor::default();
        assert_eq!(extractor.extract(""), Err(ExtractionError::EmptyInput));
        assert_eq!(extractor.extract("  \n\t\n"), Err(ExtractionError::EmptyInput));
        assert_eq!(
            extractor.extract("\u{0007}\u{0000}\r\n\u{3000}"),
            Err(ExtractionError::EmptyInput)
        );
    }

    #[test]
    fn test_missing_team_wins_over_missing_dates() {
        let result = Extractor::default().extract("STS 32\n580.00");
        assert_eq!(result, Err(ExtractionError::TeamIdentifierNotFound));
    }

    #[test]
    fn test_missing_dates() {
        let result = Extractor::default().extract("FIT001/ABC\nSTS 5\n300.00");
        assert_eq!(
            result,
            Err(ExtractionError::DateRangeNotFound {
                team_identifier: "FIT001/ABC".to_string()
            })
        );
    }

    #[test]
    fn test_unparseable_dates() {
        let result = Extractor::default().extract("FIT001/ABC 13/45\nSTS 5\n300.00");
        assert_eq!(
            result,
            Err(ExtractionError::DateFormatUnparseable {
                team_identifier: "FIT001/ABC".to_string(),
                token: "13/45".to_string()
            })
        );
    }

    #[test]
    fn test_no_room_items_keeps_partial_data() {
        let err = Extractor::default()
            .extract("WA12/LI\n6/8\nBRK 5\n300.00")
            .unwrap_err();
        assert_eq!(err.team_identifier(), Some("WA12/LI"));
        let partial = err.partial_record().unwrap();
        assert_eq!(partial.team_category, TeamCategory::Wedding);
        assert_eq!(partial.arrival_date, MonthDay::new(6, 8));
        assert_eq!(partial.departure_date, MonthDay::new(6, 8));
    }

    #[test]
    fn test_zero_rate_room_does_not_take_next_price() {
        let record = Extractor::default()
            .extract("FIT001/ABC\n5/1\nSTS 5\n0.00\nJKN 8\n350.00")
            .unwrap();
        assert_eq!(record.room_line_items, vec![RoomLineItem::new("JKN", 8, 350)]);
    }

    #[test]
    fn test_first_team_in_document_order() {
        let text = "note FIT001/ABC\nCON045/SPRINGCO\n5/1\nSTS 5\n300.00";
        let record = Extractor::default().extract(text).unwrap();
        assert_eq!(record.team_identifier, "FIT001/ABC");
        assert_eq!(record.team_category, TeamCategory::Individual);
    }

    #[test]
    fn test_items_sorted_by_count_ties_stable() {
        let text = "FIT001/ABC\n5/1 5/2\nDKN 9\n300.00\nSTS 3\n400.00\nJKN 9\n500.00\nEKN 1\n600.00";
        let record = Extractor::default().extract(text).unwrap();
        let order: Vec<_> = record
            .room_line_items
            .iter()
            .map(|i| (i.room_type.as_str(), i.count))
            .collect();
        assert_eq!(order, vec![("EKN", 1), ("STS", 3), ("DKN", 9), ("JKN", 9)]);
    }

    #[test]
    fn test_single_line_uses_proximity() {
        let text = "CON045/SPRINGCO 12/19 12/21 STS 32 JKN 50 580.00 420.00";
        let record = Extractor::default().extract(text).unwrap();
        assert_eq!(
            record.room_line_items,
            vec![RoomLineItem::new("STS", 32, 580), RoomLineItem::new("JKN", 50, 420)]
        );
    }

    #[test]
    fn test_forced_proximity_on_multiline_text() {
        let config = ExtractorConfig {
            association: Association::Proximity,
            ..ExtractorConfig::default()
        };
        let record = Extractor::new(config).extract(SAMPLE).unwrap();
        assert_eq!(record.room_line_items.len(), 2);
    }

    #[test]
    fn test_proximity_failure_shape() {
        let config = ExtractorConfig {
            association: Association::Proximity,
            ..ExtractorConfig::default()
        };
        let err = Extractor::new(config)
            .extract("CON045/SPRINGCO 12/19 580.00 STS 32")
            .unwrap_err();
        assert_eq!(err.kind(), "no_room_line_items_matched");
    }

    #[test]
    fn test_small_injected_whitelist() {
        let config = ExtractorConfig {
            room_codes: vec!["QQ".to_string()],
            category_prefixes: vec![CategoryPrefix {
                prefix: "GRP".to_string(),
                category: TeamCategory::GenericTour,
            }],
            date_pairing: DatePairing::TwoEarliest,
            ..ExtractorConfig::default()
        };
        let text = "GRP7/TOUR\n3/1 3/3 3/2\nSTS 5\n300.00\nQQ 2\n150.00";
        let record = Extractor::new(config).extract(text).unwrap();
        assert_eq!(record.team_category, TeamCategory::GenericTour);
        assert_eq!(record.departure_date, MonthDay::new(3, 2));
        assert_eq!(record.room_line_items, vec![RoomLineItem::new("QQ", 2, 150)]);
    }

    #[test]
    fn test_full_width_ocr_output() {
        let text = "ＦＩＴ００１／ＡＢＣ\n５／１　５／２\nＳＴＳ　５\n３００．００";
        let record = Extractor::default().extract(text).unwrap();
        assert_eq!(record.team_identifier, "FIT001/ABC");
        assert_eq!(record.room_line_items, vec![RoomLineItem::new("STS", 5, 300)]);
    }
}
