use log::info;

use crate::models::{BookingRecord, Config};
use crate::notice::Notifier;
use crate::processing::Extractor;
use crate::utils::ExtractionError;

/// Extraction and notice rendering wired from one configuration.
///
/// The review step sits between the two halves, so they are also exposed
/// separately: `extract`, then whatever edits the reviewer makes, then
/// `notify`.
pub struct NoticeGenerator {
    extractor: Extractor,
    notifier: Notifier,
}

impl NoticeGenerator {
    pub fn new(config: Config) -> Self {
        NoticeGenerator {
            extractor: Extractor::new(config.extractor),
            notifier: Notifier::new(config.notice),
        }
    }

    pub fn extract(&self, ocr_text: &str) -> Result<BookingRecord, ExtractionError> {
        self.extractor.extract(ocr_text)
    }

    pub fn notify(&self, record: &BookingRecord) -> String {
        self.notifier.format(record)
    }

    /// Extracts and formats in one step, skipping review
    pub fn generate(&self, ocr_text: &str) -> Result<String, ExtractionError> {
        let record = self.extract(ocr_text)?;
        let notice = self.notify(&record);
        info!("Generated notice for {}", record.team_identifier);
        Ok(notice)
    }
}

impl Default for NoticeGenerator {
    fn default() -> Self {
        NoticeGenerator::new(Config::default())
    }
}
