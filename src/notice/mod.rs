// Sales notice rendering.
//
// Pure formatting: the same record and configuration always give the same
// string. Records may come straight from a reviewer, so nothing here fails;
// missing pieces render as empty text or the configured placeholder.

use crate::models::{BookingRecord, NoticeConfig, RoomLineItem, RoomTemplate};

const NOTICE_PREFIX: &str = "新增";
const NOTICE_SUFFIX: &str = "。销售通知";
const ITEM_SEPARATOR: &str = "，";
const LAST_ITEM_SEPARATOR: &str = "，以及";

pub struct Notifier {
    config: NoticeConfig,
}

impl Notifier {
    pub fn new(config: NoticeConfig) -> Self {
        Notifier { config }
    }

    /// `新增{category} {team} {dates} {rooms}。销售通知`
    pub fn format(&self, record: &BookingRecord) -> String {
        format!(
            "{}{} {} {} {}{}",
            NOTICE_PREFIX,
            record.team_category.label(),
            record.team_identifier.trim(),
            record.date_range_phrase(&self.config.date_connector),
            self.room_list_phrase(&record.room_line_items),
            NOTICE_SUFFIX
        )
    }

    pub fn room_phrase(&self, item: &RoomLineItem) -> String {
        match self.config.room_template {
            RoomTemplate::Compact => {
                format!("{} {}({})", item.count, item.room_type.trim(), item.unit_price)
            }
            RoomTemplate::Localized => {
                format!("{}间{}({}元)", item.count, item.room_type.trim(), item.unit_price)
            }
        }
    }

    /// Items joined with `，`, the last one with `，以及`
    pub fn room_list_phrase(&self, items: &[RoomLineItem]) -> String {
        let phrases: Vec<String> = items.iter().map(|item| self.room_phrase(item)).collect();
        match phrases.split_last() {
            None => self.config.empty_rooms_placeholder.clone(),
            Some((last, [])) => last.clone(),
            Some((last, rest)) => {
                format!("{}{}{}", rest.join(ITEM_SEPARATOR), LAST_ITEM_SEPARATOR, last)
            }
        }
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Notifier::new(NoticeConfig::default())
    }
}
