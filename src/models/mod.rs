pub mod data;
pub mod rules;

pub use data::{BookingRecord, MonthDay, RoomLineItem, TableRow, TeamCategory};
pub use rules::{
    Association, CategoryPrefix, Config, DatePairing, ExtractorConfig, NoticeConfig, PriceGrammar,
    RoomTemplate,
};
