pub mod models;
pub mod notice;
pub mod pipeline;
pub mod processing;
pub mod utils;

pub use models::{BookingRecord, Config, RoomLineItem, TeamCategory};
pub use notice::Notifier;
pub use pipeline::NoticeGenerator;
pub use processing::Extractor;
pub use utils::{ExtractionError, NoticeError};
