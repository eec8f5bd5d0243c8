use std::fs;
use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::models::TeamCategory;
use crate::utils::NoticeError;

/// Room-type codes recognised by default. Closed set: anything else is never a room.
pub const DEFAULT_ROOM_CODES: [&str; 45] = [
    "STS", "JKN", "SKN", "STN", "DKN", "DTN", "DKS", "DTS", "EKN", "ETN", "EKS", "ETS", "JSK",
    "JST", "ESK", "EST", "PKN", "PTN", "PSK", "PST", "GKN", "GTN", "HKN", "HTN", "CKN", "CTN",
    "BKN", "BTN", "LKN", "LTN", "SUK", "SUT", "SKS", "DLX", "DLXK", "DLXT", "EXK", "EXT", "FAM",
    "PRS", "AMB", "KNG", "TWN", "DBL", "SGL",
];

/// Lines containing one of these end the price search for the room above them
pub const DEFAULT_TERMINATORS: [&str; 3] = ["自己", "自用", "团体"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryPrefix {
    pub prefix: String,
    pub category: TeamCategory,
}

/// How arrival and departure are chosen from the dates found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatePairing {
    /// Earliest is arrival, latest is departure
    EarliestLatest,
    /// Earliest is arrival, second earliest is departure
    TwoEarliest,
    /// First two distinct dates as they appear in the text
    DocumentOrder,
}

/// Which tokens count as a unit price in the line-scoped strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceGrammar {
    /// `580.00`, tolerating OCR spaces around the point
    DecimalRequired,
    /// Decimal form, or a bare integer of two or more digits
    BareIntegerAllowed,
}

/// How room occurrences are paired with prices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Association {
    LineScoped,
    Proximity,
    /// Line-scoped when the text has at least two non-blank lines
    Auto,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    pub room_codes: Vec<String>,
    pub category_prefixes: Vec<CategoryPrefix>,
    pub terminators: Vec<String>,
    pub date_pairing: DatePairing,
    pub price_grammar: PriceGrammar,
    pub association: Association,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        ExtractorConfig {
            room_codes: DEFAULT_ROOM_CODES.iter().map(|c| c.to_string()).collect(),
            category_prefixes: vec![
                CategoryPrefix {
                    prefix: "CON".to_string(),
                    category: TeamCategory::Conference,
                },
                CategoryPrefix {
                    prefix: "FIT".to_string(),
                    category: TeamCategory::Individual,
                },
                CategoryPrefix {
                    prefix: "WA".to_string(),
                    category: TeamCategory::Wedding,
                },
            ],
            terminators: DEFAULT_TERMINATORS.iter().map(|t| t.to_string()).collect(),
            date_pairing: DatePairing::EarliestLatest,
            price_grammar: PriceGrammar::DecimalRequired,
            association: Association::Auto,
        }
    }
}

impl ExtractorConfig {
    /// Category for an identifier; unknown prefixes fall back to a generic tour
    pub fn categorize(&self, team_identifier: &str) -> TeamCategory {
        let head: String = team_identifier.chars().take(3).collect::<String>().to_uppercase();
        self.category_prefixes
            .iter()
            .map(|p| (p.prefix.trim().to_uppercase(), p.category))
            .find(|(prefix, _)| !prefix.is_empty() && head.starts_with(prefix.as_str()))
            .map(|(_, category)| category)
            .unwrap_or(TeamCategory::GenericTour)
    }

    pub fn is_room_code(&self, code: &str) -> bool {
        self.room_codes.iter().any(|c| c == code)
    }

    pub fn has_terminator(&self, line: &str) -> bool {
        self.terminators.iter().any(|t| !t.is_empty() && line.contains(t.as_str()))
    }

    // Room codes are compared upper-cased; configs written by hand may not be
    fn normalized(mut self) -> Self {
        for code in self.room_codes.iter_mut() {
            *code = code.trim().to_uppercase();
        }
        self.room_codes.retain(|c| !c.is_empty());
        self.category_prefixes.retain(|p| !p.prefix.trim().is_empty());
        self
    }
}

/// Rendering template for one room line item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomTemplate {
    /// `32 STS(580)`
    Compact,
    /// `32间STS(580元)`
    Localized,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoticeConfig {
    pub date_connector: String,
    pub room_template: RoomTemplate,
    pub empty_rooms_placeholder: String,
}

impl Default for NoticeConfig {
    fn default() -> Self {
        NoticeConfig {
            date_connector: "至".to_string(),
            room_template: RoomTemplate::Compact,
            empty_rooms_placeholder: "无房间明细".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub extractor: ExtractorConfig,
    pub notice: NoticeConfig,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, NoticeError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| NoticeError::Io(format!("{}: {}", path.display(), e)))?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|e| NoticeError::Config(format!("{}: {}", path.display(), e)))?;
        Ok(Config {
            extractor: config.extractor.normalized(),
            notice: config.notice,
        })
    }

    /// Loads the file, or falls back to built-in defaults when it cannot be used
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        match Self::from_file(&path) {
            Ok(config) => {
                info!("Loaded configuration from {}", path.as_ref().display());
                config
            }
            Err(e) => {
                warn!("Using default configuration: {}", e);
                Config::default()
            }
        }
    }
}
