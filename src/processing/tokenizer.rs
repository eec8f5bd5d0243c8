// Single pass over normalized OCR text producing every token the extractor
// needs, each with its byte span and line index.

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

use crate::models::{ExtractorConfig, MonthDay};

// ASCII word boundaries: OCR often glues CJK text directly onto numbers
lazy_static! {
    static ref DATE_PATTERN: Regex = Regex::new(r"(?-u:\b)\d{1,2}/\d{1,2}(?-u:\b)").unwrap();
    static ref TIME_PATTERN: Regex = Regex::new(r"(?-u:\b)\d{1,2}:\d{2}(?-u:\b)").unwrap();
    static ref PRICE_PATTERN: Regex =
        Regex::new(r"(?-u:\b)(?P<int>\d{1,3}(?:,\d{3})+|\d+)(?:[ \t]*\.[ \t]*(?P<frac>\d{2}))?(?-u:\b)").unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// Team identifier, already normalized to a single `/`
    Team(String),
    /// Month/day token; `value` is `None` when the pair is not a real date
    Date { raw: String, value: Option<MonthDay> },
    /// Clock time such as `18:00`; only claimed so it cannot be read as a price
    Time,
    /// Whitelisted room code with whatever followed it as the count
    Room { code: String, count: Option<u32>, count_raw: String },
    Price { value: u32, integer_digits: usize, has_fraction: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
    pub line: usize,
}

/// Tokens of one text, sorted by position
#[derive(Debug, Clone)]
pub struct TokenStream {
    pub tokens: Vec<Token>,
    lines: Vec<String>,
}

impl TokenStream {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of lines with non-blank content
    pub fn content_line_count(&self) -> usize {
        self.lines.iter().filter(|l| !l.trim().is_empty()).count()
    }

    pub fn teams(&self) -> impl Iterator<Item = (&Token, &str)> {
        self.tokens.iter().filter_map(|t| match &t.kind {
            TokenKind::Team(identifier) => Some((t, identifier.as_str())),
            _ => None,
        })
    }

    pub fn dates(&self) -> impl Iterator<Item = (&str, Option<MonthDay>)> {
        self.tokens.iter().filter_map(|t| match &t.kind {
            TokenKind::Date { raw, value } => Some((raw.as_str(), *value)),
            _ => None,
        })
    }

    pub fn rooms(&self) -> impl Iterator<Item = &Token> {
        self.tokens
            .iter()
            .filter(|t| matches!(t.kind, TokenKind::Room { .. }))
    }

    pub fn prices(&self) -> impl Iterator<Item = &Token> {
        self.tokens
            .iter()
            .filter(|t| matches!(t.kind, TokenKind::Price { .. }))
    }

    pub fn line_has_team(&self, line: usize) -> bool {
        self.tokens
            .iter()
            .any(|t| t.line == line && matches!(t.kind, TokenKind::Team(_)))
    }
}

/// Token grammars compiled from an extractor configuration
pub struct Tokenizer {
    team_pattern: Option<Regex>,
    room_pattern: Option<Regex>,
}

impl Tokenizer {
    pub fn new(config: &ExtractorConfig) -> Self {
        Tokenizer {
            team_pattern: Self::build_team_pattern(config),
            room_pattern: Self::build_room_pattern(config),
        }
    }

    // (CON|FIT|WA)<digits>/<token>, case-insensitive, OCR spaces allowed around the slash
    fn build_team_pattern(config: &ExtractorConfig) -> Option<Regex> {
        let prefixes: Vec<String> = config
            .category_prefixes
            .iter()
            .map(|p| p.prefix.trim())
            .filter(|p| !p.is_empty())
            .map(regex::escape)
            .collect();
        if prefixes.is_empty() {
            return None;
        }
        let pattern = format!(
            r"(?i)(?P<head>(?:{})\d+)[ \t]*/[ \t]*(?P<tail>\S+)",
            prefixes.join("|")
        );
        Regex::new(&pattern).ok()
    }

    // Letters of each code may be split by one stray space; longest codes first
    fn build_room_pattern(config: &ExtractorConfig) -> Option<Regex> {
        let mut codes: Vec<&String> = config
            .room_codes
            .iter()
            .filter(|c| !c.is_empty())
            .collect();
        if codes.is_empty() {
            return None;
        }
        codes.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        let alternatives: Vec<String> = codes
            .iter()
            .map(|code| {
                code.chars()
                    .map(|c| regex::escape(&c.to_string()))
                    .collect::<Vec<_>>()
                    .join("[ \\t]?")
            })
            .collect();
        let pattern = format!(
            r"(?-u:\b)(?P<code>{})[ \t]*(?P<count>[0-9A-Za-z]+)?",
            alternatives.join("|")
        );
        Regex::new(&pattern).ok()
    }

    pub fn tokenize(&self, text: &str) -> TokenStream {
        let line_starts: Vec<usize> = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        let line_of = |offset: usize| line_starts.partition_point(|&s| s <= offset) - 1;

        let mut claims = Claims::default();
        let mut tokens = Vec::new();

        if let Some(pattern) = &self.team_pattern {
            for caps in pattern.captures_iter(text) {
                let whole = caps.get(0).map(|m| (m.start(), m.end()));
                if let (Some((start, end)), Some(head), Some(tail)) =
                    (whole, caps.name("head"), caps.name("tail"))
                {
                    if claims.claim(start, end) {
                        let identifier = format!("{}/{}", head.as_str(), tail.as_str());
                        tokens.push(Token {
                            kind: TokenKind::Team(identifier),
                            start,
                            end,
                            line: line_of(start),
                        });
                    }
                }
            }
        }

        for m in DATE_PATTERN.find_iter(text) {
            if claims.claim(m.start(), m.end()) {
                tokens.push(Token {
                    kind: TokenKind::Date {
                        raw: m.as_str().to_string(),
                        value: MonthDay::parse(m.as_str()),
                    },
                    start: m.start(),
                    end: m.end(),
                    line: line_of(m.start()),
                });
            }
        }

        for m in TIME_PATTERN.find_iter(text) {
            if claims.claim(m.start(), m.end()) {
                tokens.push(Token {
                    kind: TokenKind::Time,
                    start: m.start(),
                    end: m.end(),
                    line: line_of(m.start()),
                });
            }
        }

        if let Some(pattern) = &self.room_pattern {
            for caps in pattern.captures_iter(text) {
                let (Some(whole), Some(code)) = (caps.get(0), caps.name("code")) else {
                    continue;
                };
                let code: String = code.as_str().chars().filter(|c| !c.is_whitespace()).collect();
                let count_match = caps.name("count");
                let end = count_match.map(|c| c.end()).unwrap_or_else(|| whole.end());
                if !claims.claim(whole.start(), end) {
                    debug!("Room code {} overlaps an earlier token, skipped", code);
                    continue;
                }
                let count_raw = count_match.map(|c| c.as_str().to_string()).unwrap_or_default();
                let count = if !count_raw.is_empty() && count_raw.chars().all(|c| c.is_ascii_digit())
                {
                    count_raw.parse::<u32>().ok()
                } else {
                    None
                };
                tokens.push(Token {
                    kind: TokenKind::Room {
                        code,
                        count,
                        count_raw,
                    },
                    start: whole.start(),
                    end,
                    line: line_of(whole.start()),
                });
            }
        }

        for caps in PRICE_PATTERN.captures_iter(text) {
            let (Some(whole), Some(int)) = (caps.get(0), caps.name("int")) else {
                continue;
            };
            if !claims.claim(whole.start(), whole.end()) {
                continue;
            }
            // Fractional part is dropped: prices are truncated, never rounded.
            // Thousands separators are allowed in the integer part.
            let digits: String = int.as_str().chars().filter(|c| c.is_ascii_digit()).collect();
            let Ok(value) = digits.parse::<u32>() else {
                debug!("Price token {} out of range, skipped", whole.as_str());
                continue;
            };
            tokens.push(Token {
                kind: TokenKind::Price {
                    value,
                    integer_digits: digits.len(),
                    has_fraction: caps.name("frac").is_some(),
                },
                start: whole.start(),
                end: whole.end(),
                line: line_of(whole.start()),
            });
        }

        tokens.sort_by_key(|t| t.start);
        TokenStream {
            tokens,
            lines: text.split('\n').map(|l| l.to_string()).collect(),
        }
    }
}

// Byte ranges already owned by a higher-priority token
#[derive(Default)]
struct Claims {
    spans: Vec<(usize, usize)>,
}

impl Claims {
    fn claim(&mut self, start: usize, end: usize) -> bool {
        if self.spans.iter().any(|&(s, e)| start < e && s < end) {
            return false;
        }
        self.spans.push((start, end));
        true
    }
}
