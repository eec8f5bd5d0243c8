// Pairing of room occurrences with unit prices.
//
// Two strategies over the same token stream: line-scoped (room line, then the
// first price on it or below it within the block) and whole-document
// proximity (nearest unclaimed price after the room).

use log::debug;

use crate::models::{ExtractorConfig, PriceGrammar, RoomLineItem};
use crate::processing::tokenizer::{Token, TokenKind, TokenStream};

// Proximity pairing has no line structure to lean on, so only values with a
// realistic room-rate magnitude are considered
const PROXIMITY_MIN_PRICE_DIGITS: usize = 3;

// Code and count of a room token, when the count is a positive number
fn room_candidate(token: &Token) -> Option<(&str, u32)> {
    match &token.kind {
        TokenKind::Room {
            code,
            count: Some(count),
            ..
        } if *count > 0 => Some((code.as_str(), *count)),
        TokenKind::Room { code, count_raw, .. } => {
            debug!("Dropping {} with unusable count `{}`", code, count_raw);
            None
        }
        _ => None,
    }
}

fn price_value(token: &Token) -> Option<(u32, usize, bool)> {
    match token.kind {
        TokenKind::Price {
            value,
            integer_digits,
            has_fraction,
        } => Some((value, integer_digits, has_fraction)),
        _ => None,
    }
}

fn accepted_by_grammar(token: &Token, grammar: PriceGrammar) -> Option<u32> {
    let (value, integer_digits, has_fraction) = price_value(token)?;
    let shape_ok = match grammar {
        PriceGrammar::DecimalRequired => has_fraction,
        PriceGrammar::BareIntegerAllowed => has_fraction || integer_digits >= 2,
    };
    shape_ok.then_some(value)
}

fn accepted_by_proximity(token: &Token) -> Option<u32> {
    let (value, integer_digits, _) = price_value(token)?;
    (integer_digits >= PROXIMITY_MIN_PRICE_DIGITS).then_some(value)
}

/// Line-scoped association.
///
/// The price is looked for after the room on its own line, then on the
/// following lines. The search for a room stops at a line holding a team
/// identifier or a block terminator keyword; a price at the head of such a
/// line is still taken. The first price found ends the search even when it is
/// zero, and a zero price drops the room.
pub fn associate_line_scoped(stream: &TokenStream, config: &ExtractorConfig) -> Vec<RoomLineItem> {
    let grammar = config.price_grammar;
    let prices: Vec<&Token> = stream.prices().collect();
    let line_count = stream.lines().len();
    let mut items = Vec::new();

    for room in stream.rooms() {
        let Some((code, count)) = room_candidate(room) else {
            continue;
        };

        let same_line = prices
            .iter()
            .filter(|p| p.line == room.line && p.start >= room.end)
            .find_map(|p| accepted_by_grammar(p, grammar));

        let price = same_line.or_else(|| {
            for line in room.line + 1..line_count {
                let on_line = prices
                    .iter()
                    .filter(|p| p.line == line)
                    .find_map(|p| accepted_by_grammar(p, grammar));
                if on_line.is_some() {
                    return on_line;
                }
                if stream.line_has_team(line) || config.has_terminator(&stream.lines()[line]) {
                    debug!("Price search for {} stopped at line {}", code, line + 1);
                    return None;
                }
            }
            None
        });

        match price {
            Some(0) => debug!("Dropping {} {} priced at zero", code, count),
            Some(unit_price) => items.push(RoomLineItem::new(code, count, unit_price)),
            None => debug!("No price found for {} {}", code, count),
        }
    }

    items
}

/// Whole-document proximity association.
///
/// Rooms are visited in document order; each claims the nearest unclaimed
/// price starting after it. A room whose count was unreadable, or whose price
/// is zero, still claims that price so it cannot drift to a later room.
pub fn associate_by_proximity(stream: &TokenStream) -> Vec<RoomLineItem> {
    let prices: Vec<(usize, u32)> = stream
        .prices()
        .filter_map(|p| accepted_by_proximity(p).map(|value| (p.start, value)))
        .collect();
    let mut claimed = vec![false; prices.len()];
    let mut items = Vec::new();

    for room in stream.rooms() {
        let nearest = prices
            .iter()
            .enumerate()
            .filter(|(i, (start, _))| !claimed[*i] && *start >= room.end)
            .min_by_key(|(_, (start, _))| start - room.end)
            .map(|(i, (_, value))| (i, *value));

        let Some((index, unit_price)) = nearest else {
            debug!("No following price for room at offset {}", room.start);
            continue;
        };
        claimed[index] = true;

        if let Some((code, count)) = room_candidate(room) {
            if unit_price == 0 {
                debug!("Dropping {} {} priced at zero", code, count);
                continue;
            }
            items.push(RoomLineItem::new(code, count, unit_price));
        }
    }

    items
}
