pub mod dates;
pub mod extractor;
pub mod normalize;
pub mod rooms;
pub mod tokenizer;

pub use extractor::Extractor;
pub use normalize::normalize_ocr_text;
pub use tokenizer::{Token, TokenKind, TokenStream, Tokenizer};
