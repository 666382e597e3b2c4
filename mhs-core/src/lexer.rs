//! Lexer for MHS source text.

use std::fmt;

use log::warn;

/// Kind of a token produced by the lexer.
///
/// The lexer only classifies text; literal values are kept as lexemes
/// and interpreted by the parser and the code generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // Special
    Eof,

    // Identifiers and literals
    Ident,
    Number,
    Str,

    // Punctuation
    LParen,   // (
    RParen,   // )
    LBrace,   // {
    RBrace,   // }
    LBracket, // [
    RBracket, // ]
    Comma,    // ,
    Colon,    // :
    Dot,      // .

    // Operators
    Assign, // :=
    Plus,   // +
    Minus,  // -
    Star,   // *
    Slash,  // /
    EqEq,   // ==
    NotEq,  // !=
    Less,   // <
    Greater, // >
    AndAnd, // &&
    OrOr,   // ||

    // Keywords
    Val,
    Var,
    Fn,
    Struct,
    If,
    Else,
    While,
    For,
    To,
    Switch,
    Case,
    Return,
    Break,
    Continue,
    This,
    Null,
}

impl TokenKind {
    pub fn is_keyword(self) -> bool {
        keyword_text(self).is_some()
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A single token: its kind plus the exact source text it covers.
///
/// String literal lexemes exclude the surrounding quotes but keep
/// escape sequences untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>) -> Self {
        Token {
            kind,
            lexeme: lexeme.into(),
        }
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

/// A character the lexer dropped because it starts no token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Skipped {
    pub offset: usize,
    pub ch: char,
}

/// Result of lexing a source string.
#[derive(Debug)]
pub struct LexResult {
    pub tokens: Vec<Token>,
    pub skipped: Vec<Skipped>,
}

/// Lex a source string into tokens.
///
/// Lexing never fails: unknown characters are recorded in
/// [`LexResult::skipped`] and otherwise ignored, and the token list
/// always ends with exactly one [`TokenKind::Eof`].
pub fn lex(source: &str) -> LexResult {
    let mut lexer = Lexer {
        source,
        chars: source.as_bytes(),
        index: 0,
        skipped: Vec::new(),
    };
    lexer.run()
}

struct Lexer<'src> {
    source: &'src str,
    chars: &'src [u8],
    index: usize,
    skipped: Vec<Skipped>,
}

impl<'src> Lexer<'src> {
    fn run(&mut self) -> LexResult {
        let mut tokens = Vec::new();

        while let Some(ch) = self.peek_char() {
            if is_whitespace(ch) {
                self.consume_char();
                continue;
            }

            if ch == b'/' && self.peek_next() == Some(b'/') {
                self.skip_line_comment();
                continue;
            }

            let start = self.index;
            let token = match ch {
                b'(' => self.single(TokenKind::LParen, start),
                b')' => self.single(TokenKind::RParen, start),
                b'{' => self.single(TokenKind::LBrace, start),
                b'}' => self.single(TokenKind::RBrace, start),
                b'[' => self.single(TokenKind::LBracket, start),
                b']' => self.single(TokenKind::RBracket, start),
                b',' => self.single(TokenKind::Comma, start),
                b'.' => self.single(TokenKind::Dot, start),
                b'+' => self.single(TokenKind::Plus, start),
                b'-' => self.single(TokenKind::Minus, start),
                b'*' => self.single(TokenKind::Star, start),
                b'/' => self.single(TokenKind::Slash, start),
                b'<' => self.single(TokenKind::Less, start),
                b'>' => self.single(TokenKind::Greater, start),
                b':' => {
                    if self.peek_next() == Some(b'=') {
                        self.pair(TokenKind::Assign, start)
                    } else {
                        self.single(TokenKind::Colon, start)
                    }
                }
                b'=' if self.peek_next() == Some(b'=') => self.pair(TokenKind::EqEq, start),
                b'!' if self.peek_next() == Some(b'=') => self.pair(TokenKind::NotEq, start),
                b'&' if self.peek_next() == Some(b'&') => self.pair(TokenKind::AndAnd, start),
                b'|' if self.peek_next() == Some(b'|') => self.pair(TokenKind::OrOr, start),
                b'"' => self.lex_string(),
                b'0'..=b'9' => self.lex_number(start),
                _ if is_ident_start(ch) => self.lex_ident_or_keyword(start),
                _ => {
                    self.skip_unknown(start);
                    continue;
                }
            };

            tokens.push(token);
        }

        tokens.push(Token::new(TokenKind::Eof, ""));

        LexResult {
            tokens,
            skipped: std::mem::take(&mut self.skipped),
        }
    }

    fn single(&mut self, kind: TokenKind, start: usize) -> Token {
        self.consume_char();
        self.simple_token(kind, start)
    }

    fn pair(&mut self, kind: TokenKind, start: usize) -> Token {
        self.consume_char();
        self.consume_char();
        self.simple_token(kind, start)
    }

    fn simple_token(&self, kind: TokenKind, start: usize) -> Token {
        Token::new(kind, &self.source[start..self.index])
    }

    fn skip_line_comment(&mut self) {
        while let Some(ch) = self.peek_char() {
            if ch == b'\n' {
                break;
            }
            self.consume_char();
        }
    }

    fn skip_unknown(&mut self, start: usize) {
        // Step over the whole UTF-8 sequence so the offset stays on a char boundary.
        let ch = self.source[start..].chars().next().unwrap_or('\u{fffd}');
        self.index += ch.len_utf8().max(1);
        self.skipped.push(Skipped { offset: start, ch });
    }

    fn lex_string(&mut self) -> Token {
        // Consume the opening quote
        self.consume_char();

        let content_start = self.index;
        while let Some(ch) = self.peek_char() {
            match ch {
                b'"' => {
                    let content_end = self.index;
                    self.consume_char(); // closing quote
                    return Token::new(TokenKind::Str, &self.source[content_start..content_end]);
                }
                b'\\' => {
                    // Keep backslash + next char verbatim
                    self.consume_char();
                    if self.peek_char().is_some() {
                        self.consume_char();
                    }
                }
                _ => {
                    self.consume_char();
                }
            }
        }

        // Unterminated string runs to the end of input
        warn!("unterminated string literal at byte {}", content_start - 1);
        Token::new(TokenKind::Str, &self.source[content_start..self.index])
    }

    fn lex_number(&mut self, start: usize) -> Token {
        while let Some(ch) = self.peek_char() {
            if ch.is_ascii_digit() {
                self.consume_char();
            } else {
                break;
            }
        }
        self.simple_token(TokenKind::Number, start)
    }

    fn lex_ident_or_keyword(&mut self, start: usize) -> Token {
        while let Some(ch) = self.peek_char() {
            if is_ident_continue(ch) {
                self.consume_char();
            } else {
                break;
            }
        }

        let text = &self.source[start..self.index];
        let kind = match text {
            "val" => TokenKind::Val,
            "var" => TokenKind::Var,
            "fn" => TokenKind::Fn,
            "struct" => TokenKind::Struct,
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "while" => TokenKind::While,
            "for" => TokenKind::For,
            "to" => TokenKind::To,
            "switch" => TokenKind::Switch,
            "case" => TokenKind::Case,
            "return" => TokenKind::Return,
            "break" => TokenKind::Break,
            "continue" => TokenKind::Continue,
            "this" => TokenKind::This,
            "null" => TokenKind::Null,
            _ => TokenKind::Ident,
        };

        Token::new(kind, text)
    }

    fn peek_char(&self) -> Option<u8> {
        self.chars.get(self.index).copied()
    }

    fn peek_next(&self) -> Option<u8> {
        self.chars.get(self.index + 1).copied()
    }

    fn consume_char(&mut self) {
        if self.index < self.chars.len() {
            self.index += 1;
        }
    }
}

fn keyword_text(kind: TokenKind) -> Option<&'static str> {
    use TokenKind::*;
    let text = match kind {
        Val => "val",
        Var => "var",
        Fn => "fn",
        Struct => "struct",
        If => "if",
        Else => "else",
        While => "while",
        For => "for",
        To => "to",
        Switch => "switch",
        Case => "case",
        Return => "return",
        Break => "break",
        Continue => "continue",
        This => "this",
        Null => "null",
        _ => return None,
    };
    Some(text)
}

fn is_whitespace(ch: u8) -> bool {
    ch.is_ascii_whitespace()
}

fn is_ident_start(ch: u8) -> bool {
    ch.is_ascii_alphabetic() || ch == b'_'
}

fn is_ident_continue(ch: u8) -> bool {
    is_ident_start(ch) || ch.is_ascii_digit()
}

/// Decode `\n`, `\t`, `\r`, `\0`, `\\` and `\"`. Any other escaped
/// character stands for itself.
pub fn decode_escapes(raw: &str) -> String {
    let mut decoded = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            decoded.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => decoded.push('\n'),
            Some('t') => decoded.push('\t'),
            Some('r') => decoded.push('\r'),
            Some('0') => decoded.push('\0'),
            Some(other) => decoded.push(other),
            None => decoded.push('\\'),
        }
    }
    decoded
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex(source).tokens.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn one_token_per_lexeme_plus_eof() {
        let result = lex("a := b + 1 // trailing comment\n");
        assert_eq!(
            kinds("a := b + 1 // trailing comment\n"),
            vec![
                TokenKind::Ident,
                TokenKind::Assign,
                TokenKind::Ident,
                TokenKind::Plus,
                TokenKind::Number,
                TokenKind::Eof,
            ]
        );
        assert!(result.skipped.is_empty());
    }

    #[test]
    fn two_char_operators_win_over_prefixes() {
        assert_eq!(
            kinds(":= : == != && ||"),
            vec![
                TokenKind::Assign,
                TokenKind::Colon,
                TokenKind::EqEq,
                TokenKind::NotEq,
                TokenKind::AndAnd,
                TokenKind::OrOr,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn keywords_override_identifiers() {
        let tokens = lex("val var fn struct this null values _x1").tokens;
        assert_eq!(tokens[0].kind, TokenKind::Val);
        assert_eq!(tokens[4].kind, TokenKind::This);
        assert_eq!(tokens[5].kind, TokenKind::Null);
        assert_eq!(tokens[6], Token::new(TokenKind::Ident, "values"));
        assert_eq!(tokens[7], Token::new(TokenKind::Ident, "_x1"));
    }

    #[test]
    fn string_escapes_are_kept_verbatim() {
        let tokens = lex(r#""say \"hi\"\n""#).tokens;
        assert_eq!(tokens[0], Token::new(TokenKind::Str, r#"say \"hi\"\n"#));
        assert_eq!(tokens.len(), 2);
    }

    #[test]
    fn escapes_decode_after_lexing() {
        assert_eq!(decode_escapes(r"a\nb"), "a\nb");
        assert_eq!(decode_escapes(r#"say \"hi\""#), "say \"hi\"");
        assert_eq!(decode_escapes(r"\q\\"), "q\\");
    }

    #[test]
    fn numbers_are_maximal_digit_runs() {
        let tokens = lex("123abc").tokens;
        assert_eq!(tokens[0], Token::new(TokenKind::Number, "123"));
        assert_eq!(tokens[1], Token::new(TokenKind::Ident, "abc"));
    }

    #[test]
    fn unknown_characters_are_dropped_and_recorded() {
        let result = lex("a @ # b = ! é");
        let kinds: Vec<_> = result.tokens.iter().map(|t| t.kind).collect();
        assert_eq!(kinds, vec![TokenKind::Ident, TokenKind::Ident, TokenKind::Eof]);
        let dropped: Vec<char> = result.skipped.iter().map(|s| s.ch).collect();
        assert_eq!(dropped, vec!['@', '#', '=', '!', 'é']);
    }

    #[test]
    fn slash_alone_is_division() {
        assert_eq!(
            kinds("6 / 3"),
            vec![TokenKind::Number, TokenKind::Slash, TokenKind::Number, TokenKind::Eof]
        );
    }

    #[test]
    fn unterminated_string_runs_to_end() {
        let tokens = lex("\"abc").tokens;
        assert_eq!(tokens[0], Token::new(TokenKind::Str, "abc"));
        assert_eq!(tokens[1].kind, TokenKind::Eof);
    }

    #[test]
    fn empty_input_is_just_eof() {
        assert_eq!(kinds("  // nothing here"), vec![TokenKind::Eof]);
    }
}
