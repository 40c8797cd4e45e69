//! Logos-based lexer for coordinate expressions

use logos::{Logos, SpannedIter};
use thiserror::Error;

/// Lexer error carrying the byte offset of the offending input
#[derive(Error, Default, Debug, Clone, PartialEq)]
#[error("unexpected character at offset {offset}")]
pub struct LexerError {
    pub offset: usize,
}

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
#[logos(error = LexerError)]
pub enum Token {
    #[regex(r"[0-9]+(\.[0-9]*)?", |lex| lex.slice().parse::<f64>().ok())]
    #[regex(r"\.[0-9]+", |lex| lex.slice().parse::<f64>().ok())]
    Number(f64),

    #[token("center")]
    Center,
    #[token("c")]
    Half,
    #[token("e")]
    Extent,
    #[token("f")]
    Factor,
    #[token("w")]
    CharWidth,
    #[token("h")]
    LineHeight,
    #[token("%")]
    Percent,

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
}

pub type Spanned<Tok, Loc, Error> = Result<(Loc, Tok, Loc), Error>;

/// Adapter turning the logos stream into the triples lalrpop expects
pub struct Lexer<'input> {
    token_stream: SpannedIter<'input, Token>,
}

impl<'input> Lexer<'input> {
    pub fn new(input: &'input str) -> Self {
        Self {
            token_stream: Token::lexer(input).spanned(),
        }
    }
}

impl<'input> Iterator for Lexer<'input> {
    type Item = Spanned<Token, usize, LexerError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.token_stream.next().map(|(token, span)| match token {
            Ok(token) => Ok((span.start, token, span.end)),
            Err(_) => Err(LexerError { offset: span.start }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        Lexer::new(input).map(|t| t.unwrap().1).collect()
    }

    #[test]
    fn test_keywords_prefer_longest_match() {
        assert_eq!(
            tokens("center-c+e"),
            vec![
                Token::Center,
                Token::Minus,
                Token::Half,
                Token::Plus,
                Token::Extent
            ]
        );
    }

    #[test]
    fn test_unit_suffixes() {
        assert_eq!(
            tokens("10w + 2.5h - 50%"),
            vec![
                Token::Number(10.0),
                Token::CharWidth,
                Token::Plus,
                Token::Number(2.5),
                Token::LineHeight,
                Token::Minus,
                Token::Number(50.0),
                Token::Percent,
            ]
        );
    }

    #[test]
    fn test_invalid_character_reports_offset() {
        let err = Lexer::new("10 + x").find_map(|t| t.err()).unwrap();
        assert_eq!(err.offset, 5);
    }
}
