//! Base tokenization: source text to a flat token stream with byte spans.
//!
//! This is the entry point where catalog source becomes tokens. The lexer
//! never stops on bad input: anything unrecognizable becomes one [Token::Illegal]
//! spanning to the end of its line, and lexing resumes at the newline. The
//! parser decides what an illegal token is worth.

use std::ops::Range;

use logos::Logos;

use super::token::Token;

/// Tokenizes source text, returning tokens paired with their byte spans.
/// The stream always ends with [Token::Eof].
pub fn tokenize(source: &str) -> Vec<(Token, Range<usize>)> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let start = lexer.span().start;
        match result {
            Ok(Token::Illegal) | Err(_) => {
                // Consume the rest of the line; the whole run is one token.
                let rest = lexer.remainder();
                let stop = rest.find('\n').unwrap_or(rest.len());
                lexer.bump(stop);
                tokens.push((Token::Illegal, start..lexer.span().end));
            }
            Ok(token) => tokens.push((token, lexer.span())),
        }
    }

    tokens.push((Token::Eof, source.len()..source.len()));
    tokens
}

/// 1-based line number of a byte offset, for diagnostics.
pub fn line_of(source: &str, offset: usize) -> usize {
    let end = offset.min(source.len());
    source.as_bytes()[..end].iter().filter(|&&b| b == b'\n').count() + 1
}

/// Strips the surrounding quotes of a string literal and resolves the
/// recognized escapes (`\"`, `\\`, `\n`, `\t`). Unrecognized escape pairs
/// are kept verbatim.
pub fn unquote(literal: &str) -> String {
    let inner = literal
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(literal);

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
