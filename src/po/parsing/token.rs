//! Token definitions for the textual catalog format.
//!
//! Tokens are defined with the logos derive macro. The catalog grammar is
//! line-oriented but whitespace between tokens carries no meaning, so the
//! lexer skips it and the parser works on the flat keyword/string stream.

use logos::Logos;

fn comment_text(lex: &mut logos::Lexer<Token>) -> String {
    lex.slice()[1..].to_owned()
}

fn quoted_literal(lex: &mut logos::Lexer<Token>) -> String {
    lex.slice().to_owned()
}

fn plural_index(lex: &mut logos::Lexer<Token>) -> Option<usize> {
    let slice = lex.slice();
    let open = slice.find('[')?;
    slice[open + 1..slice.len() - 1].parse().ok()
}

/// All tokens of the textual catalog format.
///
/// Keywords match as whole words: `msgidx` is one illegal word, not `msgid`
/// plus trailing garbage. That falls out of longest-match — the catch-all
/// word pattern outgrows any keyword prefix, and explicit priorities break
/// the tie for exact keyword spellings.
#[derive(Logos, Debug, Clone, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n]+")]
pub enum Token {
    /// A `#` line; the literal keeps the text after the `#`.
    #[regex(r"#[^\n]*", comment_text)]
    Comment(String),

    #[token("msgid", priority = 10)]
    Msgid,

    #[token("msgstr", priority = 10)]
    Msgstr,

    #[token("msgctxt", priority = 10)]
    Msgctxt,

    #[token("msgid_plural", priority = 10)]
    MsgidPlural,

    /// `msgstr[N]` as a single token carrying the bracketed index.
    #[regex(r"msgstr\[[0-9]+\]", plural_index, priority = 10)]
    MsgstrPlural(usize),

    /// A double-quoted run, quotes kept and escapes unresolved.
    #[regex(r#""([^"\\\n]|\\[^\n])*""#, quoted_literal)]
    Str(String),

    /// A word matching no keyword. The lexer resynchronizes at the next
    /// newline after producing one of these; severity is the parser's call.
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*(\[[0-9]+\])?", priority = 3)]
    Illegal,

    /// End of input, appended by `tokenize`.
    Eof,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token> {
        Token::lexer(source).filter_map(Result::ok).collect()
    }

    #[test]
    fn test_keywords_lex_as_whole_words() {
        assert_eq!(kinds("msgid"), vec![Token::Msgid]);
        assert_eq!(kinds("msgid_plural"), vec![Token::MsgidPlural]);
        assert_eq!(kinds("msgidx"), vec![Token::Illegal]);
        assert_eq!(kinds("msgid_pluralx"), vec![Token::Illegal]);
    }

    #[test]
    fn test_plural_msgstr_keeps_its_index() {
        assert_eq!(kinds("msgstr[0]"), vec![Token::MsgstrPlural(0)]);
        assert_eq!(kinds("msgstr[1234]"), vec![Token::MsgstrPlural(1234)]);
    }

    #[test]
    fn test_comment_literal_drops_the_hash() {
        assert_eq!(
            kinds("#: file:32"),
            vec![Token::Comment(": file:32".to_string())]
        );
        assert_eq!(kinds("#"), vec![Token::Comment(String::new())]);
    }

    #[test]
    fn test_string_literal_keeps_quotes_and_escapes() {
        assert_eq!(
            kinds(r#""a \"quoted\" word""#),
            vec![Token::Str(r#""a \"quoted\" word""#.to_string())]
        );
    }
}
