//! Tokenizer for the field-spec mini-language.
//!
//! Splits a comma-separated field definition string into statements of
//! string tokens, honoring four kinds of quoted region (backtick, single
//! quote, double quote, parenthesis) with doubled-terminator escapes.
//!
//! Quirks carried over from the legacy grammar, which downstream code
//! relies on:
//!
//! - A parenthesized region is a quoted region: `C(32)` produces the two
//!   tokens `C` and `32`, with no paren tokens.
//! - Backtick-quoted tokens keep their backticks (`` `order` `` stays
//!   `` `order` ``); the generator strips them when quoting names.
//! - An unterminated quote at end of input flushes the accumulated text
//!   as-is rather than raising an error.

/// Default characters allowed inside an unquoted token besides
/// alphanumerics.
const TOKEN_CHARS: &[char] = &['_', '.', '-'];

/// Tokenizes a field spec into statements of tokens, splitting statements
/// on `separator` outside quoted regions.
#[must_use]
pub fn tokenize(spec: &str, separator: char) -> Vec<Vec<String>> {
    Tokenizer::new(spec, separator).run()
}

/// Tokenizes with the default `,` statement separator.
#[must_use]
pub fn tokenize_fields(spec: &str) -> Vec<Vec<String>> {
    tokenize(spec, ',')
}

struct Tokenizer {
    chars: Vec<char>,
    pos: usize,
    separator: char,
    statements: Vec<Vec<String>>,
    current: Vec<String>,
    token: String,
    in_token: bool,
    // Some(terminator) while inside a quoted region.
    quote: Option<char>,
}

impl Tokenizer {
    fn new(spec: &str, separator: char) -> Self {
        Self {
            chars: spec.chars().collect(),
            pos: 0,
            separator,
            statements: Vec::new(),
            current: Vec::new(),
            token: String::new(),
            in_token: false,
            quote: None,
        }
    }

    fn peek_next(&self) -> Option<char> {
        self.chars.get(self.pos + 1).copied()
    }

    fn flush_token(&mut self) {
        self.current.push(std::mem::take(&mut self.token));
        self.in_token = false;
    }

    fn end_statement(&mut self) {
        self.statements.push(std::mem::take(&mut self.current));
    }

    fn run(mut self) -> Vec<Vec<String>> {
        while self.pos < self.chars.len() {
            let ch = self.chars[self.pos];
            match self.quote {
                Some(terminator) => self.quoted_char(ch, terminator),
                None => self.plain_char(ch),
            }
            self.pos += 1;
        }
        // Permissive EOF: an open token or unterminated quote flushes.
        if self.in_token {
            self.flush_token();
        }
        self.end_statement();
        self.statements.retain(|stmt| !stmt.is_empty());
        self.statements
    }

    fn quoted_char(&mut self, ch: char, terminator: char) {
        if ch == terminator {
            if self.peek_next() == Some(terminator) {
                // Doubled terminator escapes a literal occurrence.
                self.token.push(ch);
                self.pos += 1;
            } else {
                if terminator == '`' {
                    self.token.push('`');
                }
                self.quote = None;
                self.flush_token();
            }
        } else {
            self.token.push(ch);
        }
    }

    fn plain_char(&mut self, ch: char) {
        match ch {
            c if c.is_whitespace() => {
                if self.in_token {
                    self.flush_token();
                }
            }
            '`' | '\'' | '"' | '(' => {
                if self.in_token {
                    self.flush_token();
                }
                self.quote = Some(if ch == '(' { ')' } else { ch });
                self.in_token = true;
                if ch == '`' {
                    self.token.push('`');
                }
            }
            c if c == self.separator => {
                if self.in_token {
                    self.flush_token();
                }
                self.end_statement();
            }
            c if c.is_alphanumeric() || TOKEN_CHARS.contains(&c) => {
                self.in_token = true;
                self.token.push(c);
            }
            other => {
                // Stray punctuation becomes its own single-character token.
                if self.in_token {
                    self.flush_token();
                }
                self.current.push(other.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one(spec: &str) -> Vec<String> {
        let mut stmts = tokenize_fields(spec);
        assert_eq!(stmts.len(), 1, "expected one statement from {spec:?}");
        stmts.remove(0)
    }

    #[test]
    fn splits_statements_on_separator() {
        let stmts = tokenize_fields("id I KEY, name C NOTNULL");
        assert_eq!(
            stmts,
            vec![
                vec!["id", "I", "KEY"],
                vec!["name", "C", "NOTNULL"],
            ]
        );
    }

    #[test]
    fn paren_region_is_one_token() {
        assert_eq!(one("name C(32)"), vec!["name", "C", "32"]);
        assert_eq!(one("price N(7.2)"), vec!["price", "N", "7.2"]);
    }

    #[test]
    fn separator_inside_parens_does_not_split() {
        let stmts = tokenize_fields("status ENUM('a','b'), note C(40)");
        assert_eq!(stmts.len(), 2);
        assert_eq!(stmts[0], vec!["status", "ENUM", "'a','b'"]);
        assert_eq!(stmts[1], vec!["note", "C", "40"]);
    }

    #[test]
    fn doubled_quote_collapses() {
        assert_eq!(
            one("NAME1 C(32) DEFAULT 'it''s'"),
            vec!["NAME1", "C", "32", "DEFAULT", "it's"]
        );
    }

    #[test]
    fn double_quoted_values() {
        assert_eq!(
            one(r#"note C DEFAULT "say ""hi""""#),
            vec!["note", "C", "DEFAULT", r#"say "hi""#]
        );
    }

    #[test]
    fn backticks_are_preserved_in_token() {
        assert_eq!(
            one("`order` C(10) NOTNULL"),
            vec!["`order`", "C", "10", "NOTNULL"]
        );
    }

    #[test]
    fn quoted_whitespace_is_literal() {
        assert_eq!(
            one("greeting C DEFAULT 'hello  world'"),
            vec!["greeting", "C", "DEFAULT", "hello  world"]
        );
    }

    #[test]
    fn unterminated_quote_flushes_at_eof() {
        assert_eq!(one("name C DEFAULT 'oops"), vec!["name", "C", "DEFAULT", "oops"]);
    }

    #[test]
    fn empty_statements_are_filtered() {
        let stmts = tokenize_fields("a I,, b I,");
        assert_eq!(stmts.len(), 2);
        assert_eq!(stmts[0], vec!["a", "I"]);
        assert_eq!(stmts[1], vec!["b", "I"]);
    }

    #[test]
    fn stray_punctuation_is_its_own_token() {
        assert_eq!(one("a I @"), vec!["a", "I", "@"]);
    }

    #[test]
    fn empty_quoted_value_yields_empty_token() {
        assert_eq!(one("name C DEFAULT ''"), vec!["name", "C", "DEFAULT", ""]);
    }

    #[test]
    fn empty_input() {
        assert!(tokenize_fields("").is_empty());
        assert!(tokenize_fields("  ,  ,").is_empty());
    }
}
