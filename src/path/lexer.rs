//! Path expression lexer
//!
//! Tokenizes location paths such as `/project/dependencies/dependency[artifactId='x']`.

/// Location path token types
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Slash,       // /
    DoubleSlash, // //
    Dot,         // .
    DoubleDot,   // ..
    At,          // @
    Star,        // *
    Eq,          // =
    NotEq,       // !=
    And,         // and
    Or,          // or

    LeftParen,    // (
    RightParen,   // )
    LeftBracket,  // [
    RightBracket, // ]

    Number(usize),
    String(String),

    /// A name, possibly qualified: `artifactId`, `xsi:schemaLocation`
    Name(String),

    /// `text()` or `last()`, without the parentheses
    Function(String),

    /// A character that cannot start any token
    Unexpected(char),

    Eof,
}

/// Location path lexer
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer { input, pos: 0 }
    }

    fn remaining(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    fn advance(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.input.len());
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance(c.len_utf8());
            } else {
                break;
            }
        }
    }

    /// Get the next token
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let Some(c) = self.peek() else {
            return Token::Eof;
        };

        match c {
            '/' => {
                self.advance(1);
                if self.peek() == Some('/') {
                    self.advance(1);
                    Token::DoubleSlash
                } else {
                    Token::Slash
                }
            }
            '.' => {
                self.advance(1);
                if self.peek() == Some('.') {
                    self.advance(1);
                    Token::DoubleDot
                } else {
                    Token::Dot
                }
            }
            '@' => {
                self.advance(1);
                Token::At
            }
            '*' => {
                self.advance(1);
                Token::Star
            }
            '=' => {
                self.advance(1);
                Token::Eq
            }
            '!' => {
                self.advance(1);
                if self.peek() == Some('=') {
                    self.advance(1);
                    Token::NotEq
                } else {
                    Token::Unexpected('!')
                }
            }
            '(' => {
                self.advance(1);
                Token::LeftParen
            }
            ')' => {
                self.advance(1);
                Token::RightParen
            }
            '[' => {
                self.advance(1);
                Token::LeftBracket
            }
            ']' => {
                self.advance(1);
                Token::RightBracket
            }
            '"' | '\'' => self.read_string(),
            '0'..='9' => self.read_number(),
            _ if is_name_start_char(c) => self.read_name_or_keyword(),
            _ => {
                self.advance(c.len_utf8());
                Token::Unexpected(c)
            }
        }
    }

    fn read_number(&mut self) -> Token {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance(1);
        }

        match self.input[start..self.pos].parse() {
            Ok(n) => Token::Number(n),
            Err(_) => Token::Unexpected('0'),
        }
    }

    /// Unterminated strings run to the end of the input.
    fn read_string(&mut self) -> Token {
        let quote = self.peek().unwrap_or('"');
        self.advance(1);

        let start = self.pos;
        while let Some(c) = self.peek() {
            if c == quote {
                break;
            }
            self.advance(c.len_utf8());
        }

        let value = self.input[start..self.pos].to_string();
        self.advance(1);
        Token::String(value)
    }

    fn read_name_or_keyword(&mut self) -> Token {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if is_name_char(c) {
                self.advance(c.len_utf8());
            } else {
                break;
            }
        }

        let name = &self.input[start..self.pos];
        match name {
            "and" => Token::And,
            "or" => Token::Or,
            _ if self.remaining().starts_with("()") => {
                self.advance(2);
                Token::Function(name.to_string())
            }
            _ => Token::Name(name.to_string()),
        }
    }

    /// Tokenize entire input
    #[cfg(test)]
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            if matches!(token, Token::Eof) {
                break;
            }
            tokens.push(token);
        }
        tokens
    }
}

fn is_name_start_char(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | ':')
}
