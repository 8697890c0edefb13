pub mod token;

pub use token::{Position, Token, TokenKind};


/// Tokenize an entire source string, up to and including the first `EOF`
/// token. Convenient for tests and token dumps; the parser drives a
/// `Lexer` directly instead.
pub fn lex(filename: &str, source: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(filename, source);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token();
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            break;
        }
    }
    tokens
}

/// Streaming tokenizer. Never fails: unrecognized input is emitted as
/// `ILLEGAL` tokens, and once the input is exhausted `next_token`
/// returns `EOF` tokens indefinitely.
pub struct Lexer {
    filename: String,
    input: Vec<char>,
    position: usize,
    line: u32,
    column: u32,
}

impl Lexer {
    pub fn new(filename: &str, source: &str) -> Self {
        Self {
            filename: filename.to_string(),
            input: source.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace_and_comments();

        let position = self.current_position();
        if self.is_at_end() {
            return Token::new(TokenKind::Eof, "", position);
        }

        let ch = self.peek();
        match ch {
            '0'..='9' => self.read_number(position),
            '"' => self.read_string(position),
            c if c.is_alphabetic() || c == '_' => self.read_identifier(position),
            _ => self.read_operator(position),
        }
    }

    fn read_identifier(&mut self, position: Position) -> Token {
        let mut name = String::new();
        while !self.is_at_end() {
            let ch = self.peek();
            if ch.is_alphanumeric() || ch == '_' {
                name.push(self.advance());
            } else {
                break;
            }
        }

        let kind = match name.as_str() {
            "fn" => TokenKind::Function,
            "let" => TokenKind::Let,
            "return" => TokenKind::Return,
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "nil" => TokenKind::Nil,
            _ => TokenKind::Identifier,
        };

        Token::new(kind, name, position)
    }

    fn read_number(&mut self, position: Position) -> Token {
        let mut text = String::new();

        while !self.is_at_end() && self.peek().is_ascii_digit() {
            text.push(self.advance());
        }

        if self.peek() == '.' && self.peek_next().is_ascii_digit() {
            text.push(self.advance());
            while !self.is_at_end() && self.peek().is_ascii_digit() {
                text.push(self.advance());
            }
        }

        if self.peek() == 'e' || self.peek() == 'E' {
            let exponent_digits = if self.peek_next() == '+' || self.peek_next() == '-' {
                self.input
                    .get(self.position + 2)
                    .is_some_and(|c| c.is_ascii_digit())
            } else {
                self.peek_next().is_ascii_digit()
            };
            if exponent_digits {
                text.push(self.advance());
                if self.peek() == '+' || self.peek() == '-' {
                    text.push(self.advance());
                }
                while !self.is_at_end() && self.peek().is_ascii_digit() {
                    text.push(self.advance());
                }
            }
        }

        Token::new(TokenKind::Number, text, position)
    }

    fn read_string(&mut self, position: Position) -> Token {
        self.advance(); // opening quote

        let mut value = String::new();
        while !self.is_at_end() {
            let ch = self.peek();

            if ch == '"' {
                self.advance();
                return Token::new(TokenKind::String, value, position);
            }

            if ch == '\\' {
                self.advance();
                if self.is_at_end() {
                    break;
                }
                let escaped = match self.peek() {
                    'n' => '\n',
                    't' => '\t',
                    'r' => '\r',
                    '"' => '"',
                    '\\' => '\\',
                    other => other,
                };
                value.push(escaped);
                self.advance();
            } else {
                value.push(self.advance());
            }
        }

        // Unterminated string: surface what was consumed as an illegal token.
        Token::new(TokenKind::Illegal, value, position)
    }

    fn read_operator(&mut self, position: Position) -> Token {
        let ch = self.advance();
        let (kind, literal) = match ch {
            '=' => {
                if self.peek() == '=' {
                    self.advance();
                    (TokenKind::Eq, "==")
                } else {
                    (TokenKind::Assign, "=")
                }
            }
            '!' => {
                if self.peek() == '=' {
                    self.advance();
                    (TokenKind::Neq, "!=")
                } else {
                    (TokenKind::Bang, "!")
                }
            }
            '+' => {
                if self.peek() == '+' {
                    self.advance();
                    (TokenKind::Increment, "++")
                } else {
                    (TokenKind::Plus, "+")
                }
            }
            '-' => {
                if self.peek() == '-' {
                    self.advance();
                    (TokenKind::Decrement, "--")
                } else {
                    (TokenKind::Minus, "-")
                }
            }
            '*' => {
                if self.peek() == '*' {
                    self.advance();
                    (TokenKind::Power, "**")
                } else {
                    (TokenKind::Multiply, "*")
                }
            }
            '/' => (TokenKind::Divide, "/"),
            '%' => (TokenKind::Mod, "%"),
            '<' => {
                if self.peek() == '=' {
                    self.advance();
                    (TokenKind::Le, "<=")
                } else {
                    (TokenKind::Lt, "<")
                }
            }
            '>' => {
                if self.peek() == '=' {
                    self.advance();
                    (TokenKind::Ge, ">=")
                } else {
                    (TokenKind::Gt, ">")
                }
            }
            '(' => (TokenKind::LParen, "("),
            ')' => (TokenKind::RParen, ")"),
            '[' => (TokenKind::LBracket, "["),
            ']' => (TokenKind::RBracket, "]"),
            '{' => (TokenKind::LBrace, "{"),
            '}' => (TokenKind::RBrace, "}"),
            ',' => (TokenKind::Comma, ","),
            ':' => (TokenKind::Colon, ":"),
            ';' => (TokenKind::Semicolon, ";"),
            '.' => (TokenKind::Dot, "."),
            other => {
                return Token::new(TokenKind::Illegal, other.to_string(), position);
            }
        };
        Token::new(kind, literal, position)
    }

    fn skip_whitespace_and_comments(&mut self) {
        while !self.is_at_end() {
            match self.peek() {
                ' ' | '\t' | '\r' | '\n' => {
                    self.advance();
                }
                '#' => self.skip_line(),
                '/' if self.peek_next() == '/' => self.skip_line(),
                _ => break,
            }
        }
    }

    fn skip_line(&mut self) {
        while !self.is_at_end() && self.peek() != '\n' {
            self.advance();
        }
    }

    fn current_position(&self) -> Position {
        Position::new(self.filename.clone(), self.line, self.column)
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn peek(&self) -> char {
        self.input.get(self.position).copied().unwrap_or('\0')
    }

    fn peek_next(&self) -> char {
        self.input.get(self.position + 1).copied().unwrap_or('\0')
    }

    fn advance(&mut self) -> char {
        let ch = self.peek();
        self.position += 1;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        ch
    }
}
