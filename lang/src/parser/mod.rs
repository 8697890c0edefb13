//! Pratt parser for Magpie source.
//!
//! The parser pulls tokens from a [`Lexer`] through a two-token
//! lookahead window and drives two dispatch tables: prefix parse
//! functions start an expression from the current token, infix parse
//! functions extend an already-parsed left operand. Errors never abort
//! a parse; they accumulate and the offending construct is dropped.

pub mod ast;


use std::collections::HashMap;

use crate::error::SyntaxErrors;
use crate::lexer::token::{rune_len, TokenKind};
use crate::lexer::{Lexer, Token};
use ast::*;

// Binding strengths, loosest first. `**` is handled specially in
// parse_infix_expression to get right associativity.
const LOWEST: u8 = 1;
const EQUALS: u8 = 2; // ==, !=
const LESSGREATER: u8 = 3; // <, <=, >, >=
const SUM: u8 = 4; // +, -
const PRODUCT: u8 = 5; // *, /, %, **
const PREFIX: u8 = 6; // !x, -x, +x
const INCREMENT: u8 = 7; // ++, --
const CALL: u8 = 8; // add(1, 2), array[index], obj.add(1, 2)

type PrefixFn = fn(&mut Parser) -> Option<Expr>;
type InfixFn = fn(&mut Parser, Expr) -> Option<Expr>;

/// Parse a whole source file, returning the program or every syntax
/// error the parser collected.
pub fn parse(filename: &str, source: &str) -> Result<Program, SyntaxErrors> {
    let lexer = Lexer::new(filename, source);
    let mut parser = Parser::new(lexer);
    let program = parser.parse_program();
    if parser.errors.is_empty() {
        Ok(program)
    } else {
        Err(SyntaxErrors::new(parser.errors, parser.error_lines))
    }
}

pub struct Parser {
    lexer: Lexer,
    cur_token: Token,
    peek_token: Token,

    errors: Vec<String>,
    error_lines: Vec<String>,

    prefix_fns: HashMap<TokenKind, PrefixFn>,
    infix_fns: HashMap<TokenKind, InfixFn>,
    precedences: HashMap<TokenKind, u8>,
}

impl Parser {
    pub fn new(mut lexer: Lexer) -> Self {
        let cur_token = lexer.next_token();
        let peek_token = lexer.next_token();

        let mut parser = Parser {
            lexer,
            cur_token,
            peek_token,
            errors: Vec::new(),
            error_lines: Vec::new(),
            prefix_fns: HashMap::new(),
            infix_fns: HashMap::new(),
            precedences: HashMap::new(),
        };
        parser.register_parse_fns();
        parser
    }

    fn register_parse_fns(&mut self) {
        self.register_prefix(TokenKind::Illegal, Self::parse_illegal_expression);
        self.register_prefix(TokenKind::Number, Self::parse_number);
        self.register_prefix(TokenKind::Identifier, Self::parse_identifier);
        self.register_prefix(TokenKind::String, Self::parse_string_literal);
        self.register_prefix(TokenKind::Function, Self::parse_function_literal);
        self.register_prefix(TokenKind::True, Self::parse_boolean_literal);
        self.register_prefix(TokenKind::False, Self::parse_boolean_literal);
        self.register_prefix(TokenKind::Nil, Self::parse_nil_expression);
        self.register_prefix(TokenKind::LBracket, Self::parse_array_literal);
        self.register_prefix(TokenKind::LBrace, Self::parse_hash_literal);
        self.register_prefix(TokenKind::LParen, Self::parse_grouped_expression);
        self.register_prefix(TokenKind::If, Self::parse_if_expression);
        self.register_prefix(TokenKind::Plus, Self::parse_prefix_expression);
        self.register_prefix(TokenKind::Minus, Self::parse_prefix_expression);
        self.register_prefix(TokenKind::Bang, Self::parse_prefix_expression);

        self.register_infix(TokenKind::Plus, SUM, Self::parse_infix_expression);
        self.register_infix(TokenKind::Minus, SUM, Self::parse_infix_expression);
        self.register_infix(TokenKind::Multiply, PRODUCT, Self::parse_infix_expression);
        self.register_infix(TokenKind::Divide, PRODUCT, Self::parse_infix_expression);
        self.register_infix(TokenKind::Mod, PRODUCT, Self::parse_infix_expression);
        self.register_infix(TokenKind::Power, PRODUCT, Self::parse_infix_expression);
        self.register_infix(TokenKind::Lt, LESSGREATER, Self::parse_infix_expression);
        self.register_infix(TokenKind::Le, LESSGREATER, Self::parse_infix_expression);
        self.register_infix(TokenKind::Gt, LESSGREATER, Self::parse_infix_expression);
        self.register_infix(TokenKind::Ge, LESSGREATER, Self::parse_infix_expression);
        self.register_infix(TokenKind::Eq, EQUALS, Self::parse_infix_expression);
        self.register_infix(TokenKind::Neq, EQUALS, Self::parse_infix_expression);
        self.register_infix(TokenKind::LParen, CALL, Self::parse_call_expression);
        self.register_infix(TokenKind::LBracket, CALL, Self::parse_index_expression);
        self.register_infix(TokenKind::Dot, CALL, Self::parse_method_call_expression);
        self.register_infix(TokenKind::Increment, INCREMENT, Self::parse_postfix_expression);
        self.register_infix(TokenKind::Decrement, INCREMENT, Self::parse_postfix_expression);
    }

    fn register_prefix(&mut self, kind: TokenKind, func: PrefixFn) {
        self.prefix_fns.insert(kind, func);
    }

    fn register_infix(&mut self, kind: TokenKind, precedence: u8, func: InfixFn) {
        self.precedences.insert(kind, precedence);
        self.infix_fns.insert(kind, func);
    }

    pub fn parse_program(&mut self) -> Program {
        let mut program = Program::default();
        while self.cur_token.kind != TokenKind::Eof {
            if let Some(statement) = self.parse_statement() {
                program.statements.push(statement);
            }
            self.next_token();
        }
        program
    }

    /// Collected error messages, in source order.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// One `"filename:line"` entry per collected error.
    pub fn error_lines(&self) -> &[String] {
        &self.error_lines
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    fn parse_statement(&mut self) -> Option<Stmt> {
        match self.cur_token.kind {
            TokenKind::Let => Some(Stmt::Let(self.parse_let_statement())),
            TokenKind::Return => Some(Stmt::Return(self.parse_return_statement())),
            TokenKind::LBrace => Some(Stmt::Block(self.parse_block_statement())),
            _ => self.parse_expression_statement().map(Stmt::Expression),
        }
    }

    fn parse_let_statement(&mut self) -> LetStatement {
        let token = self.cur_token.clone();

        let mut names = Vec::new();
        if self.expect_peek(TokenKind::Identifier) {
            names.push(Identifier {
                token: self.cur_token.clone(),
                value: self.cur_token.literal.clone(),
            });
        }

        let mut values = Vec::new();
        if self.peek_token_is(TokenKind::Assign) {
            self.next_token();
            self.next_token();
            if let Some(statement) = self.parse_expression_statement() {
                values.push(statement.expression);
            }
        }

        LetStatement {
            token,
            names,
            values,
        }
    }

    fn parse_return_statement(&mut self) -> ReturnStatement {
        let token = self.cur_token.clone();
        let mut return_values = Vec::new();

        if self.peek_token_is(TokenKind::Semicolon) {
            self.next_token();
            return ReturnStatement {
                token,
                return_values,
            };
        }
        if self.peek_token_is(TokenKind::RBrace) {
            return ReturnStatement {
                token,
                return_values,
            };
        }

        self.next_token();
        if let Some(statement) = self.parse_expression_statement() {
            return_values.push(statement.expression);
        }

        ReturnStatement {
            token,
            return_values,
        }
    }

    fn parse_block_statement(&mut self) -> BlockStatement {
        let token = self.cur_token.clone();
        let mut statements = Vec::new();

        self.next_token();
        while !self.cur_token_is(TokenKind::RBrace) {
            if let Some(statement) = self.parse_statement() {
                statements.push(statement);
            }
            if self.peek_token_is(TokenKind::Eof) {
                break;
            }
            self.next_token();
        }

        BlockStatement {
            token,
            statements,
            r_brace: self.cur_token.clone(),
        }
    }

    fn parse_expression_statement(&mut self) -> Option<ExpressionStatement> {
        let token = self.cur_token.clone();
        let expression = self.parse_expression(LOWEST);

        if self.peek_token_is(TokenKind::Semicolon) {
            self.next_token();
        }

        Some(ExpressionStatement {
            token,
            expression: expression?,
        })
    }

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------

    fn parse_expression(&mut self, precedence: u8) -> Option<Expr> {
        let prefix = match self.prefix_fns.get(&self.cur_token.kind) {
            Some(prefix) => *prefix,
            None => {
                self.no_prefix_parse_fn_error();
                return None;
            }
        };
        let mut left = prefix(self)?;

        // Run infix functions until the next token binds no tighter.
        while precedence < self.peek_precedence() {
            let infix = match self.infix_fns.get(&self.peek_token.kind) {
                Some(infix) => *infix,
                None => return Some(left),
            };
            self.next_token();
            left = infix(self, left)?;
        }

        Some(left)
    }

    fn parse_illegal_expression(&mut self) -> Option<Expr> {
        let position = self.cur_token.position.clone();
        let message = format!("Illegal token found. Literal: '{}'", self.cur_token.literal);
        self.syntax_error(&position, &message);
        None
    }

    fn parse_number(&mut self) -> Option<Expr> {
        let token = self.cur_token.clone();
        match token.literal.parse::<f64>() {
            Ok(value) => Some(Expr::Number(NumberLiteral { token, value })),
            Err(_) => {
                let position = token.position.clone();
                let message = format!("could not parse {:?} as float", token.literal);
                self.syntax_error(&position, &message);
                None
            }
        }
    }

    fn parse_identifier(&mut self) -> Option<Expr> {
        Some(Expr::Identifier(Identifier {
            token: self.cur_token.clone(),
            value: self.cur_token.literal.clone(),
        }))
    }

    fn parse_string_literal(&mut self) -> Option<Expr> {
        Some(Expr::String(StringLiteral {
            token: self.cur_token.clone(),
            value: self.cur_token.literal.clone(),
        }))
    }

    fn parse_boolean_literal(&mut self) -> Option<Expr> {
        Some(Expr::Boolean(BooleanLiteral {
            token: self.cur_token.clone(),
            value: self.cur_token_is(TokenKind::True),
        }))
    }

    fn parse_nil_expression(&mut self) -> Option<Expr> {
        Some(Expr::Nil(NilLiteral {
            token: self.cur_token.clone(),
        }))
    }

    fn parse_prefix_expression(&mut self) -> Option<Expr> {
        let token = self.cur_token.clone();
        let operator = token.literal.clone();

        self.next_token();
        let right = self.parse_expression(PREFIX)?;

        Some(Expr::Prefix(PrefixExpr {
            token,
            operator,
            right: Box::new(right),
        }))
    }

    fn parse_infix_expression(&mut self, left: Expr) -> Option<Expr> {
        let token = self.cur_token.clone();
        let operator = token.literal.clone();

        // '**' is right-associative: parse its right operand one level
        // below its own precedence so `3 ** 2 ** 3` is 3 ** (2 ** 3).
        let mut precedence = self.cur_precedence();
        if self.cur_token_is(TokenKind::Power) {
            precedence -= 1;
        }

        self.next_token();
        let right = self.parse_expression(precedence)?;

        Some(Expr::Infix(InfixExpr {
            token,
            operator,
            left: Box::new(left),
            right: Box::new(right),
            next: None,
        }))
    }

    fn parse_postfix_expression(&mut self, left: Expr) -> Option<Expr> {
        let token = self.cur_token.clone();
        let operator = token.literal.clone();
        Some(Expr::Postfix(PostfixExpr {
            token,
            operator,
            left: Box::new(left),
        }))
    }

    fn parse_grouped_expression(&mut self) -> Option<Expr> {
        self.next_token();

        let expression = self.parse_expression(LOWEST);

        if !self.expect_peek(TokenKind::RParen) {
            return None;
        }
        expression
    }

    fn parse_array_literal(&mut self) -> Option<Expr> {
        let token = self.cur_token.clone();
        let members = self.parse_expression_list(TokenKind::RBracket)?;
        Some(Expr::Array(ArrayLiteral { token, members }))
    }

    /// Comma-separated expressions up to `end`. Elements that fail to
    /// parse are dropped (their error is already recorded); a missing
    /// closing token makes the whole list absent.
    fn parse_expression_list(&mut self, end: TokenKind) -> Option<Vec<Expr>> {
        let mut list = Vec::new();

        if self.peek_token_is(end) {
            self.next_token();
            return Some(list);
        }

        self.next_token();
        if let Some(expression) = self.parse_expression(LOWEST) {
            list.push(expression);
        }

        while self.peek_token_is(TokenKind::Comma) {
            self.next_token();
            self.next_token();
            if let Some(expression) = self.parse_expression(LOWEST) {
                list.push(expression);
            }
        }

        if !self.expect_peek(end) {
            return None;
        }
        Some(list)
    }

    fn parse_hash_literal(&mut self) -> Option<Expr> {
        let token = self.cur_token.clone();
        let mut pairs = Vec::new();

        while !self.peek_token_is(TokenKind::RBrace) {
            self.next_token();
            let key = self.parse_expression(LOWEST);

            if !self.expect_peek(TokenKind::Colon) {
                return None;
            }

            self.next_token();
            let value = self.parse_expression(LOWEST);

            if let (Some(key), Some(value)) = (key, value) {
                pairs.push((key, value));
            }

            if !self.peek_token_is(TokenKind::RBrace) && !self.expect_peek(TokenKind::Comma) {
                return None;
            }
        }

        if !self.expect_peek(TokenKind::RBrace) {
            return None;
        }

        Some(Expr::Hash(HashLiteral {
            token,
            pairs,
            r_brace: self.cur_token.clone(),
            is_ordered: false,
        }))
    }

    fn parse_function_literal(&mut self) -> Option<Expr> {
        let token = self.cur_token.clone();

        // An optional name after 'fn' is accepted but the literal stays
        // anonymous.
        if self.peek_token_is(TokenKind::Identifier) {
            self.next_token();
        }

        if !self.expect_peek(TokenKind::LParen) {
            return None;
        }
        let parameters = self.parse_function_parameters()?;

        if !self.expect_peek(TokenKind::LBrace) {
            return None;
        }
        let body = self.parse_block_statement();

        Some(Expr::Function(FunctionLiteral {
            token,
            name: None,
            parameters,
            variadic: false,
            body,
        }))
    }

    fn parse_function_parameters(&mut self) -> Option<Vec<Identifier>> {
        let mut identifiers = Vec::new();

        if self.peek_token_is(TokenKind::RParen) {
            self.next_token();
            return Some(identifiers);
        }

        self.next_token();
        identifiers.push(Identifier {
            token: self.cur_token.clone(),
            value: self.cur_token.literal.clone(),
        });

        while self.peek_token_is(TokenKind::Comma) {
            self.next_token();
            self.next_token();
            identifiers.push(Identifier {
                token: self.cur_token.clone(),
                value: self.cur_token.literal.clone(),
            });
        }

        if !self.expect_peek(TokenKind::RParen) {
            return None;
        }
        Some(identifiers)
    }

    fn parse_call_expression(&mut self, function: Expr) -> Option<Expr> {
        let token = self.cur_token.clone();
        let arguments = self.parse_expression_list(TokenKind::RParen)?;
        Some(Expr::Call(CallExpr {
            token,
            function: Box::new(function),
            arguments,
            variadic: false,
        }))
    }

    fn parse_index_expression(&mut self, left: Expr) -> Option<Expr> {
        let token = self.cur_token.clone();

        self.next_token();
        let index = self.parse_expression(LOWEST)?;

        if !self.expect_peek(TokenKind::RBracket) {
            return None;
        }

        Some(Expr::Index(IndexExpr {
            token,
            left: Box::new(left),
            index: Box::new(index),
        }))
    }

    fn parse_method_call_expression(&mut self, object: Expr) -> Option<Expr> {
        let token = self.cur_token.clone();
        self.next_token();

        let name = Expr::Identifier(Identifier {
            token: self.cur_token.clone(),
            value: self.cur_token.literal.clone(),
        });

        let call = if self.peek_token_is(TokenKind::LParen) {
            self.next_token();
            self.parse_call_expression(name)?
        } else {
            // CALL, not LOWEST: `obj.member + 1` must stay
            // (obj.member) + 1 rather than obj.(member + 1).
            self.parse_expression(CALL)?
        };

        Some(Expr::MethodCall(MethodCallExpr {
            token,
            object: Box::new(object),
            call: Box::new(call),
        }))
    }

    fn parse_if_expression(&mut self) -> Option<Expr> {
        let token = self.cur_token.clone();

        let mut conditions = vec![self.parse_conditional_expression()?];
        let mut alternative = None;

        while self.peek_token_is(TokenKind::Else) {
            self.next_token();

            if self.peek_token_is(TokenKind::If) {
                self.next_token();
                conditions.push(self.parse_conditional_expression()?);
            } else if self.peek_token_is(TokenKind::LBrace) {
                self.next_token();
                alternative = Some(self.parse_block_statement());
                break;
            } else {
                let position = self.cur_token.position.clone();
                self.syntax_error(&position, "'else' part must be followed by a '{'.");
                return None;
            }
        }

        Some(Expr::If(IfExpr {
            token,
            conditions,
            alternative,
        }))
    }

    fn parse_conditional_expression(&mut self) -> Option<IfCondition> {
        let token = self.cur_token.clone();
        self.next_token();

        let condition = self
            .parse_expression_statement()
            .map(|statement| statement.expression);

        if !self.peek_token_is(TokenKind::LBrace) {
            let position = self.cur_token.position.clone();
            self.syntax_error(&position, "'if' expression must be followed by a '{'.");
            return None;
        }
        self.next_token();
        let body = self.parse_block_statement();

        Some(IfCondition {
            token,
            condition: Box::new(condition?),
            body,
        })
    }

    // ------------------------------------------------------------------
    // Token window and diagnostics
    // ------------------------------------------------------------------

    fn next_token(&mut self) {
        self.cur_token = std::mem::replace(&mut self.peek_token, self.lexer.next_token());
    }

    fn cur_token_is(&self, kind: TokenKind) -> bool {
        self.cur_token.kind == kind
    }

    fn peek_token_is(&self, kind: TokenKind) -> bool {
        self.peek_token.kind == kind
    }

    fn cur_precedence(&self) -> u8 {
        self.precedences
            .get(&self.cur_token.kind)
            .copied()
            .unwrap_or(LOWEST)
    }

    fn peek_precedence(&self) -> u8 {
        self.precedences
            .get(&self.peek_token.kind)
            .copied()
            .unwrap_or(LOWEST)
    }

    /// Advance past an expected peek token, or record a syntax error
    /// pointing just after the current token's text.
    fn expect_peek(&mut self, kind: TokenKind) -> bool {
        if self.peek_token_is(kind) {
            self.next_token();
            return true;
        }
        self.peek_error(kind);
        false
    }

    fn peek_error(&mut self, expected: TokenKind) {
        let position = self
            .cur_token
            .position
            .advance(rune_len(&self.cur_token.literal));
        self.errors.push(format!(
            "Syntax Error:{}- expected next token to be {}, got {} instead",
            position, expected, self.peek_token.kind
        ));
        self.error_lines.push(self.cur_token.position.sline());
    }

    fn no_prefix_parse_fn_error(&mut self) {
        // EOF is exempt: running off the end of the input is reported
        // by the surrounding construct, not here.
        if self.cur_token.kind != TokenKind::Eof {
            let position = self.cur_token.position.clone();
            let message = format!(
                "no prefix parse functions for '{}' found",
                self.cur_token.kind
            );
            self.syntax_error(&position, &message);
        }
    }

    fn syntax_error(&mut self, position: &crate::lexer::Position, message: &str) {
        self.errors
            .push(format!("Syntax Error:{}- {}", position, message));
        self.error_lines.push(position.sline());
    }
}
