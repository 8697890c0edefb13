//! Abstract syntax tree for Magpie programs.
//!
//! Statements and expressions are closed enums; every variant wraps its
//! own node struct carrying the introducing token, so each node can
//! report where it starts, where it ends, and render itself back to
//! canonical source text.

use std::collections::HashMap;
use std::fmt;

use crate::lexer::token::{rune_len, Position, Token};

/// Observations every AST node provides.
///
/// `end()` is half-open: the position of the first character *after*
/// the node, with columns counted in Unicode scalar values. The
/// canonical rendering comes from `Display`.
pub trait Node: fmt::Display {
    fn pos(&self) -> Position;
    fn end(&self) -> Position;
    fn token_literal(&self) -> &str;
}

fn join<T: fmt::Display>(items: &[T], separator: &str) -> String {
    items
        .iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(separator)
}

macro_rules! node_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident($payload:ty)),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub enum $name {
            $($variant($payload),)+
        }

        impl Node for $name {
            fn pos(&self) -> Position {
                match self {
                    $($name::$variant(node) => node.pos(),)+
                }
            }

            fn end(&self) -> Position {
                match self {
                    $($name::$variant(node) => node.end(),)+
                }
            }

            fn token_literal(&self) -> &str {
                match self {
                    $($name::$variant(node) => node.token_literal(),)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    $($name::$variant(node) => fmt::Display::fmt(node, f),)+
                }
            }
        }
    };
}

node_enum! {
    /// Statement variants.
    Stmt {
        Let(LetStatement),
        Return(ReturnStatement),
        Block(BlockStatement),
        Expression(ExpressionStatement),
        Import(ImportStatement),
        TailCall(TailCallStatement),
        MultiAssign(MultiAssignStatement),
        Struct(StructStatement),
        Try(TryStatement),
        Throw(ThrowStatement),
    }
}

node_enum! {
    /// Expression variants.
    Expr {
        Number(NumberLiteral),
        String(StringLiteral),
        Boolean(BooleanLiteral),
        Nil(NilLiteral),
        Identifier(Identifier),
        Prefix(PrefixExpr),
        Infix(InfixExpr),
        Postfix(PostfixExpr),
        Index(IndexExpr),
        Call(CallExpr),
        MethodCall(MethodCallExpr),
        Function(FunctionLiteral),
        Array(ArrayLiteral),
        Tuple(TupleLiteral),
        Hash(HashLiteral),
        If(IfExpr),
        IfCondition(IfCondition),
        Switch(SwitchExpr),
        Case(CaseExpr),
        Fallthrough(FallthroughExpr),
        Break(BreakExpr),
        Continue(ContinueExpr),
        Assign(AssignExpr),
        CForLoop(CForLoop),
        ForEachArray(ForEachArrayLoop),
        ForEachMap(ForEachMapLoop),
        ForEver(ForEverLoop),
        While(WhileLoop),
        Do(DoLoop),
        RegEx(RegExLiteral),
        Decorator(DecoratorExpr),
        Cmd(CmdExpr),
    }
}

/// A parsed source file: top-level statements plus the imports the
/// parser resolved (always empty for now; import resolution happens in
/// a later pass).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub statements: Vec<Stmt>,
    pub imports: HashMap<String, ImportStatement>,
}

impl Node for Program {
    fn pos(&self) -> Position {
        match self.statements.first() {
            Some(statement) => statement.pos(),
            None => Position::default(),
        }
    }

    fn end(&self) -> Position {
        match self.statements.last() {
            Some(statement) => statement.end(),
            None => Position::default(),
        }
    }

    fn token_literal(&self) -> &str {
        match self.statements.first() {
            Some(statement) => statement.token_literal(),
            None => "",
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for statement in &self.statements {
            write!(f, "{}", statement)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Statements
// ---------------------------------------------------------------------------

/// `let <name1>, <name2>, ... = <value1>, <value2>, ...`
///
/// The parser currently fills a single name and at most one value; the
/// plural shape is part of the data model.
#[derive(Debug, Clone, PartialEq)]
pub struct LetStatement {
    pub token: Token,
    pub names: Vec<Identifier>,
    pub values: Vec<Expr>,
}

impl Node for LetStatement {
    fn pos(&self) -> Position {
        self.token.position.clone()
    }

    fn end(&self) -> Position {
        if let Some(value) = self.values.last() {
            return value.end();
        }
        match self.names.last() {
            Some(name) => name.end(),
            None => self.token.position.advance(rune_len(&self.token.literal)),
        }
    }

    fn token_literal(&self) -> &str {
        &self.token.literal
    }
}

impl fmt::Display for LetStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.token_literal(), join(&self.names, ", "))?;
        if self.values.is_empty() {
            return f.write_str(";");
        }
        write!(f, " = {}", join(&self.values, ", "))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStatement {
    pub token: Token,
    pub return_values: Vec<Expr>,
}

impl Node for ReturnStatement {
    fn pos(&self) -> Position {
        self.token.position.clone()
    }

    fn end(&self) -> Position {
        match self.return_values.last() {
            Some(value) => value.end(),
            None => self.token.position.advance(rune_len(&self.token.literal)),
        }
    }

    fn token_literal(&self) -> &str {
        &self.token.literal
    }
}

impl fmt::Display for ReturnStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {};",
            self.token_literal(),
            join(&self.return_values, ", ")
        )
    }
}

/// Braced statement list. `r_brace` is the closing `}` token and
/// defines `end()`.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockStatement {
    pub token: Token,
    pub statements: Vec<Stmt>,
    pub r_brace: Token,
}

impl Node for BlockStatement {
    fn pos(&self) -> Position {
        self.token.position.clone()
    }

    fn end(&self) -> Position {
        self.r_brace.position.advance(1)
    }

    fn token_literal(&self) -> &str {
        &self.token.literal
    }
}

impl fmt::Display for BlockStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for statement in &self.statements {
            let rendered = statement.to_string();
            f.write_str(&rendered)?;
            if !rendered.ends_with(';') {
                f.write_str(";")?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionStatement {
    pub token: Token,
    pub expression: Expr,
}

impl Node for ExpressionStatement {
    fn pos(&self) -> Position {
        self.token.position.clone()
    }

    fn end(&self) -> Position {
        self.expression.end()
    }

    fn token_literal(&self) -> &str {
        &self.token.literal
    }
}

impl fmt::Display for ExpressionStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.expression, f)
    }
}

/// `import <path>`
#[derive(Debug, Clone, PartialEq)]
pub struct ImportStatement {
    pub token: Token,
    pub import_path: String,
}

impl Node for ImportStatement {
    fn pos(&self) -> Position {
        self.token.position.clone()
    }

    fn end(&self) -> Position {
        self.token.position.advance(rune_len(&self.import_path))
    }

    fn token_literal(&self) -> &str {
        &self.token.literal
    }
}

impl fmt::Display for ImportStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.token_literal(), self.import_path)
    }
}

/// `tailcall f(a, b, ...)`
#[derive(Debug, Clone, PartialEq)]
pub struct TailCallStatement {
    pub token: Token,
    pub call: Expr,
}

impl Node for TailCallStatement {
    fn pos(&self) -> Position {
        self.token.position.clone()
    }

    fn end(&self) -> Position {
        self.call.end()
    }

    fn token_literal(&self) -> &str {
        &self.token.literal
    }
}

impl fmt::Display for TailCallStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {};", self.token_literal(), self.call)
    }
}

/// `<name1>, <name2>, ... = <value1>, <value2>, ...`
#[derive(Debug, Clone, PartialEq)]
pub struct MultiAssignStatement {
    pub token: Token,
    pub names: Vec<Expr>,
    pub values: Vec<Expr>,
}

impl Node for MultiAssignStatement {
    fn pos(&self) -> Position {
        self.token.position.clone()
    }

    fn end(&self) -> Position {
        if let Some(value) = self.values.last() {
            return value.end();
        }
        match self.names.last() {
            Some(name) => name.end(),
            None => self.token.position.advance(rune_len(&self.token.literal)),
        }
    }

    fn token_literal(&self) -> &str {
        &self.token.literal
    }
}

impl fmt::Display for MultiAssignStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} = {}",
            join(&self.names, ", "),
            join(&self.values, ", ")
        )
    }
}

/// `struct <name> { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct StructStatement {
    pub token: Token,
    pub name: String,
    pub block: BlockStatement,
    pub r_brace: Token,
}

impl Node for StructStatement {
    fn pos(&self) -> Position {
        self.token.position.clone()
    }

    fn end(&self) -> Position {
        self.r_brace.position.clone()
    }

    fn token_literal(&self) -> &str {
        &self.token.literal
    }
}

impl fmt::Display for StructStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}{{ {} }}",
            self.token_literal(),
            self.name,
            self.block
        )
    }
}

/// `try { ... } catch e { ... } finally { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct TryStatement {
    pub token: Token,
    pub try_block: BlockStatement,
    pub var: Option<String>,
    pub catch: Option<BlockStatement>,
    pub finally: Option<BlockStatement>,
}

impl Node for TryStatement {
    fn pos(&self) -> Position {
        self.token.position.clone()
    }

    fn end(&self) -> Position {
        if let Some(finally) = &self.finally {
            return finally.end();
        }
        if let Some(catch) = &self.catch {
            return catch.end();
        }
        self.try_block.end()
    }

    fn token_literal(&self) -> &str {
        &self.token.literal
    }
}

impl fmt::Display for TryStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "try {{ {} }}", self.try_block)?;
        if let Some(catch) = &self.catch {
            match &self.var {
                Some(var) => write!(f, " catch {} {{ ", var)?,
                None => f.write_str(" catch { ")?,
            }
            write!(f, "{} }}", catch)?;
        }
        if let Some(finally) = &self.finally {
            write!(f, " finally {{ {} }}", finally)?;
        }
        Ok(())
    }
}

/// `throw <expression>`
#[derive(Debug, Clone, PartialEq)]
pub struct ThrowStatement {
    pub token: Token,
    pub expr: Expr,
}

impl Node for ThrowStatement {
    fn pos(&self) -> Position {
        self.token.position.clone()
    }

    fn end(&self) -> Position {
        self.expr.end()
    }

    fn token_literal(&self) -> &str {
        &self.token.literal
    }
}

impl fmt::Display for ThrowStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "throw {};", self.expr)
    }
}

// ---------------------------------------------------------------------------
// Expressions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct NumberLiteral {
    pub token: Token,
    pub value: f64,
}

impl Node for NumberLiteral {
    fn pos(&self) -> Position {
        self.token.position.clone()
    }

    fn end(&self) -> Position {
        self.token.position.advance(rune_len(&self.token.literal))
    }

    fn token_literal(&self) -> &str {
        &self.token.literal
    }
}

impl fmt::Display for NumberLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token.literal)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StringLiteral {
    pub token: Token,
    pub value: String,
}

impl Node for StringLiteral {
    fn pos(&self) -> Position {
        self.token.position.clone()
    }

    fn end(&self) -> Position {
        self.token.position.advance(rune_len(&self.value))
    }

    fn token_literal(&self) -> &str {
        &self.token.literal
    }
}

impl fmt::Display for StringLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token.literal)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BooleanLiteral {
    pub token: Token,
    pub value: bool,
}

impl Node for BooleanLiteral {
    fn pos(&self) -> Position {
        self.token.position.clone()
    }

    fn end(&self) -> Position {
        self.token.position.advance(rune_len(&self.token.literal))
    }

    fn token_literal(&self) -> &str {
        &self.token.literal
    }
}

impl fmt::Display for BooleanLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token.literal)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NilLiteral {
    pub token: Token,
}

impl Node for NilLiteral {
    fn pos(&self) -> Position {
        self.token.position.clone()
    }

    fn end(&self) -> Position {
        self.token.position.advance(rune_len(&self.token.literal))
    }

    fn token_literal(&self) -> &str {
        &self.token.literal
    }
}

impl fmt::Display for NilLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token.literal)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub token: Token,
    pub value: String,
}

impl Node for Identifier {
    fn pos(&self) -> Position {
        self.token.position.clone()
    }

    fn end(&self) -> Position {
        self.token.position.advance(rune_len(&self.value))
    }

    fn token_literal(&self) -> &str {
        &self.token.literal
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// `-x`, `!ok`, `+n`
#[derive(Debug, Clone, PartialEq)]
pub struct PrefixExpr {
    pub token: Token,
    pub operator: String,
    pub right: Box<Expr>,
}

impl Node for PrefixExpr {
    fn pos(&self) -> Position {
        self.token.position.clone()
    }

    fn end(&self) -> Position {
        self.right.end()
    }

    fn token_literal(&self) -> &str {
        &self.token.literal
    }
}

impl fmt::Display for PrefixExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}{})", self.operator, self.right)
    }
}

/// Binary operation. `next` holds an optional chained
/// `(operator, operand)` pair for comparison chains like `a < b < c`.
#[derive(Debug, Clone, PartialEq)]
pub struct InfixExpr {
    pub token: Token,
    pub operator: String,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
    pub next: Option<(String, Box<Expr>)>,
}

impl Node for InfixExpr {
    fn pos(&self) -> Position {
        self.token.position.clone()
    }

    fn end(&self) -> Position {
        self.right.end()
    }

    fn token_literal(&self) -> &str {
        &self.token.literal
    }
}

impl fmt::Display for InfixExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} {} {}", self.left, self.operator, self.right)?;
        if let Some((operator, operand)) = &self.next {
            write!(f, " {} {}", operator, operand)?;
        }
        f.write_str(")")
    }
}

/// `x++`, `x--`
#[derive(Debug, Clone, PartialEq)]
pub struct PostfixExpr {
    pub token: Token,
    pub operator: String,
    pub left: Box<Expr>,
}

impl Node for PostfixExpr {
    fn pos(&self) -> Position {
        self.token.position.clone()
    }

    fn end(&self) -> Position {
        self.left.end().advance(rune_len(&self.operator))
    }

    fn token_literal(&self) -> &str {
        &self.token.literal
    }
}

impl fmt::Display for PostfixExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}{})", self.left, self.operator)
    }
}

/// `<left>[<index>]`
#[derive(Debug, Clone, PartialEq)]
pub struct IndexExpr {
    pub token: Token,
    pub left: Box<Expr>,
    pub index: Box<Expr>,
}

impl Node for IndexExpr {
    fn pos(&self) -> Position {
        self.token.position.clone()
    }

    fn end(&self) -> Position {
        self.index.end()
    }

    fn token_literal(&self) -> &str {
        &self.token.literal
    }
}

impl fmt::Display for IndexExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}[{}])", self.left, self.index)
    }
}

/// Call expression. Its token is the opening `(`; `pos()` backs up over
/// the rendered callee so the reported origin is the callee itself.
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub token: Token,
    pub function: Box<Expr>,
    pub arguments: Vec<Expr>,
    pub variadic: bool,
}

impl Node for CallExpr {
    fn pos(&self) -> Position {
        let callee_len = rune_len(&self.function.to_string());
        Position {
            filename: self.token.position.filename.clone(),
            line: self.token.position.line,
            column: self.token.position.column.saturating_sub(callee_len),
        }
    }

    fn end(&self) -> Position {
        match self.arguments.last() {
            Some(argument) => argument.end(),
            None => self.function.end(),
        }
    }

    fn token_literal(&self) -> &str {
        &self.token.literal
    }
}

impl fmt::Display for CallExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}", self.function, join(&self.arguments, ", "))?;
        if self.variadic {
            f.write_str("...")?;
        }
        f.write_str(")")
    }
}

/// `<object>.<call>` where `call` is an identifier or a call expression.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodCallExpr {
    pub token: Token,
    pub object: Box<Expr>,
    pub call: Box<Expr>,
}

impl Node for MethodCallExpr {
    fn pos(&self) -> Position {
        self.token.position.clone()
    }

    fn end(&self) -> Position {
        self.call.end()
    }

    fn token_literal(&self) -> &str {
        &self.token.literal
    }
}

impl fmt::Display for MethodCallExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.object, self.call)
    }
}

/// `fn (a, b) { ... }`. `name` is only populated for nodes built by
/// hand; the parser accepts a name after `fn` but keeps the literal
/// anonymous.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionLiteral {
    pub token: Token,
    pub name: Option<String>,
    pub parameters: Vec<Identifier>,
    pub variadic: bool,
    pub body: BlockStatement,
}

impl Node for FunctionLiteral {
    fn pos(&self) -> Position {
        self.token.position.clone()
    }

    fn end(&self) -> Position {
        self.body.end()
    }

    fn token_literal(&self) -> &str {
        &self.token.literal
    }
}

impl fmt::Display for FunctionLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token_literal())?;
        if let Some(name) = &self.name {
            write!(f, " {}", name)?;
        }
        write!(f, "({}", join(&self.parameters, ", "))?;
        if self.variadic {
            f.write_str("...")?;
        }
        write!(f, ") {{{}}}", self.body)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayLiteral {
    pub token: Token,
    pub members: Vec<Expr>,
}

impl Node for ArrayLiteral {
    fn pos(&self) -> Position {
        self.token.position.clone()
    }

    fn end(&self) -> Position {
        match self.members.last() {
            Some(member) => member.end(),
            None => self.token.position.clone(),
        }
    }

    fn token_literal(&self) -> &str {
        &self.token.literal
    }
}

impl fmt::Display for ArrayLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", join(&self.members, ", "))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TupleLiteral {
    pub token: Token,
    pub members: Vec<Expr>,
}

impl Node for TupleLiteral {
    fn pos(&self) -> Position {
        self.token.position.clone()
    }

    fn end(&self) -> Position {
        match self.members.last() {
            Some(member) => member.end(),
            None => self.token.position.clone(),
        }
    }

    fn token_literal(&self) -> &str {
        &self.token.literal
    }
}

impl fmt::Display for TupleLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", join(&self.members, ", "))
    }
}

/// `{ k1: v1, k2: v2 }`. Pairs are keyed by position, so two keys that
/// render identically stay distinct entries; the pair order is the
/// authoritative key order. `is_ordered` switches the rendering between
/// the `k: v` (ordered) and `k:v` (unordered) forms.
#[derive(Debug, Clone, PartialEq)]
pub struct HashLiteral {
    pub token: Token,
    pub pairs: Vec<(Expr, Expr)>,
    pub r_brace: Token,
    pub is_ordered: bool,
}

impl Node for HashLiteral {
    fn pos(&self) -> Position {
        self.token.position.clone()
    }

    fn end(&self) -> Position {
        self.r_brace.position.advance(1)
    }

    fn token_literal(&self) -> &str {
        &self.token.literal
    }
}

impl fmt::Display for HashLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pairs: Vec<String> = self
            .pairs
            .iter()
            .map(|(key, value)| {
                if self.is_ordered {
                    format!("{}: {}", key, value)
                } else {
                    format!("{}:{}", key, value)
                }
            })
            .collect();
        write!(f, "{{{}}}", pairs.join(", "))
    }
}

/// `if cond { ... } elif cond { ... } else { ... }`. One `IfCondition`
/// per `if`/`elif` arm; the parser never returns an `IfExpr` with an
/// empty `conditions` list.
#[derive(Debug, Clone, PartialEq)]
pub struct IfExpr {
    pub token: Token,
    pub conditions: Vec<IfCondition>,
    pub alternative: Option<BlockStatement>,
}

impl Node for IfExpr {
    fn pos(&self) -> Position {
        self.token.position.clone()
    }

    fn end(&self) -> Position {
        if let Some(alternative) = &self.alternative {
            return alternative.end();
        }
        match self.conditions.last() {
            Some(condition) => condition.end(),
            None => self.token.position.advance(rune_len(&self.token.literal)),
        }
    }

    fn token_literal(&self) -> &str {
        &self.token.literal
    }
}

impl fmt::Display for IfExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, condition) in self.conditions.iter().enumerate() {
            if i == 0 {
                f.write_str("if ")?;
            } else {
                f.write_str("elif ")?;
            }
            write!(f, "{}", condition)?;
        }
        if let Some(alternative) = &self.alternative {
            write!(f, " else  {{ {} }}", alternative)?;
        }
        Ok(())
    }
}

/// A single `if`/`elif` arm: condition plus body.
#[derive(Debug, Clone, PartialEq)]
pub struct IfCondition {
    pub token: Token,
    pub condition: Box<Expr>,
    pub body: BlockStatement,
}

impl Node for IfCondition {
    fn pos(&self) -> Position {
        self.token.position.clone()
    }

    fn end(&self) -> Position {
        self.body.end()
    }

    fn token_literal(&self) -> &str {
        &self.token.literal
    }
}

impl fmt::Display for IfCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{ {} }}", self.condition, self.body)
    }
}

/// `switch expr { case ... { ... } default { ... } }`
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchExpr {
    pub token: Token,
    pub expr: Box<Expr>,
    pub cases: Vec<CaseExpr>,
    pub r_brace: Token,
}

impl Node for SwitchExpr {
    fn pos(&self) -> Position {
        self.token.position.clone()
    }

    fn end(&self) -> Position {
        self.r_brace.position.clone()
    }

    fn token_literal(&self) -> &str {
        &self.token.literal
    }
}

impl fmt::Display for SwitchExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "switch {}{{ ", self.expr)?;
        for case in &self.cases {
            write!(f, "{}", case)?;
        }
        f.write_str(" }")
    }
}

/// One `case e1, e2 { ... }` arm, or `default { ... }` when `default`
/// is set.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseExpr {
    pub token: Token,
    pub default: bool,
    pub exprs: Vec<Expr>,
    pub block: BlockStatement,
    pub r_brace: Token,
}

impl Node for CaseExpr {
    fn pos(&self) -> Position {
        self.token.position.clone()
    }

    fn end(&self) -> Position {
        self.r_brace.position.clone()
    }

    fn token_literal(&self) -> &str {
        &self.token.literal
    }
}

impl fmt::Display for CaseExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.default {
            f.write_str("default ")?;
        } else {
            write!(f, "case {}", join(&self.exprs, ","))?;
        }
        write!(f, "{}", self.block)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FallthroughExpr {
    pub token: Token,
}

impl Node for FallthroughExpr {
    fn pos(&self) -> Position {
        self.token.position.clone()
    }

    fn end(&self) -> Position {
        self.token.position.advance(rune_len(&self.token.literal))
    }

    fn token_literal(&self) -> &str {
        &self.token.literal
    }
}

impl fmt::Display for FallthroughExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token.literal)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BreakExpr {
    pub token: Token,
}

impl Node for BreakExpr {
    fn pos(&self) -> Position {
        self.token.position.clone()
    }

    fn end(&self) -> Position {
        self.token.position.advance(rune_len(&self.token.literal))
    }

    fn token_literal(&self) -> &str {
        &self.token.literal
    }
}

impl fmt::Display for BreakExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token.literal)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContinueExpr {
    pub token: Token,
}

impl Node for ContinueExpr {
    fn pos(&self) -> Position {
        self.token.position.clone()
    }

    fn end(&self) -> Position {
        self.token.position.advance(rune_len(&self.token.literal))
    }

    fn token_literal(&self) -> &str {
        &self.token.literal
    }
}

impl fmt::Display for ContinueExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token.literal)
    }
}

/// `<name> = <value>`. Reports its position from the assignment target,
/// not the `=` token.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignExpr {
    pub token: Token,
    pub name: Box<Expr>,
    pub value: Box<Expr>,
}

impl Node for AssignExpr {
    fn pos(&self) -> Position {
        self.name.pos()
    }

    fn end(&self) -> Position {
        self.value.end()
    }

    fn token_literal(&self) -> &str {
        &self.token.literal
    }
}

impl fmt::Display for AssignExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.name, self.token.literal, self.value)
    }
}

/// C-style loop: `for (init; cond; update) { ... }`, each header slot
/// optional.
#[derive(Debug, Clone, PartialEq)]
pub struct CForLoop {
    pub token: Token,
    pub init: Option<Box<Expr>>,
    pub cond: Option<Box<Expr>>,
    pub update: Option<Box<Expr>>,
    pub block: BlockStatement,
}

impl Node for CForLoop {
    fn pos(&self) -> Position {
        self.token.position.clone()
    }

    fn end(&self) -> Position {
        self.block.end()
    }

    fn token_literal(&self) -> &str {
        &self.token.literal
    }
}

impl fmt::Display for CForLoop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("for ( ")?;
        if let Some(init) = &self.init {
            write!(f, "{}", init)?;
        }
        f.write_str(" ; ")?;
        if let Some(cond) = &self.cond {
            write!(f, "{}", cond)?;
        }
        f.write_str(" ; ")?;
        if let Some(update) = &self.update {
            write!(f, "{}", update)?;
        }
        write!(f, " )  {{ {} }}", self.block)
    }
}

/// `for item in collection { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct ForEachArrayLoop {
    pub token: Token,
    pub var: String,
    pub value: Box<Expr>,
    pub block: BlockStatement,
}

impl Node for ForEachArrayLoop {
    fn pos(&self) -> Position {
        self.token.position.clone()
    }

    fn end(&self) -> Position {
        self.block.end()
    }

    fn token_literal(&self) -> &str {
        &self.token.literal
    }
}

impl fmt::Display for ForEachArrayLoop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "for {} in {} {{ {} }}", self.var, self.value, self.block)
    }
}

/// `for key, value in collection { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct ForEachMapLoop {
    pub token: Token,
    pub key: String,
    pub value: String,
    pub collection: Box<Expr>,
    pub block: BlockStatement,
}

impl Node for ForEachMapLoop {
    fn pos(&self) -> Position {
        self.token.position.clone()
    }

    fn end(&self) -> Position {
        self.block.end()
    }

    fn token_literal(&self) -> &str {
        &self.token.literal
    }
}

impl fmt::Display for ForEachMapLoop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "for {}, {} in {} {{ {} }}",
            self.key, self.value, self.collection, self.block
        )
    }
}

/// Bare `for { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct ForEverLoop {
    pub token: Token,
    pub block: BlockStatement,
}

impl Node for ForEverLoop {
    fn pos(&self) -> Position {
        self.token.position.clone()
    }

    fn end(&self) -> Position {
        self.block.end()
    }

    fn token_literal(&self) -> &str {
        &self.token.literal
    }
}

impl fmt::Display for ForEverLoop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "for  {{ {} }}", self.block)
    }
}

/// `while cond { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct WhileLoop {
    pub token: Token,
    pub condition: Box<Expr>,
    pub block: BlockStatement,
}

impl Node for WhileLoop {
    fn pos(&self) -> Position {
        self.token.position.clone()
    }

    fn end(&self) -> Position {
        self.block.end()
    }

    fn token_literal(&self) -> &str {
        &self.token.literal
    }
}

impl fmt::Display for WhileLoop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "while{}{{{}}}", self.condition, self.block)
    }
}

/// `do { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct DoLoop {
    pub token: Token,
    pub block: BlockStatement,
}

impl Node for DoLoop {
    fn pos(&self) -> Position {
        self.token.position.clone()
    }

    fn end(&self) -> Position {
        self.block.end()
    }

    fn token_literal(&self) -> &str {
        &self.token.literal
    }
}

impl fmt::Display for DoLoop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "do {{ {} }}", self.block)
    }
}

/// Regular-expression literal. A `(?flags)` prefix inside the stored
/// pattern moves to the trailing flags slot when rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct RegExLiteral {
    pub token: Token,
    pub value: String,
}

impl Node for RegExLiteral {
    fn pos(&self) -> Position {
        self.token.position.clone()
    }

    fn end(&self) -> Position {
        self.token.position.advance(rune_len(&self.value))
    }

    fn token_literal(&self) -> &str {
        &self.token.literal
    }
}

impl fmt::Display for RegExLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let begin = self.value.find("(?");
        let end = self.value.find(')');
        match (begin, end) {
            (Some(begin), Some(end)) if begin + 2 <= end => {
                let flags = &self.value[begin + 2..end];
                let body = &self.value[end + 1..];
                write!(f, "/{}/{}", body, flags)
            }
            _ => write!(f, "/{}/", self.value),
        }
    }
}

/// `@decorator fn ...`
#[derive(Debug, Clone, PartialEq)]
pub struct DecoratorExpr {
    pub token: Token,
    pub decorator: Box<Expr>,
    pub decorated: Box<Expr>,
}

impl Node for DecoratorExpr {
    fn pos(&self) -> Position {
        self.token.position.clone()
    }

    fn end(&self) -> Position {
        self.decorated.end()
    }

    fn token_literal(&self) -> &str {
        &self.token.literal
    }
}

impl fmt::Display for DecoratorExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{} {}", self.decorator, self.decorated)
    }
}

/// Backtick command literal.
#[derive(Debug, Clone, PartialEq)]
pub struct CmdExpr {
    pub token: Token,
    pub value: String,
}

impl Node for CmdExpr {
    fn pos(&self) -> Position {
        self.token.position.clone()
    }

    fn end(&self) -> Position {
        self.token.position.advance(rune_len(&self.value))
    }

    fn token_literal(&self) -> &str {
        &self.token.literal
    }
}

impl fmt::Display for CmdExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}
