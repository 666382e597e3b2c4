use log::warn;

use crate::ast::{BinOp, Block, Expr, Function, Item, Method, Program, RECEIVER, Stmt, StructDecl};
use crate::error::CoreError;
use crate::lexer::{Token, TokenKind, decode_escapes, lex};

type Parse<T> = Result<T, CoreError>;

static END_OF_INPUT: Token = Token {
    kind: TokenKind::Eof,
    lexeme: String::new(),
};

const LOGICAL: &[(TokenKind, BinOp)] = &[(TokenKind::AndAnd, BinOp::And), (TokenKind::OrOr, BinOp::Or)];
const EQUALITY: &[(TokenKind, BinOp)] = &[(TokenKind::EqEq, BinOp::Eq), (TokenKind::NotEq, BinOp::NotEq)];
const RELATIONAL: &[(TokenKind, BinOp)] = &[(TokenKind::Less, BinOp::Less), (TokenKind::Greater, BinOp::Greater)];
const ADDITIVE: &[(TokenKind, BinOp)] = &[(TokenKind::Plus, BinOp::Add), (TokenKind::Minus, BinOp::Sub)];
const MULTIPLICATIVE: &[(TokenKind, BinOp)] = &[(TokenKind::Star, BinOp::Mul), (TokenKind::Slash, BinOp::Div)];

pub fn parse(input: &str) -> Result<Program, CoreError> {
    let result = lex(input);
    parse_tokens(&result.tokens)
}

/// Parse an already lexed token stream into a [`Program`].
///
/// Top-level tokens other than `struct` and `fn` are skipped with a
/// warning. A `val`/`var` without `:=` yields
/// [`CoreError::MissingInitializer`]; any other structural problem ends
/// parsing with [`CoreError::ParseError`].
pub fn parse_tokens(tokens: &[Token]) -> Result<Program, CoreError> {
    let mut parser = Parser { tokens, position: 0 };
    parser.program()
}

struct Parser<'t> {
    tokens: &'t [Token],
    position: usize,
}

impl<'t> Parser<'t> {
    fn program(&mut self) -> Parse<Program> {
        let mut items = Vec::new();
        loop {
            match self.peek_kind() {
                TokenKind::Eof => break,
                TokenKind::Struct => items.push(Item::Struct(self.struct_decl()?)),
                TokenKind::Fn => items.push(self.function()?),
                _ => {
                    let token = self.bump();
                    warn!(
                        "skipping unexpected top-level token {} `{}`",
                        token.kind, token.lexeme
                    );
                }
            }
        }
        Ok(Program { items })
    }

    fn struct_decl(&mut self) -> Parse<StructDecl> {
        self.bump(); // struct
        let name = self.name("struct name")?;
        self.expect(TokenKind::LBrace, "'{' after struct name")?;
        let fields = self.delimited(TokenKind::RBrace, "',' or '}' in field list", |p| {
            p.name("field name")
        })?;
        Ok(StructDecl { name, fields })
    }

    fn function(&mut self) -> Parse<Item> {
        self.bump(); // fn
        let first = self.name("function name")?;
        let method = if self.eat(TokenKind::Dot) {
            Some(self.name("method name")?)
        } else {
            None
        };

        self.expect(TokenKind::LParen, "'(' before parameters")?;
        let params = self.delimited(TokenKind::RParen, "',' or ')' in parameter list", |p| {
            p.name("parameter name")
        })?;
        let body = self.block()?;

        Ok(match method {
            Some(name) => Item::Method(Method {
                structure: first,
                name,
                params,
                body,
            }),
            None => Item::Function(Function {
                name: first,
                params,
                body,
            }),
        })
    }

    fn block(&mut self) -> Parse<Block> {
        self.expect(TokenKind::LBrace, "'{'")?;
        let mut statements = Vec::new();
        while !self.eat(TokenKind::RBrace) {
            if self.peek_kind() == TokenKind::Eof {
                return Err(CoreError::ParseError(
                    "expected '}' before end of input".to_string(),
                ));
            }
            statements.push(self.statement()?);
        }
        Ok(Block { statements })
    }

    fn statement(&mut self) -> Parse<Stmt> {
        match self.peek_kind() {
            TokenKind::Break => {
                self.bump();
                Ok(Stmt::Break)
            }
            TokenKind::Continue => {
                self.bump();
                Ok(Stmt::Continue)
            }
            TokenKind::Return => {
                self.bump();
                if matches!(self.peek_kind(), TokenKind::RBrace | TokenKind::Eof) {
                    Ok(Stmt::Return(Expr::Null))
                } else {
                    Ok(Stmt::Return(self.expression()?))
                }
            }
            TokenKind::Val | TokenKind::Var => self.declaration(),
            TokenKind::If => self.if_statement(),
            TokenKind::While => {
                self.bump();
                let condition = self.expression()?;
                let body = self.block()?;
                Ok(Stmt::While { condition, body })
            }
            TokenKind::For => self.for_statement(),
            TokenKind::Switch => self.switch_statement(),
            _ => self.expression_statement(),
        }
    }

    fn declaration(&mut self) -> Parse<Stmt> {
        let mutable = self.bump().is(TokenKind::Var);
        let name = self.name("variable name")?;
        if !self.eat(TokenKind::Assign) {
            return Err(CoreError::MissingInitializer { name });
        }
        let value = self.expression()?;
        Ok(Stmt::Declaration {
            name,
            mutable,
            value,
        })
    }

    fn if_statement(&mut self) -> Parse<Stmt> {
        self.bump(); // if
        let condition = self.expression()?;
        let then_block = self.block()?;
        let else_block = if !self.eat(TokenKind::Else) {
            None
        } else if self.peek_kind() == TokenKind::If {
            // `else if` nests the chained `if` inside an else block
            Some(Block {
                statements: vec![self.if_statement()?],
            })
        } else {
            Some(self.block()?)
        };

        Ok(Stmt::If {
            condition,
            then_block,
            else_block,
        })
    }

    fn for_statement(&mut self) -> Parse<Stmt> {
        self.bump(); // for
        let variable = self.name("loop variable")?;
        self.expect(TokenKind::Assign, "':=' after loop variable")?;
        let start = self.expression()?;
        self.expect(TokenKind::To, "'to' in for loop")?;
        let end = self.expression()?;
        let body = self.block()?;
        Ok(Stmt::For {
            variable,
            start,
            end,
            body,
        })
    }

    fn switch_statement(&mut self) -> Parse<Stmt> {
        self.bump(); // switch
        // Parentheses around the subject parse as ordinary grouping.
        let subject = self.expression()?;
        self.expect(TokenKind::LBrace, "'{' after switch subject")?;

        let mut cases = Vec::new();
        while self.eat(TokenKind::Case) {
            let value = self.expression()?;
            self.expect(TokenKind::Colon, "':' after case value")?;
            cases.push((value, self.block()?));
        }
        self.expect(TokenKind::RBrace, "'case' or '}' in switch")?;

        Ok(Stmt::Switch { subject, cases })
    }

    fn expression_statement(&mut self) -> Parse<Stmt> {
        let target = self.expression()?;
        if !self.eat(TokenKind::Assign) {
            return Ok(Stmt::Expr(target));
        }

        let value = self.expression()?;
        match target {
            Expr::Variable(name) => Ok(Stmt::Assignment { name, value }),
            Expr::IndexAccess { object, index } => Ok(Stmt::IndexAssignment {
                object: *object,
                index: *index,
                value,
            }),
            Expr::MemberAccess { object, field } => Ok(Stmt::FieldAssignment {
                object: *object,
                field,
                value,
            }),
            _ => Err(CoreError::ParseError(
                "left side of ':=' is not assignable".to_string(),
            )),
        }
    }

    fn expression(&mut self) -> Parse<Expr> {
        self.binary_level(LOGICAL, Self::equality)
    }

    fn equality(&mut self) -> Parse<Expr> {
        self.binary_level(EQUALITY, Self::relational)
    }

    fn relational(&mut self) -> Parse<Expr> {
        self.binary_level(RELATIONAL, Self::additive)
    }

    fn additive(&mut self) -> Parse<Expr> {
        self.binary_level(ADDITIVE, Self::multiplicative)
    }

    fn multiplicative(&mut self) -> Parse<Expr> {
        self.binary_level(MULTIPLICATIVE, Self::primary)
    }

    /// One left-associative precedence level.
    fn binary_level(
        &mut self,
        operators: &[(TokenKind, BinOp)],
        operand: fn(&mut Self) -> Parse<Expr>,
    ) -> Parse<Expr> {
        let mut left = operand(self)?;
        loop {
            let kind = self.peek_kind();
            let Some(&(_, op)) = operators.iter().find(|(k, _)| *k == kind) else {
                return Ok(left);
            };
            self.bump();
            let right = operand(self)?;
            left = Expr::binary(op, left, right);
        }
    }

    fn primary(&mut self) -> Parse<Expr> {
        let token = self.bump();
        let expr = match token.kind {
            TokenKind::Null => Expr::Null,
            TokenKind::Number => Expr::Number(parse_number(&token.lexeme)?),
            TokenKind::Str => Expr::String(token.lexeme.clone()),
            TokenKind::LBracket => Expr::Array(self.delimited(
                TokenKind::RBracket,
                "',' or ']' in array literal",
                Self::expression,
            )?),
            TokenKind::LBrace => Expr::Map(self.delimited(
                TokenKind::RBrace,
                "',' or '}' in map literal",
                Self::map_entry,
            )?),
            TokenKind::LParen => {
                let inner = self.expression()?;
                self.expect(TokenKind::RParen, "')'")?;
                inner
            }
            TokenKind::This => Expr::Variable(RECEIVER.to_string()),
            TokenKind::Ident => {
                let name = token.lexeme.clone();
                if self.eat(TokenKind::LParen) {
                    let args =
                        self.delimited(TokenKind::RParen, "',' or ')' in arguments", Self::expression)?;
                    Expr::Call { name, args }
                } else {
                    Expr::Variable(name)
                }
            }
            _ => {
                return Err(CoreError::ParseError(format!(
                    "expected an expression, found {}",
                    describe(token)
                )));
            }
        };
        self.postfix_chain(expr)
    }

    /// `.field`, `.method(args)` and `[index]`, applied left to right.
    fn postfix_chain(&mut self, mut expr: Expr) -> Parse<Expr> {
        loop {
            expr = match self.peek_kind() {
                TokenKind::Dot => {
                    self.bump();
                    let name = self.name("member name")?;
                    if self.eat(TokenKind::LParen) {
                        let args = self.delimited(
                            TokenKind::RParen,
                            "',' or ')' in arguments",
                            Self::expression,
                        )?;
                        Expr::MethodCall {
                            receiver: Box::new(expr),
                            method: name,
                            args,
                        }
                    } else {
                        Expr::MemberAccess {
                            object: Box::new(expr),
                            field: name,
                        }
                    }
                }
                TokenKind::LBracket => {
                    self.bump();
                    let index = self.expression()?;
                    self.expect(TokenKind::RBracket, "']'")?;
                    Expr::IndexAccess {
                        object: Box::new(expr),
                        index: Box::new(index),
                    }
                }
                _ => return Ok(expr),
            };
        }
    }

    fn map_entry(&mut self) -> Parse<(String, Expr)> {
        let token = self.peek();
        let key = match token.kind {
            TokenKind::Str => decode_escapes(&token.lexeme),
            TokenKind::Ident | TokenKind::Number => token.lexeme.clone(),
            kind if kind.is_keyword() => token.lexeme.clone(),
            _ => {
                return Err(CoreError::ParseError(format!(
                    "expected map key, found {}",
                    describe(token)
                )));
            }
        };
        self.bump();
        self.expect(TokenKind::Colon, "':' after map key")?;
        Ok((key, self.expression()?))
    }

    /// Comma separated items up to `close`; a trailing comma is accepted.
    fn delimited<T>(
        &mut self,
        close: TokenKind,
        what: &str,
        mut item: impl FnMut(&mut Self) -> Parse<T>,
    ) -> Parse<Vec<T>> {
        let mut items = Vec::new();
        loop {
            if self.eat(close) {
                return Ok(items);
            }
            items.push(item(self)?);
            if !self.eat(TokenKind::Comma) {
                self.expect(close, what)?;
                return Ok(items);
            }
        }
    }

    /// An identifier, or a keyword used in name position.
    fn name(&mut self, what: &str) -> Parse<String> {
        let token = self.peek();
        if token.is(TokenKind::Ident) || token.kind.is_keyword() {
            self.bump();
            Ok(token.lexeme.clone())
        } else {
            Err(CoreError::ParseError(format!(
                "expected {what}, found {}",
                describe(token)
            )))
        }
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> Parse<&'t Token> {
        let token = self.peek();
        if token.is(kind) {
            Ok(self.bump())
        } else {
            Err(CoreError::ParseError(format!(
                "expected {what}, found {}",
                describe(token)
            )))
        }
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.peek_kind() == kind {
            self.bump();
            true
        } else {
            false
        }
    }

    fn peek(&self) -> &'t Token {
        self.tokens.get(self.position).unwrap_or(&END_OF_INPUT)
    }

    fn peek_kind(&self) -> TokenKind {
        self.peek().kind
    }

    fn bump(&mut self) -> &'t Token {
        let token = self.peek();
        if self.position < self.tokens.len() {
            self.position += 1;
        }
        token
    }
}

fn parse_number(lexeme: &str) -> Parse<i64> {
    lexeme
        .parse::<i32>()
        .map(i64::from)
        .map_err(|_| CoreError::ParseError(format!("integer literal {lexeme} does not fit in 32 bits")))
}

fn describe(token: &Token) -> String {
    match token.kind {
        TokenKind::Eof => "end of input".to_string(),
        _ => format!("`{}`", token.lexeme),
    }
}
