//! Syntax tree produced by the parser.
//!
//! Every node owns its children; the tree has no back references and is
//! read-only once the parser returns it.

/// The reserved receiver name inside methods.
pub const RECEIVER: &str = "this";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Program {
    pub items: Vec<Item>,
}

/// A top-level declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    Function(Function),
    Method(Method),
    Struct(StructDecl),
}

/// `fn name(params) { ... }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    pub name: String,
    pub params: Vec<String>,
    pub body: Block,
}

/// `fn Type.name(params) { ... }`, with `this` bound to the receiver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    pub structure: String,
    pub name: String,
    pub params: Vec<String>,
    pub body: Block,
}

/// `struct Name { field, field, ... }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructDecl {
    pub name: String,
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Block {
    pub statements: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    /// `val name := value` or `var name := value`
    Declaration {
        name: String,
        mutable: bool,
        value: Expr,
    },
    /// `name := value`
    Assignment { name: String, value: Expr },
    /// `object[index] := value`
    IndexAssignment {
        object: Expr,
        index: Expr,
        value: Expr,
    },
    /// `object.field := value`
    FieldAssignment {
        object: Expr,
        field: String,
        value: Expr,
    },
    If {
        condition: Expr,
        then_block: Block,
        else_block: Option<Block>,
    },
    While {
        condition: Expr,
        body: Block,
    },
    /// `for variable := start to end { ... }`, bounds inclusive.
    For {
        variable: String,
        start: Expr,
        end: Expr,
        body: Block,
    },
    /// `switch (subject) { case value: { ... } ... }`
    Switch {
        subject: Expr,
        cases: Vec<(Expr, Block)>,
    },
    Return(Expr),
    Break,
    Continue,
    Expr(Expr),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    NotEq,
    Less,
    Greater,
    And,
    Or,
}

impl BinOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Eq => "==",
            BinOp::NotEq => "!=",
            BinOp::Less => "<",
            BinOp::Greater => ">",
            BinOp::And => "&&",
            BinOp::Or => "||",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Null,
    Number(i64),
    /// Raw lexeme, escapes not yet decoded.
    String(String),
    Array(Vec<Expr>),
    /// Keys are stored decoded.
    Map(Vec<(String, Expr)>),
    Variable(String),
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Call {
        name: String,
        args: Vec<Expr>,
    },
    MethodCall {
        receiver: Box<Expr>,
        method: String,
        args: Vec<Expr>,
    },
    MemberAccess {
        object: Box<Expr>,
        field: String,
    },
    IndexAccess {
        object: Box<Expr>,
        index: Box<Expr>,
    },
}

impl Expr {
    pub fn binary(op: BinOp, left: Expr, right: Expr) -> Expr {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}
