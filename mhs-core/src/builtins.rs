//! Built-in functions visible at the MHS language level.
//!
//! This module only describes the builtins. The bodies live in the
//! runtime prefix of every generated unit; the code generator maps a
//! call through [`BuiltinDescriptor::symbol`] to the runtime function.

use crate::ast::{Block, Expr, Item, Program, Stmt};

/// Metadata about a single builtin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuiltinDescriptor {
    /// Name at the MHS level (e.g. `print`).
    pub name: &'static str,

    /// Runtime function the call lowers to (e.g. `builtin_print`).
    pub symbol: &'static str,

    /// Fewest arguments the builtin accepts. Missing optional arguments
    /// are passed as `null`.
    pub min_args: usize,

    /// Most arguments the builtin accepts.
    pub max_args: usize,
}

impl BuiltinDescriptor {
    const fn fixed(name: &'static str, symbol: &'static str, arity: usize) -> Self {
        BuiltinDescriptor {
            name,
            symbol,
            min_args: arity,
            max_args: arity,
        }
    }

    pub fn accepts(&self, count: usize) -> bool {
        (self.min_args..=self.max_args).contains(&count)
    }
}

/// The complete list of builtins known to the compiler.
pub const BUILTINS: &[BuiltinDescriptor] = &[
    BuiltinDescriptor::fixed("print", "builtin_print", 1),
    BuiltinDescriptor::fixed("read_file", "builtin_read_file", 1),
    BuiltinDescriptor::fixed("write_file", "builtin_write_file", 2),
    BuiltinDescriptor::fixed("len", "builtin_len", 1),
    BuiltinDescriptor::fixed("push", "builtin_push", 2),
    BuiltinDescriptor::fixed("at", "builtin_at", 2),
    BuiltinDescriptor::fixed("str_len", "builtin_str_len", 1),
    BuiltinDescriptor::fixed("str_at", "builtin_str_at", 2),
    BuiltinDescriptor::fixed("random_int", "builtin_random_int", 1),
    BuiltinDescriptor {
        name: "input",
        symbol: "builtin_input",
        min_args: 0,
        max_args: 1,
    },
    BuiltinDescriptor::fixed("to_int", "builtin_to_int", 1),
];

/// Look up a builtin by its MHS-level name.
pub fn find_builtin(name: &str) -> Option<&'static BuiltinDescriptor> {
    BUILTINS.iter().find(|b| b.name == name)
}

/// Builtins called anywhere in `program`, distinct, in first-use order.
pub fn collect_builtins(program: &Program) -> Vec<&'static BuiltinDescriptor> {
    let mut used = Vec::new();
    for item in &program.items {
        let body = match item {
            Item::Function(function) => &function.body,
            Item::Method(method) => &method.body,
            Item::Struct(_) => continue,
        };
        walk_block(body, &mut used);
    }
    used
}

fn walk_block(block: &Block, used: &mut Vec<&'static BuiltinDescriptor>) {
    for stmt in &block.statements {
        walk_stmt(stmt, used);
    }
}

fn walk_stmt(stmt: &Stmt, used: &mut Vec<&'static BuiltinDescriptor>) {
    match stmt {
        Stmt::Declaration { value, .. } | Stmt::Assignment { value, .. } | Stmt::Return(value) => {
            walk_expr(value, used)
        }
        Stmt::Expr(expr) => walk_expr(expr, used),
        Stmt::IndexAssignment {
            object,
            index,
            value,
        } => {
            walk_expr(object, used);
            walk_expr(index, used);
            walk_expr(value, used);
        }
        Stmt::FieldAssignment { object, value, .. } => {
            walk_expr(object, used);
            walk_expr(value, used);
        }
        Stmt::If {
            condition,
            then_block,
            else_block,
        } => {
            walk_expr(condition, used);
            walk_block(then_block, used);
            if let Some(block) = else_block {
                walk_block(block, used);
            }
        }
        Stmt::While { condition, body } => {
            walk_expr(condition, used);
            walk_block(body, used);
        }
        Stmt::For {
            start, end, body, ..
        } => {
            walk_expr(start, used);
            walk_expr(end, used);
            walk_block(body, used);
        }
        Stmt::Switch { subject, cases } => {
            walk_expr(subject, used);
            for (value, block) in cases {
                walk_expr(value, used);
                walk_block(block, used);
            }
        }
        Stmt::Break | Stmt::Continue => {}
    }
}

fn walk_expr(expr: &Expr, used: &mut Vec<&'static BuiltinDescriptor>) {
    match expr {
        Expr::Null | Expr::Number(_) | Expr::String(_) | Expr::Variable(_) => {}
        Expr::Array(elements) => elements.iter().for_each(|e| walk_expr(e, used)),
        Expr::Map(entries) => entries.iter().for_each(|(_, e)| walk_expr(e, used)),
        Expr::Binary { left, right, .. } => {
            walk_expr(left, used);
            walk_expr(right, used);
        }
        Expr::Call { name, args } => {
            if let Some(builtin) = find_builtin(name) {
                if !used.iter().any(|b| b.name == builtin.name) {
                    used.push(builtin);
                }
            }
            args.iter().for_each(|a| walk_expr(a, used));
        }
        Expr::MethodCall { receiver, args, .. } => {
            walk_expr(receiver, used);
            args.iter().for_each(|a| walk_expr(a, used));
        }
        Expr::MemberAccess { object, .. } => walk_expr(object, used),
        Expr::IndexAccess { object, index } => {
            walk_expr(object, used);
            walk_expr(index, used);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn finds_known_builtins() {
        let print = find_builtin("print").expect("print");
        assert_eq!(print.symbol, "builtin_print");
        assert!(print.accepts(1));
        assert!(!print.accepts(2));

        let input = find_builtin("input").expect("input");
        assert!(input.accepts(0));
        assert!(input.accepts(1));

        assert!(find_builtin("printf").is_none());
    }

    #[test]
    fn every_symbol_is_prefixed() {
        for builtin in BUILTINS {
            assert_eq!(builtin.symbol, format!("builtin_{}", builtin.name));
            assert!(builtin.min_args <= builtin.max_args);
        }
    }

    #[test]
    fn collects_distinct_builtins_in_first_use_order() {
        let program = parse(
            "fn helper(x) { return len(x) }
             fn main() {
                 val xs := [1, 2]
                 push(xs, to_int(\"3\"))
                 for i := 0 to len(xs) { print(at(xs, i)) }
                 print(helper(xs))
             }",
        )
        .expect("parse");
        let names: Vec<_> = collect_builtins(&program).iter().map(|b| b.name).collect();
        assert_eq!(names, vec!["len", "push", "to_int", "print", "at"]);
    }

    #[test]
    fn user_functions_are_not_builtins() {
        let program = parse("fn main() { helper(1) p.print(2) }").expect("parse");
        assert!(collect_builtins(&program).is_empty());
    }
}
