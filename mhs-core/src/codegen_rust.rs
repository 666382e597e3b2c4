//! Rust code generation from the MHS syntax tree.
//!
//! Lowering is a direct structural walk: every expression becomes an
//! owned `Value` expression over the runtime prefix, every statement a
//! Rust statement. There is no intermediate representation.
//!
//! The generator is stateful. Struct declarations fill the struct
//! registry as they are reached, so a constructor call only lowers to
//! `construct_struct` once its struct has been seen. Method declarations
//! fill the dispatch table, which becomes `dispatch_method` after the
//! last item.

use std::collections::{BTreeMap, HashMap};

use log::{debug, warn};

use crate::ast::{BinOp, Block, Expr, Function, Item, Method, Program, RECEIVER, Stmt, StructDecl};
use crate::builtins::find_builtin;
use crate::lexer::decode_escapes;

const INDENT: &str = "    ";
const ENTRY_POINT: &str = "main";
const RECEIVER_IDENT: &str = "receiver";

/// Whether a binding was introduced with `val` or `var`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutability {
    Immutable,
    Mutable,
}

/// Names visible at one point of a function body.
///
/// Blocks work on a copy, so their declarations vanish when they end.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    bindings: HashMap<String, Mutability>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare(&mut self, name: &str, mutability: Mutability) {
        self.bindings.insert(name.to_string(), mutability);
    }

    pub fn mutability(&self, name: &str) -> Option<Mutability> {
        self.bindings.get(name).copied()
    }
}

/// One `(struct, method)` pair reachable through `dispatch_method`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchEntry {
    pub structure: String,
    pub method: String,
    pub arity: usize,
}

impl DispatchEntry {
    pub fn symbol(&self) -> String {
        method_symbol(&self.structure, &self.method)
    }
}

#[derive(Debug, Clone, Copy)]
enum LoopFrame {
    While,
    Counting(usize),
}

/// The parts of a `for name := start to end { body }` statement.
#[derive(Debug, Clone, Copy)]
struct CountingLoop<'a> {
    variable: &'a str,
    start: &'a Expr,
    end: &'a Expr,
    body: &'a Block,
}

#[derive(Debug, Default)]
pub struct RustGenerator {
    structs: BTreeMap<String, Vec<String>>,
    methods: Vec<DispatchEntry>,
    loops: Vec<LoopFrame>,
    labels: usize,
}

impl RustGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lower a whole program. The result expects the runtime prefix in
    /// front of it.
    pub fn generate(&mut self, program: &Program) -> String {
        let mut out = String::new();

        let functions: Vec<&Function> = program
            .items
            .iter()
            .filter_map(|item| match item {
                Item::Function(function) => Some(function),
                _ => None,
            })
            .collect();

        for function in functions.iter().filter(|f| f.name != ENTRY_POINT) {
            let params = vec!["Value"; function.params.len()].join(", ");
            push_line(
                &mut out,
                0,
                &format!(
                    "const _: fn({params}) -> Value = {};",
                    function_symbol(&function.name)
                ),
            );
        }
        if !functions.is_empty() {
            out.push('\n');
        }

        push_line(&mut out, 0, "fn main() {");
        push_line(&mut out, 1, "mhs_main();");
        push_line(&mut out, 0, "}");

        if !functions.iter().any(|f| f.name == ENTRY_POINT) {
            warn!("program has no `main` function; the generated program does nothing");
            out.push('\n');
            push_line(&mut out, 0, "fn mhs_main() -> Value {");
            push_line(&mut out, 1, "Value::Int(0)");
            push_line(&mut out, 0, "}");
        }

        for item in &program.items {
            match item {
                Item::Struct(decl) => self.register_struct(decl),
                Item::Function(function) => {
                    out.push('\n');
                    self.function(&mut out, function);
                }
                Item::Method(method) => {
                    out.push('\n');
                    self.method(&mut out, method);
                }
            }
        }

        out.push('\n');
        self.dispatcher(&mut out);
        out.push('\n');
        self.constructor(&mut out);
        out
    }

    pub fn struct_names(&self) -> Vec<String> {
        self.structs.keys().cloned().collect()
    }

    pub fn methods(&self) -> &[DispatchEntry] {
        &self.methods
    }

    fn register_struct(&mut self, decl: &StructDecl) {
        debug!("registering struct {} {:?}", decl.name, decl.fields);
        if self
            .structs
            .insert(decl.name.clone(), decl.fields.clone())
            .is_some()
        {
            warn!("struct `{}` declared more than once; keeping the last", decl.name);
        }
    }

    fn function(&mut self, out: &mut String, function: &Function) {
        let mut scope = Scope::new();

        if function.name == ENTRY_POINT {
            push_line(out, 0, "fn mhs_main() -> Value {");
            if !function.params.is_empty() {
                warn!(
                    "`main` receives no arguments; parameters {:?} start as null",
                    function.params
                );
            }
            for param in &function.params {
                push_line(out, 1, &format!("let mut {} = Value::Null;", variable(param)));
                scope.declare(param, Mutability::Mutable);
            }
            self.statements(out, 1, &function.body.statements, &mut scope);
            push_line(out, 1, "Value::Int(0)");
        } else {
            let params = self.parameters(&function.params, &mut scope);
            push_line(
                out,
                0,
                &format!("fn {}({params}) -> Value {{", function_symbol(&function.name)),
            );
            self.statements(out, 1, &function.body.statements, &mut scope);
            push_line(out, 1, "Value::Null");
        }
        push_line(out, 0, "}");
    }

    fn method(&mut self, out: &mut String, method: &Method) {
        let entry = DispatchEntry {
            structure: method.structure.clone(),
            method: method.name.clone(),
            arity: method.params.len(),
        };
        debug!("registering method {}.{}", entry.structure, entry.method);

        let mut scope = Scope::new();
        scope.declare(RECEIVER, Mutability::Immutable);
        let mut params = format!("mut {RECEIVER_IDENT}: Value");
        if !method.params.is_empty() {
            params.push_str(", ");
            params.push_str(&self.parameters(&method.params, &mut scope));
        }

        push_line(out, 0, &format!("fn {}({params}) -> Value {{", entry.symbol()));
        self.statements(out, 1, &method.body.statements, &mut scope);
        push_line(out, 1, "Value::Null");
        push_line(out, 0, "}");

        self.methods.push(entry);
    }

    fn parameters(&self, params: &[String], scope: &mut Scope) -> String {
        params
            .iter()
            .map(|param| {
                scope.declare(param, Mutability::Mutable);
                format!("mut {}: Value", variable(param))
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn dispatcher(&self, out: &mut String) {
        push_line(
            out,
            0,
            "fn dispatch_method(receiver: Value, method: &str, args: Vec<Value>) -> Value {",
        );
        push_line(out, 1, "match (receiver.struct_name().as_deref(), method) {");
        for entry in &self.methods {
            let args: String = (0..entry.arity)
                .map(|i| format!(", argument(&args, {i})"))
                .collect();
            push_line(
                out,
                2,
                &format!(
                    "(Some({:?}), {:?}) => {}(receiver{args}),",
                    entry.structure,
                    entry.method,
                    entry.symbol()
                ),
            );
        }
        push_line(out, 2, "_ => halt(Fault::MethodNotFound),");
        push_line(out, 1, "}");
        push_line(out, 0, "}");
    }

    fn constructor(&self, out: &mut String) {
        push_line(
            out,
            0,
            "fn construct_struct(name: &str, args: Vec<Value>) -> Value {",
        );
        push_line(out, 1, "match name {");
        for (name, fields) in &self.structs {
            let fields = fields
                .iter()
                .map(|field| format!("{field:?}"))
                .collect::<Vec<_>>()
                .join(", ");
            push_line(
                out,
                2,
                &format!("{name:?} => Value::instance({name:?}, &[{fields}], args),"),
            );
        }
        push_line(out, 2, "_ => Value::instance(name, &[], args),");
        push_line(out, 1, "}");
        push_line(out, 0, "}");
    }

    /// Lower `stmts` at indentation `depth`, declaring into `scope`.
    pub fn statements(&mut self, out: &mut String, depth: usize, stmts: &[Stmt], scope: &mut Scope) {
        for stmt in stmts {
            self.statement(out, depth, stmt, scope);
        }
    }

    fn block(&mut self, out: &mut String, depth: usize, block: &Block, scope: &Scope) {
        let mut inner = scope.clone();
        self.statements(out, depth, &block.statements, &mut inner);
    }

    fn statement(&mut self, out: &mut String, depth: usize, stmt: &Stmt, scope: &mut Scope) {
        match stmt {
            Stmt::Declaration {
                name,
                mutable,
                value,
            } => {
                let value = self.expr(value);
                let (binding, mutability) = if *mutable {
                    ("let mut", Mutability::Mutable)
                } else {
                    ("let", Mutability::Immutable)
                };
                push_line(out, depth, &format!("{binding} {} = {value};", variable(name)));
                scope.declare(name, mutability);
            }
            Stmt::Assignment { name, value } => {
                match scope.mutability(name) {
                    Some(Mutability::Immutable) => {
                        warn!("`{name}` is declared with `val` and cannot be reassigned")
                    }
                    None => warn!("assignment to undeclared variable `{name}`"),
                    Some(Mutability::Mutable) => {}
                }
                let value = self.expr(value);
                push_line(out, depth, &format!("{} = {value};", variable(name)));
            }
            Stmt::IndexAssignment {
                object,
                index,
                value,
            } => {
                let line = format!(
                    "{}.set_index(&{}, {});",
                    self.expr(object),
                    self.expr(index),
                    self.expr(value)
                );
                push_line(out, depth, &line);
            }
            Stmt::FieldAssignment {
                object,
                field,
                value,
            } => {
                let line = format!(
                    "{}.set_field({field:?}, {});",
                    self.expr(object),
                    self.expr(value)
                );
                push_line(out, depth, &line);
            }
            Stmt::If {
                condition,
                then_block,
                else_block,
            } => {
                push_line(out, depth, &format!("if ({}).is_true() {{", self.expr(condition)));
                self.block(out, depth + 1, then_block, scope);
                if let Some(else_block) = else_block {
                    push_line(out, depth, "} else {");
                    self.block(out, depth + 1, else_block, scope);
                }
                push_line(out, depth, "}");
            }
            Stmt::While { condition, body } => {
                push_line(out, depth, &format!("while ({}).is_true() {{", self.expr(condition)));
                self.loops.push(LoopFrame::While);
                self.block(out, depth + 1, body, scope);
                self.loops.pop();
                push_line(out, depth, "}");
            }
            Stmt::For {
                variable,
                start,
                end,
                body,
            } => {
                let header = CountingLoop {
                    variable,
                    start,
                    end,
                    body,
                };
                self.counting_loop(out, depth, header, scope);
            }
            Stmt::Switch { subject, cases } => {
                push_line(out, depth, "{");
                push_line(
                    out,
                    depth + 1,
                    &format!("let switch_subject = {};", self.expr(subject)),
                );
                for (i, (value, block)) in cases.iter().enumerate() {
                    let guard = format!("switch_subject.equals(&{}).is_true()", self.expr(value));
                    if i == 0 {
                        push_line(out, depth + 1, &format!("if {guard} {{"));
                    } else {
                        push_line(out, depth + 1, &format!("}} else if {guard} {{"));
                    }
                    self.block(out, depth + 2, block, scope);
                }
                if !cases.is_empty() {
                    push_line(out, depth + 1, "}");
                }
                push_line(out, depth, "}");
            }
            Stmt::Return(value) => {
                push_line(out, depth, &format!("return {};", self.expr(value)));
            }
            Stmt::Break => match self.loops.last() {
                Some(LoopFrame::While) => push_line(out, depth, "break;"),
                Some(LoopFrame::Counting(id)) => push_line(out, depth, &format!("break 'for_{id};")),
                None => warn!("`break` outside of a loop is ignored"),
            },
            Stmt::Continue => match self.loops.last() {
                Some(LoopFrame::While) => push_line(out, depth, "continue;"),
                Some(LoopFrame::Counting(id)) => push_line(out, depth, &format!("break 'next_{id};")),
                None => warn!("`continue` outside of a loop is ignored"),
            },
            Stmt::Expr(expr) => push_line(out, depth, &format!("{};", self.expr(expr))),
        }
    }

    // `continue` leaves the inner labelled block, so the increment still runs.
    fn counting_loop(
        &mut self,
        out: &mut String,
        depth: usize,
        header: CountingLoop<'_>,
        scope: &Scope,
    ) {
        let CountingLoop {
            variable: name,
            start,
            end,
            body,
        } = header;
        self.labels += 1;
        let id = self.labels;
        let induction = variable(name);

        push_line(out, depth, "{");
        push_line(
            out,
            depth + 1,
            &format!("let mut {induction} = {};", self.expr(start)),
        );
        push_line(
            out,
            depth + 1,
            &format!("'for_{id}: while {induction}.at_most(&{}) {{", self.expr(end)),
        );
        push_line(out, depth + 2, &format!("'next_{id}: {{"));

        let mut inner = scope.clone();
        inner.declare(name, Mutability::Mutable);
        self.loops.push(LoopFrame::Counting(id));
        self.statements(out, depth + 3, &body.statements, &mut inner);
        self.loops.pop();

        push_line(out, depth + 2, "}");
        push_line(out, depth + 2, &format!("{induction} = {induction}.successor();"));
        push_line(out, depth + 1, "}");
        push_line(out, depth, "}");
    }

    /// Lower an expression to an owned `Value` expression.
    pub fn expr(&self, expr: &Expr) -> String {
        match expr {
            Expr::Null => "Value::Null".to_string(),
            Expr::Number(n) => format!("Value::Int({n})"),
            Expr::String(raw) => format!("Value::from({:?})", decode_escapes(raw)),
            Expr::Array(elements) => format!("Value::array(vec![{}])", self.list(elements)),
            Expr::Map(entries) => {
                let entries = entries
                    .iter()
                    .map(|(key, value)| format!("({key:?}, {})", self.expr(value)))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("Value::map(vec![{entries}])")
            }
            Expr::Variable(name) => format!("{}.clone()", variable(name)),
            Expr::Binary { op, left, right } => {
                let left = self.expr(left);
                let right = self.expr(right);
                match op {
                    BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div => {
                        format!("({left} {} {right})", op.symbol())
                    }
                    BinOp::Eq => format!("{left}.equals(&{right})"),
                    BinOp::NotEq => format!("{left}.not_equals(&{right})"),
                    BinOp::Less => format!("{left}.less(&{right})"),
                    BinOp::Greater => format!("{left}.greater(&{right})"),
                    BinOp::And => format!("{left}.and(&{right})"),
                    BinOp::Or => format!("{left}.or(&{right})"),
                }
            }
            Expr::Call { name, args } => self.call(name, args),
            Expr::MethodCall {
                receiver,
                method,
                args,
            } => format!(
                "dispatch_method({}, {method:?}, vec![{}])",
                self.expr(receiver),
                self.list(args)
            ),
            Expr::MemberAccess { object, field } => {
                format!("{}.field({field:?})", self.expr(object))
            }
            Expr::IndexAccess { object, index } => {
                format!("{}.index(&{})", self.expr(object), self.expr(index))
            }
        }
    }

    /// Builtins first, then registered structs, then user functions.
    fn call(&self, name: &str, args: &[Expr]) -> String {
        if let Some(builtin) = find_builtin(name) {
            if !builtin.accepts(args.len()) {
                warn!(
                    "`{name}` takes {}..={} arguments but is called with {}",
                    builtin.min_args,
                    builtin.max_args,
                    args.len()
                );
            }
            let mut lowered: Vec<String> = args
                .iter()
                .take(builtin.max_args)
                .map(|arg| self.expr(arg))
                .collect();
            lowered.resize(builtin.max_args, "Value::Null".to_string());
            return format!("{}({})", builtin.symbol, lowered.join(", "));
        }

        if self.structs.contains_key(name) {
            return format!("construct_struct({name:?}, vec![{}])", self.list(args));
        }

        format!("{}({})", function_symbol(name), self.list(args))
    }

    fn list(&self, exprs: &[Expr]) -> String {
        exprs
            .iter()
            .map(|e| self.expr(e))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

pub fn variable(name: &str) -> String {
    if name == RECEIVER {
        RECEIVER_IDENT.to_string()
    } else {
        format!("var_{name}")
    }
}

pub fn function_symbol(name: &str) -> String {
    if name == ENTRY_POINT {
        "mhs_main".to_string()
    } else {
        format!("fn_{name}")
    }
}

pub fn method_symbol(structure: &str, name: &str) -> String {
    format!("method_{structure}__{name}")
}

fn push_line(out: &mut String, depth: usize, line: &str) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
    out.push_str(line);
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn generate(source: &str) -> String {
        let program = parse(source).expect("parse");
        RustGenerator::new().generate(&program)
    }

    fn main_statements(source: &str) -> Vec<Stmt> {
        let program = parse(source).expect("parse");
        match program.items.into_iter().next() {
            Some(Item::Function(function)) => function.body.statements,
            other => panic!("expected a function, got {other:?}"),
        }
    }

    #[test]
    fn reassignment_keeps_declared_mutability() {
        let stmts = main_statements("fn main() { val x := 1 x := 2 var y := 3 }");
        let mut generator = RustGenerator::new();
        let mut scope = Scope::new();
        let mut out = String::new();
        generator.statements(&mut out, 1, &stmts, &mut scope);

        assert_eq!(scope.mutability("x"), Some(Mutability::Immutable));
        assert_eq!(scope.mutability("y"), Some(Mutability::Mutable));
        assert!(out.contains("    let var_x = Value::Int(1);\n"));
        assert!(out.contains("    var_x = Value::Int(2);\n"));
        assert!(out.contains("    let mut var_y = Value::Int(3);\n"));
    }

    #[test]
    fn block_declarations_do_not_leak() {
        let stmts = main_statements("fn main() { if 1 { var inner := 2 } for i := 1 to 2 { } }");
        let mut scope = Scope::new();
        RustGenerator::new().statements(&mut String::new(), 1, &stmts, &mut scope);
        assert_eq!(scope.mutability("inner"), None);
        assert_eq!(scope.mutability("i"), None);
    }

    #[test]
    fn arithmetic_and_comparison_lowering() {
        let generator = RustGenerator::new();
        let program = parse("fn main() { 2 + 3 * 4 a < b == c }").expect("parse");
        let Item::Function(main) = &program.items[0] else {
            panic!("expected main");
        };
        let lowered: Vec<String> = main
            .body
            .statements
            .iter()
            .map(|stmt| match stmt {
                Stmt::Expr(e) => generator.expr(e),
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(lowered[0], "(Value::Int(2) + (Value::Int(3) * Value::Int(4)))");
        assert_eq!(lowered[1], "var_a.clone().less(&var_b.clone()).equals(&var_c.clone())");
    }

    #[test]
    fn emits_entry_point_and_forward_declarations() {
        let code = generate("fn main() { print(add(1, 2)) } fn add(a, b) { return a + b }");
        assert!(code.contains("const _: fn(Value, Value) -> Value = fn_add;"));
        assert!(!code.contains("= mhs_main;"));
        assert!(code.contains("fn main() {\n    mhs_main();\n}"));
        assert!(code.contains("fn mhs_main() -> Value {"));
        assert!(code.contains("builtin_print(fn_add(Value::Int(1), Value::Int(2)));"));
        assert!(code.contains("fn fn_add(mut var_a: Value, mut var_b: Value) -> Value {"));
        assert!(code.contains("return (var_a.clone() + var_b.clone());"));
    }

    #[test]
    fn missing_main_gets_a_stub() {
        let code = generate("fn helper() { }");
        assert!(code.contains("fn main() {"));
        assert!(code.contains("fn mhs_main() -> Value {\n    Value::Int(0)\n}"));
    }

    #[test]
    fn dispatcher_and_constructor() {
        let code = generate(
            "struct Point { x, y }
             fn Point.scale(k) { return this.x * k }
             fn Point.name() { return \"point\" }
             fn main() { val p := Point(1, 2) print(p.scale(3)) }",
        );
        assert!(code.contains("fn method_Point__scale(mut receiver: Value, mut var_k: Value) -> Value {"));
        assert!(code.contains("return (receiver.clone().field(\"x\") * var_k.clone());"));
        assert!(code.contains("(Some(\"Point\"), \"scale\") => method_Point__scale(receiver, argument(&args, 0)),"));
        assert!(code.contains("(Some(\"Point\"), \"name\") => method_Point__name(receiver),"));
        assert!(code.contains("_ => halt(Fault::MethodNotFound),"));
        assert!(code.contains("\"Point\" => Value::instance(\"Point\", &[\"x\", \"y\"], args),"));
        assert!(code.contains("let var_p = construct_struct(\"Point\", vec![Value::Int(1), Value::Int(2)]);"));
        assert!(code.contains("dispatch_method(var_p.clone(), \"scale\", vec![Value::Int(3)])"));
    }

    #[test]
    fn struct_calls_depend_on_registration_order() {
        let code = generate(
            "fn early() { return Late(1) }
             struct Late { v }
             fn main() { print(Late(2)) }",
        );
        assert!(code.contains("return fn_Late(Value::Int(1));"));
        assert!(code.contains("builtin_print(construct_struct(\"Late\", vec![Value::Int(2)]));"));
    }

    #[test]
    fn counting_loop_is_inclusive_and_labelled() {
        let code = generate(
            "fn main() {
                for i := 1 to 3 {
                    if i == 2 { continue }
                    while 1 { break }
                    break
                }
            }",
        );
        assert!(code.contains("let mut var_i = Value::Int(1);"));
        assert!(code.contains("'for_1: while var_i.at_most(&Value::Int(3)) {"));
        assert!(code.contains("'next_1: {"));
        assert!(code.contains("break 'next_1;"));
        assert!(code.contains("            break;\n"));
        assert!(code.contains("break 'for_1;"));
        assert!(code.contains("var_i = var_i.successor();"));
    }

    #[test]
    fn nested_counting_loops_get_distinct_labels() {
        let code = generate("fn main() { for i := 1 to 2 { for j := 1 to 2 { continue } break } }");
        assert!(code.contains("'for_1:"));
        assert!(code.contains("'for_2:"));
        assert!(code.contains("break 'next_2;"));
        assert!(code.contains("break 'for_1;"));
    }

    #[test]
    fn switch_evaluates_subject_once() {
        let code = generate("fn main() { switch (pick()) { case 1: { print(1) } case 2: { print(2) } } }");
        assert!(code.contains("let switch_subject = fn_pick();"));
        assert!(code.contains("if switch_subject.equals(&Value::Int(1)).is_true() {"));
        assert!(code.contains("} else if switch_subject.equals(&Value::Int(2)).is_true() {"));
        assert!(!code.contains("else {"));
    }

    #[test]
    fn builtin_arguments_are_padded() {
        let code = generate("fn main() { val name := input() val xs := [1, {k: \"v\"}] xs[0] := len(xs) }");
        assert!(code.contains("let var_name = builtin_input(Value::Null);"));
        assert!(code.contains(
            "let var_xs = Value::array(vec![Value::Int(1), Value::map(vec![(\"k\", Value::from(\"v\"))])]);"
        ));
        assert!(code.contains("var_xs.clone().set_index(&Value::Int(0), builtin_len(var_xs.clone()));"));
    }

    #[test]
    fn string_escapes_are_decoded() {
        let code = generate(r#"fn main() { print("tab\there") }"#);
        assert!(code.contains(r#"builtin_print(Value::from("tab\there"));"#));
    }

    #[test]
    fn field_assignment_and_index_access() {
        let code = generate("fn main() { val m := {} m.count := m[\"count\"] }");
        assert!(code.contains(
            "var_m.clone().set_field(\"count\", var_m.clone().index(&Value::from(\"count\")));"
        ));
    }

    #[test]
    fn records_registry_and_dispatch_table() {
        let program = parse("struct B { } struct A { x } fn A.go() { }").expect("parse");
        let mut generator = RustGenerator::new();
        generator.generate(&program);
        assert_eq!(generator.struct_names(), vec!["A", "B"]);
        assert_eq!(generator.methods()[0].symbol(), "method_A__go");
    }
}
