//! Dynamic value model and built-ins for generated programs.
//!
//! This file is compiled twice: as `mhs_core::runtime`, and verbatim as the
//! prefix of every unit the code generator emits. It must therefore depend
//! on `std` alone and never refer to other modules of this library.
//!
//! Operations that can fail at run time come in pairs. The `checked_*` /
//! `try_*` form reports a [`Fault`]; the plain form (and the operator
//! traits) call it and [`halt`] the process on error.

#![allow(
    dead_code,
    unused_mut,
    unused_variables,
    unreachable_code,
    non_snake_case,
    unused_parens,
    unused_labels
)]

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fmt;
use std::io::{self, BufRead, Write};
use std::ops::{Add, Div, Mul, Sub};
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

/// A terminal run-time error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fault {
    IndexOutOfBounds,
    Overflow,
    InvalidNumber(String),
    MethodNotFound,
    DivisionByZero,
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fault::IndexOutOfBounds => f.write_str("[PANIC] Index out of bounds"),
            Fault::Overflow => f.write_str("[PANIC] Overflow"),
            Fault::InvalidNumber(text) => write!(f, "[PANIC] Invalid number: \"{text}\""),
            Fault::MethodNotFound => f.write_str("[PANIC] Method not found"),
            Fault::DivisionByZero => f.write_str("[PANIC] Division by zero"),
        }
    }
}

impl std::error::Error for Fault {}

/// Print the fault's diagnostic to stderr and exit with status 1.
pub fn halt(fault: Fault) -> ! {
    let _ = io::stdout().flush();
    eprintln!("{fault}");
    std::process::exit(1)
}

/// A dynamically typed value.
///
/// Cloning a composite (struct, array, map) copies the handle, so every
/// clone observes the same contents.
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Int(i64),
    Str(String),
    Struct {
        name: Rc<str>,
        fields: Rc<RefCell<BTreeMap<String, Value>>>,
    },
    Array(Rc<RefCell<Vec<Value>>>),
    Map(Rc<RefCell<BTreeMap<String, Value>>>),
}

impl Value {
    pub fn array(items: Vec<Value>) -> Value {
        Value::Array(Rc::new(RefCell::new(items)))
    }

    pub fn map(entries: Vec<(&str, Value)>) -> Value {
        let entries = entries
            .into_iter()
            .map(|(key, value)| (key.to_string(), value))
            .collect();
        Value::Map(Rc::new(RefCell::new(entries)))
    }

    /// A struct instance whose fields take `args` in order. Missing
    /// arguments leave a field null; surplus arguments are dropped.
    pub fn instance(name: &str, fields: &[&str], args: Vec<Value>) -> Value {
        let mut args = args.into_iter();
        let fields = fields
            .iter()
            .map(|field| (field.to_string(), args.next().unwrap_or_default()))
            .collect();
        Value::Struct {
            name: Rc::from(name),
            fields: Rc::new(RefCell::new(fields)),
        }
    }

    /// Integers are true when nonzero and strings when non-empty.
    /// Everything else, including empty or full collections, is false.
    pub fn is_true(&self) -> bool {
        match self {
            Value::Int(n) => *n != 0,
            Value::Str(s) => !s.is_empty(),
            _ => false,
        }
    }

    /// The integer payload, or 0 for any other kind.
    pub fn int(&self) -> i64 {
        match self {
            Value::Int(n) => *n,
            _ => 0,
        }
    }

    /// The string payload, or the empty string for any other kind.
    pub fn string_value(&self) -> String {
        match self {
            Value::Str(s) => s.clone(),
            _ => String::new(),
        }
    }

    pub fn struct_name(&self) -> Option<Rc<str>> {
        match self {
            Value::Struct { name, .. } => Some(Rc::clone(name)),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Value::Array(items) => items.borrow().len(),
            Value::Map(entries) => entries.borrow().len(),
            _ => 0,
        }
    }

    pub fn push(&self, value: Value) {
        if let Value::Array(items) = self {
            items.borrow_mut().push(value);
        }
    }

    fn position(&self) -> Option<usize> {
        usize::try_from(self.int()).ok()
    }

    pub fn try_index(&self, key: &Value) -> Result<Value, Fault> {
        match self {
            Value::Array(items) => key
                .position()
                .and_then(|i| items.borrow().get(i).cloned())
                .ok_or(Fault::IndexOutOfBounds),
            Value::Map(entries) => Ok(entries
                .borrow()
                .get(&key.to_string())
                .cloned()
                .unwrap_or_default()),
            _ => Ok(Value::Null),
        }
    }

    pub fn index(&self, key: &Value) -> Value {
        self.try_index(key).unwrap_or_else(|fault| halt(fault))
    }

    pub fn try_set_index(&self, key: &Value, value: Value) -> Result<(), Fault> {
        match self {
            Value::Array(items) => {
                let mut items = items.borrow_mut();
                let i = key
                    .position()
                    .filter(|&i| i < items.len())
                    .ok_or(Fault::IndexOutOfBounds)?;
                items[i] = value;
            }
            Value::Map(entries) => {
                entries.borrow_mut().insert(key.to_string(), value);
            }
            _ => {}
        }
        Ok(())
    }

    pub fn set_index(&self, key: &Value, value: Value) {
        if let Err(fault) = self.try_set_index(key, value) {
            halt(fault);
        }
    }

    pub fn field(&self, name: &str) -> Value {
        match self {
            Value::Struct { fields, .. } | Value::Map(fields) => {
                fields.borrow().get(name).cloned().unwrap_or_default()
            }
            _ => Value::Null,
        }
    }

    pub fn set_field(&self, name: &str, value: Value) {
        if let Value::Struct { fields, .. } | Value::Map(fields) = self {
            fields.borrow_mut().insert(name.to_string(), value);
        }
    }

    fn same(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
            (Value::Map(a), Value::Map(b)) => Rc::ptr_eq(a, b),
            // Instances compare by struct name, not by field contents.
            (Value::Struct { name: a, .. }, Value::Struct { name: b, .. }) => a == b,
            _ => false,
        }
    }

    pub fn equals(&self, other: &Value) -> Value {
        Value::from(self.same(other))
    }

    pub fn not_equals(&self, other: &Value) -> Value {
        Value::from(!self.same(other))
    }

    pub fn less(&self, other: &Value) -> Value {
        Value::from(self.int() < other.int())
    }

    pub fn greater(&self, other: &Value) -> Value {
        Value::from(self.int() > other.int())
    }

    // Both operands are already evaluated; there is no short circuit.
    pub fn and(&self, other: &Value) -> Value {
        Value::from(self.int() != 0 && other.int() != 0)
    }

    pub fn or(&self, other: &Value) -> Value {
        Value::from(self.int() != 0 || other.int() != 0)
    }

    /// Loop guard of an inclusive counting loop.
    pub fn at_most(&self, end: &Value) -> bool {
        self.less(end).is_true() || self.same(end)
    }

    pub fn successor(&self) -> Value {
        Value::Int(self.int().wrapping_add(1))
    }

    /// Integer product, required to stay inside the 32-bit signed range.
    pub fn checked_mul(&self, rhs: &Value) -> Result<Value, Fault> {
        let product = self.int().checked_mul(rhs.int()).ok_or(Fault::Overflow)?;
        i32::try_from(product).map_err(|_| Fault::Overflow)?;
        Ok(Value::Int(product))
    }

    pub fn checked_div(&self, rhs: &Value) -> Result<Value, Fault> {
        match rhs.int() {
            0 => Err(Fault::DivisionByZero),
            divisor => Ok(Value::Int(self.int().wrapping_div(divisor))),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Str(s) => f.write_str(s),
            Value::Struct { .. } => f.write_str("[Object]"),
            Value::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.borrow().iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Map(entries) => {
                f.write_str("{")?;
                for (i, (key, value)) in entries.borrow().iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Int(i64::from(b))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

/// Concatenates the display forms, so `1 + 2` is the string `"12"`.
impl Add for Value {
    type Output = Value;

    fn add(self, rhs: Value) -> Value {
        Value::Str(format!("{self}{rhs}"))
    }
}

impl Sub for Value {
    type Output = Value;

    fn sub(self, rhs: Value) -> Value {
        Value::Int(self.int().wrapping_sub(rhs.int()))
    }
}

impl Mul for Value {
    type Output = Value;

    fn mul(self, rhs: Value) -> Value {
        self.checked_mul(&rhs).unwrap_or_else(|fault| halt(fault))
    }
}

impl Div for Value {
    type Output = Value;

    fn div(self, rhs: Value) -> Value {
        self.checked_div(&rhs).unwrap_or_else(|fault| halt(fault))
    }
}

/// The `index`-th call argument, or null when the caller passed fewer.
pub fn argument(args: &[Value], index: usize) -> Value {
    args.get(index).cloned().unwrap_or_default()
}

pub fn builtin_print(value: Value) -> Value {
    println!("{value}");
    Value::Null
}

pub fn builtin_read_file(path: Value) -> Value {
    std::fs::read_to_string(path.string_value())
        .map(Value::Str)
        .unwrap_or_default()
}

pub fn builtin_write_file(path: Value, content: Value) -> Value {
    Value::from(std::fs::write(path.string_value(), content.to_string()).is_ok())
}

pub fn builtin_len(value: Value) -> Value {
    Value::Int(value.len() as i64)
}

pub fn builtin_push(array: Value, value: Value) -> Value {
    array.push(value);
    Value::Null
}

pub fn builtin_at(collection: Value, key: Value) -> Value {
    collection.index(&key)
}

pub fn builtin_str_len(text: Value) -> Value {
    Value::Int(text.string_value().chars().count() as i64)
}

pub fn try_str_at(text: &Value, index: &Value) -> Result<Value, Fault> {
    let text = text.string_value();
    index
        .position()
        .and_then(|i| text.chars().nth(i))
        .map(|c| Value::Str(c.to_string()))
        .ok_or(Fault::IndexOutOfBounds)
}

pub fn builtin_str_at(text: Value, index: Value) -> Value {
    try_str_at(&text, &index).unwrap_or_else(|fault| halt(fault))
}

thread_local! {
    static RANDOM_STATE: Cell<u64> = const { Cell::new(0) };
}

fn next_random() -> u64 {
    RANDOM_STATE.with(|state| {
        let mut x = state.get();
        if x == 0 {
            x = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|elapsed| elapsed.as_nanos() as u64)
                .unwrap_or(0x2545_f491_4f6c_dd1d)
                | 1;
        }
        // xorshift64
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        state.set(x);
        x
    })
}

/// A pseudo-random integer in `0..bound`, or 0 when `bound` is not positive.
pub fn builtin_random_int(bound: Value) -> Value {
    match bound.int() {
        n if n <= 0 => Value::Int(0),
        n => Value::Int((next_random() % n as u64) as i64),
    }
}

pub fn builtin_input(prompt: Value) -> Value {
    if !matches!(prompt, Value::Null) {
        print!("{prompt}");
        let _ = io::stdout().flush();
    }
    let mut line = String::new();
    let _ = io::stdin().lock().read_line(&mut line);
    Value::Str(line.trim_end_matches(['\n', '\r']).to_string())
}

/// Leading whitespace, an optional sign and at least one digit; any text
/// after the digits is ignored. The result must fit in an `i64`.
pub fn try_to_int(text: &str) -> Result<i64, Fault> {
    let invalid = || Fault::InvalidNumber(text.to_string());
    let trimmed = text.trim_start();
    let (sign, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => ("-", &trimmed[1..]),
        Some(b'+') => ("", &trimmed[1..]),
        _ => ("", trimmed),
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return Err(invalid());
    }
    format!("{sign}{}", &rest[..digits])
        .parse::<i64>()
        .map_err(|_| invalid())
}

pub fn builtin_to_int(value: Value) -> Value {
    match value {
        Value::Int(_) => value,
        other => try_to_int(&other.to_string())
            .map(Value::Int)
            .unwrap_or_else(|fault| halt(fault)),
    }
}
