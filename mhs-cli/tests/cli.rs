use std::fs;

use assert_cmd::Command;
use assert_cmd::assert::Assert;
use predicates::prelude::*;
use tempfile::tempdir;

fn mhs() -> Command {
    Command::cargo_bin("mhs-cli").expect("binary exists")
}

/// Compile `source` with `--run` and return the finished command.
fn run_program(source: &str) -> Assert {
    let dir = tempdir().expect("tempdir");
    let input_path = dir.path().join("main.mhs");
    fs::write(&input_path, source).expect("write input");
    let output_path = dir.path().join("main.rs");

    mhs()
        .arg("--input")
        .arg(&input_path)
        .arg("--output")
        .arg(&output_path)
        .arg("--run")
        .assert()
}

#[test]
fn writes_rust_output() {
    let dir = tempdir().expect("tempdir");
    let input_path = dir.path().join("main.mhs");
    fs::write(&input_path, "fn main() { print(\"hi\") }").expect("write input");
    let output_path = dir.path().join("nested").join("out.rs");

    mhs()
        .arg("-i")
        .arg(&input_path)
        .arg("-o")
        .arg(&output_path)
        .assert()
        .success();

    let code = fs::read_to_string(&output_path).expect("output written");
    assert!(code.contains("enum Value"));
    assert!(code.contains("fn mhs_main() -> Value {"));
    assert!(code.contains("builtin_print(Value::from(\"hi\"));"));
}

#[test]
fn reads_source_from_stdin() {
    let dir = tempdir().expect("tempdir");
    let output_path = dir.path().join("out.rs");

    mhs()
        .arg("--output")
        .arg(&output_path)
        .write_stdin("fn main() { print(1) }")
        .assert()
        .success();

    assert!(fs::read_to_string(&output_path)
        .expect("output written")
        .contains("builtin_print(Value::Int(1));"));
}

#[test]
fn struct_fields_round_trip() {
    run_program(
        "struct Pair { a, b }
         fn main() {
             val p := Pair(1, 2)
             print(p.a)
             print(p.b)
         }",
    )
    .success()
    .stdout("1\n2\n");
}

#[test]
fn methods_dispatch_on_the_receiver() {
    run_program(
        "struct Counter { n }
         fn Counter.scaled(k) { return this.n * k }
         fn Counter.reset() { this.n := 0 }
         fn main() {
             val c := Counter(7)
             print(c.scaled(3))
             c.reset()
             print(c.n)
         }",
    )
    .success()
    .stdout("21\n0\n");
}

#[test]
fn unknown_method_halts() {
    run_program(
        "struct Empty { }
         fn main() {
             val e := Empty()
             print(\"before\")
             e.missing()
             print(\"after\")
         }",
    )
    .failure()
    .code(1)
    .stdout("before\n")
    .stderr(predicate::str::contains("[PANIC] Method not found"));
}

#[test]
fn method_on_another_struct_is_not_found() {
    run_program(
        "struct Point { x, y }
         struct Other { v }
         fn Point.sum() { return this.x * this.y }
         fn main() {
             print(Point(2, 3).sum())
             val o := Other(1)
             o.sum()
             print(\"after\")
         }",
    )
    .failure()
    .code(1)
    .stdout("6\n")
    .stderr(predicate::str::contains("[PANIC] Method not found"));
}

#[test]
fn struct_equality_follows_the_struct_name() {
    run_program(
        "struct Point { x }
         struct Other { x }
         fn main() {
             print(Point(1) == Point(2))
             print(Point(1) == Other(1))
             val xs := [1]
             print(xs == xs)
             print(xs == [1])
         }",
    )
    .success()
    .stdout("1\n0\n1\n0\n");
}

#[test]
fn counting_loop_includes_its_end() {
    run_program("fn main() { for i := 1 to 3 { print(i) } }")
        .success()
        .stdout("1\n2\n3\n");
}

#[test]
fn continue_still_advances_counting_loop() {
    run_program(
        "fn main() {
             for i := 1 to 5 {
                 if i == 3 { continue }
                 if i == 5 { break }
                 print(i)
             }
         }",
    )
    .success()
    .stdout("1\n2\n4\n");
}

#[test]
fn multiplication_at_the_boundary_succeeds() {
    run_program("fn main() { print(2147483647 * 1) print(46340 * 46340) }")
        .success()
        .stdout("2147483647\n2147395600\n");
}

#[test]
fn multiplication_past_the_boundary_halts() {
    run_program("fn main() { print(46341 * 46341) }")
        .failure()
        .stderr(predicate::str::contains("[PANIC] Overflow"));
}

#[test]
fn array_index_bounds() {
    run_program(
        "fn main() {
             val xs := [1, 2, 3]
             print(xs[len(xs) - 1])
             print(xs[len(xs)])
         }",
    )
    .failure()
    .stdout("3\n")
    .stderr(predicate::str::contains("[PANIC] Index out of bounds"));
}

#[test]
fn map_miss_prints_null() {
    run_program(
        "fn main() {
             val m := {a: 1}
             print(m[\"b\"])
             print(m[\"a\"])
             print(m)
         }",
    )
    .success()
    .stdout("null\n1\n{a: 1}\n");
}

#[test]
fn escaped_map_keys_read_back() {
    run_program(
        r#"fn main() {
             val m := {"a\"b": 1, "x\ny": 2}
             print(m["a\"b"])
             print(m["x\ny"])
         }"#,
    )
    .success()
    .stdout("1\n2\n");
}

#[test]
fn nested_index_assignment_writes_through() {
    run_program(
        "struct Bag { items }
         fn main() {
             val grid := [[0, 0], [0, 0]]
             grid[1][0] := 7
             print(grid)
             val b := Bag([1, 2])
             b.items[1] := 9
             print(b.items)
         }",
    )
    .success()
    .stdout("[[0, 0], [7, 0]]\n[1, 9]\n");
}

#[test]
fn addition_concatenates() {
    run_program("fn main() { print(1 + 2) print(\"a\" + 1) print([1, \"b\"]) }")
        .success()
        .stdout("12\na1\n[1, b]\n");
}

#[test]
fn switch_and_while() {
    run_program(
        "fn main() {
             var i := 0
             while i < 3 {
                 switch (i) {
                     case 0: { print(\"zero\") }
                     case 1: { print(\"one\") }
                 }
                 i := i - (0 - 1)
             }
             print(i)
         }",
    )
    .success()
    .stdout("zero\none\n3\n");
}

#[test]
fn functions_may_be_called_before_their_definition() {
    run_program(
        "fn main() { print(later(2)) }
         fn later(x) { return x * 10 }",
    )
    .success()
    .stdout("20\n");
}

#[test]
fn invalid_number_halts() {
    run_program("fn main() { print(to_int(\" 42x\")) print(to_int(\"abc\")) }")
        .failure()
        .stdout("42\n")
        .stderr(predicate::str::contains("[PANIC] Invalid number: \"abc\""));
}

#[test]
fn missing_initializer_is_fatal() {
    let dir = tempdir().expect("tempdir");
    let output_path = dir.path().join("out.rs");

    mhs()
        .arg("--output")
        .arg(&output_path)
        .write_stdin("fn main() { val x 5 }")
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("[MHS ERROR] Expected ':=' after 'x'"));

    assert!(!output_path.exists());
}

#[test]
fn emits_tokens_and_ast() {
    let dir = tempdir().expect("tempdir");
    let tokens_path = dir.path().join("tokens.txt");
    let ast_path = dir.path().join("ast.txt");

    mhs()
        .args(["--emit", "tokens", "--output"])
        .arg(&tokens_path)
        .write_stdin("val x := 1")
        .assert()
        .success();
    let tokens = fs::read_to_string(&tokens_path).expect("tokens written");
    assert!(tokens.starts_with("Val val\nIdent x\n"));

    mhs()
        .args(["--emit", "ast", "--output"])
        .arg(&ast_path)
        .write_stdin("struct P { x }")
        .assert()
        .success();
    let ast = fs::read_to_string(&ast_path).expect("ast written");
    assert!(ast.contains("StructDecl"));
}

#[test]
fn rejects_unknown_format() {
    let dir = tempdir().expect("tempdir");
    mhs()
        .args(["--emit", "wasm", "--output"])
        .arg(dir.path().join("out"))
        .write_stdin("fn main() { }")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported emit format: wasm"));
}
