use safescript_parse::parse_source;

#[test]
fn full_program_parses() {
    let src = r#"
// counters and aliases
let count: mutable = 0
const limit = 10

function bump(c: mutable, step: const = 1): const {
    c = c + step
    return c
}

class Counter {
    let value: mutable = 0
    function reset(self: mutable) {
        self.value = 0
    }
}

while count < limit {
    if count % 2 == 0 {
        bump(&count)
    } else if count > 5 {
        break
    } else {
        continue
    }
}

let view &- count
let data = { items: [1, 2, 3], label: 'numbers' }
console.log(typeof data.items[0], -count, count++, !true ? 1 : 2)
"#;
    parse_source(src).expect("program should parse");
}

#[test]
fn multi_line_argument_lists_parse() {
    let src = "f(\n    a,\n    &b,\n)\n";
    parse_source(src).expect("multi-line call should parse");
}

#[test]
fn missing_closing_brace_is_reported() {
    let src = "function f() {\n    let a = 1\n";
    let err = parse_source(src).expect_err("expected parse error");
    let msg = err.to_string();
    assert!(
        msg.contains("unterminated brace block"),
        "unexpected error message: {msg}"
    );
}

#[test]
fn mutability_qualifier_is_required_after_colon() {
    let err = parse_source("let x: number = 1\n").expect_err("expected parse error");
    let msg = err.to_string();
    assert!(
        msg.contains("mutability qualifier"),
        "unexpected error message: {msg}"
    );
}

#[test]
fn lex_errors_surface_through_parse_source() {
    let err = parse_source("let s = 'open\n").expect_err("expected lex error");
    let msg = err.to_string();
    assert!(msg.contains("lex error"), "unexpected error message: {msg}");
}
