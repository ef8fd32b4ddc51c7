use safescript_parse::{format_expr, format_module, parse_expr, parse_source};

#[test]
fn format_is_canonical_and_stable() {
    let src = r#"let x:mutable=0;const y &- x
function f(a:mutable,b=2){
if a>b{return a}else if a==b{return}else{x=a}
}
class Point {
let x = 0
}
"#;
    let module = parse_source(src).expect("parse");
    let formatted = format_module(&module);
    let expected = r#"let x: mutable = 0
const y: const &- x
function f(a: mutable, b: const = 2): const {
    if a > b {
        return a
    } else if a == b {
        return
    } else {
        x = a
    }
}
class Point {
    let x: const = 0
}
"#;
    assert_eq!(formatted, expected);

    let reparsed = parse_source(&formatted).expect("formatted output should parse");
    assert_eq!(format_module(&reparsed), formatted);
}

#[test]
fn format_expr_keeps_parentheses_and_references() {
    let expr = parse_expr("f(&a, (b + c) * 2, { k: \"v\\n\" }, [typeof d])").expect("parse");
    assert_eq!(
        format_expr(&expr),
        "f(&a, (b + c) * 2, { k: \"v\\n\" }, [typeof d])"
    );
}
