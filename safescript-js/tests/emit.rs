use safescript_js::{DEEPCOPY_FN, EmitOptions, emit_module};
use safescript_parse::parse_source;

fn lower(src: &str) -> String {
    let module = parse_source(src).expect("parse");
    emit_module(&module, &EmitOptions { preamble: false })
}

#[test]
fn functions_and_control_flow() {
    let src = r#"
function clamp(v: mutable, lo, hi) {
    if v < lo {
        v = lo
    } else if v > hi {
        v = hi
    } else {
        return v
    }
    return v
}
"#;
    let expected = r#"function clamp(v, lo, hi) {
    if (v < lo) {
        v = __ssdeepcopy(lo);
    } else if (v > hi) {
        v = __ssdeepcopy(hi);
    } else {
        return v;
    }
    return v;
}
"#;
    assert_eq!(lower(src), expected);
}

#[test]
fn classes_lower_to_fields_and_methods() {
    let src = r#"
class Counter {
    let value: mutable = 0
    function bump(self: mutable, by = 1) {
        self.value = self.value + by
    }
}
"#;
    let expected = r#"class Counter {
    value = __ssdeepcopy(0);
    bump(self, by = __ssdeepcopy(1)) {
        self.value = __ssdeepcopy(self.value + by);
    }
}
"#;
    assert_eq!(lower(src), expected);
}

#[test]
fn loops_and_object_literals() {
    let src = r#"
let items: mutable = [1, 2]
let view &- items
let box = { inner: items, label: "a\"b" }
while true {
    break
}
"#;
    let out = lower(src);
    assert!(out.contains("let view = (items);"), "got:\n{out}");
    assert!(
        out.contains(r#"let box = __ssdeepcopy(({inner: items, label: "a\"b"}));"#),
        "got:\n{out}"
    );
    assert!(out.contains("while (true) {\n    break;\n}"), "got:\n{out}");
}

#[test]
fn preamble_defines_the_copy_helper() {
    let module = parse_source("let a = { b: [1] }\n").expect("parse");
    let out = emit_module(&module, &EmitOptions::default());
    let definition = format!("function {DEEPCOPY_FN}(");
    assert_eq!(out.matches(&definition).count(), 1);
    assert!(out.find(&definition) < out.find("let a"));
}
