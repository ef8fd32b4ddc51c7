use proptest::prelude::*;
use safescript_sema::{AnalysisOptions, Context, analyze, pipeline};

fn name() -> impl Strategy<Value = &'static str> + Clone {
    prop::sample::select(vec!["a", "b", "c"])
}

fn qualifier() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just(""), Just(": mutable"), Just(": const")]
}

/// Statements over three variables and one two-parameter function, nested
/// in blocks. Duplicate declarations and unbound names are generated on
/// purpose, as is reassigning `f`.
fn stmt() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        (name(), qualifier()).prop_map(|(v, q)| format!("let {v}{q} = 0")),
        (name(), qualifier()).prop_map(|(v, q)| format!("let {v}{q}")),
        (name(), qualifier(), name()).prop_map(|(v, q, w)| format!("let {v}{q} &- {w}")),
        (name(), name()).prop_map(|(v, w)| format!("{v} = {w}")),
        (name(), name()).prop_map(|(v, w)| format!("{v} &- {w}")),
        (name(), name()).prop_map(|(v, w)| format!("f(&{v}, {w})")),
        (name(), name()).prop_map(|(v, w)| format!("f(&{v}, &{w})")),
        name().prop_map(|v| format!("console.log(&{v})")),
        name().prop_map(|v| format!("f = {v}")),
        (name(), name()).prop_map(|(v, w)| format!("{v}.k = {w}")),
    ];
    leaf.prop_recursive(3, 32, 4, |inner| {
        prop::collection::vec(inner, 1..4).prop_map(|body| format!("{{\n{}\n}}", body.join("\n")))
    })
}

fn program() -> impl Strategy<Value = String> {
    prop::collection::vec(stmt(), 0..10).prop_map(|body| {
        format!(
            "function f(p: mutable, q) {{}}\n{}\n",
            body.join("\n")
        )
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn rerunning_a_pass_reports_the_same_errors(src in program()) {
        let module = safescript_parse::parse_source(&src).expect("parse");
        let mut ctx = Context::new();
        for mut pass in pipeline(&AnalysisOptions::default()) {
            let first = pass.run(&module, &mut ctx).expect("structural");
            let second = pass.run(&module, &mut ctx).expect("structural");
            prop_assert_eq!(first, second, "pass `{}` on:\n{}", pass.name(), src);
        }
    }

    #[test]
    fn analysis_outcome_is_deterministic(src in program()) {
        let module = safescript_parse::parse_source(&src).expect("parse");
        let first = format!("{:?}", analyze(&module, &mut Context::new()));
        let second = format!("{:?}", analyze(&module, &mut Context::new()));
        prop_assert_eq!(first, second);
    }
}
