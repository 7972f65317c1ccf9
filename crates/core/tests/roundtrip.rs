//! End-to-end codec contract: the parse/print identities in both
//! directions, argument-shape normalization, the JSON wire shape, and
//! the error taxonomy.

use pollex_core::{parse, print, Arg, Args, Expr, SyntaxError, MAX_DEPTH};

/// Parses canonical text and checks it prints back unchanged.
fn assert_canonical(text: &str) -> Expr {
    let expr = parse(text).unwrap_or_else(|err| panic!("parse {text:?} failed: {err}"));
    assert_eq!(print(&expr), text, "canonical text must print back unchanged");
    expr
}

// ── Text round trip ──────────────────────────────────────────────────

#[test]
fn canonical_text_survives_parse_then_print() {
    for text in [
        "$now()",
        "$age<number>()",
        "$not($flag())",
        "$if($gt($score(), 50), \"pass\", \"fail\")",
        "$and($or($a(), $b()), $not($c()), 1)",
        r#"$fmt<string>("a\\b", "q\"q", 0.5)"#,
        "$sum(0, -1, 2.5, 1000)",
        "$f(0.30000000000000004)",
        "$f<>()",
    ] {
        assert_canonical(text);
    }
}

#[test]
fn trees_survive_print_then_parse() {
    let trees = [
        Expr::call("now"),
        Expr::call("flag").with_dtype("boolean"),
        Expr::call("not").with_args([Expr::call("flag")]),
        Expr::call("if").with_args([
            Arg::from(Expr::call("gt").with_args([Arg::from(Expr::call("score")), Arg::Num(50.0)])),
            Arg::from("pass"),
            Arg::from("fail"),
        ]),
        Expr::call("say").with_args(["quote \" backslash \\ comma, paren )"]),
        Expr::call("sum").with_args([0.0, -1.5, 12345.0]),
    ];
    for expr in trees {
        let text = print(&expr);
        assert_eq!(
            parse(&text).as_ref(),
            Ok(&expr),
            "print produced {text:?} which did not parse back"
        );
    }
}

#[test]
fn deeply_nested_trees_round_trip() {
    let mut expr = Expr::call("leaf");
    for _ in 0..40 {
        expr = Expr::call("wrap").with_args([expr]);
    }
    let text = print(&expr);
    assert_eq!(parse(&text).unwrap(), expr);
}

#[test]
fn quoted_content_is_opaque_to_splitting() {
    let expr = parse(r#"$f("a,b(c)d")"#).unwrap();
    assert_eq!(expr.name, "f");
    assert_eq!(expr.data, Some(Args::One(Arg::Str("a,b(c)d".to_owned()))));
}

#[test]
fn mixed_nesting_with_type_tags_decomposes_fully() {
    let text = "$or<boolean>(10, \"no sense value here\", \
                 $eq(\"valuehere\", $getAttribute<string>(\
                 $getResponse(\"s1.q1.g3.q1\"), \"testAttribute\")))";
    let expr = assert_canonical(text);

    assert_eq!(expr.name, "or");
    assert_eq!(expr.dtype.as_deref(), Some("boolean"));
    let Some(Args::Many(ref args)) = expr.data else {
        panic!("expected three arguments, got {:?}", expr.data);
    };
    assert_eq!(args[0], Arg::Num(10.0));
    assert_eq!(args[1], Arg::Str("no sense value here".to_owned()));

    let eq = args[2].as_call().unwrap();
    assert_eq!(eq.name, "eq");
    let Some(Args::Many(ref eq_args)) = eq.data else {
        panic!("expected two arguments, got {:?}", eq.data);
    };
    assert_eq!(eq_args[0], Arg::Str("valuehere".to_owned()));

    let get_attribute = eq_args[1].as_call().unwrap();
    assert_eq!(get_attribute.name, "getAttribute");
    assert_eq!(get_attribute.dtype.as_deref(), Some("string"));
    let Some(Args::Many(ref attr_args)) = get_attribute.data else {
        panic!("expected two arguments, got {:?}", get_attribute.data);
    };
    let get_response = attr_args[0].as_call().unwrap();
    assert_eq!(get_response.name, "getResponse");
    assert_eq!(get_response.dtype, None);
    assert_eq!(
        get_response.data,
        Some(Args::One(Arg::Str("s1.q1.g3.q1".to_owned())))
    );
    assert_eq!(attr_args[1], Arg::Str("testAttribute".to_owned()));
}

#[test]
fn argument_order_is_preserved_across_kinds() {
    let expr = parse("$mix(1, \"two\", $three(), 4)").unwrap();
    let Some(Args::Many(ref args)) = expr.data else {
        panic!("expected four arguments, got {:?}", expr.data);
    };
    assert_eq!(args[0], Arg::Num(1.0));
    assert_eq!(args[1].as_str(), Some("two"));
    assert_eq!(args[2].as_call().map(|e| e.name.as_str()), Some("three"));
    assert_eq!(args[3], Arg::Num(4.0));
    assert_eq!(print(&expr), "$mix(1, \"two\", $three(), 4)");
}

// ── Normalization ────────────────────────────────────────────────────

#[test]
fn printing_canonicalizes_whitespace_and_parens() {
    for (source, canonical) in [
        ("  $now()  ", "$now()"),
        ("$now", "$now()"),
        ("$flag<boolean>", "$flag<boolean>()"),
        ("$now(   )", "$now()"),
        ("$f( 1 ,  2 , $g( ) )", "$f(1, 2, $g())"),
        ("$f(1e3)", "$f(1000)"),
        ("$f(7.0)", "$f(7)"),
    ] {
        let expr = parse(source).unwrap();
        assert_eq!(print(&expr), canonical);
        // Once canonical, always canonical.
        assert_canonical(canonical);
    }
}

#[test]
fn argument_shapes_collapse_by_count() {
    assert_eq!(parse("$f()").unwrap().data, None);
    assert_eq!(
        parse("$f(1)").unwrap().data,
        Some(Args::One(Arg::Num(1.0)))
    );
    assert_eq!(
        parse("$f(1, 2)").unwrap().data,
        Some(Args::Many(vec![Arg::Num(1.0), Arg::Num(2.0)]))
    );
}

// ── JSON wire shape ──────────────────────────────────────────────────

#[test]
fn json_shape_omits_absent_fields_and_unwraps_single_arguments() {
    let expr = parse(r#"$eq($q1(), "yes")"#).unwrap();
    assert_eq!(
        serde_json::to_value(&expr).unwrap(),
        serde_json::json!({
            "name": "eq",
            "data": [ { "name": "q1" }, "yes" ]
        })
    );

    let single = parse("$not($flag())").unwrap();
    assert_eq!(
        serde_json::to_value(&single).unwrap(),
        serde_json::json!({
            "name": "not",
            "data": { "name": "flag" }
        })
    );

    let typed = parse("$answer<number>(7)").unwrap();
    assert_eq!(
        serde_json::to_value(&typed).unwrap(),
        serde_json::json!({
            "name": "answer",
            "dtype": "number",
            "data": 7.0
        })
    );
}

#[test]
fn trees_survive_a_json_round_trip() {
    for text in [
        "$now()",
        "$answer<number>(7)",
        "$if($gt($score(), 50), \"pass\", \"fail\")",
        r#"$fmt<string>("a\\b", "q\"q", 0.5)"#,
    ] {
        let expr = parse(text).unwrap();
        let json = serde_json::to_string(&expr).unwrap();
        let back: Expr = serde_json::from_str(&json).unwrap();
        assert_eq!(back, expr);
        assert_eq!(print(&back), text);
    }
}

#[test]
fn json_input_in_list_form_is_normalized() {
    // Writers that always emit an array are accepted; the shapes
    // collapse on the way in.
    let one: Expr = serde_json::from_str(r#"{"name":"not","data":[{"name":"flag"}]}"#).unwrap();
    assert_eq!(
        one.data,
        Some(Args::One(Arg::Call(Box::new(Expr::call("flag")))))
    );

    let none: Expr = serde_json::from_str(r#"{"name":"now","data":[]}"#).unwrap();
    assert_eq!(none.data, None);
}

// ── Error taxonomy ───────────────────────────────────────────────────

#[test]
fn each_rejection_reports_its_kind() {
    for (text, kind) in [
        ("", "EmptyInput"),
        ("   ", "EmptyInput"),
        ("now()", "MissingPrefix"),
        ("no-dollar(1)", "MissingPrefix"),
        ("$", "MalformedName"),
        ("$9lives()", "MalformedName"),
        ("$two words()", "MalformedName"),
        ("$f<number(1)", "MalformedTypeAnnotation"),
        ("$f<number", "MalformedTypeAnnotation"),
        ("$f>x()", "MalformedTypeAnnotation"),
        ("$f<n>x(1)", "MalformedTypeAnnotation"),
        ("$f(1", "UnbalancedParens"),
        ("$f(1))", "UnbalancedParens"),
        ("$f)", "UnbalancedParens"),
        ("$f(1) junk", "TrailingInput"),
        ("$f(\"a\" b)", "TrailingInput"),
        ("$f(\"abc)", "UnterminatedString"),
        ("$f(abc)", "MalformedNumber"),
        ("$f(1,,2)", "MalformedNumber"),
        ("$f(inf)", "MalformedNumber"),
    ] {
        let err = parse(text).unwrap_err();
        assert_eq!(
            err.root_cause().kind(),
            kind,
            "wrong rejection for {text:?}: {err}"
        );
    }
}

#[test]
fn nested_failures_carry_the_argument_path() {
    let err = parse(r#"$and($eq($q1(), "yes"), $gt($q2(), oops))"#).unwrap_err();
    let SyntaxError::Nested { call, index, source } = &err else {
        panic!("expected a nested error, got {err:?}");
    };
    assert_eq!(call, "and");
    assert_eq!(*index, 2);
    let SyntaxError::Nested { call, index, .. } = source.as_ref() else {
        panic!("expected a second nesting level, got {source:?}");
    };
    assert_eq!(call, "gt");
    assert_eq!(*index, 2);
    assert_eq!(
        err.root_cause(),
        &SyntaxError::MalformedNumber("oops".to_owned())
    );
}

#[test]
fn runaway_nesting_is_cut_off() {
    let mut text = String::new();
    for _ in 0..MAX_DEPTH + 8 {
        text.push_str("$f(");
    }
    text.push('1');
    for _ in 0..MAX_DEPTH + 8 {
        text.push(')');
    }
    assert_eq!(
        parse(&text).unwrap_err().root_cause(),
        &SyntaxError::TooDeep(MAX_DEPTH)
    );
}
