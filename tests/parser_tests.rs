use replf::error::SyntaxError;
use replf::parser::{parse, ParseOutcome, ResolutionMode};

const UNTERMINATED: &[&str] = &[
    "foo(",
    "val x = (",
    "List(1, 2",
    "{ 1",
    "def f(a: Int) = {\n  a +",
    "xs(0",
    "\"abc",
    "\"\"\"multi\nline",
    "/* still open",
    "if (a) { b } else {",
];

const VIOLATIONS: &[&str] = &["1+", "1)", "val = 3", "if 1", "foo(1))", "1 2"];

#[test]
fn test_parse_is_pure() {
    let inputs = UNTERMINATED.iter().chain(VIOLATIONS).chain(&["1+1", "val a = 1; a"]);
    for mode in [
        ResolutionMode::Probing,
        ResolutionMode::Completing,
        ResolutionMode::Committing,
    ] {
        for input in inputs.clone() {
            assert_eq!(parse(input, mode), parse(input, mode), "input {input:?}");
        }
    }
}

#[test]
fn test_unterminated_input_is_incomplete_while_probing() {
    for input in UNTERMINATED {
        assert_eq!(
            parse(input, ResolutionMode::Probing),
            ParseOutcome::Incomplete,
            "input {input:?}"
        );
    }
}

#[test]
fn test_unterminated_input_reports_missing_delimiter_on_commit() {
    for input in UNTERMINATED {
        assert_eq!(
            parse(input, ResolutionMode::Committing),
            ParseOutcome::Failure(SyntaxError::MissingDelimiter {
                position: input.len()
            }),
            "input {input:?}"
        );
    }
}

#[test]
fn test_unterminated_input_degrades_to_empty_complete_for_completion() {
    for input in UNTERMINATED {
        match parse(input, ResolutionMode::Completing) {
            ParseOutcome::Complete {
                words, active_word, ..
            } => {
                assert!(words.is_empty(), "input {input:?}");
                assert!(active_word.is_none(), "input {input:?}");
            }
            other => panic!("input {input:?} gave {other:?}"),
        }
    }
}

#[test]
fn test_violations_fail_stably_on_commit() {
    for input in VIOLATIONS {
        let first = parse(input, ResolutionMode::Committing);
        let ParseOutcome::Failure(err) = &first else {
            panic!("input {input:?} gave {first:?}");
        };
        assert!(!err.is_missing_delimiter(), "input {input:?}");
        assert!(err.message().starts_with("Syntax error at"), "{err}");
        assert_eq!(first, parse(input, ResolutionMode::Committing));
        assert_eq!(
            parse(input, ResolutionMode::Probing),
            ParseOutcome::Incomplete,
            "input {input:?}"
        );
    }
}

#[test]
fn test_trailing_operator_message_and_position() {
    let ParseOutcome::Failure(err) = parse("1+", ResolutionMode::Committing) else {
        panic!("expected failure");
    };
    assert_eq!(err.position(), 2);
    assert_eq!(
        err.message(),
        "Syntax error at 1:3: expected expression, found end of input"
    );
}

#[test]
fn test_complete_words_are_top_level_statements() {
    let outcome = parse("val a = 1; a + 1\ndef f(x: Int) = x", ResolutionMode::Committing);
    let words: Vec<&str> = outcome.words().iter().map(|w| w.text.as_str()).collect();
    assert_eq!(words, vec!["val a = 1", "a + 1", "def f(x: Int) = x"]);
    assert_eq!(
        outcome.active_word().map(|active| active.word.as_str()),
        Some("def f(x: Int) = x")
    );
}

#[test]
fn test_deeply_nested_input_never_aborts() {
    for depth in [1_000, 8_000, 50_000] {
        let open = "(".repeat(depth);
        assert_eq!(
            parse(&open, ResolutionMode::Probing),
            ParseOutcome::Incomplete,
            "depth {depth}"
        );
        let ParseOutcome::Failure(err) = parse(&open, ResolutionMode::Committing) else {
            panic!("depth {depth} should fail on commit");
        };
        assert!(err.message().contains("shallower nesting"), "{err}");
    }

    let blocks = "{".repeat(10_000);
    assert_eq!(parse(&blocks, ResolutionMode::Probing), ParseOutcome::Incomplete);
    assert!(matches!(
        parse(&blocks, ResolutionMode::Completing),
        ParseOutcome::Incomplete | ParseOutcome::Complete { .. }
    ));
}
