use std::fs;
use std::path::Path;

use termassign::parser::{parse_problem, LoadError, DEFAULT_TITLE, MISSING_STEP_STATEMENT};
use termassign::source::read_document;

fn fixture(name: &str) -> String {
    fs::read_to_string(format!("fixtures/{}", name)).expect("Cannot read fixture")
}

#[test]
fn test_parse_two_steps() {
    let problem = parse_problem(&fixture("two_steps.xml")).unwrap();

    assert_eq!(problem.title, "T");
    assert_eq!(problem.statement, "S");
    assert_eq!(problem.step_count(), 2);
    assert_eq!(problem.steps[0].index, 1);
    assert_eq!(problem.steps[0].statement, "A");
    assert_eq!(problem.steps[1].index, 2);
    assert_eq!(problem.steps[1].statement, "B");
    assert_eq!(problem.step(2).map(|s| s.statement.as_str()), Some("B"));
    assert!(problem.step(0).is_none());
    assert!(problem.step(3).is_none());
}

#[test]
fn test_parse_projectile_document() {
    let problem = parse_problem(&fixture("projectile.xml")).unwrap();

    assert_eq!(problem.title, "Projectile on an incline");
    // Character references are decoded, other text is kept as written
    assert!(problem.statement.starts_with("A ball is launched with speed *v* at angle θ"));
    assert!(problem.statement.contains("slope of angle α."));
    assert!(problem.statement.ends_with("θ and α."));

    let statements: Vec<&str> = problem.steps.iter().map(|s| s.statement.as_str()).collect();
    assert_eq!(
        statements,
        vec![
            "Write the time of flight.",
            "Find the range R along the slope (use x & y axes along it).",
            MISSING_STEP_STATEMENT,
            "Which launch angle maximises R?",
        ]
    );
    let indices: Vec<usize> = problem.steps.iter().map(|s| s.index).collect();
    assert_eq!(indices, vec![1, 2, 3, 4]);
}

#[test]
fn test_missing_parts_use_defaults() {
    let problem = parse_problem("<Problem/>").unwrap();
    assert_eq!(problem.title, DEFAULT_TITLE);
    assert_eq!(problem.statement, "");
    assert!(problem.steps.is_empty());

    let problem = parse_problem("<Problem><Title>   </Title><Steps/></Problem>").unwrap();
    assert_eq!(problem.title, DEFAULT_TITLE);
    assert_eq!(problem.step_count(), 0);
}

#[test]
fn test_step_statement_is_not_the_problem_statement() {
    let doc = "<Problem><Steps><ProblemStep><Statement>A</Statement></ProblemStep></Steps></Problem>";
    let problem = parse_problem(doc).unwrap();

    assert_eq!(problem.statement, "");
    assert_eq!(problem.steps[0].statement, "A");
}

#[test]
fn test_first_title_wins_and_other_elements_are_ignored() {
    let doc = r#"<Problem>
        <Meta author="x"/>
        <Title>First</Title>
        <Title>Second</Title>
        <Steps>
            <ProblemStep><Statement>one</Statement></ProblemStep>
            <Hint>not a step</Hint>
            <ProblemStep><Statement>two</Statement></ProblemStep>
        </Steps>
    </Problem>"#;
    let problem = parse_problem(doc).unwrap();

    assert_eq!(problem.title, "First");
    assert_eq!(problem.step_count(), 2);
    assert_eq!(problem.steps[1].index, 2);
    assert_eq!(problem.steps[1].statement, "two");
}

#[test]
fn test_wrong_root_is_schema_error() {
    let err = parse_problem(&fixture("not_a_problem.xml")).unwrap_err();
    assert_eq!(
        err,
        LoadError::WrongSchema {
            found: "Worksheet".to_string()
        }
    );
}

#[test]
fn test_malformed_documents() {
    let err = parse_problem(&fixture("malformed.xml")).unwrap_err();
    assert!(matches!(err, LoadError::Malformed(_)), "got {:?}", err);

    for doc in [
        "",
        "   ",
        "<Problem><Title>T</Title>",
        "<Problem/><Problem/>",
        "stray text <Problem/>",
    ] {
        assert!(
            matches!(parse_problem(doc), Err(LoadError::Malformed(_))),
            "expected malformed for {:?}",
            doc
        );
    }
}

#[test]
fn test_read_error_names_the_path() {
    let err = read_document(Path::new("fixtures/does_not_exist.xml")).unwrap_err();
    match err {
        LoadError::Read { path, .. } => assert!(path.ends_with("does_not_exist.xml")),
        other => panic!("expected read error, got {:?}", other),
    }
}
