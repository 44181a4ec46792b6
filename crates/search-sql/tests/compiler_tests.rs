//! Condition compiler tests across both dialects.

mod common;

use common::*;
use reposearch_sql::{
    compiler_for, CompileError, ConditionCompiler, Dialect, Expression, H2ConditionCompiler,
    Operand, PostgresConditionCompiler, SearchField, SqlSearchQueryCondition, Term,
    ValidationIssue,
};

const NS: &str = "filterParams";

fn pg(expression: &Expression) -> SqlSearchQueryCondition {
    PostgresConditionCompiler::new(NS).build(expression).unwrap()
}

fn h2(expression: &Expression) -> SqlSearchQueryCondition {
    H2ConditionCompiler::new(NS).build(expression).unwrap()
}

fn pred(field: SearchField, operand: Operand, term: Term) -> Expression {
    Expression::predicate(field, operand, term)
}

/// A tree touching every path: exact, tsquery, LIKE shortcut, IN, regex, null.
fn mixed_tree() -> Expression {
    Expression::and(vec![
        pred(SearchField::Format, Operand::Eq, Term::exact("maven2")),
        Expression::or(vec![
            pred(SearchField::Namespace, Operand::Eq, Term::lenient("org.apache")),
            pred(SearchField::Version, Operand::Eq, Term::wildcard("1.2.3*", true)),
            pred(SearchField::Namespace, Operand::NotEq, Term::Null),
        ])
        .unwrap(),
        pred(
            SearchField::Repository,
            Operand::In,
            Term::exact_values(["central", "releases"]),
        ),
        pred(
            SearchField::Keywords,
            Operand::Any,
            Term::collection(vec![Term::wildcard("log*", true), Term::wildcard("io.ut*", true)])
                .unwrap(),
        ),
        pred(SearchField::Paths, Operand::Regex, Term::exact("^/org/.*")),
        pred(SearchField::Name, Operand::NotEq, Term::exact("guava")),
    ])
    .unwrap()
}

#[test]
fn test_every_placeholder_is_bound_exactly_once() {
    for dialect in [Dialect::Postgres, Dialect::H2] {
        let condition = compiler_for(dialect, NS).build(&mixed_tree()).unwrap();
        assert!(!condition.is_empty());
        assert_parameters_bound(&condition);
        assert_namespace(&condition, NS);
    }
}

#[test]
fn test_single_child_clause_compiles_like_its_child() {
    let child = pred(SearchField::Namespace, Operand::Eq, Term::lenient("org.apache"));
    let wrapped = Expression::and(vec![child.clone()]).unwrap();
    assert_eq!(pg(&wrapped), pg(&child));
    assert_eq!(h2(&wrapped), h2(&child));

    let nested = Expression::or(vec![Expression::and(vec![child.clone()]).unwrap()]).unwrap();
    assert_eq!(pg(&nested).sql_text, pg(&child).sql_text);
}

#[test]
fn test_h2_wildcard_is_wrapped_in_percent() {
    let condition = h2(&pred(SearchField::Name, Operand::Eq, Term::wildcard("foo*", false)));
    let values: Vec<&String> = condition.parameters.values().collect();
    assert_eq!(values, vec!["%foo%"]);
}

#[test]
fn test_interior_wildcard_per_dialect() {
    let expression = pred(SearchField::Name, Operand::Eq, Term::wildcard("foo*bar", false));
    assert_eq!(
        pg(&expression).parameter("tsvector_search_component_name0"),
        Some("'foobar':*")
    );
    assert_eq!(
        h2(&expression).parameter("search_component_name0"),
        Some("%foo%bar%")
    );
}

#[test]
fn test_postgres_single_exact_term_uses_exact_column() {
    let condition = pg(&pred(
        SearchField::Namespace,
        Operand::Eq,
        Term::exact("org.apache.tomcat"),
    ));
    assert_eq!(condition.sql_text, "namespace = #{filterParams.namespace0}");
    assert_eq!(condition.parameter("namespace0"), Some("org.apache.tomcat"));
    assert!(!condition.sql_text.contains("tsquery"));
}

#[test]
fn test_postgres_lenient_adds_token_phrase() {
    let condition = pg(&pred(
        SearchField::Namespace,
        Operand::Eq,
        Term::lenient("org.apache.tomcat"),
    ));
    assert_eq!(
        condition.sql_text,
        "tsvector_namespace @@ (#{filterParams.tsvector_namespace0}::tsquery || #{filterParams.tsvector_namespace1}::tsquery)"
    );
    assert_eq!(
        condition.parameter("tsvector_namespace0"),
        Some("'org.apache.tomcat'")
    );
    assert_eq!(
        condition.parameter("tsvector_namespace1"),
        Some("'org' <-> 'apache' <-> 'tomcat'")
    );
}

#[test]
fn test_postgres_wildcard_tokenized_prefix() {
    let condition = pg(&pred(
        SearchField::Keywords,
        Operand::Eq,
        Term::wildcard("Apache-Comm*", true),
    ));
    assert_eq!(
        condition.parameter("tsvector_keywords0"),
        Some("'apache-comm':*")
    );
    assert_eq!(
        condition.parameter("tsvector_keywords1"),
        Some("'apache' <-> 'comm':*")
    );
}

#[test]
fn test_clause_joins_and_parenthesizes() {
    let expression = Expression::or(vec![
        pred(SearchField::Format, Operand::Eq, Term::exact("npm")),
        pred(SearchField::Format, Operand::Eq, Term::exact("pypi")),
    ])
    .unwrap();
    assert_eq!(
        pg(&expression).sql_text,
        "(format = #{filterParams.format0} OR format = #{filterParams.format1})"
    );
}

#[test]
fn test_blank_predicates_drop_out() {
    let expression = Expression::and(vec![
        pred(SearchField::Name, Operand::Eq, Term::exact("   ")),
        pred(SearchField::Version, Operand::Eq, Term::wildcard("*", true)),
    ])
    .unwrap();
    let condition = pg(&expression);
    assert!(condition.is_empty());
    assert!(condition.parameters.is_empty());

    let expression = Expression::and(vec![
        pred(SearchField::Name, Operand::Eq, Term::exact("")),
        pred(SearchField::Format, Operand::Eq, Term::exact("npm")),
    ])
    .unwrap();
    assert_eq!(pg(&expression).sql_text, "(format = #{filterParams.format0})");
}

#[test]
fn test_blank_members_of_collection_are_ignored() {
    let condition = pg(&pred(
        SearchField::Repository,
        Operand::In,
        Term::exact_values(["a", " ", "b"]),
    ));
    assert_eq!(condition.parameters.len(), 2);
    assert_parameters_bound(&condition);
}

#[test]
fn test_validation_issues_are_aggregated() {
    let expression = Expression::and(vec![
        pred(
            SearchField::Name,
            Operand::Eq,
            Term::exact_values(["a", "b"]),
        ),
        pred(SearchField::Sha1, Operand::Any, Term::exact_values(["x", "y"])),
        pred(SearchField::Paths, Operand::Regex, Term::Null),
        pred(SearchField::Format, Operand::Eq, Term::exact("fine")),
    ])
    .unwrap();

    for dialect in [Dialect::Postgres, Dialect::H2] {
        let err = compiler_for(dialect, NS).build(&expression).unwrap_err();
        match err {
            CompileError::Validation { issues } => {
                assert_eq!(issues.len(), 3, "{:?}", issues);
                assert!(matches!(issues[0], ValidationIssue::Arity { terms: 2, .. }));
                assert!(matches!(
                    issues[1],
                    ValidationIssue::UnsupportedOperand {
                        field: SearchField::Sha1,
                        ..
                    }
                ));
                assert!(matches!(
                    issues[2],
                    ValidationIssue::NullTermNotAllowed {
                        operand: Operand::Regex,
                        ..
                    }
                ));
            }
        }
    }
}

#[test]
fn test_in_rejects_null_member() {
    let term = Term::collection(vec![Term::Null]).unwrap();
    let err = PostgresConditionCompiler::new(NS)
        .build(&pred(SearchField::Format, Operand::In, term))
        .unwrap_err();
    assert!(err.to_string().contains("cannot match a null term"));
}

#[test]
fn test_unknown_column_is_dropped_not_an_error() {
    let condition = h2(&pred(
        SearchField::UploaderIps,
        Operand::Eq,
        Term::exact("10.0.0.1"),
    ));
    assert!(condition.is_empty());
}

#[test]
fn test_dialects_render_regex_differently() {
    let expression = pred(SearchField::Paths, Operand::Regex, Term::exact("^/a"));
    assert_eq!(pg(&expression).sql_text, "paths ~ #{filterParams.paths0}");
    assert_eq!(
        h2(&expression).sql_text,
        "REGEXP_LIKE(paths, #{filterParams.paths0})"
    );
}

#[test]
fn test_regex_needs_a_plain_text_column() {
    for field in [
        SearchField::Keywords,
        SearchField::Tags,
        SearchField::Uploaders,
        SearchField::UploaderIps,
    ] {
        let expression = pred(field, Operand::Regex, Term::exact("^rel.*"));
        let err = PostgresConditionCompiler::new(NS)
            .build(&expression)
            .unwrap_err();
        assert!(
            matches!(
                err.issues(),
                [ValidationIssue::UnsupportedOperand {
                    operand: Operand::Regex,
                    ..
                }]
            ),
            "{:?}",
            err
        );
    }

    let tags = pred(SearchField::Tags, Operand::Regex, Term::exact("^rel.*"));
    assert_eq!(
        h2(&tags).sql_text,
        "REGEXP_LIKE(tags, #{filterParams.tags0})"
    );
}

#[test]
fn test_parameter_names_follow_column() {
    let condition = pg(&pred(
        SearchField::FormatField1,
        Operand::Eq,
        Term::exact("jar"),
    ));
    assert_eq!(
        condition.placeholders(),
        vec!["format_field_values_10"]
    );
}

#[test]
fn test_expression_from_json() {
    let json = r#"{
        "clause": {
            "operand": "AND",
            "children": [
                {"predicate": {"field": "format", "operand": "EQ", "term": {"kind": "exact", "value": "npm"}}},
                {"predicate": {"field": "name", "operand": "EQ", "term": {"kind": "wildcard", "value": "left*", "allow_tokenization": false}}}
            ]
        }
    }"#;
    let expression: Expression = serde_json::from_str(json).unwrap();
    let condition = h2(&expression);
    assert_eq!(
        condition.sql_text,
        "(format = #{filterParams.format0} AND LOWER(search_component_name) LIKE LOWER(#{filterParams.search_component_name1}))"
    );
    assert_eq!(condition.parameter("search_component_name1"), Some("%left%"));
}

#[test]
fn test_inline_sql_for_logging() {
    let condition = pg(&pred(SearchField::Name, Operand::NotEq, Term::exact("o'neil")));
    assert_eq!(
        condition.to_inline_sql(),
        "search_component_name <> 'o''neil'"
    );
}
