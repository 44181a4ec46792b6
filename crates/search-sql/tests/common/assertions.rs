//! Assertion helpers for compiled conditions.

use std::collections::BTreeMap;

use reposearch_sql::SqlSearchQueryCondition;

/// Asserts that every placeholder is bound and every parameter is used once.
pub fn assert_parameters_bound(condition: &SqlSearchQueryCondition) {
    let mut uses: BTreeMap<&str, usize> = BTreeMap::new();
    for name in condition.placeholders() {
        *uses.entry(name).or_default() += 1;
    }

    for (name, count) in &uses {
        assert!(
            condition.parameters.contains_key(*name),
            "Placeholder {} has no parameter in {:?}",
            name,
            condition.parameters
        );
        assert_eq!(*count, 1, "Placeholder {} used {} times", name, count);
    }
    for name in condition.parameters.keys() {
        assert!(
            uses.contains_key(name.as_str()),
            "Parameter {} is never referenced by: {}",
            name,
            condition.sql_text
        );
    }
}

/// Asserts that every placeholder uses the condition's namespace.
pub fn assert_namespace(condition: &SqlSearchQueryCondition, namespace: &str) {
    let prefix = format!("#{{{}.", namespace);
    assert_eq!(
        condition.sql_text.matches("#{").count(),
        condition.sql_text.matches(&prefix).count(),
        "Placeholder outside namespace {} in: {}",
        namespace,
        condition.sql_text
    );
}
