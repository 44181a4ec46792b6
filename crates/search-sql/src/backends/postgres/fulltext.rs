//! tsquery rendering.
//!
//! Turns search terms into PostgreSQL `tsquery` literals. Values are lowercased
//! and quoted as single lexemes so that `to_tsquery` parsing cannot reinterpret
//! operators inside user input.

/// Characters that split a value into tokens.
const TOKEN_SEPARATORS: &[char] = &['.', '-', '/', '\\', ' '];

/// Splits a value into its non-empty tokens.
pub fn split_tokens(value: &str) -> Vec<&str> {
    value
        .split(TOKEN_SEPARATORS)
        .filter(|token| !token.is_empty())
        .collect()
}

/// Quotes a lexeme for use inside a tsquery.
pub fn quote_lexeme(lexeme: &str) -> String {
    let escaped = lexeme.replace('\\', "\\\\").replace('\'', "''");
    format!("'{}'", escaped)
}

/// The query for an exact term: the whole value as one lexeme.
pub fn exact_query(value: &str) -> String {
    quote_lexeme(&value.to_lowercase())
}

/// The queries for a lenient term.
///
/// The whole value, plus a phrase of its tokens when it splits into two or more.
pub fn lenient_queries(value: &str) -> Vec<String> {
    let lowered = value.to_lowercase();
    let mut queries = vec![quote_lexeme(&lowered)];

    let tokens = split_tokens(&lowered);
    if tokens.len() > 1 {
        queries.push(phrase(&tokens, false));
    }
    queries
}

/// The queries for a wildcard term.
///
/// `*` is removed and the value becomes a prefix match. With tokenization
/// allowed, a phrase of its tokens is added whose last token is a prefix.
///
/// A tsquery lexeme can only be a prefix, so an interior `*` is dropped as
/// well: `foo*bar` matches lexemes starting with `foobar`. H2 keeps it as a
/// `%` inside the LIKE pattern instead.
pub fn wildcard_queries(value: &str, allow_tokenization: bool) -> Vec<String> {
    let stripped = value.replace('*', "").to_lowercase();
    let mut queries = vec![format!("{}:*", quote_lexeme(&stripped))];

    if allow_tokenization {
        let tokens = split_tokens(&stripped);
        if tokens.len() > 1 {
            queries.push(phrase(&tokens, true));
        }
    }
    queries
}

/// Builds a LIKE prefix pattern for the exact column from a wildcard value.
///
/// LIKE metacharacters in the value are escaped, `*` becomes `%`, and the
/// pattern always ends in `%`.
pub fn prefix_pattern(value: &str) -> String {
    let mut pattern = value
        .split('*')
        .map(escape_like)
        .collect::<Vec<_>>()
        .join("%");
    if !value.ends_with('*') {
        pattern.push('%');
    }
    pattern
}

/// Escapes LIKE metacharacters. Backslash is escaped first.
pub fn escape_like(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

fn phrase(tokens: &[&str], prefix_last: bool) -> String {
    let last = tokens.len() - 1;
    tokens
        .iter()
        .enumerate()
        .map(|(i, token)| {
            if prefix_last && i == last {
                format!("{}:*", quote_lexeme(token))
            } else {
                quote_lexeme(token)
            }
        })
        .collect::<Vec<_>>()
        .join(" <-> ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_tokens() {
        assert_eq!(
            split_tokens("org.apache-commons/lang\\x y"),
            vec!["org", "apache", "commons", "lang", "x", "y"]
        );
        assert_eq!(split_tokens("..a.."), vec!["a"]);
    }

    #[test]
    fn test_quote_lexeme() {
        assert_eq!(quote_lexeme("o'neil"), "'o''neil'");
        assert_eq!(quote_lexeme("a\\b"), "'a\\\\b'");
    }

    #[test]
    fn test_exact_query_lowercases() {
        assert_eq!(exact_query("Guava"), "'guava'");
    }

    #[test]
    fn test_lenient_queries() {
        assert_eq!(lenient_queries("junit"), vec!["'junit'"]);
        assert_eq!(
            lenient_queries("org.apache.tomcat"),
            vec![
                "'org.apache.tomcat'".to_string(),
                "'org' <-> 'apache' <-> 'tomcat'".to_string()
            ]
        );
    }

    #[test]
    fn test_wildcard_queries() {
        assert_eq!(wildcard_queries("Gua*", false), vec!["'gua':*"]);
        assert_eq!(
            wildcard_queries("org.apa*", true),
            vec![
                "'org.apa':*".to_string(),
                "'org' <-> 'apa':*".to_string()
            ]
        );
        assert_eq!(wildcard_queries("org.apa*", false).len(), 1);
        assert_eq!(wildcard_queries("foo*bar", false), vec!["'foobar':*"]);
    }

    #[test]
    fn test_prefix_pattern() {
        assert_eq!(prefix_pattern("1.2.3*"), "1.2.3%");
        assert_eq!(prefix_pattern("1.2.3"), "1.2.3%");
        assert_eq!(prefix_pattern("a_b.c.d*"), "a\\_b.c.d%");
        assert_eq!(prefix_pattern("50%.1.2"), "50\\%.1.2%");
        assert_eq!(prefix_pattern("1.2.3\\*"), "1.2.3\\\\%");
        assert_eq!(prefix_pattern("1.2.3\\"), "1.2.3\\\\%");
    }
}
