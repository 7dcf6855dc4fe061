//! SQL extraction and read-only sanitization.
//!
//! Model output is untrusted text. Before execution we pull the SQL out of
//! any markdown fencing, then enforce two rules: exactly one statement, and
//! the statement must be a read (SELECT or WITH). Write verbs anywhere
//! outside string literals reject the whole statement.

use crate::errors::{AppError, AppResult};

const FORBIDDEN_KEYWORDS: &[&str] = &[
    "insert", "update", "delete", "drop", "alter", "create", "truncate", "replace", "grant",
    "revoke", "attach", "detach", "pragma", "vacuum", "reindex",
];

/// Extract the SQL text from a model completion.
///
/// Accepts raw SQL, or SQL inside a ```sql fenced block; when a fence is
/// present only the first fenced block is used.
pub fn extract_sql(completion: &str) -> String {
    let trimmed = completion.trim();
    if let Some(start) = trimmed.find("```") {
        let after = &trimmed[start + 3..];
        // Skip the language tag on the fence line
        let body = match after.find('\n') {
            Some(nl) if after[..nl].trim().chars().all(|c| c.is_alphanumeric()) => &after[nl + 1..],
            _ => after,
        };
        let end = body.find("```").unwrap_or(body.len());
        return body[..end].trim().to_string();
    }
    trimmed.to_string()
}

/// Split into the statement and a trailing explanation, if the model
/// appended prose after the fenced SQL.
pub fn extract_sql_and_explanation(completion: &str) -> (String, Option<String>) {
    let trimmed = completion.trim();
    if let Some(start) = trimmed.find("```") {
        let sql = extract_sql(trimmed);
        let after_fence = &trimmed[start + 3..];
        let explanation = after_fence
            .find("```")
            .map(|end| after_fence[end + 3..].trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        (sql, explanation)
    } else {
        (trimmed.to_string(), None)
    }
}

/// Strip string literals so keyword scanning cannot be fooled by quoted
/// text, and count statement separators along the way.
fn scan(sql: &str) -> AppResult<String> {
    let mut stripped = String::with_capacity(sql.len());
    let mut chars = sql.chars().peekable();
    let mut in_single = false;
    let mut in_double = false;

    while let Some(c) = chars.next() {
        match c {
            '\'' if !in_double => {
                // Doubled quote inside a literal is an escaped quote
                if in_single && chars.peek() == Some(&'\'') {
                    chars.next();
                } else {
                    in_single = !in_single;
                }
            }
            '"' if !in_single => in_double = !in_double,
            _ if in_single || in_double => {}
            _ => stripped.push(c),
        }
    }

    if in_single || in_double {
        return Err(AppError::validation("Unterminated string literal in SQL"));
    }
    Ok(stripped)
}

/// True when the statement already carries a LIMIT clause. Matches the
/// keyword on word boundaries outside string literals, so identifiers
/// like `speed_limit` do not count.
pub fn has_limit_clause(sql: &str) -> bool {
    let Ok(stripped) = scan(sql) else {
        return false;
    };
    stripped
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric() && c != '_')
        .any(|word| word == "limit")
}

/// Validate that `sql` is a single read-only statement. Returns the
/// statement with any trailing semicolon removed.
pub fn sanitize(sql: &str) -> AppResult<String> {
    let sql = sql.trim().trim_end_matches(';').trim();
    if sql.is_empty() {
        return Err(AppError::validation("No SQL statement found"));
    }

    let stripped = scan(sql)?;

    if stripped.contains(';') {
        return Err(AppError::validation(
            "Multiple SQL statements are not allowed",
        ));
    }

    let lowered = stripped.to_lowercase();
    let first_word = lowered.split_whitespace().next().unwrap_or("");
    if first_word != "select" && first_word != "with" {
        return Err(AppError::validation(
            "Only SELECT statements are allowed",
        ));
    }

    for keyword in FORBIDDEN_KEYWORDS {
        let found = lowered
            .split(|c: char| !c.is_alphanumeric() && c != '_')
            .any(|word| word == *keyword);
        if found {
            return Err(AppError::validation(format!(
                "Statement contains forbidden keyword: {}",
                keyword.to_uppercase()
            )));
        }
    }

    Ok(sql.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_fenced_sql() {
        let completion = "Here you go:\n```sql\nSELECT * FROM orders\n```\nThis lists orders.";
        assert_eq!(extract_sql(completion), "SELECT * FROM orders");

        let (sql, explanation) = extract_sql_and_explanation(completion);
        assert_eq!(sql, "SELECT * FROM orders");
        assert_eq!(explanation.as_deref(), Some("This lists orders."));
    }

    #[test]
    fn limit_detection_matches_whole_words_only() {
        assert!(has_limit_clause("SELECT * FROM orders LIMIT 10"));
        assert!(has_limit_clause("select id from t limit 5"));
        // identifiers and literals containing "limit" do not count
        assert!(!has_limit_clause("SELECT speed_limit FROM roads"));
        assert!(!has_limit_clause("SELECT * FROM t WHERE note = 'limit'"));
    }

    #[test]
    fn passes_raw_sql_through() {
        assert_eq!(extract_sql("SELECT 1"), "SELECT 1");
        let (sql, explanation) = extract_sql_and_explanation("SELECT 1");
        assert_eq!(sql, "SELECT 1");
        assert!(explanation.is_none());
    }

    #[test]
    fn accepts_select_and_with() {
        assert!(sanitize("SELECT * FROM orders").is_ok());
        assert!(sanitize("WITH t AS (SELECT 1 AS x) SELECT x FROM t").is_ok());
        assert!(sanitize("select id from users;").is_ok());
    }

    #[test]
    fn rejects_mutations() {
        assert!(sanitize("DELETE FROM orders").is_err());
        assert!(sanitize("INSERT INTO t VALUES (1)").is_err());
        assert!(sanitize("DROP TABLE orders").is_err());
        assert!(sanitize("SELECT 1; DROP TABLE orders").is_err());
    }

    #[test]
    fn rejects_write_verb_in_subquery() {
        assert!(sanitize("SELECT * FROM orders WHERE id IN (DELETE FROM x)").is_err());
    }

    #[test]
    fn ignores_keywords_inside_string_literals() {
        assert!(sanitize("SELECT * FROM logs WHERE message = 'please delete me'").is_ok());
        assert!(sanitize("SELECT * FROM logs WHERE note = 'a; b; c'").is_ok());
        assert!(sanitize("SELECT * FROM logs WHERE note = 'it''s; fine'").is_ok());
    }

    #[test]
    fn rejects_unterminated_literal() {
        assert!(sanitize("SELECT * FROM t WHERE a = 'oops").is_err());
    }

    #[test]
    fn trailing_semicolon_is_stripped() {
        assert_eq!(sanitize("SELECT 1;").unwrap(), "SELECT 1");
    }
}
