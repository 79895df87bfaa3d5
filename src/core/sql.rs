//! SQL statement building
//!
//! Statements are assembled from the configured table name, caller-supplied
//! column names and the `what` column-selector expression. Identifiers and
//! the selector are written into the statement text as given; every value is
//! sent as a bound parameter (`$1`, `$2`, ...).
//!
//! Degenerate inputs are not guarded: an insert or update without columns
//! produces a statement the database rejects, and that rejection is what
//! the caller gets back.

/// A statement text plus its bound values, in placeholder order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    sql: String,
    binds: Vec<String>,
}

impl Statement {
    pub fn new(sql: impl Into<String>, binds: Vec<String>) -> Self {
        Self {
            sql: sql.into(),
            binds,
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn binds(&self) -> &[String] {
        &self.binds
    }

    /// Rewrite placeholders so text parameters are converted server-side
    ///
    /// `casts[n]` is the type the database expects for placeholder `$n+1`.
    /// Each placeholder with a cast becomes `$n::text::TYPE`, which runs the
    /// type's input function on the text value. Placeholders inside quoted
    /// literals or identifiers are left untouched.
    pub fn with_casts(&self, casts: &[Option<String>]) -> Statement {
        Statement {
            sql: cast_placeholders(&self.sql, casts),
            binds: self.binds.clone(),
        }
    }
}

/// `SELECT {what} FROM {table}`, optionally restricted to one `id`
pub fn select(what: &str, table: &str, id: Option<&str>) -> Statement {
    match id {
        Some(id) => Statement::new(
            format!("SELECT {} FROM {} WHERE id = $1", what, table),
            vec![id.to_string()],
        ),
        None => Statement::new(format!("SELECT {} FROM {}", what, table), Vec::new()),
    }
}

/// `INSERT INTO {table} (c1,c2) VALUES ($1,$2)`
pub fn insert(table: &str, columns: &[(&str, &str)]) -> Statement {
    let names: Vec<&str> = columns.iter().map(|(name, _)| *name).collect();
    let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("${}", i)).collect();
    let binds = columns.iter().map(|(_, value)| value.to_string()).collect();

    Statement::new(
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            table,
            names.join(","),
            placeholders.join(",")
        ),
        binds,
    )
}

/// `UPDATE {table} SET c1 = $1,c2 = $2 WHERE id = $3`
pub fn update(table: &str, assignments: &[(&str, &str)], id: &str) -> Statement {
    let sets: Vec<String> = assignments
        .iter()
        .enumerate()
        .map(|(i, (name, _))| format!("{} = ${}", name, i + 1))
        .collect();
    let mut binds: Vec<String> = assignments
        .iter()
        .map(|(_, value)| value.to_string())
        .collect();
    binds.push(id.to_string());

    Statement::new(
        format!(
            "UPDATE {} SET {} WHERE id = ${}",
            table,
            sets.join(","),
            assignments.len() + 1
        ),
        binds,
    )
}

/// `DELETE FROM {table} WHERE id = $1`
pub fn delete(table: &str, id: &str) -> Statement {
    Statement::new(
        format!("DELETE FROM {} WHERE id = $1", table),
        vec![id.to_string()],
    )
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

fn cast_placeholders(sql: &str, casts: &[Option<String>]) -> String {
    let mut out = String::with_capacity(sql.len() + casts.len() * 16);
    let mut quote: Option<char> = None;
    let mut prev: Option<char> = None;
    let mut chars = sql.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if let Some(q) = quote {
            out.push(c);
            if c == q {
                quote = None;
            }
            prev = Some(c);
            continue;
        }

        match c {
            '\'' | '"' => {
                quote = Some(c);
                out.push(c);
                prev = Some(c);
            }
            '$' if !prev.is_some_and(is_identifier_char) => {
                let start = i + c.len_utf8();
                let mut end = start;
                while let Some(&(j, d)) = chars.peek() {
                    if !d.is_ascii_digit() {
                        break;
                    }
                    end = j + d.len_utf8();
                    chars.next();
                }

                out.push('$');
                out.push_str(&sql[start..end]);
                prev = sql[..end].chars().last();

                let cast = sql[start..end]
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|index| casts.get(index))
                    .and_then(|cast| cast.as_deref());
                if let Some(type_name) = cast {
                    out.push_str("::text::");
                    out.push_str(type_name);
                }
            }
            _ => {
                out.push(c);
                prev = Some(c);
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_all_rows() {
        let stmt = select("*", "invoices", None);
        assert_eq!(stmt.sql(), "SELECT * FROM invoices");
        assert!(stmt.binds().is_empty());
    }

    #[test]
    fn test_select_by_id_binds_id() {
        let stmt = select("id,vat", "invoices", Some("42"));
        assert_eq!(stmt.sql(), "SELECT id,vat FROM invoices WHERE id = $1");
        assert_eq!(stmt.binds(), ["42"]);
    }

    #[test]
    fn test_select_keeps_expression_verbatim() {
        let stmt = select("count(*) AS n, max(vat)", "invoices", None);
        assert_eq!(stmt.sql(), "SELECT count(*) AS n, max(vat) FROM invoices");
    }

    #[test]
    fn test_insert_follows_column_order() {
        let stmt = insert("invoices", &[("vat", "21"), ("customer", "acme")]);
        assert_eq!(
            stmt.sql(),
            "INSERT INTO invoices (vat,customer) VALUES ($1,$2)"
        );
        assert_eq!(stmt.binds(), ["21", "acme"]);
    }

    #[test]
    fn test_insert_without_columns_is_degenerate() {
        let stmt = insert("invoices", &[]);
        assert_eq!(stmt.sql(), "INSERT INTO invoices () VALUES ()");
        assert!(stmt.binds().is_empty());
    }

    #[test]
    fn test_update_binds_id_last() {
        let stmt = update("invoices", &[("vat", "9"), ("paid", "true")], "7");
        assert_eq!(
            stmt.sql(),
            "UPDATE invoices SET vat = $1,paid = $2 WHERE id = $3"
        );
        assert_eq!(stmt.binds(), ["9", "true", "7"]);
    }

    #[test]
    fn test_update_without_assignments_is_degenerate() {
        let stmt = update("invoices", &[], "7");
        assert_eq!(stmt.sql(), "UPDATE invoices SET  WHERE id = $1");
        assert_eq!(stmt.binds(), ["7"]);
    }

    #[test]
    fn test_delete_by_id() {
        let stmt = delete("invoices", "3");
        assert_eq!(stmt.sql(), "DELETE FROM invoices WHERE id = $1");
        assert_eq!(stmt.binds(), ["3"]);
    }

    #[test]
    fn test_casts_are_applied_per_placeholder() {
        let stmt = update("invoices", &[("vat", "9"), ("note", "x")], "7");
        let typed = stmt.with_casts(&[Some("NUMERIC".to_string()), None, Some("INT4".to_string())]);
        assert_eq!(
            typed.sql(),
            "UPDATE invoices SET vat = $1::text::NUMERIC,note = $2 WHERE id = $3::text::INT4"
        );
        assert_eq!(typed.binds(), stmt.binds());
    }

    #[test]
    fn test_casts_skip_quoted_text() {
        let stmt = select("'$1' AS literal, \"a$1\"", "invoices", Some("1"));
        let typed = stmt.with_casts(&[Some("INT8".to_string())]);
        assert_eq!(
            typed.sql(),
            "SELECT '$1' AS literal, \"a$1\" FROM invoices WHERE id = $1::text::INT8"
        );
    }

    #[test]
    fn test_casts_skip_identifiers_and_dollar_quotes() {
        let stmt = Statement::new("SELECT col$1, $$body$$ FROM t WHERE id = $1", vec!["1".into()]);
        let typed = stmt.with_casts(&[Some("INT4".to_string())]);
        assert_eq!(
            typed.sql(),
            "SELECT col$1, $$body$$ FROM t WHERE id = $1::text::INT4"
        );
    }

    #[test]
    fn test_casts_ignore_out_of_range_placeholders() {
        let stmt = Statement::new("SELECT $2, $10 FROM t", Vec::new());
        let typed = stmt.with_casts(&[Some("INT4".to_string())]);
        assert_eq!(typed.sql(), "SELECT $2, $10 FROM t");
    }
}
