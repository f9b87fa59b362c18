//! Find-query assembly: a SELECT template plus optional clauses.

/// Optional clauses for a find query. Empty strings and zero numbers leave their clause out.
///
/// Clause text is pasted into the statement verbatim. Build it from fixed fragments and validated
/// identifiers or numbers, never from request text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryParams {
    /// Replaces the `?` marker in the template. Callers supply their own default (e.g. `t.*`).
    pub select: String,
    pub join: Vec<String>,
    pub where_clause: String,
    pub order_by: String,
    /// Written right after ORDER BY (`ASC` / `DESC`).
    pub sort_order: String,
    pub group_by: String,
    pub offset: u64,
    pub limit: u64,
}

/// Substitutes the select list into `template` and appends, in this order, whichever clauses are set:
/// joins, WHERE, ORDER BY, sort order, GROUP BY, OFFSET, LIMIT.
pub fn prepare_find_query(template: &str, params: &QueryParams) -> String {
    let mut query = template.replacen('?', &params.select, 1);
    if !params.join.is_empty() {
        query.push(' ');
        query.push_str(&params.join.join(" "));
    }
    push_clause(&mut query, "WHERE ", &params.where_clause);
    push_clause(&mut query, "ORDER BY ", &params.order_by);
    push_clause(&mut query, "", &params.sort_order);
    push_clause(&mut query, "GROUP BY ", &params.group_by);
    if params.offset != 0 {
        query.push_str(&format!(" OFFSET {}", params.offset));
    }
    if params.limit != 0 {
        query.push_str(&format!(" LIMIT {}", params.limit));
    }
    query
}

fn push_clause(query: &mut String, keyword: &str, text: &str) {
    if text.is_empty() {
        return;
    }
    query.push(' ');
    query.push_str(keyword);
    query.push_str(text);
}
