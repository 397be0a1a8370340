//! ZOQL (Zuora Object Query Language) builder.
//!
//! Only the subset used by the query action is modelled: a field list, a
//! table and equality conditions joined with `and` / `or`.
//!
//! ```
//! use zuora::ZoqlQuery;
//!
//! let query = ZoqlQuery::fields(["ID", "Name"])
//!     .from("Product")
//!     .where_eq("Name", "x")
//!     .and("Name", "y");
//! assert_eq!(
//!     query.to_envelope(),
//!     r#"{"queryString":"select ID, Name from Product where Name = 'x' and Name = 'y'"}"#
//! );
//! ```

use std::fmt;
use std::str::FromStr;

use crate::domain::validation::ValidationError;

/// Field list of a query that still needs a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoqlSelect {
    fields: Vec<String>,
}

impl ZoqlSelect {
    /// Set the queried object type.
    pub fn from(self, table: impl Into<String>) -> ZoqlQuery {
        ZoqlQuery {
            fields: self.fields,
            table: table.into().trim().to_owned(),
            conditions: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Conjunction {
    And,
    Or,
}

impl Conjunction {
    fn keyword(self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
        }
    }
}

/// `field = 'value'`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub field: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoqlQuery {
    fields: Vec<String>,
    table: String,
    // The conjunction of the first entry is never rendered and is kept as `And`.
    conditions: Vec<(Conjunction, Condition)>,
}

impl ZoqlQuery {
    /// Start a query selecting `fields`.
    pub fn fields<I, S>(fields: I) -> ZoqlSelect
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ZoqlSelect {
            fields: fields
                .into_iter()
                .map(|field| field.into().trim().to_owned())
                .collect(),
        }
    }

    /// Set the leading `where` condition, replacing a previous one.
    pub fn where_eq(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        let condition = Condition {
            field: field.into().trim().to_owned(),
            value: value.into(),
        };
        match self.conditions.first_mut() {
            Some(first) => first.1 = condition,
            None => self.conditions.push((Conjunction::And, condition)),
        }
        self
    }

    /// Append `and field = 'value'`.
    pub fn and(self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(Conjunction::And, field.into(), value.into())
    }

    /// Append `or field = 'value'`.
    pub fn or(self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(Conjunction::Or, field.into(), value.into())
    }

    fn push(mut self, conjunction: Conjunction, field: String, value: String) -> Self {
        let conjunction = if self.conditions.is_empty() {
            Conjunction::And
        } else {
            conjunction
        };
        let field = field.trim().to_owned();
        self.conditions
            .push((conjunction, Condition { field, value }));
        self
    }

    pub fn field_names(&self) -> &[String] {
        &self.fields
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn conditions(&self) -> &[(Conjunction, Condition)] {
        &self.conditions
    }

    /// Check that the query names a table and at least one field, and that
    /// every field, table and condition field is a plain identifier
    /// (`[A-Za-z0-9_.]+`), which is what [`FromStr`] reads back.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.fields.is_empty() || self.fields.iter().any(String::is_empty) {
            return Err(ValidationError::Empty { field: "fields" });
        }
        if self.table.is_empty() {
            return Err(ValidationError::Empty { field: "table" });
        }
        for field in &self.fields {
            check_identifier("fields", field)?;
        }
        check_identifier("table", &self.table)?;
        for (_, condition) in &self.conditions {
            check_identifier("condition field", &condition.field)?;
        }
        Ok(())
    }

    /// Render the bare ZOQL statement.
    pub fn query_string(&self) -> String {
        let mut out = format!("select {} from {}", self.fields.join(", "), self.table);
        for (idx, (conjunction, condition)) in self.conditions.iter().enumerate() {
            let keyword = if idx == 0 {
                "where"
            } else {
                conjunction.keyword()
            };
            out.push_str(&format!(
                " {keyword} {} = '{}'",
                condition.field,
                escape_value(&condition.value)
            ));
        }
        out
    }

    /// Render the JSON body accepted by `/v1/action/query`.
    pub fn to_envelope(&self) -> String {
        query_envelope(&self.query_string())
    }
}

/// Wrap a raw ZOQL statement as `{"queryString": ...}`.
pub fn query_envelope(query: &str) -> String {
    serde_json::json!({ "queryString": query.trim() }).to_string()
}

impl fmt::Display for ZoqlQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.query_string())
    }
}

fn is_ident_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '.'
}

fn check_identifier(field: &'static str, input: &str) -> Result<(), ValidationError> {
    if !input.is_empty() && input.chars().all(is_ident_char) {
        Ok(())
    } else {
        Err(ValidationError::InvalidIdentifier {
            field,
            input: input.to_owned(),
        })
    }
}

fn escape_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        if ch == '\'' || ch == '\\' {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

impl FromStr for ZoqlQuery {
    type Err = ValidationError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let mut cursor = Cursor { input, pos: 0 };
        let fail = |reason: &'static str| ValidationError::InvalidQuery {
            input: input.to_owned(),
            reason,
        };

        cursor.skip_ws();
        if !cursor.keyword("select") {
            return Err(fail("expected select"));
        }

        let mut fields = Vec::new();
        loop {
            cursor.skip_ws();
            let field = cursor.ident().ok_or_else(|| fail("expected field name"))?;
            fields.push(field.to_owned());
            cursor.skip_ws();
            if !cursor.eat(',') {
                break;
            }
        }

        if !cursor.keyword("from") {
            return Err(fail("expected from"));
        }
        cursor.skip_ws();
        let table = cursor.ident().ok_or_else(|| fail("expected table name"))?;
        let mut query = ZoqlQuery::fields(fields).from(table);

        cursor.skip_ws();
        if cursor.at_end() {
            query.validate()?;
            return Ok(query);
        }
        if !cursor.keyword("where") {
            return Err(fail("unexpected trailing input"));
        }

        let mut conjunction = Conjunction::And;
        loop {
            cursor.skip_ws();
            let field = cursor
                .ident()
                .ok_or_else(|| fail("expected condition field"))?
                .to_owned();
            cursor.skip_ws();
            if !cursor.eat('=') {
                return Err(fail("expected ="));
            }
            cursor.skip_ws();
            let value = cursor
                .quoted()
                .ok_or_else(|| fail("expected quoted value"))?;
            query = query.push(conjunction, field, value);

            cursor.skip_ws();
            if cursor.at_end() {
                break;
            }
            conjunction = if cursor.keyword("and") {
                Conjunction::And
            } else if cursor.keyword("or") {
                Conjunction::Or
            } else {
                return Err(fail("expected and/or"));
            };
        }

        query.validate()?;
        Ok(query)
    }
}

struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn skip_ws(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn eat(&mut self, ch: char) -> bool {
        if self.rest().starts_with(ch) {
            self.pos += ch.len_utf8();
            true
        } else {
            false
        }
    }

    /// Case-insensitive keyword followed by whitespace or end of input.
    fn keyword(&mut self, keyword: &str) -> bool {
        let rest = self.rest();
        let Some(head) = rest.get(..keyword.len()) else {
            return false;
        };
        if !head.eq_ignore_ascii_case(keyword) {
            return false;
        }
        let boundary = rest[keyword.len()..]
            .chars()
            .next()
            .is_none_or(char::is_whitespace);
        if boundary {
            self.pos += keyword.len();
        }
        boundary
    }

    fn ident(&mut self) -> Option<&'a str> {
        let rest = self.rest();
        let len = rest
            .char_indices()
            .find(|(_, c)| !is_ident_char(*c))
            .map_or(rest.len(), |(idx, _)| idx);
        if len == 0 {
            return None;
        }
        self.pos += len;
        Some(&rest[..len])
    }

    fn quoted(&mut self) -> Option<String> {
        if !self.eat('\'') {
            return None;
        }
        let mut value = String::new();
        let mut chars = self.rest().char_indices();
        while let Some((idx, ch)) = chars.next() {
            match ch {
                '\\' => {
                    let (_, escaped) = chars.next()?;
                    value.push(escaped);
                }
                '\'' => {
                    self.pos += idx + 1;
                    return Some(value);
                }
                other => value.push(other),
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product_query() -> ZoqlQuery {
        ZoqlQuery::fields(["ID", "Name"]).from("Product")
    }

    #[test]
    fn renders_without_filters() {
        assert_eq!(product_query().query_string(), "select ID, Name from Product");
        assert_eq!(
            product_query().to_envelope(),
            r#"{"queryString":"select ID, Name from Product"}"#
        );
    }

    #[test]
    fn renders_where_and() {
        let query = product_query().where_eq("Name", "x").and("Name", "y");
        assert_eq!(
            query.to_envelope(),
            r#"{"queryString":"select ID, Name from Product where Name = 'x' and Name = 'y'"}"#
        );
    }

    #[test]
    fn conditions_keep_call_order() {
        let query = product_query()
            .where_eq("Name", "a")
            .or("Name", "b")
            .and("Status", "Active");
        assert_eq!(
            query.query_string(),
            "select ID, Name from Product where Name = 'a' or Name = 'b' and Status = 'Active'"
        );
    }

    #[test]
    fn first_condition_uses_where_even_from_or() {
        let query = product_query().or("Name", "a");
        assert_eq!(
            query.query_string(),
            "select ID, Name from Product where Name = 'a'"
        );
    }

    #[test]
    fn where_eq_replaces_leading_condition() {
        let query = product_query()
            .where_eq("Name", "a")
            .and("Sku", "s")
            .where_eq("Name", "b");
        assert_eq!(
            query.query_string(),
            "select ID, Name from Product where Name = 'b' and Sku = 's'"
        );
    }

    #[test]
    fn quotes_are_escaped() {
        let query = product_query().where_eq("Name", r"O'Brien \ Co");
        assert_eq!(
            query.query_string(),
            r"select ID, Name from Product where Name = 'O\'Brien \\ Co'"
        );
    }

    #[test]
    fn parse_reproduces_builder_structure() {
        let queries = [
            product_query(),
            product_query().where_eq("Name", "x").and("Name", "y"),
            product_query()
                .where_eq("Name", "it's")
                .or("Id", "2c9")
                .and("Status", "Active"),
        ];

        for query in queries {
            let parsed: ZoqlQuery = query.query_string().parse().unwrap();
            assert_eq!(parsed, query);
        }
    }

    #[test]
    fn parse_is_case_insensitive_for_keywords() {
        let parsed: ZoqlQuery = "SELECT Id FROM Account WHERE Status = 'Active' OR Status = 'Draft'"
            .parse()
            .unwrap();
        assert_eq!(parsed.table(), "Account");
        assert_eq!(parsed.field_names(), ["Id".to_owned()]);
        assert_eq!(parsed.conditions().len(), 2);
        assert_eq!(parsed.conditions()[1].0, Conjunction::Or);
    }

    #[test]
    fn parse_rejects_malformed_queries() {
        for input in [
            "",
            "select",
            "select Id",
            "select Id from",
            "select Id from Account where",
            "select Id from Account where Name = x",
            "select Id from Account where Name = 'x",
            "select Id from Account limit 5",
            "select Id from Account where Name = 'x' xor Name = 'y'",
        ] {
            assert!(
                matches!(
                    input.parse::<ZoqlQuery>(),
                    Err(ValidationError::InvalidQuery { .. })
                ),
                "accepted {input:?}"
            );
        }
    }

    #[test]
    fn validate_rejects_statement_fragments_in_identifiers() {
        let injected = ZoqlQuery::fields(["Id"])
            .from("Product")
            .where_eq("Name = 'a' or Id", "b");
        assert_eq!(
            injected.validate(),
            Err(ValidationError::InvalidIdentifier {
                field: "condition field",
                input: "Name = 'a' or Id".to_owned(),
            })
        );

        let bad_field = ZoqlQuery::fields(["Id, Name"]).from("Product");
        assert!(matches!(
            bad_field.validate(),
            Err(ValidationError::InvalidIdentifier { field: "fields", .. })
        ));

        let bad_table = ZoqlQuery::fields(["Id"]).from("Product where Id = '1'");
        assert!(matches!(
            bad_table.validate(),
            Err(ValidationError::InvalidIdentifier { field: "table", .. })
        ));
    }

    #[test]
    fn valid_builder_queries_parse_back_identically() {
        let query = ZoqlQuery::fields([" Id ", "Account.Name"])
            .from("Subscription")
            .where_eq(" Status ", "Active")
            .or("Account.Name", "a = 'b'");
        query.validate().unwrap();
        assert_eq!(query.conditions()[0].1.field, "Status");

        let parsed: ZoqlQuery = query.query_string().parse().unwrap();
        assert_eq!(parsed, query);
    }

    #[test]
    fn validate_requires_fields_and_table() {
        let no_fields = ZoqlQuery::fields(Vec::<String>::new()).from("Product");
        assert!(matches!(
            no_fields.validate(),
            Err(ValidationError::Empty { field: "fields" })
        ));

        let no_table = ZoqlQuery::fields(["Id"]).from("  ");
        assert!(matches!(
            no_table.validate(),
            Err(ValidationError::Empty { field: "table" })
        ));
    }
}
