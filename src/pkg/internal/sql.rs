use sqlx::{Postgres, postgres::PgArguments, query::QueryAs, types::BigDecimal};

use crate::{errors::Error, prelude::Result};

/// A value destined for a bind placeholder, kept typed so it can be
/// bound to the prepared statement rather than spliced into the SQL.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Text(String),
    Int(i32),
    Numeric(BigDecimal),
}

impl SqlValue {
    pub fn bind_to<'q, T>(
        self,
        query: QueryAs<'q, Postgres, T, PgArguments>,
    ) -> QueryAs<'q, Postgres, T, PgArguments> {
        match self {
            SqlValue::Text(value) => query.bind(value),
            SqlValue::Int(value) => query.bind(value),
            SqlValue::Numeric(value) => query.bind(value),
        }
    }
}

/// The SET fragment of a partial UPDATE plus its bind values, in
/// placeholder order.
#[derive(Debug)]
pub struct SetClause {
    pub clause: String,
    pub values: Vec<SqlValue>,
}

impl SetClause {
    /// 1-based index of the first placeholder not taken by the SET
    /// fragment. Callers appending their own conditions (the row id,
    /// usually) number from here.
    pub fn next_placeholder(&self) -> usize {
        self.values.len() + 1
    }

    pub fn bind_to<'q, T>(
        self,
        mut query: QueryAs<'q, Postgres, T, PgArguments>,
    ) -> QueryAs<'q, Postgres, T, PgArguments> {
        for value in self.values {
            query = value.bind_to(query);
        }
        query
    }
}

/// Builds the SET clause for an UPDATE touching only the given fields.
///
/// `fields` keeps its order: the first pair becomes `$1`, the second
/// `$2`, and so on. `columns` maps a field name to its column name;
/// fields absent from it use their name verbatim. An empty `fields`
/// fails with a bad request instead of producing `SET` with nothing
/// in it.
pub fn partial_update(fields: Vec<(&str, SqlValue)>, columns: &[(&str, &str)]) -> Result<SetClause> {
    if fields.is_empty() {
        return Err(Error::BadRequest("No data".into()));
    }
    let mut fragments = Vec::with_capacity(fields.len());
    let mut values = Vec::with_capacity(fields.len());
    for (position, (field, value)) in fields.into_iter().enumerate() {
        let column = columns
            .iter()
            .find(|(logical, _)| *logical == field)
            .map_or(field, |(_, physical)| *physical);
        fragments.push(format!("\"{}\"=${}", column, position + 1));
        values.push(value);
    }
    Ok(SetClause {
        clause: fragments.join(", "),
        values,
    })
}
