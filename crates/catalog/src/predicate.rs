//! Predicate fragments over the product collection.
//!
//! A [`Predicate`] has two readings: [`Predicate::to_sql`] renders the
//! WHERE-clause fragment handed to the external query engine, and
//! [`Predicate::matches`] evaluates the same condition against the stock
//! status index in memory. Both readings walk the same tree.

use std::collections::BTreeSet;

use stockline_core::{ProductId, StockId};

use crate::stock_status::{StockStatus, StockStatusLookup};

/// Alias of the main product table in collection queries.
pub const MAIN_TABLE_ALIAS: &str = "e";
/// Column of the main product table holding the product id.
pub const ENTITY_ID: &str = "entity_id";
/// Outer-query column carrying the current website (= stock) context.
pub const WEBSITE_ID_REFERENCE: &str = "product_website.website_id";

/// SQL building capability of the connection used by conditions.
pub trait QueryPredicateBuilder: Send + Sync {
    /// Physical table name for a logical one (prefix applied).
    fn table_name(&self, name: &str) -> String;

    /// Quote a string literal.
    fn quote(&self, value: &str) -> String {
        let mut out = String::with_capacity(value.len() + 2);
        out.push('\'');
        for c in value.chars() {
            match c {
                '\'' => out.push_str("''"),
                '\\' => out.push_str("\\\\"),
                _ => out.push(c),
            }
        }
        out.push('\'');
        out
    }

    /// Quote an identifier.
    fn quote_identifier(&self, ident: &str) -> String {
        format!("`{}`", ident.replace('`', "``"))
    }
}

/// MySQL-flavoured builder with an optional table prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefaultPredicateBuilder {
    table_prefix: String,
}

impl DefaultPredicateBuilder {
    pub fn new(table_prefix: impl Into<String>) -> Self {
        Self {
            table_prefix: table_prefix.into(),
        }
    }
}

impl QueryPredicateBuilder for DefaultPredicateBuilder {
    fn table_name(&self, name: &str) -> String {
        format!("{}{}", self.table_prefix, name)
    }
}

/// Values the outer query binds while a predicate is evaluated.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct EvaluationContext {
    /// Website the product collection is scoped to.
    pub website_id: u32,
}

impl EvaluationContext {
    pub fn new(website_id: u32) -> Self {
        Self { website_id }
    }

    pub fn stock_id(&self) -> StockId {
        StockId::new(self.website_id)
    }
}

/// One conjunct of a sub-select's WHERE clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WhereClause {
    /// `column = literal`, literal kept unquoted.
    Equals { column: String, value: String },
    /// `column = outer_reference`, a correlation with the outer query.
    Correlated { column: String, outer: String },
}

impl WhereClause {
    fn to_sql(&self, quote: &dyn Fn(&str) -> String) -> String {
        match self {
            WhereClause::Equals { column, value } => format!("({column} = {})", quote(value)),
            WhereClause::Correlated { column, outer } => format!("({column} = {outer})"),
        }
    }

    fn holds(&self, alias: &str, row: &StockStatus, ctx: &EvaluationContext) -> bool {
        let Some(left) = column_value(alias, row, self.column()) else {
            return false;
        };
        match self {
            WhereClause::Equals { value, .. } => numeric_literal(&left) == numeric_literal(value),
            WhereClause::Correlated { outer, .. } => {
                outer == WEBSITE_ID_REFERENCE && left == ctx.website_id.to_string()
            }
        }
    }

    fn column(&self) -> &str {
        match self {
            WhereClause::Equals { column, .. } | WhereClause::Correlated { column, .. } => column,
        }
    }
}

/// Sub-select of one column from the stock status table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Select {
    pub table: String,
    pub alias: String,
    pub column: String,
    pub conditions: Vec<WhereClause>,
}

impl Select {
    pub fn from(table: impl Into<String>, alias: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            alias: alias.into(),
            column: column.into(),
            conditions: Vec::new(),
        }
    }

    pub fn where_clause(mut self, clause: WhereClause) -> Self {
        self.conditions.push(clause);
        self
    }

    pub fn to_sql(&self, builder: &dyn QueryPredicateBuilder) -> String {
        let column = self
            .column
            .rsplit('.')
            .next()
            .unwrap_or(self.column.as_str());
        let mut sql = format!(
            "SELECT {}.{} FROM {} AS {}",
            builder.quote_identifier(&self.alias),
            builder.quote_identifier(column),
            builder.quote_identifier(&self.table),
            builder.quote_identifier(&self.alias),
        );
        if !self.conditions.is_empty() {
            let quote = |v: &str| builder.quote(v);
            let clauses: Vec<String> = self.conditions.iter().map(|c| c.to_sql(&quote)).collect();
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql
    }

    /// Product ids selected from the index rows under `ctx`.
    pub fn product_ids(&self, rows: &[StockStatus], ctx: &EvaluationContext) -> BTreeSet<ProductId> {
        rows.iter()
            .filter(|row| self.conditions.iter().all(|c| c.holds(&self.alias, row, ctx)))
            .filter_map(|row| column_value(&self.alias, row, &self.column))
            .filter_map(|id| id.parse().ok())
            .collect()
    }
}

/// Condition on the product collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// `column [NOT] IN (subquery)`.
    InSubquery {
        column: String,
        negated: bool,
        subquery: Select,
    },
}

impl Predicate {
    pub fn to_sql(&self, builder: &dyn QueryPredicateBuilder) -> String {
        match self {
            Predicate::InSubquery {
                column,
                negated,
                subquery,
            } => {
                let op = if *negated { "NOT IN" } else { "IN" };
                format!("{column} {op} ({})", subquery.to_sql(builder))
            }
        }
    }

    /// Whether `product_id` satisfies the predicate in `ctx`.
    pub fn matches<L>(&self, product_id: ProductId, ctx: &EvaluationContext, lookup: &L) -> bool
    where
        L: StockStatusLookup + ?Sized,
    {
        self.filter_products([product_id], ctx, lookup).contains(&product_id)
    }

    /// The subset of `products` satisfying the predicate in `ctx`.
    pub fn filter_products<L>(
        &self,
        products: impl IntoIterator<Item = ProductId>,
        ctx: &EvaluationContext,
        lookup: &L,
    ) -> BTreeSet<ProductId>
    where
        L: StockStatusLookup + ?Sized,
    {
        match self {
            Predicate::InSubquery {
                negated, subquery, ..
            } => {
                let selected = subquery.product_ids(&lookup.list(), ctx);
                products
                    .into_iter()
                    .filter(|id| selected.contains(id) != *negated)
                    .collect()
            }
        }
    }
}

/// Value of a literal compared against an integer column, the way MySQL
/// coerces it: the longest numeric prefix, `0` when there is none.
fn numeric_literal(raw: &str) -> f64 {
    let s = raw.trim_start();
    let end = s
        .find(|c: char| !(c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E')))
        .unwrap_or(s.len());
    (1..=end)
        .rev()
        .find_map(|i| s[..i].parse::<f64>().ok())
        .unwrap_or(0.0)
}

fn column_value(alias: &str, row: &StockStatus, column: &str) -> Option<String> {
    let name = match column.split_once('.') {
        Some((prefix, name)) if prefix == alias => name,
        Some(_) => return None,
        None => column,
    };
    match name {
        "product_id" => Some(row.product_id.to_string()),
        "stock_id" => Some(row.stock_id.to_string()),
        "stock_status" => Some(row.status.code().to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stock_status::StockStatusFlag;

    fn row(product: u64, stock: u32, status: StockStatusFlag) -> StockStatus {
        StockStatus {
            product_id: ProductId::new(product),
            stock_id: StockId::new(stock),
            status,
            qty: 0.0,
        }
    }

    #[test]
    fn quote_escapes_single_quotes_and_backslashes() {
        let builder = DefaultPredicateBuilder::default();
        assert_eq!(builder.quote("1"), "'1'");
        assert_eq!(builder.quote("o'k\\"), "'o''k\\\\'");
        assert_eq!(builder.quote_identifier("ciss"), "`ciss`");
    }

    #[test]
    fn table_prefix_is_applied() {
        let builder = DefaultPredicateBuilder::new("shop_");
        assert_eq!(builder.table_name("cataloginventory_stock_status"), "shop_cataloginventory_stock_status");
    }

    #[test]
    fn select_renders_conditions_in_order() {
        let select = Select::from("stock_status", "ciss", "ciss.product_id")
            .where_clause(WhereClause::Equals {
                column: "ciss.stock_status".to_string(),
                value: "1".to_string(),
            })
            .where_clause(WhereClause::Correlated {
                column: "ciss.stock_id".to_string(),
                outer: WEBSITE_ID_REFERENCE.to_string(),
            });

        assert_eq!(
            select.to_sql(&DefaultPredicateBuilder::default()),
            "SELECT `ciss`.`product_id` FROM `stock_status` AS `ciss` \
             WHERE (ciss.stock_status = '1') AND (ciss.stock_id = product_website.website_id)"
        );
    }

    #[test]
    fn select_evaluates_correlation_against_context() {
        let select = Select::from("stock_status", "ciss", "ciss.product_id").where_clause(
            WhereClause::Correlated {
                column: "ciss.stock_id".to_string(),
                outer: WEBSITE_ID_REFERENCE.to_string(),
            },
        );
        let rows = vec![
            row(1, 1, StockStatusFlag::InStock),
            row(2, 2, StockStatusFlag::InStock),
        ];

        let ids = select.product_ids(&rows, &EvaluationContext::new(2));
        assert_eq!(ids.into_iter().collect::<Vec<_>>(), vec![ProductId::new(2)]);
    }

    fn status_select(value: &str) -> Select {
        Select::from("stock_status", "ciss", "ciss.product_id").where_clause(WhereClause::Equals {
            column: "ciss.stock_status".to_string(),
            value: value.to_string(),
        })
    }

    #[test]
    fn literals_compare_numerically_against_status_column() {
        let rows = vec![row(1, 1, StockStatusFlag::InStock), row(2, 1, StockStatusFlag::OutOfStock)];
        let ctx = EvaluationContext::new(1);

        for value in ["1", "01", "1.0", " 1", "1abc", "+1"] {
            let ids = status_select(value).product_ids(&rows, &ctx);
            assert_eq!(ids.into_iter().collect::<Vec<_>>(), vec![ProductId::new(1)], "value {value:?}");
        }
    }

    #[test]
    fn non_numeric_literals_read_as_zero() {
        let rows = vec![row(1, 1, StockStatusFlag::InStock), row(2, 1, StockStatusFlag::OutOfStock)];
        let ctx = EvaluationContext::new(1);

        for value in ["", "abc", "-", "in stock"] {
            let ids = status_select(value).product_ids(&rows, &ctx);
            assert_eq!(ids.into_iter().collect::<Vec<_>>(), vec![ProductId::new(2)], "value {value:?}");
        }
        assert!(status_select("2").product_ids(&rows, &ctx).is_empty());
    }

    #[test]
    fn numeric_literal_takes_longest_numeric_prefix() {
        assert_eq!(numeric_literal("1.5e1x"), 15.0);
        assert_eq!(numeric_literal("1e"), 1.0);
        assert_eq!(numeric_literal("-0"), 0.0);
        assert_eq!(numeric_literal("x1"), 0.0);
    }
}
