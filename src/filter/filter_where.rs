use super::error::FilterError;
use super::types::{is_pet_column, DirectFilter, SqlResult};

/// Builds the `WHERE` clause for a direct pet filter.
///
/// Every predicate compares the column's text form with a bound parameter,
/// so `age=3` matches an integer column the same way `species=cat` matches a
/// text one.
pub struct FilterWhere {
    param_values: Vec<String>,
    param_index: usize,
}

impl FilterWhere {
    pub fn new(starting_param_index: usize) -> Self {
        Self {
            param_values: vec![],
            param_index: starting_param_index,
        }
    }

    pub fn generate(filter: &DirectFilter, starting_param_index: usize) -> Result<(String, Vec<String>), FilterError> {
        let mut filter_where = Self::new(starting_param_index);
        filter_where.build(filter)
    }

    fn build(&mut self, filter: &DirectFilter) -> Result<(String, Vec<String>), FilterError> {
        let mut sql_conditions = vec![];
        for (column, value) in filter {
            Self::validate_column(column)?;
            let placeholder = self.param(value.clone());
            sql_conditions.push(format!("\"{}\"::text = {}", column, placeholder));
        }
        let where_clause = if sql_conditions.is_empty() { "1=1".to_string() } else { sql_conditions.join(" AND ") };
        Ok((where_clause, self.param_values.clone()))
    }

    fn validate_column(column: &str) -> Result<(), FilterError> {
        if is_pet_column(column) {
            Ok(())
        } else {
            Err(FilterError::InvalidColumn(column.to_string()))
        }
    }

    fn param(&mut self, value: String) -> String {
        self.param_values.push(value);
        self.param_index += 1;
        format!("${}", self.param_index)
    }
}

/// Full `SELECT` for pets matching a direct filter, in insertion order.
pub fn select_pets_sql(filter: &DirectFilter) -> Result<SqlResult, FilterError> {
    let (where_clause, params) = FilterWhere::generate(filter, 0)?;
    Ok(SqlResult {
        query: format!(
            "SELECT id, name, description, species, age, gender, profile_img, address, created_at, updated_at \
             FROM pets WHERE {} ORDER BY created_at, id",
            where_clause
        ),
        params,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(pairs: &[(&str, &str)]) -> DirectFilter {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn empty_filter_selects_everything() {
        let (sql, params) = FilterWhere::generate(&DirectFilter::new(), 0).unwrap();
        assert_eq!(sql, "1=1");
        assert!(params.is_empty());
    }

    #[test]
    fn predicates_are_parameterized_in_key_order() {
        let (sql, params) = FilterWhere::generate(&filter(&[("species", "cat"), ("age", "3")]), 0).unwrap();
        assert_eq!(sql, "\"age\"::text = $1 AND \"species\"::text = $2");
        assert_eq!(params, vec!["3".to_string(), "cat".to_string()]);
    }

    #[test]
    fn unknown_columns_are_rejected_before_sql_is_built() {
        let err = FilterWhere::generate(&filter(&[("name\" OR 1=1 --", "x")]), 0).unwrap_err();
        assert!(matches!(err, FilterError::InvalidColumn(_)));
    }

    #[test]
    fn select_sql_keeps_insertion_order() {
        let result = select_pets_sql(&filter(&[("name", "Milo")])).unwrap();
        assert!(result.query.contains("WHERE \"name\"::text = $1"));
        assert!(result.query.ends_with("ORDER BY created_at, id"));
    }
}
