use crate::dataset::DatasetError;
use crate::dataset::Diagnostic;
use crate::dataset::MissReason;
use crate::dataset::VALUE_FIELD;
use crate::description::FieldDescription;
use crate::description::PatternDescription;
use crate::spreadsheet::cell::Cell;
use crate::spreadsheet::range::RangeKind;
use crate::spreadsheet::range::RangeReference;
use crate::spreadsheet::Table;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::collections::HashMap;

/// A resolved field name and value, registered against a row, a column or
/// every cell.
#[derive(Clone, Debug, PartialEq, Eq)]
struct FieldValue {
    name: String,
    value: String,
}

/// Field lookups resolved from descriptions against one table.
///
/// A field written down a column (single column range) applies to the rows
/// it crosses, and a field written along a row applies to the columns it
/// crosses. A single cell does both. Fields without ranges apply everywhere.
/// The indexes are complete once construction returns and never change.
#[derive(Clone, Debug, Default)]
pub struct QueryableFields {
    rows_and_their_fields: HashMap<usize, Vec<FieldValue>>,
    columns_and_their_fields: HashMap<usize, Vec<FieldValue>>,
    universal_fields: Vec<FieldValue>,
    value_cells: BTreeSet<Cell>,
    diagnostics: Vec<Diagnostic>,
}

impl QueryableFields {
    /// Resolves every field description against the table.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::RowAndColumnRange`] when a field other than
    /// `value` uses a range spanning several rows and several columns.
    pub fn new<T: Table + ?Sized>(fields: &[FieldDescription], table: &T) -> Result<Self, DatasetError> {
        let mut queryable_fields = Self::default();
        for field in fields {
            if field.field() == VALUE_FIELD {
                queryable_fields.save_values(field, table);
            } else {
                for pattern in field.patterns() {
                    queryable_fields.process_pattern(field.field(), pattern, table)?;
                }
            }
        }
        log::debug!(
            "Indexed {} rows, {} columns, {} universal fields, {} value cells",
            queryable_fields.rows_and_their_fields.len(),
            queryable_fields.columns_and_their_fields.len(),
            queryable_fields.universal_fields.len(),
            queryable_fields.value_cells.len()
        );
        Ok(queryable_fields)
    }

    /// Collects the cells of the value field; a cell named twice is kept once.
    fn save_values<T: Table + ?Sized>(&mut self, field: &FieldDescription, table: &T) {
        for pattern in field.patterns() {
            if pattern.ranges().is_empty() {
                log::warn!("Pattern of field '{}' has no ranges and yields no value cells", field.field());
            }
            for range in pattern.ranges() {
                self.value_cells.extend(table.resolve(range));
            }
        }
    }

    fn process_pattern<T: Table + ?Sized>(
        &mut self,
        field: &str,
        pattern: &PatternDescription,
        table: &T,
    ) -> Result<(), DatasetError> {
        log::debug!("Processing pattern of field '{}': {:?}", field, pattern);
        if pattern.ranges().is_empty() {
            // Validated at construction: a pattern without ranges has a value.
            if let Some(value) = pattern.value() {
                self.universal_fields.push(FieldValue {
                    name: field.to_owned(),
                    value: value.to_owned(),
                });
            }
            return Ok(());
        }

        for range in pattern.ranges() {
            let kind = range.kind();
            if kind == RangeKind::RowAndColumn {
                return Err(DatasetError::RowAndColumnRange {
                    field: field.to_owned(),
                    range: range.to_string(),
                });
            }
            let values = self.calculate_pattern_values(field, pattern, range, table);
            if matches!(kind, RangeKind::ColumnOnly | RangeKind::SingleCell) {
                // Written in a column, so applicable to rows.
                Self::register(&mut self.rows_and_their_fields, field, &values, |cell| cell.row);
            }
            if matches!(kind, RangeKind::RowOnly | RangeKind::SingleCell) {
                // Written in a row, so applicable to columns.
                Self::register(&mut self.columns_and_their_fields, field, &values, |cell| cell.col);
            }
        }
        Ok(())
    }

    /// Resolves one range of a pattern to (cell, value) pairs, recording
    /// cells that yield nothing.
    fn calculate_pattern_values<T: Table + ?Sized>(
        &mut self,
        field: &str,
        pattern: &PatternDescription,
        range: &RangeReference,
        table: &T,
    ) -> Vec<(Cell, String)> {
        let mut values = Vec::new();
        for cell in table.resolve(range) {
            match pattern.apply(cell.text()) {
                Some(value) => {
                    log::debug!("{} -> {}: '{}'", cell, field, value);
                    values.push((cell, value));
                }
                None => {
                    let reason = match (cell.text(), pattern.pattern()) {
                        (Some(_), Some(_)) => MissReason::NoMatch,
                        _ => MissReason::EmptyCell,
                    };
                    let diagnostic = Diagnostic {
                        field: field.to_owned(),
                        address: cell.address(),
                        reason,
                    };
                    log::info!("{}", diagnostic);
                    self.diagnostics.push(diagnostic);
                }
            }
        }
        values
    }

    fn register<F>(index: &mut HashMap<usize, Vec<FieldValue>>, field: &str, values: &[(Cell, String)], key: F)
    where
        F: Fn(&Cell) -> usize,
    {
        for (cell, value) in values {
            index.entry(key(cell)).or_default().push(FieldValue {
                name: field.to_owned(),
                value: value.to_owned(),
            });
        }
    }

    /// Returns the fields that apply at a cell.
    ///
    /// Universal fields form the base, row fields overlay them and column
    /// fields overlay both; within one layer the latest registration wins.
    pub fn query_fields_at(&self, row: usize, col: usize) -> BTreeMap<String, String> {
        let mut fields_at_this_cell = BTreeMap::new();
        Self::stash_into(&mut fields_at_this_cell, &self.universal_fields);
        if let Some(fields) = self.rows_and_their_fields.get(&row) {
            Self::stash_into(&mut fields_at_this_cell, fields);
        }
        if let Some(fields) = self.columns_and_their_fields.get(&col) {
            Self::stash_into(&mut fields_at_this_cell, fields);
        }
        fields_at_this_cell
    }

    fn stash_into(target: &mut BTreeMap<String, String>, fields: &[FieldValue]) {
        for field in fields {
            target.insert(field.name.to_owned(), field.value.to_owned());
        }
    }

    /// Cells designated by the value field, in row-major order.
    pub fn value_cells(&self) -> &BTreeSet<Cell> {
        &self.value_cells
    }

    /// Soft misses encountered while resolving field values.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spreadsheet::Sheet;

    fn range(value: &str) -> RangeReference {
        RangeReference::try_from(value).unwrap()
    }

    fn table(text: &str) -> Sheet {
        text.parse().unwrap()
    }

    fn expected(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn query_fields_at_correctly_includes_prefix() {
        let table = table("district,mmr,u5mr\nkannur,2,3\nkozhikode,3,4\n");
        let fields = vec![FieldDescription::builder("indicator")
            .range(range("B1:1"))
            .prefix("IND - ")
            .build()
            .unwrap()];
        let queryable_fields = QueryableFields::new(&fields, &table).unwrap();

        assert_eq!(queryable_fields.query_fields_at(1, 1), expected(&[("indicator", "IND - mmr")]));
        assert_eq!(queryable_fields.query_fields_at(2, 2), expected(&[("indicator", "IND - u5mr")]));
    }

    #[test]
    fn query_fields_when_multiple_ranges() {
        let table = table("district,mm1,mm1,mm2,mm2\nsomewhere,1,2,3,4\n");
        let fields = vec![
            FieldDescription::builder("indicator")
                .ranges(vec![range("B1"), range("C1")])
                .value("MM 1")
                .build()
                .unwrap(),
            FieldDescription::builder("indicator")
                .ranges(vec![range("D1"), range("E1")])
                .value("MM 2")
                .build()
                .unwrap(),
        ];
        let queryable_fields = QueryableFields::new(&fields, &table).unwrap();

        assert_eq!(queryable_fields.query_fields_at(1, 2), expected(&[("indicator", "MM 1")]));
        assert_eq!(queryable_fields.query_fields_at(1, 4), expected(&[("indicator", "MM 2")]));
    }

    #[test]
    fn single_cell_applies_to_row_and_column() {
        let table = table("corner,x\ny,1\n");
        let fields = vec![FieldDescription::builder("label").range(range("A1")).build().unwrap()];
        let queryable_fields = QueryableFields::new(&fields, &table).unwrap();

        assert_eq!(queryable_fields.query_fields_at(0, 5), expected(&[("label", "corner")]));
        assert_eq!(queryable_fields.query_fields_at(5, 0), expected(&[("label", "corner")]));
        assert!(queryable_fields.query_fields_at(1, 1).is_empty());
    }

    #[test]
    fn row_and_column_range_is_only_for_value() {
        let table = table("a,b\nc,d\n");
        for address in ["A1:B2", "C2:", "A:B", "1:2"] {
            let fields = vec![FieldDescription::builder("x").range(range(address)).build().unwrap()];
            let result = QueryableFields::new(&fields, &table);
            assert!(
                matches!(result, Err(DatasetError::RowAndColumnRange { ref field, .. }) if field == "x"),
                "{address}"
            );

            let fields = vec![FieldDescription::builder(VALUE_FIELD).range(range(address)).build().unwrap()];
            assert!(QueryableFields::new(&fields, &table).is_ok(), "{address}");
        }
    }

    #[test]
    fn overlay_order_column_over_row_over_universal() {
        let table = table("h,col\nrow,1\n");
        let fields = vec![
            FieldDescription::builder("source").value("universal").build().unwrap(),
            FieldDescription::builder("source").range(range("A2:A")).build().unwrap(),
            FieldDescription::builder("source").range(range("B1:1")).build().unwrap(),
        ];
        let queryable_fields = QueryableFields::new(&fields, &table).unwrap();
        assert_eq!(queryable_fields.query_fields_at(1, 1), expected(&[("source", "col")]));

        // Registration order does not change precedence.
        let reversed: Vec<_> = fields.into_iter().rev().collect();
        let queryable_fields = QueryableFields::new(&reversed, &table).unwrap();
        assert_eq!(queryable_fields.query_fields_at(1, 1), expected(&[("source", "col")]));
        assert_eq!(queryable_fields.query_fields_at(1, 7), expected(&[("source", "row")]));
        assert_eq!(queryable_fields.query_fields_at(7, 7), expected(&[("source", "universal")]));
    }

    #[test]
    fn hardcoded_value_ignores_cell_text() {
        let fields = vec![FieldDescription::builder("indicator").range(range("B1")).value("MMR").build().unwrap()];
        for text in ["a,mmr\n", "a,something else\n", "a\n"] {
            let table = table(text);
            let queryable_fields = QueryableFields::new(&fields, &table).unwrap();
            assert_eq!(queryable_fields.query_fields_at(4, 1), expected(&[("indicator", "MMR")]));
        }
    }

    #[test]
    fn regex_misses_are_diagnostics() {
        let table = table("Rate - Urban,Infant Rate\n1,2\n");
        let fields = vec![FieldDescription::builder("settlement")
            .range(range("A1:B1"))
            .pattern(".* - (.*)")
            .build()
            .unwrap()];
        let queryable_fields = QueryableFields::new(&fields, &table).unwrap();

        assert_eq!(queryable_fields.query_fields_at(1, 0), expected(&[("settlement", "Urban")]));
        assert!(queryable_fields.query_fields_at(1, 1).is_empty());
        assert_eq!(
            queryable_fields.diagnostics(),
            &[Diagnostic {
                field: "settlement".to_owned(),
                address: crate::spreadsheet::cell::CellAddress::new(0, 1),
                reason: MissReason::NoMatch,
            }]
        );
    }

    #[test]
    fn value_cells_are_a_set() {
        let table = table("a,b,c\np,1,2\nq,3,4\n");
        let fields = vec![FieldDescription::builder(VALUE_FIELD)
            .ranges(vec![range("B2:"), range("B2:B3"), range("C3")])
            .build()
            .unwrap()];
        let queryable_fields = QueryableFields::new(&fields, &table).unwrap();
        let values: Vec<_> = queryable_fields
            .value_cells()
            .iter()
            .map(|cell| cell.reference())
            .collect();
        assert_eq!(values, vec!["B2", "C2", "B3", "C3"]);
    }

    #[test]
    fn value_field_is_not_indexed() {
        let table = table("a,b\n1,2\n");
        let fields = vec![FieldDescription::builder(VALUE_FIELD).range(range("A2")).build().unwrap()];
        let queryable_fields = QueryableFields::new(&fields, &table).unwrap();
        assert!(queryable_fields.query_fields_at(1, 0).is_empty());
    }

    #[test]
    fn building_twice_gives_identical_answers() {
        let table = table("a,source,c\np,Source 1,2\nq,Source 2,4\n");
        let fields = vec![
            FieldDescription::builder("y").range(range("A2:A")).build().unwrap(),
            FieldDescription::builder("x").range(range("C1:1")).build().unwrap(),
            FieldDescription::builder(VALUE_FIELD).range(range("C2:")).build().unwrap(),
        ];
        let first = QueryableFields::new(&fields, &table).unwrap();
        let second = QueryableFields::new(&fields, &table).unwrap();
        for (row, col) in [(1, 2), (2, 2), (0, 0), (9, 9)] {
            assert_eq!(first.query_fields_at(row, col), second.query_fields_at(row, col));
        }
        assert_eq!(first.value_cells(), second.value_cells());
    }
}
