use crate::dataset::DataPoint;
use crate::dataset::DatasetError;
use crate::dataset::Diagnostic;
use crate::dataset::ExtractOptions;
use crate::dataset::QueryableFields;
use crate::dataset::VALUE_FIELD;
use crate::description::TableDescription;
use crate::spreadsheet::Table;

const DATA_FILE_TYPE_FIELD: &str = "meta.dataFileType";
const DATA_FILE_TYPE: &str = "table";
const ROW_FIELD: &str = "meta.addressInDataFile.row";
const COLUMN_FIELD: &str = "meta.addressInDataFile.column";

/// Extracts data points from a table according to its description.
///
/// All work happens at construction; the result is then read-only.
#[derive(Clone, Debug)]
pub struct DatasetAdapter {
    data_points: Vec<DataPoint>,
    queryable_fields: QueryableFields,
}

impl DatasetAdapter {
    pub fn new<T: Table + ?Sized>(
        table: &T,
        description: &TableDescription,
        options: &ExtractOptions,
    ) -> Result<Self, DatasetError> {
        let queryable_fields = QueryableFields::new(description.fields(), table)?;
        let data_points = build_data_points(&queryable_fields, options);
        log::debug!("Extracted {} data points", data_points.len());
        Ok(Self {
            data_points,
            queryable_fields,
        })
    }

    /// Merges several descriptions, in order, and extracts with the result.
    pub fn from_descriptions<T: Table + ?Sized>(
        table: &T,
        descriptions: &[TableDescription],
        options: &ExtractOptions,
    ) -> Result<Self, DatasetError> {
        let description = TableDescription::merge_all(descriptions.iter().cloned());
        Self::new(table, &description, options)
    }

    pub fn data(&self) -> &[DataPoint] {
        &self.data_points
    }

    pub fn into_data(self) -> Vec<DataPoint> {
        self.data_points
    }

    /// Cells whose field value could not be resolved.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.queryable_fields.diagnostics()
    }
}

/// Emits one data point per value cell, in row-major order.
///
/// The `value` field is always the cell's own text, replacing anything the
/// description produced under that name.
pub fn build_data_points(queryable_fields: &QueryableFields, options: &ExtractOptions) -> Vec<DataPoint> {
    queryable_fields
        .value_cells()
        .iter()
        .map(|cell| {
            let mut fields = queryable_fields.query_fields_at(cell.row, cell.col);
            fields.insert(VALUE_FIELD.to_owned(), cell.text().unwrap_or_default().to_owned());
            if options.include_metadata {
                fields.insert(DATA_FILE_TYPE_FIELD.to_owned(), DATA_FILE_TYPE.to_owned());
                fields.insert(ROW_FIELD.to_owned(), cell.row.to_string());
                fields.insert(COLUMN_FIELD.to_owned(), cell.col.to_string());
            }
            log::debug!("{} -> {:?}", cell, fields);
            DataPoint::from(fields)
        })
        .collect()
}
