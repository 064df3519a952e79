use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, ArrayRef, FixedSizeListArray, FixedSizeListBuilder, Float32Array, Float64Array,
    Float64Builder, ListArray,
};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use ndarray::{Array1, Array2};
use parquet::arrow::ArrowWriter;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::{Deserialize, Serialize};

use crate::error::EmissivityError;

/// Name of the manifest file inside a table-set directory.
const MANIFEST: &str = "tableset.json";

// ---------------------------------------------------------------------------
// Column / Table – named numeric columns of equal length
// ---------------------------------------------------------------------------

/// A single table column: one value per row, or a fixed-width vector per row.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Scalar(Array1<f64>),
    /// Shape `(rows, width)`.
    Vector(Array2<f64>),
}

impl Column {
    pub fn n_rows(&self) -> usize {
        match self {
            Column::Scalar(values) => values.len(),
            Column::Vector(values) => values.nrows(),
        }
    }
}

impl From<Array1<f64>> for Column {
    fn from(values: Array1<f64>) -> Self {
        Column::Scalar(values)
    }
}

impl From<Array2<f64>> for Column {
    fn from(values: Array2<f64>) -> Self {
        Column::Vector(values)
    }
}

/// A named table with ordered, equal-length columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    name: String,
    columns: Vec<(String, Column)>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of rows, or `None` for a table without columns.
    pub fn n_rows(&self) -> Option<usize> {
        self.columns.first().map(|(_, c)| c.n_rows())
    }

    /// Append a column. It must match the row count of existing columns and
    /// must not reuse a column name.
    pub fn add_column(
        &mut self,
        name: impl Into<String>,
        column: impl Into<Column>,
    ) -> Result<(), EmissivityError> {
        let name = name.into();
        let column = column.into();
        if let Some(rows) = self.n_rows() {
            if column.n_rows() != rows {
                return Err(EmissivityError::shape(
                    "column",
                    format!(
                        "'{name}' has {} rows but table '{}' has {rows}",
                        column.n_rows(),
                        self.name
                    ),
                ));
            }
        }
        if self.column(&name).is_some() {
            return Err(EmissivityError::shape(
                "column",
                format!("'{name}' already exists in table '{}'", self.name),
            ));
        }
        self.columns.push((name, column));
        Ok(())
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|(n, _)| n == name).map(|(_, c)| c)
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.columns.iter().map(|(n, c)| (n.as_str(), c))
    }
}

// ---------------------------------------------------------------------------
// TableSet – keywords plus named tables
// ---------------------------------------------------------------------------

/// A set of named tables sharing a string keyword store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableSet {
    keywords: BTreeMap<String, String>,
    tables: Vec<Table>,
}

/// On-disk listing of keywords and table order.
#[derive(Debug, Serialize, Deserialize)]
struct Manifest {
    keywords: BTreeMap<String, String>,
    tables: Vec<String>,
}

impl TableSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a keyword, replacing any previous value.
    pub fn add_keyword(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.keywords.insert(key.into(), value.into());
    }

    pub fn keyword(&self, key: &str) -> Option<&str> {
        self.keywords.get(key).map(String::as_str)
    }

    pub fn keywords(&self) -> &BTreeMap<String, String> {
        &self.keywords
    }

    /// Add a table. A table with the same name is replaced.
    pub fn append(&mut self, table: Table) {
        if let Some(existing) = self.tables.iter_mut().find(|t| t.name == table.name) {
            *existing = table;
        } else {
            self.tables.push(table);
        }
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    /// Write the set into `dir`: a `tableset.json` manifest plus one parquet
    /// file per table.
    pub fn write_dir(&self, dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating table-set directory {}", dir.display()))?;

        for table in &self.tables {
            let path = dir.join(format!("{}.parquet", table.name));
            write_table(table, &path)
                .with_context(|| format!("writing table '{}'", table.name))?;
        }

        let manifest = Manifest {
            keywords: self.keywords.clone(),
            tables: self.tables.iter().map(|t| t.name.clone()).collect(),
        };
        let text = serde_json::to_string_pretty(&manifest).context("encoding manifest")?;
        std::fs::write(dir.join(MANIFEST), text).context("writing manifest")?;
        Ok(())
    }

    /// Read a set previously written with [`TableSet::write_dir`].
    pub fn read_dir(dir: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(dir.join(MANIFEST))
            .with_context(|| format!("reading manifest in {}", dir.display()))?;
        let manifest: Manifest = serde_json::from_str(&text).context("parsing manifest")?;

        let mut set = TableSet {
            keywords: manifest.keywords,
            tables: Vec::with_capacity(manifest.tables.len()),
        };
        for name in manifest.tables {
            let path = dir.join(format!("{name}.parquet"));
            let table = read_table(&name, &path).with_context(|| format!("reading table '{name}'"))?;
            set.tables.push(table);
        }
        Ok(set)
    }
}

// ---------------------------------------------------------------------------
// Parquet encoding of a single table
// ---------------------------------------------------------------------------

fn write_table(table: &Table, path: &Path) -> Result<()> {
    if table.n_rows().is_none() {
        bail!("table has no columns");
    }

    let mut fields = Vec::new();
    let mut arrays: Vec<ArrayRef> = Vec::new();

    for (name, column) in table.columns() {
        let array: ArrayRef = match column {
            Column::Scalar(values) => Arc::new(Float64Array::from_iter_values(values.iter().copied())),
            Column::Vector(values) => {
                let width = i32::try_from(values.ncols()).context("vector column too wide")?;
                let mut builder = FixedSizeListBuilder::new(Float64Builder::new(), width);
                for row in values.rows() {
                    builder.values().append_slice(&row.to_vec());
                    builder.append(true);
                }
                Arc::new(builder.finish())
            }
        };
        fields.push(Field::new(name, array.data_type().clone(), false));
        arrays.push(array);
    }

    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(schema.clone(), arrays).context("building record batch")?;

    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing record batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn read_table(name: &str, path: &Path) -> Result<Table> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let schema = builder.schema().clone();
    let reader = builder.build().context("building parquet reader")?;

    // Per column: flattened values and row width (None for scalar columns).
    let mut buffers: Vec<(Vec<f64>, Option<usize>)> =
        schema.fields().iter().map(|_| (Vec::new(), None)).collect();
    let mut n_rows = 0;

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        n_rows += batch.num_rows();
        for (idx, (values, width)) in buffers.iter_mut().enumerate() {
            let col = batch.column(idx);
            let field_name = schema.field(idx).name();
            match col.data_type() {
                DataType::FixedSizeList(_, _) | DataType::List(_) => {
                    for row in 0..batch.num_rows() {
                        let row_values = extract_f64_list(col, row)
                            .with_context(|| format!("Row {row}: failed to read '{field_name}'"))?;
                        if let Some(w) = *width {
                            if w != row_values.len() {
                                bail!(
                                    "Column '{field_name}' has rows of width {w} and {}",
                                    row_values.len()
                                );
                            }
                        }
                        *width = Some(row_values.len());
                        values.extend(row_values);
                    }
                }
                _ => values.extend(extract_f64_values(col).with_context(|| {
                    format!("failed to read column '{field_name}'")
                })?),
            }
        }
    }

    let mut table = Table::new(name);
    for (field, (values, width)) in schema.fields().iter().zip(buffers) {
        let column = match width {
            Some(w) => Column::Vector(
                Array2::from_shape_vec((n_rows, w), values).context("reshaping vector column")?,
            ),
            None if schema_is_list(field.data_type()) => {
                // Vector column with no rows.
                Column::Vector(Array2::zeros((0, list_width(field.data_type()))))
            }
            None => Column::Scalar(Array1::from_vec(values)),
        };
        table.add_column(field.name().clone(), column)?;
    }
    Ok(table)
}

fn schema_is_list(data_type: &DataType) -> bool {
    matches!(data_type, DataType::FixedSizeList(_, _) | DataType::List(_))
}

fn list_width(data_type: &DataType) -> usize {
    match data_type {
        DataType::FixedSizeList(_, w) => usize::try_from(*w).unwrap_or(0),
        _ => 0,
    }
}

// -- Arrow helpers --

/// Extract a `Vec<f64>` from a FixedSizeList or List column at the given row.
fn extract_f64_list(col: &ArrayRef, row: usize) -> Result<Vec<f64>> {
    if col.is_null(row) {
        bail!("null value in list column");
    }

    let values_array = match col.data_type() {
        DataType::FixedSizeList(_, _) => {
            let list_arr = col
                .as_any()
                .downcast_ref::<FixedSizeListArray>()
                .context("expected FixedSizeListArray")?;
            list_arr.value(row)
        }
        DataType::List(_) => {
            let list_arr = col
                .as_any()
                .downcast_ref::<ListArray>()
                .context("expected ListArray")?;
            list_arr.value(row)
        }
        other => bail!("Expected FixedSizeList or List column, got {other:?}"),
    };

    extract_f64_values(&values_array)
}

/// Read a Float64 (or Float32) array without nulls.
fn extract_f64_values(col: &ArrayRef) -> Result<Vec<f64>> {
    if col.null_count() > 0 {
        bail!("column contains null values");
    }
    if let Some(f64_arr) = col.as_any().downcast_ref::<Float64Array>() {
        Ok(f64_arr.values().to_vec())
    } else if let Some(f32_arr) = col.as_any().downcast_ref::<Float32Array>() {
        Ok(f32_arr.values().iter().map(|&v| v as f64).collect())
    } else {
        bail!("Column type is {:?}, expected Float64 or Float32", col.data_type())
    }
}
