//! Per-rank aggregate tables on disk
//!
//! Each rank is stored as `<dir>/<rank>.parquet` with one row per distinct
//! lineage at that rank:
//!
//! | column                    | type      | nullable |
//! |---------------------------|-----------|----------|
//! | `domain` … `<rank>`       | Utf8      | no       |
//! | `mean`, `median`          | Float64   | no       |
//! | `min`, `max`              | Float64   | no       |
//! | `std`                     | Float64   | yes      |
//! | `count`                   | UInt64    | no       |
//! | `range`                   | Float64   | no       |
//! | `se`                      | Float64   | yes      |

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, Float64Array, StringArray, UInt64Array};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use tracing::{debug, instrument};

use crate::error::{PhydonError, Result};
use crate::types::{AggregateRow, Rank, SummaryStats};

/// Extension of the per-rank table files
pub const TABLE_EXTENSION: &str = "parquet";

/// Arrow schema of the table for `rank`
pub fn table_schema(rank: Rank) -> SchemaRef {
    let mut fields: Vec<Field> = rank
        .lineage()
        .iter()
        .map(|r| Field::new(r.as_str(), DataType::Utf8, false))
        .collect();

    fields.extend([
        Field::new("mean", DataType::Float64, false),
        Field::new("median", DataType::Float64, false),
        Field::new("min", DataType::Float64, false),
        Field::new("max", DataType::Float64, false),
        Field::new("std", DataType::Float64, true),
        Field::new("count", DataType::UInt64, false),
        Field::new("range", DataType::Float64, false),
        Field::new("se", DataType::Float64, true),
    ]);

    Arc::new(Schema::new(fields))
}

/// Directory of per-rank Parquet tables
#[derive(Debug, Clone)]
pub struct TableStore {
    dir: PathBuf,
}

impl TableStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding the table for `rank`
    pub fn path(&self, rank: Rank) -> PathBuf {
        self.dir
            .join(format!("{}.{}", rank.as_str(), TABLE_EXTENSION))
    }

    pub fn exists(&self, rank: Rank) -> bool {
        self.path(rank).is_file()
    }

    /// Write the table for `rank`, replacing any previous build
    #[instrument(skip(self, rows), fields(rank = %rank, rows = rows.len()))]
    pub fn write(&self, rank: Rank, rows: &[AggregateRow]) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;

        let schema = table_schema(rank);
        let batch = rows_to_batch(rank, rows, schema.clone())?;

        let path = self.path(rank);
        let file = File::create(&path)?;
        let mut writer = ArrowWriter::try_new(file, schema, None)?;
        writer.write(&batch)?;
        writer.close()?;

        debug!(path = %path.display(), "Wrote aggregate table");
        Ok(path)
    }

    /// Read the table for `rank`.
    ///
    /// Any failure (missing file, unreadable file, unexpected schema) is
    /// reported as [`PhydonError::NotBuilt`].
    #[instrument(skip(self), fields(rank = %rank))]
    pub fn read(&self, rank: Rank) -> Result<Vec<AggregateRow>> {
        let path = self.path(rank);
        if !path.is_file() {
            return Err(PhydonError::not_built(
                rank,
                format!("{} not found", path.display()),
            ));
        }

        let rows = read_table(&path, rank)
            .map_err(|e| PhydonError::not_built(rank, format!("{}: {}", path.display(), e)))?;

        debug!(rows = rows.len(), "Read aggregate table");
        Ok(rows)
    }
}

fn rows_to_batch(rank: Rank, rows: &[AggregateRow], schema: SchemaRef) -> Result<RecordBatch> {
    let mut columns: Vec<ArrayRef> = Vec::with_capacity(schema.fields().len());

    for depth in 0..=rank.depth() {
        let names = rows.iter().map(|row| {
            row.lineage
                .get(depth)
                .map(String::as_str)
                .unwrap_or_default()
        });
        columns.push(Arc::new(StringArray::from_iter_values(names)));
    }

    let float_column = |f: fn(&SummaryStats) -> f64| -> ArrayRef {
        Arc::new(Float64Array::from(
            rows.iter().map(|row| f(&row.stats)).collect::<Vec<_>>(),
        ))
    };
    let nullable_column = |f: fn(&SummaryStats) -> Option<f64>| -> ArrayRef {
        Arc::new(Float64Array::from(
            rows.iter().map(|row| f(&row.stats)).collect::<Vec<_>>(),
        ))
    };

    columns.push(float_column(|s| s.mean));
    columns.push(float_column(|s| s.median));
    columns.push(float_column(|s| s.min));
    columns.push(float_column(|s| s.max));
    columns.push(nullable_column(|s| s.std));
    columns.push(Arc::new(UInt64Array::from(
        rows.iter().map(|row| row.stats.count).collect::<Vec<_>>(),
    )));
    columns.push(float_column(|s| s.range));
    columns.push(nullable_column(|s| s.se));

    Ok(RecordBatch::try_new(schema, columns)?)
}

fn read_table(path: &Path, rank: Rank) -> Result<Vec<AggregateRow>> {
    let file = File::open(path)?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

    let mut rows = Vec::new();
    for batch in reader {
        let batch = batch?;
        rows.extend(batch_to_rows(&batch, rank)?);
    }

    Ok(rows)
}

fn batch_to_rows(batch: &RecordBatch, rank: Rank) -> Result<Vec<AggregateRow>> {
    let lineage_columns = rank
        .lineage()
        .iter()
        .map(|r| typed_column::<StringArray>(batch, r.as_str()))
        .collect::<Result<Vec<_>>>()?;

    let mean = typed_column::<Float64Array>(batch, "mean")?;
    let median = typed_column::<Float64Array>(batch, "median")?;
    let min = typed_column::<Float64Array>(batch, "min")?;
    let max = typed_column::<Float64Array>(batch, "max")?;
    let std_dev = typed_column::<Float64Array>(batch, "std")?;
    let count = typed_column::<UInt64Array>(batch, "count")?;
    let range = typed_column::<Float64Array>(batch, "range")?;
    let se = typed_column::<Float64Array>(batch, "se")?;

    let optional = |column: &Float64Array, i: usize| {
        if column.is_null(i) {
            None
        } else {
            Some(column.value(i))
        }
    };

    let mut rows = Vec::with_capacity(batch.num_rows());
    for i in 0..batch.num_rows() {
        let mut lineage = Vec::with_capacity(lineage_columns.len());
        for column in &lineage_columns {
            if column.is_null(i) {
                return Err(PhydonError::schema(format!(
                    "null lineage value in row {} of the {} table",
                    i, rank
                )));
            }
            lineage.push(column.value(i).to_string());
        }

        rows.push(AggregateRow {
            rank,
            lineage,
            stats: SummaryStats {
                mean: mean.value(i),
                median: median.value(i),
                min: min.value(i),
                max: max.value(i),
                std: optional(std_dev, i),
                count: count.value(i),
                range: range.value(i),
                se: optional(se, i),
            },
        });
    }

    Ok(rows)
}

fn typed_column<'a, T: Array + 'static>(batch: &'a RecordBatch, name: &str) -> Result<&'a T> {
    batch
        .column_by_name(name)
        .ok_or_else(|| PhydonError::schema(format!("missing column '{}'", name)))?
        .as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| PhydonError::schema(format!("column '{}' has an unexpected type", name)))
}
