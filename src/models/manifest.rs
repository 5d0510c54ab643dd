//! Tabular manifests of labelled recordings
//!
//! Every manifest has the columns `path, age, gender, fs` followed by its label
//! codes. Manifests built in one run share the same label columns so that
//! downstream training can slice labels by fixed index.

use std::sync::Arc;

use arrow::array::{ArrayRef, Int32Array, StringArray, UInt8Array, UInt32Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;

use crate::error::Result;
use crate::models::record::Record;

/// Columns preceding the label columns in every manifest
pub const BASE_COLUMNS: [&str; 4] = ["path", "age", "gender", "fs"];

/// An ordered collection of records sharing one column layout
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Manifest {
    labels: Vec<String>,
    records: Vec<Record>,
}

impl Manifest {
    /// Create an empty manifest with the given label columns
    #[must_use]
    pub fn new(labels: Vec<String>) -> Self {
        Self {
            labels,
            records: Vec::new(),
        }
    }

    /// Label column codes in order
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Rows in order
    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Full column list: base columns followed by label codes
    #[must_use]
    pub fn columns(&self) -> Vec<String> {
        BASE_COLUMNS
            .iter()
            .map(ToString::to_string)
            .chain(self.labels.iter().cloned())
            .collect()
    }

    /// Number of rows
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the manifest has no rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Append a row
    ///
    /// The row's indicator vector must be aligned with [`Manifest::labels`].
    pub fn push(&mut self, record: Record) {
        debug_assert_eq!(record.labels.len(), self.labels.len());
        self.records.push(record);
    }

    /// Remove a label column from the manifest and from every row
    ///
    /// Returns `false` when the manifest has no such column.
    pub fn drop_label(&mut self, code: &str) -> bool {
        let Some(idx) = self.labels.iter().position(|label| label == code) else {
            return false;
        };

        self.labels.remove(idx);
        for record in &mut self.records {
            record.labels.remove(idx);
        }
        true
    }

    /// Indices of label columns with at least one positive row
    #[must_use]
    pub fn positive_label_columns(&self) -> Vec<usize> {
        (0..self.labels.len())
            .filter(|&col| self.records.iter().any(|r| r.labels[col] != 0))
            .collect()
    }

    /// Row-major indicator matrix restricted to the given label columns
    #[must_use]
    pub fn label_matrix(&self, columns: &[usize]) -> Vec<Vec<bool>> {
        self.records
            .iter()
            .map(|r| columns.iter().map(|&col| r.labels[col] != 0).collect())
            .collect()
    }

    /// New manifest holding the given rows, in the given order
    #[must_use]
    pub fn select_rows(&self, rows: &[usize]) -> Self {
        Self {
            labels: self.labels.clone(),
            records: rows.iter().map(|&idx| self.records[idx].clone()).collect(),
        }
    }

    /// Arrow schema matching [`Manifest::columns`]
    #[must_use]
    pub fn schema(&self) -> Schema {
        let mut fields = vec![
            Field::new(BASE_COLUMNS[0], DataType::Utf8, false),
            Field::new(BASE_COLUMNS[1], DataType::Int32, false),
            Field::new(BASE_COLUMNS[2], DataType::Utf8, false),
            Field::new(BASE_COLUMNS[3], DataType::UInt32, false),
        ];
        fields.extend(
            self.labels
                .iter()
                .map(|code| Field::new(code, DataType::UInt8, false)),
        );
        Schema::new(fields)
    }

    /// Convert the manifest into a single Arrow record batch
    pub fn to_record_batch(&self) -> Result<RecordBatch> {
        let paths = StringArray::from_iter_values(
            self.records
                .iter()
                .map(|r| r.path.to_string_lossy().into_owned()),
        );
        let ages = Int32Array::from_iter_values(self.records.iter().map(|r| r.age));
        let genders = StringArray::from_iter_values(self.records.iter().map(|r| r.sex.as_str()));
        let fs = UInt32Array::from_iter_values(self.records.iter().map(|r| r.fs));

        let mut columns: Vec<ArrayRef> = vec![
            Arc::new(paths),
            Arc::new(ages),
            Arc::new(genders),
            Arc::new(fs),
        ];
        for col in 0..self.labels.len() {
            columns.push(Arc::new(UInt8Array::from_iter_values(
                self.records.iter().map(|r| r.labels[col]),
            )));
        }

        Ok(RecordBatch::try_new(Arc::new(self.schema()), columns)?)
    }
}
