use std::fmt;

use uuid::Uuid;

// ---------------------------------------------------------------------------
// CellValue – a single cell of the uploaded table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring common dataframe dtypes.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Integer(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{}", format_float(*v)),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Null => write!(f, ""),
        }
    }
}

impl CellValue {
    /// Interpret the value as an `f64` for statistics and plotting.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

/// Shortest round-trip form that always keeps a decimal point (`2.0`, `2.5`).
pub fn format_float(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e16 {
        format!("{v:.1}")
    } else {
        format!("{v}")
    }
}

// ---------------------------------------------------------------------------
// Column
// ---------------------------------------------------------------------------

/// Inferred dtype of a whole column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Float,
    Boolean,
    Text,
}

impl ColumnType {
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnType::Integer | ColumnType::Float)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnType::Integer => "int",
            ColumnType::Float => "float",
            ColumnType::Boolean => "bool",
            ColumnType::Text => "text",
        };
        f.write_str(name)
    }
}

/// One named column; every non-null value matches `dtype`.
#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    pub dtype: ColumnType,
    pub values: Vec<CellValue>,
}

impl Column {
    /// Build a column from raw cells, inferring a uniform dtype.
    ///
    /// * no nulls and every cell an integer → `Integer`
    /// * every present cell numeric → `Float` (integers widened)
    /// * every present cell a boolean → `Boolean`
    /// * anything else, including an all-null column → `Text`
    pub fn infer(name: impl Into<String>, cells: Vec<CellValue>) -> Self {
        let present: Vec<&CellValue> = cells.iter().filter(|c| !c.is_null()).collect();
        let has_nulls = present.len() != cells.len();

        let dtype = if present.is_empty() {
            ColumnType::Text
        } else if !has_nulls && present.iter().all(|c| matches!(c, CellValue::Integer(_))) {
            ColumnType::Integer
        } else if present.iter().all(|c| c.as_f64().is_some()) {
            ColumnType::Float
        } else if present.iter().all(|c| matches!(c, CellValue::Bool(_))) {
            ColumnType::Boolean
        } else {
            ColumnType::Text
        };

        let values = cells
            .into_iter()
            .map(|c| match (dtype, c) {
                (_, CellValue::Null) => CellValue::Null,
                (ColumnType::Float, CellValue::Integer(i)) => CellValue::Float(i as f64),
                (ColumnType::Text, CellValue::Text(s)) => CellValue::Text(s),
                (ColumnType::Text, other) => CellValue::Text(other.to_string()),
                (_, other) => other,
            })
            .collect();

        Column {
            name: name.into(),
            dtype,
            values,
        }
    }

    pub fn is_numeric(&self) -> bool {
        self.dtype.is_numeric()
    }

    /// Numeric view of the column; `None` for nulls and non-numeric cells.
    pub fn numeric_values(&self) -> Vec<Option<f64>> {
        self.values.iter().map(CellValue::as_f64).collect()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete uploaded table
// ---------------------------------------------------------------------------

/// Identity of one loaded dataset; derived artifacts carry it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DatasetId(Uuid);

impl fmt::Display for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The full parsed table. Immutable once built.
#[derive(Debug, Clone)]
pub struct Dataset {
    id: DatasetId,
    columns: Vec<Column>,
    n_rows: usize,
}

impl Dataset {
    /// Assemble a dataset from already-inferred columns.
    ///
    /// Columns shorter than the longest one are padded with nulls.
    pub fn from_columns(mut columns: Vec<Column>) -> Self {
        let n_rows = columns.iter().map(Column::len).max().unwrap_or(0);
        for col in &mut columns {
            col.values.resize(n_rows, CellValue::Null);
        }
        Dataset {
            id: DatasetId(Uuid::new_v4()),
            columns,
            n_rows,
        }
    }

    /// Build from a header and raw text rows, inferring each column's dtype.
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let mut cells: Vec<Vec<CellValue>> = vec![Vec::with_capacity(rows.len()); headers.len()];
        for row in rows {
            let mut row = row.into_iter();
            for column in cells.iter_mut() {
                column.push(row.next().unwrap_or(CellValue::Null));
            }
        }
        let columns = headers
            .into_iter()
            .zip(cells)
            .map(|(name, values)| Column::infer(name, values))
            .collect();
        Self::from_columns(columns)
    }

    pub fn id(&self) -> DatasetId {
        self.id
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn numeric_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.is_numeric())
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.n_rows
    }

    /// Whether the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }
}
