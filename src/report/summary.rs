use crate::data::model::{CellValue, Column, ColumnType, Dataset, DatasetId};

/// Returned instead of an empty digest when no column is numeric.
pub const NO_NUMERIC_DATA: &str = "No numeric data available to summarize.";

/// Naive direction of a column: last sample against first sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Increasing,
    Decreasing,
}

impl Trend {
    /// `Increasing` only when both endpoints exist and last > first.
    /// Ties and missing endpoints read as `Decreasing`.
    pub fn of(values: &[Option<f64>]) -> Trend {
        match (values.first().copied().flatten(), values.last().copied().flatten()) {
            (Some(first), Some(last)) if last > first => Trend::Increasing,
            _ => Trend::Decreasing,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Trend::Increasing => "increasing",
            Trend::Decreasing => "decreasing",
        }
    }
}

/// Descriptive statistics of one numeric column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnStats {
    pub name: String,
    pub mean: f64,
    pub min: CellValue,
    pub max: CellValue,
    pub trend: Trend,
}

impl ColumnStats {
    /// `None` for non-numeric columns or columns without a single value.
    pub fn compute(column: &Column) -> Option<Self> {
        if !column.is_numeric() {
            return None;
        }
        let values = column.numeric_values();
        let present: Vec<f64> = values.iter().flatten().copied().collect();
        if present.is_empty() {
            return None;
        }

        let mean = present.iter().sum::<f64>() / present.len() as f64;
        let (min, max) = extremes(column, &present);

        Some(ColumnStats {
            name: column.name.clone(),
            mean,
            min,
            max,
            trend: Trend::of(&values),
        })
    }

    pub fn bullet(&self) -> String {
        format!(
            "- {} has a mean of {:.2}, ranging from {} to {}, and appears to be {}.",
            self.name,
            self.mean,
            self.min,
            self.max,
            self.trend.label()
        )
    }
}

// min/max keep the column's own dtype; integers are compared exactly
fn extremes(column: &Column, present: &[f64]) -> (CellValue, CellValue) {
    if column.dtype == ColumnType::Integer {
        let ints = column.values.iter().filter_map(|v| match v {
            CellValue::Integer(i) => Some(*i),
            _ => None,
        });
        let (min, max) = ints.fold((i64::MAX, i64::MIN), |(lo, hi), i| (lo.min(i), hi.max(i)));
        return (CellValue::Integer(min), CellValue::Integer(max));
    }
    let min = present.iter().copied().fold(f64::INFINITY, f64::min);
    let max = present.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    (CellValue::Float(min), CellValue::Float(max))
}

/// Digest text tagged with the dataset it describes.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub dataset_id: DatasetId,
    pub text: String,
}

/// One bullet per numeric column, or [`NO_NUMERIC_DATA`].
pub fn summarize(dataset: &Dataset) -> Summary {
    let lines: Vec<String> = dataset
        .numeric_columns()
        .filter_map(ColumnStats::compute)
        .map(|stats| stats.bullet())
        .collect();

    let text = if lines.is_empty() {
        NO_NUMERIC_DATA.to_string()
    } else {
        lines.join("\n")
    };

    log::debug!("summarized {} numeric column(s)", lines.len());

    Summary {
        dataset_id: dataset.id(),
        text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_bytes;

    fn dataset(csv: &str) -> Dataset {
        load_bytes(csv.as_bytes(), b',').unwrap()
    }

    fn trend_of(v: &[f64]) -> Trend {
        let values: Vec<Option<f64>> = v.iter().map(|&x| Some(x)).collect();
        Trend::of(&values)
    }

    #[test]
    fn one_bullet_per_numeric_column() {
        let ds = dataset(
            "Month,Revenue,Region,Cost\n\
             Jan,100,North,10.5\n\
             Feb,150,South,12\n\
             Mar,200,East,9.25\n",
        );
        let summary = summarize(&ds);
        let lines: Vec<&str> = summary.text.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "- Revenue has a mean of 150.00, ranging from 100 to 200, and appears to be increasing."
        );
        assert_eq!(
            lines[1],
            "- Cost has a mean of 10.58, ranging from 9.25 to 12.0, and appears to be decreasing."
        );
        assert_eq!(summary.dataset_id, ds.id());
    }

    #[test]
    fn integer_range_is_exact_beyond_f64_precision() {
        let ds = dataset("Orders\n9007199254740993\n1\n");
        let stats = ColumnStats::compute(ds.column("Orders").unwrap()).unwrap();
        assert_eq!(stats.min, CellValue::Integer(1));
        assert_eq!(stats.max, CellValue::Integer(9007199254740993));
        assert!(summarize(&ds)
            .text
            .contains("ranging from 1 to 9007199254740993,"));
    }

    #[test]
    fn mean_is_rounded_to_two_decimals() {
        let ds = dataset("v\n1\n2\n2\n");
        assert!(summarize(&ds).text.contains("mean of 1.67,"));
    }

    #[test]
    fn no_numeric_columns_yields_sentinel() {
        let ds = dataset("Name,Region\nAda,North\nBob,South\n");
        assert_eq!(summarize(&ds).text, NO_NUMERIC_DATA);

        let empty = dataset("a,b\n");
        assert_eq!(summarize(&empty).text, NO_NUMERIC_DATA);
    }

    #[test]
    fn trend_compares_first_and_last_only() {
        assert_eq!(trend_of(&[1.0, 2.0, 3.0]), Trend::Increasing);
        assert_eq!(trend_of(&[3.0, 2.0, 1.0]), Trend::Decreasing);
        assert_eq!(trend_of(&[5.0, 5.0]), Trend::Decreasing);
        assert_eq!(trend_of(&[1.0, 100.0, 0.0, 2.0]), Trend::Increasing);
    }

    #[test]
    fn missing_endpoint_reads_as_decreasing() {
        assert_eq!(Trend::of(&[None, Some(1.0), Some(5.0)]), Trend::Decreasing);
        assert_eq!(Trend::of(&[]), Trend::Decreasing);
    }

    #[test]
    fn nulls_are_skipped_in_statistics() {
        let ds = dataset("v\n2\nNA\n4\n");
        assert_eq!(
            summarize(&ds).text,
            "- v has a mean of 3.00, ranging from 2.0 to 4.0, and appears to be increasing."
        );
    }
}
