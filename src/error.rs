use std::path::PathBuf;

/// Fatal problems with the input. None of these are retried.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("cannot open input file {}", .path.display())]
    InputNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("schema error in column `{column}`: {detail}")]
    Schema { column: String, detail: String },

    #[error("row {row}, column `{column}`: invalid value {value:?} ({reason})")]
    Value {
        row: u64,
        column: String,
        value: String,
        reason: String,
    },

    #[error("malformed CSV at row {row}")]
    Csv {
        row: u64,
        #[source]
        source: csv::Error,
    },
}

impl AnalysisError {
    pub fn value(row: u64, column: &str, value: &str, reason: impl Into<String>) -> Self {
        AnalysisError::Value {
            row,
            column: column.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_error_names_row_and_column() {
        let err = AnalysisError::value(12, "status", "ARCHIVED", "unknown status");
        let message = err.to_string();
        assert!(message.contains("row 12"));
        assert!(message.contains("`status`"));
        assert!(message.contains("ARCHIVED"));
    }

    #[test]
    fn schema_error_names_column() {
        let err = AnalysisError::Schema {
            column: "createdDate".to_string(),
            detail: "column is missing from the header".to_string(),
        };
        assert!(err.to_string().contains("createdDate"));
    }

    #[test]
    fn io_cause_is_chained_not_repeated() {
        let err = AnalysisError::InputNotFound {
            path: PathBuf::from("/data/ideas.csv"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone missing"),
        };
        assert_eq!(err.to_string(), "cannot open input file /data/ideas.csv");

        let chained = format!("{:#}", anyhow::Error::from(err));
        assert_eq!(chained.matches("gone missing").count(), 1);
    }
}
