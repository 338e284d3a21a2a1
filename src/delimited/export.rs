use std::{fs::File, io::Write, path::Path};

use ::csv::Writer;

use crate::{
    errors::{Result, WorkbenchError},
    models::dataset::Dataset,
};

/// Writes the header and every row of `dataset` as CSV.
pub fn write_csv<W: Write>(dataset: &Dataset, writer: W) -> Result<()> {
    let mut wtr = Writer::from_writer(writer);

    if !dataset.columns.is_empty() {
        wtr.write_record(&dataset.columns)
            .map_err(|e| WorkbenchError::Export(e.to_string()))?;
    }

    for row in &dataset.rows {
        let record: Vec<&str> = dataset
            .columns
            .iter()
            .map(|column| row.get(column).map(String::as_str).unwrap_or(""))
            .collect();
        wtr.write_record(&record)
            .map_err(|e| WorkbenchError::Export(e.to_string()))?;
    }

    wtr.flush().map_err(|e| WorkbenchError::Export(e.to_string()))?;

    Ok(())
}

pub fn to_csv_string(dataset: &Dataset) -> Result<String> {
    let mut buffer = Vec::new();
    write_csv(dataset, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| WorkbenchError::Export(e.to_string()))
}

/// Data export from a dataset to a CSV file.
pub fn export_to_csv(dataset: &Dataset, file_path: &Path) -> Result<()> {
    let file = File::create(file_path).map_err(|e| WorkbenchError::Export(e.to_string()))?;
    write_csv(dataset, file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delimited::parser::parse_csv;

    #[test]
    fn test_quotes_fields_that_need_it() {
        let dataset = parse_csv("a,b\n\"x,y\",plain\n");
        let text = to_csv_string(&dataset).unwrap();
        assert_eq!(text, "a,b\n\"x,y\",plain\n");
    }

    #[test]
    fn test_export_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.csv");
        let dataset = parse_csv("name,email\nAlice,alice@example.com\nBob,bob@example.com");

        export_to_csv(&dataset, &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("Alice"));
        assert!(written.contains("Bob"));
        assert_eq!(parse_csv(&written), dataset);
    }
}
