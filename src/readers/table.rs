use crate::error::{LoadError, Result};
use crate::models::TableKind;
use crate::readers::normalize::{clean_cell, normalize_header};
use crate::utils::constants::FIELD_DELIMITER;
use csv::ReaderBuilder;

/// One data row after structural parsing, with every cell cleaned.
#[derive(Debug, Clone)]
pub struct SourceRow {
    pub line: u64,
    cells: Vec<String>,
}

impl SourceRow {
    /// Cell text for a resolved column; short rows read as empty cells.
    pub fn cell(&self, column: usize) -> &str {
        self.cells.get(column).map(String::as_str).unwrap_or("")
    }

    pub fn optional_cell(&self, column: Option<usize>) -> &str {
        column.map(|c| self.cell(c)).unwrap_or("")
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|c| c.is_empty())
    }
}

/// Semicolon-delimited document split into normalized headers and rows.
#[derive(Debug)]
pub struct DelimitedTable {
    dataset: TableKind,
    headers: Vec<String>,
    rows: Vec<SourceRow>,
}

impl DelimitedTable {
    pub fn parse(text: &str, dataset: TableKind) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .delimiter(FIELD_DELIMITER)
            .has_headers(true)
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers: Vec<String> = reader.headers()?.iter().map(normalize_header).collect();
        if headers.iter().all(|h| h.is_empty()) {
            return Err(LoadError::Empty { dataset });
        }

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            let row = SourceRow {
                line,
                cells: record.iter().map(|c| clean_cell(c).to_string()).collect(),
            };
            if row.is_blank() {
                continue;
            }
            rows.push(row);
        }

        Ok(Self {
            dataset,
            headers,
            rows,
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[SourceRow] {
        &self.rows
    }

    /// First header matching any alias, in alias priority order.
    pub fn find_column(&self, aliases: &[&str]) -> Option<usize> {
        aliases
            .iter()
            .find_map(|alias| self.headers.iter().position(|h| h == alias))
    }

    pub fn require_column(&self, aliases: &[&str], column: &'static str) -> Result<usize> {
        self.find_column(aliases).ok_or(LoadError::MissingColumn {
            dataset: self.dataset,
            column,
        })
    }

    pub fn malformed(&self, row: &SourceRow, column: &'static str, value: &str) -> LoadError {
        LoadError::MalformedKey {
            dataset: self.dataset,
            line: row.line,
            column,
            value: value.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_semicolon_with_decimal_commas() -> Result<()> {
        let text = "Ponto;Profundidade;pH\n1;\"0 a 20 cm\";5,3\n2; 20 a 40 cm ;4,9\n";
        let table = DelimitedTable::parse(text, TableKind::Soil)?;

        assert_eq!(table.headers(), &["ponto", "profundidade", "ph"]);
        assert_eq!(table.rows().len(), 2);
        assert_eq!(table.rows()[0].cell(1), "0 a 20 cm");
        assert_eq!(table.rows()[0].cell(2), "5,3");
        assert_eq!(table.rows()[1].cell(1), "20 a 40 cm");
        Ok(())
    }

    #[test]
    fn test_blank_and_short_rows() -> Result<()> {
        let text = "Ponto;Profundidade;pH\n;;\n3;0 a 20 cm\n";
        let table = DelimitedTable::parse(text, TableKind::Soil)?;

        assert_eq!(table.rows().len(), 1);
        assert_eq!(table.rows()[0].line, 3);
        assert_eq!(table.rows()[0].cell(2), "");
        assert_eq!(table.rows()[0].optional_cell(None), "");
        Ok(())
    }

    #[test]
    fn test_empty_document() {
        let result = DelimitedTable::parse("", TableKind::Weather);
        assert!(matches!(
            result,
            Err(LoadError::Empty {
                dataset: TableKind::Weather
            })
        ));
    }

    #[test]
    fn test_column_resolution() -> Result<()> {
        let table = DelimitedTable::parse("Data;Hora (UTC)\n", TableKind::Weather)?;
        assert_eq!(table.find_column(&["hora (utc)", "hora"]), Some(1));
        assert_eq!(table.find_column(&["chuva (mm)"]), None);
        assert!(matches!(
            table.require_column(&["ponto"], "Ponto"),
            Err(LoadError::MissingColumn { column: "Ponto", .. })
        ));
        Ok(())
    }
}
