//! Table creation helpers for CLI output

use prettytable::{Cell, Row, Table, format};

/// Create a table with the given column headers and a clean box format
pub fn create_table(headers: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BOX_CHARS);
    table.set_titles(Row::new(headers.into_iter().map(Cell::new).collect()));
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_table_has_titles() {
        let table = create_table(vec!["A", "B"]);
        let rendered = table.to_string();
        assert!(rendered.contains('A'));
        assert!(rendered.contains('B'));
    }
}
