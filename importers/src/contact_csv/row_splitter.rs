/// Splits one CSV line into trimmed cells.
///
/// Every `"` toggles the in-quotes state and is dropped, so a comma inside a
/// quoted section stays in the cell. Doubled quotes are not treated as an
/// escape. A trailing comma does not produce a trailing empty cell.
pub fn split_csv_row(row: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut inside_quotes = false;

    for ch in row.chars() {
        match ch {
            '"' => inside_quotes = !inside_quotes,
            ',' if !inside_quotes => {
                cells.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }

    if !current.is_empty() {
        cells.push(current.trim().to_string());
    }

    cells
}
