use csv::WriterBuilder;

pub const SAMPLE_FILE_NAME: &str = "contacts-sample.csv";

const SAMPLE_HEADERS: [&str; 4] = ["name", "phone", "email", "tags"];
const SAMPLE_ROW: [&str; 4] = ["John Doe", "+1234567890", "john@example.com", "VIP;Lead"];

/// Builds the downloadable example file for contact imports.
pub fn sample_csv() -> anyhow::Result<String> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(SAMPLE_HEADERS)?;
    writer.write_record(SAMPLE_ROW)?;

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush sample CSV: {}", e.error()))?;
    Ok(String::from_utf8(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_layout() {
        let sample = sample_csv().unwrap();
        let mut lines = sample.lines();

        assert_eq!(lines.next(), Some("name,phone,email,tags"));
        assert_eq!(
            lines.next(),
            Some("John Doe,+1234567890,john@example.com,VIP;Lead")
        );
        assert_eq!(lines.next(), None);
    }
}
