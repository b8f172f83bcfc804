//! JSON output of a fact sheet.
//!
//! Files are named after the query date, so re-running a date overwrites
//! its previous sheet:
//! ```text
//! json_output_dir/
//! └── 1969-07-20.json
//! ```

use crate::models::FactSheet;
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument};

/// Serialize a [`FactSheet`] as pretty-printed JSON.
pub fn to_json(sheet: &FactSheet) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(sheet)
}

/// Write `sheet` to `{json_output_dir}/{date}.json`, creating the directory.
///
/// # Returns
///
/// The path written, or an error if directory creation or writing fails.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir, date = %sheet.date))]
pub async fn write_fact_sheet(
    sheet: &FactSheet,
    json_output_dir: &str,
) -> Result<PathBuf, Box<dyn Error>> {
    let json = to_json(sheet)?;

    if let Err(e) = fs::create_dir_all(json_output_dir).await {
        error!(error = %e, "Failed to create JSON dir");
        return Err(e.into());
    }

    let path = Path::new(json_output_dir).join(format!("{}.json", sheet.date));
    fs::write(&path, json).await?;
    info!(path = %path.display(), facts = sheet.facts.len(), "Wrote fact sheet");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Fact, Source};
    use chrono::NaiveDate;

    fn sheet() -> FactSheet {
        let fact = Fact::new_until(
            Source::Wikipedia,
            "https://en.wikipedia.org/wiki/July_20",
            "Apollo 11 lands on the Moon",
            "1969",
            2025,
        )
        .unwrap();
        FactSheet::new(NaiveDate::from_ymd_opt(1969, 7, 20).unwrap(), vec![fact])
    }

    #[test]
    fn test_to_json() {
        let json = to_json(&sheet()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["date"], "1969-07-20");
        assert_eq!(value["facts"][0]["source"], "wikipedia");
        assert_eq!(value["facts"][0]["text"], "Apollo 11 lands on the Moon");
    }

    #[tokio::test]
    async fn test_write_fact_sheet_creates_dated_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested");
        let path = write_fact_sheet(&sheet(), out.to_str().unwrap()).await.unwrap();

        assert_eq!(path, out.join("1969-07-20.json"));
        let written = std::fs::read_to_string(&path).unwrap();
        let back: FactSheet = serde_json::from_str(&written).unwrap();
        assert_eq!(back.facts.len(), 1);
    }
}
