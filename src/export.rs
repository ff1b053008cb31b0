use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use crate::data::model::Field;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// CSV export of the current sample
// ---------------------------------------------------------------------------

/// Column headers: the six field labels, the derived values, the results.
pub fn headers() -> Vec<String> {
    let mut headers: Vec<String> = Field::ALL.iter().map(|f| f.label().to_string()).collect();
    headers.extend(
        ["Clay (%)", "Plasticity Index", "OMC (%)", "MDD (g/cm³)"]
            .iter()
            .map(|h| h.to_string()),
    );
    headers
}

/// One row for the current state. Results are blank when there is no prediction.
pub fn record(state: &AppState) -> Vec<String> {
    let mut row: Vec<String> = state.inputs.iter().map(|(_, text)| text.trim().to_string()).collect();
    row.push(state.clay_text());
    row.push(state.plasticity_index_text());
    match state.result {
        Some(p) => {
            row.push(format!("{:.2}", p.omc));
            row.push(format!("{:.2}", p.mdd));
        }
        None => {
            row.push(String::new());
            row.push(String::new());
        }
    }
    row
}

/// Write header + current record as CSV.
pub fn write_csv<W: Write>(state: &AppState, out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(headers()).context("writing CSV header")?;
    writer.write_record(record(state)).context("writing CSV record")?;
    writer.flush().context("flushing CSV")?;
    Ok(())
}

pub fn export_csv(state: &AppState, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    write_csv(state, file)?;
    log::info!("Exported sample to {}", path.display());
    Ok(())
}
