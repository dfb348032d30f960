// src/file/export.rs

use std::io::{Read, Write};
use std::path::Path;
use anyhow::{Result, Context, anyhow};
use csv::{ReaderBuilder, WriterBuilder};
use serde::{Serialize, Deserialize};
use crate::analysis::{TrialRecord, TrialTable};

/// Header of the downloadable results table, in column order.
pub const EXPORT_COLUMNS: [&str; 8] = [
    "Duration_Months",
    "TCO_OneOff",
    "Managed_Service_Annual",
    "TCO_Total",
    "Profit",
    "Profit_Margin_%",
    "Scope_SP",
    "Sprints",
];

/// One exported trial, values rounded to 2 decimal places.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ExportRow {
    #[serde(rename = "Duration_Months")]
    pub duration_months: f64,
    #[serde(rename = "TCO_OneOff")]
    pub tco_one_off: f64,
    #[serde(rename = "Managed_Service_Annual")]
    pub managed_service_annual: f64,
    #[serde(rename = "TCO_Total")]
    pub tco_total: f64,
    #[serde(rename = "Profit")]
    pub profit: f64,
    #[serde(rename = "Profit_Margin_%")]
    pub profit_margin: f64,
    #[serde(rename = "Scope_SP")]
    pub scope: f64,
    #[serde(rename = "Sprints")]
    pub sprints: f64,
}

impl From<&TrialRecord> for ExportRow {
    fn from(record: &TrialRecord) -> Self {
        Self {
            duration_months: round2(record.duration_months),
            tco_one_off: round2(record.tco_one_off),
            managed_service_annual: round2(record.managed_service_annual),
            tco_total: round2(record.tco_total),
            profit: round2(record.profit),
            profit_margin: round2(record.profit_margin),
            scope: round2(record.final_scope),
            sprints: round2(record.sprints),
        }
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn write_trial_export<W: Write>(table: &TrialTable, writer: W) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    // Written explicitly so an empty table still carries the header
    writer.write_record(EXPORT_COLUMNS)?;
    for record in table {
        writer.serialize(ExportRow::from(record))?;
    }

    writer.flush()?;
    Ok(())
}

pub fn export_to_path<P: AsRef<Path>>(table: &TrialTable, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create export file: {}", path.display()))?;
    write_trial_export(table, file)
        .with_context(|| format!("Failed to write export file: {}", path.display()))
}

pub fn read_trial_export<R: Read>(reader: R) -> Result<Vec<ExportRow>> {
    let mut reader = ReaderBuilder::new().from_reader(reader);

    let headers = reader.headers()?.clone();
    if headers.iter().ne(EXPORT_COLUMNS.iter().copied()) {
        return Err(anyhow!(
            "Unexpected export header: {}",
            headers.iter().collect::<Vec<_>>().join(",")
        ));
    }

    reader.deserialize()
        .enumerate()
        .map(|(i, row)| row.with_context(|| format!("Failed to parse export row {}", i + 1)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{SimulationRunner, TrialColumn};
    use crate::config::ProjectInputs;

    #[test]
    fn rounding_keeps_two_decimals() {
        assert_eq!(round2(12.345_678), 12.35);
        assert_eq!(round2(-0.004), 0.0);
        assert_eq!(round2(500_000.0), 500_000.0);
    }

    #[test]
    fn empty_table_exports_header_only() {
        let mut buffer = Vec::new();
        write_trial_export(&TrialTable::default(), &mut buffer).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text.trim_end(), EXPORT_COLUMNS.join(","));
        assert!(read_trial_export(text.as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn export_parses_back_within_rounding() {
        let inputs = ProjectInputs { trials: 1_000, ..ProjectInputs::default() };
        let result = SimulationRunner::from_inputs(&inputs).unwrap().run().unwrap();

        let mut buffer = Vec::new();
        write_trial_export(result.trials(), &mut buffer).unwrap();
        let rows = read_trial_export(buffer.as_slice()).unwrap();

        assert_eq!(rows.len(), result.trials().len());
        for (row, record) in rows.iter().zip(result.trials()) {
            let pairs = [
                (row.duration_months, TrialColumn::DurationMonths),
                (row.tco_one_off, TrialColumn::TcoOneOff),
                (row.managed_service_annual, TrialColumn::ManagedServiceAnnual),
                (row.tco_total, TrialColumn::TcoTotal),
                (row.profit, TrialColumn::Profit),
                (row.profit_margin, TrialColumn::ProfitMarginPct),
                (row.scope, TrialColumn::ScopeSp),
                (row.sprints, TrialColumn::Sprints),
            ];
            for (exported, column) in pairs {
                let original = column.value(record);
                assert!(
                    (exported - original).abs() <= 0.005 + 1e-9 * original.abs(),
                    "{}: {} vs {}",
                    column.label(),
                    exported,
                    original
                );
            }
        }
    }

    #[test]
    fn foreign_header_is_rejected() {
        let csv = "Scope_SP,Sprints\n500,25\n";
        assert!(read_trial_export(csv.as_bytes()).is_err());
    }
}
