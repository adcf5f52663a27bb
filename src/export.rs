use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::data::model::{DataStore, Table};

// ---------------------------------------------------------------------------
// Zip export of the loaded datasets
// ---------------------------------------------------------------------------

/// Archive index written alongside the CSVs.
#[derive(Serialize)]
struct Manifest<'a> {
    geographies: &'a [String],
    datasets: Vec<DatasetEntry<'a>>,
}

#[derive(Serialize)]
struct DatasetEntry<'a> {
    name: &'a str,
    rows: usize,
}

/// Serialize every loaded dataset to `<name>.csv` inside a single zip at
/// `path`, plus a small `manifest.json` index. Serialization goes from the
/// in-memory tables, so the export works regardless of the on-disk source
/// format.
pub fn export_zip(store: &DataStore, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default();

    let manifest = Manifest {
        geographies: store.geographies(),
        datasets: store
            .tables()
            .map(|(name, table)| DatasetEntry {
                name,
                rows: table.len(),
            })
            .collect(),
    };
    zip.start_file("manifest.json", options)
        .context("starting manifest entry")?;
    let manifest_bytes =
        serde_json::to_vec_pretty(&manifest).context("serializing manifest")?;
    zip.write_all(&manifest_bytes)
        .context("writing manifest entry")?;

    for (name, table) in store.tables() {
        zip.start_file(format!("{name}.csv"), options)
            .with_context(|| format!("starting zip entry for '{name}'"))?;
        let bytes = table_to_csv(table).with_context(|| format!("serializing '{name}'"))?;
        zip.write_all(&bytes)
            .with_context(|| format!("writing zip entry for '{name}'"))?;
    }

    zip.finish().context("finalizing zip archive")?;
    log::info!(
        "exported {} datasets to {}",
        store.dataset_count(),
        path.display()
    );
    Ok(())
}

fn table_to_csv(table: &Table) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(table.column_names())?;
    for row in 0..table.len() {
        let record: Vec<String> = table
            .column_names()
            .iter()
            .map(|col| {
                table
                    .cell(row, col)
                    .map(|c| c.to_string())
                    .unwrap_or_default()
            })
            .collect();
        writer.write_record(&record)?;
    }
    Ok(writer.into_inner()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::SCHEMAS;
    use crate::data::testdata::sample_store;

    #[test]
    fn export_contains_one_csv_per_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("study-data.zip");
        let store = sample_store();

        export_zip(&store, &path).unwrap();

        let file = std::fs::File::open(&path).unwrap();
        let mut archive = zip::ZipArchive::new(file).unwrap();
        // One CSV per dataset plus the manifest.
        assert_eq!(archive.len(), SCHEMAS.len() + 1);
        for schema in SCHEMAS {
            assert!(archive.by_name(&format!("{}.csv", schema.name)).is_ok());
        }
        assert!(archive.by_name("manifest.json").is_ok());
    }

    #[test]
    fn exported_csv_roundtrips_through_the_loader() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("study-data.zip");
        let store = sample_store();
        export_zip(&store, &path).unwrap();

        let file = std::fs::File::open(&path).unwrap();
        let mut archive = zip::ZipArchive::new(file).unwrap();
        let mut entry = archive.by_name("table1.csv").unwrap();
        let out = dir.path().join("table1.csv");
        let mut f = std::fs::File::create(&out).unwrap();
        std::io::copy(&mut entry, &mut f).unwrap();

        let table = crate::data::loader::load_file(&out).unwrap();
        assert_eq!(table.len(), store.table("table1").unwrap().len());
        assert!(table.has_column("coefficient"));
    }
}
