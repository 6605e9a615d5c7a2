use crate::{EmissionInventory, EmissionRecord, Error, Inventory, Year};
use std::{fs::File, io, path::Path};
use tracing::{debug, info};

/// Source of yearly inventories.
pub trait InventoryLoader {
    /// Load the inventory of `year` from `path`, dropping every record of
    /// the `exclude` facility.
    fn load(&self, year: Year, path: &Path, exclude: Option<&str>) -> Result<Inventory, Error>;
}

/// Reads flat CSV exports with the columns
/// `category,pollutant,value[,cell][,facility]`.
#[derive(Debug, Clone, Copy)]
pub struct CsvInventoryLoader {
    delimiter: u8,
}

impl Default for CsvInventoryLoader {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl CsvInventoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Parse records from any reader.
    pub fn read(
        &self,
        year: Year,
        reader: impl io::Read,
        exclude: Option<&str>,
    ) -> Result<Inventory, Error> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut records = Vec::new();
        let mut excluded = 0usize;
        for row in rdr.deserialize::<EmissionRecord>() {
            let record = row?;
            if exclude.is_some() && record.facility.as_deref() == exclude {
                excluded += 1;
                continue;
            }
            records.push(record);
        }

        if let Some(facility) = exclude {
            debug!(year, facility, excluded, "excluded facility records");
        }
        Inventory::new(year, records)
    }
}

impl InventoryLoader for CsvInventoryLoader {
    fn load(&self, year: Year, path: &Path, exclude: Option<&str>) -> Result<Inventory, Error> {
        if !path.is_file() {
            return Err(Error::InvalidPath(path.to_owned()));
        }
        let inv = self.read(year, File::open(path)?, exclude)?;
        info!(year, path = %path.display(), records = inv.len(), "loaded inventory");
        Ok(inv)
    }
}

/// Write an inventory in the format [`CsvInventoryLoader`] reads.
pub fn write_csv(inv: &impl EmissionInventory, writer: impl io::Write) -> Result<(), Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    for record in inv.records() {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = "\
category,pollutant,value,cell,facility
cars,CO2,120.5,1,
cars,CO2,30,2,
incineration,CO2,95000,,KVA Hagenholz
incineration,CO2,500,,KVA Josefstrasse
";

    #[test]
    fn reads_optional_columns() {
        let inv = CsvInventoryLoader::new()
            .read(2020, SAMPLE.as_bytes(), None)
            .unwrap();

        assert_eq!(inv.len(), 4);
        assert_eq!(inv.records()[0].cell, Some(1));
        assert_eq!(inv.records()[0].facility, None);
        assert_eq!(inv.records()[2].cell, None);
        assert_eq!(
            inv.records()[2].facility.as_deref(),
            Some("KVA Hagenholz")
        );
    }

    #[test]
    fn excludes_named_facility() {
        let inv = CsvInventoryLoader::new()
            .read(2020, SAMPLE.as_bytes(), Some("KVA Hagenholz"))
            .unwrap();

        assert_eq!(inv.len(), 3);
        assert!(
            inv.records()
                .iter()
                .all(|r| r.facility.as_deref() != Some("KVA Hagenholz"))
        );
    }

    #[test]
    fn reads_minimal_columns_with_other_delimiter() {
        let text = "category;pollutant;value\ncars;CO2;1.5\n";
        let inv = CsvInventoryLoader::new()
            .with_delimiter(b';')
            .read(2015, text.as_bytes(), None)
            .unwrap();
        assert_eq!(inv.records(), &[EmissionRecord::new("cars", "CO2", 1.5)]);
    }

    #[test]
    fn rejects_malformed_value() {
        let text = "category,pollutant,value\ncars,CO2,lots\n";
        let err = CsvInventoryLoader::new()
            .read(2015, text.as_bytes(), None)
            .unwrap_err();
        assert!(matches!(err, Error::CsvFailed(_)));
    }

    #[test]
    fn written_csv_reads_back() {
        let inv = CsvInventoryLoader::new()
            .read(2020, SAMPLE.as_bytes(), None)
            .unwrap();
        let mut buf = Vec::new();
        write_csv(&inv, &mut buf).unwrap();

        let back = CsvInventoryLoader::new()
            .read(2020, buf.as_slice(), None)
            .unwrap();
        assert_eq!(back, inv);
    }
}
