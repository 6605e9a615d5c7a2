use crate::error::Error;
use inventory::{EmissionInventory, write_csv};
use std::{fs::File, io::BufWriter, path::Path};
use tracing::info;

/// Write the projected inventory to `path` as CSV.
pub fn write_projection(path: &Path, inv: &impl EmissionInventory) -> Result<(), Error> {
    let file = File::create(path).map_err(|source| Error::CreateOutput {
        path: path.to_owned(),
        source,
    })?;
    write_csv(inv, BufWriter::new(file))?;
    info!(path = %path.display(), year = inv.year(), records = inv.records().len(), "wrote projected inventory");
    Ok(())
}
