use std::path::Path;

use anyhow::{Context, Result};
use csv::{ReaderBuilder, Writer};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::cost_matrix::{Node, Pair};
use crate::kruskal::Edge;

fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let mut records = Vec::new();
    for (line, result) in rdr.deserialize().enumerate() {
        // +2: one for the header, one for 1-based line numbers.
        let record = result.with_context(|| format!("parsing {} line {}", path.display(), line + 2))?;
        records.push(record);
    }
    Ok(records)
}

fn write_records<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    let mut wtr =
        Writer::from_path(path).with_context(|| format!("creating CSV {}", path.display()))?;
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Reads `id,lat,lng` rows.
pub fn read_nodes(path: &Path) -> Result<Vec<Node>> {
    read_records(path)
}

/// Reads `u,v,weight` rows.
pub fn read_edges(path: &Path) -> Result<Vec<Edge>> {
    read_records(path)
}

pub fn write_pairs(path: &Path, pairs: &[Pair]) -> Result<()> {
    write_records(path, pairs)
}

pub fn write_edges(path: &Path, edges: &[Edge]) -> Result<()> {
    write_records(path, edges)
}
