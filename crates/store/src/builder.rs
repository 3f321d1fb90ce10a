//! One-shot store builder
//!
//! Builds every store file from rows supplied by the ingestion
//! collaborator. Construction is idempotent per artifact: a build step
//! whose target file already exists is skipped, so a cache directory is
//! only ever populated once and regenerating it means deleting the
//! files first.
//!
//! Every artifact is written with the write-fsync-rename pattern:
//!
//! 1. Write to a temporary file (`.name.tmp`)
//! 2. fsync the temporary file
//! 3. Atomic rename to the final path
//! 4. fsync the parent directory
//!
//! A crashed or concurrent build therefore never leaves a partially
//! written file visible as "already built".

use crate::county::CountyTable;
use crate::fixed_file::FixedFile;
use crate::format::{
    CoordEntry, FixedRecord, GazetteerEntry, GridRefEntry, GAZ_GRID_REF_FIELD_LEN,
    GRID_REF_FIELD_LEN,
};
use geodex_core::{GazetteerRow, GridRef, Postcode, PostcodeRow, Record, Result};
use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Record store file name
pub const RECORD_FILE: &str = "pc.dat";
/// Latitude index file name
pub const LAT_FILE: &str = "lat.dat";
/// Longitude index file name
pub const LON_FILE: &str = "lon.dat";
/// Grid-reference index file name
pub const GRID_REF_FILE: &str = "os.dat";
/// Gazetteer index file name
pub const GAZ_INDEX_FILE: &str = "gaz.idx";
/// Gazetteer text blob file name
pub const GAZ_TEXT_FILE: &str = "gaz.txt";
/// County table file name
pub const COUNTY_FILE: &str = "gaz.county.dat";

/// Key prefixes excluded from the record store (the non-geographic
/// "GIR 0AA" Girobank code)
const DISALLOWED_KEY_PREFIXES: &[&str] = &["GIR"];

/// Builds the immutable store files in a target directory
pub struct Builder {
    dir: PathBuf,
}

impl Builder {
    /// Create a builder, creating the target directory if needed
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Builder { dir })
    }

    /// Target directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Build every artifact that does not already exist
    pub fn build(&self, records: &[PostcodeRow], places: &[GazetteerRow]) -> Result<()> {
        self.build_record_store(records)?;
        self.build_coordinate_indices()?;
        self.build_grid_ref_index()?;
        self.build_gazetteer(places)?;
        Ok(())
    }

    /// Build the sorted record store from raw postcode rows
    ///
    /// Rows with all-zero coordinates, a disallowed key prefix, a grid
    /// reference wider than its field, or a key that fails postcode
    /// validation are rejected individually; a bad row never aborts the
    /// batch.
    pub fn build_record_store(&self, rows: &[PostcodeRow]) -> Result<()> {
        let path = self.dir.join(RECORD_FILE);
        if path.exists() {
            debug!(target: "geodex::build", path = %path.display(), "record store already built");
            return Ok(());
        }

        let mut records = Vec::with_capacity(rows.len());
        let mut rejected = 0usize;
        for row in rows {
            // Many source rows carry no location data yet
            if row.lat == 0.0 && row.lon == 0.0 {
                continue;
            }
            if DISALLOWED_KEY_PREFIXES
                .iter()
                .any(|p| row.key.starts_with(p))
            {
                continue;
            }
            if row.grid_ref.len() > GRID_REF_FIELD_LEN {
                warn!(
                    target: "geodex::build",
                    key = %row.key,
                    grid_ref = %row.grid_ref,
                    "rejecting row with oversized grid reference"
                );
                rejected += 1;
                continue;
            }
            let key = match Postcode::parse(&row.key) {
                Ok(key) => key,
                Err(err) => {
                    warn!(target: "geodex::build", key = %row.key, %err, "rejecting row");
                    rejected += 1;
                    continue;
                }
            };
            records.push(Record::new(
                key,
                row.lat,
                row.lon,
                GridRef::new(row.grid_ref.clone()),
            ));
        }

        records.sort_by(|a, b| a.key.cmp(&b.key));

        let mut buf = Vec::with_capacity(records.len() * Record::SIZE);
        for record in &records {
            record.encode(&mut buf);
        }
        self.write_atomic(RECORD_FILE, &buf)?;

        info!(
            target: "geodex::build",
            records = records.len(),
            rejected,
            "record store built"
        );
        Ok(())
    }

    /// Derive the latitude and longitude indices from the record store
    ///
    /// # Errors
    ///
    /// [`geodex_core::Error::MissingSourceFile`] if the record store has
    /// not been built.
    pub fn build_coordinate_indices(&self) -> Result<()> {
        let lat_path = self.dir.join(LAT_FILE);
        let lon_path = self.dir.join(LON_FILE);
        if lat_path.exists() && lon_path.exists() {
            debug!(target: "geodex::build", "coordinate indices already built");
            return Ok(());
        }

        let records = self.open_record_store()?;

        if !lat_path.exists() {
            let buf = Self::pack_coord_index(&records, |r| r.lat);
            self.write_atomic(LAT_FILE, &buf)?;
            info!(target: "geodex::build", entries = records.len(), "latitude index built");
        }
        if !lon_path.exists() {
            let buf = Self::pack_coord_index(&records, |r| r.lon);
            self.write_atomic(LON_FILE, &buf)?;
            info!(target: "geodex::build", entries = records.len(), "longitude index built");
        }
        Ok(())
    }

    fn pack_coord_index(records: &FixedFile<Record>, project: impl Fn(&Record) -> f64) -> Vec<u8> {
        let mut entries: Vec<CoordEntry> = records
            .iter()
            .enumerate()
            .map(|(idx, record)| CoordEntry {
                value: project(&record),
                record_id: idx as u32,
            })
            .collect();
        entries.sort_by(|a, b| a.value.total_cmp(&b.value));

        let mut buf = Vec::with_capacity(entries.len() * CoordEntry::SIZE);
        for entry in &entries {
            entry.encode(&mut buf);
        }
        buf
    }

    /// Derive the grid-reference index from the record store
    ///
    /// Only records with a non-empty grid reference are indexed.
    pub fn build_grid_ref_index(&self) -> Result<()> {
        let path = self.dir.join(GRID_REF_FILE);
        if path.exists() {
            debug!(target: "geodex::build", "grid-ref index already built");
            return Ok(());
        }

        let records = self.open_record_store()?;
        let mut entries: Vec<GridRefEntry> = records
            .iter()
            .enumerate()
            .filter(|(_, record)| !record.grid_ref.is_empty())
            .map(|(idx, record)| GridRefEntry {
                grid_ref: record.grid_ref,
                record_id: idx as u32,
            })
            .collect();
        entries.sort_by(|a, b| a.grid_ref.cmp(&b.grid_ref));

        let mut buf = Vec::with_capacity(entries.len() * GridRefEntry::SIZE);
        for entry in &entries {
            entry.encode(&mut buf);
        }
        self.write_atomic(GRID_REF_FILE, &buf)?;

        info!(target: "geodex::build", entries = entries.len(), "grid-ref index built");
        Ok(())
    }

    /// Build the gazetteer text blob, sorted index, and county table
    ///
    /// County ids are assigned in first-seen order while streaming the
    /// rows. Each name is appended to the blob and its pre-sort
    /// (offset, length) recorded; the entry list is then sorted by name
    /// and packed, with the captured offsets travelling through the
    /// reorder so entry *i* always addresses its own text.
    pub fn build_gazetteer(&self, rows: &[GazetteerRow]) -> Result<()> {
        let index_path = self.dir.join(GAZ_INDEX_FILE);
        if index_path.exists() {
            debug!(target: "geodex::build", "gazetteer already built");
            return Ok(());
        }

        let mut county_ids: HashMap<&str, u32> = HashMap::new();
        let mut counties: Vec<String> = Vec::new();
        let mut blob: Vec<u8> = Vec::new();
        let mut entries: Vec<(String, GazetteerEntry)> = Vec::with_capacity(rows.len());

        for row in rows {
            // Dual-language names keep only the part before the slash
            let name = match row.name.split_once('/') {
                Some((first, _)) => first,
                None => row.name.as_str(),
            };
            if name.len() > u16::MAX as usize {
                warn!(target: "geodex::build", name, "rejecting oversized place name");
                continue;
            }
            if row.grid_ref.len() > GAZ_GRID_REF_FIELD_LEN {
                warn!(
                    target: "geodex::build",
                    name,
                    grid_ref = %row.grid_ref,
                    "rejecting row with oversized grid reference"
                );
                continue;
            }

            let county_index = match county_ids.get(row.county.as_str()) {
                Some(&idx) => idx,
                None => {
                    let idx = counties.len() as u32;
                    county_ids.insert(row.county.as_str(), idx);
                    counties.push(row.county.clone());
                    idx
                }
            };

            let text_offset = match u32::try_from(blob.len()) {
                Ok(offset) => offset,
                Err(_) => {
                    warn!(target: "geodex::build", name, "text blob full, rejecting remaining rows");
                    break;
                }
            };
            blob.extend_from_slice(name.as_bytes());

            entries.push((
                name.to_string(),
                GazetteerEntry {
                    county_index,
                    text_offset,
                    text_length: name.len() as u16,
                    grid_ref: GridRef::new(row.grid_ref.clone()),
                },
            ));
        }

        entries.sort_by(|a, b| a.0.cmp(&b.0));

        let mut index_buf = Vec::with_capacity(entries.len() * GazetteerEntry::SIZE);
        for (_, entry) in &entries {
            entry.encode(&mut index_buf);
        }

        self.write_atomic(GAZ_TEXT_FILE, &blob)?;
        self.write_atomic(GAZ_INDEX_FILE, &index_buf)?;
        self.write_atomic(COUNTY_FILE, &CountyTable::from_names(counties).to_bytes())?;

        info!(
            target: "geodex::build",
            entries = entries.len(),
            counties = county_ids.len(),
            "gazetteer built"
        );
        Ok(())
    }

    fn open_record_store(&self) -> Result<FixedFile<Record>> {
        FixedFile::open(&self.dir.join(RECORD_FILE))
    }

    /// Write `bytes` to `name` via temp file + fsync + atomic rename
    fn write_atomic(&self, name: &str, bytes: &[u8]) -> Result<()> {
        let final_path = self.dir.join(name);
        let temp_path = self.dir.join(format!(".{name}.tmp"));

        let mut file = File::create(&temp_path)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        drop(file);

        std::fs::rename(&temp_path, &final_path)?;

        let dir = File::open(&self.dir)?;
        dir.sync_all()?;
        Ok(())
    }
}
