//! The database handle
//!
//! `Geodex::open` maps every store file in a directory and loads the
//! county table; the handle is then the sole owner of all open state.
//! Queries borrow the handle immutably, so concurrent readers need no
//! coordination.

use geodex_core::{Place, Postcode, Record, RecordId, Result};
use geodex_search::{binary_search, box_ids, expand_cluster, find_places, nearest};
use geodex_search::{BoundingBox, NearestOptions};
use geodex_store::{
    Builder, CountyTable, CoordEntry, FixedFile, GazetteerStore, GridRefEntry, COUNTY_FILE,
    GAZ_INDEX_FILE, GAZ_TEXT_FILE, GRID_REF_FILE, LAT_FILE, LON_FILE, RECORD_FILE,
};
use geodex_core::{GazetteerRow, PostcodeRow};
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::info;

/// Open handle over a built store directory
pub struct Geodex {
    dir: PathBuf,
    records: FixedFile<Record>,
    lat_index: FixedFile<CoordEntry>,
    lon_index: FixedFile<CoordEntry>,
    grid_ref_index: FixedFile<GridRefEntry>,
    gazetteer: GazetteerStore,
    counties: CountyTable,
}

impl Geodex {
    /// Open every store in `dir`
    ///
    /// # Errors
    ///
    /// [`geodex_core::Error::MissingSourceFile`] if any store file is
    /// absent, [`geodex_core::Error::IndexCorrupt`] if a store size is
    /// not a whole number of records.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        let records = FixedFile::open(&dir.join(RECORD_FILE))?;
        let lat_index = FixedFile::open(&dir.join(LAT_FILE))?;
        let lon_index = FixedFile::open(&dir.join(LON_FILE))?;
        let grid_ref_index = FixedFile::open(&dir.join(GRID_REF_FILE))?;
        let gazetteer = GazetteerStore::open(&dir.join(GAZ_INDEX_FILE), &dir.join(GAZ_TEXT_FILE))?;
        let counties = CountyTable::load(&dir.join(COUNTY_FILE))?;

        info!(
            target: "geodex::db",
            dir = %dir.display(),
            records = records.len(),
            places = gazetteer.len(),
            counties = counties.len(),
            "database opened"
        );

        Ok(Geodex {
            dir,
            records,
            lat_index,
            lon_index,
            grid_ref_index,
            gazetteer,
            counties,
        })
    }

    /// Build any missing store in `dir` from the supplied rows, then
    /// open the result
    pub fn build_and_open(
        dir: impl AsRef<Path>,
        records: &[PostcodeRow],
        places: &[GazetteerRow],
    ) -> Result<Self> {
        Builder::new(dir.as_ref())?.build(records, places)?;
        Self::open(dir)
    }

    /// Directory the handle was opened over
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Number of records in the record store
    pub fn record_count(&self) -> u32 {
        self.records.len()
    }

    /// Record at a given offset-index, or `None` past the end
    pub fn record(&self, id: RecordId) -> Option<Record> {
        self.records.get(id)
    }

    /// Exact lookup by postcode
    ///
    /// The input is normalized first, so `"ab1 1aa"` and `"AB11AA"`
    /// find the same record. `Ok(None)` means no such key.
    ///
    /// # Errors
    ///
    /// [`geodex_core::Error::MalformedKey`] if the input does not parse
    /// as a postcode.
    pub fn lookup(&self, postcode: &str) -> Result<Option<(RecordId, Record)>> {
        let key = Postcode::parse(postcode)?;
        let hit = binary_search(&self.records, |record: &Record| record.key.cmp(&key));
        Ok(hit.and_then(|idx| self.records.get(idx).map(|record| (idx, record))))
    }

    /// All record ids sharing a grid reference
    ///
    /// Matches are exact; the returned ids are ascending. Empty when
    /// the reference is unknown.
    pub fn find_grid_ref(&self, grid_ref: &str) -> Vec<RecordId> {
        let cmp = |entry: &GridRefEntry| entry.grid_ref.as_str().cmp(grid_ref);
        match binary_search(&self.grid_ref_index, cmp) {
            Some(hit) => expand_cluster(&self.grid_ref_index, hit, cmp)
                .into_iter()
                .filter_map(|idx| self.grid_ref_index.get(idx))
                .map(|entry| entry.record_id)
                .collect(),
            None => Vec::new(),
        }
    }

    /// Record ids inside a bounding box, both endpoints inclusive
    pub fn find_box(&self, bbox: &BoundingBox) -> BTreeSet<RecordId> {
        box_ids(&self.lat_index, &self.lon_index, bbox)
    }

    /// Record ids near a point, widening the search square as needed
    ///
    /// # Errors
    ///
    /// [`geodex_core::Error::SearchExhausted`] when the widening cap is
    /// hit, e.g. over an empty store.
    pub fn find_nearest(
        &self,
        lat: f64,
        lon: f64,
        opts: NearestOptions,
    ) -> Result<BTreeSet<RecordId>> {
        nearest(&self.lat_index, &self.lon_index, lat, lon, opts)
    }

    /// Place-name search with duplicate-cluster expansion
    ///
    /// A pattern without metacharacters is a left-anchored literal
    /// prefix; anything else is applied as an anchored regex to every
    /// entry. Each match resolves to (name, grid reference, county).
    pub fn find_places(&self, pattern: &str) -> Result<Vec<Place>> {
        let idxs = find_places(&self.gazetteer, pattern)?;
        let mut places = Vec::with_capacity(idxs.len());
        for idx in idxs {
            let entry = match self.gazetteer.entry(idx) {
                Some(entry) => entry,
                None => continue,
            };
            let name = match self.gazetteer.name(&entry) {
                Some(name) => name,
                None => continue,
            };
            let county = self
                .counties
                .name(entry.county_index)
                .unwrap_or_default()
                .to_string();
            places.push(Place {
                name,
                grid_ref: entry.grid_ref,
                county,
            });
        }
        Ok(places)
    }

    /// The loaded county table
    pub fn counties(&self) -> &CountyTable {
        &self.counties
    }
}

impl fmt::Debug for Geodex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Geodex")
            .field("dir", &self.dir)
            .field("records", &self.records.len())
            .field("places", &self.gazetteer.len())
            .field("counties", &self.counties.len())
            .finish()
    }
}
