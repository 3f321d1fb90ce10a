//! Integration tests: build real store directories and verify the
//! sort and reference invariants the search layer depends on.

use geodex_core::{GazetteerRow, PostcodeRow, Record};
use geodex_store::{
    Builder, CoordEntry, CountyTable, FixedFile, GazetteerStore, GridRefEntry, COUNTY_FILE,
    GAZ_INDEX_FILE, GAZ_TEXT_FILE, GRID_REF_FILE, LAT_FILE, LON_FILE, RECORD_FILE,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_rows(n: usize, seed: u64) -> Vec<PostcodeRow> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let area = (b'A' + rng.gen_range(0..26)) as char;
            let district = rng.gen_range(1..100);
            let sector = rng.gen_range(0..10);
            let unit1 = (b'A' + rng.gen_range(0..26)) as char;
            let unit2 = (b'A' + rng.gen_range(0..26)) as char;
            let key = format!("{area}{district} {sector}{unit1}{unit2}");
            let lat = rng.gen_range(49.0..61.0);
            let lon = rng.gen_range(-8.0..2.0);
            let grid_ref = if rng.gen_bool(0.8) {
                format!(
                    "{}{}{:03}{:03}",
                    (b'N' + rng.gen_range(0..5)) as char,
                    (b'A' + rng.gen_range(0..26)) as char,
                    rng.gen_range(0..1000),
                    rng.gen_range(0..1000)
                )
            } else {
                String::new()
            };
            PostcodeRow::new(key, lat, lon, grid_ref)
        })
        .collect()
}

#[test]
fn test_record_store_is_key_sorted() {
    let temp_dir = tempfile::tempdir().unwrap();
    let builder = Builder::new(temp_dir.path()).unwrap();
    builder.build(&random_rows(200, 7), &[]).unwrap();

    let store: FixedFile<Record> = FixedFile::open(&temp_dir.path().join(RECORD_FILE)).unwrap();
    assert!(store.len() > 0);
    let mut prev: Option<Record> = None;
    for record in store.iter() {
        if let Some(p) = &prev {
            assert!(p.key <= record.key, "{} > {}", p.key, record.key);
        }
        prev = Some(record);
    }
}

#[test]
fn test_coordinate_indices_cover_every_record() {
    let temp_dir = tempfile::tempdir().unwrap();
    let builder = Builder::new(temp_dir.path()).unwrap();
    builder.build(&random_rows(150, 11), &[]).unwrap();

    let store: FixedFile<Record> = FixedFile::open(&temp_dir.path().join(RECORD_FILE)).unwrap();

    for (file_name, project) in [
        (LAT_FILE, (|r: &Record| r.lat) as fn(&Record) -> f64),
        (LON_FILE, |r: &Record| r.lon),
    ] {
        let index: FixedFile<CoordEntry> =
            FixedFile::open(&temp_dir.path().join(file_name)).unwrap();
        assert_eq!(index.len(), store.len());

        let mut seen = vec![false; store.len() as usize];
        let mut prev = f64::NEG_INFINITY;
        for entry in index.iter() {
            assert!(prev <= entry.value, "{file_name} out of order");
            prev = entry.value;
            // Entry value equals the projected field of its record
            let record = store.get(entry.record_id).unwrap();
            assert_eq!(entry.value, project(&record));
            seen[entry.record_id as usize] = true;
        }
        assert!(seen.into_iter().all(|s| s), "{file_name} missing records");
    }
}

#[test]
fn test_grid_ref_index_matches_nonempty_refs() {
    let temp_dir = tempfile::tempdir().unwrap();
    let builder = Builder::new(temp_dir.path()).unwrap();
    builder.build(&random_rows(150, 13), &[]).unwrap();

    let store: FixedFile<Record> = FixedFile::open(&temp_dir.path().join(RECORD_FILE)).unwrap();
    let index: FixedFile<GridRefEntry> =
        FixedFile::open(&temp_dir.path().join(GRID_REF_FILE)).unwrap();

    let expected = store.iter().filter(|r| !r.grid_ref.is_empty()).count();
    assert_eq!(index.len() as usize, expected);

    for entry in index.iter() {
        let record = store.get(entry.record_id).unwrap();
        assert_eq!(entry.grid_ref, record.grid_ref);
    }
}

#[test]
fn test_gazetteer_blob_integrity_after_sort() {
    let temp_dir = tempfile::tempdir().unwrap();
    let builder = Builder::new(temp_dir.path()).unwrap();

    let mut rng = StdRng::seed_from_u64(17);
    let counties = ["Dorset", "Wiltshire", "Devon", "Somerset"];
    let rows: Vec<GazetteerRow> = (0..120)
        .map(|i| {
            let syllables = ["Ab", "Wil", "Win", "Chit", "ton", "bury", "ford"];
            let a = syllables[rng.gen_range(0..syllables.len())];
            let b = syllables[rng.gen_range(0..syllables.len())];
            GazetteerRow::new(
                format!("{a}{b}{i}"),
                "SU0000",
                counties[rng.gen_range(0..counties.len())],
            )
        })
        .collect();
    builder.build_gazetteer(&rows).unwrap();

    let store = GazetteerStore::open(
        &temp_dir.path().join(GAZ_INDEX_FILE),
        &temp_dir.path().join(GAZ_TEXT_FILE),
    )
    .unwrap();
    let county_table = CountyTable::load(&temp_dir.path().join(COUNTY_FILE)).unwrap();

    assert_eq!(store.len() as usize, rows.len());

    // Every entry addresses its own name, names are in sort order, and
    // every county index resolves
    let mut prev = String::new();
    let mut resolved = 0;
    for idx in 0..store.len() {
        let entry = store.entry(idx).unwrap();
        let name = store.name(&entry).unwrap();
        assert!(prev <= name, "index out of name order at {idx}");
        assert!(county_table.name(entry.county_index).is_some());
        assert!(rows.iter().any(|r| r.name == name), "unknown name {name}");
        prev = name;
        resolved += 1;
    }
    assert_eq!(resolved, rows.len());
}
