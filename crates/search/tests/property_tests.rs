//! Oracle-style property tests for the search algorithms
//!
//! Every property checks a query against a brute-force linear scan over
//! the same data.

use geodex_core::GridRef;
use geodex_search::{
    box_ids, find_places, nearest, range_ids, BoundingBox, NearestOptions,
};
use geodex_store::{
    Blob, CoordEntry, FixedFile, FixedRecord, GazetteerEntry, GazetteerStore,
};
use proptest::prelude::*;
use std::collections::BTreeSet;

/// Pack a value-sorted coordinate index; record ids are positions in
/// the input slice.
fn coord_index(values: &[f64]) -> FixedFile<CoordEntry> {
    let mut entries: Vec<CoordEntry> = values
        .iter()
        .enumerate()
        .map(|(idx, &value)| CoordEntry {
            value,
            record_id: idx as u32,
        })
        .collect();
    entries.sort_by(|a, b| a.value.total_cmp(&b.value));

    let mut buf = Vec::new();
    for entry in &entries {
        entry.encode(&mut buf);
    }
    FixedFile::from_bytes(buf).unwrap()
}

/// Build an in-memory gazetteer the way the builder does.
fn gazetteer_of(names: &[String]) -> GazetteerStore {
    let mut blob = Vec::new();
    let mut entries: Vec<(String, GazetteerEntry)> = names
        .iter()
        .map(|name| {
            let text_offset = blob.len() as u32;
            blob.extend_from_slice(name.as_bytes());
            (
                name.clone(),
                GazetteerEntry {
                    county_index: 0,
                    text_offset,
                    text_length: name.len() as u16,
                    grid_ref: GridRef::new("SU0000"),
                },
            )
        })
        .collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    let mut buf = Vec::new();
    for (_, entry) in &entries {
        entry.encode(&mut buf);
    }
    GazetteerStore::from_parts(FixedFile::from_bytes(buf).unwrap(), Blob::from_bytes(blob))
}

fn coord() -> impl Strategy<Value = f64> {
    -10.0f64..10.0
}

proptest! {
    #[test]
    fn range_query_matches_linear_oracle(
        values in prop::collection::vec(coord(), 0..50),
        a in coord(),
        b in coord(),
    ) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let index = coord_index(&values);

        let got: BTreeSet<u32> = range_ids(&index, lo, hi).into_iter().collect();
        let oracle: BTreeSet<u32> = values
            .iter()
            .enumerate()
            .filter(|(_, &v)| lo <= v && v <= hi)
            .map(|(idx, _)| idx as u32)
            .collect();
        prop_assert_eq!(got, oracle);
    }

    #[test]
    fn box_query_matches_point_oracle(
        points in prop::collection::vec((coord(), coord()), 0..50),
        a in coord(),
        b in coord(),
        c in coord(),
        d in coord(),
    ) {
        let bbox = BoundingBox::new(a.min(b), a.max(b), c.min(d), c.max(d));
        let lats: Vec<f64> = points.iter().map(|&(lat, _)| lat).collect();
        let lons: Vec<f64> = points.iter().map(|&(_, lon)| lon).collect();
        let lat_index = coord_index(&lats);
        let lon_index = coord_index(&lons);

        let got = box_ids(&lat_index, &lon_index, &bbox);
        let oracle: BTreeSet<u32> = points
            .iter()
            .enumerate()
            .filter(|(_, &(lat, lon))| {
                bbox.lat_lo <= lat && lat <= bbox.lat_hi
                    && bbox.lon_lo <= lon && lon <= bbox.lon_hi
            })
            .map(|(idx, _)| idx as u32)
            .collect();
        prop_assert_eq!(got, oracle);
    }

    #[test]
    fn box_query_is_axis_intersection(
        points in prop::collection::vec((coord(), coord()), 0..50),
        a in coord(),
        b in coord(),
        c in coord(),
        d in coord(),
    ) {
        let bbox = BoundingBox::new(a.min(b), a.max(b), c.min(d), c.max(d));
        let lats: Vec<f64> = points.iter().map(|&(lat, _)| lat).collect();
        let lons: Vec<f64> = points.iter().map(|&(_, lon)| lon).collect();
        let lat_index = coord_index(&lats);
        let lon_index = coord_index(&lons);

        let got = box_ids(&lat_index, &lon_index, &bbox);
        let by_lat: BTreeSet<u32> =
            range_ids(&lat_index, bbox.lat_lo, bbox.lat_hi).into_iter().collect();
        let by_lon: BTreeSet<u32> =
            range_ids(&lon_index, bbox.lon_lo, bbox.lon_hi).into_iter().collect();
        let expected: BTreeSet<u32> = by_lat.intersection(&by_lon).copied().collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn nearest_finds_something_in_a_nonempty_store(
        points in prop::collection::vec((coord(), coord()), 1..30),
        lat in coord(),
        lon in coord(),
    ) {
        let lats: Vec<f64> = points.iter().map(|&(lat, _)| lat).collect();
        let lons: Vec<f64> = points.iter().map(|&(_, lon)| lon).collect();
        let lat_index = coord_index(&lats);
        let lon_index = coord_index(&lons);

        // Every point is within 20 degrees, far inside the widening cap
        let ids = nearest(&lat_index, &lon_index, lat, lon, NearestOptions::default()).unwrap();
        prop_assert!(!ids.is_empty());
    }

    #[test]
    fn prefix_fast_path_agrees_with_scan(
        names in prop::collection::vec("[ab]{0,4}", 0..40),
        pattern in "[ab]{0,3}",
    ) {
        let store = gazetteer_of(&names);

        let fast = find_places(&store, &pattern).unwrap();
        let oracle: Vec<u32> = (0..store.len())
            .filter(|&idx| {
                let entry = store.entry(idx).unwrap();
                store.name(&entry).unwrap().starts_with(pattern.as_str())
            })
            .collect();
        prop_assert_eq!(fast, oracle);
    }
}
