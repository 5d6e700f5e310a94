#![allow(dead_code)]
//! Shared fixtures for the integration harnesses.

use std::io::Write;
use tempfile::NamedTempFile;

/// Header as published, including the stray spaces and mixed case the
/// normalizer has to clean up.
pub const HEADER: &str =
    "reviewer_id,store_name,category,Store Address,latitude ,longitude,rating_count,review_time,review,rating";

/// A small slice of the review dataset. `\xe9` in the last row is a Latin-1
/// byte that is not valid UTF-8 on its own.
pub const ROWS: &[&[u8]] = &[
    b"1,McDonald's,Fast food restaurant,\"13749 US-183 Hwy, Austin, TX 78750, United States\",30.4607176,-97.7928744,1240,3 months ago,Why does it look like someone spit on my food?,1 star",
    b"2,McDonald's,Fast food restaurant,\"13749 US-183 Hwy, Austin, TX 78750, United States\",30.4607176,-97.7928744,1240,5 days ago,\"Great fries!! Friendly staff, clean restaurant.\",5 stars",
    b"3,McDonald's,Fast food restaurant,\"13749 US-183 Hwy, Austin, TX 78750, United States\",30.4607176,-97.7928744,1240,2 years ago,They gave me the wrong order,3 stars",
    b"4,McDonald's,Fast food restaurant,\"360 E Exchange Pkwy, Dallas, TX 75240, United States\",32.9268,-96.7587,1512,a year ago,fries were cold and soggy,2 stars",
    b"5,McDonald's,Fast food restaurant,\"360 E Exchange Pkwy, Dallas, TX 75240, United States\",32.9268,-96.7587,1512,11 years ago,Fast service,2 stars",
    b"6,McDonald's,Fast food restaurant,\"Brooklyn, NY 11201\",40.6943,-73.9918,980,2 months ago,Best breakfast in town,4 stars",
    b"7,McDonald's,Fast food restaurant,Unknown location,,,0,an hour ago,,no rating",
    b"8,McDonald's,Fast food restaurant,\"1 Rue Principale, Montr\xe9al, QC\",45.5,-73.56,12,3 weeks ago,Caf\xe9 was okay,4 stars",
];

pub fn fixture_bytes() -> Vec<u8> {
    let mut bytes = HEADER.as_bytes().to_vec();
    for row in ROWS {
        bytes.push(b'\n');
        bytes.extend_from_slice(row);
    }
    bytes.push(b'\n');
    bytes
}

/// Write the fixture to a temporary `.csv` file that lives as long as the
/// returned handle.
pub fn fixture_csv() -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".csv")
        .tempfile()
        .expect("create temp csv");
    file.write_all(&fixture_bytes()).expect("write fixture");
    file.flush().expect("flush fixture");
    file
}
