//! Generated station tables for tests.

use serde_json::{Map, Value, json};

/// Size of JMA's published AMeDAS table.
pub(crate) const JMA_TABLE_LEN: usize = 1286;

/// A table in the `amedastable.json` shape with `n` stations (at most 1,800),
/// spread over the Tokyo (44) and Osaka (62) blocks.
pub(crate) fn jma_table(n: usize) -> Value {
    let entries: Map<String, Value> = (0..n)
        .map(|i| {
            let (block, seq, lat, lon) = if i < 900 {
                (44, i, 35, 139)
            } else {
                (62, i - 900, 34, 135)
            };
            let station_type = ["A", "B", "C", "D", "E", "F"][i % 6];
            let lat_min = (i % 60) as f64;
            let lon_min = (i / 60 % 60) as f64;
            let entry = json!({
                "type": station_type,
                "elems": "11112010",
                "lat": [lat, lat_min],
                "lon": [lon, lon_min],
                "alt": 10,
                "kjName": format!("観測点{i}"),
                "knName": "カンソクテン",
                "enName": format!("Station {i}"),
            });
            (format!("{block}{seq:03}"), entry)
        })
        .collect();
    Value::Object(entries)
}
