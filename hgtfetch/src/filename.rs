//! Tile naming.
//!
//! Tiles are named after their integer southwest corner:
//! `{N|S}{2-digit lat}{E|W}{3-digit lon}`, e.g. latitude 7 / longitude −13
//! is `N07W013`. Distinct corners always produce distinct names.

/// Canonical tile name for the integer (lon, lat) southwest corner.
///
/// # Examples
///
/// ```
/// use hgtfetch::filename::tile_name;
///
/// assert_eq!(tile_name(-13, 7), "N07W013");
/// assert_eq!(tile_name(5, -2), "S02E005");
/// assert_eq!(tile_name(0, 0), "N00E000");
/// ```
pub fn tile_name(lon: i32, lat: i32) -> String {
    let lat_prefix = if lat < 0 { 'S' } else { 'N' };
    let lon_prefix = if lon < 0 { 'W' } else { 'E' };
    format!(
        "{}{:02}{}{:03}",
        lat_prefix,
        lat.abs(),
        lon_prefix,
        lon.abs()
    )
}

/// Parse a tile name back to its (lon, lat) southwest corner.
///
/// Accepts bare names, paths, an optional `.hgt` suffix and either case —
/// archive members and local files are not always consistently cased.
/// Returns `None` if the name does not follow the convention.
///
/// # Examples
///
/// ```
/// use hgtfetch::filename::parse_tile_name;
///
/// assert_eq!(parse_tile_name("N07W013"), Some((-13, 7)));
/// assert_eq!(parse_tile_name("/data/VIEW3/s02e005.hgt"), Some((5, -2)));
/// assert_eq!(parse_tile_name("invalid"), None);
/// ```
pub fn parse_tile_name(name: &str) -> Option<(i32, i32)> {
    let base = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(name);
    let base = base.strip_suffix(".hgt").unwrap_or(base);

    if base.len() != 7 || !base.is_ascii() {
        return None;
    }

    let lat_sign = match base.as_bytes()[0] {
        b'N' | b'n' => 1,
        b'S' | b's' => -1,
        _ => return None,
    };
    let lat: i32 = base[1..3].parse().ok()?;

    let lon_sign = match base.as_bytes()[3] {
        b'E' | b'e' => 1,
        b'W' | b'w' => -1,
        _ => return None,
    };
    let lon: i32 = base[4..7].parse().ok()?;

    Some((lon * lon_sign, lat * lat_sign))
}
