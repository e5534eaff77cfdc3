use crate::domain::Coordinate;
use crate::extractor::ExtractError;
use crate::extractor::patterns::MAP_URL;

pub fn parse_map_url(url: &str) -> Result<Coordinate, ExtractError> {
    let captures = MAP_URL
        .captures(url)
        .ok_or_else(|| ExtractError::InvalidFormat(format!("no '@<lat>,<lon>' in map URL '{}'", url)))?;

    let altitude = captures.get(3).map(|m| m.as_str()).filter(|altitude| !altitude.is_empty());
    Ok(Coordinate::new(&captures[1], &captures[2], altitude))
}
