use crate::domain::Coordinate;
use crate::extractor::ExtractError;

/// Parses `<lat>,<lon>[,<alt>[z...]]`, trimming whitespace around every part.
pub fn parse_csv(csv: &str) -> Result<Coordinate, ExtractError> {
    let parts: Vec<&str> = csv.split(',').map(str::trim).collect();
    if parts.len() < 2 {
        return Err(ExtractError::InvalidFormat(format!("expected '<lat>,<lon>' but got '{}'", csv)));
    }

    // Anything from the first 'z' onwards is a zoom marker
    let altitude = parts
        .get(2)
        .and_then(|altitude| altitude.split('z').next())
        .filter(|altitude| !altitude.is_empty());

    Ok(Coordinate::new(parts[0], parts[1], altitude))
}
