use regex::Regex;
use std::sync::LazyLock;

/// `@<lat>,<lon>[,<alt>[z]]` as found in full map URLs.
pub static MAP_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@(-?\d+\.\d+),(-?\d+\.\d+)(?:,(-?\d+\.?\d*)z?)?").expect("valid map URL pattern"));

/// A `<number>,<number>` pair anywhere in the input.
pub static CSV: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-?\d+(\.\d+)?\s*,\s*-?\d+(\.\d+)?").expect("valid CSV pattern"));

/// `!3d<lat>!4d<lon>` embedded in the data segment of a resolved place URL.
pub static EMBEDDED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"!3d(-?\d+\.\d+)!4d(-?\d+\.\d+)").expect("valid embedded pattern"));
