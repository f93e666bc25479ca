use std::fs;
use std::path::Path;

use super::error::PredictError;

/// A named TLE record pulled out of a multi-satellite file.
#[derive(Debug, Clone)]
pub struct TleRecord {
    pub name: String,
    pub line1: String,
    pub line2: String,
}

/// Find a named record in a TLE file.
///
/// The file may hold any number of 3-line (named) and 2-line records; the
/// name match is trimmed and case-insensitive. Unnamed records cannot be
/// selected by name and are skipped.
pub fn lookup(path: &Path, name: &str) -> Result<TleRecord, PredictError> {
    let content = fs::read_to_string(path)?;

    find_record(&content, name).ok_or_else(|| PredictError::SatelliteNotFound {
        name: name.to_string(),
        file: path.display().to_string(),
    })
}

fn find_record(content: &str, name: &str) -> Option<TleRecord> {
    let wanted = name.trim();
    parse_multi_tle(content)
        .into_iter()
        .find_map(|(record_name, line1, line2)| {
            let record_name = record_name?;
            if record_name.eq_ignore_ascii_case(wanted) {
                Some(TleRecord {
                    name: record_name,
                    line1,
                    line2,
                })
            } else {
                None
            }
        })
}

/// Split multi-satellite TLE content into (name, line1, line2) triples.
fn parse_multi_tle(content: &str) -> Vec<(Option<String>, String, String)> {
    let lines: Vec<&str> = content
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect();

    let mut result = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        if lines[i].starts_with("1 ") && i + 1 < lines.len() && lines[i + 1].starts_with("2 ") {
            // 2-line record (no name)
            result.push((None, lines[i].to_string(), lines[i + 1].to_string()));
            i += 2;
        } else if i + 2 < lines.len()
            && lines[i + 1].starts_with("1 ")
            && lines[i + 2].starts_with("2 ")
        {
            // 3-line record (with name)
            result.push((
                Some(lines[i].to_string()),
                lines[i + 1].to_string(),
                lines[i + 2].to_string(),
            ));
            i += 3;
        } else {
            i += 1; // skip unknown line
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    const FILE: &str = "\
ISS (ZARYA)
1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927
2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537

1 43013U 17073A   18308.83299829  .00000213  00000-0  37014-4 0  9992
2 43013  98.7418 249.5106 0001115  44.6745 315.4528 14.19553871 51620
";

    #[test]
    fn mixed_two_and_three_line_records_are_split() {
        let records = parse_multi_tle(FILE);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].0.as_deref(), Some("ISS (ZARYA)"));
        assert!(records[0].1.starts_with("1 25544U"));
        assert!(records[1].0.is_none());
        assert!(records[1].2.starts_with("2 43013"));
    }

    #[test]
    fn name_match_is_case_insensitive() {
        let record = find_record(FILE, "iss (zarya)").unwrap();
        assert_eq!(record.name, "ISS (ZARYA)");
        assert!(record.line2.starts_with("2 25544"));
    }

    #[test]
    fn missing_name_yields_none() {
        assert!(find_record(FILE, "ESTCUBE 1").is_none());
    }
}
