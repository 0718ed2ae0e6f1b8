//! Static league reference data: the 32 franchises, their stadiums, and
//! their divisional alignment. Providers return abbreviations; everything
//! user-facing goes through these lookups.

/// All 32 team abbreviations, alphabetical. Iteration order matters to the
/// synthetic provider (stable game pairings) so keep this sorted.
pub const TEAM_ABBREVIATIONS: [&str; 32] = [
    "ARI", "ATL", "BAL", "BUF", "CAR", "CHI", "CIN", "CLE", "DAL", "DEN", "DET", "GB", "HOU",
    "IND", "JAX", "KC", "LAC", "LAR", "LV", "MIA", "MIN", "NE", "NO", "NYG", "NYJ", "PHI", "PIT",
    "SEA", "SF", "TB", "TEN", "WSH",
];

/// Full franchise name for an abbreviation; unknown codes pass through
/// unchanged so upstream quirks degrade gracefully instead of erroring.
pub fn full_team_name(abbreviation: &str) -> String {
    let name = match abbreviation {
        "ARI" => "Arizona Cardinals",
        "ATL" => "Atlanta Falcons",
        "BAL" => "Baltimore Ravens",
        "BUF" => "Buffalo Bills",
        "CAR" => "Carolina Panthers",
        "CHI" => "Chicago Bears",
        "CIN" => "Cincinnati Bengals",
        "CLE" => "Cleveland Browns",
        "DAL" => "Dallas Cowboys",
        "DEN" => "Denver Broncos",
        "DET" => "Detroit Lions",
        "GB" => "Green Bay Packers",
        "HOU" => "Houston Texans",
        "IND" => "Indianapolis Colts",
        "JAX" => "Jacksonville Jaguars",
        "KC" => "Kansas City Chiefs",
        "LAC" => "Los Angeles Chargers",
        "LAR" => "Los Angeles Rams",
        "LV" => "Las Vegas Raiders",
        "MIA" => "Miami Dolphins",
        "MIN" => "Minnesota Vikings",
        "NE" => "New England Patriots",
        "NO" => "New Orleans Saints",
        "NYG" => "New York Giants",
        "NYJ" => "New York Jets",
        "PHI" => "Philadelphia Eagles",
        "PIT" => "Pittsburgh Steelers",
        "SEA" => "Seattle Seahawks",
        "SF" => "San Francisco 49ers",
        "TB" => "Tampa Bay Buccaneers",
        "TEN" => "Tennessee Titans",
        "WSH" => "Washington Commanders",
        other => other,
    };
    name.to_string()
}

/// Home stadium for a team. Neutral-site games bypass this.
pub fn venue_for(home_abbreviation: &str, neutral_site: bool) -> String {
    if neutral_site {
        return "Neutral Site".to_string();
    }
    let venue = match home_abbreviation {
        "ARI" => "State Farm Stadium",
        "ATL" => "Mercedes-Benz Stadium",
        "BAL" => "M&T Bank Stadium",
        "BUF" => "Highmark Stadium",
        "CAR" => "Bank of America Stadium",
        "CHI" => "Soldier Field",
        "CIN" => "Paycor Stadium",
        "CLE" => "Cleveland Browns Stadium",
        "DAL" => "AT&T Stadium",
        "DEN" => "Empower Field at Mile High",
        "DET" => "Ford Field",
        "GB" => "Lambeau Field",
        "HOU" => "NRG Stadium",
        "IND" => "Lucas Oil Stadium",
        "JAX" => "EverBank Stadium",
        "KC" => "Arrowhead Stadium",
        "LAC" | "LAR" => "SoFi Stadium",
        "LV" => "Allegiant Stadium",
        "MIA" => "Hard Rock Stadium",
        "MIN" => "U.S. Bank Stadium",
        "NE" => "Gillette Stadium",
        "NO" => "Caesars Superdome",
        "NYG" | "NYJ" => "MetLife Stadium",
        "PHI" => "Lincoln Financial Field",
        "PIT" => "Acrisure Stadium",
        "SEA" => "Lumen Field",
        "SF" => "Levi's Stadium",
        "TB" => "Raymond James Stadium",
        "TEN" => "Nissan Stadium",
        "WSH" => "FedExField",
        _ => "Unknown Stadium",
    };
    venue.to_string()
}

/// Division a team belongs to, or `None` for unrecognized codes.
pub fn division_of(abbreviation: &str) -> Option<&'static str> {
    let division = match abbreviation {
        "BUF" | "MIA" | "NE" | "NYJ" => "AFC East",
        "BAL" | "CIN" | "CLE" | "PIT" => "AFC North",
        "HOU" | "IND" | "JAX" | "TEN" => "AFC South",
        "DEN" | "KC" | "LAC" | "LV" => "AFC West",
        "DAL" | "NYG" | "PHI" | "WSH" => "NFC East",
        "CHI" | "DET" | "GB" | "MIN" => "NFC North",
        "ATL" | "CAR" | "NO" | "TB" => "NFC South",
        "ARI" | "LAR" | "SEA" | "SF" => "NFC West",
        _ => return None,
    };
    Some(division)
}

/// Two known teams sharing a division. Unknown teams are never divisional.
pub fn same_division(a: &str, b: &str) -> bool {
    match (division_of(a), division_of(b)) {
        (Some(da), Some(db)) => da == db,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_team_has_a_name_venue_and_division() {
        for abbr in TEAM_ABBREVIATIONS {
            assert_ne!(full_team_name(abbr), abbr, "missing name for {abbr}");
            assert_ne!(venue_for(abbr, false), "Unknown Stadium", "missing venue for {abbr}");
            assert!(division_of(abbr).is_some(), "missing division for {abbr}");
        }
    }

    #[test]
    fn divisions_hold_exactly_four_teams() {
        use std::collections::HashMap;
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for abbr in TEAM_ABBREVIATIONS {
            *counts.entry(division_of(abbr).unwrap()).or_default() += 1;
        }
        assert_eq!(counts.len(), 8);
        assert!(counts.values().all(|&n| n == 4));
    }

    #[test]
    fn divisional_detection() {
        assert!(same_division("DAL", "PHI"));
        assert!(same_division("KC", "DEN"));
        assert!(!same_division("DAL", "KC"));
        assert!(!same_division("XXX", "XXX")); // unknown codes never match
    }

    #[test]
    fn unknown_abbreviation_passes_through() {
        assert_eq!(full_team_name("XYZ"), "XYZ");
        assert_eq!(venue_for("XYZ", false), "Unknown Stadium");
        assert_eq!(venue_for("XYZ", true), "Neutral Site");
    }
}
