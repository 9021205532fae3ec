//! Player name search over the cached player dictionary

use std::collections::HashMap;

use crate::models::{Player, PlayerMatch};

/// Upper bound on candidates returned for an ambiguous name
pub const MAX_CANDIDATES: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum MatchRank {
    Exact,
    Prefix,
    Contains,
}

fn rank(player: &Player, needle: &str) -> Option<MatchRank> {
    let names = [
        Some(player.display_name()),
        player.first_name.clone(),
        player.last_name.clone(),
    ];

    names
        .iter()
        .flatten()
        .map(|name| name.to_lowercase())
        .filter_map(|name| {
            if name == needle {
                Some(MatchRank::Exact)
            } else if name.starts_with(needle) {
                Some(MatchRank::Prefix)
            } else if name.contains(needle) {
                Some(MatchRank::Contains)
            } else {
                None
            }
        })
        .min()
}

/// Case-insensitive match on full, first or last name, best matches first.
///
/// An exact full-name hit that is the only exact hit wins outright, so a
/// unique full name is never reported as ambiguous because of substring
/// matches on other players.
pub fn find_players(
    players: &HashMap<String, Player>,
    name: &str,
    position: Option<&str>,
) -> Option<PlayerMatch> {
    let needle = name.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }

    let mut ranked: Vec<(MatchRank, String, &Player)> = players
        .values()
        .filter(|p| position.map_or(true, |pos| p.plays(pos)))
        .filter_map(|p| rank(p, &needle).map(|r| (r, p.display_name(), p)))
        .collect();

    ranked.sort_by(|a, b| {
        a.0.cmp(&b.0)
            .then_with(|| a.1.cmp(&b.1))
            .then_with(|| a.2.player_id.cmp(&b.2.player_id))
    });

    let exact_full: Vec<&Player> = ranked
        .iter()
        .filter(|(_, display, _)| display.to_lowercase() == needle)
        .map(|(_, _, p)| *p)
        .collect();
    if let [only] = exact_full.as_slice() {
        return Some(PlayerMatch::Unique((*only).clone()));
    }

    let mut candidates: Vec<Player> = ranked
        .into_iter()
        .take(MAX_CANDIDATES)
        .map(|(_, _, p)| p.clone())
        .collect();

    match candidates.len() {
        0 => None,
        1 => candidates.pop().map(PlayerMatch::Unique),
        _ => Some(PlayerMatch::Ambiguous(candidates)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(id: &str, first: &str, last: &str, pos: &str) -> (String, Player) {
        let p: Player = serde_json::from_value(serde_json::json!({
            "player_id": id,
            "first_name": first,
            "last_name": last,
            "full_name": format!("{first} {last}"),
            "position": pos,
            "fantasy_positions": [pos],
        }))
        .unwrap();
        (id.to_string(), p)
    }

    fn pool() -> HashMap<String, Player> {
        [
            player("1", "Josh", "Allen", "QB"),
            player("2", "Josh", "Allen", "LB"),
            player("3", "Kenan", "Allen", "WR"),
            player("4", "Patrick", "Mahomes", "QB"),
            player("5", "Keenan", "Allen", "WR"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_unique_match() {
        let found = find_players(&pool(), "mahomes", None).unwrap();
        assert!(!found.is_ambiguous());
        assert_eq!(found.candidates()[0].player_id, "4");
    }

    #[test]
    fn test_shared_full_name_is_ambiguous() {
        let found = find_players(&pool(), "Josh Allen", None).unwrap();
        assert!(found.is_ambiguous());
        let ids: Vec<_> = found.candidates().iter().map(|p| p.player_id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn test_position_filter_disambiguates() {
        let found = find_players(&pool(), "Josh Allen", Some("QB")).unwrap();
        assert_eq!(found, PlayerMatch::Unique(pool()["1"].clone()));
    }

    #[test]
    fn test_exact_full_name_beats_partial_matches() {
        let found = find_players(&pool(), "keenan allen", None).unwrap();
        assert_eq!(found.candidates()[0].player_id, "5");
        assert!(!found.is_ambiguous());
    }

    #[test]
    fn test_last_name_lists_everyone_ranked() {
        let found = find_players(&pool(), "allen", None).unwrap();
        assert_eq!(found.candidates().len(), 4);
        assert!(found.is_ambiguous());
    }

    #[test]
    fn test_no_match() {
        assert!(find_players(&pool(), "brady", None).is_none());
        assert!(find_players(&pool(), "   ", None).is_none());
    }
}
