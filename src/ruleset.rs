//! Battle constants: type chart, CP multiplier curve, and energy/shield limits.
//!
//! The type chart is data, not code, so callers can swap in their own
//! ruleset. Pairs missing from the chart are neutral (1.0).

use phf::phf_map;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

pub const DEFAULT_RULESET_VERSION: &str = "go-pvp-simplified-v1";
pub const DEFAULT_TURN_DURATION_MS: u64 = 500;
pub const DEFAULT_MAX_ENERGY: u32 = 100;
pub const DEFAULT_SHIELDS_PER_SIDE: u32 = 2;
pub const DEFAULT_STAB_MULTIPLIER: f64 = 1.2;

/// Level whose multiplier stands in for any level missing from the table.
pub const FALLBACK_LEVEL: f64 = 40.0;
const FALLBACK_HALF_LEVEL: u16 = 80;
const FALLBACK_CP_MULTIPLIER: f64 = 0.79030001;

pub const STANDARD_TYPES: [&str; 18] = [
    "NORMAL", "FIRE", "WATER", "ELECTRIC", "GRASS", "ICE", "FIGHTING", "POISON", "GROUND",
    "FLYING", "PSYCHIC", "BUG", "ROCK", "GHOST", "DRAGON", "DARK", "STEEL", "FAIRY",
];

const TYPE_PREFIXES: [&str; 6] = [
    "POKEMON_TYPE_",
    "POKEMONTYPE_",
    "POKEMONTYPE",
    "POKEMON_TYPE",
    "TYPE_",
    "TYPE",
];

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RulesetError {
    #[error("CP multiplier table has no level 40 entry to fall back on")]
    MissingFallbackLevel,
    #[error("CP multiplier level {0} is not a positive half level")]
    InvalidLevel(f64),
    #[error("CP multiplier for level {level} must be positive and finite, got {multiplier}")]
    InvalidMultiplier { level: f64, multiplier: f64 },
    #[error("CP multiplier table lists level {0} more than once")]
    DuplicateLevel(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeEffectiveness {
    #[serde(deserialize_with = "deserialize_type_tag")]
    pub attacker_type: String,
    #[serde(deserialize_with = "deserialize_type_tag")]
    pub defender_type: String,
    pub multiplier: f64,
}

impl TypeEffectiveness {
    /// Tags are stored normalised; lookups compare against normalised input.
    pub fn new(attacker_type: &str, defender_type: &str, multiplier: f64) -> Self {
        TypeEffectiveness {
            attacker_type: normalize_type_name(attacker_type),
            defender_type: normalize_type_name(defender_type),
            multiplier,
        }
    }
}

fn deserialize_type_tag<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(normalize_type_name(&raw))
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CpMultiplierEntry {
    pub level: f64,
    pub multiplier: f64,
}

/// Level -> CP multiplier lookup. Always holds a level 40 entry, so the
/// fallback used for unknown levels exists by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CpMultiplierEntry>", into = "Vec<CpMultiplierEntry>")]
pub struct CpMultiplierTable {
    by_half_level: BTreeMap<u16, f64>,
    fallback: f64,
}

impl CpMultiplierTable {
    pub fn new(
        entries: impl IntoIterator<Item = CpMultiplierEntry>,
    ) -> Result<Self, RulesetError> {
        let mut by_half_level = BTreeMap::new();
        for entry in entries {
            let key = half_level_key(entry.level).ok_or(RulesetError::InvalidLevel(entry.level))?;
            if !entry.multiplier.is_finite() || entry.multiplier <= 0.0 {
                return Err(RulesetError::InvalidMultiplier {
                    level: entry.level,
                    multiplier: entry.multiplier,
                });
            }
            if by_half_level.insert(key, entry.multiplier).is_some() {
                return Err(RulesetError::DuplicateLevel(entry.level));
            }
        }
        let fallback = half_level_key(FALLBACK_LEVEL)
            .and_then(|key| by_half_level.get(&key).copied())
            .ok_or(RulesetError::MissingFallbackLevel)?;
        Ok(CpMultiplierTable {
            by_half_level,
            fallback,
        })
    }

    /// Exact lookup; `None` for levels the table does not list.
    pub fn get(&self, level: f64) -> Option<f64> {
        half_level_key(level).and_then(|key| self.by_half_level.get(&key).copied())
    }

    pub fn multiplier(&self, level: f64) -> f64 {
        self.get(level).unwrap_or(self.fallback)
    }

    pub fn fallback(&self) -> f64 {
        self.fallback
    }

    pub fn len(&self) -> usize {
        self.by_half_level.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_half_level.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = CpMultiplierEntry> + '_ {
        self.by_half_level
            .iter()
            .map(|(key, multiplier)| CpMultiplierEntry {
                level: f64::from(*key) / 2.0,
                multiplier: *multiplier,
            })
    }
}

impl TryFrom<Vec<CpMultiplierEntry>> for CpMultiplierTable {
    type Error = RulesetError;

    fn try_from(entries: Vec<CpMultiplierEntry>) -> Result<Self, Self::Error> {
        CpMultiplierTable::new(entries)
    }
}

impl From<CpMultiplierTable> for Vec<CpMultiplierEntry> {
    fn from(table: CpMultiplierTable) -> Self {
        table.entries().collect()
    }
}

/// Key for a level that sits on a half step (1, 1.5, 2, ...).
pub(crate) fn half_level_key(level: f64) -> Option<u16> {
    let doubled = level * 2.0;
    if !doubled.is_finite() || doubled < 1.0 || doubled > f64::from(u16::MAX) {
        return None;
    }
    if doubled.fract() != 0.0 {
        return None;
    }
    Some(doubled as u16)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleRuleset {
    pub version: String,
    pub turn_duration_ms: u64,
    pub max_energy: u32,
    pub shields_per_side: u32,
    pub stab_multiplier: f64,
    pub type_effectiveness: Vec<TypeEffectiveness>,
    pub cp_multiplier_table: CpMultiplierTable,
}

impl Default for BattleRuleset {
    fn default() -> Self {
        default_ruleset()
    }
}

impl BattleRuleset {
    pub fn cp_multiplier(&self, level: f64) -> f64 {
        self.cp_multiplier_table.multiplier(level)
    }

    /// Multiplier for one attacker/defender pair, both already normalised.
    fn pair_multiplier(&self, attacker: &str, defender: &str) -> f64 {
        self.type_effectiveness
            .iter()
            .find(|e| e.attacker_type == attacker && e.defender_type == defender)
            .map_or(1.0, |e| e.multiplier)
    }
}

pub fn default_ruleset() -> BattleRuleset {
    let by_half_level: BTreeMap<u16, f64> = CP_MULTIPLIERS
        .entries()
        .map(|(key, multiplier)| (*key, *multiplier))
        .collect();
    let fallback = by_half_level
        .get(&FALLBACK_HALF_LEVEL)
        .copied()
        .unwrap_or(FALLBACK_CP_MULTIPLIER);
    let cp_multiplier_table = CpMultiplierTable {
        by_half_level,
        fallback,
    };
    BattleRuleset {
        version: DEFAULT_RULESET_VERSION.to_string(),
        turn_duration_ms: DEFAULT_TURN_DURATION_MS,
        max_energy: DEFAULT_MAX_ENERGY,
        shields_per_side: DEFAULT_SHIELDS_PER_SIDE,
        stab_multiplier: DEFAULT_STAB_MULTIPLIER,
        type_effectiveness: DEFAULT_TYPE_CHART
            .iter()
            .map(|(attacker, defender, multiplier)| {
                TypeEffectiveness::new(attacker, defender, *multiplier)
            })
            .collect(),
        cp_multiplier_table,
    }
}

/// Product of the chart multipliers for `attacker_type` against each defender type.
/// Unknown tags are neutral.
pub fn get_type_effectiveness<S: AsRef<str>>(
    attacker_type: &str,
    defender_types: &[S],
    ruleset: &BattleRuleset,
) -> f64 {
    let attacker = normalize_type_name(attacker_type);
    defender_types
        .iter()
        .map(|defender| ruleset.pair_multiplier(&attacker, &normalize_type_name(defender.as_ref())))
        .product()
}

/// Canonical form of a type tag: `"pokemon_type_fire"` and `"Fire"` both become `"FIRE"`.
pub fn normalize_type_name(name: &str) -> String {
    let mut tag = name.trim().to_ascii_uppercase();
    for prefix in TYPE_PREFIXES {
        if let Some(rest) = tag.strip_prefix(prefix) {
            tag = rest.to_string();
        }
    }
    tag.retain(|c| c.is_ascii_alphabetic());
    tag
}

/// Standard attacking types that hit the given defender for more than 1x.
pub fn weak_against(
    primary: &str,
    secondary: Option<&str>,
    ruleset: &BattleRuleset,
) -> Vec<&'static str> {
    let defender: Vec<&str> = std::iter::once(primary).chain(secondary).collect();
    STANDARD_TYPES
        .into_iter()
        .filter(|attacker| get_type_effectiveness(attacker, &defender, ruleset) > 1.0)
        .collect()
}

/// Standard defending types that at least one of the given types hits for more than 1x.
pub fn strong_against(
    primary: &str,
    secondary: Option<&str>,
    ruleset: &BattleRuleset,
) -> Vec<&'static str> {
    let attackers: Vec<&str> = std::iter::once(primary).chain(secondary).collect();
    STANDARD_TYPES
        .into_iter()
        .filter(|defender| {
            attackers
                .iter()
                .any(|attacker| get_type_effectiveness(attacker, &[*defender], ruleset) > 1.0)
        })
        .collect()
}

// Keyed by level * 2 so half levels are integral.
static CP_MULTIPLIERS: phf::Map<u16, f64> = phf_map! {
    2u16 => 0.094,
    3u16 => 0.1351374318,
    4u16 => 0.16639787,
    5u16 => 0.192650919,
    6u16 => 0.21573247,
    7u16 => 0.2365726613,
    8u16 => 0.25572005,
    9u16 => 0.2735303812,
    10u16 => 0.29024988,
    11u16 => 0.3060573775,
    12u16 => 0.3210876,
    13u16 => 0.3354450362,
    14u16 => 0.34921268,
    15u16 => 0.3624577511,
    16u16 => 0.3752356,
    17u16 => 0.387592416,
    18u16 => 0.39956728,
    19u16 => 0.4111935514,
    20u16 => 0.42250001,
    21u16 => 0.4329264091,
    22u16 => 0.44310755,
    23u16 => 0.4530599591,
    24u16 => 0.46279839,
    25u16 => 0.472336093,
    26u16 => 0.48168495,
    27u16 => 0.4908558003,
    28u16 => 0.49985844,
    29u16 => 0.508701765,
    30u16 => 0.51739395,
    31u16 => 0.5259425113,
    32u16 => 0.53435433,
    33u16 => 0.5426357375,
    34u16 => 0.55079269,
    35u16 => 0.5588305862,
    36u16 => 0.56675452,
    37u16 => 0.5745691333,
    38u16 => 0.58227891,
    39u16 => 0.5898879072,
    40u16 => 0.59740001,
    41u16 => 0.6048236651,
    42u16 => 0.61215729,
    43u16 => 0.6194041216,
    44u16 => 0.62656713,
    45u16 => 0.6336491432,
    46u16 => 0.64065295,
    47u16 => 0.6475809666,
    48u16 => 0.65443563,
    49u16 => 0.6612192524,
    50u16 => 0.667934,
    51u16 => 0.6745818959,
    52u16 => 0.68116492,
    53u16 => 0.6876849038,
    54u16 => 0.69414365,
    55u16 => 0.70054287,
    56u16 => 0.70688421,
    57u16 => 0.7131691091,
    58u16 => 0.71939909,
    59u16 => 0.7255756136,
    60u16 => 0.7317,
    61u16 => 0.7347410093,
    62u16 => 0.73776948,
    63u16 => 0.7407855938,
    64u16 => 0.74378943,
    65u16 => 0.7467812109,
    66u16 => 0.74976104,
    67u16 => 0.7527290867,
    68u16 => 0.75568551,
    69u16 => 0.7586303683,
    70u16 => 0.76156384,
    71u16 => 0.7644860647,
    72u16 => 0.76739717,
    73u16 => 0.7702972656,
    74u16 => 0.77323294,
    75u16 => 0.7761436265,
    76u16 => 0.77905077,
    77u16 => 0.7819529828,
    78u16 => 0.78485119,
    79u16 => 0.7877282006,
    80u16 => 0.79030001,
    81u16 => 0.7928039,
    82u16 => 0.79530001,
    83u16 => 0.7978039,
    84u16 => 0.8003,
    85u16 => 0.8028039,
    86u16 => 0.8053,
    87u16 => 0.8078039,
    88u16 => 0.81029999,
    89u16 => 0.812803,
    90u16 => 0.81529999,
    91u16 => 0.8178039,
    92u16 => 0.82029999,
    93u16 => 0.8228039,
    94u16 => 0.82529999,
    95u16 => 0.8278039,
    96u16 => 0.83029999,
    97u16 => 0.8328039,
    98u16 => 0.83529999,
    99u16 => 0.8378039,
    100u16 => 0.84029999,
};

#[rustfmt::skip]
const DEFAULT_TYPE_CHART: &[(&str, &str, f64)] = &[
    // Normal
    ("NORMAL", "ROCK", 0.5),
    ("NORMAL", "GHOST", 0.0),
    ("NORMAL", "STEEL", 0.5),
    // Fire
    ("FIRE", "FIRE", 0.5),
    ("FIRE", "WATER", 0.5),
    ("FIRE", "GRASS", 2.0),
    ("FIRE", "ICE", 2.0),
    ("FIRE", "BUG", 2.0),
    ("FIRE", "STEEL", 2.0),
    ("FIRE", "ROCK", 0.5),
    ("FIRE", "DRAGON", 0.5),
    // Water
    ("WATER", "FIRE", 2.0),
    ("WATER", "WATER", 0.5),
    ("WATER", "GRASS", 0.5),
    ("WATER", "GROUND", 2.0),
    ("WATER", "ROCK", 2.0),
    ("WATER", "DRAGON", 0.5),
    // Electric
    ("ELECTRIC", "WATER", 2.0),
    ("ELECTRIC", "ELECTRIC", 0.5),
    ("ELECTRIC", "GRASS", 0.5),
    ("ELECTRIC", "GROUND", 0.0),
    ("ELECTRIC", "FLYING", 2.0),
    ("ELECTRIC", "DRAGON", 0.5),
    // Grass
    ("GRASS", "FIRE", 0.5),
    ("GRASS", "WATER", 2.0),
    ("GRASS", "GRASS", 0.5),
    ("GRASS", "POISON", 0.5),
    ("GRASS", "GROUND", 2.0),
    ("GRASS", "FLYING", 0.5),
    ("GRASS", "BUG", 0.5),
    ("GRASS", "ROCK", 2.0),
    ("GRASS", "DRAGON", 0.5),
    ("GRASS", "STEEL", 0.5),
    // Ice
    ("ICE", "FIRE", 0.5),
    ("ICE", "WATER", 0.5),
    ("ICE", "GRASS", 2.0),
    ("ICE", "ICE", 0.5),
    ("ICE", "GROUND", 2.0),
    ("ICE", "FLYING", 2.0),
    ("ICE", "DRAGON", 2.0),
    ("ICE", "STEEL", 0.5),
    // Fighting
    ("FIGHTING", "NORMAL", 2.0),
    ("FIGHTING", "ICE", 2.0),
    ("FIGHTING", "POISON", 0.5),
    ("FIGHTING", "FLYING", 0.5),
    ("FIGHTING", "PSYCHIC", 0.5),
    ("FIGHTING", "BUG", 0.5),
    ("FIGHTING", "ROCK", 2.0),
    ("FIGHTING", "GHOST", 0.0),
    ("FIGHTING", "DARK", 2.0),
    ("FIGHTING", "STEEL", 2.0),
    // Poison
    ("POISON", "GRASS", 2.0),
    ("POISON", "POISON", 0.5),
    ("POISON", "GROUND", 0.5),
    ("POISON", "ROCK", 0.5),
    ("POISON", "GHOST", 0.5),
    ("POISON", "STEEL", 0.0),
    // Ground
    ("GROUND", "FIRE", 2.0),
    ("GROUND", "ELECTRIC", 2.0),
    ("GROUND", "GRASS", 0.5),
    ("GROUND", "POISON", 2.0),
    ("GROUND", "FLYING", 0.0),
    ("GROUND", "BUG", 0.5),
    ("GROUND", "ROCK", 2.0),
    ("GROUND", "STEEL", 2.0),
    // Flying
    ("FLYING", "ELECTRIC", 0.5),
    ("FLYING", "GRASS", 2.0),
    ("FLYING", "FIGHTING", 2.0),
    ("FLYING", "BUG", 2.0),
    ("FLYING", "ROCK", 0.5),
    ("FLYING", "STEEL", 0.5),
    // Psychic
    ("PSYCHIC", "FIGHTING", 2.0),
    ("PSYCHIC", "POISON", 2.0),
    ("PSYCHIC", "PSYCHIC", 0.5),
    ("PSYCHIC", "DARK", 0.0),
    ("PSYCHIC", "STEEL", 0.5),
    // Bug
    ("BUG", "FIRE", 0.5),
    ("BUG", "GRASS", 2.0),
    ("BUG", "FIGHTING", 0.5),
    ("BUG", "POISON", 0.5),
    ("BUG", "FLYING", 0.5),
    ("BUG", "PSYCHIC", 2.0),
    ("BUG", "GHOST", 0.5),
    ("BUG", "DARK", 2.0),
    ("BUG", "STEEL", 0.5),
    // Rock
    ("ROCK", "FIRE", 2.0),
    ("ROCK", "ICE", 2.0),
    ("ROCK", "FIGHTING", 0.5),
    ("ROCK", "GROUND", 0.5),
    ("ROCK", "FLYING", 2.0),
    ("ROCK", "BUG", 2.0),
    ("ROCK", "STEEL", 0.5),
    // Ghost
    ("GHOST", "NORMAL", 0.0),
    ("GHOST", "PSYCHIC", 2.0),
    ("GHOST", "GHOST", 2.0),
    ("GHOST", "DARK", 0.5),
    // Dragon
    ("DRAGON", "DRAGON", 2.0),
    ("DRAGON", "STEEL", 0.5),
    // Dark
    ("DARK", "FIGHTING", 0.5),
    ("DARK", "PSYCHIC", 2.0),
    ("DARK", "GHOST", 2.0),
    ("DARK", "DARK", 0.5),
    ("DARK", "STEEL", 0.5),
    // Steel
    ("STEEL", "FIRE", 0.5),
    ("STEEL", "WATER", 0.5),
    ("STEEL", "ELECTRIC", 0.5),
    ("STEEL", "ICE", 2.0),
    ("STEEL", "ROCK", 2.0),
    ("STEEL", "STEEL", 0.5),
    // Fairy
    ("FAIRY", "FIRE", 0.5),
    ("FAIRY", "FIGHTING", 2.0),
    ("FAIRY", "POISON", 0.5),
    ("FAIRY", "DRAGON", 2.0),
    ("FAIRY", "DARK", 2.0),
    ("FAIRY", "STEEL", 0.5),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chart_lookups_match_the_default_ruleset() {
        let ruleset = default_ruleset();
        assert_eq!(get_type_effectiveness("FIRE", &["GRASS"], &ruleset), 2.0);
        assert_eq!(get_type_effectiveness("FIRE", &["WATER"], &ruleset), 0.5);
        assert_eq!(get_type_effectiveness("NORMAL", &["GHOST"], &ruleset), 0.0);
        assert_eq!(
            get_type_effectiveness("ELECTRIC", &["WATER", "FLYING"], &ruleset),
            4.0
        );
        assert_eq!(get_type_effectiveness("GRASS", &["FIRE", "FLYING"], &ruleset), 0.25);
    }

    #[test]
    fn unknown_and_empty_types_are_neutral() {
        let ruleset = default_ruleset();
        assert_eq!(get_type_effectiveness("SHADOW", &["FIRE"], &ruleset), 1.0);
        assert_eq!(get_type_effectiveness("FIRE", &["COSMIC"], &ruleset), 1.0);
        assert_eq!(get_type_effectiveness("", &["GRASS"], &ruleset), 1.0);
        let none: [&str; 0] = [];
        assert_eq!(get_type_effectiveness("FIRE", &none, &ruleset), 1.0);
    }

    #[test]
    fn type_names_are_normalised_before_lookup() {
        assert_eq!(normalize_type_name("pokemon_type_fire"), "FIRE");
        assert_eq!(normalize_type_name("POKEMONTYPE_WATER"), "WATER");
        assert_eq!(normalize_type_name("type_grass"), "GRASS");
        assert_eq!(normalize_type_name(" Electric "), "ELECTRIC");
        assert_eq!(normalize_type_name("???"), "");

        let ruleset = default_ruleset();
        assert_eq!(
            get_type_effectiveness("pokemon_type_fire", &["Grass"], &ruleset),
            2.0
        );
    }

    #[test]
    fn cp_multiplier_falls_back_to_level_forty() {
        let ruleset = default_ruleset();
        assert_eq!(ruleset.cp_multiplier(40.0), 0.79030001);
        assert_eq!(ruleset.cp_multiplier(1.0), 0.094);
        assert_eq!(ruleset.cp_multiplier(1.5), 0.1351374318);
        assert_eq!(ruleset.cp_multiplier(50.0), 0.84029999);
        assert_eq!(ruleset.cp_multiplier(51.0), 0.79030001);
        assert_eq!(ruleset.cp_multiplier(12.3), 0.79030001);
        assert_eq!(ruleset.cp_multiplier_table.get(12.3), None);
        assert_eq!(ruleset.cp_multiplier_table.len(), 99);
    }

    #[test]
    fn table_requires_a_fallback_entry() {
        let err = CpMultiplierTable::new(vec![CpMultiplierEntry {
            level: 1.0,
            multiplier: 0.094,
        }])
        .unwrap_err();
        assert_eq!(err, RulesetError::MissingFallbackLevel);
    }

    #[test]
    fn table_rejects_bad_entries() {
        let fallback = CpMultiplierEntry {
            level: 40.0,
            multiplier: 0.79,
        };
        let err = CpMultiplierTable::new(vec![
            fallback,
            CpMultiplierEntry {
                level: 10.25,
                multiplier: 0.4,
            },
        ])
        .unwrap_err();
        assert_eq!(err, RulesetError::InvalidLevel(10.25));

        let err = CpMultiplierTable::new(vec![
            fallback,
            CpMultiplierEntry {
                level: 20.0,
                multiplier: 0.0,
            },
        ])
        .unwrap_err();
        assert!(matches!(err, RulesetError::InvalidMultiplier { .. }));

        let err = CpMultiplierTable::new(vec![fallback, fallback]).unwrap_err();
        assert_eq!(err, RulesetError::DuplicateLevel(40.0));
    }

    #[test]
    fn weak_and_strong_against_use_the_standard_types() {
        let ruleset = default_ruleset();
        assert_eq!(
            weak_against("GRASS", None, &ruleset),
            vec!["FIRE", "ICE", "POISON", "FLYING", "BUG"]
        );
        assert_eq!(weak_against("WATER", Some("GROUND"), &ruleset), vec!["GRASS"]);
        assert_eq!(
            strong_against("FIRE", None, &ruleset),
            vec!["GRASS", "ICE", "BUG", "STEEL"]
        );
    }

    #[test]
    fn ruleset_round_trips_through_json() {
        let ruleset = default_ruleset();
        let json = serde_json::to_string(&ruleset).unwrap();
        assert!(json.contains("\"turnDurationMs\":500"));
        assert!(json.contains("\"cpMultiplierTable\":[{\"level\":1.0,\"multiplier\":0.094}"));
        let back: BattleRuleset = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ruleset);
    }

    #[test]
    fn deserialised_chart_tags_are_normalised() {
        let json = r#"{
            "version": "custom",
            "turnDurationMs": 500,
            "maxEnergy": 100,
            "shieldsPerSide": 1,
            "stabMultiplier": 1.5,
            "typeEffectiveness": [
                {"attackerType": "pokemon_type_dragon", "defenderType": "dragon", "multiplier": 1.6}
            ],
            "cpMultiplierTable": [{"level": 40, "multiplier": 0.79030001}]
        }"#;
        let ruleset: BattleRuleset = serde_json::from_str(json).unwrap();
        assert_eq!(ruleset.type_effectiveness[0].attacker_type, "DRAGON");
        assert_eq!(get_type_effectiveness("Dragon", &["DRAGON"], &ruleset), 1.6);

        let missing_fallback = json.replace("\"level\": 40", "\"level\": 30");
        assert!(serde_json::from_str::<BattleRuleset>(&missing_fallback).is_err());
    }
}
