use crate::calculations::{calculate_cp, calculate_hp};
use crate::ruleset::{half_level_key, normalize_type_name, BattleRuleset};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MAX_IV: u8 = 15;
pub const MIN_OVERRIDE_LEVEL: f64 = 1.0;
pub const MAX_OVERRIDE_LEVEL: f64 = 50.0;

/// Level and IVs assumed for a combatant when the caller asks for nothing else.
pub const DEFAULT_LEVEL: f64 = 40.0;
pub const DEFAULT_IV: u8 = MAX_IV;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SnapshotError {
    #[error("move {id}: fast moves must generate energy (energyDelta <= 0), got {energy_delta}")]
    FastMoveEnergy { id: String, energy_delta: i32 },
    #[error("move {id}: charged moves must consume energy (energyDelta >= 0), got {energy_delta}")]
    ChargedMoveEnergy { id: String, energy_delta: i32 },
    #[error("move {id}: power must be finite and non-negative, got {power}")]
    InvalidPower { id: String, power: f64 },
    #[error("move {id} is a {actual:?} move but was given as a {expected:?} move")]
    WrongCategory {
        id: String,
        expected: MoveCategory,
        actual: MoveCategory,
    },
    #[error("at least one charged move is required")]
    NoChargedMoves,
    #[error("{form_id}: {stat} IV must be between 0 and 15, got {value}")]
    IvOutOfRange {
        form_id: String,
        stat: &'static str,
        value: u8,
    },
    #[error("{form_id}: level must be a positive finite number, got {level}")]
    InvalidLevel { form_id: String, level: f64 },
    #[error("level override must be a half level between 1 and 50, got {0}")]
    OverrideLevelOutOfRange(f64),
    #[error("{form_id}: precomputed {stat} must be at least 1")]
    ZeroPrecomputedStat { form_id: String, stat: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MoveCategory {
    Fast,
    Charged,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveSnapshot {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub move_type: String,
    pub category: MoveCategory,
    #[serde(default)]
    pub power: f64,
    /// Negative for fast moves (energy generated), positive for charged moves (energy consumed).
    pub energy_delta: i32,
    #[serde(default)]
    pub duration_ms: u32,
}

impl MoveSnapshot {
    pub fn fast(
        id: impl Into<String>,
        name: impl Into<String>,
        move_type: impl Into<String>,
        power: f64,
        energy_gain: u32,
    ) -> Self {
        MoveSnapshot {
            id: id.into(),
            name: name.into(),
            move_type: move_type.into(),
            category: MoveCategory::Fast,
            power,
            energy_delta: -i32::try_from(energy_gain).unwrap_or(i32::MAX),
            duration_ms: 500,
        }
    }

    pub fn charged(
        id: impl Into<String>,
        name: impl Into<String>,
        move_type: impl Into<String>,
        power: f64,
        energy_cost: u32,
    ) -> Self {
        MoveSnapshot {
            id: id.into(),
            name: name.into(),
            move_type: move_type.into(),
            category: MoveCategory::Charged,
            power,
            energy_delta: i32::try_from(energy_cost).unwrap_or(i32::MAX),
            duration_ms: 0,
        }
    }

    pub fn validate(&self) -> Result<(), SnapshotError> {
        if !self.power.is_finite() || self.power < 0.0 {
            return Err(SnapshotError::InvalidPower {
                id: self.id.clone(),
                power: self.power,
            });
        }
        match self.category {
            MoveCategory::Fast if self.energy_delta > 0 => Err(SnapshotError::FastMoveEnergy {
                id: self.id.clone(),
                energy_delta: self.energy_delta,
            }),
            MoveCategory::Charged if self.energy_delta < 0 => {
                Err(SnapshotError::ChargedMoveEnergy {
                    id: self.id.clone(),
                    energy_delta: self.energy_delta,
                })
            }
            _ => Ok(()),
        }
    }

    fn expect_category(&self, expected: MoveCategory) -> Result<(), SnapshotError> {
        if self.category != expected {
            return Err(SnapshotError::WrongCategory {
                id: self.id.clone(),
                expected,
                actual: self.category,
            });
        }
        self.validate()
    }
}

/// Ordered, non-empty list of charged moves. Order matters: the battle loop
/// fires the first affordable entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<MoveSnapshot>", into = "Vec<MoveSnapshot>")]
pub struct ChargedMoves(Vec<MoveSnapshot>);

impl ChargedMoves {
    pub fn new(moves: Vec<MoveSnapshot>) -> Result<Self, SnapshotError> {
        if moves.is_empty() {
            return Err(SnapshotError::NoChargedMoves);
        }
        for mv in &moves {
            mv.expect_category(MoveCategory::Charged)?;
        }
        Ok(ChargedMoves(moves))
    }

    pub fn single(mv: MoveSnapshot) -> Result<Self, SnapshotError> {
        Self::new(vec![mv])
    }

    pub fn first(&self) -> &MoveSnapshot {
        &self.0[0]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MoveSnapshot> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[MoveSnapshot] {
        &self.0
    }
}

impl TryFrom<Vec<MoveSnapshot>> for ChargedMoves {
    type Error = SnapshotError;

    fn try_from(moves: Vec<MoveSnapshot>) -> Result<Self, Self::Error> {
        ChargedMoves::new(moves)
    }
}

impl From<ChargedMoves> for Vec<MoveSnapshot> {
    fn from(moves: ChargedMoves) -> Self {
        moves.0
    }
}

impl<'a> IntoIterator for &'a ChargedMoves {
    type Item = &'a MoveSnapshot;
    type IntoIter = std::slice::Iter<'a, MoveSnapshot>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Battle-ready description of one combatant. The simulator never mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PokemonSnapshot {
    pub form_id: String,
    pub species_name: String,
    #[serde(default)]
    pub form_name: String,
    pub primary_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_type: Option<String>,
    pub base_attack: u32,
    pub base_defense: u32,
    pub base_stamina: u32,
    pub level: f64,
    pub iv_atk: u8,
    pub iv_def: u8,
    pub iv_sta: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cp: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hp: Option<u32>,
    pub fast_move: MoveSnapshot,
    pub charged_moves: ChargedMoves,
}

impl PokemonSnapshot {
    pub fn types(&self) -> Vec<&str> {
        std::iter::once(self.primary_type.as_str())
            .chain(self.secondary_type.as_deref())
            .collect()
    }

    /// Type match used for STAB; tags are compared in normalised form.
    pub fn has_type(&self, type_tag: &str) -> bool {
        let wanted = normalize_type_name(type_tag);
        if wanted.is_empty() {
            return false;
        }
        self.types()
            .into_iter()
            .any(|t| normalize_type_name(t) == wanted)
    }

    pub fn validate(&self) -> Result<(), SnapshotError> {
        if !self.level.is_finite() || self.level <= 0.0 {
            return Err(SnapshotError::InvalidLevel {
                form_id: self.form_id.clone(),
                level: self.level,
            });
        }
        for (stat, value) in [
            ("attack", self.iv_atk),
            ("defense", self.iv_def),
            ("stamina", self.iv_sta),
        ] {
            if value > MAX_IV {
                return Err(SnapshotError::IvOutOfRange {
                    form_id: self.form_id.clone(),
                    stat,
                    value,
                });
            }
        }
        for (stat, value) in [("CP", self.cp), ("HP", self.hp)] {
            if value == Some(0) {
                return Err(SnapshotError::ZeroPrecomputedStat {
                    form_id: self.form_id.clone(),
                    stat,
                });
            }
        }
        self.fast_move.expect_category(MoveCategory::Fast)?;
        for mv in &self.charged_moves {
            mv.expect_category(MoveCategory::Charged)?;
        }
        Ok(())
    }

    /// Applies caller-requested level/IV changes. Precomputed CP/HP are
    /// dropped when anything changes since they no longer describe the combatant.
    pub fn apply_overrides(
        &self,
        overrides: &SnapshotOverrides,
    ) -> Result<PokemonSnapshot, SnapshotError> {
        overrides.validate(&self.form_id)?;
        if overrides.is_empty() {
            return Ok(self.clone());
        }
        let mut next = self.clone();
        if let Some(level) = overrides.level {
            next.level = level;
        }
        if let Some(iv) = overrides.iv_atk {
            next.iv_atk = iv;
        }
        if let Some(iv) = overrides.iv_def {
            next.iv_def = iv;
        }
        if let Some(iv) = overrides.iv_sta {
            next.iv_sta = iv;
        }
        next.cp = None;
        next.hp = None;
        next.validate()?;
        Ok(next)
    }

    pub fn with_computed_stats(mut self, ruleset: &BattleRuleset) -> Self {
        self.cp = Some(calculate_cp(
            self.base_attack,
            self.base_defense,
            self.base_stamina,
            self.iv_atk,
            self.iv_def,
            self.iv_sta,
            self.level,
            ruleset,
        ));
        self.hp = Some(calculate_hp(
            self.base_stamina,
            self.iv_sta,
            self.level,
            ruleset,
        ));
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotOverrides {
    #[serde(default)]
    pub level: Option<f64>,
    #[serde(default)]
    pub iv_atk: Option<u8>,
    #[serde(default)]
    pub iv_def: Option<u8>,
    #[serde(default)]
    pub iv_sta: Option<u8>,
}

impl SnapshotOverrides {
    /// Level 40 with perfect IVs.
    pub fn standard() -> Self {
        SnapshotOverrides {
            level: Some(DEFAULT_LEVEL),
            iv_atk: Some(DEFAULT_IV),
            iv_def: Some(DEFAULT_IV),
            iv_sta: Some(DEFAULT_IV),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.level.is_none()
            && self.iv_atk.is_none()
            && self.iv_def.is_none()
            && self.iv_sta.is_none()
    }

    fn validate(&self, form_id: &str) -> Result<(), SnapshotError> {
        if let Some(level) = self.level {
            let in_range = (MIN_OVERRIDE_LEVEL..=MAX_OVERRIDE_LEVEL).contains(&level);
            if !in_range || half_level_key(level).is_none() {
                return Err(SnapshotError::OverrideLevelOutOfRange(level));
            }
        }
        for (stat, value) in [
            ("attack", self.iv_atk),
            ("defense", self.iv_def),
            ("stamina", self.iv_sta),
        ] {
            if let Some(value) = value.filter(|v| *v > MAX_IV) {
                return Err(SnapshotError::IvOutOfRange {
                    form_id: form_id.to_string(),
                    stat,
                    value,
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterFile {
    pub roster: Vec<PokemonSnapshot>,
}
