use crate::battle::BattleParticipant;
use crate::model::{MoveCategory, MoveSnapshot, PokemonSnapshot};
use crate::ruleset::{get_type_effectiveness, BattleRuleset};

pub fn cp_multiplier(level: f64, ruleset: &BattleRuleset) -> f64 {
    ruleset.cp_multiplier(level)
}

#[allow(clippy::too_many_arguments)]
pub fn calculate_cp(
    base_atk: u32,
    base_def: u32,
    base_sta: u32,
    iv_atk: u8,
    iv_def: u8,
    iv_sta: u8,
    level: f64,
    ruleset: &BattleRuleset,
) -> u32 {
    let m = cp_multiplier(level, ruleset);
    let attack = f64::from(base_atk) + f64::from(iv_atk);
    let defense = f64::from(base_def) + f64::from(iv_def);
    let stamina = f64::from(base_sta) + f64::from(iv_sta);
    let cp = (attack * defense.sqrt() * stamina.sqrt() * (m * m) / 10.0).floor();
    (cp as u32).max(1)
}

pub fn calculate_hp(base_sta: u32, iv_sta: u8, level: f64, ruleset: &BattleRuleset) -> u32 {
    let m = cp_multiplier(level, ruleset);
    let hp = ((f64::from(base_sta) + f64::from(iv_sta)) * m).floor();
    (hp as u32).max(1)
}

/// Damage plus the multipliers that produced it, so the battle log can
/// report effectiveness without a second chart lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageBreakdown {
    pub damage: u32,
    pub effectiveness: f64,
    pub stab: f64,
}

pub fn damage_breakdown(
    mv: &MoveSnapshot,
    attacker: &PokemonSnapshot,
    defender: &PokemonSnapshot,
    ruleset: &BattleRuleset,
) -> DamageBreakdown {
    let attack_stat = (f64::from(attacker.base_attack) + f64::from(attacker.iv_atk))
        * cp_multiplier(attacker.level, ruleset);
    let defense_stat = (f64::from(defender.base_defense) + f64::from(defender.iv_def))
        * cp_multiplier(defender.level, ruleset);
    let stab = if attacker.has_type(&mv.move_type) {
        ruleset.stab_multiplier
    } else {
        1.0
    };
    let effectiveness = get_type_effectiveness(&mv.move_type, &defender.types(), ruleset);
    let base = (0.5 * mv.power * (attack_stat / defense_stat) * stab * effectiveness).floor();
    // +1 after flooring: every hit chips at least one point, even at 0x.
    let damage = (base as u32).saturating_add(1).max(1);
    DamageBreakdown {
        damage,
        effectiveness,
        stab,
    }
}

pub fn calculate_damage(
    mv: &MoveSnapshot,
    attacker: &PokemonSnapshot,
    defender: &PokemonSnapshot,
    ruleset: &BattleRuleset,
) -> u32 {
    damage_breakdown(mv, attacker, defender, ruleset).damage
}

pub fn calculate_energy_gain(mv: &MoveSnapshot) -> u32 {
    match mv.category {
        MoveCategory::Fast => mv.energy_delta.unsigned_abs(),
        MoveCategory::Charged => 0,
    }
}

pub fn calculate_energy_cost(mv: &MoveSnapshot) -> u32 {
    match mv.category {
        MoveCategory::Charged => u32::try_from(mv.energy_delta).unwrap_or(0),
        MoveCategory::Fast => 0,
    }
}

/// Fresh battle state for a snapshot. A precomputed HP wins over the formula.
pub fn create_participant(
    snapshot: &PokemonSnapshot,
    id: impl Into<String>,
    ruleset: &BattleRuleset,
) -> BattleParticipant {
    let current_hp = snapshot.hp.filter(|hp| *hp > 0).unwrap_or_else(|| {
        calculate_hp(snapshot.base_stamina, snapshot.iv_sta, snapshot.level, ruleset)
    });
    BattleParticipant {
        id: id.into(),
        pokemon: snapshot.clone(),
        current_hp,
        current_energy: 0,
        shields_remaining: ruleset.shields_per_side,
        is_active: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ChargedMoves;
    use crate::ruleset::default_ruleset;

    fn mon(types: &[&str], base: (u32, u32, u32)) -> PokemonSnapshot {
        PokemonSnapshot {
            form_id: "TEST".into(),
            species_name: "Test".into(),
            form_name: String::new(),
            primary_type: types[0].into(),
            secondary_type: types.get(1).map(|t| t.to_string()),
            base_attack: base.0,
            base_defense: base.1,
            base_stamina: base.2,
            level: 40.0,
            iv_atk: 15,
            iv_def: 15,
            iv_sta: 15,
            cp: None,
            hp: None,
            fast_move: MoveSnapshot::fast("EMBER", "Ember", "FIRE", 10.0, 10),
            charged_moves: ChargedMoves::single(MoveSnapshot::charged(
                "FLAMETHROWER",
                "Flamethrower",
                "FIRE",
                90.0,
                50,
            ))
            .unwrap(),
        }
    }

    #[test]
    fn test_cp_and_hp_at_level_forty() {
        let ruleset = default_ruleset();
        assert_eq!(calculate_cp(100, 100, 100, 15, 15, 15, 40.0, &ruleset), 825);
        assert_eq!(calculate_hp(100, 15, 40.0, &ruleset), 90);
        assert_eq!(calculate_cp(223, 173, 186, 15, 15, 15, 40.0, &ruleset), 2889);
        assert_eq!(calculate_hp(186, 15, 40.0, &ruleset), 158);
    }

    #[test]
    fn test_stats_never_drop_below_one() {
        let ruleset = default_ruleset();
        assert_eq!(calculate_cp(1, 1, 1, 0, 0, 0, 1.0, &ruleset), 1);
        assert_eq!(calculate_hp(1, 0, 1.0, &ruleset), 1);
        assert_eq!(calculate_hp(0, 0, 1.0, &ruleset), 1);
    }

    #[test]
    fn test_unknown_level_uses_level_forty_multiplier() {
        let ruleset = default_ruleset();
        assert_eq!(
            calculate_cp(100, 100, 100, 15, 15, 15, 99.0, &ruleset),
            calculate_cp(100, 100, 100, 15, 15, 15, 40.0, &ruleset)
        );
        assert_eq!(calculate_hp(100, 15, 7.3, &ruleset), 90);
    }

    #[test]
    fn test_damage_with_stab_and_resistance() {
        let ruleset = default_ruleset();
        let fire = mon(&["FIRE"], (100, 100, 100));
        let grass = mon(&["GRASS"], (100, 100, 100));
        let ember = fire.fast_move.clone();
        let flamethrower = fire.charged_moves.first().clone();

        assert_eq!(calculate_damage(&ember, &fire, &fire, &ruleset), 4);
        assert_eq!(calculate_damage(&flamethrower, &fire, &fire, &ruleset), 28);
        assert_eq!(calculate_damage(&ember, &fire, &grass, &ruleset), 13);
        assert_eq!(calculate_damage(&flamethrower, &fire, &grass, &ruleset), 109);

        let breakdown = damage_breakdown(&ember, &fire, &grass, &ruleset);
        assert_eq!(breakdown.effectiveness, 2.0);
        assert_eq!(breakdown.stab, 1.2);
    }

    #[test]
    fn test_immune_and_powerless_hits_still_deal_one() {
        let ruleset = default_ruleset();
        let normal = mon(&["NORMAL"], (100, 100, 100));
        let ghost = mon(&["GHOST"], (100, 100, 100));
        let tackle = MoveSnapshot::fast("TACKLE", "Tackle", "NORMAL", 50.0, 5);
        assert_eq!(calculate_damage(&tackle, &normal, &ghost, &ruleset), 1);

        let nothing = MoveSnapshot::fast("SPLASH", "Splash", "WATER", 0.0, 3);
        assert_eq!(calculate_damage(&nothing, &normal, &normal, &ruleset), 1);
    }

    #[test]
    fn test_energy_gain_and_cost_by_category() {
        let ember = MoveSnapshot::fast("EMBER", "Ember", "FIRE", 10.0, 10);
        let flamethrower = MoveSnapshot::charged("FLAMETHROWER", "Flamethrower", "FIRE", 90.0, 50);
        assert_eq!(calculate_energy_gain(&ember), 10);
        assert_eq!(calculate_energy_cost(&ember), 0);
        assert_eq!(calculate_energy_gain(&flamethrower), 0);
        assert_eq!(calculate_energy_cost(&flamethrower), 50);
    }

    #[test]
    fn test_create_participant_prefers_precomputed_hp() {
        let ruleset = default_ruleset();
        let mut snapshot = mon(&["FIRE"], (100, 100, 100));
        let fresh = create_participant(&snapshot, "participant1", &ruleset);
        assert_eq!(fresh.current_hp, 90);
        assert_eq!(fresh.current_energy, 0);
        assert_eq!(fresh.shields_remaining, 2);
        assert!(fresh.is_active);
        assert_eq!(fresh.id, "participant1");

        snapshot.hp = Some(120);
        let precomputed = create_participant(&snapshot, "participant2", &ruleset);
        assert_eq!(precomputed.current_hp, 120);
    }
}
