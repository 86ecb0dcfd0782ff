use crate::battle_logger::BattleLogger;
use crate::calculations::{
    calculate_energy_cost, calculate_energy_gain, create_participant, damage_breakdown,
};
use crate::model::{MoveSnapshot, PokemonSnapshot, SnapshotError};
use crate::ruleset::BattleRuleset;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Turn cap applied when the caller gives none (or zero).
pub const DEFAULT_MAX_TURNS: u32 = 100;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Side {
    A,
    B,
}

impl Side {
    /// Order in which the two sides act within every turn.
    pub const TURN_ORDER: [Side; 2] = [Side::A, Side::B];

    pub fn opponent(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }

    pub fn participant_id(self) -> &'static str {
        match self {
            Side::A => "participant1",
            Side::B => "participant2",
        }
    }
}

/// Mutable per-battle wrapper around a snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct BattleParticipant {
    pub id: String,
    pub pokemon: PokemonSnapshot,
    pub current_hp: u32,
    pub current_energy: u32,
    pub shields_remaining: u32,
    pub is_active: bool,
}

impl BattleParticipant {
    pub fn is_standing(&self) -> bool {
        self.is_active && self.current_hp > 0
    }

    /// First charged move in list order that the current energy pays for.
    pub fn ready_charged_move(&self) -> Option<&MoveSnapshot> {
        self.pokemon
            .charged_moves
            .iter()
            .find(|mv| calculate_energy_cost(mv) <= self.current_energy)
    }

    /// Returns the HP left after the hit.
    pub fn take_damage(&mut self, damage: u32) -> u32 {
        self.current_hp = self.current_hp.saturating_sub(damage);
        self.current_hp
    }

    pub fn gain_energy(&mut self, amount: u32, max_energy: u32) {
        self.current_energy = self.current_energy.saturating_add(amount).min(max_energy);
    }

    pub fn spend_energy(&mut self, amount: u32) {
        self.current_energy = self.current_energy.saturating_sub(amount);
    }

    /// Spends a shield if one is left.
    pub fn consume_shield(&mut self) -> bool {
        if self.shields_remaining == 0 {
            return false;
        }
        self.shields_remaining -= 1;
        true
    }

    pub fn state(&self) -> ParticipantState {
        ParticipantState {
            id: self.id.clone(),
            form_id: self.pokemon.form_id.clone(),
            current_hp: self.current_hp,
            current_energy: self.current_energy,
            shields_remaining: self.shields_remaining,
            is_active: self.is_active,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantState {
    pub id: String,
    pub form_id: String,
    pub current_hp: u32,
    pub current_energy: u32,
    pub shields_remaining: u32,
    pub is_active: bool,
}

impl ParticipantState {
    pub fn is_standing(&self) -> bool {
        self.is_active && self.current_hp > 0
    }
}

/// `Swap` and `Shield` are part of the wire vocabulary but never emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionKind {
    FastAttack,
    ChargedAttack,
    Swap,
    Shield,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleAction {
    #[serde(rename = "type")]
    pub kind: ActionKind,
    pub participant_id: String,
    pub target_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub move_id: Option<String>,
    pub timestamp: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DamageEvent {
    pub attacker_id: String,
    pub defender_id: String,
    pub move_id: String,
    pub damage: u32,
    pub effectiveness: f64,
    pub defender_hp_after: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnergySource {
    FastMove,
    ChargedMove,
    DamageTaken,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnergyEvent {
    pub participant_id: String,
    pub energy_change: i32,
    pub energy_after: u32,
    pub source: EnergySource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleState {
    pub participants: [ParticipantState; 2],
    pub turn_number: u32,
    pub timestamp: u64,
    pub is_complete: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner_id: Option<String>,
}

impl BattleState {
    pub fn participant(&self, side: Side) -> &ParticipantState {
        match side {
            Side::A => &self.participants[0],
            Side::B => &self.participants[1],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleTurn {
    pub turn_number: u32,
    pub timestamp: u64,
    pub actions: Vec<BattleAction>,
    pub damage_events: Vec<DamageEvent>,
    pub energy_events: Vec<EnergyEvent>,
    pub state_after: BattleState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleOutcome {
    Winner(Side),
    Draw,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleSimulationInput {
    pub participant1: PokemonSnapshot,
    pub participant2: PokemonSnapshot,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ruleset: Option<BattleRuleset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_turns: Option<u32>,
}

impl BattleSimulationInput {
    pub fn new(
        participant1: PokemonSnapshot,
        participant2: PokemonSnapshot,
    ) -> Result<Self, SnapshotError> {
        let input = BattleSimulationInput {
            participant1,
            participant2,
            ruleset: None,
            max_turns: None,
        };
        input.validate()?;
        Ok(input)
    }

    pub fn with_ruleset(mut self, ruleset: BattleRuleset) -> Self {
        self.ruleset = Some(ruleset);
        self
    }

    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = Some(max_turns);
        self
    }

    pub fn validate(&self) -> Result<(), SnapshotError> {
        self.participant1.validate()?;
        self.participant2.validate()
    }

    pub fn resolved_ruleset(&self) -> BattleRuleset {
        self.ruleset.clone().unwrap_or_default()
    }

    pub fn resolved_max_turns(&self) -> u32 {
        self.max_turns
            .filter(|turns| *turns > 0)
            .unwrap_or(DEFAULT_MAX_TURNS)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleSimulationResult {
    pub input: BattleSimulationInput,
    pub ruleset: BattleRuleset,
    pub turns: Vec<BattleTurn>,
    pub final_state: BattleState,
    pub duration_ms: u64,
    pub log: Vec<String>,
}

impl BattleSimulationResult {
    pub fn outcome(&self) -> BattleOutcome {
        outcome_of(&self.final_state)
    }
}

fn outcome_of(state: &BattleState) -> BattleOutcome {
    match state.winner_id.as_deref() {
        Some(id) if id == Side::A.participant_id() => BattleOutcome::Winner(Side::A),
        Some(_) => BattleOutcome::Winner(Side::B),
        None => BattleOutcome::Draw,
    }
}

#[derive(Default)]
struct TurnEvents {
    actions: Vec<BattleAction>,
    damage_events: Vec<DamageEvent>,
    energy_events: Vec<EnergyEvent>,
}

struct Battle<'r> {
    ruleset: &'r BattleRuleset,
    participant_a: BattleParticipant,
    participant_b: BattleParticipant,
    turn_number: u32,
    timestamp: u64,
    logger: BattleLogger,
}

impl<'r> Battle<'r> {
    fn new(first: &PokemonSnapshot, second: &PokemonSnapshot, ruleset: &'r BattleRuleset) -> Self {
        let participant_a = create_participant(first, Side::A.participant_id(), ruleset);
        let participant_b = create_participant(second, Side::B.participant_id(), ruleset);
        let mut logger = BattleLogger::new();
        logger.log_start(&first.species_name, &second.species_name);
        logger.log_hp(&first.species_name, participant_a.current_hp);
        logger.log_hp(&second.species_name, participant_b.current_hp);
        Battle {
            ruleset,
            participant_a,
            participant_b,
            turn_number: 0,
            timestamp: 0,
            logger,
        }
    }

    fn participant(&self, side: Side) -> &BattleParticipant {
        match side {
            Side::A => &self.participant_a,
            Side::B => &self.participant_b,
        }
    }

    fn standing_count(&self) -> usize {
        Side::TURN_ORDER
            .iter()
            .filter(|side| self.participant(**side).is_standing())
            .count()
    }

    fn is_complete(&self) -> bool {
        self.standing_count() < 2
    }

    /// Only a lone survivor wins; two standing (turn cap) or none is no winner.
    fn winner(&self) -> Option<Side> {
        if self.standing_count() != 1 {
            return None;
        }
        Side::TURN_ORDER
            .into_iter()
            .find(|side| self.participant(*side).is_standing())
    }

    fn state(&self) -> BattleState {
        BattleState {
            participants: [self.participant_a.state(), self.participant_b.state()],
            turn_number: self.turn_number,
            timestamp: self.timestamp,
            is_complete: self.is_complete(),
            winner_id: self.winner().map(|side| side.participant_id().to_string()),
        }
    }

    fn run_turn(&mut self) -> BattleTurn {
        self.turn_number += 1;
        self.timestamp += self.ruleset.turn_duration_ms;
        let mut events = TurnEvents::default();
        for side in Side::TURN_ORDER {
            if !self.participant(side).is_standing() {
                continue;
            }
            if self.act(side, &mut events) {
                // A knockout ends the turn before the other side acts.
                break;
            }
        }
        BattleTurn {
            turn_number: self.turn_number,
            timestamp: self.timestamp,
            actions: events.actions,
            damage_events: events.damage_events,
            energy_events: events.energy_events,
            state_after: self.state(),
        }
    }

    /// Resolves one side's action. Returns true when the defender was knocked out.
    fn act(&mut self, side: Side, events: &mut TurnEvents) -> bool {
        let ruleset = self.ruleset;
        let turn = self.turn_number;
        let timestamp = self.timestamp;
        let (attacker, defender) = match side {
            Side::A => (&mut self.participant_a, &mut self.participant_b),
            Side::B => (&mut self.participant_b, &mut self.participant_a),
        };
        let logger = &mut self.logger;

        if let Some(mv) = attacker.ready_charged_move().cloned() {
            attacker.spend_energy(calculate_energy_cost(&mv));
            events.actions.push(BattleAction {
                kind: ActionKind::ChargedAttack,
                participant_id: attacker.id.clone(),
                target_id: defender.id.clone(),
                move_id: Some(mv.id.clone()),
                timestamp,
            });
            if defender.consume_shield() {
                debug!(
                    turn,
                    attacker = %attacker.id,
                    move_id = %mv.id,
                    shields_left = defender.shields_remaining,
                    "charged attack blocked"
                );
                logger.log_shield(turn, &defender.pokemon.species_name);
                logger.log_blocked(turn, &attacker.pokemon.species_name, &mv.name);
                return false;
            }
            let hit = damage_breakdown(&mv, &attacker.pokemon, &defender.pokemon, ruleset);
            let hp_after = defender.take_damage(hit.damage);
            debug!(
                turn,
                attacker = %attacker.id,
                move_id = %mv.id,
                damage = hit.damage,
                hp_after,
                "charged attack"
            );
            events.damage_events.push(DamageEvent {
                attacker_id: attacker.id.clone(),
                defender_id: defender.id.clone(),
                move_id: mv.id.clone(),
                damage: hit.damage,
                effectiveness: hit.effectiveness,
                defender_hp_after: hp_after,
            });
            logger.log_charged_hit(
                turn,
                &attacker.pokemon.species_name,
                &mv.name,
                hit.damage,
                &defender.pokemon.species_name,
                hp_after,
            );
        } else {
            let mv = &attacker.pokemon.fast_move;
            let gain = calculate_energy_gain(mv);
            let hit = damage_breakdown(mv, &attacker.pokemon, &defender.pokemon, ruleset);
            let move_id = mv.id.clone();
            let move_name = mv.name.clone();
            attacker.gain_energy(gain, ruleset.max_energy);
            events.actions.push(BattleAction {
                kind: ActionKind::FastAttack,
                participant_id: attacker.id.clone(),
                target_id: defender.id.clone(),
                move_id: Some(move_id.clone()),
                timestamp,
            });
            let hp_after = defender.take_damage(hit.damage);
            debug!(
                turn,
                attacker = %attacker.id,
                move_id = %move_id,
                damage = hit.damage,
                energy = attacker.current_energy,
                hp_after,
                "fast attack"
            );
            events.damage_events.push(DamageEvent {
                attacker_id: attacker.id.clone(),
                defender_id: defender.id.clone(),
                move_id,
                damage: hit.damage,
                effectiveness: hit.effectiveness,
                defender_hp_after: hp_after,
            });
            events.energy_events.push(EnergyEvent {
                participant_id: attacker.id.clone(),
                energy_change: i32::try_from(gain).unwrap_or(i32::MAX),
                energy_after: attacker.current_energy,
                source: EnergySource::FastMove,
            });
            logger.log_fast_hit(
                turn,
                &attacker.pokemon.species_name,
                &move_name,
                hit.damage,
                gain,
                &defender.pokemon.species_name,
                hp_after,
            );
        }

        if defender.current_hp == 0 {
            defender.is_active = false;
            debug!(turn, defender = %defender.id, "knocked out");
            logger.log_faint(&defender.pokemon.species_name);
            return true;
        }
        false
    }

    fn run(mut self, max_turns: u32) -> (Vec<BattleTurn>, BattleState, Vec<String>) {
        let mut turns = Vec::new();
        while self.turn_number < max_turns && !self.is_complete() {
            turns.push(self.run_turn());
        }
        let final_state = self.state();
        match self.winner() {
            Some(side) => {
                let name = self.participant(side).pokemon.species_name.clone();
                self.logger.log_win(&name);
            }
            None => self.logger.log_draw(),
        }
        (turns, final_state, self.logger.into_lines())
    }
}

/// Runs a full battle. Total over validated input: the loop always stops
/// at a knockout or at the turn cap.
pub fn simulate_battle(input: &BattleSimulationInput) -> BattleSimulationResult {
    let ruleset = input.resolved_ruleset();
    let max_turns = input.resolved_max_turns();
    let battle = Battle::new(&input.participant1, &input.participant2, &ruleset);
    let (turns, final_state, log) = battle.run(max_turns);
    info!(
        participant1 = %input.participant1.form_id,
        participant2 = %input.participant2.form_id,
        turns = turns.len(),
        winner = final_state.winner_id.as_deref().unwrap_or("draw"),
        "battle finished"
    );
    let duration_ms = final_state.timestamp;
    BattleSimulationResult {
        input: input.clone(),
        ruleset,
        turns,
        final_state,
        duration_ms,
        log,
    }
}

/// Outcome only, without building the turn history. Used by the matchup matrix.
pub fn simulate_outcome(
    first: &PokemonSnapshot,
    second: &PokemonSnapshot,
    ruleset: &BattleRuleset,
    max_turns: u32,
) -> BattleOutcome {
    let mut battle = Battle::new(first, second, ruleset);
    while battle.turn_number < max_turns && !battle.is_complete() {
        battle.run_turn();
    }
    match battle.winner() {
        Some(side) => BattleOutcome::Winner(side),
        None => BattleOutcome::Draw,
    }
}
