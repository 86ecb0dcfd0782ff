/// Human-readable battle transcript, one line per notable event.
#[derive(Clone, Debug, Default)]
pub struct BattleLogger {
    log: Vec<String>,
}

impl BattleLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log_start(&mut self, first: &str, second: &str) {
        self.log.push(format!("Battle started: {first} vs {second}"));
    }

    pub fn log_hp(&mut self, name: &str, hp: u32) {
        self.log.push(format!("{name}: {hp} HP"));
    }

    pub fn log_shield(&mut self, turn: u32, defender: &str) {
        self.log.push(format!("Turn {turn}: {defender} used a shield!"));
    }

    pub fn log_blocked(&mut self, turn: u32, attacker: &str, move_name: &str) {
        self.log.push(format!(
            "Turn {turn}: {attacker} used {move_name}, but it was blocked!"
        ));
    }

    pub fn log_charged_hit(
        &mut self,
        turn: u32,
        attacker: &str,
        move_name: &str,
        damage: u32,
        defender: &str,
        hp_after: u32,
    ) {
        self.log.push(format!(
            "Turn {turn}: {attacker} used {move_name}! Dealt {damage} damage. {defender} has {hp_after} HP remaining."
        ));
    }

    #[allow(clippy::too_many_arguments)]
    pub fn log_fast_hit(
        &mut self,
        turn: u32,
        attacker: &str,
        move_name: &str,
        damage: u32,
        energy: u32,
        defender: &str,
        hp_after: u32,
    ) {
        self.log.push(format!(
            "Turn {turn}: {attacker} used {move_name}. Dealt {damage} damage, gained {energy} energy. {defender} has {hp_after} HP remaining."
        ));
    }

    pub fn log_faint(&mut self, name: &str) {
        self.log.push(format!("{name} was knocked out!"));
    }

    pub fn log_win(&mut self, winner: &str) {
        self.log.push(format!("Battle ended! {winner} wins!"));
    }

    pub fn log_draw(&mut self) {
        self.log
            .push("Battle ended in a draw (max turns reached).".to_string());
    }

    pub fn log_lines(&self) -> &[String] {
        &self.log
    }

    pub fn into_lines(self) -> Vec<String> {
        self.log
    }
}
