use go_battle_engine::{default_ruleset, load_input, load_roster, load_ruleset};
use serde_json::json;
use std::path::PathBuf;

fn temp_file(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("go_battle_{}_{name}", std::process::id()));
    std::fs::write(&path, contents).unwrap();
    path
}

fn mon_json(form_id: &str) -> serde_json::Value {
    json!({
        "formId": form_id,
        "speciesName": form_id,
        "primaryType": "POKEMON_TYPE_FIRE",
        "baseAttack": 100,
        "baseDefense": 100,
        "baseStamina": 100,
        "level": 40,
        "ivAtk": 15,
        "ivDef": 15,
        "ivSta": 15,
        "fastMove": {
            "id": "EMBER", "name": "Ember", "type": "FIRE", "category": "FAST",
            "power": 10, "energyDelta": -10, "durationMs": 500
        },
        "chargedMoves": [{
            "id": "FLAMETHROWER", "name": "Flamethrower", "type": "FIRE", "category": "CHARGED",
            "power": 90, "energyDelta": 50, "durationMs": 0
        }]
    })
}

#[test]
fn battle_input_loads_with_optional_fields_absent() {
    let body = json!({ "participant1": mon_json("A"), "participant2": mon_json("B") });
    let path = temp_file("input.json", &body.to_string());
    let input = load_input(&path).unwrap();
    std::fs::remove_file(&path).ok();
    assert!(input.ruleset.is_none());
    assert_eq!(input.resolved_max_turns(), 100);
    assert!(input.participant1.has_type("FIRE"));
}

#[test]
fn invalid_snapshot_is_rejected_with_context() {
    let mut bad = mon_json("A");
    bad["ivAtk"] = json!(16);
    let body = json!({ "participant1": bad, "participant2": mon_json("B") });
    let path = temp_file("bad_input.json", &body.to_string());
    let err = load_input(&path).unwrap_err();
    std::fs::remove_file(&path).ok();
    assert!(format!("{err:#}").contains("attack IV must be between 0 and 15"));
}

#[test]
fn missing_file_reports_the_path() {
    let err = load_roster(std::path::Path::new("/nonexistent/roster.json")).unwrap_err();
    assert!(err.to_string().contains("/nonexistent/roster.json"));
}

#[test]
fn ruleset_file_round_trips() {
    let path = temp_file(
        "ruleset.json",
        &serde_json::to_string(&default_ruleset()).unwrap(),
    );
    let ruleset = load_ruleset(&path).unwrap();
    std::fs::remove_file(&path).ok();
    assert_eq!(ruleset, default_ruleset());
}
