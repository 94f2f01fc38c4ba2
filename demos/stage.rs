//! Stage demo: Two sprites walking toward each other until they bump.
//!
//! Run with `RUST_LOG=stagecraft=debug cargo run --example stage` to see the
//! engine's events alongside the host's redraw log.

use stagecraft::{Engine, EngineConfig, Script, SpriteId, SpriteView, VisualChanges, VisualHost};
use std::thread;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Host that prints every redraw request, labelled with the sprite's costume.
struct PrintHost;

impl VisualHost for PrintHost {
    type Target = String;

    fn update_visuals(&self, costume: &String, view: &SpriteView) {
        let snapshot = &view.snapshot;
        let mut line = format!(
            "{:<6} {:<8} x={:>6.2} y={:>6.2} rot={:>6.1} facing={:?}",
            view.id.as_str(),
            costume,
            snapshot.position.x(),
            snapshot.position.y(),
            snapshot.rotation.degrees(),
            snapshot.facing,
        );
        if let Some(message) = &snapshot.message {
            line.push_str(&format!(" says {message:?}"));
        }
        if snapshot.highlighted {
            line.push_str(" [!]");
        }
        if view.changes.contains(VisualChanges::REGISTERED) {
            line.push_str(" (new)");
        }
        println!("{line}");
    }

    fn sprite_removed(&self, costume: &String, id: &SpriteId) {
        println!("{:<6} {costume:<8} removed", id.as_str());
    }
}

const WALKER: &str = r#"[
    {"id": "hello", "name": "say", "value": {"say": {"text": "here I go", "sec": 1}}},
    {"id": "loop", "name": "repeat", "value": {"repeat": 12}},
    {"id": "walk", "name": "steps", "value": {"steps": 4}}
]"#;

const FACER: &str = r#"[
    {"id": "face", "name": "degrees", "value": {"degrees": 180}},
    {"id": "loop", "name": "repeat", "value": {"repeat": 40}},
    {"id": "walk", "name": "steps", "value": {"steps": "3"}},
    {"id": "spin", "name": "degrees", "value": {"degrees": 9}}
]"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    println!("Stagecraft Demo");
    println!("===============");
    println!();

    let config = EngineConfig::default().with_step_delay(Duration::from_millis(100));
    let engine = Engine::with_config(config, PrintHost)?;

    engine.register_sprite("cat", "orange".to_string(), (20.0, 50.0), Script::from_json(WALKER)?);
    engine.register_sprite("dog", "brown".to_string(), (80.0, 50.0), Script::from_json(FACER)?);

    let run = engine.spawn_play()?;
    thread::sleep(Duration::from_secs(2));

    println!();
    println!("Stopping...");
    engine.stop_all();
    println!("Run ended: {:?}", run.join()?);

    println!();
    for (id, snapshot) in engine.snapshots() {
        println!("{id}: {}", serde_json::to_string(&snapshot)?);
    }

    engine.unregister_sprite(&SpriteId::from("dog"));
    println!("{} sprite(s) left", engine.len());
    Ok(())
}
