//! Instruction: One block of a sprite script.

use super::params;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::time::Duration;

/// The fixed instruction vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstructionKind {
    /// Walk along the heading.
    Move,
    /// Change the heading.
    Turn,
    /// Jump to absolute coordinates.
    GoTo,
    /// Show a speech bubble for a while.
    Say,
    /// Show a thought bubble for a while.
    Think,
    /// Loop over the rest of the script.
    Repeat,
}

impl InstructionKind {
    /// Every kind, in palette order.
    pub const ALL: [Self; 6] = [
        Self::Move,
        Self::Turn,
        Self::GoTo,
        Self::Say,
        Self::Think,
        Self::Repeat,
    ];

    /// The name used in the authoring format.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Move => "steps",
            Self::Turn => "degrees",
            Self::GoTo => "coords",
            Self::Say => "say",
            Self::Think => "think",
            Self::Repeat => "repeat",
        }
    }

    /// Look up a kind by its authoring name or a readable alias.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "steps" | "move" => Some(Self::Move),
            "degrees" | "turn" => Some(Self::Turn),
            "coords" | "goto" | "go_to" => Some(Self::GoTo),
            "say" => Some(Self::Say),
            "think" => Some(Self::Think),
            "repeat" => Some(Self::Repeat),
            _ => None,
        }
    }
}

/// What an instruction does, with its parameters already coerced.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Walk `steps` units along the heading, scaled by the facing.
    Move {
        /// Distance in canvas percent.
        steps: f64,
    },
    /// Add `degrees` to the heading.
    Turn {
        /// Signed angle in degrees.
        degrees: f64,
    },
    /// Set the position directly.
    GoTo {
        /// Target x in percent.
        x: f64,
        /// Target y in percent.
        y: f64,
    },
    /// Speech bubble.
    Say {
        /// Bubble text.
        text: String,
        /// How long the bubble stays, in seconds.
        secs: f64,
    },
    /// Thought bubble. Shares the message slot with `Say`.
    Think {
        /// Bubble text.
        text: String,
        /// How long the bubble stays, in seconds.
        secs: f64,
    },
    /// Run the instructions after this one `times` times.
    Repeat {
        /// Iteration count.
        times: u32,
    },
    /// A name outside the vocabulary. Kept so scripts survive a reload.
    Unknown {
        /// The name as written.
        name: String,
        /// The raw parameter bag.
        value: Value,
    },
}

impl Command {
    /// The kind of this command, if it is part of the vocabulary.
    pub const fn kind(&self) -> Option<InstructionKind> {
        match self {
            Self::Move { .. } => Some(InstructionKind::Move),
            Self::Turn { .. } => Some(InstructionKind::Turn),
            Self::GoTo { .. } => Some(InstructionKind::GoTo),
            Self::Say { .. } => Some(InstructionKind::Say),
            Self::Think { .. } => Some(InstructionKind::Think),
            Self::Repeat { .. } => Some(InstructionKind::Repeat),
            Self::Unknown { .. } => None,
        }
    }

    /// The authoring name of this command.
    pub fn name(&self) -> &str {
        match self {
            Self::Unknown { name, .. } => name.as_str(),
            other => other.kind().map_or("", InstructionKind::name),
        }
    }

    /// Whether this is a loop instruction.
    pub const fn is_repeat(&self) -> bool {
        matches!(self, Self::Repeat { .. })
    }

    /// Message lifetime for `Say`/`Think`; non-positive durations expire at once.
    pub fn message_duration(secs: f64) -> Duration {
        if secs.is_finite() && secs > 0.0 {
            Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
        } else {
            Duration::ZERO
        }
    }

    fn parse(name: &str, value: &Value) -> Self {
        let Some(kind) = InstructionKind::from_name(name) else {
            return Self::Unknown {
                name: name.to_string(),
                value: value.clone(),
            };
        };
        // The bag is keyed by the name the editor wrote, which may be an alias.
        let slot = value.get(name).or_else(|| value.get(kind.name()));
        let field = |key: &str| slot.and_then(|bag| bag.get(key));
        match kind {
            InstructionKind::Move => Self::Move {
                steps: params::number(slot, "steps"),
            },
            InstructionKind::Turn => Self::Turn {
                degrees: params::number(slot, "degrees"),
            },
            InstructionKind::GoTo => Self::GoTo {
                x: params::number(field("x"), "x"),
                y: params::number(field("y"), "y"),
            },
            InstructionKind::Say => Self::Say {
                text: params::text(field("text")),
                secs: params::number(field("sec"), "sec"),
            },
            InstructionKind::Think => Self::Think {
                text: params::text(field("text")),
                secs: params::number(field("sec"), "sec"),
            },
            InstructionKind::Repeat => Self::Repeat {
                times: params::iterations(params::number(slot, "repeat")),
            },
        }
    }

    fn to_value(&self) -> Value {
        let name = self.name();
        let bag = match self {
            Self::Move { steps } => json!(steps),
            Self::Turn { degrees } => json!(degrees),
            Self::GoTo { x, y } => json!({ "x": x, "y": y }),
            Self::Say { text, secs } | Self::Think { text, secs } => {
                json!({ "text": text, "sec": secs })
            }
            Self::Repeat { times } => json!(times),
            Self::Unknown { value, .. } => return value.clone(),
        };
        let mut map = Map::new();
        map.insert(name.to_string(), bag);
        Value::Object(map)
    }
}

/// One block of a sprite script.
///
/// Instructions are immutable; the interpreter only reads them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawInstruction", into = "RawInstruction")]
pub struct Instruction {
    id: String,
    command: Command,
}

/// Wire shape of an instruction in the authoring format.
#[derive(Serialize, Deserialize)]
struct RawInstruction {
    #[serde(default)]
    id: String,
    name: String,
    #[serde(default)]
    value: Value,
}

impl From<RawInstruction> for Instruction {
    fn from(raw: RawInstruction) -> Self {
        let command = Command::parse(&raw.name, &raw.value);
        Self {
            id: raw.id,
            command,
        }
    }
}

impl From<Instruction> for RawInstruction {
    fn from(instruction: Instruction) -> Self {
        Self {
            name: instruction.command.name().to_string(),
            value: instruction.command.to_value(),
            id: instruction.id,
        }
    }
}

impl Instruction {
    /// Create an instruction from an id and a command.
    pub fn new(id: impl Into<String>, command: Command) -> Self {
        Self {
            id: id.into(),
            command,
        }
    }

    /// `move steps`.
    pub fn move_steps(id: impl Into<String>, steps: f64) -> Self {
        Self::new(id, Command::Move { steps })
    }

    /// `turn degrees`.
    pub fn turn(id: impl Into<String>, degrees: f64) -> Self {
        Self::new(id, Command::Turn { degrees })
    }

    /// `go to x, y`.
    pub fn go_to(id: impl Into<String>, x: f64, y: f64) -> Self {
        Self::new(id, Command::GoTo { x, y })
    }

    /// `say text for secs seconds`.
    pub fn say(id: impl Into<String>, text: impl Into<String>, secs: f64) -> Self {
        Self::new(
            id,
            Command::Say {
                text: text.into(),
                secs,
            },
        )
    }

    /// `think text for secs seconds`.
    pub fn think(id: impl Into<String>, text: impl Into<String>, secs: f64) -> Self {
        Self::new(
            id,
            Command::Think {
                text: text.into(),
                secs,
            },
        )
    }

    /// `repeat times`.
    pub fn repeat(id: impl Into<String>, times: u32) -> Self {
        Self::new(id, Command::Repeat { times })
    }

    /// Editor-assigned identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The parsed command.
    pub const fn command(&self) -> &Command {
        &self.command
    }

    /// Authoring name of the command.
    pub fn name(&self) -> &str {
        self.command.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Instruction {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_parse_single_parameter_kinds() {
        let mv = parse(r#"{"id": "a", "name": "steps", "value": {"steps": 10}}"#);
        assert_eq!(mv.command(), &Command::Move { steps: 10.0 });

        let turn = parse(r#"{"id": "b", "name": "degrees", "value": {"degrees": -45}}"#);
        assert_eq!(turn.command(), &Command::Turn { degrees: -45.0 });
    }

    #[test]
    fn test_parse_multi_parameter_kinds() {
        let go = parse(r#"{"id": "c", "name": "coords", "value": {"coords": {"x": 5, "y": 80}}}"#);
        assert_eq!(go.command(), &Command::GoTo { x: 5.0, y: 80.0 });

        let think = parse(
            r#"{"id": "d", "name": "think", "value": {"think": {"text": "hmm", "sec": 1.5}}}"#,
        );
        assert_eq!(
            think.command(),
            &Command::Think {
                text: "hmm".to_string(),
                secs: 1.5
            }
        );
    }

    #[test]
    fn test_aliases() {
        let mv = parse(r#"{"id": "a", "name": "move", "value": {"move": 3}}"#);
        assert_eq!(mv.command(), &Command::Move { steps: 3.0 });
        assert_eq!(mv.name(), "steps");

        let go = parse(r#"{"id": "b", "name": "goto", "value": {"coords": {"x": 1, "y": 2}}}"#);
        assert_eq!(go.command(), &Command::GoTo { x: 1.0, y: 2.0 });
    }

    #[test]
    fn test_cleared_field_reads_as_zero() {
        let mv = parse(r#"{"id": "a", "name": "steps", "value": {"steps": ""}}"#);
        assert_eq!(mv.command(), &Command::Move { steps: 0.0 });

        let go = parse(r#"{"id": "b", "name": "coords", "value": {"coords": {"x": 40}}}"#);
        assert_eq!(go.command(), &Command::GoTo { x: 40.0, y: 0.0 });

        let rep = parse(r#"{"id": "c", "name": "repeat"}"#);
        assert_eq!(rep.command(), &Command::Repeat { times: 0 });
    }

    #[test]
    fn test_unknown_is_kept_verbatim() {
        let json = r#"{"id":"z","name":"glide","value":{"glide":{"secs":1}}}"#;
        let unknown = parse(json);
        assert_eq!(unknown.command().kind(), None);
        assert_eq!(unknown.name(), "glide");
        assert_eq!(serde_json::to_string(&unknown).unwrap(), json);
    }

    #[test]
    fn test_serializes_in_editor_shape() {
        let say = Instruction::say("s1", "hi", 2.0);
        let value = serde_json::to_value(&say).unwrap();
        assert_eq!(
            value,
            json!({"id": "s1", "name": "say", "value": {"say": {"text": "hi", "sec": 2.0}}})
        );

        let rep = serde_json::to_value(Instruction::repeat("r1", 3)).unwrap();
        assert_eq!(rep, json!({"id": "r1", "name": "repeat", "value": {"repeat": 3}}));
    }

    #[test]
    fn test_message_duration() {
        assert_eq!(Command::message_duration(2.0), Duration::from_secs(2));
        assert_eq!(Command::message_duration(0.0), Duration::ZERO);
        assert_eq!(Command::message_duration(-1.0), Duration::ZERO);
        assert_eq!(Command::message_duration(f64::NAN), Duration::ZERO);
    }

    #[test]
    fn test_every_kind_round_trips_its_name() {
        for kind in InstructionKind::ALL {
            assert_eq!(InstructionKind::from_name(kind.name()), Some(kind));
        }
    }
}
