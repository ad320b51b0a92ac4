//! Text renderer for the owner console.
//!
//! [`ConsoleRenderer`] is the scheduler's [`SnapshotObserver`]: it prints one
//! line per applied update and a prompt whenever the pet is frozen waiting
//! for the owner.

use std::io::Write;

use hatchling_core::{CatchUp, Effect, Outcome, SnapshotObserver, Update};
use hatchling_pet::{Acknowledgment, MAX_FOOD, MAX_HAPPINESS, PottyEvent};
use hatchling_types::{LifeStage, PetSnapshot};
use tracing::warn;

/// Prints updates as plain text lines.
pub struct ConsoleRenderer<W> {
    out: W,
}

impl<W: Write + Send> ConsoleRenderer<W> {
    /// Render into `out`.
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    /// The underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{text}").and_then(|()| self.out.flush()) {
            warn!(error = %e, "Console write failed");
        }
    }
}

impl<W: Write + Send> SnapshotObserver for ConsoleRenderer<W> {
    fn on_update(&mut self, update: &Update) {
        let line = match &update.outcome {
            Outcome::Applied(effect) => describe(effect, &update.snapshot),
            Outcome::Rejected(reason) => Some(format!("{}: {reason}", update.request)),
        };
        if let Some(line) = line {
            self.emit(&line);
        }
        if let Some(prompt) = prompt(&update.snapshot).filter(|_| update.outcome.is_applied()) {
            self.emit(prompt);
        }
    }

    fn on_catch_up(&mut self, catch_up: &CatchUp, snapshot: &PetSnapshot) {
        if catch_up.applied_ticks > 0 {
            self.emit(&format!(
                "While you were away: {} of {} ticks{}",
                catch_up.applied_ticks,
                catch_up.elapsed_ticks,
                if catch_up.capped { " (capped)" } else { "" },
            ));
        }
        self.emit(&status(snapshot));
        if let Some(prompt) = prompt(snapshot) {
            self.emit(prompt);
        }
    }
}

/// One line for an applied effect. Quiet ticks print nothing.
fn describe(effect: &Effect, pet: &PetSnapshot) -> Option<String> {
    let who = display_name(pet);
    let line = match effect {
        Effect::Ticked(effects) => {
            let mut parts = Vec::new();
            if effects.stomach_empty {
                parts.push(format!("{who} is starving"));
            }
            match effects.potty {
                Some(PottyEvent::Trained) => parts.push(format!("{who} used the potty")),
                Some(PottyEvent::Mess) => parts.push(format!("{who} made a mess")),
                None => {}
            }
            if let Some(transition) = effects.transition {
                parts.push(match transition.to {
                    LifeStage::Pup => "The egg hatched!".to_owned(),
                    LifeStage::Dead => format!("{who} has passed away"),
                    stage => format!("{who} grew into an {stage}"),
                });
            }
            if parts.is_empty() {
                return None;
            }
            parts.join(". ")
        }
        Effect::Fed => format!("{who} ate. Food {}/{MAX_FOOD}", pet.food),
        Effect::Petted => format!("{who} loves that. Behavior {}", pet.behavior),
        Effect::Cleaned => format!("All clean. Messes {}", pet.mess_counter),
        Effect::Named => format!("Named {}", pet.name),
        Effect::Acknowledged(Acknowledgment::Resumed(stage)) => {
            format!("{who} carries on as a {stage}")
        }
        Effect::Acknowledged(Acknowledgment::Replaced) | Effect::Reset => {
            "You found a new egg".to_owned()
        }
        Effect::PauseToggled { paused: true } => "Paused".to_owned(),
        Effect::PauseToggled { paused: false } => "Resumed".to_owned(),
    };
    Some(line)
}

/// What the owner must do next, if the pet is frozen.
const fn prompt(pet: &PetSnapshot) -> Option<&'static str> {
    if pet.awaiting_name {
        Some("Your pet hatched! Give it a name with `name <text>`")
    } else if !pet.alive {
        Some("Type `advance` to say goodbye and find a new egg")
    } else if pet.needs_advancement {
        Some("Type `advance` to continue")
    } else {
        None
    }
}

fn display_name(pet: &PetSnapshot) -> &str {
    if pet.name.is_empty() {
        "Your pet"
    } else {
        &pet.name
    }
}

/// Multi-line status block for the `status` command.
pub fn status(pet: &PetSnapshot) -> String {
    let mut flags = Vec::new();
    if pet.paused {
        flags.push("paused");
    }
    if pet.needs_advancement {
        flags.push("waiting");
    }
    let flags = if flags.is_empty() {
        String::new()
    } else {
        format!(" [{}]", flags.join(", "))
    };

    format!(
        "{name} the {color} {kind:?} {stage}{flags}\n  \
         food {food}/{MAX_FOOD}  happiness {happiness}/{MAX_HAPPINESS}  behavior {behavior}\n  \
         messes {messes}  potty in {potty}  age {age}",
        name = display_name(pet),
        color = pet.color,
        kind = pet.pet_type,
        stage = pet.life_stage,
        food = pet.food,
        happiness = pet.happiness,
        behavior = pet.behavior,
        messes = pet.mess_counter,
        potty = pet.potty_timer,
        age = pet.age,
    )
}
