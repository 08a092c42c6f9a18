//! Combatant behaviour finite state machine.
//!
//! Pure functions that compute mode transitions and movement directives
//! for a combatant from its current mode, the status of its held target
//! and the event being processed. No ECS dependency; operates on plain
//! data. The simulation applies the returned update to its components.

use skirmish_core::enums::{AttackCue, CombatantMode};

/// What the combatant knows about its held target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TargetStatus {
    /// No target held.
    None,
    /// A target is held but is dead or no longer exists.
    Lost,
    /// A living target at the given distance from the combatant's body.
    Live { distance: f32 },
}

/// Event driving one evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Trigger {
    /// Low-rate perception tick.
    Perception,
    /// A target was just assigned (scan hit or retaliation).
    TargetAcquired,
    /// Per-frame check.
    Frame,
    /// Animation cue for the damage window.
    Cue(AttackCue),
}

/// How the navigation agent should behave after the update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    /// Leave the agent as it is.
    Keep,
    /// Resume at patrol speed and wander.
    Patrol,
    /// Resume at run speed toward the target.
    Chase,
    /// Halt in place.
    Halt,
}

/// Input to the combatant FSM for a single entity.
#[derive(Debug, Clone, Copy)]
pub struct CombatantContext {
    pub mode: CombatantMode,
    pub target: TargetStatus,
    /// Melee reach plus attack radius.
    pub attack_distance: f32,
    pub trigger: Trigger,
}

/// Output from the combatant FSM.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CombatantUpdate {
    pub new_mode: CombatantMode,
    pub mode_changed: bool,
    pub movement: Movement,
    /// Forget the held target.
    pub drop_target: bool,
    /// Forget who was struck in the previous damage window.
    pub clear_hits: bool,
    /// The attack animation should start.
    pub windup_started: bool,
}

impl CombatantUpdate {
    fn unchanged(mode: CombatantMode) -> Self {
        Self {
            new_mode: mode,
            mode_changed: false,
            movement: Movement::Keep,
            drop_target: false,
            clear_hits: false,
            windup_started: false,
        }
    }

    fn to(from: CombatantMode, mode: CombatantMode, movement: Movement) -> Self {
        Self {
            new_mode: mode,
            mode_changed: from != mode,
            movement,
            drop_target: false,
            clear_hits: false,
            windup_started: false,
        }
    }
}

/// True when `from -> to` is an edge of the behaviour graph.
pub fn is_legal(from: CombatantMode, to: CombatantMode) -> bool {
    use CombatantMode::*;

    matches!(
        (from, to),
        (Patrol, Tracking)
            | (Tracking, AttackWindup)
            | (AttackWindup, Attacking)
            | (Attacking, Tracking)
            | (Tracking, Patrol)
            | (AttackWindup, Patrol)
            | (Attacking, Patrol)
    )
}

/// True when `cue` is accepted in `mode`. Begin opens the window from the
/// windup, End closes it from the attack.
pub fn accepts_cue(mode: CombatantMode, cue: AttackCue) -> bool {
    matches!(
        (mode, cue),
        (CombatantMode::AttackWindup, AttackCue::Begin) | (CombatantMode::Attacking, AttackCue::End)
    )
}

/// Evaluate the FSM for one combatant.
pub fn evaluate(ctx: &CombatantContext) -> CombatantUpdate {
    if let Trigger::Cue(cue) = ctx.trigger {
        if !accepts_cue(ctx.mode, cue) {
            return CombatantUpdate::unchanged(ctx.mode);
        }
    }

    // A dead or vanished target sends every mode back to patrol.
    if ctx.target == TargetStatus::Lost {
        return lose_target(ctx.mode);
    }

    match ctx.trigger {
        Trigger::Perception => evaluate_perception(ctx),
        Trigger::TargetAcquired => evaluate_acquired(ctx),
        Trigger::Frame => evaluate_frame(ctx),
        Trigger::Cue(AttackCue::Begin) => {
            let mut update =
                CombatantUpdate::to(ctx.mode, CombatantMode::Attacking, Movement::Keep);
            update.clear_hits = true;
            update
        }
        Trigger::Cue(AttackCue::End) => match ctx.target {
            TargetStatus::Live { .. } => {
                let mut update =
                    CombatantUpdate::to(ctx.mode, CombatantMode::Tracking, Movement::Chase);
                update.clear_hits = true;
                update
            }
            _ => lose_target(ctx.mode),
        },
    }
}

fn lose_target(mode: CombatantMode) -> CombatantUpdate {
    let mut update = CombatantUpdate::to(mode, CombatantMode::Patrol, Movement::Patrol);
    update.drop_target = true;
    update.clear_hits = true;
    update
}

fn evaluate_perception(ctx: &CombatantContext) -> CombatantUpdate {
    match (ctx.target, ctx.mode) {
        (TargetStatus::Live { .. }, CombatantMode::Patrol | CombatantMode::Tracking) => {
            CombatantUpdate::to(ctx.mode, CombatantMode::Tracking, Movement::Chase)
        }
        (TargetStatus::Live { .. }, _) => CombatantUpdate::unchanged(ctx.mode),
        (_, CombatantMode::Patrol) => CombatantUpdate::unchanged(ctx.mode),
        // Holding no target outside patrol.
        _ => lose_target(ctx.mode),
    }
}

fn evaluate_acquired(ctx: &CombatantContext) -> CombatantUpdate {
    match (ctx.target, ctx.mode) {
        (TargetStatus::Live { .. }, CombatantMode::Patrol) => {
            CombatantUpdate::to(ctx.mode, CombatantMode::Tracking, Movement::Chase)
        }
        _ => CombatantUpdate::unchanged(ctx.mode),
    }
}

fn evaluate_frame(ctx: &CombatantContext) -> CombatantUpdate {
    match (ctx.target, ctx.mode) {
        (TargetStatus::Live { distance }, CombatantMode::Tracking)
            if distance <= ctx.attack_distance =>
        {
            let mut update =
                CombatantUpdate::to(ctx.mode, CombatantMode::AttackWindup, Movement::Halt);
            update.windup_started = true;
            update
        }
        (TargetStatus::None, CombatantMode::Patrol) | (TargetStatus::Live { .. }, _) => {
            CombatantUpdate::unchanged(ctx.mode)
        }
        _ => lose_target(ctx.mode),
    }
}
