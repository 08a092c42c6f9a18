//! Timed continuations owned by entities.
//!
//! Reloads, tracer fades, scripted attack cues and corpse removal are all
//! deferred work that must run at a later simulation time and must die
//! with their owner. They live here instead of in components so that a
//! single ordered queue drives them deterministically.

use hecs::Entity;
use skirmish_core::enums::AttackCue;

/// Tolerance when comparing a due time against the clock, so a task
/// scheduled `n * dt` ahead fires on exactly the `n`-th tick.
const DUE_EPSILON: f64 = 1.0e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    /// Transfer rounds into the magazine.
    ReloadComplete,
    /// Hide the shot tracer.
    TracerEnd,
    /// Deliver a scripted attack animation cue.
    AttackCue(AttackCue),
    /// Despawn a dead combatant.
    RemoveCorpse,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Task {
    pub due_secs: f64,
    pub owner: Entity,
    pub kind: TaskKind,
    seq: u64,
}

#[derive(Debug, Default)]
pub struct TimerQueue {
    tasks: Vec<Task>,
    next_seq: u64,
}

impl TimerQueue {
    pub fn schedule(&mut self, owner: Entity, due_secs: f64, kind: TaskKind) {
        self.tasks.push(Task {
            due_secs,
            owner,
            kind,
            seq: self.next_seq,
        });
        self.next_seq += 1;
    }

    /// Remove and return every task due at `now`, ordered by due time and
    /// then by scheduling order.
    pub fn pop_due(&mut self, now: f64) -> Vec<Task> {
        let (mut due, pending): (Vec<Task>, Vec<Task>) = self
            .tasks
            .drain(..)
            .partition(|task| task.due_secs <= now + DUE_EPSILON);
        self.tasks = pending;
        due.sort_by(|a, b| a.due_secs.total_cmp(&b.due_secs).then(a.seq.cmp(&b.seq)));
        due
    }

    /// Drop every task owned by `owner`.
    pub fn cancel_owner(&mut self, owner: Entity) {
        self.tasks.retain(|task| task.owner != owner);
    }

    /// Drop the tasks of `owner` whose kind matches.
    pub fn cancel(&mut self, owner: Entity, matches: impl Fn(TaskKind) -> bool) {
        self.tasks
            .retain(|task| task.owner != owner || !matches(task.kind));
    }

    /// Kinds of the tasks pending for `owner`, in scheduling order.
    pub fn pending_for(&self, owner: Entity) -> Vec<TaskKind> {
        let mut owned: Vec<&Task> = self.tasks.iter().filter(|t| t.owner == owner).collect();
        owned.sort_by_key(|t| t.seq);
        owned.into_iter().map(|t| t.kind).collect()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
