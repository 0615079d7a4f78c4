use std::sync::Arc;

use crate::state::UnitId;

use super::definition::{StatusDefinition, StatusId, StatusKind};

/// Live instance of a status on one unit.
///
/// Holds the mutable stack count and duration; behavior comes from the
/// shared definition.
#[derive(Clone, Debug, PartialEq)]
pub struct RuntimeStatus {
    definition: Arc<StatusDefinition>,
    pub stacks: u32,
    pub remaining_duration: Option<u32>,
    /// Unit that applied the status most recently. Identity only.
    pub source: Option<UnitId>,
}

impl RuntimeStatus {
    pub fn new(definition: Arc<StatusDefinition>, stacks: u32, source: Option<UnitId>) -> Self {
        let stacks = stacks.min(definition.max_stacks);
        Self {
            remaining_duration: definition.duration,
            definition,
            stacks,
            source,
        }
    }

    pub fn definition(&self) -> &Arc<StatusDefinition> {
        &self.definition
    }

    pub fn id(&self) -> &StatusId {
        &self.definition.id
    }

    pub fn kind(&self) -> StatusKind {
        self.definition.kind()
    }

    /// Merge a repeated application into this instance.
    ///
    /// Stacks add up to `max_stacks`, duration extends to the longer of the
    /// two, and the latest applier becomes the source.
    pub fn refresh(&mut self, stacks: u32, source: Option<UnitId>) {
        self.stacks = self
            .stacks
            .saturating_add(stacks)
            .min(self.definition.max_stacks);
        self.remaining_duration = match (self.remaining_duration, self.definition.duration) {
            (Some(current), Some(fresh)) => Some(current.max(fresh)),
            (current, fresh) => current.or(fresh),
        };
        if source.is_some() {
            self.source = source;
        }
    }

    pub fn decay(&mut self) {
        self.stacks = self.definition.effect.decayed_stacks(self.stacks);
    }

    /// Counts down one turn of duration, if the variant consumes duration.
    pub fn tick_duration(&mut self) {
        if !self.definition.effect.consumes_duration() {
            return;
        }
        if let Some(turns) = self.remaining_duration.as_mut() {
            *turns = turns.saturating_sub(1);
        }
    }

    /// True once stacks hit zero or duration has run out.
    pub fn is_spent(&self) -> bool {
        self.stacks == 0 || self.remaining_duration == Some(0)
    }
}
