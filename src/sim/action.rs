//! Action clock
//!
//! An action is a closed enum name plus a tick-level frame index. Its length
//! is the sum of the archetype's exposure list for that name (ticks each
//! sprite frame stays on screen). The clock parks on the last frame once
//! complete; looping actions are restarted by the owner.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    Idle,
    Walk,
    /// Looking around after a duel was called off
    Suspicious,
    /// Calling someone out at the start of a duel
    Call,
    /// Aggressor side of a covert kill
    Attack,
    Death,
    Coma,
    Incapacitated,
    Drink,
    Play,
}

impl ActionKind {
    /// Actions every archetype must carry
    pub const REQUIRED: [ActionKind; 8] = [
        ActionKind::Idle,
        ActionKind::Walk,
        ActionKind::Suspicious,
        ActionKind::Call,
        ActionKind::Attack,
        ActionKind::Death,
        ActionKind::Coma,
        ActionKind::Incapacitated,
    ];

    /// Restarted automatically instead of parking on the last frame
    pub fn is_looping(self) -> bool {
        matches!(
            self,
            ActionKind::Idle | ActionKind::Walk | ActionKind::Coma | ActionKind::Play
        )
    }
}

/// Per-archetype exposure lists, validated at load time
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionTable {
    exposures: BTreeMap<ActionKind, Vec<u32>>,
}

impl ActionTable {
    /// Build and validate a table; `extra` lists zone actions the archetype must also carry
    pub fn new(
        archetype: &str,
        exposures: BTreeMap<ActionKind, Vec<u32>>,
        extra: &[ActionKind],
    ) -> Result<Self, ConfigError> {
        let table = Self { exposures };
        table.validate(archetype, extra)?;
        Ok(table)
    }

    pub fn validate(&self, archetype: &str, extra: &[ActionKind]) -> Result<(), ConfigError> {
        for &action in ActionKind::REQUIRED.iter().chain(extra) {
            let Some(list) = self.exposures.get(&action) else {
                return Err(ConfigError::MissingAction {
                    archetype: archetype.to_string(),
                    action,
                });
            };
            if list.is_empty() || list.contains(&0) {
                return Err(ConfigError::EmptyExposure {
                    archetype: archetype.to_string(),
                    action,
                });
            }
        }
        Ok(())
    }

    /// Total ticks of an action (0 if the table lacks it)
    pub fn duration(&self, action: ActionKind) -> u32 {
        self.exposures
            .get(&action)
            .map(|list| list.iter().sum())
            .unwrap_or(0)
    }

    /// Sprite frame shown at a tick-level index
    pub fn sprite_frame(&self, action: ActionKind, index: u32) -> usize {
        let Some(list) = self.exposures.get(&action) else {
            return 0;
        };
        let mut elapsed = 0;
        for (frame, ticks) in list.iter().enumerate() {
            elapsed += ticks;
            if index < elapsed {
                return frame;
            }
        }
        list.len().saturating_sub(1)
    }
}

/// Current action and its progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionClock {
    kind: ActionKind,
    index: u32,
}

impl ActionClock {
    pub fn new(kind: ActionKind) -> Self {
        Self { kind, index: 0 }
    }

    #[inline]
    pub fn kind(&self) -> ActionKind {
        self.kind
    }

    #[inline]
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Switch to a new action from its first frame
    pub fn set(&mut self, kind: ActionKind) {
        self.kind = kind;
        self.index = 0;
    }

    /// Start over on the same action
    pub fn restart(&mut self) {
        self.index = 0;
    }

    pub fn is_complete(&self, table: &ActionTable) -> bool {
        self.index + 1 >= table.duration(self.kind)
    }

    /// Move one tick forward unless already parked on the last frame
    pub fn advance(&mut self, table: &ActionTable) {
        if !self.is_complete(table) {
            self.index += 1;
        }
    }
}
