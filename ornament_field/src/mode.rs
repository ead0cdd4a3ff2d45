//! The process-wide target configuration.

use serde::{Deserialize, Serialize};

/// Which configuration the field is heading toward.
///
/// Starts as [`TreeMode::Chaos`] and lives for the whole session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeMode {
    #[default]
    Chaos,
    Formed,
}

impl TreeMode {
    pub fn is_formed(self) -> bool { self == TreeMode::Formed }

    /// The other mode.
    pub fn toggled(self) -> Self {
        match self {
            TreeMode::Chaos  => TreeMode::Formed,
            TreeMode::Formed => TreeMode::Chaos,
        }
    }

    /// Formation target for the population-wide progress scalar.
    pub fn progress_target(self) -> f32 {
        match self {
            TreeMode::Chaos  => 0.0,
            TreeMode::Formed => 1.0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TreeMode::Chaos  => "CHAOS",
            TreeMode::Formed => "FORMED",
        }
    }

    /// Compact encoding used by the lock-free mode cell.
    pub fn as_u8(self) -> u8 {
        match self {
            TreeMode::Chaos  => 0,
            TreeMode::Formed => 1,
        }
    }

    /// Any non-zero byte decodes to `Formed`.
    pub fn from_u8(v: u8) -> Self {
        if v == 0 { TreeMode::Chaos } else { TreeMode::Formed }
    }
}
