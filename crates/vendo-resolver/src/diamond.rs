//! Reporting of modules discovered along more than one path.
//!
//! The first discovery of a module wins: it is attached where it was first
//! seen and installed once. Later discoveries from elsewhere in the tree are
//! recorded here so they can be surfaced to the user.

use std::fmt;

/// All repeat discoveries seen while building the graph.
#[derive(Debug, Default, Clone)]
pub struct DiamondReport {
    encounters: Vec<DiamondEncounter>,
}

/// One module requested by a unit other than the one it is attached under.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct DiamondEncounter {
    pub module: String,
    pub requested_by: String,
    pub attached_under: String,
    /// Constraint carried by the attached node, if any.
    pub constraint: String,
}

impl DiamondReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an encounter; repeats of the same encounter are ignored.
    pub fn add(&mut self, encounter: DiamondEncounter) {
        if !self.encounters.contains(&encounter) {
            self.encounters.push(encounter);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.encounters.is_empty()
    }

    pub fn len(&self) -> usize {
        self.encounters.len()
    }

    /// Encounters ordered by module, then requester.
    pub fn encounters(&self) -> Vec<DiamondEncounter> {
        let mut out = self.encounters.clone();
        out.sort();
        out
    }
}

impl fmt::Display for DiamondReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.encounters.is_empty() {
            return write!(f, "No shared dependencies.");
        }
        writeln!(f, "Shared dependencies ({}):", self.encounters.len())?;
        for e in self.encounters() {
            writeln!(f, "  {e}")?;
        }
        Ok(())
    }
}

impl fmt::Display for DiamondEncounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let under = if self.attached_under.is_empty() {
            "."
        } else {
            &self.attached_under
        };
        write!(
            f,
            "{} requested by {}, using the copy under {}",
            self.module, self.requested_by, under
        )?;
        if !self.constraint.is_empty() {
            write!(f, " ({})", self.constraint)?;
        }
        Ok(())
    }
}
