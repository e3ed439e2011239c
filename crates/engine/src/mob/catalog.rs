use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusStateChange {
    #[default]
    None,
    Flailing,
    Helpless,
    Panic,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusType {
    pub name: String,
    pub state_change: StatusStateChange,
    pub turns_inedible: bool,
    pub removable_with_whistle: bool,
    pub health_change_per_second: f32,
    /// Seconds; zero means it lasts until removed.
    pub duration: f32,
}

impl StatusType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state_change: StatusStateChange::None,
            turns_inedible: false,
            removable_with_whistle: false,
            health_change_per_second: 0.0,
            duration: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Hazard {
    pub name: String,
    pub effects: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SprayType {
    pub name: String,
    pub effects: Vec<String>,
    pub buries_pikmin: bool,
}

/// Area-independent content shared by every mob type: statuses, hazards,
/// sprays and particle generator names.
#[derive(Debug, Clone, Default)]
pub struct ContentCatalog {
    pub status_types: BTreeMap<String, StatusType>,
    pub hazards: BTreeMap<String, Hazard>,
    pub sprays: BTreeMap<String, SprayType>,
    pub particle_generators: BTreeSet<String>,
}

impl ContentCatalog {
    pub fn status_type(&self, name: &str) -> Option<&StatusType> {
        self.status_types.get(name)
    }

    pub fn hazard(&self, name: &str) -> Option<&Hazard> {
        self.hazards.get(name)
    }

    pub fn spray(&self, name: &str) -> Option<&SprayType> {
        self.sprays.get(name)
    }

    pub fn add_status_type(&mut self, status: StatusType) {
        self.status_types.insert(status.name.clone(), status);
    }

    pub fn add_hazard(&mut self, hazard: Hazard) {
        self.hazards.insert(hazard.name.clone(), hazard);
    }

    pub fn add_spray(&mut self, spray: SprayType) {
        self.sprays.insert(spray.name.clone(), spray);
    }
}
