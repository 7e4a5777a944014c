use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Typed entity categories extracted from turn text.
///
/// Weights reflect how much a resuming agent needs the entity to keep
/// working: errors and file paths matter most, generic identifiers least.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    FilePath,
    Error,
    Exception,
    Url,
    Port,
    Command,
    Package,
    HttpStatus,
    Function,
    ClassName,
    EnvVar,
}

impl EntityType {
    pub const ALL: [EntityType; 11] = [
        EntityType::FilePath,
        EntityType::Error,
        EntityType::Exception,
        EntityType::Url,
        EntityType::Port,
        EntityType::Command,
        EntityType::Package,
        EntityType::HttpStatus,
        EntityType::Function,
        EntityType::ClassName,
        EntityType::EnvVar,
    ];

    pub fn weight(&self) -> f64 {
        match self {
            EntityType::FilePath => 1.00,
            EntityType::Error => 1.00,
            EntityType::Exception => 0.90,
            EntityType::Url => 0.80,
            EntityType::Port => 0.80,
            EntityType::Command => 0.70,
            EntityType::Package => 0.70,
            EntityType::HttpStatus => 0.60,
            EntityType::Function => 0.50,
            EntityType::ClassName => 0.40,
            EntityType::EnvVar => 0.40,
        }
    }

    /// File paths keep their case; every other type compares case-insensitively.
    pub fn case_sensitive(&self) -> bool {
        matches!(self, EntityType::FilePath)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::FilePath => "file_path",
            EntityType::Error => "error",
            EntityType::Exception => "exception",
            EntityType::Url => "url",
            EntityType::Port => "port",
            EntityType::Command => "command",
            EntityType::Package => "package",
            EntityType::HttpStatus => "http_status",
            EntityType::Function => "function",
            EntityType::ClassName => "class_name",
            EntityType::EnvVar => "env_var",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `(type, surface)` pair with a normalized surface.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Entity {
    pub etype: EntityType,
    pub surface: String,
}

impl Entity {
    /// Normalize a raw match into an entity surface: trim, strip trailing
    /// punctuation, lower-case unless the type is case-sensitive. Returns
    /// `None` for surfaces shorter than 2 characters after normalization.
    pub fn new(etype: EntityType, raw: &str) -> Option<Entity> {
        let trimmed = raw.trim().trim_end_matches(['.', ',', ';', ':', ')', ']', '"', '\'']);
        if trimmed.chars().count() < 2 {
            return None;
        }
        let surface = if etype.case_sensitive() {
            trimmed.to_string()
        } else {
            trimmed.to_lowercase()
        };
        Some(Entity { etype, surface })
    }

    pub fn weight(&self) -> f64 {
        self.etype.weight()
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.etype, self.surface)
    }
}

/// Per-turn entity set. Duplicates within one turn count once.
pub type EntitySet = BTreeSet<Entity>;

/// Global index: entity -> indices of turns containing it.
///
/// Built once after extraction and shared read-only across scorers.
/// BTree ordering keeps every downstream iteration deterministic.
#[derive(Debug, Default, Clone)]
pub struct EntityIndex {
    map: BTreeMap<Entity, BTreeSet<usize>>,
}

impl EntityIndex {
    pub fn build(per_turn: &[(usize, EntitySet)]) -> EntityIndex {
        let mut map: BTreeMap<Entity, BTreeSet<usize>> = BTreeMap::new();
        for (turn_index, set) in per_turn {
            for entity in set {
                map.entry(entity.clone()).or_default().insert(*turn_index);
            }
        }
        EntityIndex { map }
    }

    /// Number of turns containing the entity (document frequency).
    pub fn df(&self, entity: &Entity) -> usize {
        self.map.get(entity).map_or(0, |turns| turns.len())
    }

    pub fn turns(&self, entity: &Entity) -> Option<&BTreeSet<usize>> {
        self.map.get(entity)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Entity, &BTreeSet<usize>)> {
        self.map.iter()
    }
}
