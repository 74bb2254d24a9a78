use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Entry as it appears in `exercises.json` (English labels).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawExercise {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub equipment: Option<String>,
    #[serde(default)]
    pub primary_muscles: Vec<String>,
    #[serde(default)]
    pub secondary_muscles: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

/// Exercise with level, equipment and muscles translated to Portuguese.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: String,
    pub name: String,
    pub level: String,
    pub equipment: String,
    pub primary_muscles: Vec<String>,
    pub secondary_muscles: Vec<String>,
    pub instructions: Vec<String>,
    pub images: Vec<String>,
}

impl From<RawExercise> for Exercise {
    fn from(raw: RawExercise) -> Self {
        Self {
            level: translate_level(&raw.level),
            equipment: translate_equipment(raw.equipment.as_deref().unwrap_or_default()),
            primary_muscles: translate_muscles(&raw.primary_muscles),
            secondary_muscles: translate_muscles(&raw.secondary_muscles),
            id: raw.id,
            name: raw.name,
            instructions: raw.instructions,
            images: raw.images,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogSummary {
    pub total: usize,
    pub by_level: BTreeMap<String, usize>,
    pub by_equipment: BTreeMap<String, usize>,
}

/// Read-only exercise list, built once at startup and shared behind an `Arc`.
#[derive(Debug, Default)]
pub struct Catalog {
    exercises: Vec<Exercise>,
}

impl Catalog {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("read exercise catalog {}", path.display()))?;
        let catalog = Self::from_json(&raw)
            .with_context(|| format!("parse exercise catalog {}", path.display()))?;
        info!(exercises = catalog.len(), path = %path.display(), "exercise catalog loaded");
        Ok(catalog)
    }

    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let raw: Vec<RawExercise> = serde_json::from_str(json)?;
        Ok(raw.into_iter().collect())
    }

    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    pub fn get(&self, id: &str) -> Option<&Exercise> {
        self.exercises.iter().find(|e| e.id == id)
    }

    pub fn summary(&self) -> CatalogSummary {
        let mut by_level = BTreeMap::new();
        let mut by_equipment = BTreeMap::new();
        for e in &self.exercises {
            *by_level.entry(e.level.clone()).or_insert(0) += 1;
            *by_equipment.entry(e.equipment.clone()).or_insert(0) += 1;
        }
        CatalogSummary {
            total: self.exercises.len(),
            by_level,
            by_equipment,
        }
    }
}

impl FromIterator<RawExercise> for Catalog {
    fn from_iter<I: IntoIterator<Item = RawExercise>>(iter: I) -> Self {
        Self {
            exercises: iter.into_iter().map(Exercise::from).collect(),
        }
    }
}

// Lookups are case-insensitive; unknown labels pass through untouched.

pub fn translate_level(level: &str) -> String {
    let pt = match level.to_lowercase().as_str() {
        "beginner" => "Iniciante",
        "intermediate" => "Intermediário",
        "expert" => "Avançado",
        _ => return level.to_owned(),
    };
    pt.to_owned()
}

pub fn translate_equipment(equipment: &str) -> String {
    let pt = match equipment.to_lowercase().as_str() {
        "body weight" => "Peso Corporal",
        "dumbbell" => "Halter",
        "barbell" => "Barra",
        "machine" => "Máquina",
        "cable" => "Cabo",
        "kettlebells" => "Kettlebell",
        "other" => "Outro",
        "foam roll" => "Rolo",
        _ => return equipment.to_owned(),
    };
    pt.to_owned()
}

pub fn translate_muscle(muscle: &str) -> String {
    let pt = match muscle.to_lowercase().as_str() {
        "abdominals" => "abdominais",
        "hamstrings" => "posteriores",
        "adductors" => "adutores",
        "biceps" => "bíceps",
        "quadriceps" => "quadríceps",
        "shoulders" => "ombros",
        "middle back" => "costas médias",
        "chest" => "peito",
        "calves" => "panturrilhas",
        "glutes" => "glúteos",
        "lower back" => "lombar",
        "lats" => "dorsais",
        "triceps" => "tríceps",
        "traps" => "trapézio",
        "forearms" => "antebraços",
        _ => return muscle.to_owned(),
    };
    pt.to_owned()
}

fn translate_muscles(muscles: &[String]) -> Vec<String> {
    muscles.iter().map(|m| translate_muscle(m)).collect()
}
