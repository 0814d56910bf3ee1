//! Movement dictionary used by the resolver.
//!
//! This module provides the built-in movement catalog and loaders for
//! catalogs exported from an external movement store (JSON, TOML or CSV).

use crate::{Error, MovementEntry, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Cached default catalog - built once and reused across all operations
static DEFAULT_CATALOG: Lazy<MovementCatalog> = Lazy::new(build_default_catalog_internal);

/// An ordered list of movement entries
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementCatalog {
    #[serde(default)]
    pub movements: Vec<MovementEntry>,
}

/// Get a reference to the cached default catalog
pub fn get_default_catalog() -> &'static MovementCatalog {
    &DEFAULT_CATALOG
}

/// Builds the default catalog of common movements
///
/// **Note**: For production use, prefer `get_default_catalog()` which returns a
/// cached reference. This function is retained for testing and custom catalog creation.
pub fn build_default_catalog() -> MovementCatalog {
    build_default_catalog_internal()
}

fn entry(
    id: &str,
    name: &str,
    aliases: &[&str],
    modality: &str,
    default_reps: Option<u32>,
) -> MovementEntry {
    MovementEntry {
        id: Some(id.into()),
        name: name.into(),
        aliases: aliases.iter().map(|a| a.to_string()).collect(),
        default_reps,
        default_sets: None,
        modality: Some(modality.into()),
    }
}

fn build_default_catalog_internal() -> MovementCatalog {
    let movements = vec![
        // ====================================================================
        // Weightlifting
        // ====================================================================
        entry("thruster", "Thruster", &["barbell thruster"], "weightlifting", None),
        entry("back_squat", "Back Squat", &["squat", "bs"], "weightlifting", None),
        entry("front_squat", "Front Squat", &["fs"], "weightlifting", None),
        entry("deadlift", "Deadlift", &["dl"], "weightlifting", None),
        entry("clean", "Clean", &["squat clean"], "weightlifting", None),
        entry("power_clean", "Power Clean", &["pc"], "weightlifting", None),
        entry("snatch", "Snatch", &["squat snatch"], "weightlifting", None),
        entry("push_press", "Push Press", &["pp"], "weightlifting", None),
        entry("shoulder_press", "Shoulder Press", &["strict press", "press"], "weightlifting", None),
        entry("kb_swing", "Kettlebell Swing", &["kb swing", "kbs", "russian swing"], "weightlifting", None),
        entry("wall_ball", "Wall Ball", &["wall ball shot", "wb"], "weightlifting", Some(20)),
        // ====================================================================
        // Gymnastics
        // ====================================================================
        entry("pull_up", "Pull-up", &["pullup", "pull up"], "gymnastics", None),
        entry("chest_to_bar", "Chest-to-Bar Pull-up", &["c2b", "ctb"], "gymnastics", None),
        entry("push_up", "Push-up", &["pushup", "push up"], "gymnastics", None),
        entry("sit_up", "Sit-up", &["situp", "sit up", "abmat sit-up"], "gymnastics", None),
        entry("air_squat", "Air Squat", &["bodyweight squat"], "gymnastics", None),
        entry("burpee", "Burpee", &[], "gymnastics", None),
        entry("toes_to_bar", "Toes-to-Bar", &["t2b", "ttb"], "gymnastics", None),
        entry("handstand_push_up", "Handstand Push-up", &["hspu"], "gymnastics", None),
        entry("muscle_up", "Muscle-up", &["mu", "ring muscle-up"], "gymnastics", None),
        entry("box_jump", "Box Jump", &["bj"], "gymnastics", None),
        entry("pistol", "Pistol", &["single-leg squat", "pistol squat"], "gymnastics", None),
        entry("lunge", "Lunge", &["walking lunge"], "gymnastics", None),
        // ====================================================================
        // Monostructural
        // ====================================================================
        entry("run", "Run", &["running"], "monostructural", None),
        entry("row", "Row", &["rowing", "erg"], "monostructural", None),
        entry("double_under", "Double-under", &["du", "dubs"], "monostructural", Some(50)),
        entry("bike", "Bike", &["assault bike", "echo bike", "air bike"], "monostructural", None),
    ];

    MovementCatalog { movements }
}

/// CSV row format for catalog exports
#[derive(Debug, Deserialize)]
struct CsvRow {
    id: Option<String>,
    name: String,
    aliases: Option<String>,
    default_reps: Option<u32>,
    default_sets: Option<u32>,
    modality: Option<String>,
}

impl From<CsvRow> for MovementEntry {
    fn from(row: CsvRow) -> Self {
        MovementEntry {
            id: row.id.filter(|id| !id.trim().is_empty()),
            name: row.name.trim().to_string(),
            aliases: row
                .aliases
                .unwrap_or_default()
                .split('|')
                .map(str::trim)
                .filter(|alias| !alias.is_empty())
                .map(str::to_string)
                .collect(),
            default_reps: row.default_reps,
            default_sets: row.default_sets,
            modality: row.modality.filter(|m| !m.trim().is_empty()),
        }
    }
}

impl MovementCatalog {
    pub fn new(movements: Vec<MovementEntry>) -> Self {
        Self { movements }
    }

    pub fn entries(&self) -> &[MovementEntry] {
        &self.movements
    }

    pub fn len(&self) -> usize {
        self.movements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movements.is_empty()
    }

    /// Load a catalog export, format chosen by file extension
    ///
    /// - `.json`: an array of entries, or `{ "movements": [...] }`
    /// - `.toml`: `[[movements]]` tables
    /// - `.csv`: `id,name,aliases,default_reps,default_sets,modality`
    ///   with `|`-separated aliases
    pub fn load_from(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        let catalog = match extension.as_str() {
            "json" => Self::from_json(&std::fs::read_to_string(path)?)?,
            "toml" => toml::from_str(&std::fs::read_to_string(path)?)?,
            "csv" => Self::from_csv_reader(std::fs::File::open(path)?)?,
            other => {
                return Err(Error::Dictionary(format!(
                    "Unsupported dictionary format '{}' for {:?}",
                    other, path
                )))
            }
        };

        tracing::info!("Loaded {} movements from {:?}", catalog.len(), path);
        Ok(catalog)
    }

    /// Parse a JSON catalog (bare array or wrapped object)
    pub fn from_json(contents: &str) -> Result<Self> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum JsonCatalog {
            Bare(Vec<MovementEntry>),
            Wrapped(MovementCatalog),
        }

        Ok(match serde_json::from_str(contents)? {
            JsonCatalog::Bare(movements) => MovementCatalog { movements },
            JsonCatalog::Wrapped(catalog) => catalog,
        })
    }

    /// Parse a CSV catalog from any reader
    pub fn from_csv_reader<R: std::io::Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut movements = Vec::new();
        for row in csv_reader.deserialize::<CsvRow>() {
            movements.push(MovementEntry::from(row?));
        }
        Ok(MovementCatalog { movements })
    }

    /// Validate the catalog for consistency
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let mut names: HashMap<String, &str> = HashMap::new();
        let mut aliases: HashMap<String, &str> = HashMap::new();

        for movement in &self.movements {
            let name_key = crate::resolver::normalize(&movement.name);
            if name_key.is_empty() {
                errors.push("Movement has empty name".to_string());
                continue;
            }

            if let Some(existing) = names.insert(name_key, &movement.name) {
                errors.push(format!(
                    "Movement '{}' duplicates '{}'",
                    movement.name, existing
                ));
            }

            if movement.default_sets == Some(0) || movement.default_reps == Some(0) {
                errors.push(format!("Movement '{}' has a zero default", movement.name));
            }

            if movement
                .default_sets
                .is_some_and(|sets| sets as usize > crate::MAX_SETS)
            {
                errors.push(format!(
                    "Movement '{}' has more than {} default sets",
                    movement.name,
                    crate::MAX_SETS
                ));
            }

            for alias in &movement.aliases {
                let alias_key = crate::resolver::normalize(alias);
                if alias_key.is_empty() {
                    errors.push(format!("Movement '{}' has an empty alias", movement.name));
                    continue;
                }
                if let Some(owner) = aliases.insert(alias_key, &movement.name) {
                    if owner != movement.name {
                        errors.push(format!(
                            "Alias '{}' claimed by both '{}' and '{}'",
                            alias, owner, movement.name
                        ));
                    }
                }
            }
        }

        errors
    }

    /// Validate and turn problems into an error
    pub fn ensure_valid(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::CatalogValidation(errors.join("; ")))
        }
    }
}
