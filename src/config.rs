// src/config.rs

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use crate::model::{get_species_properties, Species, StructureType};
use crate::physics::ProjectionMode;

// --- RenderStyle ---

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderStyle {
  pub atom_scale: f64,
  pub bond_color: (f64, f64, f64),
  pub internal_bond_color: (f64, f64, f64),
  pub anion_cell_color: (f64, f64, f64),
  pub cation_cell_color: (f64, f64, f64),
  pub plane_color: (f64, f64, f64),
  pub plane_opacity: f64,
  pub background_color: (f64, f64, f64),

  // Per-species color overrides, keyed by `Species::key` (e.g. "Cl")
  #[serde(default)]
  pub species_colors: HashMap<String, (f64, f64, f64)>,
}

impl Default for RenderStyle {
  fn default() -> Self {
    Self {
      atom_scale: 1.0,
      bond_color: (1.0, 1.0, 1.0),
      internal_bond_color: (1.0, 1.0, 1.0),
      anion_cell_color: (1.0, 0.42, 0.42),
      cation_cell_color: (0.29, 0.62, 1.0),
      plane_color: (1.0, 0.42, 0.42),
      plane_opacity: 0.4,
      background_color: (0.1, 0.1, 0.18),
      species_colors: HashMap::new(),
    }
  }
}

impl RenderStyle {
  /// Sphere radius and color, honouring overrides
  pub fn species_look(&self, species: Species) -> (f64, (f64, f64, f64)) {
    let (radius, color) = get_species_properties(species);
    let color = self
      .species_colors
      .get(species.key())
      .copied()
      .unwrap_or(color);
    (radius * self.atom_scale, color)
  }
}

// --- Main Config Struct ---

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Config {
  #[serde(default)]
  pub structure: StructureType,
  #[serde(default = "default_lattice_a")]
  pub lattice_a: f64,

  #[serde(default)]
  pub show_internal_lines: bool,
  #[serde(default)]
  pub show_nested_cells: bool,
  #[serde(default)]
  pub projection_mode: ProjectionMode,
  /// Rotation speed in percent of the nominal speed (50 = nominal)
  #[serde(default = "default_rotation_speed")]
  pub rotation_speed: f64,

  #[serde(default)]
  pub style: RenderStyle,
}

fn default_lattice_a() -> f64 {
  4.0
}

fn default_rotation_speed() -> f64 {
  50.0
}

impl Default for Config {
  fn default() -> Self {
    Self {
      structure: StructureType::default(),
      lattice_a: default_lattice_a(),
      show_internal_lines: false,
      show_nested_cells: false,
      projection_mode: ProjectionMode::default(),
      rotation_speed: default_rotation_speed(),
      style: RenderStyle::default(),
    }
  }
}

impl Config {
  /// Loads config from standard OS location (e.g., ~/.config/unitcell/settings.json)
  pub fn load() -> (Self, String) {
    Self::load_from(&Self::get_path())
  }

  pub fn load_from(path: &Path) -> (Self, String) {
    if path.exists() {
      match File::open(path) {
        Ok(file) => {
          let reader = BufReader::new(file);
          match serde_json::from_reader(reader) {
            Ok(cfg) => (cfg, format!("Config loaded from {:?}", path)),
            Err(e) => (Self::default(), format!("Error parsing config: {}", e)),
          }
        }
        Err(e) => (Self::default(), format!("Error opening config: {}", e)),
      }
    } else {
      (
        Self::default(),
        "No config found. Using defaults.".to_string(),
      )
    }
  }

  /// Saves config to standard OS location
  pub fn save(&self) -> String {
    self.save_to(&Self::get_path())
  }

  pub fn save_to(&self, path: &Path) -> String {
    if let Some(parent) = path.parent() {
      let _ = fs::create_dir_all(parent);
    }

    match File::create(path) {
      Ok(file) => {
        let writer = BufWriter::new(file);
        match serde_json::to_writer_pretty(writer, self) {
          Ok(_) => format!("Config saved to {:?}", path),
          Err(e) => format!("Failed to save config: {}", e),
        }
      }
      Err(e) => format!("Could not create config file: {}", e),
    }
  }

  fn get_path() -> PathBuf {
    if let Some(proj) = ProjectDirs::from("org", "unitcell", "unitcell") {
      proj.config_dir().join("settings.json")
    } else {
      PathBuf::from("settings.json")
    }
  }
}
