//! Creature classes - shared templates creatures are stamped from
//!
//! A creature copies its class's attributes at creation time, whether it
//! was loaded from a level file, spawned in play or announced by the
//! server.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SimError};
use crate::core::types::Vec3;
use crate::world::tile::Passability;

/// Name in a creature line that requests a generated name
pub const AUTONAME: &str = "autoname";

fn default_scale() -> Vec3 {
    Vec3::new(1.0, 1.0, 1.0)
}

fn default_move_speed() -> f64 {
    1.0
}

fn default_passability() -> Passability {
    Passability::WALKABLE
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatureClass {
    pub class_name: String,
    pub mesh_name: String,
    #[serde(default = "default_scale")]
    pub scale: Vec3,
    pub hp: i32,
    pub mana: i32,
    pub sight_radius: f64,
    pub dig_rate: f64,
    #[serde(default = "default_move_speed")]
    pub move_speed: f64,
    #[serde(default = "default_passability")]
    pub passability: Passability,
}

/// Where and as whom a creature should appear
#[derive(Debug, Clone, PartialEq)]
pub struct CreatureSpec {
    pub class_name: String,
    pub name: String,
    pub position: Vec3,
    pub color: i32,
}

#[derive(Debug, Deserialize)]
struct TomlClasses {
    #[serde(rename = "class")]
    classes: Vec<CreatureClass>,
}

/// Catalog of all known creature classes
#[derive(Debug, Clone)]
pub struct ClassCatalog {
    classes: AHashMap<String, CreatureClass>,
    next_autoname: u32,
}

impl Default for ClassCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassCatalog {
    pub fn new() -> Self {
        Self {
            classes: AHashMap::new(),
            next_autoname: 1,
        }
    }

    /// The stock dungeon bestiary
    pub fn with_defaults() -> Self {
        let mut catalog = Self::new();

        // Digger
        catalog.add(CreatureClass {
            class_name: "Kobold".into(),
            mesh_name: "Kobold.mesh".into(),
            scale: default_scale(),
            hp: 10,
            mana: 10,
            sight_radius: 10.0,
            dig_rate: 10.0,
            move_speed: 1.0,
            passability: Passability::WALKABLE,
        });

        // Fighter, never digs
        catalog.add(CreatureClass {
            class_name: "Goblin".into(),
            mesh_name: "Goblin.mesh".into(),
            scale: default_scale(),
            hp: 20,
            mana: 5,
            sight_radius: 8.0,
            dig_rate: 0.0,
            move_speed: 1.2,
            passability: Passability::WALKABLE,
        });

        // Flyer, crosses water and lava
        catalog.add(CreatureClass {
            class_name: "Bat".into(),
            mesh_name: "Bat.mesh".into(),
            scale: Vec3::new(0.5, 0.5, 0.5),
            hp: 5,
            mana: 0,
            sight_radius: 12.0,
            dig_rate: 0.0,
            move_speed: 2.0,
            passability: Passability::FLYABLE,
        });

        catalog
    }

    /// Add or replace a class
    pub fn add(&mut self, class: CreatureClass) {
        self.classes.insert(class.class_name.clone(), class);
    }

    pub fn get(&self, class_name: &str) -> Option<&CreatureClass> {
        self.classes.get(class_name)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Load classes from a TOML file made of `[[class]]` tables
    pub fn load_from_toml(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_toml(&content)
    }

    /// Parse classes from TOML string
    pub fn parse_toml(content: &str) -> Result<Self> {
        let toml_data: TomlClasses = toml::from_str(content)?;
        let mut catalog = Self::new();
        for class in toml_data.classes {
            catalog.add(class);
        }
        Ok(catalog)
    }

    /// Next generated name for `class_name`, e.g. `Kobold_0001`
    ///
    /// The counter is shared by all classes in the catalog.
    pub fn autoname(&mut self, class_name: &str) -> String {
        let name = format!("{}_{:04}", class_name, self.next_autoname);
        self.next_autoname += 1;
        name
    }

    /// Parse one `className name x y z color` creature line
    ///
    /// The class must exist in the catalog; the name `autoname` is
    /// replaced with a generated one.
    pub fn parse_creature_line(&mut self, line: &str, line_no: usize) -> Result<CreatureSpec> {
        let parse_err = |reason: String| SimError::Parse {
            line: line_no,
            reason,
        };

        let fields: Vec<&str> = line.split_whitespace().collect();
        let [class_name, name, x, y, z, color] = fields[..] else {
            return Err(parse_err(format!(
                "expected 6 fields (class name x y z color), found {}",
                fields.len()
            )));
        };

        if self.get(class_name).is_none() {
            return Err(SimError::UnknownCreatureClass(class_name.to_string()));
        }

        let coord = |s: &str| {
            s.parse::<f64>()
                .map_err(|e| parse_err(format!("bad coordinate '{}': {}", s, e)))
        };
        let position = Vec3::new(coord(x)?, coord(y)?, coord(z)?);
        let color = color
            .parse::<i32>()
            .map_err(|e| parse_err(format!("bad color '{}': {}", color, e)))?;

        let name = if name == AUTONAME {
            self.autoname(class_name)
        } else {
            name.to_string()
        };

        Ok(CreatureSpec {
            class_name: class_name.to_string(),
            name,
            position,
            color,
        })
    }
}
