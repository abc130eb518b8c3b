//! Field world state
//!
//! A sparse energy grid, a parallel curvature map and six quarks. The world
//! is built from a passed-in RNG so that a seed reproduces it exactly.

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::grid::{GridPos, centered_span};
use crate::clamp_energy;
use crate::settings::WorldSettings;

/// Quark flavors, in spawn order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuarkFlavor {
    Up,
    Down,
    Strange,
    Charm,
    Bottom,
    Top,
}

impl QuarkFlavor {
    pub const ALL: [QuarkFlavor; 6] = [
        QuarkFlavor::Up,
        QuarkFlavor::Down,
        QuarkFlavor::Strange,
        QuarkFlavor::Charm,
        QuarkFlavor::Bottom,
        QuarkFlavor::Top,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuarkFlavor::Up => "up",
            QuarkFlavor::Down => "down",
            QuarkFlavor::Strange => "strange",
            QuarkFlavor::Charm => "charm",
            QuarkFlavor::Bottom => "bottom",
            QuarkFlavor::Top => "top",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == s.to_lowercase())
    }
}

/// A labeled point entity (presentational only)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quark {
    pub flavor: QuarkFlavor,
    pub position: GridPos,
    /// Color charge tag in {0, 1, 2}
    pub color_charge: u8,
}

/// The quantum field world
#[derive(Debug, Clone)]
pub struct FieldWorld {
    /// Energy per cell, always within [0, 1]
    energy: BTreeMap<GridPos, f32>,
    /// Spacetime curvature per cell; fixed after creation
    curvature: BTreeMap<GridPos, f32>,
    quarks: Vec<Quark>,
    /// Fluctuation ticks applied so far
    pub ticks: u64,
}

impl FieldWorld {
    /// Populate the N×N (x, z) neighborhood at y = 0 and spawn one quark per flavor
    pub fn new<R: Rng>(settings: &WorldSettings, rng: &mut R) -> Self {
        let mut energy = BTreeMap::new();
        let mut curvature = BTreeMap::new();

        for x in centered_span(settings.neighborhood) {
            for z in centered_span(settings.neighborhood) {
                let pos = GridPos::new(x, 0, z);
                let c = settings.curvature_max;
                curvature.insert(pos, rng.random_range(-c..=c));
                energy.insert(pos, rng.random_range(0.0..=settings.initial_energy_max));
            }
        }

        let range = settings.quark_range;
        let quarks = QuarkFlavor::ALL
            .iter()
            .enumerate()
            .map(|(i, &flavor)| Quark {
                flavor,
                position: GridPos::new(
                    rng.random_range(-range..=range),
                    rng.random_range(-range..=range),
                    rng.random_range(-range..=range),
                ),
                color_charge: (i % 3) as u8,
            })
            .collect();

        log::debug!("Field world created with {} cells", energy.len());

        Self {
            energy,
            curvature,
            quarks,
            ticks: 0,
        }
    }

    /// Energy at `pos`, or 0.0 for cells not in the field
    #[inline]
    pub fn energy_at(&self, pos: GridPos) -> f32 {
        self.energy.get(&pos).copied().unwrap_or(0.0)
    }

    /// Curvature at `pos`, or 0.0 for cells not in the field
    pub fn curvature_at(&self, pos: GridPos) -> f32 {
        self.curvature.get(&pos).copied().unwrap_or(0.0)
    }

    pub fn contains(&self, pos: GridPos) -> bool {
        self.energy.contains_key(&pos)
    }

    /// Field cells in grid order
    pub fn cells(&self) -> impl Iterator<Item = (GridPos, f32)> + '_ {
        self.energy.iter().map(|(&pos, &e)| (pos, e))
    }

    pub fn cell_count(&self) -> usize {
        self.energy.len()
    }

    pub fn quarks(&self) -> &[Quark] {
        &self.quarks
    }

    /// Mean energy over all cells (0.0 for an empty field)
    pub fn mean_energy(&self) -> f32 {
        if self.energy.is_empty() {
            return 0.0;
        }
        self.energy.values().sum::<f32>() / self.energy.len() as f32
    }

    /// Add a uniform delta in [-max_delta, max_delta] to an existing cell and clamp.
    /// Returns false (and draws nothing) if the cell is not in the field.
    pub fn perturb_cell<R: Rng>(&mut self, pos: GridPos, max_delta: f32, rng: &mut R) -> bool {
        match self.energy.get_mut(&pos) {
            Some(value) => {
                *value = clamp_energy(*value + rng.random_range(-max_delta..=max_delta));
                true
            }
            None => false,
        }
    }

    /// Each cell independently fluctuates with the given probability
    pub fn quantum_fluctuate<R: Rng>(&mut self, probability: f64, max_delta: f32, rng: &mut R) {
        for value in self.energy.values_mut() {
            if rng.random_bool(probability) {
                *value = clamp_energy(*value + rng.random_range(-max_delta..=max_delta));
            }
        }
    }
}
