//! Static crop catalog.

use serde::Serialize;

/// Closed acceptable interval for one growing condition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

/// Growing requirements of one crop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CropProfile {
    pub name: &'static str,
    /// Mean temperature, °C
    pub temperature: Range,
    /// Weekly rainfall, mm
    pub rainfall: Range,
    pub soil_ph: Range,
}

/// The crops scored by [`crate::recommend_crops`], in tie-break order.
pub const CATALOG: [CropProfile; 6] = [
    CropProfile {
        name: "Rice",
        temperature: Range::new(18.0, 26.0),
        rainfall: Range::new(70.0, 200.0),
        soil_ph: Range::new(5.0, 6.5),
    },
    CropProfile {
        name: "Wheat",
        temperature: Range::new(10.0, 20.0),
        rainfall: Range::new(20.0, 60.0),
        soil_ph: Range::new(6.0, 7.5),
    },
    CropProfile {
        name: "Maize",
        temperature: Range::new(20.0, 30.0),
        rainfall: Range::new(40.0, 100.0),
        soil_ph: Range::new(5.5, 7.0),
    },
    CropProfile {
        name: "Cotton",
        temperature: Range::new(25.0, 35.0),
        rainfall: Range::new(10.0, 40.0),
        soil_ph: Range::new(6.0, 8.0),
    },
    CropProfile {
        name: "Soybean",
        temperature: Range::new(20.0, 30.0),
        rainfall: Range::new(30.0, 90.0),
        soil_ph: Range::new(6.0, 7.5),
    },
    CropProfile {
        name: "Millets",
        temperature: Range::new(25.0, 35.0),
        rainfall: Range::new(0.0, 30.0),
        soil_ph: Range::new(5.0, 7.5),
    },
];
