//! Request contract and reference-volume grounding data.

use serde::Serialize;

use haulplan_core::Description;

/// Typical volume of a common household item, in cubic feet.
///
/// Sent with every request as grounding context to bias the service toward
/// realistic estimates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceVolume {
    pub name: &'static str,
    pub cubic_feet: f64,
}

/// Reference volumes for common household items.
pub const REFERENCE_VOLUMES: &[ReferenceVolume] = &[
    ReferenceVolume { name: "sofa (3-seat)", cubic_feet: 70.0 },
    ReferenceVolume { name: "loveseat", cubic_feet: 50.0 },
    ReferenceVolume { name: "armchair", cubic_feet: 35.0 },
    ReferenceVolume { name: "king bed", cubic_feet: 75.0 },
    ReferenceVolume { name: "queen bed", cubic_feet: 65.0 },
    ReferenceVolume { name: "twin bed", cubic_feet: 40.0 },
    ReferenceVolume { name: "dresser", cubic_feet: 30.0 },
    ReferenceVolume { name: "nightstand", cubic_feet: 8.0 },
    ReferenceVolume { name: "wardrobe", cubic_feet: 45.0 },
    ReferenceVolume { name: "dining table", cubic_feet: 40.0 },
    ReferenceVolume { name: "dining chair", cubic_feet: 5.0 },
    ReferenceVolume { name: "coffee table", cubic_feet: 12.0 },
    ReferenceVolume { name: "bookshelf", cubic_feet: 20.0 },
    ReferenceVolume { name: "desk", cubic_feet: 35.0 },
    ReferenceVolume { name: "office chair", cubic_feet: 12.0 },
    ReferenceVolume { name: "television (large)", cubic_feet: 15.0 },
    ReferenceVolume { name: "refrigerator", cubic_feet: 60.0 },
    ReferenceVolume { name: "washer", cubic_feet: 25.0 },
    ReferenceVolume { name: "dryer", cubic_feet: 25.0 },
    ReferenceVolume { name: "microwave", cubic_feet: 2.0 },
    ReferenceVolume { name: "moving box (medium)", cubic_feet: 3.0 },
    ReferenceVolume { name: "moving box (large)", cubic_feet: 4.5 },
    ReferenceVolume { name: "wardrobe box", cubic_feet: 15.0 },
    ReferenceVolume { name: "bicycle", cubic_feet: 15.0 },
    ReferenceVolume { name: "floor lamp", cubic_feet: 6.0 },
    ReferenceVolume { name: "rug (rolled)", cubic_feet: 6.0 },
];

/// Request sent to the generation service.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest<'a> {
    pub description: &'a str,
    pub reference_volumes: &'static [ReferenceVolume],
}

impl<'a> GenerationRequest<'a> {
    pub fn new(description: &'a Description) -> Self {
        Self {
            description: description.as_str(),
            reference_volumes: REFERENCE_VOLUMES,
        }
    }
}
