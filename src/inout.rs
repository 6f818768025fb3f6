use serde::Serialize;

use crate::geometry::Point;
use crate::imagery::Rgb;

/// One resolved round as it will appear in the data file.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct RoundRecord {
    pub round: u32,
    pub target: Rgb,
    pub target_at: Point,
    pub selection: Rgb,
    pub selection_at: Point,
    pub score: f64,
    pub distance: f64,
}

/// Everything worth keeping about a finished session. Written as JSON when
/// the user asked for a data file.
#[derive(Debug, Serialize)]
pub struct Data {
    pub image_width: u32,
    pub image_height: u32,
    pub rounds: Vec<RoundRecord>,
    pub total_score: f64,
    pub completed_rounds: u32,
    pub max_possible: u32,
    pub elapsed_seconds: f64,
}
