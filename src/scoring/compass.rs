use crate::stats;
use crate::types::profile::{ProfileTable, ScoreVector};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Quadrant {
    Achiever,
    Explorer,
    Killer,
    Socializer,
    Centre,
}

impl Quadrant {
    /// Achiever sits top-right, Explorer top-left, Killer bottom-right and
    /// Socializer bottom-left; the origin itself has no quadrant.
    fn locate(x: f64, y: f64) -> Self {
        if x == 0.0 && y == 0.0 {
            return Self::Centre;
        }
        match (x >= 0.0, y >= 0.0) {
            (true, true) => Self::Achiever,
            (false, true) => Self::Explorer,
            (true, false) => Self::Killer,
            (false, false) => Self::Socializer,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Achiever => "Achiever",
            Self::Explorer => "Explorer",
            Self::Killer => "Killer",
            Self::Socializer => "Socializer",
            Self::Centre => "centre",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CompassPoint {
    pub user: String,
    pub x: f64,
    pub y: f64,
    pub quadrant: Quadrant,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct AxisSummary {
    pub mean: f64,
    pub median: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Compass {
    pub normalized: bool,
    pub points: Vec<CompassPoint>,
    pub x_axis: Option<AxisSummary>,
    pub y_axis: Option<AxisSummary>,
}

/// Places each user on the Bartle plane: x runs from interaction
/// (Socializer) to action (Killer), y from players (Explorer) to world
/// (Achiever).
pub fn bartle_compass(table: &ProfileTable, normalize: bool) -> Compass {
    let raw = table
        .iter()
        .map(|(user, scores)| {
            let x = dimension(scores, "Killer") - dimension(scores, "Socializer");
            let y = dimension(scores, "Achiever") - dimension(scores, "Explorer");
            (user.to_string(), x, y)
        })
        .collect::<Vec<_>>();

    let (x_scale, y_scale) = if normalize {
        (
            axis_scale(raw.iter().map(|(_, x, _)| *x)),
            axis_scale(raw.iter().map(|(_, _, y)| *y)),
        )
    } else {
        (1.0, 1.0)
    };

    let points = raw
        .into_iter()
        .map(|(user, x, y)| {
            let (x, y) = (x / x_scale, y / y_scale);
            CompassPoint {
                user,
                x,
                y,
                quadrant: Quadrant::locate(x, y),
            }
        })
        .collect::<Vec<_>>();

    let xs = points.iter().map(|point| point.x).collect::<Vec<_>>();
    let ys = points.iter().map(|point| point.y).collect::<Vec<_>>();

    Compass {
        normalized: normalize,
        points,
        x_axis: summarize_axis(&xs),
        y_axis: summarize_axis(&ys),
    }
}

fn dimension(scores: &ScoreVector, name: &str) -> f64 {
    scores.get(name).unwrap_or(0.0)
}

/// Largest absolute coordinate on an axis, or 1 when every value is zero.
fn axis_scale(values: impl Iterator<Item = f64>) -> f64 {
    let max = values.map(f64::abs).fold(0.0, f64::max);
    if max > 0.0 {
        max
    } else {
        1.0
    }
}

fn summarize_axis(values: &[f64]) -> Option<AxisSummary> {
    Some(AxisSummary {
        mean: stats::mean(values)?,
        median: stats::median(values)?,
    })
}
