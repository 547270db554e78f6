//! Heuristic alerts derived from [`Stats`].
//!
//! Each rule reads only the stats and the configured
//! [`AlertThresholds`]. Rules are evaluated in declaration order and every
//! rule that fires contributes one alert.

use serde::Serialize;
use std::fmt;

use super::aggregate::Stats;
use crate::config::AlertThresholds;
use crate::tone::Tone;

/// A dashboard alert.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Alert {
    /// Extra sessions sharing a (time, room) cell on the focus day.
    Conflicts { extras: usize, day: String },
    /// Many sessions start in peak hours on the focus day.
    PeakCrowding { peak_sessions: usize },
    /// Seat occupancy close to capacity.
    NearCapacity { ratio: f64 },
    /// Seat occupancy low on a busy day.
    LowUtilization { ratio: f64, sessions: usize },
    /// One area holds most groups.
    AreaDominance { area: Tone, share: f64 },
    /// One area is nearly missing.
    AreaAbsent { area: Tone, share: f64 },
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Alert::Conflicts { extras, day } => write!(
                f,
                "Hay {extras} choque(s) extra en {day} (mismo salón y hora)."
            ),
            Alert::PeakCrowding { .. } => {
                f.write_str("Hora pico está bastante cargada (ojo choques).")
            }
            Alert::NearCapacity { .. } => {
                f.write_str("Ocupación muy alta: si entra demanda, se te estalla el cupo.")
            }
            Alert::LowUtilization { .. } => {
                f.write_str("Ocupación baja: revisa mezcla de grupos o estrategia.")
            }
            Alert::AreaDominance { .. } => {
                f.write_str("Una sola área domina mucho el horario (equilibrio por áreas).")
            }
            Alert::AreaAbsent { .. } => {
                f.write_str("Hay un área casi ausente en la distribución (ojo si es accidental).")
            }
        }
    }
}

/// Area with the largest and smallest group share.
///
/// Ties keep the first area in [`Tone::ALL`] order.
fn area_extremes(stats: &Stats) -> Option<((Tone, f64), (Tone, f64))> {
    let total = stats.groups_count;
    if total == 0 {
        return None;
    }
    let shares: Vec<(Tone, f64)> = Tone::ALL
        .iter()
        .map(|&tone| {
            let count = stats
                .groups_by_area
                .iter()
                .find(|e| e.key == tone.key())
                .map_or(0, |e| e.value);
            (tone, count as f64 / total as f64)
        })
        .collect();

    let mut max = shares[0];
    let mut min = shares[0];
    for &(tone, share) in &shares[1..] {
        if share > max.1 {
            max = (tone, share);
        }
        if share < min.1 {
            min = (tone, share);
        }
    }
    Some((max, min))
}

/// Evaluates every alert rule.
pub fn derive_alerts(stats: &Stats, thresholds: &AlertThresholds) -> Vec<Alert> {
    let mut alerts = Vec::new();

    if stats.conflicts_extras > 0 {
        alerts.push(Alert::Conflicts {
            extras: stats.conflicts_extras,
            day: stats.focus_day.clone(),
        });
    }

    if stats.peak_sessions >= thresholds.peak_crowding {
        alerts.push(Alert::PeakCrowding {
            peak_sessions: stats.peak_sessions,
        });
    }

    if let Some(ratio) = stats.occupancy_ratio() {
        if ratio >= thresholds.high_ratio {
            alerts.push(Alert::NearCapacity { ratio });
        }
        if ratio <= thresholds.low_ratio && stats.sessions_count >= thresholds.low_min_sessions {
            alerts.push(Alert::LowUtilization {
                ratio,
                sessions: stats.sessions_count,
            });
        }
    }

    if let Some(((max_area, max_share), (min_area, min_share))) = area_extremes(stats) {
        if max_share >= thresholds.dominance_share
            && stats.groups_count >= thresholds.dominance_min_groups
        {
            alerts.push(Alert::AreaDominance {
                area: max_area,
                share: max_share,
            });
        }
        if min_share <= thresholds.absent_share
            && stats.groups_count >= thresholds.absent_min_groups
        {
            alerts.push(Alert::AreaAbsent {
                area: min_area,
                share: min_share,
            });
        }
    }

    alerts
}
