use std::fmt;

use super::simplify::simplify;
use crate::Snapshot;

/// Entry of a position trail log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrailEvent {
    /// First sample on a map.
    Start { map_id: u32, position: [i64; 2] },
    Moved { position: [i64; 2] },
}

impl fmt::Display for TrailEvent {
    /// Renders log lines: the map id on its own line, then `[x,y],`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrailEvent::Start { map_id, position } => {
                writeln!(f, "{map_id}")?;
                write!(f, "[{},{}],", position[0], position[1])
            }
            TrailEvent::Moved { position } => write!(f, "[{},{}],", position[0], position[1]),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Mark {
    map_id: u32,
    ui_tick: u64,
    position: [i64; 2],
}

/// Records distinct minimap positions from a stream of snapshots.
///
/// A sample is recorded only when both its tick and its position differ
/// from the last recorded sample, so a paused client or a standing
/// character produce no entries.
///
/// # Examples
/// ```
/// use gw2link_core::{PositionTrail, Snapshot, TrailEvent};
///
/// let mut snapshot = Snapshot {
///     name: "Foo".to_string(),
///     profession: 1,
///     race: 2,
///     spec: 3,
///     commander: false,
///     team_color_id: 0,
///     map_id: 15,
///     build_id: 12345,
///     ui_tick: 1,
///     position: [10, 20],
/// };
/// let mut trail = PositionTrail::new();
/// assert!(matches!(trail.observe(&snapshot), Some(TrailEvent::Start { .. })));
///
/// snapshot.ui_tick = 2;
/// assert_eq!(trail.observe(&snapshot), None);
///
/// snapshot.position = [11, 20];
/// assert_eq!(trail.observe(&snapshot), Some(TrailEvent::Moved { position: [11, 20] }));
/// ```
#[derive(Debug, Clone, Default)]
pub struct PositionTrail {
    last: Option<Mark>,
}

impl PositionTrail {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, snapshot: &Snapshot) -> Option<TrailEvent> {
        let event = match self.last {
            Some(last) if last.map_id == snapshot.map_id => {
                if last.ui_tick == snapshot.ui_tick || last.position == snapshot.position {
                    return None;
                }
                TrailEvent::Moved {
                    position: snapshot.position,
                }
            }
            _ => TrailEvent::Start {
                map_id: snapshot.map_id,
                position: snapshot.position,
            },
        };
        self.last = Some(Mark {
            map_id: snapshot.map_id,
            ui_tick: snapshot.ui_tick,
            position: snapshot.position,
        });
        Some(event)
    }
}

/// Points recorded on one map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrailSection {
    pub map_id: u32,
    pub points: Vec<[i64; 2]>,
}

impl fmt::Display for TrailSection {
    /// Same line format as a stream of [`TrailEvent`]s.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.map_id)?;
        for point in &self.points {
            write!(f, "\n[{},{}],", point[0], point[1])?;
        }
        Ok(())
    }
}

/// Trail events grouped by map, for simplification before writing.
///
/// # Examples
/// ```
/// use gw2link_core::{SectionedTrail, TrailEvent};
///
/// let mut trail = SectionedTrail::new();
/// trail.push(TrailEvent::Start { map_id: 15, position: [0, 0] });
/// trail.push(TrailEvent::Moved { position: [5, 0] });
/// trail.push(TrailEvent::Moved { position: [10, 0] });
/// assert_eq!(trail.render_simplified(1, true), "15\n[0,0],\n[10,0],\n");
/// ```
#[derive(Debug, Clone, Default)]
pub struct SectionedTrail {
    sections: Vec<TrailSection>,
}

impl SectionedTrail {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sections(&self) -> &[TrailSection] {
        &self.sections
    }

    pub fn push(&mut self, event: TrailEvent) {
        match event {
            TrailEvent::Start { map_id, position } => self.sections.push(TrailSection {
                map_id,
                points: vec![position],
            }),
            TrailEvent::Moved { position } => match self.sections.last_mut() {
                Some(section) => section.points.push(position),
                None => log::debug!("dropping move to {position:?} before any map start"),
            },
        }
    }

    /// Simplify every section and render the whole log, one line each.
    pub fn render_simplified(&self, tolerance: i64, highest_quality: bool) -> String {
        let mut out = String::new();
        for section in &self.sections {
            let simplified = TrailSection {
                map_id: section.map_id,
                points: simplify(&section.points, tolerance, highest_quality),
            };
            out.push_str(&simplified.to_string());
            out.push('\n');
        }
        out
    }
}
