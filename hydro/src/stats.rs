//! Named debug values reported by each step. Purely informational.

use log::debug;

pub const STAT_VELOCITY: &str = "Velocity";
pub const STAT_ANGULAR_VELOCITY: &str = "Angular Velocity";
pub const STAT_SUBMERGED_POLYGONS: &str = "Submerged Polygons";
pub const STAT_TOTAL_FORCE: &str = "Total Force";
pub const STAT_TOTAL_TORQUE: &str = "Total Torque";

pub trait DebugStatsSink {
    fn set_stat(&mut self, name: &str, value: f32);
}

/// Latest value per stat, in first-reported order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsTable {
    entries: Vec<(String, f32)>,
}

impl StatsTable {
    pub fn get(&self, name: &str) -> Option<f32> {
        self.entries
            .iter()
            .find(|(entry, _)| entry == name)
            .map(|(_, value)| *value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f32)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), *value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl DebugStatsSink for StatsTable {
    fn set_stat(&mut self, name: &str, value: f32) {
        match self.entries.iter_mut().find(|(entry, _)| entry == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name.to_string(), value)),
        }
    }
}

/// Forwards every stat to the debug log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogStatsSink;

impl DebugStatsSink for LogStatsSink {
    fn set_stat(&mut self, name: &str, value: f32) {
        debug!("{name}: {value:.3}");
    }
}
