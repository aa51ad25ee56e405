use serde::{Deserialize, Serialize};

/// A dock station with live availability, as of one inventory call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub id: String,
    pub name: Option<String>,
    pub ebikes_available: u32,
    pub bikes_available: u32,
    pub docks_available: u32,
    pub lat: f64,
    pub lon: f64,
}

impl Station {
    /// Bikes of either kind ready to ride.
    pub fn total_bikes_available(&self) -> u32 {
        self.ebikes_available + self.bikes_available
    }

    /// Name for display, falling back to the tail of the id.
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => {
                let start = self
                    .id
                    .char_indices()
                    .rev()
                    .nth(29)
                    .map(|(idx, _)| idx)
                    .unwrap_or(0);
                &self.id[start..]
            }
        }
    }
}
