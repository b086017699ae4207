//! # Bus configuration.
//!
//! [`BusConfig`] centralizes the few tunables a bus instance has. It is
//! consumed once, by [`EventBusBuilder::build`](crate::EventBusBuilder).
//!
//! ## Sentinel values
//! - `lane_capacity = 0` → unbounded lanes (nothing is ever dropped)

/// Configuration for one bus instance.
#[derive(Clone, Debug)]
pub struct BusConfig {
    /// Bus name, attached to lane log records.
    ///
    /// Useful when a process runs more than one bus.
    pub name: &'static str,

    /// Capacity of each delivery lane (main and background).
    ///
    /// - `0` = unbounded: enqueue never drops, a slow handler only delays
    ///   its own lane.
    /// - `n > 0` = bounded: when a lane is full, the delivery for that
    ///   handler is dropped and logged (the poster is never blocked).
    pub lane_capacity: usize,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            name: "crier",
            lane_capacity: 0,
        }
    }
}

impl BusConfig {
    /// Returns the lane capacity as an `Option`, mapping the `0` sentinel
    /// to `None`. Lanes are spawned from this view.
    pub fn bounded_lane_capacity(&self) -> Option<usize> {
        match self.lane_capacity {
            0 => None,
            n => Some(n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_capacity_is_the_unbounded_sentinel() {
        assert_eq!(BusConfig::default().bounded_lane_capacity(), None);

        let bounded = BusConfig {
            lane_capacity: 8,
            ..BusConfig::default()
        };
        assert_eq!(bounded.bounded_lane_capacity(), Some(8));
    }
}
