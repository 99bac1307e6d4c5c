/// What to do when a page/sector/block access does not fit in its container
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RangePolicy {
    /// Truncate the length to the container and report the count actually transferred.
    /// An offset past the container end transfers nothing.
    #[default]
    Clamp,
    /// Reject the access with [`crate::error::Error::RangeClamped`] or
    /// [`crate::error::Error::OffsetOutOfRange`]
    Strict,
}

/// Runtime settings of the driver
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Minimum uptime before the chip is talked to
    pub startup_delay_ms: u32,
    /// Idle time with chip select released before reading the ID
    pub power_up_delay_ms: u32,
    /// Delay between two reads of the busy bit
    pub poll_interval_ms: u32,
    /// Give up waiting for a program/erase after this long. `None` waits forever
    pub poll_timeout_ms: Option<u32>,
    pub range_policy: RangePolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            startup_delay_ms: 100,
            power_up_delay_ms: 100,
            poll_interval_ms: 1,
            poll_timeout_ms: None,
            range_policy: RangePolicy::Clamp,
        }
    }
}

impl Config {
    pub const fn with_startup_delay_ms(mut self, ms: u32) -> Self {
        self.startup_delay_ms = ms;
        self
    }

    pub const fn with_power_up_delay_ms(mut self, ms: u32) -> Self {
        self.power_up_delay_ms = ms;
        self
    }

    pub const fn with_poll_interval_ms(mut self, ms: u32) -> Self {
        self.poll_interval_ms = ms;
        self
    }

    pub const fn with_poll_timeout_ms(mut self, ms: u32) -> Self {
        self.poll_timeout_ms = Some(ms);
        self
    }

    pub const fn with_range_policy(mut self, policy: RangePolicy) -> Self {
        self.range_policy = policy;
        self
    }
}
