#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// Driver Configuration
pub struct Config {
    /// Delay between two reads of the busy pin, in ms. Zero is read as 1 ms.
    pub busy_poll_ms: u32,
    /// Longest time to wait for the busy pin to report ready, in ms.
    ///
    /// Waiting longer fails the refresh with [`Error::BusyTimeout`](crate::error::Error::BusyTimeout).
    pub busy_timeout_ms: u32,
    /// Attempts of the frame buffer self-test
    pub buffer_check_retries: u8,
    /// Delay between two attempts of the frame buffer self-test, in ms
    pub buffer_check_delay_ms: u32,
    /// Pause between the black and the white pass of
    /// [`regenerate()`](crate::epd::Epd::regenerate), in ms
    pub regenerate_pause_ms: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            busy_poll_ms: 100,
            busy_timeout_ms: 30_000,
            buffer_check_retries: 8,
            buffer_check_delay_ms: 100,
            regenerate_pause_ms: 100,
        }
    }
}

impl Config {
    /// Delay between two busy reads, at least 1 ms
    pub(crate) fn poll_interval_ms(&self) -> u32 {
        self.busy_poll_ms.max(1)
    }

    /// Number of busy polls that fit in the timeout, at least one
    pub(crate) fn busy_polls(&self) -> u32 {
        (self.busy_timeout_ms / self.poll_interval_ms()).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_polls_cover_timeout() {
        let config = Config::default();
        assert_eq!(config.poll_interval_ms(), 100);
        assert_eq!(config.busy_polls(), 300);
    }

    #[test]
    fn zero_poll_interval_is_clamped() {
        let config = Config {
            busy_poll_ms: 0,
            busy_timeout_ms: 50,
            ..Config::default()
        };
        assert_eq!(config.poll_interval_ms(), 1);
        assert_eq!(config.busy_polls(), 50);
    }

    #[test]
    fn short_timeout_still_polls_once() {
        let config = Config {
            busy_poll_ms: 100,
            busy_timeout_ms: 10,
            ..Config::default()
        };
        assert_eq!(config.busy_polls(), 1);
    }
}
