//! Temperature dependent update policy
//!
//! Each panel series guarantees a global update only within an operating
//! range. Outside of that range the refresh is suppressed.

use crate::profile::{FEATURE_FAST, FEATURE_RED, FEATURE_WIDE_TEMPERATURE};

/// Requested or performed kind of update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdateMode {
    /// Refresh suppressed
    None,
    /// Full refresh of the whole panel
    #[default]
    Global,
    /// Embedded fast update, performed as global on these panels
    Fast,
    /// Partial update, performed as global on these panels
    Partial,
}

/// Panel series, selected by feature flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemperatureClass {
    /// PS, embedded fast update
    Fast,
    /// KS, wide temperature and embedded fast update
    WideFast,
    /// HS, global update below 0 °C
    Freezer,
    /// JS, red colour
    Red,
    /// CS, normal
    Normal,
}

impl TemperatureClass {
    /// Match the relevant feature flags against the known series
    pub fn from_features(features: u8) -> TemperatureClass {
        match features & (FEATURE_FAST | FEATURE_WIDE_TEMPERATURE | FEATURE_RED) {
            FEATURE_FAST => TemperatureClass::Fast,
            f if f == FEATURE_FAST | FEATURE_WIDE_TEMPERATURE => TemperatureClass::WideFast,
            FEATURE_WIDE_TEMPERATURE => TemperatureClass::Freezer,
            FEATURE_RED => TemperatureClass::Red,
            _ => TemperatureClass::Normal,
        }
    }

    /// Inclusive operating range for a global update, in °C
    pub fn range(self) -> (i8, i8) {
        match self {
            TemperatureClass::Fast => (0, 50),
            TemperatureClass::WideFast => (-15, 60),
            TemperatureClass::Freezer => (-25, 30),
            TemperatureClass::Red => (0, 40),
            TemperatureClass::Normal => (0, 50),
        }
    }

    /// Whether a global update is allowed at `celsius`
    pub fn accepts(self, celsius: i8) -> bool {
        let (low, high) = self.range();
        (low..=high).contains(&celsius)
    }
}

/// Panel temperature, as told by the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Temperature {
    celsius: i8,
}

impl Default for Temperature {
    fn default() -> Self {
        Self { celsius: 25 }
    }
}

impl Temperature {
    /// Set the temperature in °C
    pub fn set_celsius(&mut self, celsius: i8) {
        self.celsius = celsius;
    }

    /// Set the temperature in °F, converted with truncating integer math
    pub fn set_fahrenheit(&mut self, fahrenheit: i16) {
        let celsius = (i32::from(fahrenheit) - 32) * 5 / 9;
        self.celsius = celsius.clamp(i8::MIN.into(), i8::MAX.into()) as i8;
    }

    /// Current temperature in °C
    pub fn celsius(&self) -> i8 {
        self.celsius
    }

    /// Temperature byte for the COG temperature register: 0x50 at 0 °C, 0x82 at 25 °C
    pub(crate) fn cog_code(&self) -> u8 {
        (i16::from(self.celsius) * 2 + 0x50) as u8
    }

    /// Decide which update is performed for `requested`.
    ///
    /// Any request is performed as a global update when the temperature is
    /// within the range of the panel, and suppressed otherwise.
    pub fn decide(&self, _requested: UpdateMode, features: u8) -> UpdateMode {
        if TemperatureClass::from_features(features).accepts(self.celsius) {
            UpdateMode::Global
        } else {
            UpdateMode::None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::FEATURE_TOUCH;

    fn at(celsius: i8) -> Temperature {
        let mut t = Temperature::default();
        t.set_celsius(celsius);
        t
    }

    #[test]
    fn classes() {
        assert_eq!(TemperatureClass::from_features(0), TemperatureClass::Normal);
        assert_eq!(TemperatureClass::from_features(FEATURE_FAST), TemperatureClass::Fast);
        assert_eq!(
            TemperatureClass::from_features(FEATURE_FAST | FEATURE_WIDE_TEMPERATURE | FEATURE_TOUCH),
            TemperatureClass::WideFast
        );
        assert_eq!(
            TemperatureClass::from_features(FEATURE_WIDE_TEMPERATURE),
            TemperatureClass::Freezer
        );
        assert_eq!(TemperatureClass::from_features(FEATURE_RED), TemperatureClass::Red);
        assert_eq!(
            TemperatureClass::from_features(FEATURE_RED | FEATURE_FAST),
            TemperatureClass::Normal
        );
    }

    #[test]
    fn wide_fast_bounds_are_inclusive() {
        let features = FEATURE_FAST | FEATURE_WIDE_TEMPERATURE;
        assert_eq!(at(-15).decide(UpdateMode::Global, features), UpdateMode::Global);
        assert_eq!(at(60).decide(UpdateMode::Global, features), UpdateMode::Global);
        assert_eq!(at(-16).decide(UpdateMode::Global, features), UpdateMode::None);
        assert_eq!(at(61).decide(UpdateMode::Global, features), UpdateMode::None);
    }

    #[test]
    fn normal_class() {
        assert_eq!(at(-5).decide(UpdateMode::Global, 0), UpdateMode::None);
        assert_eq!(at(10).decide(UpdateMode::Global, 0), UpdateMode::Global);
    }

    #[test]
    fn fast_and_partial_become_global() {
        assert_eq!(at(20).decide(UpdateMode::Fast, FEATURE_FAST), UpdateMode::Global);
        assert_eq!(at(20).decide(UpdateMode::Partial, 0), UpdateMode::Global);
    }

    #[test]
    fn none_request_in_range_is_global() {
        assert_eq!(at(25).decide(UpdateMode::None, 0), UpdateMode::Global);
        assert_eq!(at(-5).decide(UpdateMode::None, 0), UpdateMode::None);
    }

    #[test]
    fn fahrenheit() {
        let mut t = Temperature::default();
        t.set_fahrenheit(77);
        assert_eq!(t, at(25));
        t.set_fahrenheit(0);
        assert_eq!(t.celsius(), -17);
        t.set_fahrenheit(33);
        assert_eq!(t.celsius(), 0);
    }

    #[test]
    fn cog_code() {
        assert_eq!(at(25).cog_code(), 0x82);
        assert_eq!(at(0).cog_code(), 0x50);
        assert_eq!(at(-10).cog_code(), 0x3C);
    }
}
