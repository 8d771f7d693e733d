//! Panel geometry and feature metadata resolved from a device identifier
//!
//! A device identifier packs three codes: `extra << 16 | size << 8 | type`.
//! The size code selects the native geometry, the extra code carries the
//! [feature flags](FEATURE_FAST) used by the temperature policy, and the type
//! code identifies the film.

use alloc::string::String;
use core::fmt::Write;

/// With embedded fast update
pub const FEATURE_FAST: u8 = 0x01;
/// With capacitive touch panel
pub const FEATURE_TOUCH: u8 = 0x02;
/// With another, undocumented feature
pub const FEATURE_OTHER: u8 = 0x04;
/// With wide operating temperature
pub const FEATURE_WIDE_TEMPERATURE: u8 = 0x08;
/// With red colour
pub const FEATURE_RED: u8 = 0x10;

/// 1.54" 152x152
pub const EPD_154: DeviceId = DeviceId(0x00_15_09);
/// 2.13" 212x104
pub const EPD_213: DeviceId = DeviceId(0x00_21_09);
/// 2.66" 296x152
pub const EPD_266: DeviceId = DeviceId(0x00_26_09);
/// 2.71" 264x176
pub const EPD_271: DeviceId = DeviceId(0x00_27_09);
/// 2.87" 296x128
pub const EPD_287: DeviceId = DeviceId(0x00_28_09);
/// 3.70" 416x240
pub const EPD_370: DeviceId = DeviceId(0x00_37_0C);
/// 4.17" 300x400
pub const EPD_417: DeviceId = DeviceId(0x00_41_09);
/// 4.37" 480x176
pub const EPD_437: DeviceId = DeviceId(0x00_43_0C);
/// 5.65" 600x448
pub const EPD_565: DeviceId = DeviceId(0x00_56_0B);
/// 5.81" 720x256
pub const EPD_581: DeviceId = DeviceId(0x00_58_0B);
/// 7.40" 800x480
pub const EPD_741: DeviceId = DeviceId(0x00_74_0B);
/// 9.69" 672x960, two controllers
pub const EPD_969: DeviceId = DeviceId(0x00_96_0B);
/// 11.98" 768x960, two controllers
pub const EPD_1198: DeviceId = DeviceId(0x00_B9_0B);

/// Film type code that needs the extra DCTL frame before the image frames
pub(crate) const TYPE_FILM_K: u8 = 0x0B;

/// Number of colour planes, black/white plus red
pub const COLOUR_PLANES: usize = 2;

/// Packed panel identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceId(pub u32);

impl DeviceId {
    /// Feature flags byte
    pub const fn extra(self) -> u8 {
        (self.0 >> 16) as u8
    }

    /// Size code byte
    pub const fn size(self) -> u8 {
        (self.0 >> 8) as u8
    }

    /// Film type byte
    pub const fn film(self) -> u8 {
        self.0 as u8
    }

    /// Same panel with additional feature flags set
    pub const fn with_features(self, features: u8) -> DeviceId {
        DeviceId(self.0 | (features as u32) << 16)
    }
}

/// Groups of panels sharing one refresh procedure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeClass {
    /// Everything up to 4.37", driven with the short command set
    Small,
    /// 5.65", 5.81" and 7.40": COG initialisation and soft-start ramp
    Medium,
    /// 9.69" and 11.98": as medium, split over a master and a slave controller
    Large,
}

impl SizeClass {
    fn from_size_code(size: u8) -> SizeClass {
        match size {
            0x56 | 0x58 | 0x74 => SizeClass::Medium,
            0x96 | 0xB9 => SizeClass::Large,
            _ => SizeClass::Small,
        }
    }
}

// size code, width (short axis), height (long axis), diagonal in 1/100"
const GEOMETRY: [(u8, u16, u16, u16); 13] = [
    (0x15, 152, 152, 154),
    (0x21, 104, 212, 213),
    (0x26, 152, 296, 266),
    (0x27, 176, 264, 271),
    (0x28, 128, 296, 287),
    (0x37, 240, 416, 370),
    (0x41, 400, 300, 417),
    (0x43, 176, 480, 437),
    (0x56, 448, 600, 565),
    (0x58, 256, 720, 581),
    (0x74, 480, 800, 741),
    (0x96, 960, 672, 969),
    (0xB9, 960, 768, 1198),
];

/// Immutable description of a panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Profile {
    /// Identifier the profile was resolved from
    pub id: DeviceId,
    /// Refresh procedure group
    pub size_class: SizeClass,
    /// Feature flags, see [`FEATURE_FAST`] and friends
    pub extra_features: u8,
    /// Native width in pixels, the axis packed into bytes
    pub screen_width: u16,
    /// Native height in pixels, one buffer row per line
    pub screen_height: u16,
    /// Bytes per buffer row
    pub buffer_stride: usize,
    /// Bytes in one colour plane
    pub page_colour_size: usize,
    /// Bytes sent to one controller per plane
    pub frame_size: usize,
    /// Driven by a master and a slave controller
    pub is_dual_controller: bool,
    /// Diagonal in hundredths of an inch
    pub diagonal: u16,
}

impl Profile {
    /// Resolve the geometry of a panel.
    ///
    /// An unknown size code yields a profile whose geometry is all zero,
    /// see [`Profile::is_valid`].
    pub fn resolve(id: DeviceId) -> Profile {
        let (width, height, diagonal) = GEOMETRY
            .iter()
            .find(|entry| entry.0 == id.size())
            .map(|&(_, w, h, d)| (w, h, d))
            .unwrap_or((0, 0, 0));

        let size_class = SizeClass::from_size_code(id.size());
        let is_dual_controller = size_class == SizeClass::Large;

        let buffer_stride = (width as usize + 7) / 8;
        let page_colour_size = height as usize * buffer_stride;
        let frame_size = if is_dual_controller {
            page_colour_size / 2
        } else {
            page_colour_size
        };

        Profile {
            id,
            size_class,
            extra_features: id.extra(),
            screen_width: width,
            screen_height: height,
            buffer_stride,
            page_colour_size,
            frame_size,
            is_dual_controller,
            diagonal,
        }
    }

    /// False for a zero geometry profile, which must not be driven
    pub fn is_valid(&self) -> bool {
        self.page_colour_size != 0
    }

    /// Size of the whole two plane buffer in bytes
    pub fn buffer_size(&self) -> usize {
        self.page_colour_size * COLOUR_PLANES
    }

    /// Size code byte of the identifier
    pub fn size_code(&self) -> u8 {
        self.id.size()
    }

    /// Descriptive name, e.g. `iTC 2.13" -N`
    ///
    /// The tag is `S` for split (dual controller) addressing and `N` otherwise.
    pub fn identify(&self) -> String {
        let mut text = String::new();
        let tag = if self.is_dual_controller { 'S' } else { 'N' };
        // writing into a String cannot fail
        let _ = write!(
            text,
            "iTC {}.{:02}\" -{}",
            self.diagonal / 100,
            self.diagonal % 100,
            tag
        );
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [DeviceId; 13] = [
        EPD_154, EPD_213, EPD_266, EPD_271, EPD_287, EPD_370, EPD_417, EPD_437, EPD_565,
        EPD_581, EPD_741, EPD_969, EPD_1198,
    ];

    #[test]
    fn frame_size_covers_page() {
        for id in ALL {
            let p = Profile::resolve(id);
            assert!(p.is_valid());
            let controllers = if p.is_dual_controller { 2 } else { 1 };
            assert_eq!(p.frame_size * controllers, p.page_colour_size);
            assert_eq!(p.page_colour_size, p.screen_height as usize * p.buffer_stride);
        }
    }

    #[test]
    fn epd213_geometry() {
        let p = Profile::resolve(EPD_213);
        assert_eq!(p.screen_width, 104);
        assert_eq!(p.screen_height, 212);
        assert_eq!(p.buffer_stride, 13);
        assert_eq!(p.page_colour_size, 2756);
        assert_eq!(p.frame_size, 2756);
        assert_eq!(p.buffer_size(), 5512);
        assert_eq!(p.size_class, SizeClass::Small);
        assert!(!p.is_dual_controller);
    }

    #[test]
    fn epd969_geometry() {
        let p = Profile::resolve(EPD_969);
        assert_eq!(p.screen_height, 672);
        assert_eq!(p.screen_width, 960);
        assert_eq!(p.buffer_stride, 120);
        assert_eq!(p.page_colour_size, 80640);
        assert_eq!(p.frame_size, 40320);
        assert!(p.is_dual_controller);
        assert_eq!(p.size_class, SizeClass::Large);
    }

    #[test]
    fn size_classes() {
        assert_eq!(Profile::resolve(EPD_437).size_class, SizeClass::Small);
        assert_eq!(Profile::resolve(EPD_565).size_class, SizeClass::Medium);
        assert_eq!(Profile::resolve(EPD_581).size_class, SizeClass::Medium);
        assert_eq!(Profile::resolve(EPD_741).size_class, SizeClass::Medium);
        assert_eq!(Profile::resolve(EPD_1198).size_class, SizeClass::Large);
    }

    #[test]
    fn unknown_size_is_zero_geometry() {
        let p = Profile::resolve(DeviceId(0x00_99_09));
        assert!(!p.is_valid());
        assert_eq!(p.screen_width, 0);
        assert_eq!(p.screen_height, 0);
        assert_eq!(p.frame_size, 0);
    }

    #[test]
    fn identifier_fields() {
        let id = EPD_271.with_features(FEATURE_FAST | FEATURE_WIDE_TEMPERATURE);
        assert_eq!(id.extra(), 0x09);
        assert_eq!(id.size(), 0x27);
        assert_eq!(id.film(), 0x09);
        assert_eq!(Profile::resolve(id).extra_features, 0x09);
    }

    #[test]
    fn identify_strings() {
        assert_eq!(Profile::resolve(EPD_213).identify(), "iTC 2.13\" -N");
        assert_eq!(Profile::resolve(EPD_1198).identify(), "iTC 11.98\" -S");
        assert_eq!(Profile::resolve(EPD_370).identify(), "iTC 3.70\" -N");
    }
}
