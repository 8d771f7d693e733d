//! Per model register values of the COG driven panels

/// Register values that differ between COG models
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ModelParams {
    pub size_code: u8,
    /// Display update window
    pub duw: [u8; 6],
    /// Display refresh window
    pub drfw: [u8; 4],
    /// RAM read/write window
    pub ram_rw: [u8; 3],
    pub oscillator: [u8; 2],
    pub ms_sync: u8,
    pub stv_direction: u8,
}

const MODELS: [ModelParams; 5] = [
    ModelParams {
        size_code: 0x56,
        duw: [0x00, 0x37, 0x00, 0x00, 0x57, 0x02],
        drfw: [0x00, 0x37, 0x00, 0x97],
        ram_rw: [0x37, 0x00, 0x14],
        oscillator: [0x00, 0x02],
        ms_sync: 0x00,
        stv_direction: 0x01,
    },
    ModelParams {
        size_code: 0x58,
        duw: [0x00, 0x1F, 0x50, 0x00, 0x1F, 0x03],
        drfw: [0x00, 0x1F, 0x00, 0xC9],
        ram_rw: [0x1F, 0x50, 0x14],
        oscillator: [0x00, 0x01],
        ms_sync: 0x00,
        stv_direction: 0x00,
    },
    ModelParams {
        size_code: 0x74,
        duw: [0x00, 0x3B, 0x00, 0x00, 0x1F, 0x03],
        drfw: [0x00, 0x3B, 0x00, 0xC9],
        ram_rw: [0x3B, 0x00, 0x14],
        oscillator: [0x00, 0x01],
        ms_sync: 0x00,
        stv_direction: 0x00,
    },
    ModelParams {
        size_code: 0x96,
        duw: [0x00, 0x3B, 0x00, 0x00, 0x9F, 0x02],
        drfw: [0x00, 0x3B, 0x00, 0xA9],
        ram_rw: [0x3B, 0x00, 0x14],
        oscillator: [0x00, 0x11],
        ms_sync: 0x80,
        stv_direction: 0x01,
    },
    ModelParams {
        size_code: 0xB9,
        duw: [0x00, 0x3B, 0x00, 0x00, 0x1F, 0x03],
        drfw: [0x00, 0x3B, 0x00, 0xC9],
        ram_rw: [0x3B, 0x00, 0x14],
        oscillator: [0x00, 0x12],
        ms_sync: 0x80,
        stv_direction: 0x01,
    },
];

impl ModelParams {
    pub fn lookup(size_code: u8) -> Option<ModelParams> {
        MODELS.iter().copied().find(|m| m.size_code == size_code)
    }
}
