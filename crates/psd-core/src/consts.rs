//! Constants of the PSD/PSB container

/// File signature, `8BPS`
pub const PSD_SIGNATURE: [u8; 4] = *b"8BPS";

/// Signature used by image resources and most tagged blocks
pub const RESOURCE_SIGNATURE: [u8; 4] = *b"8BIM";

/// Alternate tagged block signature written by some PSB producers
pub const RESOURCE_SIGNATURE_64: [u8; 4] = *b"8B64";

/// Maximum width/height of a PSD document
pub const PSD_MAX_DIMENSION: u32 = 30_000;

/// Maximum width/height of a PSB document
pub const PSB_MAX_DIMENSION: u32 = 300_000;

/// Channel count bounds of the file header
pub const MIN_CHANNELS: u16 = 1;
pub const MAX_CHANNELS: u16 = 56;

/// Size of the fixed file header in bytes
pub const HEADER_SIZE: usize = 26;

/// Image resource id of the embedded ICC profile
pub const RESOURCE_ICC_PROFILE: u16 = 1039;

/// Mask default color Photoshop assumes when a layer has no mask
pub const DEFAULT_MASK_COLOR: u8 = 0;
