/// Input resolution of the bundled ResNet-50 classifier.
pub const DEFAULT_INPUT_SIZE: (u32, u32) = (224, 224);

/// Row alignment of allocated pixel buffers, in bytes.
pub const ROW_ALIGNMENT: usize = 64;
