//! Image normalization: turns an arbitrary decoded photo into the fixed-size,
//! fixed-format pixel buffer a classifier expects.

pub mod buffer;
pub mod config;
pub mod context;
pub mod error;
pub mod layout;
pub mod normalize;
pub mod source;
pub mod tensor;

pub use buffer::{BaseAddressLock, ModelInputBuffer};
pub use config::DEFAULT_INPUT_SIZE;
pub use context::{BitmapContext, Origin};
pub use error::AllocationError;
pub use layout::{InputSpec, PixelFormat};
pub use normalize::{Normalizer, normalize};
pub use source::SourceImage;
pub use tensor::{IMAGENET_MEAN, IMAGENET_STD};
