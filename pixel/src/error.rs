/// Errors from pixel packing, conversion and resampling.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum PixelError {
    #[error("invalid parameters: {0}")]
    InvalidParameters(&'static str),

    #[error("no pixel format with ordinal {0}")]
    InvalidFormat(u32),

    #[error("{operation} {format} not implemented")]
    NotImplemented {
        operation: &'static str,
        format: &'static str,
    },

    #[error("buffer too small: need {needed} bytes, got {actual}")]
    BufferTooSmall { needed: usize, actual: usize },
}

impl PixelError {
    pub(crate) fn not_implemented(operation: &'static str, format: crate::PixelFormat) -> Self {
        PixelError::NotImplemented {
            operation,
            format: format.name(),
        }
    }

    pub(crate) fn check_len(needed: usize, actual: usize) -> Result<(), Self> {
        if actual < needed {
            Err(PixelError::BufferTooSmall { needed, actual })
        } else {
            Ok(())
        }
    }
}
