/// Helper macro to compose `From` implementations.
macro_rules! compose_from {
    ($to:tt, $mid:ty, $from:ty) => {
        impl From<$from> for $to {
            fn from(f: $from) -> Self { Self::from(<$mid>::from(f)) }
        }
    };
}

/// Helper macro to make implementing `From` easier.
macro_rules! from_fn {
    ($to:ty, $from:ty, $fn:expr) => {
        impl From<$from> for $to {
            fn from(f: $from) -> $to { $fn(f) }
        }
    };
}

/// Implements `TryFrom<$from>` for the payload of one variant, handing the value back
/// unchanged when it holds a different variant.
macro_rules! try_from_ctor {
    ($from:ty, $to:ty, $ctor:path) => {
        impl std::convert::TryFrom<$from> for $to {
            type Error = $from;

            fn try_from(f: $from) -> Result<$to, $from> {
                match f {
                    $ctor(x) => Ok(x),
                    other => Err(other),
                }
            }
        }
    };
}
