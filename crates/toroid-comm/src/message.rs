//! Messages carried between workers.

use toroid_core::{Cell, Request, Startup, WorkerId};

use crate::error::CommError;

/// Which call a message belongs to.
///
/// Receives match on `(source, tag)`, so a collective and an exchange
/// from the same peer never consume each other's messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tag {
    /// Point-to-point exchange.
    Exchange,
    /// One-to-all broadcast.
    Broadcast,
    /// One-to-all scatter.
    Scatter,
    /// All-to-one gather.
    Gather,
}

/// The value inside a message.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Payload {
    /// A bare scalar: cell values, coefficients, accumulators.
    Scalar(f64),
    /// A cell with its kind, for the initial scatter.
    Cell(Cell),
    /// The startup header or abort signal.
    Startup(Startup),
    /// One step of the query loop.
    Request(Request),
}

impl Payload {
    /// Short name used in mismatch errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "scalar",
            Self::Cell(_) => "cell",
            Self::Startup(_) => "startup",
            Self::Request(_) => "request",
        }
    }
}

/// A message in flight.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Envelope {
    pub source: WorkerId,
    pub tag: Tag,
    pub payload: Payload,
}

/// Types that can travel in a [`Payload`].
pub trait Wire: Clone + Send + 'static {
    /// Payload kind name, matching [`Payload::kind`].
    const KIND: &'static str;

    /// Wrap the value for sending.
    fn into_payload(self) -> Payload;

    /// Unwrap a received payload, rejecting other kinds.
    fn from_payload(payload: Payload) -> Result<Self, CommError>;
}

macro_rules! impl_wire {
    ($ty:ty, $variant:ident, $kind:literal) => {
        impl Wire for $ty {
            const KIND: &'static str = $kind;

            fn into_payload(self) -> Payload {
                Payload::$variant(self)
            }

            fn from_payload(payload: Payload) -> Result<Self, CommError> {
                match payload {
                    Payload::$variant(v) => Ok(v),
                    other => Err(CommError::PayloadMismatch {
                        expected: Self::KIND,
                        found: other.kind(),
                    }),
                }
            }
        }
    };
}

impl_wire!(f64, Scalar, "scalar");
impl_wire!(Cell, Cell, "cell");
impl_wire!(Startup, Startup, "startup");
impl_wire!(Request, Request, "request");

#[cfg(test)]
mod tests {
    use super::*;
    use toroid_core::Coord;

    #[test]
    fn scalar_unwraps() {
        assert_eq!(f64::from_payload(2.5f64.into_payload()), Ok(2.5));
    }

    #[test]
    fn mismatched_kind_is_rejected() {
        let payload = Request::Get {
            target: Coord::new(0, 0),
        }
        .into_payload();
        assert_eq!(
            f64::from_payload(payload),
            Err(CommError::PayloadMismatch {
                expected: "scalar",
                found: "request"
            })
        );
    }

    #[test]
    fn kinds_agree() {
        assert_eq!(Cell::free(1.0).into_payload().kind(), Cell::KIND);
        assert_eq!(Startup::Abort.into_payload().kind(), Startup::KIND);
        assert_eq!(Request::Stop.into_payload().kind(), Request::KIND);
        assert_eq!(0.0f64.into_payload().kind(), f64::KIND);
    }
}
