//! Remote response envelopes.
//!
//! Every registry endpoint answers with `{success, message?, data?}`. The
//! envelope is decoded into an explicit tagged type up front so callers
//! branch on the tag instead of probing optional fields.

use serde::{Deserialize, Deserializer};

/// Decoded registry response envelope.
///
/// Failure envelopes may still carry data: the upload route reports per-item
/// rejection reasons there.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Envelope<T> {
    Success {
        data: Option<T>,
    },
    Failure {
        message: Option<String>,
        data: Option<T>,
    },
}

#[derive(Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct RawEnvelope<T> {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<T>,
}

impl<'de, T> Deserialize<'de> for Envelope<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawEnvelope::<T>::deserialize(deserializer)?;
        Ok(if raw.success {
            Envelope::Success { data: raw.data }
        } else {
            Envelope::Failure {
                message: raw.message,
                data: raw.data,
            }
        })
    }
}
