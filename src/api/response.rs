use super::Error;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

pub const SUCCESS: &str = "Success";
pub const MAXIMUM_REQUESTS_REACHED: &str = "The maximum number of requests has been reached";

/// Every response is wrapped in `{"msg": ..., "data": ...}`.
///
/// The body is first read into [`Value`] so it can be traced as-is, then parsed
/// into the envelope and finally `data` into the caller's type.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    /// Informational only: `msg` alone decides whether a call succeeded.
    #[serde(default)]
    pub code: Option<i64>,
    pub msg: String,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn is_success(&self) -> bool {
        self.msg == SUCCESS
    }

    fn describe(&self) -> String {
        match self.code {
            Some(code) => format!("{} ({})", self.msg, code),
            None => self.msg.clone(),
        }
    }

    /// Validate the envelope. A non-`Success` message is an error, and
    /// the maximum-requests message is recognised as [`Error::RateExceeded`].
    /// Missing `data` is left for the caller to judge.
    pub fn into_data(self) -> Result<Option<T>, Error> {
        if self.is_success() {
            Ok(self.data)
        } else if self.msg == MAXIMUM_REQUESTS_REACHED {
            Err(Error::RateExceeded(self.describe()))
        } else {
            Err(Error::ApiError(self.describe()))
        }
    }
}

/// Parse a raw response body into the `data` of a validated envelope.
///
/// `msg` is checked before `data` is typed, so a failed call is classified by
/// its message whatever shape its `data` has.
pub fn parse<T: DeserializeOwned>(value: Value) -> Result<Option<T>, Error> {
    let data = serde_json::from_value::<Envelope<Value>>(value.clone())
        .map_err(|e| Error::InvalidResponse(e.to_string(), value.to_string()))?
        .into_data()?;

    data.map(|data| {
        serde_json::from_value::<T>(data)
            .map_err(|e| Error::InvalidResponse(e.to_string(), value.to_string()))
    })
    .transpose()
}
