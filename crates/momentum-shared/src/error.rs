use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
  #[error("network error: {0}")]
  Transport(String),

  #[error("{}", status_message(*status, message.as_deref()))]
  Status {
    status:  u16,
    message: Option<String>
  },

  #[error("malformed response (HTTP {status}): {source}")]
  Decode {
    status: u16,
    #[source]
    source: serde_json::Error
  },

  #[error("could not encode request: {0}")]
  Encode(String)
}

impl ApiError {
  pub fn status(&self) -> Option<u16> {
    match self {
      | Self::Status { status, .. }
      | Self::Decode { status, .. } => {
        Some(*status)
      }
      | Self::Transport(_)
      | Self::Encode(_) => None
    }
  }

  pub fn is_not_found(&self) -> bool {
    self.status() == Some(404)
  }
}

fn status_message(
  status: u16,
  message: Option<&str>
) -> String {
  match message {
    | Some(message) => format!(
      "request failed (HTTP {status}): {message}"
    ),
    | None => {
      format!("request failed (HTTP {status})")
    }
  }
}

pub fn is_success(status: u16) -> bool {
  (200..300).contains(&status)
}

/// Turns a raw HTTP exchange into a typed
/// value. Non-2xx responses become
/// `ApiError::Status`, carrying the server's
/// `message` when the body has one.
pub fn decode_response<T>(
  status: u16,
  body: &str
) -> Result<T, ApiError>
where
  T: DeserializeOwned
{
  if !is_success(status) {
    return Err(ApiError::Status {
      status,
      message: server_message(body)
    });
  }

  serde_json::from_str(body).map_err(
    |source| ApiError::Decode { status, source }
  )
}

fn server_message(
  body: &str
) -> Option<String> {
  let value: serde_json::Value =
    serde_json::from_str(body).ok()?;
  let message = value
    .get("message")
    .or_else(|| value.get("error"))?
    .as_str()?
    .trim();
  if message.is_empty() {
    None
  } else {
    Some(message.to_string())
  }
}
