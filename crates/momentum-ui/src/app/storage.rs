use momentum_shared::KeyValueStore;

/// Browser `sessionStorage`. Reads and writes
/// are no-ops when the storage is unavailable
/// (private mode, sandboxed iframes).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SessionStore;

fn session_storage() -> Option<web_sys::Storage> {
  web_sys::window().and_then(|window| {
    window
      .session_storage()
      .ok()
      .flatten()
  })
}

impl KeyValueStore for SessionStore {
  fn read(&self, key: &str) -> Option<String> {
    session_storage().and_then(|storage| {
      storage
        .get_item(key)
        .ok()
        .flatten()
    })
  }

  fn write(&self, key: &str, value: &str) {
    let Some(storage) = session_storage() else {
      tracing::warn!(
        key,
        "session storage unavailable; \
         filters will not survive reload"
      );
      return;
    };

    if let Err(error) =
      storage.set_item(key, value)
    {
      tracing::error!(
        ?error,
        key,
        "failed writing session storage"
      );
    }
  }
}
