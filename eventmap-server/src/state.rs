use eventmap_core::host::HostHandle;

use crate::routes::AppError;
use crate::surface::SharedMap;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    // None when the map failed to initialize; only read-only routes work then
    host: Option<HostHandle>,
    map: SharedMap,
}

impl AppState {
    pub fn new(host: Option<HostHandle>, map: SharedMap) -> Self {
        AppState { host, map }
    }

    pub fn host(&self) -> Result<&HostHandle, AppError> {
        self.host.as_ref().ok_or_else(|| {
            let message = self
                .map
                .read()
                .error()
                .unwrap_or("Map is not running")
                .to_string();
            AppError::unavailable(message)
        })
    }

    pub fn map(&self) -> &SharedMap {
        &self.map
    }
}
