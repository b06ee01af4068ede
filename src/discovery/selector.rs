use crate::error::{AppError, AppResult};
use crate::port::DeviceHandle;

/// Pick the first discovered device.
pub fn select(handles: &[DeviceHandle]) -> AppResult<DeviceHandle> {
    handles.first().cloned().ok_or(AppError::NoDevice)
}
