//! Windows named file mapping as a link source.

use std::io;

use gw2link_core::link::layout;
use gw2link_core::{ByteSource, SourceError};
use windows_sys::Win32::Foundation::{CloseHandle, HANDLE};
use windows_sys::Win32::System::Memory::{
    FILE_MAP_READ, MEMORY_MAPPED_VIEW_ADDRESS, MapViewOfFile, OpenFileMappingW, UnmapViewOfFile,
};

/// Read-only view of the mapping the game client creates.
pub struct SharedMemorySource {
    mapping: HANDLE,
    view: MEMORY_MAPPED_VIEW_ADDRESS,
}

impl SharedMemorySource {
    pub fn open(name: &str) -> Result<Self, SourceError> {
        let wide: Vec<u16> = name.encode_utf16().chain(std::iter::once(0)).collect();
        // SAFETY: `wide` is NUL-terminated and outlives the call.
        let mapping = unsafe { OpenFileMappingW(FILE_MAP_READ, 0, wide.as_ptr()) };
        if mapping.is_null() {
            return Err(SourceError::SharedMemory {
                context: "OpenFileMappingW",
                message: io::Error::last_os_error().to_string(),
            });
        }

        // SAFETY: `mapping` is a valid handle returned above.
        let view = unsafe { MapViewOfFile(mapping, FILE_MAP_READ, 0, 0, layout::SEGMENT_SIZE) };
        if view.Value.is_null() {
            let message = io::Error::last_os_error().to_string();
            // SAFETY: `mapping` is valid and not used after this point.
            unsafe { CloseHandle(mapping) };
            return Err(SourceError::SharedMemory {
                context: "MapViewOfFile",
                message,
            });
        }

        log::debug!("mapped shared memory '{}'", name);
        Ok(Self { mapping, view })
    }
}

impl ByteSource for SharedMemorySource {
    fn read_region(&mut self, len: usize) -> Result<Vec<u8>, SourceError> {
        let len = len.min(layout::SEGMENT_SIZE);
        let mut buffer = vec![0u8; len];
        // SAFETY: the view covers SEGMENT_SIZE readable bytes for the lifetime
        // of `self`. The writer may change them during the copy; torn reads are
        // handled by the caller.
        unsafe {
            std::ptr::copy_nonoverlapping(
                self.view.Value as *const u8,
                buffer.as_mut_ptr(),
                len,
            );
        }
        Ok(buffer)
    }
}

impl Drop for SharedMemorySource {
    fn drop(&mut self) {
        // SAFETY: both were obtained in `open` and are released exactly once.
        unsafe {
            UnmapViewOfFile(self.view);
            CloseHandle(self.mapping);
        }
    }
}
