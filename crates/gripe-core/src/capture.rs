//! Camera capture surface. The camera itself is an external
//! collaborator behind the `CameraDevice`/`CameraStream` seam; this
//! module owns the acquisition contract and the JPEG encoding of a
//! captured frame.
//!
//! The acquisition contract: an acquired stream is released on every
//! exit path. `CaptureSession` enforces it through ownership: explicit
//! close, successful capture, and plain drop all release the stream.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use tracing::debug;

use gripe_types::data_url;

use crate::error::CaptureError;

/// Fixed JPEG quality for captured frames (0-100 scale).
const JPEG_QUALITY: u8 = 80;

/// One uncompressed frame, RGB8 row-major.
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// A camera that can hand out a rear-facing video stream, no audio.
/// A permission denial surfaces as `CaptureError::PermissionDenied`.
pub trait CameraDevice {
    fn open(&self) -> Result<Box<dyn CameraStream>, CaptureError>;
}

pub trait CameraStream: Send {
    fn grab(&mut self) -> Result<Frame, CaptureError>;
    fn release(&mut self);
}

/// A capture ready to be stored: the encoded payload plus the generated
/// file name (`photo_{unix_millis}.jpg`).
pub struct CapturedPhoto {
    pub filename: String,
    pub data_url: String,
}

pub struct CaptureSession {
    stream: Option<Box<dyn CameraStream>>,
}

impl CaptureSession {
    pub fn start(device: &dyn CameraDevice) -> Result<Self, CaptureError> {
        let stream = device.open()?;
        debug!("Camera stream acquired");
        Ok(Self {
            stream: Some(stream),
        })
    }

    /// Grab one frame, release the stream, encode the frame as a JPEG
    /// data URL. Consumes the session: a successful capture ends it.
    pub fn capture(mut self) -> Result<CapturedPhoto, CaptureError> {
        let stream = self.stream.as_mut().ok_or(CaptureError::StreamEnded)?;
        let frame = stream.grab()?;
        self.release_stream();

        encode_frame(&frame)
    }

    /// Explicit close without capturing.
    pub fn close(mut self) {
        self.release_stream();
    }

    fn release_stream(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.release();
            debug!("Camera stream released");
        }
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        self.release_stream();
    }
}

fn encode_frame(frame: &Frame) -> Result<CapturedPhoto, CaptureError> {
    let buffer =
        image::RgbImage::from_raw(frame.width, frame.height, frame.pixels.clone())
            .ok_or(CaptureError::BadFrame)?;

    let mut jpeg = Vec::new();
    let mut encoder =
        image::codecs::jpeg::JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY);
    encoder.encode_image(&buffer)?;

    Ok(CapturedPhoto {
        filename: format!("photo_{}.jpg", Utc::now().timestamp_millis()),
        data_url: data_url::encode("image/jpeg", &jpeg),
    })
}

/// Deterministic camera double: serves gradient frames and records
/// whether its stream was released.
pub struct MockCamera {
    width: u32,
    height: u32,
    deny: bool,
    released: Arc<AtomicBool>,
}

impl MockCamera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            deny: false,
            released: Arc::new(AtomicBool::new(false)),
        }
    }

    /// A camera whose permission prompt was declined.
    pub fn denied() -> Self {
        Self {
            width: 0,
            height: 0,
            deny: true,
            released: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Shared flag set once the stream from this camera is released.
    pub fn release_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.released)
    }
}

impl CameraDevice for MockCamera {
    fn open(&self) -> Result<Box<dyn CameraStream>, CaptureError> {
        if self.deny {
            return Err(CaptureError::PermissionDenied);
        }
        self.released.store(false, Ordering::SeqCst);
        Ok(Box::new(MockStream {
            width: self.width,
            height: self.height,
            released: Arc::clone(&self.released),
        }))
    }
}

struct MockStream {
    width: u32,
    height: u32,
    released: Arc<AtomicBool>,
}

impl CameraStream for MockStream {
    fn grab(&mut self) -> Result<Frame, CaptureError> {
        if self.released.load(Ordering::SeqCst) {
            return Err(CaptureError::StreamEnded);
        }

        let mut pixels = Vec::with_capacity((self.width * self.height * 3) as usize);
        for y in 0..self.height {
            for x in 0..self.width {
                pixels.push((x % 256) as u8);
                pixels.push((y % 256) as u8);
                pixels.push(((x + y) % 256) as u8);
            }
        }

        Ok(Frame {
            width: self.width,
            height: self.height,
            pixels,
        })
    }

    fn release(&mut self) {
        self.released.store(true, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_encodes_a_jpeg_data_url_and_releases_the_stream() {
        let camera = MockCamera::new(32, 24);
        let released = camera.release_flag();

        let session = CaptureSession::start(&camera).unwrap();
        assert!(!released.load(Ordering::SeqCst));

        let captured = session.capture().unwrap();
        assert!(released.load(Ordering::SeqCst));
        assert!(captured.filename.starts_with("photo_"));
        assert!(captured.filename.ends_with(".jpg"));

        // The payload must be a decodable JPEG of the grabbed size.
        let decoded = data_url::decode(&captured.data_url).unwrap();
        assert_eq!(decoded.mime, "image/jpeg");
        let img = image::load_from_memory(&decoded.bytes).unwrap();
        assert_eq!((img.width(), img.height()), (32, 24));
    }

    #[test]
    fn close_releases_the_stream() {
        let camera = MockCamera::new(8, 8);
        let released = camera.release_flag();

        let session = CaptureSession::start(&camera).unwrap();
        session.close();
        assert!(released.load(Ordering::SeqCst));
    }

    #[test]
    fn drop_releases_the_stream() {
        let camera = MockCamera::new(8, 8);
        let released = camera.release_flag();

        {
            let _session = CaptureSession::start(&camera).unwrap();
        }
        assert!(released.load(Ordering::SeqCst));
    }

    #[test]
    fn denied_permission_surfaces_before_any_stream_exists() {
        let camera = MockCamera::denied();
        match CaptureSession::start(&camera) {
            Err(CaptureError::PermissionDenied) => {}
            Ok(_) => panic!("denied camera must not open"),
            Err(other) => panic!("expected PermissionDenied, got {other:?}"),
        }
    }
}
