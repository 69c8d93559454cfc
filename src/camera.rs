use futures::future::BoxFuture;

/// Opaque encoding of a captured selfie, typically a `data:image/jpeg;base64,...` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedPhoto(String);

impl CapturedPhoto {
    /// Returns `None` for an empty capture.
    pub fn new(encoded: impl Into<String>) -> Option<Self> {
        let encoded = encoded.into();
        if encoded.trim().is_empty() {
            None
        } else {
            Some(Self(encoded))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    User,
    Environment,
}

/// What the host camera should be asked for when capturing a selfie.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureSettings {
    pub facing: Facing,
    pub ideal_width: u32,
    pub ideal_height: u32,
    pub jpeg_quality: f32,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            facing: Facing::User,
            ideal_width: 640,
            ideal_height: 640,
            jpeg_quality: 0.8,
        }
    }
}

/// Host camera. `None` means the user backed out or the camera yielded nothing.
pub trait CameraProvider: Send + Sync {
    fn capture(&self, settings: CaptureSettings) -> BoxFuture<'_, Option<CapturedPhoto>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_capture_is_rejected() {
        assert!(CapturedPhoto::new("").is_none());
        assert!(CapturedPhoto::new("   ").is_none());
        assert_eq!(
            CapturedPhoto::new("data:image/jpeg;base64,AAAA").unwrap().as_str(),
            "data:image/jpeg;base64,AAAA"
        );
    }

    #[test]
    fn default_settings_target_front_camera() {
        let settings = CaptureSettings::default();
        assert_eq!(settings.facing, Facing::User);
        assert_eq!((settings.ideal_width, settings.ideal_height), (640, 640));
    }
}
