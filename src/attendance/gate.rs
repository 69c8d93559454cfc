/// Inputs that decide whether the submit control is enabled. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Gate {
    pub location_known: bool,
    pub location_loading: bool,
    pub submitting: bool,
    pub checked_in: bool,
    pub photo_captured: bool,
}

/// First unmet precondition, reported as guidance rather than a fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitBlocked {
    Busy,
    LocationLoading,
    LocationUnavailable,
    PhotoRequired,
}

impl SubmitBlocked {
    pub fn advisory(self) -> &'static str {
        match self {
            SubmitBlocked::Busy => "A submission is already in progress.",
            SubmitBlocked::LocationLoading => "Locating your device, please wait.",
            SubmitBlocked::LocationUnavailable => {
                "Location is unavailable. Tap retry to locate your device again."
            }
            SubmitBlocked::PhotoRequired => "Please take a selfie to verify your identity.",
        }
    }
}

impl Gate {
    /// Checking out waives the photo requirement; checking in does not.
    pub fn can_submit(&self) -> bool {
        self.location_known
            && !self.location_loading
            && !self.submitting
            && (self.checked_in || self.photo_captured)
    }

    pub fn blocker(&self) -> Option<SubmitBlocked> {
        if self.submitting {
            Some(SubmitBlocked::Busy)
        } else if self.location_loading {
            Some(SubmitBlocked::LocationLoading)
        } else if !self.location_known {
            Some(SubmitBlocked::LocationUnavailable)
        } else if !self.checked_in && !self.photo_captured {
            Some(SubmitBlocked::PhotoRequired)
        } else {
            None
        }
    }
}
