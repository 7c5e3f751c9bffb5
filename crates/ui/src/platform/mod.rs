use std::sync::Arc;

use roadmap_core::model::ResourceLink;
use services::ResourceOpenError;

mod desktop;

pub use desktop::DesktopLinkOpener;

/// Hands web links to whatever the platform uses to open them.
pub trait LinkOpener: Send + Sync {
    /// # Errors
    ///
    /// Returns `ResourceOpenError::Launch` if the platform refused the link.
    fn open_url(&self, url: &str) -> Result<(), ResourceOpenError>;
}

pub type LinkOpenerRef = Arc<dyn LinkOpener>;

/// Open a step resource. Plain labels have nothing to open.
///
/// # Errors
///
/// Returns `ResourceOpenError::NotALink` for labels and whatever the opener
/// reports for links.
pub fn open_resource(
    opener: &dyn LinkOpener,
    resource: &ResourceLink,
) -> Result<(), ResourceOpenError> {
    match resource {
        ResourceLink::Link(url) => opener.open_url(url.as_str()),
        ResourceLink::Label(text) => Err(ResourceOpenError::NotALink(text.clone())),
    }
}


#[cfg(test)]
mod tests {
    use super::testing::RecordingLinkOpener;
    use super::*;

    #[test]
    fn links_are_handed_to_the_opener() {
        let opener = RecordingLinkOpener::default();
        let link = ResourceLink::classify("https://www.icai.org/");
        open_resource(&opener, &link).unwrap();
        assert_eq!(*opener.opened.lock().unwrap(), vec!["https://www.icai.org/".to_string()]);
    }

    #[test]
    fn labels_cannot_be_opened() {
        let opener = RecordingLinkOpener::default();
        let err = open_resource(&opener, &ResourceLink::classify("Medical Colleges")).unwrap_err();
        assert_eq!(err.user_message(), "Couldn't open this resource.");
        assert!(opener.opened.lock().unwrap().is_empty());
    }

    #[test]
    fn opener_failures_are_reported() {
        let opener = RecordingLinkOpener {
            fail: true,
            ..RecordingLinkOpener::default()
        };
        let link = ResourceLink::classify("https://nptel.ac.in/");
        assert!(matches!(
            open_resource(&opener, &link),
            Err(ResourceOpenError::Launch { .. })
        ));
    }
}
