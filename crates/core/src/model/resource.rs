use url::Url;

/// A step resource, either something the OS can open or a plain pointer
/// such as "Medical Colleges".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceLink {
    Link(Url),
    Label(String),
}

impl ResourceLink {
    #[must_use]
    pub fn classify(raw: &str) -> Self {
        let trimmed = raw.trim();
        match Url::parse(trimmed) {
            Ok(url) if matches!(url.scheme(), "http" | "https") && url.host().is_some() => {
                Self::Link(url)
            }
            _ => Self::Label(trimmed.to_owned()),
        }
    }

    #[must_use]
    pub fn as_url(&self) -> Option<&Url> {
        match self {
            Self::Link(url) => Some(url),
            Self::Label(_) => None,
        }
    }

    /// Short text for a resource chip: the host for links, the text otherwise.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Link(url) => url
                .host_str()
                .map(|host| host.trim_start_matches("www.").to_owned())
                .unwrap_or_else(|| url.to_string()),
            Self::Label(text) => text.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn https_urls_are_links() {
        let link = ResourceLink::classify("https://www.freecodecamp.org/");
        assert!(link.as_url().is_some());
        assert_eq!(link.label(), "freecodecamp.org");
    }

    #[test]
    fn plain_text_is_a_label() {
        let link = ResourceLink::classify("Medical Colleges");
        assert_eq!(link, ResourceLink::Label("Medical Colleges".into()));
        assert!(link.as_url().is_none());
    }

    #[test]
    fn urls_with_spaces_in_host_are_labels() {
        let link = ResourceLink::classify("https://www.cfa institute.org/");
        assert!(link.as_url().is_none());
    }

    #[test]
    fn non_web_schemes_are_labels() {
        assert!(ResourceLink::classify("file:///etc/passwd").as_url().is_none());
        assert!(ResourceLink::classify("mailto:a@b.com").as_url().is_none());
    }
}
