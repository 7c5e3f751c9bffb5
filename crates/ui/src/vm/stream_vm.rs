use roadmap_core::model::Stream;
use services::StreamSelector;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StreamOptionVm {
    pub stream: Stream,
    pub title: &'static str,
    pub tagline: &'static str,
    pub selected: bool,
}

#[must_use]
pub fn map_stream_options(selector: &StreamSelector) -> Vec<StreamOptionVm> {
    Stream::ALL
        .into_iter()
        .map(|stream| StreamOptionVm {
            stream,
            title: stream.as_str(),
            tagline: stream.tagline(),
            selected: selector.is_selected(stream),
        })
        .collect()
}
