use crate::types::ClassifiedUrl;
use tracing::debug;
use url::Url;

const YOUTUBE_HOSTS: [&str; 3] = ["youtube.com", "www.youtube.com", "m.youtube.com"];
const SHORT_LINK_HOST: &str = "youtu.be";

/// Decide whether `raw` points at a YouTube video or a generic web page.
///
/// Never fails: anything that does not parse as an absolute URL is a web
/// resource. A YouTube host whose video id cannot be read is still reported as
/// YouTube, with no id.
pub fn classify(raw: &str) -> ClassifiedUrl {
    let parsed = match Url::parse(raw.trim()) {
        Ok(parsed) => parsed,
        Err(e) => {
            debug!("Treating unparseable URL as web resource ({}): {}", e, raw);
            return ClassifiedUrl::web();
        }
    };

    let host = match parsed.host_str() {
        Some(host) => host.to_ascii_lowercase(),
        None => return ClassifiedUrl::web(),
    };

    if host == SHORT_LINK_HOST {
        return ClassifiedUrl::youtube(first_segment(&parsed));
    }

    if YOUTUBE_HOSTS.contains(&host.as_str()) {
        return ClassifiedUrl::youtube(youtube_video_id(&parsed));
    }

    ClassifiedUrl::web()
}

fn youtube_video_id(url: &Url) -> Option<String> {
    let mut segments = url.path_segments()?.filter(|s| !s.is_empty());
    match (segments.next()?, segments.next()) {
        ("watch", None) => url
            .query_pairs()
            .find(|(key, _)| key == "v")
            .map(|(_, value)| value.into_owned())
            .filter(|id| !id.is_empty()),
        ("shorts", Some(id)) => Some(id.to_string()),
        _ => None,
    }
}

fn first_segment(url: &Url) -> Option<String> {
    url.path_segments()?
        .next()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
