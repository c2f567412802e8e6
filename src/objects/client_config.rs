use super::JobHandle;
use url::Url;

const MIN_POLL_INTERVAL_MS: u32 = 250;

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub api_base: String,
    pub poll_interval_ms: u32,
    pub auto_download: bool,
    pub preload_url: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: String::new(),
            poll_interval_ms: 2_000,
            auto_download: true,
            preload_url: None,
        }
    }
}

impl ClientConfig {
    /// Reads overrides from the query string of the page the client was loaded from.
    pub fn from_location(href: &str) -> Result<Self, url::ParseError> {
        let location = Url::parse(href)?;
        let mut config = Self::default();

        for (key, value) in location.query_pairs() {
            match &*key {
                "url" if !value.trim().is_empty() => {
                    config.preload_url = Some(value.trim().to_string())
                }
                "auto_download" => {
                    config.auto_download =
                        !matches!(&*value.to_lowercase(), "0" | "false" | "no" | "off")
                }
                "poll_interval_ms" => match value.parse::<u32>() {
                    Ok(ms) => config.poll_interval_ms = ms.max(MIN_POLL_INTERVAL_MS),
                    Err(_) => log::warn!("ignoring invalid poll_interval_ms: {}", value),
                },
                "api_base" => config.api_base = value.trim_end_matches('/').to_string(),
                _ => {}
            }
        }

        Ok(config)
    }

    pub fn fetch_info_url(&self) -> String {
        format!("{}/fetch_info", self.api_base)
    }

    pub fn download_url(&self) -> String {
        format!("{}/download", self.api_base)
    }

    pub fn progress_url(&self, job: &JobHandle) -> String {
        let mut path = url::form_urlencoded::byte_serialize(job.as_str().as_bytes())
            .collect::<String>();

        // form encoding turns spaces into '+', which is literal in a path
        path = path.replace('+', "%20");
        format!("{}/progress/{}", self.api_base, path)
    }
}
