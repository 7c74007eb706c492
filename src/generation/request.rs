use crate::config::ServiceConfig;

/// Composes image-service addresses of the form
/// `<base>/prompt/<encoded prompt>?width=..&height=..&seed=..&nologo=true`.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    base_url: String,
}

impl RequestBuilder {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &ServiceConfig) -> Self {
        Self::new(config.base_url.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Pure: the same arguments always produce the same address. `model` and
    /// `enhance` only appear when set.
    pub fn build(
        &self,
        prompt: &str,
        width: u32,
        height: u32,
        seed: u32,
        model: Option<&str>,
        enhance: bool,
    ) -> String {
        let mut address = format!(
            "{}/prompt/{}?width={}&height={}&seed={}&nologo=true",
            self.base_url,
            urlencoding::encode(prompt),
            width,
            height,
            seed
        );

        if let Some(model) = model.filter(|m| !m.is_empty()) {
            address.push_str("&model=");
            address.push_str(&urlencoding::encode(model));
        }
        if enhance {
            address.push_str("&enhance=true");
        }

        address
    }
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::from_config(&ServiceConfig::default())
    }
}
