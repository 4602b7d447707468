use crate::client::{DEFAULT_ENDPOINT, HttpChatClient};
use crate::error::ChatError;
use crate::page::DEFAULT_TITLE;
use crate::widget::document::DEFAULT_VIEWPORT_LINES;
use crate::widget::host::{DEFAULT_CONTAINER_ID, DEFAULT_FORM_ID, DEFAULT_INPUT_ID};
use crate::widget::{
    DEFAULT_ERROR_PREFIX, DEFAULT_FALLBACK_TEXT, DEFAULT_THINKING_TEXT, HostBindings,
    SubmitPolicy, WidgetSettings,
};
use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Prefix for environment overrides, e.g. `CHAT_WIDGET__CLIENT__BASE_URL`.
pub const ENV_PREFIX: &str = "CHAT_WIDGET";

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "chat-widget";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<String>,

    /// Base URL the chat endpoint is resolved against
    #[arg(long, env = "CHAT_SERVER_URL")]
    pub server_url: Option<String>,

    /// Chat endpoint path
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Refuse new submissions while one is pending
    #[arg(long)]
    pub single_flight: Option<bool>,

    /// Write an HTML snapshot of the conversation here on exit
    #[arg(long)]
    pub html_out: Option<PathBuf>,

    /// Log output format (pretty or json)
    #[arg(long, env = "LOG_FORMAT")]
    pub log_format: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub client: ClientConfig,
    pub widget: WidgetConfig,
    pub page: PageConfig,
    pub logging: LoggingConfig,
    /// Only settable from the command line.
    #[serde(skip)]
    pub html_out: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub endpoint: String,
    /// No timeout unless set.
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WidgetConfig {
    pub thinking_text: String,
    pub fallback_text: String,
    pub error_prefix: String,
    pub submit_policy: SubmitPolicy,
    pub viewport_lines: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PageConfig {
    pub title: String,
    pub form_id: String,
    pub input_id: String,
    pub container_id: String,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// Used when `RUST_LOG` is not set.
    pub filter: String,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from_args(std::env::args())
    }

    pub fn load_from_args<I, T>(args: I) -> Result<Self, config::ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli =
            Cli::try_parse_from(args).map_err(|e| config::ConfigError::Message(e.to_string()))?;

        let mut builder = Config::builder();

        // 1. Defaults
        builder = builder
            .set_default("client.base_url", "http://127.0.0.1:8000")?
            .set_default("client.endpoint", DEFAULT_ENDPOINT)?
            .set_default("widget.thinking_text", DEFAULT_THINKING_TEXT)?
            .set_default("widget.fallback_text", DEFAULT_FALLBACK_TEXT)?
            .set_default("widget.error_prefix", DEFAULT_ERROR_PREFIX)?
            .set_default("widget.submit_policy", "concurrent")?
            .set_default("widget.viewport_lines", DEFAULT_VIEWPORT_LINES as u64)?
            .set_default("page.title", DEFAULT_TITLE)?
            .set_default("page.form_id", DEFAULT_FORM_ID)?
            .set_default("page.input_id", DEFAULT_INPUT_ID)?
            .set_default("page.container_id", DEFAULT_CONTAINER_ID)?
            .set_default("logging.format", "pretty")?
            .set_default("logging.filter", "info")?;

        // 2. Config file: explicit path must exist, the cwd fallback may not
        builder = match &cli.config {
            Some(path) => builder.add_source(File::with_name(path).required(true)),
            None => builder.add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false)),
        };

        // 3. Environment (CHAT_WIDGET__CLIENT__BASE_URL=...)
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        // 4. CLI flags (and their clap env fallbacks) win over everything
        if let Some(url) = cli.server_url {
            builder = builder.set_override("client.base_url", url)?;
        }
        if let Some(endpoint) = cli.endpoint {
            builder = builder.set_override("client.endpoint", endpoint)?;
        }
        if let Some(single) = cli.single_flight {
            let policy = if single { "single_flight" } else { "concurrent" };
            builder = builder.set_override("widget.submit_policy", policy)?;
        }
        if let Some(format) = cli.log_format {
            builder = builder.set_override("logging.format", format.to_lowercase())?;
        }

        let cfg = builder.build()?;
        let mut app: AppConfig = cfg.try_deserialize()?;
        app.html_out = cli.html_out;
        Ok(app)
    }

    pub fn widget_settings(&self) -> WidgetSettings {
        WidgetSettings {
            thinking_text: self.widget.thinking_text.clone(),
            fallback_text: self.widget.fallback_text.clone(),
            error_prefix: self.widget.error_prefix.clone(),
            submit_policy: self.widget.submit_policy,
        }
    }

    pub fn host_bindings(&self) -> HostBindings {
        HostBindings {
            form_id: self.page.form_id.clone(),
            input_id: self.page.input_id.clone(),
            container_id: self.page.container_id.clone(),
        }
    }

    /// Build the HTTP client described by the `client` section.
    pub fn chat_client(&self) -> Result<HttpChatClient, ChatError> {
        let ClientConfig {
            base_url,
            endpoint,
            request_timeout_secs,
        } = &self.client;
        match request_timeout_secs {
            Some(secs) => {
                HttpChatClient::with_timeout(base_url, endpoint, Duration::from_secs(*secs))
            }
            None => HttpChatClient::new(base_url, endpoint),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_flags_override_defaults() {
        let config = AppConfig::load_from_args([
            "chat-widget",
            "--server-url",
            "http://example.test:9000",
            "--endpoint",
            "/api/chat",
            "--single-flight",
            "true",
            "--html-out",
            "out.html",
        ])
        .unwrap();

        assert_eq!(config.client.base_url, "http://example.test:9000");
        assert_eq!(config.client.endpoint, "/api/chat");
        assert_eq!(config.widget.submit_policy, SubmitPolicy::SingleFlight);
        assert_eq!(config.html_out, Some(PathBuf::from("out.html")));

        let client = config.chat_client().unwrap();
        assert_eq!(client.endpoint().as_str(), "http://example.test:9000/api/chat");
    }

    #[test]
    fn unknown_flag_is_a_config_error() {
        let err = AppConfig::load_from_args(["chat-widget", "--nope"]).unwrap_err();
        assert!(matches!(err, config::ConfigError::Message(_)));
    }
}
