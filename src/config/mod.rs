use std::env;

/// Config holds the runtime settings of one generator run
#[derive(Debug, Clone)]
pub struct Config {
    pub fabric_config: String,
    pub template_path: String,
    pub diagrams_dir: String,
    pub config_dir: String,
    pub dot_binary: String,
    pub render_svg: bool,
    pub fabric_json: Option<String>,
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn load() -> Self {
        Self {
            fabric_config: get_env("FABRIC_CONFIG", "etc/cfg.yml"),
            template_path: get_env("TEMPLATE_PATH", "templates/switch.j2"),
            diagrams_dir: get_env("DIAGRAMS_DIR", "diagrams"),
            config_dir: get_env("CONFIG_DIR", "config"),
            dot_binary: get_env("DOT_BINARY", "dot"),
            render_svg: parse_bool(&get_env("RENDER_SVG", "true")).unwrap_or(true),
            fabric_json: Some(get_env("FABRIC_JSON", "")).filter(|s| !s.is_empty()),
        }
    }
}

fn get_env(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
