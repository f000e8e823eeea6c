use std::path::PathBuf;

use envconfig::Envconfig;

#[derive(Envconfig, Clone, Debug)]
pub struct Config {
    #[envconfig(from = "BIND_HOST", default = "0.0.0.0")]
    pub host: String,

    #[envconfig(from = "PORT", default = "3000")]
    pub port: u16,

    #[envconfig(from = "STATIC_DIR", default = "public")]
    pub static_dir: PathBuf,

    #[envconfig(from = "ENABLE_METRICS", default = "false")]
    pub enable_metrics: bool,
}

impl Config {
    pub fn bind(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn default_for_test() -> Self {
        Config {
            host: "127.0.0.1".to_string(),
            port: 0,
            static_dir: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/public")),
            enable_metrics: false,
        }
    }
}
