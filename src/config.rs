use validator::Validate;

#[derive(Deserialize, Debug, Validate)]
pub struct Config {
    database_url: String,
    api_host: Option<String>,
    api_port: Option<usize>,
    /// signs the identity cookie
    #[validate(length(min = 32))]
    session_private_key: String,
    /// the only origin allowed to make cross-origin requests, none when unset
    allowed_origin: Option<String>,
    sentry_dsn: Option<String>,
    /// defaults to localhost, which shouldn't cause issues if you're using udp
    opentelemetry_endpoint: Option<String>,
}

lazy_static! {
    static ref CONFIG: Config = match envy::from_env::<Config>() {
        Ok(config) => {
            match config.validate() {
                Ok(()) => config,
                Err(e) => panic!("invalid environment variable: {}", e),
            }
        }
        Err(error) => panic!("Missing or incorrect environment variable: {}", error),
    };
}

impl Config {
    /// load and validate the configuration, panics when it's invalid
    pub fn init() {
        lazy_static::initialize(&CONFIG);
    }

    pub fn database_url() -> &'static str {
        CONFIG.database_url.as_ref()
    }

    pub fn api_host() -> &'static str {
        match &CONFIG.api_host {
            Some(host) => host.as_ref(),
            None => "localhost",
        }
    }

    pub fn api_port() -> usize {
        CONFIG.api_port.unwrap_or(8080)
    }

    pub fn session_private_key() -> &'static str {
        CONFIG.session_private_key.as_ref()
    }

    pub fn allowed_origin() -> Option<&'static str> {
        CONFIG.allowed_origin.as_ref().map(|origin| origin.as_ref())
    }

    pub fn sentry_dsn() -> Option<&'static str> {
        CONFIG.sentry_dsn.as_ref().map(|dsn| dsn.as_ref())
    }

    pub fn opentelemetry_endpoint() -> &'static str {
        match &CONFIG.opentelemetry_endpoint {
            Some(endpoint) => endpoint.as_ref(),
            None => "127.0.0.1:6831",
        }
    }
}
