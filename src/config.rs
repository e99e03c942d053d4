#[derive(Debug, Clone)]
pub struct CoreConfig {
    pub api_addr: String,
    pub cors_origin: String,
    pub noise_scale: f32,
    pub log_requests: bool,
}

impl CoreConfig {
    pub fn from_env() -> Self {
        let api_addr = std::env::var("VOLTGUARD_API_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8000".to_string());

        let cors_origin = std::env::var("VOLTGUARD_CORS_ORIGIN")
            .unwrap_or_else(|_| "*".to_string())
            .trim()
            .to_string();

        let noise_scale = std::env::var("VOLTGUARD_NOISE_SCALE")
            .ok()
            .and_then(|value| value.parse::<f32>().ok())
            .map(clamp_noise_scale)
            .unwrap_or(0.1);

        let log_requests = parse_bool_env("VOLTGUARD_LOG_REQUESTS", false);

        CoreConfig {
            api_addr,
            cors_origin,
            noise_scale,
            log_requests,
        }
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        CoreConfig {
            api_addr: "127.0.0.1:8000".to_string(),
            cors_origin: "*".to_string(),
            noise_scale: 0.1,
            log_requests: false,
        }
    }
}

fn parse_bool_env(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|value| matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(default)
}

fn clamp_noise_scale(value: f32) -> f32 {
    if !value.is_finite() || value < 0.0 {
        0.1
    } else if value > 1.0 {
        1.0
    } else {
        value
    }
}
