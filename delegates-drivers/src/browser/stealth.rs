use super::fingerprint::UserAgentProfile;
use delegates_common::StealthLevel;

/// Construct Chrome command-line arguments for a given stealth level
/// and fingerprint.
pub fn build_stealth_arguments(level: StealthLevel, profile: &UserAgentProfile) -> Vec<String> {
    let mut args = vec![
        "--no-sandbox".to_string(),
        "--disable-dev-shm-usage".to_string(),
        "--disable-blink-features=AutomationControlled".to_string(),
        "--disable-infobars".to_string(),
    ];
    if level == StealthLevel::Lightweight {
        return args;
    }

    args.extend([
        "--disable-extensions".to_string(),
        "--disable-plugins-discovery".to_string(),
        format!("--user-agent={}", profile.user_agent),
        format!("--window-size={},{}", profile.viewport.0, profile.viewport.1),
        format!("--lang={}", profile.languages.join(",")),
    ]);
    if level == StealthLevel::Maximum {
        args.push("--disable-gpu".to_string());
    }
    args
}

/// JavaScript evasions applied after navigation to reduce automation signals.
pub struct StealthScripts;

impl StealthScripts {
    pub fn core_evasions() -> &'static str {
        r#"
            Object.defineProperty(navigator, 'webdriver', { get: () => undefined });
            Object.defineProperty(navigator, 'plugins', { get: () => [1,2,3] });
            Object.defineProperty(navigator, 'languages', {
                get: () => ['en-US', 'en']
            });
            if (!window.chrome) window.chrome = { runtime: {} };
        "#
    }

    pub fn webgl_evasions() -> &'static str {
        r#"
            const getParameter = WebGLRenderingContext.prototype.getParameter;
            WebGLRenderingContext.prototype.getParameter = function(parameter) {
                if (parameter === 37445) return 'Intel Inc.';
                if (parameter === 37446) return 'Intel Iris OpenGL Engine';
                return getParameter.call(this, parameter);
            };
        "#
    }

    /// Scripts to run for `level`, in order.
    pub fn for_level(level: StealthLevel) -> Vec<&'static str> {
        match level {
            StealthLevel::Lightweight => vec![],
            StealthLevel::Balanced => vec![Self::core_evasions()],
            StealthLevel::Maximum => vec![Self::core_evasions(), Self::webgl_evasions()],
        }
    }
}
