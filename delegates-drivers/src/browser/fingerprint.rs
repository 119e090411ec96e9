use rand::Rng;
use serde::{Deserialize, Serialize};

/// Snapshot of user agent, viewport, and locale characteristics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAgentProfile {
    pub user_agent: String,
    pub viewport: (u32, u32),
    pub platform: String,
    pub languages: Vec<String>,
}

/// Plausible desktop Chrome profiles.
pub fn desktop_profiles() -> Vec<UserAgentProfile> {
    vec![
        UserAgentProfile {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36".to_string(),
            viewport: (1920, 1080),
            platform: "Win32".to_string(),
            languages: vec!["en-US".to_string(), "en".to_string()],
        },
        UserAgentProfile {
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36".to_string(),
            viewport: (1440, 900),
            platform: "MacIntel".to_string(),
            languages: vec!["en-US".to_string(), "en".to_string()],
        },
    ]
}

/// Pick one profile for the whole browser session.
pub fn pick_session_profile<R: Rng + ?Sized>(rng: &mut R) -> UserAgentProfile {
    let mut profiles = desktop_profiles();
    let idx = rng.gen_range(0..profiles.len());
    profiles.swap_remove(idx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_profile_is_one_of_the_pool() {
        let mut rng = rand::thread_rng();
        let picked = pick_session_profile(&mut rng);
        assert!(desktop_profiles().contains(&picked));
    }
}
