// Version and build information

/// Build information structure
#[derive(Debug, Clone)]
pub struct BuildInfo {
    pub version: String,
    pub build_date: String,
    pub build_hash: String,
    pub target_triple: String,
    pub optimized: bool,
}

/// Crate version baked in at compile time
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// User-Agent sent with every backend request
pub fn user_agent() -> String {
    format!("opsdash/{}", version())
}

/// Get current build information
pub fn build_info() -> BuildInfo {
    BuildInfo {
        version: version().to_string(),
        build_date: option_env!("BUILD_DATE").unwrap_or("unknown").to_string(),
        build_hash: option_env!("GIT_HASH").unwrap_or("unknown").to_string(),
        target_triple: option_env!("BUILD_TARGET").unwrap_or("unknown").to_string(),
        optimized: cfg!(not(debug_assertions)),
    }
}

impl BuildInfo {
    pub fn format_display(&self) -> String {
        format!("opsdash v{}", self.version)
    }

    pub fn format_build_info(&self) -> String {
        format!(
            "Build: {}\nTarget: {}\nProfile: {}\nGit: {}",
            self.build_date,
            self.target_triple,
            if self.optimized { "release" } else { "debug" },
            self.build_hash,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent_carries_version() {
        assert_eq!(user_agent(), format!("opsdash/{}", env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn test_format_display() {
        let info = build_info();
        assert!(info.format_display().starts_with("opsdash v"));
        assert!(info.format_build_info().contains("Target:"));
    }
}
