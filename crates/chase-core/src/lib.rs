#![deny(warnings)]
pub mod game;
pub mod model;
pub mod network;

pub struct AppInfo;

impl AppInfo {
    pub const fn name() -> &'static str {
        "nychase"
    }

    pub const fn codename() -> &'static str {
        "Super Police Computer"
    }

    pub const fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }
}

#[cfg(test)]
mod tests {
    use super::AppInfo;

    #[test]
    fn exposes_static_metadata() {
        assert_eq!(AppInfo::name(), "nychase");
        assert_eq!(AppInfo::codename(), "Super Police Computer");
        assert!(!AppInfo::version().is_empty());
    }
}
