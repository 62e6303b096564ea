//! Icons for CLI output

pub struct StatusIcon;

impl StatusIcon {
    pub const SUCCESS: &'static str = "✓";

    pub const WARNING: &'static str = "⚠";

    pub const NONE: &'static str = "-";

    /// Icon for a container count of a resource that may hold pods
    pub fn container_icon(is_controller: bool, containers: usize) -> &'static str {
        if !is_controller {
            Self::NONE
        } else if containers == 0 {
            Self::WARNING
        } else {
            Self::SUCCESS
        }
    }
}
