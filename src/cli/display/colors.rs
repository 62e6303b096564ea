//! Color theme for CLI output

use crate::domain::resource::Kind;
use comfy_table::Color as TableColor;

/// Color theme for terminal output
#[derive(Debug, Clone)]
pub struct ColorTheme {
    pub controller: TableColor,
    pub network: TableColor,
    pub config: TableColor,
    pub warning: TableColor,
    pub muted: TableColor,
}

impl Default for ColorTheme {
    fn default() -> Self {
        Self {
            controller: TableColor::Green,
            network: TableColor::Cyan,
            config: TableColor::Yellow,
            warning: TableColor::Red,
            muted: TableColor::DarkGrey,
        }
    }
}

impl ColorTheme {
    pub fn kind_color(&self, kind: Kind) -> TableColor {
        match kind {
            Kind::Service => self.network,
            Kind::Secret | Kind::ConfigMap => self.config,
            Kind::PodSpec => self.muted,
            _ => self.controller,
        }
    }

    /// Controllers without containers are highlighted
    pub fn container_color(&self, kind: Kind, containers: usize) -> TableColor {
        if !kind.is_controller() {
            self.muted
        } else if containers == 0 {
            self.warning
        } else {
            self.controller
        }
    }
}
