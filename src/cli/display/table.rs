//! Table rendering for CLI output

use super::{ColorTheme, StatusIcon};
use crate::domain::resource::{Kind, Resource};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, ContentArrangement, Table};

/// One generated resource as shown in the summary
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceSummary {
    pub kind: Kind,
    pub name: String,
    pub containers: usize,
    pub replicas: Option<i32>,
}

impl ResourceSummary {
    pub fn from_resource(resource: &Resource) -> Self {
        Self {
            kind: resource.kind(),
            name: resource.name().unwrap_or("<unnamed>").to_string(),
            containers: resource.pod_spec().map_or(0, |s| s.containers.len()),
            replicas: resource.replicas(),
        }
    }
}

/// Table renderer for formatted output
pub struct TableRenderer {
    theme: ColorTheme,
}

impl Default for TableRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TableRenderer {
    pub fn new() -> Self {
        Self {
            theme: ColorTheme::default(),
        }
    }

    pub fn render_resources(&self, resources: &[ResourceSummary]) -> String {
        if resources.is_empty() {
            return "No resources generated".to_string();
        }

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("KIND").set_alignment(CellAlignment::Left),
                Cell::new("NAME").set_alignment(CellAlignment::Left),
                Cell::new("CONTAINERS").set_alignment(CellAlignment::Center),
                Cell::new("REPLICAS").set_alignment(CellAlignment::Center),
            ]);

        for resource in resources {
            let is_controller = resource.kind.is_controller();
            let icon = StatusIcon::container_icon(is_controller, resource.containers);
            let containers = if is_controller {
                format!("{} {}", icon, resource.containers)
            } else {
                icon.to_string()
            };
            let replicas = resource
                .replicas
                .map(|r| r.to_string())
                .unwrap_or_else(|| StatusIcon::NONE.to_string());

            table.add_row(vec![
                Cell::new(resource.kind.as_str()).fg(self.theme.kind_color(resource.kind)),
                Cell::new(&resource.name),
                Cell::new(containers)
                    .fg(self.theme.container_color(resource.kind, resource.containers))
                    .set_alignment(CellAlignment::Center),
                Cell::new(replicas).set_alignment(CellAlignment::Center),
            ]);
        }

        let mut output = String::new();
        output.push_str(&format!(
            "╭─ Generated Resources {} ─╮\n",
            format!("[{} resources]", resources.len()).bright_black()
        ));
        output.push_str(&table.to_string());
        output.push('\n');
        output.push_str(&format!(
            "Legend: {} Containers  {} No containers\n",
            StatusIcon::SUCCESS.green(),
            StatusIcon::WARNING.yellow()
        ));
        output
    }
}
